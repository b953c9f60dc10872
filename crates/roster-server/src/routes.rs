// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use axum::{middleware, routing::any, Router};
use roster_server_identity::IdentityClient;
use roster_server_provisioning::EmployeeProvisioningService;
use roster_server_records::RecordsClient;

use crate::config::ServerConfig;
use crate::cors::cors_middleware;
use crate::handlers;

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
	pub provisioning: Arc<EmployeeProvisioningService>,
}

/// Build the application state from resolved configuration.
///
/// The privileged client is constructed fresh from the config here — it
/// carries no session and never refreshes a token.
pub fn create_app_state(config: &ServerConfig) -> AppState {
	let identity = IdentityClient::new(config.identity_config());
	let records = RecordsClient::new(config.records_config());

	AppState {
		provisioning: Arc::new(EmployeeProvisioningService::new(identity, records)),
	}
}

/// Build the router: one endpoint, any method, CORS stamped on everything.
pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/employees", any(handlers::create_employee))
		.layer(middleware::from_fn(cors_middleware))
		.with_state(state)
}
