// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	body::Bytes,
	extract::State,
	http::HeaderMap,
	response::{IntoResponse, Response},
	Json,
};
use serde::Serialize;
use tracing::info;

use crate::error::ApiError;
use crate::routes::AppState;

/// Success body for employee creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateEmployeeResponse {
	pub success: bool,
	#[serde(rename = "userId")]
	pub user_id: String,
	pub message: String,
}

/// Pull the bearer credential out of the `Authorization` header, if any.
///
/// A header without the `Bearer ` prefix is forwarded as-is; the Identity
/// Service decides whether it resolves.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
	let value = headers.get("Authorization")?.to_str().ok()?;
	Some(value.strip_prefix("Bearer ").unwrap_or(value).trim())
}

/// Handle an employee creation request.
///
/// Accepts any method (preflights are answered by the CORS middleware
/// before reaching here). The body is parsed manually so that malformed
/// JSON still yields the uniform `{success:false}` failure shape instead of
/// an extractor rejection.
pub async fn create_employee(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Bytes,
) -> Response {
	let request = match serde_json::from_slice(&body) {
		Ok(request) => request,
		Err(e) => return ApiError::BadBody(e.to_string()).into_response(),
	};

	match state
		.provisioning
		.provision(bearer_token(&headers), request)
		.await
	{
		Ok(outcome) => {
			info!(user_id = %outcome.user_id, "employee created");
			Json(CreateEmployeeResponse {
				success: true,
				user_id: outcome.user_id,
				message: outcome.message,
			})
			.into_response()
		}
		Err(e) => ApiError::from(e).into_response(),
	}
}
