// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP server for Roster employee provisioning.
//!
//! A single endpoint, `/employees`, accepts employee creation requests and
//! drives the provisioning workflow in
//! [`roster_server_provisioning`]. The transport contract is deliberately
//! browser-friendly and uniform:
//!
//! - every response carries permissive CORS headers,
//! - `OPTIONS` preflights get a bare `200 ok` without touching the body,
//! - outcomes are encoded in the JSON body (`success` field), with HTTP
//!   status reduced to 200 for success and 400 for every failure.

pub mod config;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod routes;

pub use config::{ConfigError, ServerConfig};
pub use routes::{create_app_state, create_router, AppState};
