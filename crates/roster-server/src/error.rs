// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use roster_server_provisioning::ProvisioningError;
use serde::Serialize;

/// Errors surfaced by the employee provisioning endpoint.
///
/// Per the transport contract, every failure collapses to HTTP 400 with a
/// `{ "success": false, "error": "<message>" }` body; the specific kind is
/// visible only in the message text (and in server logs).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	/// The request body was not valid JSON for the expected shape.
	#[error("invalid request body: {0}")]
	BadBody(String),

	/// The provisioning workflow failed.
	#[error(transparent)]
	Provisioning(#[from] ProvisioningError),
}

/// Uniform failure body for the endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
	pub success: bool,
	pub error: String,
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorResponse {
			success: false,
			error: self.to_string(),
		};

		(StatusCode::BAD_REQUEST, Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn provisioning_error_becomes_400() {
		let response = ApiError::Provisioning(ProvisioningError::Unauthenticated).into_response();
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}

	#[test]
	fn error_body_carries_message() {
		let body = ErrorResponse {
			success: false,
			error: "not authenticated".to_string(),
		};
		let json = serde_json::to_value(&body).unwrap();
		assert_eq!(json["success"], false);
		assert_eq!(json["error"], "not authenticated");
	}
}
