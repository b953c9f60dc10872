// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! CORS handling for the employee provisioning endpoint.
//!
//! The transport contract requires the allow headers on *every* response
//! (success, failure, preflight alike) and a bare `200 ok` for `OPTIONS`
//! preflights without any body parsing. A hand-stamped middleware keeps
//! that exact behavior in one place.

use axum::{
	extract::Request,
	http::{header::HeaderValue, HeaderMap, Method, StatusCode},
	middleware::Next,
	response::{IntoResponse, Response},
};

/// Allowed origin for browser callers.
pub const ALLOW_ORIGIN: &str = "*";

/// Headers a browser caller may send.
pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Stamp the CORS allow headers onto a header map.
pub fn apply_cors_headers(headers: &mut HeaderMap) {
	headers.insert(
		"Access-Control-Allow-Origin",
		HeaderValue::from_static(ALLOW_ORIGIN),
	);
	headers.insert(
		"Access-Control-Allow-Headers",
		HeaderValue::from_static(ALLOW_HEADERS),
	);
}

/// Middleware: answer preflights with `200 ok` and stamp CORS headers on
/// every other response.
pub async fn cors_middleware(request: Request, next: Next) -> Response {
	if request.method() == Method::OPTIONS {
		let mut response = (StatusCode::OK, "ok").into_response();
		apply_cors_headers(response.headers_mut());
		return response;
	}

	let mut response = next.run(request).await;
	apply_cors_headers(response.headers_mut());
	response
}
