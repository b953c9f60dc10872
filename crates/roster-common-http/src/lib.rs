// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client with consistent User-Agent header.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Default timeout applied to clients built by [`new_client`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Creates a new HTTP client with the standard Roster User-Agent header
/// and the default timeout.
pub fn new_client() -> Client {
	builder()
		.timeout(DEFAULT_TIMEOUT)
		.build()
		.expect("failed to build HTTP client")
}

/// Creates a new HTTP client builder with the standard Roster User-Agent
/// header.
///
/// Use this when you need to customize the client (e.g., set timeout).
///
/// # Example
/// ```ignore
/// let client = roster_common_http::builder()
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Returns the standard Roster User-Agent string.
///
/// Format: `roster/{version}`
pub fn user_agent() -> String {
	format!("roster/{}", env!("CARGO_PKG_VERSION"))
}
