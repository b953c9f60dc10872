// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity Service client for Roster.
//!
//! This crate talks to the external identity provider (a GoTrue-compatible
//! auth backend) over HTTP. It exposes the three operations the employee
//! provisioning workflow needs:
//!
//! 1. **Caller lookup** ([`IdentityClient::authenticated_user`]): resolve the
//!    calling identity from a forwarded bearer token, using the public
//!    (anonymous) API key. This is the authorization check — a request with
//!    no resolvable identity is rejected before anything is created.
//!
//! 2. **User creation** ([`IdentityClient::create_user`]): create a new user
//!    with a pre-confirmed email address and name/department/position
//!    metadata, using the privileged service-role key.
//!
//! 3. **User deletion** ([`IdentityClient::delete_user`]): remove a user by
//!    id. The provisioning workflow uses this as the compensating action
//!    when the profile write fails after the identity was created.
//!
//! # Security Considerations
//!
//! - The anonymous and service-role keys are wrapped in [`SecretString`] to
//!   prevent accidental logging.
//! - The client holds no session state: the service-role key is sent per
//!   request and no token is ever persisted or refreshed.
//! - All tracing instrumentation skips bearer tokens and passwords.

use roster_common_secret::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::env;

const USER_PATH: &str = "/auth/v1/user";
const ADMIN_USERS_PATH: &str = "/auth/v1/admin/users";

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// A required environment variable was not set.
	#[error("missing environment variable: {0}")]
	MissingEnvVar(String),

	/// A configuration value was empty or invalid.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}

/// Errors that can occur when calling the Identity Service.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
	/// The HTTP request failed (network error, timeout, etc.).
	#[error("HTTP request failed: {0}")]
	HttpRequest(#[from] reqwest::Error),

	/// The Identity Service rejected the call (invalid token, duplicate
	/// email, weak password, unknown user, etc.).
	#[error("identity service error: {0}")]
	Service(String),

	/// The response could not be parsed as expected.
	#[error("failed to parse response: {0}")]
	ParseError(String),
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the Identity Service client.
///
/// Both keys are wrapped in [`SecretString`]. The `anon_key` carries only the
/// caller's own privileges and is used for the authorization check; the
/// `service_role_key` bypasses per-row restrictions and is used for admin
/// create/delete operations.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
	/// Base URL of the backend platform (no trailing slash).
	pub base_url: String,
	/// Public API key used for the caller-scoped "who am I" lookup.
	pub anon_key: SecretString,
	/// Privileged API key used for admin create/delete operations.
	pub service_role_key: SecretString,
}

impl IdentityConfig {
	/// Load configuration from environment variables.
	///
	/// # Required Environment Variables
	///
	/// - `ROSTER_SERVER_BACKEND_URL`: Base URL of the backend platform.
	/// - `ROSTER_SERVER_ANON_KEY`: The public (anonymous) API key.
	/// - `ROSTER_SERVER_SERVICE_ROLE_KEY`: The privileged service-role key.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::MissingEnvVar`] if any required variable is not set.
	pub fn from_env() -> Result<Self, ConfigError> {
		let base_url = env::var("ROSTER_SERVER_BACKEND_URL")
			.map_err(|_| ConfigError::MissingEnvVar("ROSTER_SERVER_BACKEND_URL".to_string()))?;

		let anon_key = env::var("ROSTER_SERVER_ANON_KEY")
			.map_err(|_| ConfigError::MissingEnvVar("ROSTER_SERVER_ANON_KEY".to_string()))?;

		let service_role_key = env::var("ROSTER_SERVER_SERVICE_ROLE_KEY")
			.map_err(|_| ConfigError::MissingEnvVar("ROSTER_SERVER_SERVICE_ROLE_KEY".to_string()))?;

		Ok(Self {
			base_url,
			anon_key: SecretString::new(anon_key),
			service_role_key: SecretString::new(service_role_key),
		})
	}

	/// Validate that all configuration fields are non-empty.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::InvalidConfig`] if any field is empty.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.base_url.is_empty() {
			return Err(ConfigError::InvalidConfig(
				"base_url cannot be empty".to_string(),
			));
		}
		if self.anon_key.expose().is_empty() {
			return Err(ConfigError::InvalidConfig(
				"anon_key cannot be empty".to_string(),
			));
		}
		if self.service_role_key.expose().is_empty() {
			return Err(ConfigError::InvalidConfig(
				"service_role_key cannot be empty".to_string(),
			));
		}
		Ok(())
	}

	fn endpoint(&self, path: &str) -> String {
		format!("{}{}", self.base_url.trim_end_matches('/'), path)
	}
}

// =============================================================================
// Request/response types
// =============================================================================

/// Input for creating a new identity-provider user.
///
/// The email is marked as confirmed at creation time, so the new employee
/// can sign in without a verification round-trip. Name, department and
/// position travel in the identity's metadata bag.
#[derive(Debug, Clone)]
pub struct NewIdentity {
	/// Sign-in email address.
	pub email: String,
	/// Initial password (wrapped to prevent logging).
	pub password: SecretString,
	/// Display name stored in the identity metadata.
	pub name: String,
	/// Department stored in the identity metadata.
	pub department: String,
	/// Position stored in the identity metadata.
	pub position: String,
}

/// Metadata bag attached to an identity-provider user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityMetadata {
	pub name: Option<String>,
	pub department: Option<String>,
	pub position: Option<String>,
}

/// A user record as returned by the Identity Service.
///
/// Only the fields the provisioning workflow cares about are kept; the
/// service owns the rest of the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityUser {
	/// Opaque identifier assigned by the Identity Service.
	pub id: String,
	/// The user's email address, if present on the record.
	pub email: Option<String>,
	/// The name/department/position metadata bag, if present.
	pub user_metadata: Option<IdentityMetadata>,
}

#[derive(Debug, Deserialize)]
struct IdentityErrorResponse {
	msg: Option<String>,
	message: Option<String>,
	error_description: Option<String>,
	error: Option<String>,
}

impl IdentityErrorResponse {
	fn into_message(self) -> Option<String> {
		self
			.msg
			.or(self.message)
			.or(self.error_description)
			.or(self.error)
	}
}

/// Extract the service's error message from a non-success response body,
/// falling back to the raw body text.
fn service_error(status: reqwest::StatusCode, body: &str) -> IdentityError {
	let detail = serde_json::from_str::<IdentityErrorResponse>(body)
		.ok()
		.and_then(IdentityErrorResponse::into_message)
		.unwrap_or_else(|| body.to_string());

	IdentityError::Service(format!("{}: {}", status.as_u16(), detail))
}

// =============================================================================
// Client
// =============================================================================

/// HTTP client for the Identity Service.
///
/// # Example
///
/// ```rust,no_run
/// use roster_server_identity::{IdentityClient, IdentityConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = IdentityConfig::from_env()?;
/// let client = IdentityClient::new(config);
///
/// let caller = client.authenticated_user("caller-jwt").await?;
/// println!("caller id: {}", caller.id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct IdentityClient {
	config: IdentityConfig,
	http_client: reqwest::Client,
}

impl IdentityClient {
	/// Create a new Identity Service client with the given configuration.
	///
	/// The client uses the shared builder's User-Agent and default timeout,
	/// so a stalled backend cannot hold a provisioning request open forever.
	///
	/// # Panics
	///
	/// Panics if the HTTP client cannot be built (should never happen in practice).
	#[tracing::instrument(skip_all, name = "IdentityClient::new")]
	pub fn new(config: IdentityConfig) -> Self {
		Self {
			config,
			http_client: roster_common_http::new_client(),
		}
	}

	/// Resolve the identity behind a caller-supplied bearer token.
	///
	/// This is the "who am I" operation: the caller's token is forwarded
	/// together with the public API key, so the lookup runs with the
	/// caller's own privileges.
	///
	/// # Errors
	///
	/// - [`IdentityError::HttpRequest`]: Network error or timeout.
	/// - [`IdentityError::Service`]: The token is missing, expired or invalid.
	/// - [`IdentityError::ParseError`]: Unexpected response format.
	#[tracing::instrument(skip(self, bearer_token), name = "IdentityClient::authenticated_user")]
	pub async fn authenticated_user(&self, bearer_token: &str) -> Result<IdentityUser, IdentityError> {
		tracing::debug!("resolving caller identity");

		let response = self
			.http_client
			.get(self.config.endpoint(USER_PATH))
			.header("apikey", self.config.anon_key.expose().as_str())
			.header("Authorization", format!("Bearer {bearer_token}"))
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(service_error(status, &body));
		}

		response
			.json()
			.await
			.map_err(|e| IdentityError::ParseError(format!("failed to parse user response: {e}")))
	}

	/// Create a new identity-provider user with a pre-confirmed email.
	///
	/// Uses the privileged service-role key. Name, department and position
	/// are attached as user metadata.
	///
	/// # Errors
	///
	/// - [`IdentityError::HttpRequest`]: Network error or timeout.
	/// - [`IdentityError::Service`]: The service rejected the create call
	///   (duplicate email, weak password, etc.).
	/// - [`IdentityError::ParseError`]: Unexpected response format.
	#[tracing::instrument(skip(self, new_identity), fields(email = %new_identity.email), name = "IdentityClient::create_user")]
	pub async fn create_user(&self, new_identity: &NewIdentity) -> Result<IdentityUser, IdentityError> {
		tracing::debug!("creating identity-provider user");

		let payload = json!({
			"email": new_identity.email,
			"password": new_identity.password.expose(),
			"email_confirm": true,
			"user_metadata": {
				"name": new_identity.name,
				"department": new_identity.department,
				"position": new_identity.position,
			},
		});

		let response = self
			.http_client
			.post(self.config.endpoint(ADMIN_USERS_PATH))
			.header("apikey", self.config.service_role_key.expose().as_str())
			.header(
				"Authorization",
				format!("Bearer {}", self.config.service_role_key.expose()),
			)
			.json(&payload)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(service_error(status, &body));
		}

		response
			.json()
			.await
			.map_err(|e| IdentityError::ParseError(format!("failed to parse created user: {e}")))
	}

	/// Delete an identity-provider user by id.
	///
	/// The provisioning workflow calls this to compensate when the profile
	/// write fails after the identity was created.
	///
	/// # Errors
	///
	/// - [`IdentityError::HttpRequest`]: Network error or timeout.
	/// - [`IdentityError::Service`]: The service rejected the delete call.
	#[tracing::instrument(skip(self), fields(user_id = %user_id), name = "IdentityClient::delete_user")]
	pub async fn delete_user(&self, user_id: &str) -> Result<(), IdentityError> {
		tracing::debug!("deleting identity-provider user");

		let response = self
			.http_client
			.delete(format!(
				"{}/{}",
				self.config.endpoint(ADMIN_USERS_PATH),
				user_id
			))
			.header("apikey", self.config.service_role_key.expose().as_str())
			.header(
				"Authorization",
				format!("Bearer {}", self.config.service_role_key.expose()),
			)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(service_error(status, &body));
		}

		Ok(())
	}
}
