// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Record Store client for Roster.
//!
//! This crate talks to the external record store (a PostgREST-compatible
//! data backend) that holds employee profile rows. The provisioning workflow
//! uses it for a single write — an upsert keyed by the employee's identity
//! id — plus a lookup used by tooling and tests.
//!
//! A profile row must never exist without a matching identity-provider user;
//! the workflow enforces that by deleting the identity when the upsert here
//! fails. This crate itself has no opinion on ordering — it is a thin,
//! stateless HTTP client authenticated with the privileged service-role key.

use roster_common_secret::SecretString;
use serde::{Deserialize, Serialize};
use std::env;

const EMPLOYEES_PATH: &str = "/rest/v1/employees";

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

/// Errors that can occur when calling the Record Store.
#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
	/// The HTTP request failed (network error, timeout, etc.).
	#[error("HTTP request failed: {0}")]
	HttpRequest(#[from] reqwest::Error),

	/// The Record Store rejected the call (constraint violation, bad
	/// column, permission error, etc.).
	#[error("record store error: {0}")]
	Service(String),

	/// The response could not be parsed as expected.
	#[error("failed to parse response: {0}")]
	ParseError(String),
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the Record Store client.
///
/// Writes go through the privileged service-role key, which bypasses
/// row-level restrictions; the key is wrapped in [`SecretString`] to prevent
/// accidental logging.
#[derive(Debug, Clone)]
pub struct RecordsConfig {
	/// Base URL of the backend platform (no trailing slash).
	pub base_url: String,
	/// Privileged API key used for profile writes.
	pub service_role_key: SecretString,
}

impl RecordsConfig {
	/// Load configuration from environment variables.
	///
	/// # Required Environment Variables
	///
	/// - `ROSTER_SERVER_BACKEND_URL`: Base URL of the backend platform.
	/// - `ROSTER_SERVER_SERVICE_ROLE_KEY`: The privileged service-role key.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::MissingEnvVar`] if any required variable is not set.
	pub fn from_env() -> Result<Self, ConfigError> {
		let base_url = env::var("ROSTER_SERVER_BACKEND_URL")
			.map_err(|_| ConfigError::MissingEnvVar("ROSTER_SERVER_BACKEND_URL".to_string()))?;

		let service_role_key = env::var("ROSTER_SERVER_SERVICE_ROLE_KEY")
			.map_err(|_| ConfigError::MissingEnvVar("ROSTER_SERVER_SERVICE_ROLE_KEY".to_string()))?;

		Ok(Self {
			base_url,
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
		if self.service_role_key.expose().is_empty() {
			return Err(ConfigError::InvalidConfig(
				"service_role_key cannot be empty".to_string(),
			));
		}
		Ok(())
	}

	fn endpoint(&self) -> String {
		format!("{}{}", self.base_url.trim_end_matches('/'), EMPLOYEES_PATH)
	}
}

// =============================================================================
// Profile record
// =============================================================================

/// An employee profile row, keyed by the identity-provider user id.
///
/// Optional fields serialize as JSON `null` when absent — the row always
/// carries every column, never an omission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
	/// Foreign key: the identity-provider user id.
	pub id: String,
	pub email: String,
	pub name: String,
	pub division: String,
	pub department: String,
	pub position: String,
	pub status: String,
	pub phone: String,
	pub birthday: Option<String>,
	pub joindate: Option<String>,
	pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordsErrorResponse {
	message: Option<String>,
	details: Option<String>,
}

/// Extract the store's error message from a non-success response body,
/// falling back to the raw body text.
fn service_error(status: reqwest::StatusCode, body: &str) -> RecordsError {
	let detail = serde_json::from_str::<RecordsErrorResponse>(body)
		.ok()
		.and_then(|e| e.message.or(e.details))
		.unwrap_or_else(|| body.to_string());

	RecordsError::Service(format!("{}: {}", status.as_u16(), detail))
}

// =============================================================================
// Client
// =============================================================================

/// HTTP client for the Record Store.
#[derive(Debug, Clone)]
pub struct RecordsClient {
	config: RecordsConfig,
	http_client: reqwest::Client,
}

impl RecordsClient {
	/// Create a new Record Store client with the given configuration.
	///
	/// The client uses the shared builder's User-Agent and default timeout.
	///
	/// # Panics
	///
	/// Panics if the HTTP client cannot be built (should never happen in practice).
	#[tracing::instrument(skip_all, name = "RecordsClient::new")]
	pub fn new(config: RecordsConfig) -> Self {
		Self {
			config,
			http_client: roster_common_http::new_client(),
		}
	}

	/// Insert an employee profile row, or replace the existing row with the
	/// same id.
	///
	/// # Errors
	///
	/// - [`RecordsError::HttpRequest`]: Network error or timeout.
	/// - [`RecordsError::Service`]: The store rejected the write.
	#[tracing::instrument(skip(self, profile), fields(id = %profile.id), name = "RecordsClient::upsert_profile")]
	pub async fn upsert_profile(&self, profile: &ProfileRecord) -> Result<(), RecordsError> {
		tracing::debug!("upserting employee profile");

		let response = self
			.http_client
			.post(self.config.endpoint())
			.query(&[("on_conflict", "id")])
			.header("apikey", self.config.service_role_key.expose().as_str())
			.header(
				"Authorization",
				format!("Bearer {}", self.config.service_role_key.expose()),
			)
			.header("Prefer", "resolution=merge-duplicates")
			.json(profile)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(service_error(status, &body));
		}

		Ok(())
	}

	/// Fetch an employee profile row by identity id, if one exists.
	///
	/// # Errors
	///
	/// - [`RecordsError::HttpRequest`]: Network error or timeout.
	/// - [`RecordsError::Service`]: The store rejected the read.
	/// - [`RecordsError::ParseError`]: Unexpected response format.
	#[tracing::instrument(skip(self), fields(id = %id), name = "RecordsClient::get_profile")]
	pub async fn get_profile(&self, id: &str) -> Result<Option<ProfileRecord>, RecordsError> {
		let response = self
			.http_client
			.get(self.config.endpoint())
			.query(&[("id", format!("eq.{id}").as_str()), ("select", "*")])
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

		let mut rows: Vec<ProfileRecord> = response
			.json()
			.await
			.map_err(|e| RecordsError::ParseError(format!("failed to parse profile rows: {e}")))?;

		if rows.is_empty() {
			Ok(None)
		} else {
			Ok(Some(rows.remove(0)))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_profile() -> ProfileRecord {
		ProfileRecord {
			id: "user-1".to_string(),
			email: "jane@example.com".to_string(),
			name: "Jane Doe".to_string(),
			division: "Product".to_string(),
			department: "Engineering".to_string(),
			position: "Engineer".to_string(),
			status: "active".to_string(),
			phone: "+64 21 555 0100".to_string(),
			birthday: None,
			joindate: Some("2025-03-01".to_string()),
			avatar_url: None,
		}
	}

	#[test]
	fn upsert_serializes_missing_optionals_as_null() {
		let json = serde_json::to_value(sample_profile()).unwrap();

		assert_eq!(json["birthday"], serde_json::Value::Null);
		assert_eq!(json["avatar_url"], serde_json::Value::Null);
		assert_eq!(json["joindate"], "2025-03-01");
		// Columns are always present, never omitted.
		assert!(json.as_object().unwrap().contains_key("birthday"));
	}

	#[test]
	fn profile_record_roundtrips() {
		let profile = sample_profile();
		let json = serde_json::to_string(&profile).unwrap();
		let back: ProfileRecord = serde_json::from_str(&json).unwrap();

		assert_eq!(back.id, "user-1");
		assert_eq!(back.status, "active");
		assert!(back.birthday.is_none());
	}

	#[test]
	fn service_error_prefers_message_field() {
		let err = service_error(
			reqwest::StatusCode::CONFLICT,
			r#"{"message": "duplicate key value violates unique constraint"}"#,
		);
		assert_eq!(
			err.to_string(),
			"record store error: 409: duplicate key value violates unique constraint"
		);
	}

	#[test]
	fn config_validation_rejects_empty_fields() {
		let config = RecordsConfig {
			base_url: String::new(),
			service_role_key: SecretString::new("key".to_string()),
		};
		assert!(config.validate().is_err());

		let config = RecordsConfig {
			base_url: "https://backend.example.com".to_string(),
			service_role_key: SecretString::new(String::new()),
		};
		assert!(config.validate().is_err());
	}

	#[test]
	fn endpoint_handles_trailing_slash() {
		let config = RecordsConfig {
			base_url: "https://backend.example.com/".to_string(),
			service_role_key: SecretString::new("key".to_string()),
		};
		assert_eq!(
			config.endpoint(),
			"https://backend.example.com/rest/v1/employees"
		);
	}
}
