// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server configuration loaded from `ROSTER_SERVER_*` environment variables.
//!
//! The resolved [`ServerConfig`] is injected into the clients and the
//! workflow at startup; nothing below the entry point reads process state.

use roster_common_secret::SecretString;
use roster_server_identity::IdentityConfig;
use roster_server_records::RecordsConfig;
use std::env;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

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

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	/// Host to bind the HTTP listener to.
	pub http_host: String,
	/// Port to bind the HTTP listener to.
	pub http_port: u16,
	/// Base URL of the backend platform hosting the Identity Service and
	/// the Record Store.
	pub backend_url: String,
	/// Public API key, scoped to the caller's own privileges.
	pub anon_key: SecretString,
	/// Privileged service-role key for admin operations.
	pub service_role_key: SecretString,
}

impl ServerConfig {
	/// Load configuration from environment variables.
	///
	/// # Required Environment Variables
	///
	/// - `ROSTER_SERVER_BACKEND_URL`: Base URL of the backend platform.
	/// - `ROSTER_SERVER_ANON_KEY`: The public (anonymous) API key.
	/// - `ROSTER_SERVER_SERVICE_ROLE_KEY`: The privileged service-role key.
	///
	/// # Optional Environment Variables
	///
	/// - `ROSTER_SERVER_HTTP_HOST` (default `127.0.0.1`)
	/// - `ROSTER_SERVER_HTTP_PORT` (default `8080`)
	///
	/// # Errors
	///
	/// Returns [`ConfigError::MissingEnvVar`] if a required variable is not
	/// set, and [`ConfigError::InvalidConfig`] if a value does not parse.
	pub fn from_env() -> Result<Self, ConfigError> {
		let http_host =
			env::var("ROSTER_SERVER_HTTP_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

		let http_port = match env::var("ROSTER_SERVER_HTTP_PORT") {
			Ok(raw) => raw.parse::<u16>().map_err(|_| {
				ConfigError::InvalidConfig(format!("ROSTER_SERVER_HTTP_PORT is not a port: {raw}"))
			})?,
			Err(_) => DEFAULT_PORT,
		};

		let backend_url = env::var("ROSTER_SERVER_BACKEND_URL")
			.map_err(|_| ConfigError::MissingEnvVar("ROSTER_SERVER_BACKEND_URL".to_string()))?;

		let anon_key = env::var("ROSTER_SERVER_ANON_KEY")
			.map_err(|_| ConfigError::MissingEnvVar("ROSTER_SERVER_ANON_KEY".to_string()))?;

		let service_role_key = env::var("ROSTER_SERVER_SERVICE_ROLE_KEY")
			.map_err(|_| ConfigError::MissingEnvVar("ROSTER_SERVER_SERVICE_ROLE_KEY".to_string()))?;

		let config = Self {
			http_host,
			http_port,
			backend_url,
			anon_key: SecretString::new(anon_key),
			service_role_key: SecretString::new(service_role_key),
		};
		config.validate()?;
		Ok(config)
	}

	/// Validate that all configuration fields are non-empty.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::InvalidConfig`] if any field is empty.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.backend_url.is_empty() {
			return Err(ConfigError::InvalidConfig(
				"backend_url cannot be empty".to_string(),
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

	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http_host, self.http_port)
	}

	/// Identity Service client configuration derived from this config.
	pub fn identity_config(&self) -> IdentityConfig {
		IdentityConfig {
			base_url: self.backend_url.clone(),
			anon_key: self.anon_key.clone(),
			service_role_key: self.service_role_key.clone(),
		}
	}

	/// Record Store client configuration derived from this config.
	pub fn records_config(&self) -> RecordsConfig {
		RecordsConfig {
			base_url: self.backend_url.clone(),
			service_role_key: self.service_role_key.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn test_config() -> ServerConfig {
		ServerConfig {
			http_host: DEFAULT_HOST.to_string(),
			http_port: DEFAULT_PORT,
			backend_url: "https://backend.example.com".to_string(),
			anon_key: SecretString::new("anon-key-value".to_string()),
			service_role_key: SecretString::new("service-key-value".to_string()),
		}
	}

	#[test]
	fn socket_addr_joins_host_and_port() {
		let config = test_config();
		assert_eq!(config.socket_addr(), "127.0.0.1:8080");
	}

	#[test]
	fn validation_rejects_empty_fields() {
		let mut config = test_config();
		config.backend_url = String::new();
		assert!(config.validate().is_err());

		let mut config = test_config();
		config.anon_key = SecretString::new(String::new());
		assert!(config.validate().is_err());

		let mut config = test_config();
		config.service_role_key = SecretString::new(String::new());
		assert!(config.validate().is_err());
	}

	#[test]
	fn derived_client_configs_share_backend_url() {
		let config = test_config();
		assert_eq!(config.identity_config().base_url, config.backend_url);
		assert_eq!(config.records_config().base_url, config.backend_url);
	}

	#[test]
	fn keys_are_not_logged() {
		let config = test_config();
		let debug = format!("{config:?}");
		assert!(!debug.contains("anon-key-value"));
		assert!(!debug.contains("service-key-value"));
		assert!(debug.contains("[REDACTED]"));
	}
}
