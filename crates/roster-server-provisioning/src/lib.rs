// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Employee provisioning workflow for Roster.
//!
//! Provisioning an employee touches two external systems that cannot share a
//! transaction: the Identity Service (the system of record for sign-in
//! identities) and the Record Store (employee profile rows). The workflow
//! runs the steps strictly in sequence and approximates atomicity with a
//! compensating action:
//!
//! 1. Resolve the caller from the forwarded bearer token ("who am I").
//! 2. Validate the request (email and password are required).
//! 3. Create the identity-provider user, email pre-confirmed, with
//!    name/department/position metadata.
//! 4. Upsert the profile row keyed by the new identity's id.
//! 5. If step 4 fails, delete the just-created identity (best effort) and
//!    report the profile error.
//!
//! On success both records exist with the same id; on failure neither
//! should. The compensation is best effort: if the delete itself fails, the
//! orphaned identity is logged loudly but the caller still sees the original
//! profile error.

pub mod error;

pub use error::ProvisioningError;

use roster_common_secret::SecretString;
use roster_server_identity::{IdentityClient, NewIdentity};
use roster_server_records::{ProfileRecord, RecordsClient};
use serde::Deserialize;
use tracing::{error, info, warn};

/// A request to provision a new employee account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmployeeRequest {
	/// Sign-in email address for the new employee.
	#[serde(default)]
	pub email: String,
	/// Initial password (wrapped to prevent logging).
	#[serde(default = "empty_secret")]
	pub password: SecretString,
	/// Profile fields for the employee. Required: a request without a
	/// `userData` object is malformed and must fail before any side effect.
	#[serde(rename = "userData")]
	pub user_data: EmployeeData,
}

fn empty_secret() -> SecretString {
	SecretString::new(String::new())
}

/// Profile fields supplied by the caller.
///
/// These pass through to the profile row without independent validation;
/// name, department and position also land in the identity metadata. The
/// optional fields are normalized so that absent *and* empty values persist
/// as null.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeData {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub department: String,
	#[serde(default)]
	pub position: String,
	#[serde(default)]
	pub division: String,
	#[serde(default)]
	pub status: String,
	#[serde(default)]
	pub phone: String,
	#[serde(default)]
	pub birthday: Option<String>,
	#[serde(default)]
	pub joindate: Option<String>,
	#[serde(default)]
	pub avatar_url: Option<String>,
}

/// Outcome of a successful provisioning run.
#[derive(Debug, Clone)]
pub struct ProvisionedEmployee {
	/// The new identity-provider user id (also the profile row key).
	pub user_id: String,
	/// Human-readable confirmation for the caller.
	pub message: String,
}

/// Treat empty strings the same as absent values.
fn normalize_optional(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.is_empty())
}

/// The employee provisioning workflow.
///
/// Holds the two external-service clients; stateless across invocations.
pub struct EmployeeProvisioningService {
	identity: IdentityClient,
	records: RecordsClient,
}

impl EmployeeProvisioningService {
	pub fn new(identity: IdentityClient, records: RecordsClient) -> Self {
		Self { identity, records }
	}

	/// Provision an employee: authorize, validate, create the identity,
	/// write the profile, compensate on partial failure.
	///
	/// `bearer_token` is the caller's credential, forwarded from the
	/// `Authorization` header. `None` (header absent) fails the
	/// authorization check without any network call.
	///
	/// # Errors
	///
	/// See [`ProvisioningError`]; every error is terminal for the request.
	#[tracing::instrument(skip_all, fields(email = %request.email), name = "EmployeeProvisioningService::provision")]
	pub async fn provision(
		&self,
		bearer_token: Option<&str>,
		request: CreateEmployeeRequest,
	) -> Result<ProvisionedEmployee, ProvisioningError> {
		// Step 1: authorization check with the caller's own credential.
		let Some(bearer_token) = bearer_token else {
			warn!("provisioning rejected: missing Authorization header");
			return Err(ProvisioningError::Unauthenticated);
		};

		let caller = match self.identity.authenticated_user(bearer_token).await {
			Ok(caller) => caller,
			Err(e) => {
				warn!(error = %e, "provisioning rejected: caller did not resolve");
				return Err(ProvisioningError::Unauthenticated);
			}
		};

		// Step 2: input validation.
		if request.email.is_empty() || request.password.expose().is_empty() {
			return Err(ProvisioningError::InvalidRequest(
				"email and password are required".to_string(),
			));
		}

		// Step 3: identity creation. Terminal on failure; nothing to undo.
		let new_identity = NewIdentity {
			email: request.email.clone(),
			password: request.password.clone(),
			name: request.user_data.name.clone(),
			department: request.user_data.department.clone(),
			position: request.user_data.position.clone(),
		};

		let created = self
			.identity
			.create_user(&new_identity)
			.await
			.map_err(ProvisioningError::IdentityCreation)?;

		// Step 4: profile persistence keyed by the new identity's id.
		let profile = ProfileRecord {
			id: created.id.clone(),
			email: request.email,
			name: request.user_data.name,
			division: request.user_data.division,
			department: request.user_data.department,
			position: request.user_data.position,
			status: request.user_data.status,
			phone: request.user_data.phone,
			birthday: normalize_optional(request.user_data.birthday),
			joindate: normalize_optional(request.user_data.joindate),
			avatar_url: normalize_optional(request.user_data.avatar_url),
		};

		if let Err(profile_error) = self.records.upsert_profile(&profile).await {
			// Step 5: compensating delete. Best effort — a failure here
			// leaves an orphaned identity, which we surface in logs while
			// reporting the original profile error to the caller.
			if let Err(delete_error) = self.identity.delete_user(&created.id).await {
				error!(
					user_id = %created.id,
					error = %delete_error,
					"compensating delete failed; identity orphaned without profile"
				);
			} else {
				info!(user_id = %created.id, "rolled back identity after profile failure");
			}

			return Err(ProvisioningError::ProfileCreation(profile_error));
		}

		info!(
			caller_id = %caller.id,
			user_id = %created.id,
			"provisioned employee"
		);

		Ok(ProvisionedEmployee {
			user_id: created.id,
			message: "Employee created successfully".to_string(),
		})
	}
}
