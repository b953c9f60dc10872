// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use roster_server_identity::IdentityError;
use roster_server_records::RecordsError;

/// Errors that can occur during employee provisioning.
///
/// Every variant is terminal for the request; nothing is retried. The
/// distinction matters for operators reading logs — callers receive a
/// uniform failure body either way.
#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
	/// The caller's credential did not resolve to an identity.
	#[error("not authenticated")]
	Unauthenticated,

	/// The request was missing required fields.
	#[error("invalid request: {0}")]
	InvalidRequest(String),

	/// The Identity Service rejected or failed the create call (duplicate
	/// email, weak password, etc.). No side effects remain.
	#[error(transparent)]
	IdentityCreation(IdentityError),

	/// The profile upsert failed after the identity was created. A
	/// compensating delete of the identity has already been attempted.
	#[error(transparent)]
	ProfileCreation(RecordsError),
}
