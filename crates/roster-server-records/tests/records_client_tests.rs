// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for the Record Store client against a mock backend.
//!
//! Tests cover:
//! - Upsert semantics (merge-duplicates header, conflict target, null columns)
//! - Profile lookup by identity id
//! - Error message extraction from store error bodies

use roster_common_secret::SecretString;
use roster_server_records::{ProfileRecord, RecordsClient, RecordsConfig, RecordsError};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> RecordsConfig {
	RecordsConfig {
		base_url: server.uri(),
		service_role_key: SecretString::new("test-service-key".to_string()),
	}
}

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
		joindate: None,
		avatar_url: None,
	}
}

#[tokio::test]
async fn test_upsert_profile_sends_merge_duplicates_on_id_conflict() {
	let server = MockServer::start().await;

	Mock::given(method("POST"))
		.and(path("/rest/v1/employees"))
		.and(query_param("on_conflict", "id"))
		.and(header("apikey", "test-service-key"))
		.and(header("Authorization", "Bearer test-service-key"))
		.and(header("Prefer", "resolution=merge-duplicates"))
		.and(body_partial_json(serde_json::json!({
			"id": "user-1",
			"email": "jane@example.com",
			"birthday": null,
			"joindate": null,
			"avatar_url": null
		})))
		.respond_with(ResponseTemplate::new(201))
		.expect(1)
		.mount(&server)
		.await;

	let client = RecordsClient::new(config_for(&server));
	client.upsert_profile(&sample_profile()).await.unwrap();
}

#[tokio::test]
async fn test_upsert_profile_surfaces_store_error() {
	let server = MockServer::start().await;

	Mock::given(method("POST"))
		.and(path("/rest/v1/employees"))
		.respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
			"message": "insert or update on table \"employees\" violates foreign key constraint"
		})))
		.mount(&server)
		.await;

	let client = RecordsClient::new(config_for(&server));
	let err = client.upsert_profile(&sample_profile()).await.unwrap_err();

	match err {
		RecordsError::Service(msg) => {
			assert!(msg.starts_with("409:"), "got: {msg}");
			assert!(msg.contains("foreign key constraint"), "got: {msg}");
		}
		other => panic!("expected service error, got {other:?}"),
	}
}

#[tokio::test]
async fn test_get_profile_returns_row_when_present() {
	let server = MockServer::start().await;

	Mock::given(method("GET"))
		.and(path("/rest/v1/employees"))
		.and(query_param("id", "eq.user-1"))
		.respond_with(
			ResponseTemplate::new(200)
				.set_body_json(serde_json::json!([serde_json::to_value(sample_profile()).unwrap()])),
		)
		.mount(&server)
		.await;

	let client = RecordsClient::new(config_for(&server));
	let profile = client.get_profile("user-1").await.unwrap();

	let profile = profile.expect("row should exist");
	assert_eq!(profile.id, "user-1");
	assert_eq!(profile.department, "Engineering");
}

#[tokio::test]
async fn test_get_profile_returns_none_when_absent() {
	let server = MockServer::start().await;

	Mock::given(method("GET"))
		.and(path("/rest/v1/employees"))
		.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
		.mount(&server)
		.await;

	let client = RecordsClient::new(config_for(&server));
	let profile = client.get_profile("missing").await.unwrap();

	assert!(profile.is_none());
}
