#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
use time::{Duration, OffsetDateTime};
use url::Url;
// self
use jwt_gatekeeper::{
	auth::{BearerToken, jwt},
	error::Error,
	gatekeeper::{Gatekeeper, GatekeeperConfig, ReqwestAuthorizedClient},
	refresh::{FnRefresher, RefreshError},
	reqwest::Client,
	store::MemoryStore,
	transport::{OutboundRequest, ReqwestTransport},
};

fn token_expiring_in(subject: &str, offset: Duration) -> BearerToken {
	let header = json!({ "alg": "HS512", "typ": "JWT" });
	let payload = json!({
		"sub": subject,
		"exp": (OffsetDateTime::now_utc() + offset).unix_timestamp(),
	});

	BearerToken::new(jwt::compose(
		header.as_object().expect("Header fixture should be an object."),
		payload.as_object().expect("Payload fixture should be an object."),
		"testsignature",
	))
}

/// Builds a transport that accepts the self-signed certificates served by `httpmock`.
fn insecure_transport() -> ReqwestTransport {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Insecure reqwest client should build for tests.");

	ReqwestTransport::with_client(client)
}

fn build_client(
	store: &MemoryStore,
	refreshed: &BearerToken,
	config: GatekeeperConfig,
) -> ReqwestAuthorizedClient {
	let refreshed = refreshed.clone();
	let refresher = FnRefresher::new(move || {
		let refreshed = refreshed.clone();

		async move { Ok::<_, RefreshError>(refreshed) }
	});
	let gatekeeper =
		Gatekeeper::new(Arc::new(store.clone()), Arc::new(refresher)).with_config(config);

	ReqwestAuthorizedClient::new(gatekeeper, insecure_transport())
}

fn url(server: &MockServer, path: &str) -> Url {
	Url::parse(&server.url(path)).expect("Mock endpoint should parse successfully.")
}

#[tokio::test]
async fn valid_token_reaches_the_server() {
	let server = MockServer::start_async().await;
	let valid = token_expiring_in("swampfox", Duration::minutes(30));
	let store = MemoryStore::with_token(valid.clone());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/some-endpoint")
				.header("authorization", format!("Bearer {}", valid.expose()));
			then.status(200).body("great success");
		})
		.await;
	let client = build_client(&store, &valid, GatekeeperConfig::default());
	let response = client
		.send(OutboundRequest::get(url(&server, "/some-endpoint")))
		.await
		.expect("Request with a valid token should succeed.");

	mock.assert_async().await;

	assert_eq!(response.text(), "great success");
}

#[tokio::test]
async fn expired_token_is_replaced_before_sending() {
	let server = MockServer::start_async().await;
	let expired = token_expiring_in("swampfox", -Duration::minutes(30));
	let refreshed = token_expiring_in("swampfox-refreshed", Duration::minutes(30));
	let store = MemoryStore::with_token(expired.clone());
	let stale = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/some-endpoint")
				.header("authorization", format!("Bearer {}", expired.expose()));
			then.status(401);
		})
		.await;
	let fresh = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/some-endpoint")
				.header("authorization", format!("Bearer {}", refreshed.expose()));
			then.status(200).body("great success");
		})
		.await;
	let client = build_client(&store, &refreshed, GatekeeperConfig::default());

	client
		.send(OutboundRequest::get(url(&server, "/some-endpoint")))
		.await
		.expect("Request should be sent with the refreshed token.");

	stale.assert_calls_async(0).await;
	fresh.assert_async().await;

	assert_eq!(store.current(), Some(refreshed));
}

#[tokio::test]
async fn unauthorized_response_is_retried_with_refreshed_token() {
	let server = MockServer::start_async().await;
	let rejected = token_expiring_in("revoked", Duration::minutes(30));
	let refreshed = token_expiring_in("swampfox-refreshed", Duration::minutes(30));
	let store = MemoryStore::with_token(rejected.clone());
	let first = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/some-endpoint")
				.header("authorization", format!("Bearer {}", rejected.expose()));
			then.status(401).body("some error");
		})
		.await;
	let second = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/some-endpoint")
				.header("authorization", format!("Bearer {}", refreshed.expose()));
			then.status(200).body("Hello World");
		})
		.await;
	let client = build_client(&store, &refreshed, GatekeeperConfig::default());
	let response = client
		.send(OutboundRequest::get(url(&server, "/some-endpoint")))
		.await
		.expect("Retried request should succeed.");

	first.assert_async().await;
	second.assert_async().await;

	assert_eq!(response.text(), "Hello World");
}

#[tokio::test]
async fn unauthorized_message_surfaces_when_retry_disabled() {
	let server = MockServer::start_async().await;
	let valid = token_expiring_in("swampfox", Duration::minutes(30));
	let store = MemoryStore::with_token(valid.clone());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/some-endpoint");
			then.status(401)
				.header("content-type", "application/json")
				.header("retry-after", "30")
				.body("{\"message\":\"Session revoked\"}");
		})
		.await;
	let client =
		build_client(&store, &valid, GatekeeperConfig::default().with_retry_on_unauthorized(false));
	let err = client
		.send(OutboundRequest::get(url(&server, "/some-endpoint")))
		.await
		.expect_err("401 should surface when retries are disabled.");

	mock.assert_async().await;

	assert!(err.is_unauthorized());
	assert_eq!(err.to_string(), "Session revoked");

	match err {
		Error::Transport(inner) => assert_eq!(inner.status(), Some(401)),
		other => panic!("Expected a transport error, got {other:?}."),
	}
}

#[tokio::test]
async fn unreachable_server_is_reported_as_network_failure() {
	let store = MemoryStore::default();
	let refreshed = token_expiring_in("unused", Duration::minutes(30));
	let client = build_client(&store, &refreshed, GatekeeperConfig::default());
	let target = Url::parse("http://127.0.0.1:9/unreachable").expect("Fixture URL should parse.");
	let err = client
		.send(OutboundRequest::get(target))
		.await
		.expect_err("Connecting to a closed port should fail.");

	match err {
		Error::Transport(inner) => assert_eq!(inner.status(), None),
		other => panic!("Expected a transport error, got {other:?}."),
	}
}
