//! Walks through the gatekeeper against an in-process API that rejects stale tokens.

// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use color_eyre::Result;
use serde_json::json;
use time::{Duration, OffsetDateTime};
use url::Url;
// self
use jwt_gatekeeper::{
	auth::{BearerToken, jwt},
	gatekeeper::{AuthorizedClient, Gatekeeper},
	http::{HeaderMap, StatusCode},
	refresh::{FnRefresher, RefreshError},
	store::MemoryStore,
	transport::{HttpFailure, InboundResponse, OutboundRequest, Transport, TransportFuture},
};

/// Accepts only the most recently issued token.
struct DemoApi {
	accepted: parking_lot::RwLock<Option<String>>,
}
impl Transport for DemoApi {
	fn send(&self, request: OutboundRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let expected = self.accepted.read().as_ref().map(|token| format!("Bearer {token}"));

			if request.authorization().is_some() && request.authorization() == expected.as_deref()
			{
				Ok(InboundResponse::new(StatusCode::OK, format!("hello from {}", request.url.path())))
			} else {
				Err(HttpFailure::from_response(
					StatusCode::UNAUTHORIZED,
					&HeaderMap::new(),
					br#"{"message":"token rejected"}"#,
				))
			}
		})
	}
}

fn issue(serial: usize, lifetime: Duration) -> BearerToken {
	let mut header = jwt::Claims::new();
	let mut payload = jwt::Claims::new();

	header.insert("alg".into(), json!("HS512"));
	header.insert("typ".into(), json!("JWT"));
	payload.insert("sub".into(), json!(format!("demo-{serial}")));
	payload.insert("exp".into(), json!((OffsetDateTime::now_utc() + lifetime).unix_timestamp()));

	BearerToken::new(jwt::compose(&header, &payload, "demo-signature"))
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let api = Arc::new(DemoApi { accepted: parking_lot::RwLock::new(None) });
	let serial = Arc::new(AtomicUsize::new(0));
	let store = MemoryStore::with_token(issue(0, -Duration::minutes(30)));
	let refresher = {
		let api = api.clone();
		let serial = serial.clone();

		FnRefresher::new(move || {
			let api = api.clone();
			let next = serial.fetch_add(1, Ordering::SeqCst) + 1;

			async move {
				let token = issue(next, Duration::minutes(30));

				*api.accepted.write() = Some(token.expose().to_owned());

				Ok::<_, RefreshError>(token)
			}
		})
	};
	let gatekeeper = Gatekeeper::new(Arc::new(store.clone()), Arc::new(refresher));
	let client = AuthorizedClient::<DemoApi>::new(gatekeeper, api.clone());
	let base = Url::parse("https://api.example.com/")?;

	// Expired token in the store: refreshed before the first request goes out.
	let response = client.send(OutboundRequest::get(base.join("profile")?)).await?;

	println!("expired token -> {}", response.text());

	// Server-side revocation: the 401 triggers one refresh and one retry.
	*api.accepted.write() = None;

	let response = client.send(OutboundRequest::get(base.join("orders")?)).await?;

	println!("revoked token -> {}", response.text());
	println!(
		"refreshes: attempts={} successes={} coalesced={}",
		client.gatekeeper().refresh_metrics.attempts(),
		client.gatekeeper().refresh_metrics.successes(),
		client.gatekeeper().refresh_metrics.coalesced(),
	);

	Ok(())
}
