// self
use jwt_gatekeeper::{
	auth::BearerToken,
	store::{CompareAndSwapOutcome, MemoryStore, TokenStore},
};

#[tokio::test]
async fn save_fetch_and_clear_round_trip() {
	let store = MemoryStore::default();

	assert_eq!(store.fetch().await.expect("Fetching an empty slot should succeed."), None);

	store.save(BearerToken::new("access-1")).await.expect("Saving a token should succeed.");

	let fetched = store
		.fetch()
		.await
		.expect("Fetching the stored token should succeed.")
		.expect("Stored token should remain present.");

	assert_eq!(fetched.expose(), "access-1");

	let cleared = store.clear().await.expect("Clearing the slot should succeed.");

	assert_eq!(cleared, Some(BearerToken::new("access-1")));
	assert_eq!(store.current(), None);
}

#[tokio::test]
async fn clones_share_the_same_slot() {
	let store = MemoryStore::default();
	let clone = store.clone();

	clone.save(BearerToken::new("shared")).await.expect("Saving through a clone should succeed.");

	assert_eq!(store.current(), Some(BearerToken::new("shared")));
}

#[tokio::test]
async fn cas_success_mismatch_and_missing() {
	let store = MemoryStore::with_token("access-old");
	let old = BearerToken::new("access-old");
	let outcome = store
		.compare_and_swap(Some(&old), BearerToken::new("access-new"))
		.await
		.expect("CAS should succeed when tokens match.");

	assert_eq!(outcome, CompareAndSwapOutcome::Updated);
	assert_eq!(store.current(), Some(BearerToken::new("access-new")));

	let mismatch = store
		.compare_and_swap(Some(&old), BearerToken::new("access-stale"))
		.await
		.expect("CAS should report a mismatch when tokens differ.");

	assert_eq!(mismatch, CompareAndSwapOutcome::Mismatch);
	assert_eq!(store.current(), Some(BearerToken::new("access-new")));

	store.clear().await.expect("Clearing the slot should succeed.");

	let missing = store
		.compare_and_swap(Some(&old), BearerToken::new("access-late"))
		.await
		.expect("CAS should report a missing token for an empty slot.");

	assert_eq!(missing, CompareAndSwapOutcome::Missing);
	assert_eq!(store.current(), None);
}

#[tokio::test]
async fn cas_on_empty_slot_matches_absent_expectation() {
	let store = MemoryStore::default();
	let outcome = store
		.compare_and_swap(None, BearerToken::new("first"))
		.await
		.expect("CAS should succeed when both sides are empty.");

	assert_eq!(outcome, CompareAndSwapOutcome::Updated);

	let occupied = store
		.compare_and_swap(None, BearerToken::new("second"))
		.await
		.expect("CAS should report a mismatch once the slot is occupied.");

	assert_eq!(occupied, CompareAndSwapOutcome::Mismatch);
	assert_eq!(store.current(), Some(BearerToken::new("first")));
}

#[tokio::test]
async fn concurrent_cas_allows_single_winner() {
	let store = MemoryStore::with_token("base");
	let store_a = store.clone();
	let store_b = store.clone();
	let task_a = tokio::spawn(async move {
		store_a
			.compare_and_swap(Some(&BearerToken::new("base")), BearerToken::new("token-a"))
			.await
			.expect("CAS task A should complete successfully.")
	});
	let task_b = tokio::spawn(async move {
		store_b
			.compare_and_swap(Some(&BearerToken::new("base")), BearerToken::new("token-b"))
			.await
			.expect("CAS task B should complete successfully.")
	});
	let (outcome_a, outcome_b) = tokio::join!(task_a, task_b);
	let outcome_a = outcome_a.expect("CAS task A should not panic.");
	let outcome_b = outcome_b.expect("CAS task B should not panic.");
	let successes = [outcome_a, outcome_b]
		.iter()
		.filter(|outcome| matches!(outcome, CompareAndSwapOutcome::Updated))
		.count();

	assert_eq!(successes, 1, "only one CAS should succeed");
	assert!(matches!(
		store.current().as_ref().map(BearerToken::expose),
		Some("token-a") | Some("token-b")
	));
}
