//! Behavior-driven tests for response caching through the clients.

use std::sync::Arc;
use std::time::Duration;

use clashgate_core::{HttpMethod, JsonObject, ManualClock, Params, PageRequest, TtlCache};
use clashgate_tests::{
    async_client, async_client_with_cache, config, json, status, ScriptedHttpClient,
};
use serde_json::json;

fn manual_cache(clock: &Arc<ManualClock>, ttl: Duration) -> Arc<TtlCache<JsonObject>> {
    Arc::new(TtlCache::with_clock(true, ttl, clock.clone()))
}

#[tokio::test]
async fn when_same_get_is_repeated_second_one_is_served_from_cache() {
    // Given: A single scripted response
    let http = ScriptedHttpClient::new([json(200, json!({"tag": "#2PP", "name": "Chief"}))]);
    let (client, _) = async_client(config(0), &http);

    // When: The same request is made twice
    let first = client
        .execute(HttpMethod::Get, "/players/%232PP", None)
        .await
        .expect("network");
    let second = client
        .execute(HttpMethod::Get, "/players/%232PP", None)
        .await
        .expect("cache");

    // Then: Only one attempt reached the transport
    assert_eq!(first, second);
    assert_eq!(http.calls(), 1);
    assert_eq!(client.cache().len(), 1);
}

#[tokio::test]
async fn when_params_differ_only_in_order_cache_key_matches() {
    // Given
    let http = ScriptedHttpClient::new([json(200, json!({"items": []}))]);
    let (client, _) = async_client(config(0), &http);

    // When
    client
        .execute(
            HttpMethod::Get,
            "/locations",
            Some(Params::new().with("limit", 2).with("after", "x")),
        )
        .await
        .expect("network");
    client
        .execute(
            HttpMethod::Get,
            "/locations",
            Some(Params::new().with("after", "x").with("limit", 2)),
        )
        .await
        .expect("cache");

    // Then
    assert_eq!(http.calls(), 1);
}

#[tokio::test]
async fn when_entry_expires_next_request_goes_to_network() {
    // Given: A cache driven by a manual clock with a 30s TTL
    let clock = Arc::new(ManualClock::new());
    let http = ScriptedHttpClient::new([
        json(200, json!({"name": "first"})),
        json(200, json!({"name": "second"})),
    ]);
    let cache = manual_cache(&clock, Duration::from_secs(30));
    let client = async_client_with_cache(config(0), &http, cache);

    // When: Time passes beyond the TTL between two identical requests
    client
        .execute(HttpMethod::Get, "/clans/%23ABC", None)
        .await
        .expect("network");
    clock.advance(Duration::from_secs(29));
    let cached = client
        .execute(HttpMethod::Get, "/clans/%23ABC", None)
        .await
        .expect("cache");
    clock.advance(Duration::from_secs(1));
    let refreshed = client
        .execute(HttpMethod::Get, "/clans/%23ABC", None)
        .await
        .expect("network again");

    // Then
    assert_eq!(cached["name"], "first");
    assert_eq!(refreshed["name"], "second");
    assert_eq!(http.calls(), 2);
}

#[tokio::test]
async fn when_cache_is_disabled_every_request_hits_network() {
    // Given
    let http = ScriptedHttpClient::new([json(200, json!({})), json(200, json!({}))]);
    let (client, _) = async_client(
        config(0).with_cache(false, Duration::from_secs(30)),
        &http,
    );

    // When
    for _ in 0..2 {
        client
            .execute(HttpMethod::Get, "/leagues", None)
            .await
            .expect("ok");
    }

    // Then
    assert_eq!(http.calls(), 2);
    assert!(client.cache().is_empty());
}

#[tokio::test]
async fn when_cache_is_turned_off_at_runtime_entries_are_dropped() {
    // Given: A warm cache
    let http = ScriptedHttpClient::new([json(200, json!({})), json(200, json!({}))]);
    let (client, _) = async_client(config(0), &http);
    client
        .execute(HttpMethod::Get, "/leagues", None)
        .await
        .expect("ok");
    assert_eq!(client.cache().len(), 1);

    // When
    client.cache().set_enabled(false);
    client.cache().set_enabled(true);
    client
        .execute(HttpMethod::Get, "/leagues", None)
        .await
        .expect("ok");

    // Then
    assert_eq!(http.calls(), 2);
}

#[tokio::test]
async fn failures_and_non_get_requests_are_not_cached() {
    // Given
    let http = ScriptedHttpClient::new([
        status(404),
        json(200, json!({"name": "found"})),
        json(200, json!({})),
        json(200, json!({})),
    ]);
    let (client, _) = async_client(config(0), &http);

    // When
    let missing = client.execute(HttpMethod::Get, "/clans/%23ABC", None).await;
    let found = client
        .execute(HttpMethod::Get, "/clans/%23ABC", None)
        .await
        .expect("second call hits network");
    for _ in 0..2 {
        client
            .execute(HttpMethod::Post, "/players/%23ABC/verifytoken", None)
            .await
            .expect("ok");
    }

    // Then
    assert!(missing.is_err());
    assert_eq!(found["name"], "found");
    assert_eq!(http.calls(), 4);
}

#[tokio::test]
async fn clones_share_one_cache() {
    // Given
    let http = ScriptedHttpClient::new([json(200, json!({"items": []}))]);
    let (client, _) = async_client(config(0), &http);
    let clone = client.clone();

    // When
    client
        .locations(&PageRequest::new())
        .await
        .expect("network");
    clone
        .locations(&PageRequest::new())
        .await
        .expect("cache");

    // Then
    assert_eq!(http.calls(), 1);
}
