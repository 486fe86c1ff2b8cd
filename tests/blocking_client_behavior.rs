//! Behavior-driven tests for the blocking client. It shares the engine with
//! the async client, so these focus on parity rather than every status.

use std::sync::Arc;
use std::thread;

use clashgate_core::{ApiErrorKind, HttpMethod, PageRequest};
use clashgate_tests::{
    blocking_client, config, json, rate_limited, secs, status, transport_error,
    ScriptedHttpClient,
};
use serde_json::json;

#[test]
fn blocking_client_retries_with_same_schedule() {
    // Given
    let http = ScriptedHttpClient::new([
        transport_error("timed out"),
        status(500),
        rate_limited("3"),
        json(200, json!({"tag": "#ABC", "name": "Test Clan"})),
    ]);
    let (client, sleeper) = blocking_client(config(3), &http);

    // When
    let clan = client.clan("#abc").expect("fourth attempt succeeds");

    // Then: 1s, 2s, then max(3s hint, 4s backoff)
    assert_eq!(clan.name, "Test Clan");
    assert_eq!(sleeper.calls(), vec![secs(1), secs(2), secs(4)]);
    assert_eq!(http.calls(), 4);
}

#[test]
fn blocking_client_classifies_errors_like_async_client() {
    // Given
    let http = ScriptedHttpClient::new([status(403), status(404), rate_limited("7")]);
    let (client, _) = blocking_client(config(0), &http);

    // When
    let kinds: Vec<ApiErrorKind> = ["/a", "/b", "/c"]
        .into_iter()
        .map(|path| {
            client
                .execute(HttpMethod::Get, path, None)
                .expect_err("scripted failure")
                .kind()
        })
        .collect();

    // Then
    assert_eq!(
        kinds,
        vec![
            ApiErrorKind::Unauthorized,
            ApiErrorKind::NotFound,
            ApiErrorKind::RateLimited
        ]
    );
}

#[test]
fn blocking_client_is_shareable_across_threads() {
    // Given: One response; the cache serves every other caller
    let http = ScriptedHttpClient::new([json(200, json!({"items": []}))]);
    let (client, _) = blocking_client(config(0), &http);
    let client = Arc::new(client);
    client
        .clan_labels(&PageRequest::new())
        .expect("warm the cache");

    // When
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let client = Arc::clone(&client);
            thread::spawn(move || {
                client
                    .clan_labels(&PageRequest::new())
                    .map(|page| page.items.len())
            })
        })
        .collect();

    // Then
    for handle in handles {
        let items = handle
            .join()
            .expect("thread")
            .expect("served from cache");
        assert_eq!(items, 0);
    }
    assert_eq!(http.calls(), 1);
}
