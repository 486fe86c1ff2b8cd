//! Behavior-driven tests for the typed endpoint methods: paths, pagination,
//! tag normalization and record validation.

use clashgate_core::{ApiTimestamp, ClientError, PageRequest, ValidationError};
use clashgate_tests::{async_client, config, json, ScriptedHttpClient};
use serde_json::json;

const BASE: &str = "https://api.clashofclans.com/v1";

#[tokio::test]
async fn player_lookup_normalizes_tag_and_decodes_record() {
    // Given: A player payload with extra fields the record does not model
    let http = ScriptedHttpClient::new([json(
        200,
        json!({
            "tag": "#2PP",
            "name": "Chief",
            "townHallLevel": 15,
            "expLevel": 220,
            "trophies": 5000,
            "clan": {"tag": "#ABC", "name": "Test Clan"},
            "heroes": [{"name": "Barbarian King", "level": 90}]
        }),
    )]);
    let (client, _) = async_client(config(0), &http);

    // When: The tag is given in lower case without '#'
    let player = client.player("2pp").await.expect("valid player");

    // Then
    assert_eq!(http.requests()[0].url, format!("{BASE}/players/%232PP"));
    assert_eq!(player.name, "Chief");
    assert_eq!(player.town_hall_level, Some(15));
    assert_eq!(player.clan.map(|clan| clan.tag), Some(String::from("#ABC")));
}

#[tokio::test]
async fn member_listing_sends_pagination_and_exposes_next_cursor() {
    // Given
    let http = ScriptedHttpClient::new([json(
        200,
        json!({
            "items": [
                {"tag": "#P1", "name": "One", "role": "leader"},
                {"tag": "#P2", "name": "Two", "role": "member"}
            ],
            "paging": {"cursors": {"after": "eyJwb3MiOjJ9"}}
        }),
    )]);
    let (client, _) = async_client(config(0), &http);

    // When
    let page = client
        .clan_members("#abc", &PageRequest::new().limit(2))
        .await
        .expect("valid page");

    // Then
    let request = &http.requests()[0];
    assert_eq!(request.url, format!("{BASE}/clans/%23ABC/members"));
    assert_eq!(
        request.query,
        vec![(String::from("limit"), String::from("2"))]
    );
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].role.as_deref(), Some("leader"));
    assert_eq!(page.after(), Some("eyJwb3MiOjJ9"));
}

#[tokio::test]
async fn gold_pass_timestamps_are_parsed() {
    // Given
    let http = ScriptedHttpClient::new([json(
        200,
        json!({"startTime": "20240101T080000.000Z", "endTime": "20240201T080000.000Z"}),
    )]);
    let (client, _) = async_client(config(0), &http);

    // When
    let season = client.current_goldpass().await.expect("valid season");

    // Then
    assert_eq!(
        http.requests()[0].url,
        format!("{BASE}/goldpass/seasons/current")
    );
    assert_eq!(
        season.start_time,
        ApiTimestamp::parse("20240101T080000.000Z").expect("valid timestamp")
    );
    assert!(season.end_time.into_inner() > season.start_time.into_inner());
}

#[tokio::test]
async fn war_endpoints_tolerate_missing_opponent() {
    // Given: A clan that is not in war
    let http = ScriptedHttpClient::new([json(200, json!({"state": "notInWar"}))]);
    let (client, _) = async_client(config(0), &http);

    // When
    let war = client.current_war("#ABC").await.expect("valid war");

    // Then
    assert_eq!(http.requests()[0].url, format!("{BASE}/clans/%23ABC/currentwar"));
    assert_eq!(war.state.as_deref(), Some("notInWar"));
    assert!(war.opponent.is_none());
}

#[tokio::test]
async fn ranking_and_league_routes_use_ids_in_path() {
    // Given
    let http = ScriptedHttpClient::new([
        json(
            200,
            json!({"items": [{"tag": "#C1", "name": "Top", "rank": 1, "clanCapitalPoints": 9000}]}),
        ),
        json(200, json!({"items": [{"id": "2024-01"}]})),
        json(200, json!({"items": [{"id": 29000022, "name": "Legend League"}]})),
    ]);
    let (client, _) = async_client(config(0), &http);

    // When
    let capital = client
        .location_capital_rankings(32000007, &PageRequest::new())
        .await
        .expect("valid rankings");
    let seasons = client
        .league_seasons(29000022, &PageRequest::new())
        .await
        .expect("valid seasons");
    let leagues = client
        .cwl_leagues(&PageRequest::new())
        .await
        .expect("valid leagues");

    // Then
    let urls: Vec<String> = http.requests().into_iter().map(|request| request.url).collect();
    assert_eq!(
        urls,
        vec![
            format!("{BASE}/locations/32000007/rankings/capital"),
            format!("{BASE}/leagues/29000022/seasons"),
            format!("{BASE}/clanwarleagues/warleagues"),
        ]
    );
    assert_eq!(capital.items[0].capital_points, Some(9000));
    assert_eq!(seasons.items[0].id, "2024-01");
    assert_eq!(leagues.items[0].name, "Legend League");
}

#[tokio::test]
async fn invalid_arguments_fail_before_any_request() {
    // Given
    let http = ScriptedHttpClient::new([]);
    let (client, _) = async_client(config(0), &http);

    // When
    let empty_tag = client.clan("  #  ").await;
    let bad_limit = client.leagues(&PageRequest::new().limit(0)).await;

    // Then
    assert!(matches!(
        empty_tag,
        Err(ClientError::Validation(ValidationError::EmptyTag))
    ));
    assert!(matches!(
        bad_limit,
        Err(ClientError::Validation(ValidationError::NonPositiveLimit { value: 0 }))
    ));
    assert_eq!(http.calls(), 0);
}

#[tokio::test]
async fn payload_missing_required_fields_is_a_validation_error() {
    // Given: A clan payload without a name
    let http = ScriptedHttpClient::new([json(200, json!({"tag": "#ABC"}))]);
    let (client, _) = async_client(config(0), &http);

    // When
    let result = client.clan("#ABC").await;

    // Then
    match result {
        Err(ClientError::Validation(ValidationError::Payload { record, reason })) => {
            assert!(record.ends_with("Clan"), "record was {record}");
            assert!(reason.contains("name"), "reason was {reason}");
        }
        other => panic!("expected payload validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn api_errors_surface_through_typed_methods() {
    // Given
    let http = ScriptedHttpClient::new([json(404, json!({"reason": "notFound"}))]);
    let (client, _) = async_client(config(0), &http);

    // When
    let error = client.player("#NOPE").await.expect_err("not found");

    // Then
    let api = error.as_api().expect("api error");
    assert_eq!(api.kind(), clashgate_core::ApiErrorKind::NotFound);
}
