//! Integration tests for competitor discovery
//!
//! The model is mocked; branches come from the in-memory store.

mod fixtures;

use std::sync::Arc;

use fixtures::*;
use scout::core::DiscoveryOrchestrator;
use scout::services::InMemoryGateway;
use scout::{FailureKind, MockModelClient, MockPersistenceGateway, ScoutError};
use shared::RoomType;

const TWO_CANDIDATES: &str = r#"```json
[
  {
    "name": "Los Patios Hostel",
    "searchName": "Los Patios Hostel Medellín",
    "bookingComUrl": "https://www.booking.com/hotel/co/los-patios.html",
    "reasoning": "Same neighbourhood, social crowd",
    "confidence": 0.9
  },
  {
    "name": "Selina Medellín",
    "hostelworldUrl": "https://www.hostelworld.com/hostels/p/1/selina",
    "reasoning": "Brand competitor"
  }
]
```"#;

fn orchestrator(model: MockModelClient, gateway: Arc<InMemoryGateway>) -> DiscoveryOrchestrator<MockModelClient, InMemoryGateway> {
    DiscoveryOrchestrator::new(Arc::new(model), gateway)
}

#[tokio::test]
async fn test_discovery_returns_parsed_candidates() {
    let mut model = MockModelClient::new();
    model
        .expect_call()
        .withf(|prompt, context| {
            context == "competitor-discovery"
                && prompt.contains("City: Medellín")
                && prompt.contains("Casa Verde Hostels")
                && prompt.contains("dorm bed")
                && prompt.contains("5 most important")
        })
        .times(1)
        .returning(|_, _| Ok(TWO_CANDIDATES.to_string()));

    let candidates = orchestrator(model, store_with(vec![]).await)
        .discover_competitors(BRANCH_ID, RoomType::Dorm, 5)
        .await
        .unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].name, "Los Patios Hostel");
    assert_eq!(candidates[0].confidence, Some(0.9));
    assert_eq!(
        candidates[1].hostelworld_url.as_deref(),
        Some("https://www.hostelworld.com/hostels/p/1/selina")
    );
    assert_eq!(candidates[1].booking_com_url, None);
}

#[tokio::test]
async fn test_fenced_and_bare_output_parse_the_same() {
    let bare = TWO_CANDIDATES
        .trim_start_matches("```json")
        .trim_end_matches("```")
        .to_string();

    let mut results = Vec::new();
    for raw in [TWO_CANDIDATES.to_string(), bare] {
        let mut model = MockModelClient::new();
        model.expect_call().returning(move |_, _| Ok(raw.clone()));
        let candidates = orchestrator(model, store_with(vec![]).await)
            .discover_competitors(BRANCH_ID, RoomType::Private, 10)
            .await
            .unwrap();
        results.push(candidates);
    }
    assert_eq!(results[0], results[1]);
}

#[tokio::test]
async fn test_wrapped_and_empty_answers() {
    let cases = vec![
        (r#"{"competitors": [{"name": "Black Sheep"}]}"#, 1),
        (r#"{"data": [{"name": "Black Sheep"}, {"name": "Happy Buddha"}]}"#, 2),
        (r#"{"message": "nothing nearby"}"#, 0),
        ("[]", 0),
    ];

    for (raw, expected) in cases {
        let mut model = MockModelClient::new();
        model.expect_call().returning(move |_, _| Ok(raw.to_string()));
        let candidates = orchestrator(model, store_with(vec![]).await)
            .discover_competitors(BRANCH_ID, RoomType::Dorm, 10)
            .await
            .unwrap();
        assert_eq!(candidates.len(), expected, "Failed for output: {}", raw);
    }
}

#[tokio::test]
async fn test_unknown_branch_is_not_found_without_model_call() {
    let mut model = MockModelClient::new();
    model.expect_call().never();

    let result = orchestrator(model, store_with(vec![]).await)
        .discover_competitors(999, RoomType::Dorm, 10)
        .await;
    assert!(matches!(result, Err(ScoutError::NotFound { entity: "Branch", id: 999 })));
}

#[tokio::test]
async fn test_branch_without_city_is_missing_data() {
    for city in [None, Some("   ")] {
        let gateway = Arc::new(InMemoryGateway::new());
        gateway.insert_branch(BRANCH_ID, branch_in(city)).await;

        let mut model = MockModelClient::new();
        model.expect_call().never();

        let result = orchestrator(model, gateway)
            .discover_competitors(BRANCH_ID, RoomType::Dorm, 10)
            .await;
        assert!(matches!(result, Err(ScoutError::MissingData { .. })), "city {city:?}");
    }
}

#[tokio::test]
async fn test_zero_max_competitors_is_rejected() {
    let mut model = MockModelClient::new();
    model.expect_call().never();
    let mut gateway = MockPersistenceGateway::new();
    gateway.expect_get_branch_with_organization().never();

    let result = DiscoveryOrchestrator::new(Arc::new(model), Arc::new(gateway))
        .discover_competitors(BRANCH_ID, RoomType::Dorm, 0)
        .await;
    assert!(matches!(result, Err(ScoutError::InvalidRequest { .. })));
}

#[tokio::test]
async fn test_model_failures_are_classified() {
    let cases = vec![
        (ScoutError::Unauthorized, FailureKind::Unauthorized),
        (ScoutError::RateLimitExceeded { attempts: 3 }, FailureKind::RateLimit),
        (ScoutError::Timeout, FailureKind::Timeout),
        (ScoutError::config("OPENAI_API_KEY is not set"), FailureKind::Config),
        (ScoutError::HttpError { status: 500, body: String::new() }, FailureKind::Generic),
    ];

    for (error, expected) in cases {
        let mut model = MockModelClient::new();
        model.expect_call().times(1).return_once(move |_, _| Err(error));

        let err = orchestrator(model, store_with(vec![]).await)
            .discover_competitors(BRANCH_ID, RoomType::Dorm, 10)
            .await
            .unwrap_err();

        match &err {
            ScoutError::DiscoveryFailed { branch_id, kind, .. } => {
                assert_eq!(*branch_id, BRANCH_ID);
                assert_eq!(*kind, expected);
            }
            other => panic!("expected DiscoveryFailed, got {other:?}"),
        }
        assert!(err.to_string().contains(expected.user_message()));
    }
}

#[tokio::test]
async fn test_unparseable_output_is_a_parse_error() {
    let mut model = MockModelClient::new();
    model
        .expect_call()
        .returning(|_, _| Ok("Sorry, I cannot browse the web.".to_string()));

    let result = orchestrator(model, store_with(vec![]).await)
        .discover_competitors(BRANCH_ID, RoomType::Dorm, 10)
        .await;
    assert!(matches!(result, Err(ScoutError::ParseError { .. })));
}
