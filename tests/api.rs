//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use homeload::api::{AppState, router};
use homeload::appliance::{Registry, Status};
use homeload::config::HomeConfig;
use homeload::dispatch::MockDispatcher;
use homeload::feed::PriceFeed;
use homeload::price::BandConfig;
use homeload::service::{Service, ServiceSettings};

fn build_state(mock: Arc<MockDispatcher>) -> AppState {
    let settings = ServiceSettings {
        limits: common::limits(),
        bands: BandConfig {
            low_hours: 4,
            high_hours: 3,
        },
        min_interval: Duration::ZERO,
        poll_interval: Duration::from_secs(60),
    };
    let registry = Registry::from_specs(&[
        common::spec("Water heater", -1, Status::Off, 2000),
        common::spec("Floor", 0, Status::Off, 1500),
    ])
    .expect("valid specs");
    AppState {
        service: Arc::new(Service::new(settings, registry, PriceFeed::offline(), mock)),
    }
}

async fn call(state: &AppState, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = router(state.clone()).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn post_reading(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/readings")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn reading_dispatches_and_updates_the_listing() {
    let mock = Arc::new(MockDispatcher::new());
    let state = build_state(Arc::clone(&mock));

    // unbanded prices: every hour runs the Normal rules
    let (status, json) = call(
        &state,
        post_reading(r#"{"active_power": 1.0, "estimated_consumption": 1.0}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["intent"]["action"], "start");
    assert_eq!(json["intent"]["appliance"], "Floor");
    assert_eq!(mock.calls().len(), 1);

    let (_, appliances) = call(&state, get("/appliances")).await;
    let floor = appliances
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["name"] == "Floor")
        .unwrap();
    assert_eq!(floor["status"], "On");
    assert_eq!(floor["priority"], 0);
}

#[tokio::test]
async fn split_readings_evaluate_on_the_average() {
    let mock = Arc::new(MockDispatcher::new());
    let state = build_state(Arc::clone(&mock));

    let (_, first) = call(&state, post_reading(r#"{"active_power": 1.0}"#)).await;
    assert!(first["intent"].is_null());
    assert!(mock.calls().is_empty());

    let (_, second) = call(&state, post_reading(r#"{"estimated_consumption": 1.0}"#)).await;
    assert_eq!(second["intent"]["appliance"], "Floor");
}

#[tokio::test]
async fn negative_average_is_rejected() {
    let mock = Arc::new(MockDispatcher::new());
    let state = build_state(Arc::clone(&mock));

    let (status, json) = call(
        &state,
        post_reading(r#"{"active_power": 1.0, "estimated_consumption": -0.5}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().is_some());
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn malformed_body_is_a_client_error() {
    let state = build_state(Arc::new(MockDispatcher::new()));
    let (status, json) = call(&state, post_reading(r#"{"active_power": "lots"}"#)).await;
    assert!(status.is_client_error());
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn prices_default_to_a_flat_normal_day() {
    let state = build_state(Arc::new(MockDispatcher::new()));
    // offline feed: nothing to rank, so no hour is banded
    state
        .service
        .refresh_prices(chrono::Local::now())
        .await
        .expect("offline refresh");
    let (status, json) = call(&state, get("/prices")).await;

    assert_eq!(status, StatusCode::OK);
    let points = json.as_array().unwrap();
    assert_eq!(points.len(), 24);
    assert!(points.iter().all(|p| p["band"] == "Normal" && p["value"] == 0.0));
}

#[tokio::test]
async fn demo_config_builds_a_serving_state() {
    let config = HomeConfig::demo();
    let service = Service::new(
        ServiceSettings::from_config(&config),
        config.registry().expect("demo registry"),
        PriceFeed::offline(),
        Arc::new(MockDispatcher::new()),
    );
    let state = AppState {
        service: Arc::new(service),
    };
    let (status, json) = call(&state, get("/appliances")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().map(Vec::len), Some(4));
}
