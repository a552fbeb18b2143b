//! Request handlers for the API endpoints.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use chrono::Local;

use super::AppState;
use super::types::{ApplianceRecord, ErrorResponse, ReadingRequest, ReadingResponse};
use crate::price::PricePoint;
use crate::service::ServiceError;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// `GET /prices` → 200 + `Vec<PricePoint>` JSON
pub async fn get_prices(State(state): State<AppState>) -> Json<Vec<PricePoint>> {
    Json(state.service.prices().snapshot().points().to_vec())
}

/// `POST /prices/reset` → 200 + the relabeled day
pub async fn reset_prices(State(state): State<AppState>) -> Json<Vec<PricePoint>> {
    let prices = state.service.prices();
    prices.reset_to_normal();
    Json(prices.snapshot().points().to_vec())
}

/// `GET /appliances` → 200 + `Vec<ApplianceRecord>` JSON
pub async fn get_appliances(State(state): State<AppState>) -> Json<Vec<ApplianceRecord>> {
    Json(
        state
            .service
            .registry()
            .iter()
            .map(ApplianceRecord::from)
            .collect(),
    )
}

/// Accepts a reading and runs an evaluation when an average is present.
///
/// `POST /readings` → 200 + `ReadingResponse`
/// malformed body → rejection status + `ErrorResponse`
/// negative or NaN reading → 400 + `ErrorResponse`
/// unreachable appliance → 502 + `ErrorResponse`
pub async fn post_reading(
    State(state): State<AppState>,
    body: Result<Json<ReadingRequest>, JsonRejection>,
) -> Result<Json<ReadingResponse>, ApiError> {
    let Json(reading) = body.map_err(|e| error(e.status(), e.body_text()))?;
    let service = &state.service;

    if let Some(kw) = reading.active_power {
        service
            .record_active_load(kw)
            .map_err(|e| error(StatusCode::BAD_REQUEST, e.to_string()))?;
    }

    let intent = match reading.estimated_consumption {
        Some(kwh) => service
            .record_average(kwh, Local::now())
            .await
            .map_err(|e| {
                let status = match &e {
                    ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                    ServiceError::Dispatch(_) | ServiceError::Feed(_) => StatusCode::BAD_GATEWAY,
                };
                error(status, e.to_string())
            })?,
        None => None,
    };

    Ok(Json(ReadingResponse { intent }))
}

fn error(status: StatusCode, message: String) -> ApiError {
    (status, Json(ErrorResponse { error: message }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::appliance::{ApplianceSpec, Category, Registry, Status};
    use crate::capacity::CapacityLimits;
    use crate::dispatch::MockDispatcher;
    use crate::feed::PriceFeed;
    use crate::price::{BandConfig, DayPrices};
    use crate::service::{Service, ServiceSettings};

    fn make_test_state() -> AppState {
        let settings = ServiceSettings {
            limits: CapacityLimits::new(5.0, 5.0),
            bands: BandConfig {
                low_hours: 2,
                high_hours: 2,
            },
            // every reading evaluates
            min_interval: Duration::ZERO,
            poll_interval: Duration::from_secs(60),
        };
        let registry = Registry::from_specs(&[ApplianceSpec {
            name: "Floor".to_string(),
            category: Category::Kitchen,
            priority: 0,
            status: Status::Off,
            status_url: "http://floor.local/status".to_string(),
            start_url: "http://floor.local/start".to_string(),
            stop_url: "http://floor.local/stop".to_string(),
            wattage: 1000,
        }])
        .expect("valid spec");
        let service = Service::new(
            settings,
            registry,
            PriceFeed::offline(),
            Arc::new(MockDispatcher::new()),
        );
        let prices: Vec<(u32, f64)> = (0..24).map(|h| (h, f64::from(h))).collect();
        service
            .prices()
            .install(DayPrices::from_pairs(prices).expect("valid hours"), settings.bands);
        AppState {
            service: Arc::new(service),
        }
    }

    async fn send(state: AppState, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = router(state).oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn prices_list_the_banded_day() {
        let req = Request::builder().uri("/prices").body(Body::empty()).unwrap();
        let (status, json) = send(make_test_state(), req).await;

        assert_eq!(status, StatusCode::OK);
        let points = json.as_array().unwrap();
        assert_eq!(points.len(), 24);
        assert_eq!(points[0]["band"], "Low");
        assert_eq!(points[23]["band"], "High");
        assert_eq!(points[12]["band"], "Normal");
    }

    #[tokio::test]
    async fn reset_makes_every_hour_normal() {
        let state = make_test_state();
        let (status, json) = send(state.clone(), post_json("/prices/reset", "")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(json.as_array().unwrap().iter().all(|p| p["band"] == "Normal"));
        assert!(state.service.prices().snapshot().hours_in(crate::price::PriceBand::Low).is_empty());
    }

    #[tokio::test]
    async fn appliances_are_listed() {
        let req = Request::builder().uri("/appliances").body(Body::empty()).unwrap();
        let (status, json) = send(make_test_state(), req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json[0]["name"], "Floor");
        assert_eq!(json[0]["category"], "Kitchen");
        assert_eq!(json[0]["status"], "Off");
        assert_eq!(json[0]["kilowatts"], 1.0);
    }

    #[tokio::test]
    async fn load_alone_is_latched_without_an_intent() {
        let (status, json) = send(
            make_test_state(),
            post_json("/readings", r#"{"active_power": 1.0}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["intent"].is_null());
    }

    #[tokio::test]
    async fn negative_reading_returns_400() {
        let (status, json) = send(
            make_test_state(),
            post_json("/readings", r#"{"active_power": -1.0}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json.get("error").is_some());

        let (status, _) = send(
            make_test_state(),
            post_json(
                "/readings",
                r#"{"active_power": 1.0, "estimated_consumption": -2.0}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_reading_returns_json_error() {
        let (status, json) = send(
            make_test_state(),
            post_json("/readings", r#"{"active_power": "lots"}"#),
        )
        .await;
        assert!(status.is_client_error());
        assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()));
    }
}
