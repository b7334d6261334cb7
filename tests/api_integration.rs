//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use honeybee_energy::api::{AppState, router};

use common::office_model;

fn build_api_state() -> Arc<AppState> {
    let dir = tempfile::tempdir().unwrap();
    Arc::new(AppState::new(office_model(), dir.path()).unwrap())
}

async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(build_api_state());
    let resp = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn model_summary_counts() {
    let (status, json) = get_json("/model").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Small Office");
    assert_eq!(json["room_count"], 2);
    let area = json["floor_area"].as_f64().unwrap();
    assert!((area - 160.0).abs() < 1e-6);
    assert!(json["schedule_count"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn rooms_in_model_order() {
    let (status, json) = get_json("/rooms").await;
    assert_eq!(status, StatusCode::OK);
    let rooms = json.as_array().unwrap();
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0]["name"], "Office");
    assert_eq!(rooms[0]["conditioned"], true);
    assert_eq!(rooms[1]["name"], "Plenum");
    assert_eq!(rooms[1]["conditioned"], false);
    assert_eq!(rooms[1]["program_type"], "Plenum");
}

#[tokio::test]
async fn idf_matches_state() {
    let state = build_api_state();
    let expected = state.idf.clone();
    let app = router(state);
    let resp = app
        .oneshot(Request::get("/idf").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(String::from_utf8(body.to_vec()).unwrap(), expected);
}

#[tokio::test]
async fn occupancy_schedule_first_day() {
    // The year starts on a Sunday, which has no occupancy.
    let (status, json) = get_json("/schedules/Generic%20Office%20Occupancy?to=23").await;
    assert_eq!(status, StatusCode::OK);
    let values = json["values"].as_array().unwrap();
    assert_eq!(values.len(), 24);
    assert!(values.iter().all(|v| v.as_f64() == Some(0.0)));
}

#[tokio::test]
async fn schedule_errors() {
    let (status, json) = get_json("/schedules/Generic%20Office%20Occupancy?from=20&to=10").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    let (status, _) = get_json("/schedules/Unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
