//! HTTP request handlers for each API endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use super::AppState;
use super::types::{ErrorResponse, ModelSummary, RoomSummary, ScheduleQuery, ScheduleValues};

/// `GET /model`: returns the model summary.
pub async fn get_model(State(state): State<Arc<AppState>>) -> Json<ModelSummary> {
    Json(ModelSummary::from(&state.model))
}

/// `GET /idf`: returns the translated model as plain text.
pub async fn get_idf(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.idf.clone(),
    )
}

/// `GET /rooms`: returns one summary per room in model order.
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummary>> {
    Json(state.model.rooms.iter().map(RoomSummary::from).collect())
}

/// `GET /schedules/{name}`: returns hourly values for a schedule.
///
/// Supports optional `from` and `to` hour-of-year parameters (inclusive).
/// A `to` past the end of the year is clamped to the last hour.
/// Returns 404 for an unknown schedule and 400 if `from > to` or the
/// schedule cannot be evaluated.
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<ScheduleQuery>,
) -> Response {
    let Some(schedule) = state
        .model
        .schedules()
        .into_iter()
        .find(|s| s.name() == name)
    else {
        return error(StatusCode::NOT_FOUND, format!("schedule \"{name}\" not found"));
    };

    let values = match schedule.annual_values(1) {
        Ok(v) => v,
        Err(e) => return error(StatusCode::BAD_REQUEST, e.to_string()),
    };
    let last = values.len().saturating_sub(1);
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(last).min(last);

    if from > to {
        return error(
            StatusCode::BAD_REQUEST,
            format!("from ({from}) must be <= to ({to})"),
        );
    }

    Json(ScheduleValues {
        name,
        from,
        to,
        values: values[from..=to].to_vec(),
    })
    .into_response()
}

fn error(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

#[cfg(test)]
mod tests {
    use super::super::router;
    use super::*;
    use crate::geometry::{Model, Point3D, Room, RoomEnergyProperties};
    use crate::library::programs::office_program;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    fn test_state() -> Arc<AppState> {
        let mut room = Room::from_box("Office", 10.0, 8.0, 3.0, Point3D::default()).unwrap();
        room.energy = RoomEnergyProperties::new(office_program().unwrap());
        room.energy.add_default_ideal_air();
        let model = Model::new("Test Building", vec![room]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        Arc::new(AppState::new(model, dir.path()).unwrap())
    }

    async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
        let app = router(test_state());
        let resp = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn model_returns_200() {
        let (status, body) = get("/model").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["name"], "Test Building");
        assert_eq!(json["room_count"], 1);
    }

    #[tokio::test]
    async fn idf_is_plain_text() {
        let (status, body) = get("/idf").await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("Zone,"));
        assert!(text.contains("BuildingSurface:Detailed,"));
    }

    #[tokio::test]
    async fn rooms_lists_conditioned_room() {
        let (status, body) = get("/rooms").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json[0]["name"], "Office");
        assert_eq!(json[0]["conditioned"], true);
    }

    #[tokio::test]
    async fn schedule_range_is_inclusive() {
        let uri = "/schedules/Generic%20Office%20Occupancy?from=8&to=11";
        let (status, body) = get(uri).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["values"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn schedule_to_is_clamped() {
        let uri = "/schedules/Generic%20Office%20Occupancy?from=8750&to=99999";
        let (status, body) = get(uri).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["to"], 8759);
        assert_eq!(json["values"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn schedule_from_gt_to_returns_400() {
        let (status, body) = get("/schedules/Generic%20Office%20Occupancy?from=10&to=5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("from"));
    }

    #[tokio::test]
    async fn unknown_schedule_returns_404() {
        let (status, _) = get("/schedules/Nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
