use crate::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

pub async fn get_routing_decision(
    State(state): State<AppState>,
    Path(interaction_id): Path<String>,
) -> impl IntoResponse {
    match state.decision_reader.find_by_interaction_id(&interaction_id).await {
        Ok(Some(row)) => (axum::http::StatusCode::OK, Json(row)).into_response(),
        Ok(None) => (
            axum::http::StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "routing decision not found"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("routing decision lookup failed interaction_id={}: {:#}", interaction_id, e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "routing decision lookup failed"})),
            )
                .into_response()
        }
    }
}
