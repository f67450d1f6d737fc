use crate::domain::routing::{ErrorCode, RouterFailure, SelectModelRequest};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorCode::NoEligibleModel => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::RouterError | ErrorCode::ReplayError => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::ReplayFailed => StatusCode::NOT_FOUND,
    }
}

fn failure_response(failure: RouterFailure) -> axum::response::Response {
    (status_for(failure.code), Json(failure.into_envelope())).into_response()
}

fn select_request(
    payload: Result<Json<SelectModelRequest>, JsonRejection>,
) -> Result<SelectModelRequest, RouterFailure> {
    match payload {
        Ok(Json(req)) => Ok(req),
        Err(rejection) => Err(RouterFailure::invalid_input(&format!(
            "request body is not a valid selection request: {}",
            rejection.body_text()
        ))),
    }
}

pub async fn select_model(
    State(state): State<AppState>,
    payload: Result<Json<SelectModelRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match select_request(payload) {
        Ok(req) => req,
        Err(failure) => return failure_response(failure),
    };
    match state.model_router.select_model(req).await {
        Ok(selection) => (StatusCode::OK, Json(selection.redacted())).into_response(),
        Err(failure) => failure_response(failure),
    }
}

pub async fn resolve_replay(
    State(state): State<AppState>,
    Path(interaction_id): Path<String>,
) -> impl IntoResponse {
    match state.replay_resolver.resolve_model_for_replay(&interaction_id).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(failure) => failure_response(failure),
    }
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
