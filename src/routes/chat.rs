use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{debug, info};

use crate::{
    error::AppError,
    message::{
        ChatRequest, ChatResponse, ClickRequest, DraftRequest, DraftResponse, LoginRequest,
        LoginResponse, SessionRequest, WidgetResponse,
    },
    services::{chat_session::SessionSnapshot, metrics_manager::MetricsData},
    state::SharedState,
};

pub async fn login_handler(
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let view = match state.gate.verify(&payload.name, &payload.registration_number) {
        Ok(view) => view,
        Err(err) => {
            state.metrics.increment_login("rejected").await;
            return Err(err.into());
        }
    };
    state.metrics.increment_login("accepted").await;

    // Landing on the home view mounts a fresh chat widget.
    let session_id = state.sessions.create_session().await;
    info!(%session_id, "gate passed");

    Ok(Json(LoginResponse {
        session_id,
        view: view.path().to_string(),
    }))
}

pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let controller = state.controller(&payload.session_id).await?;

    let outcome = match payload.message.as_deref() {
        Some(text) => controller.send_message(text).await,
        None => controller.send_draft().await,
    };
    debug!(session_id = %payload.session_id, ?outcome, "send handled");

    Ok(Json(ChatResponse {
        session_id: payload.session_id,
        outcome,
    }))
}

pub async fn toggle_handler(
    State(state): State<SharedState>,
    Json(payload): Json<SessionRequest>,
) -> Result<Json<WidgetResponse>, AppError> {
    let widget = state.controller(&payload.session_id).await?.toggle().await;
    Ok(Json(WidgetResponse {
        session_id: payload.session_id,
        widget,
    }))
}

pub async fn click_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ClickRequest>,
) -> Result<Json<WidgetResponse>, AppError> {
    let widget = state
        .controller(&payload.session_id)
        .await?
        .click(payload.target)
        .await;
    Ok(Json(WidgetResponse {
        session_id: payload.session_id,
        widget,
    }))
}

pub async fn draft_handler(
    State(state): State<SharedState>,
    Json(payload): Json<DraftRequest>,
) -> Result<Json<DraftResponse>, AppError> {
    let accepted = state
        .controller(&payload.session_id)
        .await?
        .set_draft(&payload.text)
        .await;
    Ok(Json(DraftResponse {
        session_id: payload.session_id,
        accepted,
    }))
}

pub async fn session_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let controller = state.controller(&session_id).await?;
    let snapshot = controller.session().lock().await.snapshot();
    Ok(Json(snapshot))
}

pub async fn get_metrics_handler(State(state): State<SharedState>) -> Json<MetricsData> {
    Json(state.metrics.get_metrics().await)
}
