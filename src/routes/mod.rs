// src/routes/mod.rs
pub mod chat;

use crate::{state::SharedState, views::View};
use axum::{
    Router,
    response::Html,
    routing::{get, post, put},
};
use chat::{
    chat_handler, click_handler, draft_handler, get_metrics_handler, login_handler,
    session_handler, toggle_handler,
};
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    Router::new()
        .route("/", get(|| async { Html(View::Gate.render()) }))
        .route("/Home", get(|| async { Html(View::Home.render()) }))
        .route("/login", post(login_handler))
        .route("/chat", post(chat_handler))
        .route("/chat/toggle", post(toggle_handler))
        .route("/chat/click", post(click_handler))
        .route("/chat/draft", put(draft_handler))
        .route("/chat/{session_id}", get(session_handler))
        .route("/metrics", get(get_metrics_handler))
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
}
