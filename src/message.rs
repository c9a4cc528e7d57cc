// src/message.rs
use serde::{Deserialize, Serialize};

use crate::services::chat_session::{ClickTarget, SendOutcome, WidgetState};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub registration_number: String,
}

#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub session_id: String,
    pub view: String,
}

#[derive(Deserialize)]
pub struct SessionRequest {
    pub session_id: String,
}

#[derive(Deserialize)]
pub struct ClickRequest {
    pub session_id: String,
    pub target: ClickTarget,
}

#[derive(Deserialize)]
pub struct DraftRequest {
    pub session_id: String,
    pub text: String,
}

#[derive(Serialize, Deserialize)]
pub struct DraftResponse {
    pub session_id: String,
    pub accepted: bool,
}

#[derive(Serialize, Deserialize)]
pub struct WidgetResponse {
    pub session_id: String,
    pub widget: WidgetState,
}

/// `message` falls back to the session's draft when omitted.
#[derive(Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub outcome: SendOutcome,
}
