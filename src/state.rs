// src/state.rs
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::chat_session::{ChatController, DEFAULT_CLOSE_DELAY};
use crate::services::classifier::Classifier;
use crate::services::completion::{CompletionClient, OpenRouterClient};
use crate::services::gate::SessionGate;
use crate::services::metrics_manager::MetricsManager;
use crate::services::session_manager::SessionManager;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub sessions: SessionManager,
    pub metrics: MetricsManager,
    pub classifier: Arc<Classifier>,
    pub completion: Arc<dyn CompletionClient>,
    pub gate: SessionGate,
    pub close_delay: Duration,
}

impl AppState {
    pub fn new(session_ttl: Duration, completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            sessions: SessionManager::new(session_ttl),
            metrics: MetricsManager::new(),
            classifier: Arc::new(Classifier::default()),
            completion,
            gate: SessionGate::default(),
            close_delay: DEFAULT_CLOSE_DELAY,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let completion = Arc::new(OpenRouterClient::new(config.completion.clone()));
        Self {
            gate: config.gate.clone(),
            close_delay: config.close_delay,
            ..Self::new(config.session_ttl, completion)
        }
    }

    pub fn with_gate(mut self, gate: SessionGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
        self
    }

    pub async fn controller(&self, session_id: &str) -> Result<ChatController, AppError> {
        let session = self
            .sessions
            .get(session_id)
            .await
            .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))?;

        Ok(ChatController::new(
            session,
            Arc::clone(&self.classifier),
            Arc::clone(&self.completion),
            self.metrics.clone(),
            self.close_delay,
        ))
    }
}
