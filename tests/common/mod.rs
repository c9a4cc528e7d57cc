#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use diy_assistant::services::completion::{CompletionClient, CompletionError};
use tokio::sync::{Mutex, oneshot};

/// Replies with a fixed result and counts calls.
pub struct FixedCompletion {
    reply: Result<Option<String>, String>,
    pub calls: AtomicUsize,
}

impl FixedCompletion {
    pub fn ok(text: &str) -> Arc<Self> {
        Arc::new(Self { reply: Ok(Some(text.to_string())), calls: AtomicUsize::new(0) })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self { reply: Err(message.to_string()), calls: AtomicUsize::new(0) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for FixedCompletion {
    async fn complete(&self, _utterance: &str) -> Result<Option<String>, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(CompletionError::Remote)
    }
}

/// Holds each call open until the test releases it.
pub struct GatedCompletion {
    release: Mutex<Option<oneshot::Receiver<Result<Option<String>, String>>>>,
    pub started: tokio::sync::Notify,
    pub calls: AtomicUsize,
}

impl GatedCompletion {
    pub fn new() -> (Arc<Self>, oneshot::Sender<Result<Option<String>, String>>) {
        let (tx, rx) = oneshot::channel();
        let client = Arc::new(Self {
            release: Mutex::new(Some(rx)),
            started: tokio::sync::Notify::new(),
            calls: AtomicUsize::new(0),
        });
        (client, tx)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for GatedCompletion {
    async fn complete(&self, _utterance: &str) -> Result<Option<String>, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rx = self.release.lock().await.take();
        self.started.notify_one();
        let Some(rx) = rx else {
            return Err(CompletionError::Remote("gate already used".to_string()));
        };
        match rx.await {
            Ok(result) => result.map_err(CompletionError::Remote),
            Err(_) => Err(CompletionError::Remote("sender dropped".to_string())),
        }
    }
}
