// src/services/chat_session.rs
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error};

use super::classifier::{Classification, Classifier, MessageKind};
use super::completion::{CompletionClient, CompletionError};
use super::metrics_manager::MetricsManager;
use super::normalizer::normalize;

pub const WELCOME_MESSAGE: &str = "Hello! Ask me anything about DIY projects!";
pub const EMPTY_REPLY_FALLBACK: &str = "Sorry, I couldn't process that request.";
pub const REMOTE_FAILURE_FALLBACK: &str =
    "Sorry, I couldn't connect to my knowledge base. Please try again.";
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into(), sender: Sender::User }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self { text: text.into(), sender: Sender::Bot }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetState {
    Closed,
    Open,
    /// Still rendered for the exit animation, but not taking input.
    Closing,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub widget: WidgetState,
    pub is_loading: bool,
    pub draft_input: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            widget: WidgetState::Closed,
            is_loading: false,
            draft_input: String::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    Opened,
    ClosingStarted,
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickTarget {
    Widget,
    ToggleControl,
    Outside,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    Blank,
    Loading,
    WidgetNotOpen,
}

/// What the first, synchronous half of a send decided.
#[derive(Debug, PartialEq, Eq)]
pub enum SendStep {
    Ignored(IgnoreReason),
    Replied(Classification),
    /// The user message is recorded and loading is set; the caller owes
    /// exactly one remote call for this utterance.
    Remote(String),
}

/// Result of a full send as seen by callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SendOutcome {
    Ignored { reason: IgnoreReason },
    Answered { reply: String, remote: bool },
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub transcript: Vec<Message>,
    pub state: SessionState,
    pub scroll_to: usize,
}

/// One mounted chat widget: its transcript and UI state.
pub struct ChatSession {
    pub id: String,
    transcript: Vec<Message>,
    state: SessionState,
    scroll_to: usize,
    pub last_active: Instant,
    rng: StdRng,
}

impl Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("messages", &self.transcript.len())
            .field("state", &self.state)
            .finish()
    }
}

impl ChatSession {
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_rng(id, StdRng::from_entropy())
    }

    pub fn with_rng(id: impl Into<String>, rng: StdRng) -> Self {
        Self {
            id: id.into(),
            transcript: vec![Message::bot(WELCOME_MESSAGE)],
            state: SessionState::default(),
            scroll_to: 0,
            last_active: Instant::now(),
            rng,
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Index of the newest message; the client scrolls it into view.
    pub fn scroll_to(&self) -> usize {
        self.scroll_to
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.clone(),
            transcript: self.transcript.clone(),
            state: self.state.clone(),
            scroll_to: self.scroll_to,
        }
    }

    fn append(&mut self, message: Message) {
        self.transcript.push(message);
        self.scroll_to = self.transcript.len() - 1;
        self.last_active = Instant::now();
    }

    pub fn toggle(&mut self) -> Toggle {
        self.last_active = Instant::now();
        match self.state.widget {
            WidgetState::Closed => {
                self.state.widget = WidgetState::Open;
                Toggle::Opened
            }
            WidgetState::Open => {
                self.state.widget = WidgetState::Closing;
                Toggle::ClosingStarted
            }
            WidgetState::Closing => Toggle::Ignored,
        }
    }

    /// Ends the exit animation. Returns false if the widget was not closing.
    pub fn finish_closing(&mut self) -> bool {
        if self.state.widget == WidgetState::Closing {
            self.state.widget = WidgetState::Closed;
            true
        } else {
            false
        }
    }

    pub fn click(&mut self, target: ClickTarget) -> Toggle {
        match (self.state.widget, target) {
            (WidgetState::Open, ClickTarget::Outside) => self.toggle(),
            _ => Toggle::Ignored,
        }
    }

    pub fn set_draft(&mut self, text: impl Into<String>) -> bool {
        if self.state.widget != WidgetState::Open {
            return false;
        }
        self.state.draft_input = text.into();
        true
    }

    /// Records the user message and answers locally when the classifier
    /// can. Leaves `is_loading` set only when a remote call is owed.
    pub fn begin_send(&mut self, input: &str, classifier: &Classifier) -> SendStep {
        let utterance = input.trim();
        if utterance.is_empty() {
            return SendStep::Ignored(IgnoreReason::Blank);
        }
        if self.state.is_loading {
            return SendStep::Ignored(IgnoreReason::Loading);
        }
        if self.state.widget != WidgetState::Open {
            return SendStep::Ignored(IgnoreReason::WidgetNotOpen);
        }

        self.append(Message::user(utterance));
        self.state.draft_input.clear();
        self.state.is_loading = true;

        let classification = classifier.classify(utterance, &mut self.rng);
        match classification.response() {
            Some(reply) => {
                self.append(Message::bot(reply));
                self.state.is_loading = false;
                SendStep::Replied(classification)
            }
            None => SendStep::Remote(utterance.to_string()),
        }
    }

    pub fn begin_send_draft(&mut self, classifier: &Classifier) -> SendStep {
        let draft = self.state.draft_input.clone();
        self.begin_send(&draft, classifier)
    }

    /// Second half of a remote send. Always clears `is_loading`.
    pub fn complete_remote(
        &mut self,
        outcome: Result<Option<String>, CompletionError>,
    ) -> &Message {
        let text = match outcome {
            Ok(content) => normalize(content.as_deref().unwrap_or(EMPTY_REPLY_FALLBACK)),
            Err(err) => {
                error!(session_id = %self.id, kind = err.kind(), "completion failed: {err}");
                REMOTE_FAILURE_FALLBACK.to_string()
            }
        };
        self.append(Message::bot(text));
        self.state.is_loading = false;
        &self.transcript[self.scroll_to]
    }
}

pub type SessionHandle = Arc<Mutex<ChatSession>>;

/// Drives one session: classification, the remote call and the close timer.
#[derive(Clone)]
pub struct ChatController {
    session: SessionHandle,
    classifier: Arc<Classifier>,
    completion: Arc<dyn CompletionClient>,
    metrics: MetricsManager,
    close_delay: Duration,
}

impl ChatController {
    pub fn new(
        session: SessionHandle,
        classifier: Arc<Classifier>,
        completion: Arc<dyn CompletionClient>,
        metrics: MetricsManager,
        close_delay: Duration,
    ) -> Self {
        Self { session, classifier, completion, metrics, close_delay }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub async fn toggle(&self) -> WidgetState {
        let mut session = self.session.lock().await;
        if session.toggle() == Toggle::ClosingStarted {
            self.schedule_close();
        }
        session.state().widget
    }

    pub async fn click(&self, target: ClickTarget) -> WidgetState {
        let mut session = self.session.lock().await;
        if session.click(target) == Toggle::ClosingStarted {
            self.schedule_close();
        }
        session.state().widget
    }

    fn schedule_close(&self) {
        let session = Arc::clone(&self.session);
        let delay = self.close_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut session = session.lock().await;
            if session.finish_closing() {
                debug!(session_id = %session.id, "widget closed");
            }
        });
    }

    pub async fn set_draft(&self, text: &str) -> bool {
        self.session.lock().await.set_draft(text)
    }

    /// Sends whatever is in the draft, read under the same lock that clears it.
    pub async fn send_draft(&self) -> SendOutcome {
        let step = self.session.lock().await.begin_send_draft(&self.classifier);
        self.dispatch(step).await
    }

    pub async fn send_message(&self, input: &str) -> SendOutcome {
        let step = self.session.lock().await.begin_send(input, &self.classifier);
        self.dispatch(step).await
    }

    async fn dispatch(&self, step: SendStep) -> SendOutcome {
        let utterance = match step {
            SendStep::Ignored(reason) => return SendOutcome::Ignored { reason },
            SendStep::Replied(classification) => {
                self.metrics.increment_kind(classification.kind().as_str()).await;
                return SendOutcome::Answered {
                    reply: classification.into_response().unwrap_or_default(),
                    remote: false,
                };
            }
            SendStep::Remote(utterance) => utterance,
        };

        // The remote half runs in its own task: a caller that goes away must
        // not leave the session loading forever.
        let controller = self.clone();
        let task = tokio::spawn(async move { controller.finish_remote(utterance).await });

        let reply = match task.await {
            Ok(reply) => reply,
            Err(err) => {
                let mut session = self.session.lock().await;
                session
                    .complete_remote(Err(CompletionError::Task(err.to_string())))
                    .text
                    .clone()
            }
        };
        SendOutcome::Answered { reply, remote: true }
    }

    /// The session lock is released while the remote call is pending so the
    /// widget stays responsive; `is_loading` keeps other sends out.
    async fn finish_remote(&self, utterance: String) -> String {
        self.metrics.increment_kind(MessageKind::OnTopic.as_str()).await;
        let outcome = self.completion.complete(&utterance).await;
        let label = match &outcome {
            Ok(_) => "success",
            Err(err) => err.kind(),
        };
        self.metrics.increment_remote(label).await;

        let mut session = self.session.lock().await;
        session.complete_remote(outcome).text.clone()
    }
}
