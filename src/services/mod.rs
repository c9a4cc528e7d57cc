pub mod chat_session;
pub mod classifier;
pub mod completion;
pub mod gate;
pub mod metrics_manager;
pub mod normalizer;
pub mod session_manager;
