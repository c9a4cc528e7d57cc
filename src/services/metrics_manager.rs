use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default, Clone, Serialize)]
pub struct MetricsData {
    pub kind_usage: HashMap<String, u64>,
    pub remote_outcomes: HashMap<String, u64>,
    pub logins: HashMap<String, u64>,
}

#[derive(Debug, Clone)]
pub struct MetricsManager {
    inner: Arc<RwLock<MetricsData>>,
}

impl Default for MetricsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsManager {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MetricsData::default())),
        }
    }

    pub async fn increment_kind(&self, kind: &str) {
        let mut data = self.inner.write().await;
        *data.kind_usage.entry(kind.to_string()).or_insert(0) += 1;
    }

    pub async fn increment_remote(&self, outcome: &str) {
        let mut data = self.inner.write().await;
        *data.remote_outcomes.entry(outcome.to_string()).or_insert(0) += 1;
    }

    pub async fn increment_login(&self, outcome: &str) {
        let mut data = self.inner.write().await;
        *data.logins.entry(outcome.to_string()).or_insert(0) += 1;
    }

    pub async fn get_metrics(&self) -> MetricsData {
        self.inner.read().await.clone()
    }
}
