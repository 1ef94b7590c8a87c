use crate::core::errors::LedgerError;
use crate::core::models::audit::AppLog;
use crate::infrastructure::logging::LoggingService;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct InMemoryLogging {
    entries: Arc<RwLock<Vec<AppLog>>>,
}

impl InMemoryLogging {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoggingService for InMemoryLogging {
    async fn log_action(&self, action: &str, details: Value, user_id: Option<&str>) -> Result<(), LedgerError> {
        let Value::Object(fields) = details else {
            return Err(LedgerError::LoggingError(format!(
                "details for {} must be a JSON object",
                action
            )));
        };
        let entry = AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            user_id: user_id.map(String::from),
            details: fields.into_iter().collect(),
            timestamp: Utc::now(),
        };
        debug!(action = %entry.action, log_id = %entry.id, "action recorded");

        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn get_logs(&self, action: Option<&str>) -> Result<Vec<AppLog>, LedgerError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|entry| action.is_none_or(|action| entry.action == action))
            .cloned()
            .collect())
    }
}
