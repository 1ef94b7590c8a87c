pub mod in_memory;

use crate::core::errors::LedgerError;
use crate::core::models::audit::AppLog;
use async_trait::async_trait;

/// Append-only record of ledger actions, kept apart from diagnostics.
#[async_trait]
pub trait LoggingService: Send + Sync {
    /// `details` must be a JSON object.
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), LedgerError>;

    /// Entries in the order they were recorded, optionally narrowed to one action.
    async fn get_logs(&self, action: Option<&str>) -> Result<Vec<AppLog>, LedgerError>;
}
