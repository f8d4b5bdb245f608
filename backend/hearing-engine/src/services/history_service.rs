use std::sync::Arc;

use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{SessionSummary, TestSession};
use crate::services::session_store::SessionStore;

/// Read side of the session history.
pub struct HistoryService {
    store: Arc<dyn SessionStore>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn load_sessions(&self) -> Result<Vec<TestSession>, StorageError> {
        let sessions = self.store.fetch_all().await?;
        tracing::debug!("Loaded {} sessions from history", sessions.len());
        Ok(sessions)
    }

    pub async fn load_summaries(&self) -> Result<Vec<SessionSummary>, StorageError> {
        Ok(self
            .load_sessions()
            .await?
            .iter()
            .map(SessionSummary::from_session)
            .collect())
    }

    /// Deletes the session and returns the refreshed list.
    pub async fn delete_session(&self, id: Uuid) -> Result<Vec<TestSession>, StorageError> {
        self.store.delete_by_id(id).await?;
        tracing::info!("Deleted session {}", id);
        self.load_sessions().await
    }
}
