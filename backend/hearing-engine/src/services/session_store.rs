use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::StorageError;
use crate::metrics::track_store_operation;
use crate::models::TestSession;

/// Durable history of completed sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, session: &TestSession) -> Result<(), StorageError>;

    /// Highest score first; ties broken by most recent date.
    async fn fetch_all(&self) -> Result<Vec<TestSession>, StorageError>;

    /// Deleting an unknown id succeeds without effect.
    async fn delete_by_id(&self, id: Uuid) -> Result<(), StorageError>;
}

fn sort_for_history(sessions: &mut [TestSession]) {
    sessions.sort_by(|a, b| b.score.cmp(&a.score).then(b.date.cmp(&a.date)));
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<Vec<TestSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, session: &TestSession) -> Result<(), StorageError> {
        self.sessions.write().await.push(session.clone());
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<TestSession>, StorageError> {
        let mut sessions = self.sessions.read().await.clone();
        sort_for_history(&mut sessions);
        Ok(sessions)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StorageError> {
        self.sessions.write().await.retain(|s| s.id != id);
        Ok(())
    }
}

/// Keeps every session in a single JSON document.
///
/// Writes go to a sibling temp file first and are renamed into place.
pub struct JsonFileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileSessionStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                tracing::error!(
                    "Cannot create session store directory {}: {}",
                    parent.display(),
                    e
                );
                StorageError::Unavailable
            })?;
        }

        tracing::info!("Session history stored at {}", path.display());
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<TestSession>, std::io::Error> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn write_all(&self, sessions: &[TestSession]) -> Result<(), std::io::Error> {
        let json = serde_json::to_vec_pretty(sessions)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await
    }
}

#[async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn save(&self, session: &TestSession) -> Result<(), StorageError> {
        track_store_operation("save", async {
            let _guard = self.lock.lock().await;
            let mut sessions = self.read_all().await?;
            sessions.push(session.clone());
            self.write_all(&sessions).await
        })
        .await
        .map_err(|e| {
            tracing::warn!("Failed to save session {}: {}", session.id, e);
            StorageError::SaveFailed
        })
    }

    async fn fetch_all(&self) -> Result<Vec<TestSession>, StorageError> {
        let mut sessions = track_store_operation("fetch", async {
            let _guard = self.lock.lock().await;
            self.read_all().await
        })
        .await
        .map_err(|e| {
            tracing::warn!("Failed to read session history: {}", e);
            StorageError::FetchFailed
        })?;

        sort_for_history(&mut sessions);
        Ok(sessions)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StorageError> {
        track_store_operation("delete", async {
            let _guard = self.lock.lock().await;
            let mut sessions = self.read_all().await?;
            let before = sessions.len();
            sessions.retain(|s| s.id != id);
            if sessions.len() == before {
                return Ok(());
            }
            self.write_all(&sessions).await
        })
        .await
        .map_err(|e| {
            tracing::warn!("Failed to delete session {}: {}", id, e);
            StorageError::DeleteFailed
        })
    }
}
