//! Persistence port for the whole-snapshot store.
//!
//! Every committed action overwrites the stored document in full. There is no
//! incremental log, so an adapter only has to know how to read and write one
//! blob.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::snapshot::AppSnapshot;

#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// `None` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<AppSnapshot>>;

    async fn save(&self, snapshot: &AppSnapshot) -> Result<()>;
}

/// Holds the last saved snapshot in memory. Lost on restart.
#[derive(Default)]
pub struct InMemoryRepository {
    stored: RwLock<Option<AppSnapshot>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: AppSnapshot) -> Self {
        Self {
            stored: RwLock::new(Some(snapshot)),
        }
    }
}

#[async_trait]
impl SnapshotRepository for InMemoryRepository {
    async fn load(&self) -> Result<Option<AppSnapshot>> {
        Ok(self.stored.read().await.clone())
    }

    async fn save(&self, snapshot: &AppSnapshot) -> Result<()> {
        *self.stored.write().await = Some(snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_repository_loads_nothing() {
        let repo = InMemoryRepository::new();
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_overwrites_the_previous_snapshot() {
        let repo = InMemoryRepository::new();
        let mut snapshot = AppSnapshot::seed();
        repo.save(&snapshot).await.unwrap();

        snapshot.templates.clear();
        repo.save(&snapshot).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert!(loaded.templates.is_empty());
    }
}
