use async_trait::async_trait;
use std::path::PathBuf;

use crate::database::repository::SnapshotRepository;
use crate::error::Result;
use crate::models::snapshot::AppSnapshot;

/// Pretty-printed JSON document on local disk.
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotRepository for JsonFileRepository {
    async fn load(&self) -> Result<Option<AppSnapshot>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn save(&self, snapshot: &AppSnapshot) -> Result<()> {
        let content = serde_json::to_string_pretty(snapshot)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write to temp file first, then rename (atomic)
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, content).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("hub.json"));
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn saved_snapshot_is_read_back() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nested").join("hub.json"));
        let snapshot = AppSnapshot::seed();

        repo.save(&snapshot).await.unwrap();

        assert_eq!(repo.load().await.unwrap(), Some(snapshot));
        assert!(!repo.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn sparse_documents_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hub.json");
        std::fs::write(&path, r#"{"candidates": []}"#).unwrap();

        let loaded = JsonFileRepository::new(&path).load().await.unwrap().unwrap();

        assert!(loaded.tasks.is_empty());
        assert_eq!(loaded.templates, AppSnapshot::seed().templates);
        assert!(loaded.templates.iter().any(|t| t.name == "Termination"));
        assert_eq!(loaded.cost_settings, crate::models::cost::CostSettings::default());
    }

    #[tokio::test]
    async fn stored_empty_template_list_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hub.json");
        std::fs::write(&path, r#"{"templates": []}"#).unwrap();

        let loaded = JsonFileRepository::new(&path).load().await.unwrap().unwrap();

        assert!(loaded.templates.is_empty());
    }
}
