use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::database::repository::SnapshotRepository;
use crate::error::Result;
use crate::models::snapshot::AppSnapshot;

/// One `jsonb` row per store, keyed by `snapshot_key`.
#[derive(Clone)]
pub struct PgSnapshotRepository {
    pool: PgPool,
    key: String,
}

impl PgSnapshotRepository {
    pub fn new(pool: PgPool, key: impl Into<String>) -> Self {
        Self {
            pool,
            key: key.into(),
        }
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS app_snapshots (
                key TEXT PRIMARY KEY,
                data JSONB NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotRepository for PgSnapshotRepository {
    async fn load(&self) -> Result<Option<AppSnapshot>> {
        let row = sqlx::query("SELECT data FROM app_snapshots WHERE key = $1")
            .bind(&self.key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let data: serde_json::Value = row.try_get("data")?;
                Ok(Some(serde_json::from_value(data)?))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, snapshot: &AppSnapshot) -> Result<()> {
        let data = serde_json::to_value(snapshot)?;
        sqlx::query(
            r#"
            INSERT INTO app_snapshots (key, data, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE
            SET data = EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(&self.key)
        .bind(data)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
