use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{HighScoreRepository, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait]
impl HighScoreRepository for SqliteRepository {
    async fn get_score(&self, key: &str) -> Result<Option<u32>, StorageError> {
        let row = sqlx::query("SELECT score FROM high_scores WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let score: i64 = row.try_get("score").map_err(ser)?;
        u32::try_from(score)
            .map(Some)
            .map_err(|_| StorageError::Serialization(format!("invalid score: {score}")))
    }

    async fn set_score(&self, key: &str, score: u32) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO high_scores (key, score, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                score = excluded.score,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(i64::from(score))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
