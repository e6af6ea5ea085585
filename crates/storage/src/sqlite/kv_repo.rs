use async_trait::async_trait;
use chrono::Utc;
use drill_core::model::ItemId;
use drill_core::stats::StatsBook;
use sqlx::Row;
use std::collections::HashSet;

use super::SqliteRepository;
use crate::repository::{
    decode_seen, decode_stats, encode_seen, encode_stats, SeenStore, StatsStore, StorageError,
    SEEN_KEY, STATS_KEY,
};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

impl SqliteRepository {
    async fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(self.pool())
            .await
            .map_err(conn)?;
        row.map(|r| r.try_get::<String, _>("value").map_err(conn))
            .transpose()
    }

    async fn put_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn delete_value(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(self.pool())
            .await
            .map_err(conn)?;
        Ok(())
    }
}

#[async_trait]
impl SeenStore for SqliteRepository {
    async fn load_seen(&self) -> Result<HashSet<ItemId>, StorageError> {
        Ok(decode_seen(self.get_value(SEEN_KEY).await?.as_deref()))
    }

    async fn save_seen(&self, ids: &[ItemId]) -> Result<(), StorageError> {
        let mut stored = decode_seen(self.get_value(SEEN_KEY).await?.as_deref());
        stored.extend(ids.iter().cloned());
        self.put_value(SEEN_KEY, &encode_seen(&stored)?).await
    }

    async fn reset_seen(&self) -> Result<(), StorageError> {
        self.delete_value(SEEN_KEY).await
    }
}

#[async_trait]
impl StatsStore for SqliteRepository {
    async fn load_stats(&self) -> Result<StatsBook, StorageError> {
        let decoded = decode_stats(self.get_value(STATS_KEY).await?.as_deref());
        if decoded.migrated {
            tracing::info!("migrated legacy stats record to per-tier shape");
            self.put_value(STATS_KEY, &encode_stats(&decoded.book)?)
                .await?;
        }
        Ok(decoded.book)
    }

    async fn save_stats(&self, book: &StatsBook) -> Result<(), StorageError> {
        self.put_value(STATS_KEY, &encode_stats(book)?).await
    }
}
