//! SQLite-backed implementation of `BaseStore`.
//!
//! Targets and filters live in two small tables, both keyed by chat id
//! so multiple sessions can be rehydrated after a restart. Upserts use
//! `REPLACE INTO`, so re-saving a target under an existing name simply
//! overwrites its url.

use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};

use super::traits::BaseStore;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `database_url` and
    /// ensure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS targets (
                chat_id INTEGER NOT NULL,
                name    TEXT    NOT NULL,
                url     TEXT    NOT NULL,
                PRIMARY KEY (chat_id, name)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS filters (
                chat_id INTEGER NOT NULL,
                filter  TEXT    NOT NULL,
                PRIMARY KEY (chat_id, filter)
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl BaseStore for SqliteStore {
    async fn save_target(&self, chat_id: i64, name: &str, url: &str) -> Result<()> {
        sqlx::query("REPLACE INTO targets (chat_id, name, url) VALUES (?, ?, ?)")
            .bind(chat_id)
            .bind(name)
            .bind(url)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_target(&self, chat_id: i64, name: &str) -> Result<()> {
        sqlx::query("DELETE FROM targets WHERE chat_id = ? AND name = ?")
            .bind(chat_id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear_targets(&self, chat_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM targets WHERE chat_id = ?")
            .bind(chat_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_targets(&self, chat_id: i64) -> Result<Vec<(String, String)>> {
        sqlx::query_as::<_, (String, String)>(
            "SELECT name, url FROM targets WHERE chat_id = ? ORDER BY name",
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn save_filter(&self, chat_id: i64, filter: &str) -> Result<()> {
        sqlx::query("REPLACE INTO filters (chat_id, filter) VALUES (?, ?)")
            .bind(chat_id)
            .bind(filter)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear_filters(&self, chat_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM filters WHERE chat_id = ?")
            .bind(chat_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_filters(&self, chat_id: i64) -> Result<Vec<String>> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT filter FROM filters WHERE chat_id = ? ORDER BY filter",
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(f,)| f).collect())
    }

    async fn chat_ids(&self) -> Result<Vec<i64>> {
        let rows = sqlx::query_as::<_, (i64,)>(
            "SELECT chat_id FROM targets UNION SELECT chat_id FROM filters",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
