//! Classification log persistence
//!
//! Stores every checked email with its verdict in SQLite.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

use super::types::*;
use crate::error::Result;

/// SQLite-backed log of classification results
#[derive(Clone)]
pub struct SpamLogStore {
    db: SqlitePool,
}

impl SpamLogStore {
    /// Create a store over an existing pool
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Open (creating if needed) the database at `database_url` and initialize it
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // A single connection keeps `sqlite::memory:` databases shared
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let db = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self::new(db);
        store.init_db().await?;
        Ok(store)
    }

    /// Initialize database tables
    pub async fn init_db(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS spam_log (
                id TEXT PRIMARY KEY,
                subject TEXT NOT NULL,
                body TEXT NOT NULL,
                is_spam INTEGER NOT NULL,
                spam_score REAL NOT NULL,
                scorer TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Append a classification result
    pub async fn append(
        &self,
        input: &EmailInput,
        result: &ClassificationResult,
        scorer: ScorerKind,
    ) -> Result<SpamLogEntry> {
        let entry = SpamLogEntry {
            id: Uuid::new_v4().to_string(),
            subject: input.subject.clone(),
            body: input.body.clone(),
            is_spam: result.is_spam,
            spam_score: result.score.as_f64(),
            scorer: scorer.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO spam_log (id, subject, body, is_spam, spam_score, scorer, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&entry.id)
        .bind(&entry.subject)
        .bind(&entry.body)
        .bind(entry.is_spam as i64)
        .bind(entry.spam_score)
        .bind(&entry.scorer)
        .bind(entry.created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&self.db)
        .await?;

        debug!("Logged classification {}", entry.id);
        Ok(entry)
    }

    /// Most recent entries, newest first
    pub async fn recent(&self, limit: i64) -> Result<Vec<SpamLogEntry>> {
        let rows = sqlx::query_as::<_, (String, String, String, i64, f64, String, String)>(
            "SELECT id, subject, body, is_spam, spam_score, scorer, created_at FROM spam_log ORDER BY created_at DESC, rowid DESC LIMIT ?"
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        let entries = rows
            .into_iter()
            .map(|(id, subject, body, is_spam, spam_score, scorer, created_at)| SpamLogEntry {
                id,
                subject,
                body,
                is_spam: is_spam != 0,
                spam_score,
                scorer,
                created_at: DateTime::parse_from_rfc3339(&created_at)
                    .map(|d| d.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
            .collect();

        Ok(entries)
    }

    /// Counts of logged verdicts
    pub async fn stats(&self) -> Result<SpamLogStats> {
        let (total, spam): (i64, Option<i64>) =
            sqlx::query_as("SELECT COUNT(*), SUM(is_spam) FROM spam_log")
                .fetch_one(&self.db)
                .await?;
        let spam = spam.unwrap_or(0);

        Ok(SpamLogStats {
            total: total as u64,
            spam: spam as u64,
            ham: (total - spam) as u64,
        })
    }

    /// Remove all entries, returning how many were deleted
    pub async fn clear(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM spam_log")
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }
}
