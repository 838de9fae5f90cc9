//! The comment store.
//!
//! This module is the only place that talks to Postgres. Every operation is
//! a single parameterized statement drawn from the pool; there are no
//! multi-statement transactions and no state beyond the pool itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::domain::vote::VoteKind;
use crate::infra::config::Config;

/// One row of the `comments` table, serialized with the wire's camelCase keys.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRow {
    pub id: i64,
    pub target_id: i64,
    pub author: String,
    pub author_address: String,
    pub content: String,
    pub likes: i64,
    pub timestamp: DateTime<Utc>,
    pub reported: bool,
    pub reported_by: Option<String>,
    pub report_reason: Option<String>,
    pub report_timestamp: Option<DateTime<Utc>>,
    pub truth_votes: i64,
    pub false_votes: i64,
}

pub struct CommentStore {
    pool: PgPool,
}

impl CommentStore {
    /// Connects to the database and makes sure the `comments` table exists.
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&config.database_url)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS comments (
                id BIGSERIAL PRIMARY KEY,
                target_id BIGINT NOT NULL,
                author TEXT NOT NULL,
                author_address TEXT NOT NULL,
                content TEXT NOT NULL,
                likes BIGINT NOT NULL DEFAULT 0,
                timestamp TIMESTAMPTZ NOT NULL,
                reported BOOLEAN NOT NULL DEFAULT FALSE,
                reported_by TEXT,
                report_reason TEXT,
                report_timestamp TIMESTAMPTZ,
                truth_votes BIGINT NOT NULL DEFAULT 0,
                false_votes BIGINT NOT NULL DEFAULT 0
            )",
        )
        .execute(&pool)
        .await?;

        Ok(CommentStore { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts a comment and returns its id.
    pub async fn insert_comment(
        &self,
        target_id: i64,
        author: &str,
        author_address: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<i64> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO comments (target_id, author, author_address, content, timestamp)
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(target_id)
        .bind(author)
        .bind(author_address)
        .bind(content)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    pub async fn list_comments(&self) -> anyhow::Result<Vec<CommentRow>> {
        let rows = sqlx::query_as::<_, CommentRow>("SELECT * FROM comments ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Deletes a comment, scoped to its author. Returns rows affected, so a
    /// non-author delete is a no-op rather than an error.
    pub async fn delete_comment(&self, id: i64, author_address: &str) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1 AND author_address = $2")
            .bind(id)
            .bind(author_address)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Marks a comment as reported, recording who, why and when.
    pub async fn report_comment(
        &self,
        id: i64,
        reporter_address: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<u64> {
        let result = sqlx::query(
            "UPDATE comments
             SET reported = TRUE, reported_by = $2, report_reason = $3, report_timestamp = $4
             WHERE id = $1",
        )
        .bind(id)
        .bind(reporter_address)
        .bind(reason)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Adds `amount` to exactly one of the two vote counters. The increment
    /// happens in SQL, so concurrent votes on the same row cannot lose
    /// updates; the column name comes from the [`VoteKind`] enum.
    pub async fn apply_vote(&self, id: i64, kind: VoteKind, amount: i64) -> anyhow::Result<u64> {
        let column = kind.column();
        let sql = format!("UPDATE comments SET {column} = {column} + $2 WHERE id = $1");
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(amount)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
