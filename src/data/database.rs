//! SQLite database operations
//!
//! All database access goes through this module.
//! Uses SQLx with embedded migrations.

use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;

use super::models::*;
use crate::error::AppError;

fn sql_offset(offset: u64) -> Result<i64, AppError> {
    i64::try_from(offset).map_err(|_| AppError::Validation("offset out of range".to_string()))
}

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to the SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let connection_string = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&connection_string).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Inbox messages
    // =========================================================================

    /// Insert an inbox message
    pub async fn insert_message(&self, message: &Message) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, channel, sender_name, sender_id, content, ts, risk_hint)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(message.channel)
        .bind(&message.sender_name)
        .bind(&message.sender_id)
        .bind(&message.content)
        .bind(message.ts)
        .bind(message.risk_hint)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Count all inbox messages across channels
    pub async fn count_messages(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// List messages of one channel, newest first
    ///
    /// Ties on `ts` are broken by `id` so pages never overlap.
    ///
    /// # Arguments
    /// * `channel` - Channel to list
    /// * `offset` - Rows to skip
    /// * `limit` - Maximum number of rows
    pub async fn list_messages(
        &self,
        channel: Channel,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Message>, AppError> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, channel, sender_name, sender_id, content, ts, risk_hint
            FROM messages
            WHERE channel = ?
            ORDER BY ts DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(channel)
        .bind(i64::from(limit))
        .bind(sql_offset(offset)?)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Get a single message by ID
    pub async fn get_message(&self, id: &str) -> Result<Option<Message>, AppError> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, channel, sender_name, sender_id, content, ts, risk_hint
            FROM messages
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    /// Seed the demo inbox when no messages exist yet
    ///
    /// # Returns
    /// Number of inserted messages (0 when the inbox was not empty)
    pub async fn seed_demo_messages(&self) -> Result<usize, AppError> {
        if self.count_messages().await? > 0 {
            return Ok(0);
        }

        let messages = super::seed::demo_messages();
        let mut tx = self.pool.begin().await?;
        for message in &messages {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO messages (id, channel, sender_name, sender_id, content, ts, risk_hint)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&message.id)
            .bind(message.channel)
            .bind(&message.sender_name)
            .bind(&message.sender_id)
            .bind(&message.content)
            .bind(message.ts)
            .bind(message.risk_hint)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        tracing::info!(count = messages.len(), "Seeded demo inbox messages");
        Ok(messages.len())
    }

    // =========================================================================
    // Saved analyses
    // =========================================================================

    /// Insert a saved analysis
    ///
    /// # Returns
    /// `false` when a record with the same `analysis_id` already exists;
    /// the existing row is left untouched.
    pub async fn insert_analysis(&self, record: &AnalysisRecord) -> Result<bool, AppError> {
        let analysis_json = serde_json::to_string(&record.analysis)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode analysis: {e}")))?;

        let result = sqlx::query(
            r#"
            INSERT INTO analyses (analysis_id, client_id, message_id, created_at, analysis_json)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(analysis_id) DO NOTHING
            "#,
        )
        .bind(&record.analysis_id)
        .bind(&record.client_id)
        .bind(&record.message_id)
        .bind(record.created_at)
        .bind(analysis_json)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// List a client's saved analyses, most recent first
    ///
    /// # Arguments
    /// * `client_id` - Owning client
    /// * `offset` - Rows to skip
    /// * `limit` - Maximum number of rows
    pub async fn list_analyses(
        &self,
        client_id: &str,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<AnalysisRecord>, AppError> {
        let rows = sqlx::query_as::<_, AnalysisRow>(
            r#"
            SELECT analysis_id, client_id, message_id, created_at, analysis_json
            FROM analyses
            WHERE client_id = ?
            ORDER BY seq DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(client_id)
        .bind(i64::from(limit))
        .bind(sql_offset(offset)?)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(decode_analysis_row).collect()
    }

    /// Get a saved analysis owned by `client_id`
    ///
    /// Records owned by another client are reported as absent.
    pub async fn get_analysis(
        &self,
        client_id: &str,
        analysis_id: &str,
    ) -> Result<Option<AnalysisRecord>, AppError> {
        let row = sqlx::query_as::<_, AnalysisRow>(
            r#"
            SELECT analysis_id, client_id, message_id, created_at, analysis_json
            FROM analyses
            WHERE client_id = ? AND analysis_id = ?
            "#,
        )
        .bind(client_id)
        .bind(analysis_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(decode_analysis_row).transpose()
    }
}

fn decode_analysis_row(row: AnalysisRow) -> Result<AnalysisRecord, AppError> {
    let analysis_id = row.analysis_id.clone();
    AnalysisRecord::try_from(row).map_err(|e| {
        AppError::Internal(anyhow::anyhow!(
            "Stored analysis {analysis_id} is not valid JSON: {e}"
        ))
    })
}
