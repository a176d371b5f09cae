//! Saved analysis service
//!
//! Records are partitioned by client ID. Lookups from any other client
//! are indistinguishable from lookups of IDs that never existed.

use std::sync::Arc;

use chrono::{SubsecRound, Utc};

use super::cursor::{Page, PageRequest};
use crate::data::{AnalysisId, AnalysisRecord, ClassificationResult, Database};
use crate::error::AppError;

/// Attempts at finding an unused analysis ID before giving up
const MAX_ID_ATTEMPTS: usize = 3;

/// Saved analysis service
pub struct AnalysisRecordService {
    db: Arc<Database>,
}

impl AnalysisRecordService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Save an analysis for `client_id`
    ///
    /// The ID and timestamp are assigned here; an ID collision is retried
    /// with a fresh ID.
    pub async fn create(
        &self,
        client_id: &str,
        message_id: &str,
        analysis: ClassificationResult,
    ) -> Result<AnalysisRecord, AppError> {
        let mut record = AnalysisRecord {
            analysis_id: AnalysisId::new().0,
            client_id: client_id.to_string(),
            message_id: message_id.to_string(),
            created_at: Utc::now().trunc_subsecs(3),
            analysis,
        };

        for attempt in 1..=MAX_ID_ATTEMPTS {
            if self.db.insert_analysis(&record).await? {
                crate::metrics::ANALYSIS_RECORDS_CREATED_TOTAL.inc();
                tracing::info!(
                    analysis_id = %record.analysis_id,
                    client_id = %record.client_id,
                    "Analysis record saved"
                );
                return Ok(record);
            }

            tracing::warn!(
                analysis_id = %record.analysis_id,
                attempt,
                "Analysis ID collision; regenerating"
            );
            record.analysis_id = AnalysisId::new().0;
        }

        Err(AppError::Internal(anyhow::anyhow!(
            "could not allocate a unique analysis id after {MAX_ID_ATTEMPTS} attempts"
        )))
    }

    /// List one page of the client's records, most recent first
    pub async fn list(
        &self,
        client_id: &str,
        page: PageRequest,
    ) -> Result<Page<AnalysisRecord>, AppError> {
        let rows = self
            .db
            .list_analyses(client_id, page.offset, page.limit)
            .await?;

        Ok(Page::from_rows(rows, page))
    }

    /// Get one of the client's records
    pub async fn get(&self, client_id: &str, analysis_id: &str) -> Result<AnalysisRecord, AppError> {
        self.db
            .get_analysis(client_id, analysis_id)
            .await?
            .ok_or(AppError::NotFound)
    }
}
