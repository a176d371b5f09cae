//! Inbox service
//!
//! Paginated channel listings and single-message lookup.

use std::sync::Arc;

use super::cursor::{Page, PageRequest};
use crate::data::{Channel, Database, Message};
use crate::error::AppError;

/// Characters kept in an inbox preview
pub const PREVIEW_CHARS: usize = 60;

/// Build the display preview for a message body
///
/// Texts of [`PREVIEW_CHARS`] characters or more are cut to that bound
/// and marked with a trailing ellipsis.
pub fn preview(content: &str) -> String {
    if content.chars().count() >= PREVIEW_CHARS {
        let head: String = content.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        content.to_string()
    }
}

/// Inbox service
pub struct InboxService {
    db: Arc<Database>,
}

impl InboxService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// List one page of a channel, newest first
    pub async fn list(&self, channel: Channel, page: PageRequest) -> Result<Page<Message>, AppError> {
        let rows = self
            .db
            .list_messages(channel, page.offset, page.limit)
            .await?;

        Ok(Page::from_rows(rows, page))
    }

    /// Get a single message with its full content
    pub async fn get(&self, id: &str) -> Result<Message, AppError> {
        self.db.get_message(id).await?.ok_or(AppError::NotFound)
    }
}
