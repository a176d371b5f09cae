//! Opaque pagination cursors
//!
//! A cursor is the JSON object `{"o": <offset>}` encoded as URL-safe base64
//! with the padding stripped. It carries no snapshot: offsets past the end
//! of a collection simply produce an empty page.

use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default page size when the caller gives none
pub const DEFAULT_PAGE_LIMIT: u32 = 20;
/// Largest page size a caller may request
pub const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Serialize, Deserialize)]
struct CursorPayload {
    #[serde(default)]
    o: u64,
}

/// Encode an offset into an opaque cursor
pub fn encode(offset: u64) -> String {
    let payload = serde_json::json!({ "o": offset }).to_string();
    URL_SAFE.encode(payload).trim_end_matches('=').to_string()
}

/// Decode a cursor back into an offset
///
/// Absent or empty cursors decode to 0. Anything that is not a cursor
/// produced by [`encode`] is a validation error.
pub fn decode(cursor: Option<&str>) -> Result<u64, AppError> {
    let cursor = match cursor {
        None | Some("") => return Ok(0),
        Some(cursor) => cursor,
    };

    let invalid = || AppError::Validation("invalid cursor".to_string());

    let padding = match cursor.len() % 4 {
        0 => "",
        2 => "==",
        3 => "=",
        _ => return Err(invalid()),
    };
    let bytes = URL_SAFE
        .decode(format!("{cursor}{padding}"))
        .map_err(|_| invalid())?;
    let payload: CursorPayload = serde_json::from_slice(&bytes).map_err(|_| invalid())?;

    if payload.o > i64::MAX as u64 {
        return Err(invalid());
    }

    Ok(payload.o)
}

/// Validated pagination request: where to start and how many rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u32,
}

impl PageRequest {
    /// Build from raw query parameters
    ///
    /// # Errors
    /// Validation error when `limit` is outside `1..=100` or the cursor
    /// is malformed
    pub fn from_query(cursor: Option<&str>, limit: Option<u32>) -> Result<Self, AppError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}"
            )));
        }

        Ok(Self {
            offset: decode(cursor)?,
            limit,
        })
    }
}

/// One page of results plus the cursor for the next page, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Wrap the rows fetched for `request`
    ///
    /// A full page advertises a next cursor; a short page is the last one.
    pub fn from_rows(rows: Vec<T>, request: PageRequest) -> Self {
        let next_cursor = (rows.len() == request.limit as usize)
            .then(|| encode(request.offset.saturating_add(u64::from(request.limit))));

        Self {
            items: rows,
            next_cursor,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}
