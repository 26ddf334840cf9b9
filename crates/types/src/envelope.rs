//! Response envelopes used by every backend endpoint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard response wrapper: every endpoint returns its payload under
/// `data`, with a mirrored status code, a human-readable message, and an
/// optional per-field validation error map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status_code: u16,
    pub message: String,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, Vec<String>>>,
}

/// Paginated collection payload, carried inside an [`Envelope`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub current_page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// Returns `true` if a page after this one exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}
