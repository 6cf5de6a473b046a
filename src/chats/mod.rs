//! Chat metadata: normalization, caching, and the filter/sort pipeline.

use crate::organizer::ChatKey;

/// Normalized view of one raw host chat record.
///
/// Ephemeral: recomputed on every render from the cache plus the organizer
/// store, never persisted. `folder_id` and `is_favorite` are stamped by the
/// pipeline; straight out of the normalizer they carry defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatEntry {
    /// Chat file name as the host reports it
    pub file_name: String,
    /// File name without the `.jsonl` suffix
    pub display_name: String,
    /// Last-message preview text, truncated for display
    pub preview: String,
    /// Message count, 0 when the host reports none
    pub message_count: u64,
    /// Last-message timestamp in epoch millis, 0 when unknown
    pub last_date_ms: i64,
    /// Human-readable file size, empty when the host reports none
    pub file_size: String,
    /// Resolved folder assignment
    pub folder_id: String,
    /// Favorite membership
    pub is_favorite: bool,
}

impl ChatEntry {
    /// Key identifying this chat under the given character.
    pub fn key(&self, avatar: &str) -> ChatKey {
        ChatKey::new(avatar, self.file_name.as_str())
    }

    #[cfg(test)]
    pub(crate) fn named(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            display_name: file_name.trim_end_matches(".jsonl").to_string(),
            preview: String::new(),
            message_count: 0,
            last_date_ms: 0,
            file_size: String::new(),
            folder_id: crate::organizer::UNCATEGORIZED_FOLDER_ID.to_string(),
            is_favorite: false,
        }
    }
}

pub mod cache;
pub mod normalizer;
pub mod service;
pub mod sorting;

pub use cache::ChatsCache;
pub use service::ChatService;
