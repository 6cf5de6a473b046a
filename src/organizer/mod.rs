//! Folder/favorite organization of saved chats.
//!
//! Everything a user can arrange (folders, chat-to-folder assignments,
//! favorites, sort and filter preferences) lives in one persisted record
//! that is loaded once, merged with defaults for forward compatibility, and
//! written back after every mutation.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Conceptual system folder backing the favorites filter. Never assignable.
pub const FAVORITES_FOLDER_ID: &str = "favorites";

/// Default assignment for every chat without an explicit folder.
pub const UNCATEGORIZED_FOLDER_ID: &str = "uncategorized";

/// Check whether a folder id names one of the two system folders.
pub fn is_system_folder(id: &str) -> bool {
    id == FAVORITES_FOLDER_ID || id == UNCATEGORIZED_FOLDER_ID
}

/// Composite identifier for a single saved chat: character avatar + chat file.
///
/// Persisted as the joined `avatar_filename` string for compatibility with
/// the stored record shape. Avatars or filenames containing `_` make the
/// joined form ambiguous to split; keys are always constructed from their
/// parts, so the joined form is only ever compared whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChatKey {
    /// Character avatar id (e.g. `Seraphina.png`)
    pub avatar: String,
    /// Chat file name (e.g. `Seraphina - 2025-01-05@10h00m00s.jsonl`)
    pub file_name: String,
}

impl ChatKey {
    /// Create a key from its parts.
    pub fn new(avatar: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            avatar: avatar.into(),
            file_name: file_name.into(),
        }
    }

    /// Joined form used as the storage map key.
    pub fn storage_key(&self) -> String {
        format!("{}_{}", self.avatar, self.file_name)
    }
}

impl fmt::Display for ChatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.avatar, self.file_name)
    }
}

impl FromStr for ChatKey {
    type Err = String;

    /// Split the joined form at the first `_`. Ambiguous when the avatar id
    /// itself contains an underscore; keys read back from storage are only
    /// compared whole, never re-split into parts.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('_') {
            Some((avatar, file_name)) => Ok(Self::new(avatar, file_name)),
            None => Err(format!("chat key missing separator: {s}")),
        }
    }
}

impl Serialize for ChatKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChatKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ChatKey::from_str(&s).map_err(D::Error::custom)
    }
}

/// A bucket a chat can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder id (`uncategorized`, or `folder_<millis>` for user folders)
    pub id: String,
    /// Display name
    pub name: String,
    /// System folders cannot be renamed or deleted
    #[serde(default)]
    pub is_system: bool,
    /// Position in the folder list; `uncategorized` carries the sentinel-last order
    #[serde(default)]
    pub order: i64,
}

impl Folder {
    /// The always-present default folder.
    pub fn uncategorized() -> Self {
        Self {
            id: UNCATEGORIZED_FOLDER_ID.to_string(),
            name: "Uncategorized".to_string(),
            is_system: true,
            order: i64::MAX,
        }
    }
}

/// Chat-level sort policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    /// Most recent chat first (default)
    #[default]
    Recent,
    /// Creation time, newest first
    Created,
    /// Locale-aware filename order
    Name,
    /// Favorites emphasized (recency within)
    Favorites,
    /// Message count, highest first
    Messages,
}

/// Character-level sort policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharSortOption {
    /// Most recently chatted first (default)
    #[default]
    Recent,
    /// Locale-aware name order
    Name,
    /// Newest character first
    Created,
    /// Most chats first
    Chats,
}

/// Which chats pass the folder filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderFilter {
    /// Every chat passes
    #[default]
    All,
    /// Only favorited chats
    Favorites,
    /// Only chats assigned to this folder
    #[serde(untagged)]
    Folder(String),
}

/// A rule that favorites matching chats automatically when they load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoFavoriteRule {
    /// Case-insensitive substring matched against the chat file name
    pub pattern: String,
}

/// The persisted organization record.
///
/// Every field carries a serde default so a record saved by an older
/// revision backfills missing keys on load (saved values win).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerState {
    #[serde(default = "default_folders")]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub chat_assignments: HashMap<ChatKey, String>,
    #[serde(default)]
    pub favorites: HashSet<ChatKey>,
    #[serde(default)]
    pub sort_option: SortOption,
    #[serde(default)]
    pub filter_folder: FolderFilter,
    #[serde(default)]
    pub collapsed_folders: HashSet<String>,
    #[serde(default)]
    pub char_sort_option: CharSortOption,
    #[serde(default)]
    pub auto_favorite_rules: Vec<AutoFavoriteRule>,
}

fn default_folders() -> Vec<Folder> {
    vec![Folder::uncategorized()]
}

impl Default for OrganizerState {
    fn default() -> Self {
        Self {
            folders: default_folders(),
            chat_assignments: HashMap::new(),
            favorites: HashSet::new(),
            sort_option: SortOption::default(),
            filter_folder: FolderFilter::default(),
            collapsed_folders: HashSet::new(),
            char_sort_option: CharSortOption::default(),
            auto_favorite_rules: Vec::new(),
        }
    }
}

pub mod store;

pub use store::OrganizerStore;
