//! Host application boundary.
//!
//! The host owns authentication, character storage, and chat storage. This
//! module models everything the lobby consumes from it: the REST endpoints
//! as [`HostApi`], the in-process persona registry as [`PersonaDirectory`],
//! the live character list as [`CharacterSource`], and the navigation hooks
//! as [`HostNavigator`]. Response shapes are decoded once here, at the
//! boundary, into [`ChatListPayload`].

use serde_json::Value;
use thiserror::Error;

use crate::characters::Character;

/// Failure taxonomy for host requests.
#[derive(Debug, Error)]
pub enum HostError {
    /// Connection/transport failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx HTTP status
    #[error("host returned HTTP {0}")]
    Status(u16),
    /// The host answered but rejected the request
    #[error("host rejected the request")]
    Rejected,
    /// 2xx response whose body was not the expected shape
    #[error("could not decode host response: {0}")]
    Decode(String),
}

/// Decoded shape of the host's chat-listing response.
///
/// The endpoint may answer with an array of chat records, an object map of
/// `filename -> record`, or an `{error: true}` sentinel. Decoding happens
/// once here instead of shape-checking at every call site.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatListPayload {
    /// One raw record per chat; map responses are flattened to entries
    Entries(Vec<Value>),
    /// The character has no chats
    Empty,
    /// The host emitted its error sentinel
    Rejected,
}

/// Decode a raw chat-listing body into a [`ChatListPayload`].
///
/// Map entries are paired with their keys: an object value keeps its own
/// `file_name` if present, otherwise the map key becomes the filename; a
/// non-object value is reduced to just that filename.
pub fn decode_chat_list(body: Value) -> ChatListPayload {
    match body {
        Value::Array(records) => {
            if records.is_empty() {
                ChatListPayload::Empty
            } else {
                ChatListPayload::Entries(records)
            }
        }
        Value::Object(map) => {
            if map.get("error").and_then(Value::as_bool) == Some(true) {
                return ChatListPayload::Rejected;
            }
            if map.is_empty() {
                return ChatListPayload::Empty;
            }
            let records = map
                .into_iter()
                .map(|(file_name, value)| match value {
                    Value::Object(mut record) => {
                        record
                            .entry("file_name".to_string())
                            .or_insert_with(|| Value::String(file_name));
                        Value::Object(record)
                    }
                    _ => serde_json::json!({ "file_name": file_name }),
                })
                .collect();
            ChatListPayload::Entries(records)
        }
        _ => ChatListPayload::Empty,
    }
}

/// The host's REST surface consumed by the lobby.
pub trait HostApi {
    /// `POST /api/avatars/get`: persona avatar filenames.
    fn fetch_persona_avatars(&self) -> Result<Vec<String>, HostError>;

    /// `POST /api/avatars/delete`: remove a persona.
    fn delete_persona(&self, avatar: &str) -> Result<(), HostError>;

    /// `POST /api/characters/chats`: chat records for one character.
    fn fetch_chats(&self, avatar_url: &str) -> Result<ChatListPayload, HostError>;

    /// `POST /api/chats/delete`: remove one chat file.
    fn delete_chat(&self, chat_file: &str, avatar_url: &str) -> Result<(), HostError>;

    /// `POST /api/characters/delete`: remove a character, optionally with its chats.
    fn delete_character(&self, avatar_url: &str, delete_chats: bool) -> Result<(), HostError>;
}

/// The host's in-process persona registry.
pub trait PersonaDirectory {
    /// User-assigned display name for a persona avatar, if any.
    fn persona_name(&self, avatar: &str) -> Option<String>;

    /// Avatar of the currently active persona.
    fn current_persona(&self) -> Option<String>;

    /// Switch the active persona.
    fn set_persona(&self, avatar: &str) -> anyhow::Result<()>;
}

/// The host's live, read-only character list.
pub trait CharacterSource {
    /// Snapshot of the current character list, in host order.
    fn characters(&self) -> Vec<Character>;
}

/// Navigation hooks into the host UI, invoked after the lobby closes.
///
/// The concrete implementation drives host controls the lobby does not own;
/// it is the least portable part of the system and stays behind this trait
/// so everything above it can run against a recording fake.
pub trait HostNavigator {
    /// Focus the character at the given index in the host's list.
    fn select_character(&self, index: usize);

    /// Open the chat at the given index of the focused character's chat list.
    fn open_chat(&self, chat_index: usize);

    /// Start a fresh chat with the focused character.
    fn start_new_chat(&self);
}

pub mod client;

pub use client::HttpHostApi;
