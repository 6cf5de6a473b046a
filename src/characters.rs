//! Character grid data: loading, searching, and sorting.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

use crate::collation::compare_names;
use crate::host::CharacterSource;
use crate::organizer::CharSortOption;

/// How many times to re-read an empty character list before giving up.
/// The host populates its list asynchronously at startup, so the first read
/// can race it; this is the only retried operation in the system.
pub const CHARACTER_LOAD_ATTEMPTS: u32 = 3;

/// Fixed delay between character-list retries.
pub const CHARACTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// A chat counterpart entity owned by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    /// Display name
    pub name: String,
    /// Avatar id, the key every chat/persona operation uses
    pub avatar: String,
    /// When the character was added, epoch millis (0 when unknown)
    pub create_date_ms: i64,
    /// When the character was last chatted with, epoch millis (0 when unknown)
    pub last_chat_ms: i64,
}

impl Character {
    /// Decode a character from the host's JSON blob shape. Characters
    /// without an avatar are unusable (every lookup is keyed by it) and
    /// decode to `None`; everything else is tolerated.
    pub fn from_value(value: &Value) -> Option<Self> {
        let avatar = value.get("avatar").and_then(Value::as_str)?;
        if avatar.is_empty() {
            return None;
        }
        Some(Self {
            name: value
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string(),
            avatar: avatar.to_string(),
            create_date_ms: value
                .get("date_added")
                .and_then(Value::as_i64)
                .unwrap_or(0),
            last_chat_ms: value
                .get("date_last_chat")
                .and_then(Value::as_i64)
                .unwrap_or(0),
        })
    }
}

/// Read the host's character list, retrying while it is still empty.
pub fn load_characters_with_retry(
    source: &dyn CharacterSource,
    attempts: u32,
    delay: Duration,
) -> Vec<Character> {
    let mut characters = source.characters();
    let mut attempt = 0;
    while characters.is_empty() && attempt < attempts {
        attempt += 1;
        log::debug!("character list empty, retry {attempt}/{attempts}");
        std::thread::sleep(delay);
        characters = source.characters();
    }
    characters
}

/// Case-insensitive name-substring search over the grid.
pub fn filter_characters<'a>(characters: &'a [Character], term: &str) -> Vec<&'a Character> {
    if term.is_empty() {
        return characters.iter().collect();
    }
    let term = term.to_lowercase();
    characters
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&term))
        .collect()
}

/// Order the grid by the character-level sort option. `counts` backs the
/// `Chats` option; characters missing from it count as zero.
pub fn sort_characters(
    characters: &mut [Character],
    option: CharSortOption,
    counts: &HashMap<String, usize>,
) {
    match option {
        CharSortOption::Recent => {
            characters.sort_by(|a, b| b.last_chat_ms.cmp(&a.last_chat_ms));
        }
        CharSortOption::Name => characters.sort_by(|a, b| compare_names(&a.name, &b.name)),
        CharSortOption::Created => {
            characters.sort_by(|a, b| b.create_date_ms.cmp(&a.create_date_ms));
        }
        CharSortOption::Chats => characters.sort_by(|a, b| {
            let count = |c: &Character| counts.get(&c.avatar).copied().unwrap_or(0);
            count(b).cmp(&count(a))
        }),
    }
}
