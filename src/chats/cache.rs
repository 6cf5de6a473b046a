//! TTL caches for chat lists and chat counts.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::ChatEntry;

/// Chat-list entries live this long before the cache is considered stale.
pub const CHATS_TTL: Duration = Duration::from_secs(30);

/// Chat counts live longer; they only change on create/delete.
pub const COUNTS_TTL: Duration = Duration::from_secs(60);

struct Stamped<T> {
    at: Instant,
    value: T,
}

/// Lazily-populated caches keyed by character avatar.
///
/// A stale hit clears the whole cache, not just the stale entry, and
/// invalidation triggers (chat created, chat deleted) clear wholesale too.
/// Staleness is treated as "the world moved on", not a per-entry event.
pub struct ChatsCache {
    chats: HashMap<String, Stamped<Vec<ChatEntry>>>,
    counts: HashMap<String, Stamped<usize>>,
    chats_ttl: Duration,
    counts_ttl: Duration,
}

impl ChatsCache {
    /// Cache with the production TTLs.
    pub fn new() -> Self {
        Self::with_ttls(CHATS_TTL, COUNTS_TTL)
    }

    /// Cache with explicit TTLs (tests shrink them to force expiry).
    pub fn with_ttls(chats_ttl: Duration, counts_ttl: Duration) -> Self {
        Self {
            chats: HashMap::new(),
            counts: HashMap::new(),
            chats_ttl,
            counts_ttl,
        }
    }

    /// Cached chat list for a character, if still fresh.
    pub fn get_chats(&mut self, avatar: &str) -> Option<Vec<ChatEntry>> {
        match self.chats.get(avatar) {
            Some(stamped) if stamped.at.elapsed() < self.chats_ttl => {
                Some(stamped.value.clone())
            }
            Some(_) => {
                self.chats.clear();
                None
            }
            None => None,
        }
    }

    /// Store a freshly-fetched chat list.
    pub fn put_chats(&mut self, avatar: &str, entries: Vec<ChatEntry>) {
        self.chats.insert(
            avatar.to_string(),
            Stamped {
                at: Instant::now(),
                value: entries,
            },
        );
    }

    /// Cached chat count for a character, if still fresh.
    pub fn get_count(&mut self, avatar: &str) -> Option<usize> {
        match self.counts.get(avatar) {
            Some(stamped) if stamped.at.elapsed() < self.counts_ttl => Some(stamped.value),
            Some(_) => {
                self.counts.clear();
                None
            }
            None => None,
        }
    }

    /// Store a freshly-derived chat count.
    pub fn put_count(&mut self, avatar: &str, count: usize) {
        self.counts.insert(
            avatar.to_string(),
            Stamped {
                at: Instant::now(),
                value: count,
            },
        );
    }

    /// Drop one character's cached data, or everything when `None`.
    /// Must be called after any mutation that changes the host's chat list.
    pub fn invalidate(&mut self, avatar: Option<&str>) {
        match avatar {
            Some(avatar) => {
                self.chats.remove(avatar);
                self.counts.remove(avatar);
            }
            None => {
                self.chats.clear();
                self.counts.clear();
            }
        }
    }
}

impl Default for ChatsCache {
    fn default() -> Self {
        Self::new()
    }
}
