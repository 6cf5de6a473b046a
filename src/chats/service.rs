//! Cache-backed chat retrieval per character.

use super::cache::ChatsCache;
use super::normalizer::normalize_payload;
use super::ChatEntry;
use crate::host::{ChatListPayload, HostApi};

/// Fetches, normalizes, and caches chat metadata.
///
/// Retrieval never fails: transport errors, non-2xx statuses, and the host's
/// error sentinel all degrade to an empty list with a logged warning. Only a
/// successful array/map response is cached.
pub struct ChatService {
    cache: ChatsCache,
}

impl ChatService {
    /// Service with the production cache TTLs.
    pub fn new() -> Self {
        Self {
            cache: ChatsCache::new(),
        }
    }

    /// Service with an explicit cache (tests shrink the TTLs).
    pub fn with_cache(cache: ChatsCache) -> Self {
        Self { cache }
    }

    /// Chat entries for one character, from cache when fresh.
    pub fn load_chats(
        &mut self,
        api: &dyn HostApi,
        avatar: &str,
        force_refresh: bool,
    ) -> Vec<ChatEntry> {
        if avatar.is_empty() {
            return Vec::new();
        }
        if !force_refresh {
            if let Some(entries) = self.cache.get_chats(avatar) {
                return entries;
            }
        }

        match api.fetch_chats(avatar) {
            Ok(ChatListPayload::Rejected) => {
                log::warn!("host rejected chat list for {avatar}");
                Vec::new()
            }
            Ok(payload) => {
                let entries = normalize_payload(payload);
                self.cache.put_chats(avatar, entries.clone());
                entries
            }
            Err(e) => {
                log::warn!("failed to load chats for {avatar}: {e}");
                Vec::new()
            }
        }
    }

    /// Number of chats a character owns, from the count cache when fresh.
    pub fn chat_count(&mut self, api: &dyn HostApi, avatar: &str) -> usize {
        if let Some(count) = self.cache.get_count(avatar) {
            return count;
        }
        let count = self.load_chats(api, avatar, false).len();
        self.cache.put_count(avatar, count);
        count
    }

    /// Drop cached data after the host's chat list changed (create/delete).
    pub fn invalidate(&mut self, avatar: Option<&str>) {
        self.cache.invalidate(avatar);
    }
}

impl Default for ChatService {
    fn default() -> Self {
        Self::new()
    }
}
