//! Organization store persistence and mutation.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{
    is_system_folder, AutoFavoriteRule, CharSortOption, ChatKey, Folder, FolderFilter,
    OrganizerState, SortOption, UNCATEGORIZED_FOLDER_ID,
};

/// Owns the persisted [`OrganizerState`] and writes it back after every
/// mutation. Loading never fails: a missing or corrupt record degrades to a
/// structurally-complete default, and a failed save is logged and dropped.
pub struct OrganizerStore {
    state: OrganizerState,
    /// Path to the organizer file; empty for in-memory stores
    store_path: PathBuf,
}

impl OrganizerStore {
    /// Load the store from the config directory.
    pub fn load() -> Self {
        match Self::store_path() {
            Ok(path) => Self::at_path(path),
            Err(e) => {
                log::warn!("no config directory, organizer will not persist: {e:#}");
                Self::empty()
            }
        }
    }

    /// Load the store from an explicit path (fixture stores in tests).
    pub fn at_path(path: PathBuf) -> Self {
        let state = if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str::<OrganizerState>(&content) {
                    Ok(state) => state,
                    Err(e) => {
                        log::warn!("corrupt organizer file {}, using defaults: {e}", path.display());
                        OrganizerState::default()
                    }
                },
                Err(e) => {
                    log::warn!("unreadable organizer file {}: {e}", path.display());
                    OrganizerState::default()
                }
            }
        } else {
            OrganizerState::default()
        };

        let mut store = Self {
            state,
            store_path: path,
        };
        store.ensure_system_folders();
        store
    }

    /// Create a new in-memory store that skips persistence.
    pub fn empty() -> Self {
        Self {
            state: OrganizerState::default(),
            store_path: PathBuf::new(),
        }
    }

    fn store_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("chatlobby");
        Ok(config_dir.join("organizer.json"))
    }

    /// The `uncategorized` folder must always exist, and nothing may claim
    /// the conceptual `favorites` id as an assignable folder.
    fn ensure_system_folders(&mut self) {
        self.state
            .folders
            .retain(|f| f.id != super::FAVORITES_FOLDER_ID);
        if !self
            .state
            .folders
            .iter()
            .any(|f| f.id == UNCATEGORIZED_FOLDER_ID)
        {
            self.state.folders.push(Folder::uncategorized());
        }
    }

    /// Persist the whole record. Best-effort: failures (quota, serialization)
    /// are logged and the in-memory mutation is kept.
    pub fn save(&self) {
        if self.store_path.as_os_str().is_empty() {
            return;
        }
        if let Err(e) = self.try_save() {
            log::warn!("failed to save organizer state: {e:#}");
        }
    }

    fn try_save(&self) -> Result<()> {
        if let Some(parent) = self.store_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = serde_json::to_string_pretty(&self.state)
            .context("Failed to serialize organizer state")?;
        std::fs::write(&self.store_path, content).context("Failed to write organizer file")?;
        Ok(())
    }

    /// Read-only view of the full record.
    pub fn state(&self) -> &OrganizerState {
        &self.state
    }

    // --- folders ---

    /// Create a user folder, ordered after every existing non-system folder.
    /// Returns the fresh folder id.
    pub fn add_folder(&mut self, name: &str) -> String {
        let order = self
            .state
            .folders
            .iter()
            .filter(|f| !f.is_system)
            .map(|f| f.order)
            .max()
            .unwrap_or(0)
            + 1;

        let mut id = format!("folder_{}", chrono::Utc::now().timestamp_millis());
        if self.state.folders.iter().any(|f| f.id == id) {
            // Two folders created within the same millisecond
            id.push_str(&format!("_{order}"));
        }

        self.state.folders.push(Folder {
            id: id.clone(),
            name: name.to_string(),
            is_system: false,
            order,
        });
        self.save();
        id
    }

    /// Delete a user folder, reassigning its chats to `uncategorized`.
    /// Returns false for system or unknown folders.
    pub fn delete_folder(&mut self, id: &str) -> bool {
        if is_system_folder(id) || !self.state.folders.iter().any(|f| f.id == id) {
            return false;
        }

        for folder_id in self.state.chat_assignments.values_mut() {
            if folder_id == id {
                *folder_id = UNCATEGORIZED_FOLDER_ID.to_string();
            }
        }
        self.state.folders.retain(|f| f.id != id);
        self.state.collapsed_folders.remove(id);
        if self.state.filter_folder == FolderFilter::Folder(id.to_string()) {
            self.state.filter_folder = FolderFilter::All;
        }
        self.save();
        true
    }

    /// Rename a user folder. Returns false for system or unknown folders.
    pub fn rename_folder(&mut self, id: &str, new_name: &str) -> bool {
        if is_system_folder(id) {
            return false;
        }
        let Some(folder) = self.state.folders.iter_mut().find(|f| f.id == id) else {
            return false;
        };
        folder.name = new_name.to_string();
        self.save();
        true
    }

    /// Folders in display order: user folders by `order`, `uncategorized` last.
    pub fn folders_sorted(&self) -> Vec<&Folder> {
        let mut folders: Vec<&Folder> = self.state.folders.iter().collect();
        folders.sort_by_key(|f| f.order);
        folders
    }

    // --- assignments & favorites ---

    /// Upsert a chat's folder assignment. The folder id is not validated;
    /// a dangling assignment resolves like `uncategorized` at display time
    /// once the folder filter finds nothing to match it against.
    pub fn assign_chat(&mut self, key: ChatKey, folder_id: &str) {
        self.state.chat_assignments.insert(key, folder_id.to_string());
        self.save();
    }

    /// Resolved folder for a chat; unassigned chats are `uncategorized`.
    pub fn folder_of(&self, key: &ChatKey) -> &str {
        self.state
            .chat_assignments
            .get(key)
            .map_or(UNCATEGORIZED_FOLDER_ID, String::as_str)
    }

    /// Flip favorite membership. Returns the post-toggle state.
    pub fn toggle_favorite(&mut self, key: &ChatKey) -> bool {
        let now_favorite = if self.state.favorites.remove(key) {
            false
        } else {
            self.state.favorites.insert(key.clone());
            true
        };
        self.save();
        now_favorite
    }

    /// Whether a chat is currently favorited.
    pub fn is_favorite(&self, key: &ChatKey) -> bool {
        self.state.favorites.contains(key)
    }

    /// Assign every key to the target folder in one persisted write.
    /// Returns how many assignments were written.
    pub fn move_chats_batch(&mut self, keys: &[ChatKey], target_folder_id: &str) -> usize {
        for key in keys {
            self.state
                .chat_assignments
                .insert(key.clone(), target_folder_id.to_string());
        }
        self.save();
        keys.len()
    }

    // --- preferences ---

    /// Set the chat-level sort policy.
    pub fn set_sort_option(&mut self, option: SortOption) {
        self.state.sort_option = option;
        self.save();
    }

    /// Set the character-level sort policy.
    pub fn set_char_sort_option(&mut self, option: CharSortOption) {
        self.state.char_sort_option = option;
        self.save();
    }

    /// Set the active folder filter.
    pub fn set_filter_folder(&mut self, filter: FolderFilter) {
        self.state.filter_folder = filter;
        self.save();
    }

    /// Collapse or expand a folder in the chat list.
    pub fn set_folder_collapsed(&mut self, id: &str, collapsed: bool) {
        if collapsed {
            self.state.collapsed_folders.insert(id.to_string());
        } else {
            self.state.collapsed_folders.remove(id);
        }
        self.save();
    }

    /// Flip a folder's collapsed state. Returns whether it is now collapsed.
    pub fn toggle_folder_collapsed(&mut self, id: &str) -> bool {
        let collapsed = !self.state.collapsed_folders.contains(id);
        self.set_folder_collapsed(id, collapsed);
        collapsed
    }

    // --- auto-favorite rules ---

    /// Add an auto-favorite pattern.
    pub fn add_auto_favorite_rule(&mut self, pattern: &str) {
        let rule = AutoFavoriteRule {
            pattern: pattern.to_string(),
        };
        if !self.state.auto_favorite_rules.contains(&rule) {
            self.state.auto_favorite_rules.push(rule);
            self.save();
        }
    }

    /// Remove an auto-favorite pattern. Returns whether it existed.
    pub fn remove_auto_favorite_rule(&mut self, pattern: &str) -> bool {
        let before = self.state.auto_favorite_rules.len();
        self.state.auto_favorite_rules.retain(|r| r.pattern != pattern);
        let removed = self.state.auto_favorite_rules.len() != before;
        if removed {
            self.save();
        }
        removed
    }

    /// Favorite every listed chat whose file name matches a rule pattern
    /// (case-insensitive substring). Rules only ever add favorites.
    /// Returns how many chats were newly favorited.
    pub fn apply_auto_favorite_rules<'a>(
        &mut self,
        avatar: &str,
        file_names: impl IntoIterator<Item = &'a str>,
    ) -> usize {
        if self.state.auto_favorite_rules.is_empty() {
            return 0;
        }

        let patterns: Vec<String> = self
            .state
            .auto_favorite_rules
            .iter()
            .map(|r| r.pattern.to_lowercase())
            .collect();

        let mut added = 0;
        for file_name in file_names {
            let lower = file_name.to_lowercase();
            if patterns.iter().any(|p| !p.is_empty() && lower.contains(p)) {
                let key = ChatKey::new(avatar, file_name);
                if self.state.favorites.insert(key) {
                    added += 1;
                }
            }
        }
        if added > 0 {
            self.save();
        }
        added
    }
}
