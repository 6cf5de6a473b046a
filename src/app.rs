//! Application root: owns the store, caches, and host handles.
//!
//! [`LobbyApp`] is the single owner of every piece of mutable state the
//! lobby has (the organizer store, the chat service and its caches, the
//! batch selection), and the host capabilities are injected as trait
//! objects, so the whole thing runs against fixtures in tests.

use std::time::{Duration, Instant};

use crate::characters::{
    filter_characters, load_characters_with_retry, sort_characters, Character,
    CHARACTER_LOAD_ATTEMPTS, CHARACTER_RETRY_DELAY,
};
use crate::chats::sorting::run_pipeline;
use crate::chats::{ChatEntry, ChatService};
use crate::host::{CharacterSource, HostApi, HostError, HostNavigator, PersonaDirectory};
use crate::organizer::{CharSortOption, ChatKey, FolderFilter, OrganizerStore, SortOption};
use crate::personas::{load_personas, Persona};
use crate::selection::{BatchMoveError, BatchSelection, SelectionMode};

/// Free-text character search settles this long before a reload.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Outcome of a chat delete against the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The host deleted the file; caches invalidated, view updated
    Deleted,
    /// The host refused (file may already be gone). The view is unchanged;
    /// the user may choose [`LobbyApp::remove_chat_from_view`].
    Rejected,
}

/// Debounces free-text search at the data layer: only the last term to sit
/// unchanged for the delay is released.
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl SearchDebouncer {
    /// Debouncer with the given settle delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a new input, restarting the settle window.
    pub fn input(&mut self, term: &str, now: Instant) {
        self.pending = Some((term.to_string(), now));
    }

    /// Release the pending term once it has settled.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let settled = matches!(
            &self.pending,
            Some((_, at)) if now.duration_since(*at) >= self.delay
        );
        if settled {
            self.pending.take().map(|(term, _)| term)
        } else {
            None
        }
    }
}

/// The lobby's application root.
pub struct LobbyApp {
    store: OrganizerStore,
    chats: ChatService,
    api: Box<dyn HostApi>,
    characters: Box<dyn CharacterSource>,
    personas: Box<dyn PersonaDirectory>,
    navigator: Box<dyn HostNavigator>,
    selection: BatchSelection,
    search: SearchDebouncer,
    search_term: String,
    lobby_open: bool,
    character_grid: Vec<Character>,
    persona_bar: Vec<Persona>,
    selected_character: Option<String>,
    chat_view: Vec<ChatEntry>,
}

impl LobbyApp {
    /// Wire up an app from a store and the host capabilities.
    pub fn new(
        store: OrganizerStore,
        api: Box<dyn HostApi>,
        characters: Box<dyn CharacterSource>,
        personas: Box<dyn PersonaDirectory>,
        navigator: Box<dyn HostNavigator>,
    ) -> Self {
        Self {
            store,
            chats: ChatService::new(),
            api,
            characters,
            personas,
            navigator,
            selection: BatchSelection::new(),
            search: SearchDebouncer::new(SEARCH_DEBOUNCE),
            search_term: String::new(),
            lobby_open: false,
            character_grid: Vec::new(),
            persona_bar: Vec::new(),
            selected_character: None,
            chat_view: Vec::new(),
        }
    }

    /// Read-only access to the organizer store.
    pub fn store(&self) -> &OrganizerStore {
        &self.store
    }

    /// Whether the lobby overlay is currently open.
    pub fn is_lobby_open(&self) -> bool {
        self.lobby_open
    }

    // --- lobby lifecycle ---

    /// Open the lobby: load the character grid (with the startup retry) and
    /// the persona bar.
    pub fn open_lobby(&mut self) {
        self.lobby_open = true;
        self.refresh_characters();
        self.refresh_personas();
    }

    /// Close the lobby. Selection is forcibly reset so a stale multi-select
    /// cannot survive into the next open.
    pub fn close_lobby(&mut self) {
        self.lobby_open = false;
        self.selection.reset();
        self.selected_character = None;
        self.chat_view.clear();
    }

    // --- characters ---

    /// Re-read the character grid from the host and order it by the active
    /// character sort option.
    pub fn refresh_characters(&mut self) {
        let mut grid = load_characters_with_retry(
            self.characters.as_ref(),
            CHARACTER_LOAD_ATTEMPTS,
            CHARACTER_RETRY_DELAY,
        );

        let option = self.store.state().char_sort_option;
        let counts = if option == CharSortOption::Chats {
            grid.iter()
                .map(|c| {
                    let count = self.chats.chat_count(self.api.as_ref(), &c.avatar);
                    (c.avatar.clone(), count)
                })
                .collect()
        } else {
            Default::default()
        };
        sort_characters(&mut grid, option, &counts);
        self.character_grid = grid;
    }

    /// Characters passing the active search term, in grid order.
    pub fn visible_characters(&self) -> Vec<&Character> {
        filter_characters(&self.character_grid, &self.search_term)
    }

    /// Change the character sort and re-order the grid.
    pub fn set_char_sort_option(&mut self, option: CharSortOption) {
        self.store.set_char_sort_option(option);
        self.refresh_characters();
    }

    // --- search ---

    /// Feed a search keystroke into the debouncer.
    pub fn search_input(&mut self, term: &str) {
        self.search.input(term, Instant::now());
    }

    /// Apply the debounced search term once it settles. Returns whether the
    /// visible grid changed.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        let Some(term) = self.search.poll(now) else {
            return false;
        };
        self.search_term = term;
        true
    }

    // --- personas ---

    /// Re-fetch the persona bar.
    pub fn refresh_personas(&mut self) {
        self.persona_bar = load_personas(self.api.as_ref(), self.personas.as_ref());
    }

    /// The persona bar, sorted for display.
    pub fn personas(&self) -> &[Persona] {
        &self.persona_bar
    }

    /// Avatar of the active persona, if the host reports one.
    pub fn current_persona(&self) -> Option<String> {
        self.personas.current_persona()
    }

    /// Switch the active persona.
    pub fn select_persona(&mut self, avatar: &str) -> anyhow::Result<()> {
        self.personas.set_persona(avatar)
    }

    /// Delete a persona and refresh the bar.
    pub fn delete_persona(&mut self, avatar: &str) -> Result<(), HostError> {
        self.api.delete_persona(avatar)?;
        self.refresh_personas();
        Ok(())
    }

    // --- chats ---

    /// Open a character's chat panel: load (cache-backed), apply the
    /// auto-favorite rules, and run the filter/sort pipeline.
    pub fn select_character(&mut self, avatar: &str) -> &[ChatEntry] {
        self.selected_character = Some(avatar.to_string());
        self.rebuild_chat_view(false);
        &self.chat_view
    }

    /// The chat panel as last built by the pipeline.
    pub fn chat_view(&self) -> &[ChatEntry] {
        &self.chat_view
    }

    fn rebuild_chat_view(&mut self, force_refresh: bool) {
        let Some(avatar) = self.selected_character.clone() else {
            self.chat_view.clear();
            return;
        };
        let entries = self
            .chats
            .load_chats(self.api.as_ref(), &avatar, force_refresh);
        self.store
            .apply_auto_favorite_rules(&avatar, entries.iter().map(|e| e.file_name.as_str()));
        self.chat_view = run_pipeline(entries, &avatar, &self.store);
    }

    fn selected_key(&self, file_name: &str) -> Option<ChatKey> {
        self.selected_character
            .as_deref()
            .map(|avatar| ChatKey::new(avatar, file_name))
    }

    /// Flip a chat's favorite flag. Returns the post-toggle state, or None
    /// when no character is selected.
    pub fn toggle_favorite(&mut self, file_name: &str) -> Option<bool> {
        let key = self.selected_key(file_name)?;
        let now_favorite = self.store.toggle_favorite(&key);
        self.rebuild_chat_view(false);
        Some(now_favorite)
    }

    /// Move a chat to a folder.
    pub fn assign_chat(&mut self, file_name: &str, folder_id: &str) {
        if let Some(key) = self.selected_key(file_name) {
            self.store.assign_chat(key, folder_id);
            self.rebuild_chat_view(false);
        }
    }

    /// Create a folder, returning its id.
    pub fn create_folder(&mut self, name: &str) -> String {
        self.store.add_folder(name)
    }

    /// Delete a folder (chats fall back to uncategorized).
    pub fn delete_folder(&mut self, id: &str) -> bool {
        let deleted = self.store.delete_folder(id);
        if deleted {
            self.rebuild_chat_view(false);
        }
        deleted
    }

    /// Rename a folder.
    pub fn rename_folder(&mut self, id: &str, new_name: &str) -> bool {
        self.store.rename_folder(id, new_name)
    }

    /// Change the chat sort and re-run the pipeline.
    pub fn set_sort_option(&mut self, option: SortOption) {
        self.store.set_sort_option(option);
        self.rebuild_chat_view(false);
    }

    /// Change the folder filter and re-run the pipeline.
    pub fn set_filter_folder(&mut self, filter: FolderFilter) {
        self.store.set_filter_folder(filter);
        self.rebuild_chat_view(false);
    }

    // --- batch selection ---

    /// Flip multi-select mode.
    pub fn toggle_selection_mode(&mut self) -> SelectionMode {
        self.selection.toggle_mode()
    }

    /// Current selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    /// Flip one chat's selected flag.
    pub fn toggle_chat_selected(&mut self, file_name: &str) -> bool {
        match self.selected_key(file_name) {
            Some(key) => self.selection.toggle(key),
            None => false,
        }
    }

    /// Whether one chat is selected.
    pub fn is_chat_selected(&self, file_name: &str) -> bool {
        self.selected_key(file_name)
            .is_some_and(|key| self.selection.is_selected(&key))
    }

    /// How many chats are selected.
    pub fn selected_count(&self) -> usize {
        self.selection.count()
    }

    /// Move every selected chat to the target folder and leave selection
    /// mode. Validation failures abort without touching anything.
    pub fn execute_batch_move(&mut self, target_folder_id: &str) -> Result<usize, BatchMoveError> {
        let moved = self.selection.execute_move(&mut self.store, target_folder_id)?;
        self.rebuild_chat_view(false);
        Ok(moved)
    }

    // --- navigation ---

    /// Index of an avatar in the host's live character list.
    fn host_character_index(&self, avatar: &str) -> Option<usize> {
        self.characters
            .characters()
            .iter()
            .position(|c| c.avatar == avatar)
    }

    /// Close the lobby and drive the host to the selected character's chat
    /// at `chat_index` in the current view. Returns false when the
    /// character is no longer in the host's list.
    pub fn open_chat(&mut self, chat_index: usize) -> bool {
        let Some(avatar) = self.selected_character.clone() else {
            return false;
        };
        let Some(char_index) = self.host_character_index(&avatar) else {
            log::warn!("character {avatar} not found in host list");
            return false;
        };

        self.close_lobby();
        self.navigator.select_character(char_index);
        self.navigator.open_chat(chat_index);
        true
    }

    /// Close the lobby and start a fresh chat with the selected character.
    /// When the character has no chat history the host starts one by itself
    /// on selection, so the explicit new-chat trigger is skipped.
    pub fn start_new_chat(&mut self) -> bool {
        let Some(avatar) = self.selected_character.clone() else {
            return false;
        };
        let Some(char_index) = self.host_character_index(&avatar) else {
            log::warn!("character {avatar} not found in host list");
            return false;
        };
        let has_chats = !self.chat_view.is_empty();

        self.close_lobby();
        self.navigator.select_character(char_index);
        if has_chats {
            self.navigator.start_new_chat();
        }
        // Whichever path ran, the host's chat list for this character changed.
        self.chats.invalidate(Some(&avatar));
        true
    }

    // --- destructive actions ---

    /// Delete a chat on the host. Success invalidates the character's
    /// caches and drops the entry from the view; refusal leaves both alone
    /// so the user can decide whether to force-remove.
    pub fn delete_chat(&mut self, file_name: &str) -> DeleteOutcome {
        let Some(avatar) = self.selected_character.clone() else {
            return DeleteOutcome::Rejected;
        };

        match self.api.delete_chat(file_name, &avatar) {
            Ok(()) => {
                self.chats.invalidate(Some(&avatar));
                self.rebuild_chat_view(false);
                DeleteOutcome::Deleted
            }
            Err(e) => {
                log::warn!("failed to delete chat {file_name}: {e}");
                DeleteOutcome::Rejected
            }
        }
    }

    /// Drop a chat from the visible list without touching the host: the
    /// user's explicit choice after a failed delete.
    pub fn remove_chat_from_view(&mut self, file_name: &str) {
        self.chat_view.retain(|e| e.file_name != file_name);
    }

    /// Delete a character on the host, optionally with its chats, and
    /// refresh the grid.
    pub fn delete_character(
        &mut self,
        avatar: &str,
        delete_chats: bool,
    ) -> Result<(), HostError> {
        self.api.delete_character(avatar, delete_chats)?;
        self.chats.invalidate(Some(avatar));
        if self.selected_character.as_deref() == Some(avatar) {
            self.selected_character = None;
            self.chat_view.clear();
        }
        self.refresh_characters();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ChatListPayload;
    use crate::organizer::UNCATEGORIZED_FOLDER_ID;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Default)]
    struct HostCalls {
        chat_fetches: u32,
        deleted_chats: Vec<String>,
        selected_indices: Vec<usize>,
        opened_chats: Vec<usize>,
        new_chats: u32,
    }

    struct FakeHost {
        calls: Rc<RefCell<HostCalls>>,
        chats: ChatListPayload,
        reject_deletes: bool,
    }

    impl HostApi for FakeHost {
        fn fetch_persona_avatars(&self) -> Result<Vec<String>, HostError> {
            Ok(vec!["me.png".to_string()])
        }

        fn delete_persona(&self, _avatar: &str) -> Result<(), HostError> {
            Ok(())
        }

        fn fetch_chats(&self, _avatar_url: &str) -> Result<ChatListPayload, HostError> {
            self.calls.borrow_mut().chat_fetches += 1;
            Ok(self.chats.clone())
        }

        fn delete_chat(&self, chat_file: &str, _avatar_url: &str) -> Result<(), HostError> {
            if self.reject_deletes {
                return Err(HostError::Status(404));
            }
            self.calls.borrow_mut().deleted_chats.push(chat_file.to_string());
            Ok(())
        }

        fn delete_character(
            &self,
            _avatar_url: &str,
            _delete_chats: bool,
        ) -> Result<(), HostError> {
            Ok(())
        }
    }

    struct FakeSource {
        list: Vec<Character>,
    }

    impl CharacterSource for FakeSource {
        fn characters(&self) -> Vec<Character> {
            self.list.clone()
        }
    }

    struct FakeDirectory;

    impl PersonaDirectory for FakeDirectory {
        fn persona_name(&self, _avatar: &str) -> Option<String> {
            None
        }

        fn current_persona(&self) -> Option<String> {
            Some("me.png".to_string())
        }

        fn set_persona(&self, _avatar: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct FakeNavigator {
        calls: Rc<RefCell<HostCalls>>,
    }

    impl HostNavigator for FakeNavigator {
        fn select_character(&self, index: usize) {
            self.calls.borrow_mut().selected_indices.push(index);
        }

        fn open_chat(&self, chat_index: usize) {
            self.calls.borrow_mut().opened_chats.push(chat_index);
        }

        fn start_new_chat(&self) {
            self.calls.borrow_mut().new_chats += 1;
        }
    }

    fn chat_payload(names: &[&str]) -> ChatListPayload {
        ChatListPayload::Entries(
            names.iter().map(|n| json!({ "file_name": n })).collect(),
        )
    }

    fn alice() -> Character {
        Character {
            name: "Alice".to_string(),
            avatar: "alice.png".to_string(),
            create_date_ms: 0,
            last_chat_ms: 0,
        }
    }

    fn build_app(
        chats: ChatListPayload,
        reject_deletes: bool,
    ) -> (LobbyApp, Rc<RefCell<HostCalls>>) {
        let calls = Rc::new(RefCell::new(HostCalls::default()));
        let app = LobbyApp::new(
            OrganizerStore::empty(),
            Box::new(FakeHost {
                calls: Rc::clone(&calls),
                chats,
                reject_deletes,
            }),
            Box::new(FakeSource { list: vec![alice()] }),
            Box::new(FakeDirectory),
            Box::new(FakeNavigator {
                calls: Rc::clone(&calls),
            }),
        );
        (app, calls)
    }

    #[test]
    fn open_lobby_populates_grid_and_persona_bar() {
        let (mut app, _) = build_app(ChatListPayload::Empty, false);
        app.open_lobby();

        assert!(app.is_lobby_open());
        assert_eq!(app.visible_characters().len(), 1);
        assert_eq!(app.personas().len(), 1);
        assert_eq!(app.current_persona().as_deref(), Some("me.png"));
    }

    #[test]
    fn select_character_runs_the_pipeline() {
        let (mut app, _) = build_app(
            chat_payload(&[
                "Alice - 2025-01-05@10h00m00s.jsonl",
                "Alice - 2025-03-01@09h00m00s.jsonl",
            ]),
            false,
        );
        app.open_lobby();

        let view = app.select_character("alice.png");
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].file_name, "Alice - 2025-03-01@09h00m00s.jsonl");
        assert_eq!(view[0].folder_id, UNCATEGORIZED_FOLDER_ID);
    }

    #[test]
    fn close_lobby_resets_selection_and_panel() {
        let (mut app, _) = build_app(chat_payload(&["a - 2025-01-01.jsonl"]), false);
        app.open_lobby();
        app.select_character("alice.png");
        app.toggle_selection_mode();
        app.toggle_chat_selected("a - 2025-01-01.jsonl");
        assert_eq!(app.selected_count(), 1);

        app.close_lobby();

        assert!(!app.is_lobby_open());
        assert_eq!(app.selection_mode(), SelectionMode::Idle);
        assert_eq!(app.selected_count(), 0);
        assert!(app.chat_view().is_empty());
    }

    #[test]
    fn toggle_favorite_reorders_the_view() {
        let (mut app, _) = build_app(
            chat_payload(&[
                "new - 2025-03-01@00h00m00s.jsonl",
                "old - 2025-01-01@00h00m00s.jsonl",
            ]),
            false,
        );
        app.open_lobby();
        app.select_character("alice.png");
        assert_eq!(app.chat_view()[0].file_name, "new - 2025-03-01@00h00m00s.jsonl");

        let now_favorite = app
            .toggle_favorite("old - 2025-01-01@00h00m00s.jsonl")
            .unwrap();
        assert!(now_favorite);
        // Favorited chat jumps ahead despite being older.
        assert_eq!(app.chat_view()[0].file_name, "old - 2025-01-01@00h00m00s.jsonl");
        assert!(app.chat_view()[0].is_favorite);
    }

    #[test]
    fn batch_move_via_app_updates_view_assignments() {
        let (mut app, _) = build_app(
            chat_payload(&[
                "a - 2025-01-01.jsonl",
                "b - 2025-01-02.jsonl",
                "c - 2025-01-03.jsonl",
            ]),
            false,
        );
        app.open_lobby();
        app.select_character("alice.png");
        let folder = app.create_folder("Work");

        app.toggle_selection_mode();
        app.toggle_chat_selected("a - 2025-01-01.jsonl");
        app.toggle_chat_selected("b - 2025-01-02.jsonl");

        let moved = app.execute_batch_move(&folder).unwrap();
        assert_eq!(moved, 2);
        assert_eq!(app.selection_mode(), SelectionMode::Idle);

        let by_name: HashMap<&str, &str> = app
            .chat_view()
            .iter()
            .map(|e| (e.file_name.as_str(), e.folder_id.as_str()))
            .collect();
        assert_eq!(by_name["a - 2025-01-01.jsonl"], folder);
        assert_eq!(by_name["b - 2025-01-02.jsonl"], folder);
        assert_eq!(by_name["c - 2025-01-03.jsonl"], UNCATEGORIZED_FOLDER_ID);
    }

    #[test]
    fn batch_move_validation_errors_abort() {
        let (mut app, _) = build_app(chat_payload(&["a - 2025-01-01.jsonl"]), false);
        app.open_lobby();
        app.select_character("alice.png");

        app.toggle_selection_mode();
        assert_eq!(
            app.execute_batch_move("folder_1"),
            Err(BatchMoveError::NothingSelected)
        );

        app.toggle_chat_selected("a - 2025-01-01.jsonl");
        assert_eq!(app.execute_batch_move(""), Err(BatchMoveError::EmptyTarget));
        assert_eq!(app.selected_count(), 1);
    }

    #[test]
    fn open_chat_drives_the_navigator_and_closes_the_lobby() {
        let (mut app, calls) = build_app(chat_payload(&["a - 2025-01-01.jsonl"]), false);
        app.open_lobby();
        app.select_character("alice.png");

        assert!(app.open_chat(0));
        assert!(!app.is_lobby_open());
        assert_eq!(calls.borrow().selected_indices, [0]);
        assert_eq!(calls.borrow().opened_chats, [0]);
    }

    #[test]
    fn start_new_chat_skips_trigger_without_history() {
        let (mut app, calls) = build_app(ChatListPayload::Empty, false);
        app.open_lobby();
        app.select_character("alice.png");

        assert!(app.start_new_chat());
        assert_eq!(calls.borrow().selected_indices, [0]);
        // No history: the host auto-starts, so no explicit trigger.
        assert_eq!(calls.borrow().new_chats, 0);
    }

    #[test]
    fn start_new_chat_triggers_with_history() {
        let (mut app, calls) = build_app(chat_payload(&["a - 2025-01-01.jsonl"]), false);
        app.open_lobby();
        app.select_character("alice.png");

        assert!(app.start_new_chat());
        assert_eq!(calls.borrow().new_chats, 1);
    }

    #[test]
    fn successful_delete_invalidates_and_refetches() {
        let (mut app, calls) = build_app(chat_payload(&["a - 2025-01-01.jsonl"]), false);
        app.open_lobby();
        app.select_character("alice.png");
        assert_eq!(calls.borrow().chat_fetches, 1);

        assert_eq!(app.delete_chat("a - 2025-01-01.jsonl"), DeleteOutcome::Deleted);
        assert_eq!(calls.borrow().deleted_chats, ["a - 2025-01-01.jsonl"]);
        // Cache was invalidated, so the rebuild refetched.
        assert_eq!(calls.borrow().chat_fetches, 2);
    }

    #[test]
    fn rejected_delete_leaves_view_until_forced() {
        let (mut app, _) = build_app(chat_payload(&["a - 2025-01-01.jsonl"]), true);
        app.open_lobby();
        app.select_character("alice.png");

        assert_eq!(app.delete_chat("a - 2025-01-01.jsonl"), DeleteOutcome::Rejected);
        assert_eq!(app.chat_view().len(), 1);

        // The user's explicit force-remove choice.
        app.remove_chat_from_view("a - 2025-01-01.jsonl");
        assert!(app.chat_view().is_empty());
    }

    #[test]
    fn search_debounce_releases_only_settled_terms() {
        let mut debouncer = SearchDebouncer::new(SEARCH_DEBOUNCE);
        let start = Instant::now();

        debouncer.input("al", start);
        assert_eq!(debouncer.poll(start + Duration::from_millis(100)), None);

        // A newer keystroke restarts the window.
        debouncer.input("ali", start + Duration::from_millis(100));
        assert_eq!(debouncer.poll(start + Duration::from_millis(350)), None);

        let released = debouncer.poll(start + Duration::from_millis(450));
        assert_eq!(released.as_deref(), Some("ali"));

        // Nothing pending afterwards.
        assert_eq!(debouncer.poll(start + Duration::from_secs(10)), None);
    }

    #[test]
    fn poll_search_applies_the_settled_term() {
        let (mut app, _) = build_app(ChatListPayload::Empty, false);
        app.open_lobby();

        app.search_input("nobody");
        assert!(app.poll_search(Instant::now() + SEARCH_DEBOUNCE));
        assert!(app.visible_characters().is_empty());
    }

    #[test]
    fn auto_favorite_rules_apply_on_load() {
        let calls = Rc::new(RefCell::new(HostCalls::default()));
        let mut store = OrganizerStore::empty();
        store.add_auto_favorite_rule("alice");

        let mut app = LobbyApp::new(
            store,
            Box::new(FakeHost {
                calls: Rc::clone(&calls),
                chats: chat_payload(&["Alice - 2025-01-01.jsonl", "Other - 2025-01-02.jsonl"]),
                reject_deletes: false,
            }),
            Box::new(FakeSource { list: vec![alice()] }),
            Box::new(FakeDirectory),
            Box::new(FakeNavigator { calls }),
        );

        app.open_lobby();
        app.select_character("alice.png");

        // The matching chat was favorited and therefore leads the view.
        assert_eq!(app.chat_view()[0].file_name, "Alice - 2025-01-01.jsonl");
        assert!(app.chat_view()[0].is_favorite);
        assert!(!app.chat_view()[1].is_favorite);
    }
}
