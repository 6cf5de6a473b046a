//! Filter/sort pipeline over normalized chat entries.
//!
//! Pure given its inputs: the same entries, store state, and sort option
//! always produce the same ordering. Sorting is stable, so equal keys keep
//! their original relative order, and favorites always sort ahead of
//! non-favorites regardless of the active sort option.

use std::cmp::Ordering;

use super::normalizer::{file_name_date, file_name_timestamp};
use super::ChatEntry;
use crate::collation::compare_names;
use crate::organizer::{FolderFilter, OrganizerStore, SortOption};

/// Stamp each entry's derived `folder_id`/`is_favorite` from the store.
pub fn annotate_entries(entries: &mut [ChatEntry], avatar: &str, store: &OrganizerStore) {
    for entry in entries.iter_mut() {
        let key = entry.key(avatar);
        entry.folder_id = store.folder_of(&key).to_string();
        entry.is_favorite = store.is_favorite(&key);
    }
}

/// Keep only the entries passing the folder filter. Entries must already be
/// annotated.
pub fn filter_entries(entries: Vec<ChatEntry>, filter: &FolderFilter) -> Vec<ChatEntry> {
    match filter {
        FolderFilter::All => entries,
        FolderFilter::Favorites => entries.into_iter().filter(|e| e.is_favorite).collect(),
        FolderFilter::Folder(id) => entries
            .into_iter()
            .filter(|e| e.folder_id == *id)
            .collect(),
    }
}

/// Timestamp a chat sorts by: the filename date-time patterns first, then a
/// bare filename date, then whatever last-message timestamp the normalizer
/// extracted, then zero (sorts last).
pub fn sort_timestamp(entry: &ChatEntry) -> i64 {
    file_name_timestamp(&entry.file_name)
        .or_else(|| file_name_date(&entry.file_name))
        .unwrap_or(entry.last_date_ms)
}

/// Order entries in place: favorites first, then by the active sort option.
pub fn sort_entries(entries: &mut [ChatEntry], option: SortOption) {
    match option {
        SortOption::Name => entries.sort_by(|a, b| {
            favorites_first(a, b).then_with(|| compare_names(&a.file_name, &b.file_name))
        }),
        SortOption::Messages => entries.sort_by(|a, b| {
            favorites_first(a, b).then_with(|| b.message_count.cmp(&a.message_count))
        }),
        // Recent, Created, Favorites, and anything new all order by recency.
        _ => entries.sort_by(|a, b| {
            favorites_first(a, b).then_with(|| sort_timestamp(b).cmp(&sort_timestamp(a)))
        }),
    }
}

fn favorites_first(a: &ChatEntry, b: &ChatEntry) -> Ordering {
    b.is_favorite.cmp(&a.is_favorite)
}

/// The whole pipeline: annotate, filter by the store's active folder filter,
/// sort by its active sort option.
pub fn run_pipeline(
    mut entries: Vec<ChatEntry>,
    avatar: &str,
    store: &OrganizerStore,
) -> Vec<ChatEntry> {
    annotate_entries(&mut entries, avatar, store);
    let mut entries = filter_entries(entries, &store.state().filter_folder);
    sort_entries(&mut entries, store.state().sort_option);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organizer::ChatKey;

    fn entry(file_name: &str) -> ChatEntry {
        ChatEntry::named(file_name)
    }

    fn names(entries: &[ChatEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.file_name.as_str()).collect()
    }

    #[test]
    fn recent_sort_puts_newest_filename_first() {
        let mut entries = vec![
            entry("Alice - 2025-01-05@10h00m00s.jsonl"),
            entry("Alice - 2025-03-01@09h00m00s.jsonl"),
        ];
        sort_entries(&mut entries, SortOption::Recent);
        assert_eq!(
            names(&entries),
            [
                "Alice - 2025-03-01@09h00m00s.jsonl",
                "Alice - 2025-01-05@10h00m00s.jsonl",
            ]
        );
    }

    #[test]
    fn name_sort_is_lexicographic() {
        let mut entries = vec![entry("b.jsonl"), entry("a.jsonl")];
        sort_entries(&mut entries, SortOption::Name);
        assert_eq!(names(&entries), ["a.jsonl", "b.jsonl"]);
    }

    #[test]
    fn messages_sort_is_descending() {
        let mut low = entry("low.jsonl");
        low.message_count = 2;
        let mut high = entry("high.jsonl");
        high.message_count = 40;

        let mut entries = vec![low, high];
        sort_entries(&mut entries, SortOption::Messages);
        assert_eq!(names(&entries), ["high.jsonl", "low.jsonl"]);
    }

    #[test]
    fn favorites_sort_first_under_every_option() {
        for option in [
            SortOption::Recent,
            SortOption::Created,
            SortOption::Name,
            SortOption::Favorites,
            SortOption::Messages,
        ] {
            let mut favored = entry("z - 2020-01-01@00h00m00s.jsonl");
            favored.is_favorite = true;
            favored.message_count = 0;
            let mut plain = entry("a - 2025-01-01@00h00m00s.jsonl");
            plain.message_count = 100;

            let mut entries = vec![plain, favored];
            sort_entries(&mut entries, option);
            assert!(
                entries[0].is_favorite,
                "favorite must lead under {option:?}"
            );
        }
    }

    #[test]
    fn entries_without_any_timestamp_sort_last() {
        let mut dated = entry("a - 2025-01-01@00h00m00s.jsonl");
        dated.last_date_ms = 0;
        let undated = entry("undated.jsonl");

        let mut entries = vec![undated.clone(), dated.clone()];
        sort_entries(&mut entries, SortOption::Recent);
        assert_eq!(names(&entries), [dated.file_name.as_str(), "undated.jsonl"]);
    }

    #[test]
    fn explicit_timestamp_is_a_fallback_for_undated_filenames() {
        let mut field_dated = entry("undated.jsonl");
        field_dated.last_date_ms = 2_000_000;
        let mut older = entry("also-undated.jsonl");
        older.last_date_ms = 1_000_000;

        let mut entries = vec![older, field_dated];
        sort_entries(&mut entries, SortOption::Recent);
        assert_eq!(names(&entries), ["undated.jsonl", "also-undated.jsonl"]);
    }

    #[test]
    fn equal_keys_preserve_input_order() {
        let first = entry("first.jsonl");
        let second = entry("second.jsonl");
        let third = entry("third.jsonl");

        let mut entries = vec![first, second, third];
        sort_entries(&mut entries, SortOption::Recent);
        assert_eq!(names(&entries), ["first.jsonl", "second.jsonl", "third.jsonl"]);
    }

    #[test]
    fn pipeline_is_deterministic() {
        let mut store = OrganizerStore::empty();
        store.toggle_favorite(&ChatKey::new("a.png", "two.jsonl"));

        let entries = vec![
            entry("one - 2025-01-01@00h00m00s.jsonl"),
            entry("two.jsonl"),
            entry("three - 2025-02-01@00h00m00s.jsonl"),
        ];

        let once = run_pipeline(entries.clone(), "a.png", &store);
        let twice = run_pipeline(entries, "a.png", &store);
        assert_eq!(once, twice);
    }

    #[test]
    fn favorites_filter_keeps_only_favorites() {
        let mut store = OrganizerStore::empty();
        store.toggle_favorite(&ChatKey::new("a.png", "keep.jsonl"));
        store.set_filter_folder(FolderFilter::Favorites);

        let out = run_pipeline(
            vec![entry("keep.jsonl"), entry("drop.jsonl")],
            "a.png",
            &store,
        );
        assert_eq!(names(&out), ["keep.jsonl"]);
        assert!(out[0].is_favorite);
    }

    #[test]
    fn folder_filter_keeps_only_assigned_entries() {
        let mut store = OrganizerStore::empty();
        let folder = store.add_folder("Work");
        store.assign_chat(ChatKey::new("a.png", "in.jsonl"), &folder);
        store.set_filter_folder(FolderFilter::Folder(folder.clone()));

        let out = run_pipeline(vec![entry("in.jsonl"), entry("out.jsonl")], "a.png", &store);
        assert_eq!(names(&out), ["in.jsonl"]);
        assert_eq!(out[0].folder_id, folder);
    }

    #[test]
    fn all_filter_passes_everything() {
        let store = OrganizerStore::empty();
        let out = run_pipeline(vec![entry("a.jsonl"), entry("b.jsonl")], "a.png", &store);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn annotation_resolves_folder_and_favorite() {
        let mut store = OrganizerStore::empty();
        let folder = store.add_folder("Work");
        store.assign_chat(ChatKey::new("a.png", "x.jsonl"), &folder);
        store.toggle_favorite(&ChatKey::new("a.png", "x.jsonl"));

        let mut entries = vec![entry("x.jsonl"), entry("y.jsonl")];
        annotate_entries(&mut entries, "a.png", &store);

        assert_eq!(entries[0].folder_id, folder);
        assert!(entries[0].is_favorite);
        assert_eq!(entries[1].folder_id, crate::organizer::UNCATEGORIZED_FOLDER_ID);
        assert!(!entries[1].is_favorite);
    }
}
