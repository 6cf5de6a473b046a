//! Normalization of raw host chat records into [`ChatEntry`] values.
//!
//! The host's chat records drift across API versions: field names change,
//! records are sometimes array-shaped, placeholder and error entries appear
//! in lists. Extraction here is tolerant (each field falls through an
//! ordered list of candidates) and the validity filter drops entries that
//! are not real chat files.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::ChatEntry;
use crate::host::ChatListPayload;
use crate::organizer::UNCATEGORIZED_FOLDER_ID;

/// Shown when a record carries no preview text at all.
const DEFAULT_PREVIEW: &str = "Chat history";

/// Preview display length before truncation.
const PREVIEW_MAX_LEN: usize = 80;

/// `YYYY-MM-DD@HHhMMmSSs`
static FILE_TS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})-(\d{2})-(\d{2})@(\d{2})h(\d{2})m(\d{2})s").unwrap()
});

/// `YYYY-MM-DD @HHh MMm SSs`, spaces allowed, `@` optional
static FILE_TS_LOOSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})-(\d{2})-(\d{2})\s*@?(\d{2})h\s*(\d{2})m\s*(\d{2})s").unwrap()
});

/// Bare `YYYY-MM-DD`
static FILE_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap());

/// Normalize a decoded chat-list payload into displayable entries.
/// Rejected payloads normalize to an empty sequence.
pub fn normalize_payload(payload: ChatListPayload) -> Vec<ChatEntry> {
    match payload {
        ChatListPayload::Entries(records) => records
            .iter()
            .filter_map(normalize_record)
            .collect(),
        ChatListPayload::Empty => Vec::new(),
        ChatListPayload::Rejected => {
            log::warn!("host rejected the chat list request");
            Vec::new()
        }
    }
}

/// Normalize one raw record; None when it fails the validity filter.
pub fn normalize_record(record: &Value) -> Option<ChatEntry> {
    let file_name = record_file_name(record);
    if !is_valid_file_name(&file_name) {
        log::debug!("dropping invalid chat record: {file_name:?}");
        return None;
    }

    let display_name = file_name
        .strip_suffix(".jsonl")
        .unwrap_or(&file_name)
        .to_string();

    Some(ChatEntry {
        display_name,
        preview: extract_preview(record),
        message_count: extract_message_count(record),
        last_date_ms: extract_last_date_ms(record, &file_name),
        file_size: extract_file_size(record),
        folder_id: UNCATEGORIZED_FOLDER_ID.to_string(),
        is_favorite: false,
        file_name,
    })
}

/// A real chat file has a filename with either the `.jsonl` extension or an
/// embedded date, and is not one of the placeholder/error names the host
/// emits into lists.
pub fn is_valid_file_name(file_name: &str) -> bool {
    !file_name.is_empty()
        && (file_name.contains(".jsonl") || FILE_DATE_RE.is_match(file_name))
        && !file_name.starts_with("chat_")
        && !file_name.eq_ignore_ascii_case("error")
}

fn record_file_name(record: &Value) -> String {
    for field in ["file_name", "fileName", "name"] {
        if let Some(name) = record.get(field).and_then(Value::as_str) {
            if !name.is_empty() {
                return name.to_string();
            }
        }
    }
    // Array-shaped record: the first element may carry the filename.
    if let Some(first) = record.get(0) {
        for field in ["file_name", "fileName"] {
            if let Some(name) = first.get(field).and_then(Value::as_str) {
                if !name.is_empty() {
                    return name.to_string();
                }
            }
        }
    }
    String::new()
}

fn extract_message_count(record: &Value) -> u64 {
    for field in ["chat_items", "message_count", "chat_size", "mes_count", "count"] {
        if let Some(n) = record.get(field).and_then(Value::as_u64) {
            return n;
        }
    }
    if let Some(messages) = record.get("messages").and_then(Value::as_array) {
        return messages.len() as u64;
    }
    if let Some(items) = record.as_array() {
        return items.len() as u64;
    }
    0
}

fn extract_preview(record: &Value) -> String {
    for field in ["preview", "mes", "last_message"] {
        if let Some(text) = record.get(field).and_then(Value::as_str) {
            if !text.is_empty() {
                return truncate_preview(text);
            }
        }
    }
    DEFAULT_PREVIEW.to_string()
}

/// Truncate preview text to a display length, character-safe.
fn truncate_preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_MAX_LEN {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(PREVIEW_MAX_LEN).collect();
        format!("{truncated}...")
    }
}

fn extract_last_date_ms(record: &Value, file_name: &str) -> i64 {
    for field in ["last_mes", "last_message_date", "date"] {
        if let Some(ms) = record.get(field).and_then(parse_date_value) {
            return ms;
        }
    }
    file_name_timestamp(file_name)
        .or_else(|| file_name_date(file_name))
        .unwrap_or(0)
}

/// A date field may be epoch millis or a date string.
fn parse_date_value(value: &Value) -> Option<i64> {
    if let Some(ms) = value.as_i64() {
        return Some(ms);
    }
    if let Some(ms) = value.as_f64() {
        return Some(ms as i64);
    }
    let text = value.as_str()?;
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }
    None
}

fn extract_file_size(record: &Value) -> String {
    match record.get("file_size") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.as_f64().map(format_file_size).unwrap_or_default(),
        _ => String::new(),
    }
}

/// `123B`, `1.2KB`, `3.4MB`
pub fn format_file_size(bytes: f64) -> String {
    if bytes < 1024.0 {
        format!("{}B", bytes as u64)
    } else if bytes < 1024.0 * 1024.0 {
        format!("{:.1}KB", bytes / 1024.0)
    } else {
        format!("{:.1}MB", bytes / (1024.0 * 1024.0))
    }
}

/// Full date-time embedded in a chat filename, in epoch millis.
/// Tries the strict `YYYY-MM-DD@HHhMMmSSs` pattern first, then the spaced
/// variant with an optional `@`.
pub fn file_name_timestamp(file_name: &str) -> Option<i64> {
    let caps = FILE_TS_RE
        .captures(file_name)
        .or_else(|| FILE_TS_LOOSE_RE.captures(file_name))?;
    let get = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let date = NaiveDate::from_ymd_opt(get(1)? as i32, get(2)?, get(3)?)?;
    let dt = date.and_hms_opt(get(4)?, get(5)?, get(6)?)?;
    Some(dt.and_utc().timestamp_millis())
}

/// Bare date embedded in a chat filename, in epoch millis at midnight.
pub fn file_name_date(file_name: &str) -> Option<i64> {
    let caps = FILE_DATE_RE.captures(file_name)?;
    let get = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let date = NaiveDate::from_ymd_opt(get(1)? as i32, get(2)?, get(3)?)?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}
