//! Name ordering shared by the persona bar, character grid, and chat list.
//!
//! Names sort by the class of their first character: digits, then Latin,
//! then Hangul, then everything else, with a case-insensitive comparison
//! inside each class.

use std::cmp::Ordering;

/// Ordering class of a (lowercased) name's first character.
fn name_class(name: &str) -> u8 {
    match name.chars().next() {
        Some(c) if c.is_ascii_digit() => 0,
        Some(c) if c.is_ascii_lowercase() => 1,
        Some(c) if is_hangul(c) => 2,
        _ => 3,
    }
}

fn is_hangul(c: char) -> bool {
    // Syllables, plus the compatibility jamo consonant and vowel blocks
    ('가'..='힣').contains(&c) || ('ㄱ'..='ㅎ').contains(&c) || ('ㅏ'..='ㅣ').contains(&c)
}

/// Compare two display names: digits before Latin before Hangul before the
/// rest, case-insensitively within each class.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    name_class(&a).cmp(&name_class(&b)).then_with(|| a.cmp(&b))
}
