//! Canonical lookup keys.
//!
//! The same function is used for storing and for looking up entries, so a
//! phrase typed as `"  Good Morning "` lands on the on-disk key `good_morning`.

/// Separator used in place of internal whitespace runs.
pub const SEPARATOR: char = '_';

/// Converts raw console input into a dictionary key.
///
/// Trims the input, lowercases it and collapses every run of internal
/// whitespace into a single [`SEPARATOR`]. Applying it twice yields the same
/// key as applying it once.
pub fn normalize(text: &str) -> String {
    let mut key = String::with_capacity(text.len());
    for (i, word) in text.split_whitespace().enumerate() {
        if i > 0 {
            key.push(SEPARATOR);
        }
        key.extend(word.chars().flat_map(char::to_lowercase));
    }
    key
}
