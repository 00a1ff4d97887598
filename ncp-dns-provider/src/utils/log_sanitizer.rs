//! Log sanitization utilities
//!
//! Keeps response bodies and access keys from being fully written to
//! debug/error logs.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters of a key left visible by [`mask_key`].
const VISIBLE_KEY_CHARS: usize = 4;

/// Truncate a string for safe logging.
///
/// Strings within `TRUNCATE_LIMIT` bytes are returned unchanged; longer ones are
/// cut at the last char boundary before the limit and suffixed with the total
/// length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= TRUNCATE_LIMIT)
        .last()
        .unwrap_or(0);
    format!("{}... [truncated, total {} bytes]", &s[..cut], s.len())
}

/// Mask an access key, keeping only its first few characters.
pub fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(VISIBLE_KEY_CHARS).collect();
    if visible.len() == key.len() {
        "*".repeat(key.chars().count())
    } else {
        format!("{visible}****")
    }
}
