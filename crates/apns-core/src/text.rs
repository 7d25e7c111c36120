//! UTF-8–safe string truncation for log output.
//!
//! Device tokens are opaque and long; logs only ever carry a short prefix.

/// Number of bytes of a device token that may appear in logs.
pub const TOKEN_LOG_PREFIX: usize = 8;

/// Truncate a string to at most `max_bytes` bytes at a char boundary.
///
/// Returns the longest prefix of `s` whose byte length is ≤ `max_bytes`
/// and that does not split a multi-byte character.
#[inline]
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    // `floor_char_boundary` is nightly-only.
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// The loggable prefix of a device token.
#[inline]
pub fn token_prefix(device_token: &str) -> &str {
    truncate_str(device_token, TOKEN_LOG_PREFIX)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_within_limit() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn ascii_exact_limit() {
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn ascii_truncated() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn multibyte_boundary_snaps_back() {
        // 'é' is 2 bytes; cutting at 2 would split it.
        assert_eq!(truncate_str("aéb", 2), "a");
        assert_eq!(truncate_str("aéb", 3), "aé");
    }

    #[test]
    fn zero_budget() {
        assert_eq!(truncate_str("abc", 0), "");
    }

    #[test]
    fn token_prefix_is_eight_bytes() {
        let token = "a1b2c3d4e5f60718293a4b5c6d7e8f90";
        assert_eq!(token_prefix(token), "a1b2c3d4");
    }

    #[test]
    fn token_prefix_short_token_unchanged() {
        assert_eq!(token_prefix("dead"), "dead");
    }
}
