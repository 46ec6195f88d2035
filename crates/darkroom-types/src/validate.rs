//! Lexical validation for client-supplied strings.
//!
//! Every function here is total: malformed input yields `false`, never a
//! panic or an error. Handlers call these before touching the store.

/// Punctuation accepted in comment bodies, alongside letters, digits and
/// whitespace.
const COMMENT_PUNCTUATION: &str = ".,;:!?'\"()-_@#&%+/";

/// Usernames are 8–16 characters from `[A-Za-z0-9_-]`.
pub fn is_valid_username(s: &str) -> bool {
    (8..=16).contains(&s.len())
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Opaque identifiers (bearer tokens) are exactly 64 ASCII alphanumerics.
pub fn is_valid_token(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Comment bodies are 1–128 characters of letters, digits, whitespace and
/// the accepted punctuation set.
pub fn is_valid_comment(s: &str) -> bool {
    let len = s.chars().count();
    (1..=128).contains(&len)
        && s.chars()
            .all(|c| c.is_alphanumeric() || c.is_whitespace() || COMMENT_PUNCTUATION.contains(c))
}

/// `YYYY-MM-DD` with month 01–12 and day 01–31.
///
/// Deliberately lax: the day range is not checked against the month, so
/// `2024-02-30` passes. Callers relying on calendar-valid dates must parse
/// with chrono.
pub fn is_valid_date(s: &str) -> bool {
    let b = s.as_bytes();
    if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return false;
    }
    if !b[..4].iter().all(u8::is_ascii_digit) {
        return false;
    }
    let month = two_digits(&b[5..7]);
    let day = two_digits(&b[8..10]);
    matches!(month, Some(1..=12)) && matches!(day, Some(1..=31))
}

/// `YYYY-MM-DD HH:MM:SS` — the date part as [`is_valid_date`], the time part
/// with hour 00–23 and minute/second 00–59.
pub fn is_valid_datetime(s: &str) -> bool {
    let b = s.as_bytes();
    if b.len() != 19 || b[10] != b' ' || b[13] != b':' || b[16] != b':' {
        return false;
    }
    if !is_valid_date(&s[..10]) {
        return false;
    }
    let hour = two_digits(&b[11..13]);
    let minute = two_digits(&b[14..16]);
    let second = two_digits(&b[17..19]);
    matches!(hour, Some(0..=23)) && matches!(minute, Some(0..=59)) && matches!(second, Some(0..=59))
}

fn two_digits(b: &[u8]) -> Option<u8> {
    if b.len() == 2 && b[0].is_ascii_digit() && b[1].is_ascii_digit() {
        Some((b[0] - b'0') * 10 + (b[1] - b'0'))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_accepts_allowed_charset() {
        assert!(is_valid_username("alice_01"));
        assert!(is_valid_username("Some-User_123"));
        assert!(is_valid_username("abcdefghijklmnop")); // 16 chars
    }

    #[test]
    fn username_rejects_bad_length_and_chars() {
        assert!(!is_valid_username("short")); // 5 chars
        assert!(!is_valid_username("abcdefghijklmnopq")); // 17 chars
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("exclaim!!"));
        assert!(!is_valid_username(""));
    }

    #[test]
    fn token_requires_exactly_64_alphanumerics() {
        let good = "a".repeat(64);
        assert!(is_valid_token(&good));
        assert!(!is_valid_token(&"a".repeat(63)));
        assert!(!is_valid_token(&"a".repeat(65)));
        let mut bad = "a".repeat(63);
        bad.push('-');
        assert!(!is_valid_token(&bad));
    }

    #[test]
    fn comment_length_bounds() {
        assert!(is_valid_comment("x"));
        assert!(is_valid_comment(&"y".repeat(128)));
        assert!(!is_valid_comment(""));
        assert!(!is_valid_comment(&"y".repeat(129)));
    }

    #[test]
    fn comment_charset() {
        assert!(is_valid_comment("Nice shot! Where was this taken?"));
        assert!(!is_valid_comment("nul\0byte"));
        assert!(!is_valid_comment("angle <brackets>"));
    }

    #[test]
    fn date_shape_and_ranges() {
        assert!(is_valid_date("2024-01-31"));
        assert!(is_valid_date("2024-02-30")); // lax: pattern only
        assert!(!is_valid_date("2024-00-10"));
        assert!(!is_valid_date("2024-13-10"));
        assert!(!is_valid_date("2024-12-32"));
        assert!(!is_valid_date("2024-1-31"));
        assert!(!is_valid_date("2024/01/31"));
    }

    #[test]
    fn datetime_shape_and_ranges() {
        assert!(is_valid_datetime("2024-06-01 00:00:00"));
        assert!(is_valid_datetime("2024-06-01 23:59:59"));
        assert!(!is_valid_datetime("2024-06-01 24:00:00"));
        assert!(!is_valid_datetime("2024-06-01 12:60:00"));
        assert!(!is_valid_datetime("2024-06-01T12:00:00"));
        assert!(!is_valid_datetime("2024-06-01"));
    }
}
