use regex::Regex;
use std::sync::OnceLock;

static STRING_ID_REGEX: OnceLock<Regex> = OnceLock::new();

fn string_id_regex() -> &'static Regex {
    STRING_ID_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9\-\._]+$").expect("STRING_ID_REGEX is valid")
    })
}

/// Whether `id` is safe to place in a resource path.
pub fn valid_string_id(id: &str) -> bool {
    string_id_regex().is_match(id)
}

/// Query-escape a single path segment.
pub fn escape_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plan_ids() {
        assert!(valid_string_id("plan-V3fEa5mYSk4KZWr2"));
        assert!(valid_string_id("run-abc"));
        assert!(valid_string_id("a.b_c-1"));
    }

    #[test]
    fn rejects_empty_and_path_like_ids() {
        assert!(!valid_string_id(""));
        assert!(!valid_string_id("plan/../secrets"));
        assert!(!valid_string_id("plan id"));
        assert!(!valid_string_id("plan?x=1"));
    }

    #[test]
    fn escape_segment_encodes_reserved() {
        assert_eq!(escape_segment("plan-1"), "plan-1");
        assert_eq!(escape_segment("a b/c"), "a+b%2Fc");
    }
}
