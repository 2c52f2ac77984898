//! Free-text recruit lists.
//!
//! A list looks like `"Jane Doe (2027), Mary, Ann Lee (2026)"`: entries are
//! comma separated and usually end with a class year tag. Names may contain
//! commas themselves, so fragments are glued back together until the
//! running entry ends in a year tag.
//!
//! The year tag is the only terminator. A name whose own text happens to end
//! in `(dddd)` before its real tag will be split there; that ambiguity is
//! kept as is so processed files stay compatible across runs.

use regex::Regex;
use std::sync::OnceLock;

fn re_trailing_year() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(\d{4}\)\s*$").expect("valid year tag pattern"))
}

fn re_year_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\(\d{4}\)\s*$").expect("valid year suffix pattern"))
}

/// Does `text` end with a `(dddd)` tag, ignoring trailing whitespace?
pub fn ends_with_year_tag(text: &str) -> bool {
    re_trailing_year().is_match(text)
}

/// Split a recruit list with the greedy fragment rejoin.
///
/// Fragments are trimmed and accumulated with `", "` until the buffer ends
/// in a year tag; a tagless remainder is still emitted as the last entry.
pub fn split_recruits(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let mut recruits = Vec::new();
    let mut buffer = String::new();
    for fragment in raw.split(',').map(str::trim) {
        if !buffer.is_empty() {
            buffer.push_str(", ");
        }
        buffer.push_str(fragment);

        if ends_with_year_tag(&buffer) {
            recruits.push(buffer.trim().to_string());
            buffer.clear();
        }
    }
    if !buffer.trim().is_empty() {
        recruits.push(buffer.trim().to_string());
    }
    recruits
}

/// Keep entries whose trimmed text ends with exactly `tag`, e.g. `"(2027)"`
pub fn filter_by_year(entries: Vec<String>, tag: &str) -> Vec<String> {
    entries.into_iter().filter(|e| e.trim().ends_with(tag)).collect()
}

/// `"Jane Doe (2027) "` -> `"Jane Doe"`
pub fn strip_year_tag(entry: &str) -> &str {
    match re_year_suffix().find(entry) {
        Some(m) => entry[..m.start()].trim(),
        None => entry.trim(),
    }
}

/// Lookup key for a recruit entry: no year tag, trimmed, lowercase
pub fn normalize_name(entry: &str) -> String {
    strip_year_tag(entry).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_inside_name_is_rejoined() {
        let entries = split_recruits("John A. Smith (2027), Mary, Jane Doe (2026)");
        assert_eq!(entries, vec!["John A. Smith (2027)", "Mary, Jane Doe (2026)"]);
    }

    #[test]
    fn test_tagless_remainder_is_kept() {
        let entries = split_recruits("Ann Lee (2027),  Bo Park ,Cy");
        assert_eq!(entries, vec!["Ann Lee (2027)", "Bo Park, Cy"]);
    }

    #[test]
    fn test_empty_and_trailing_comma() {
        assert!(split_recruits("   ").is_empty());
        assert_eq!(split_recruits("Ann Lee (2027), "), vec!["Ann Lee (2027)"]);
    }

    #[test]
    fn test_filter_by_year_is_exact_suffix() {
        let entries = vec![
            "Ann Lee (2027)".to_string(),
            "Bo Park (2026)".to_string(),
            "Cy Diaz (2027) ".to_string(),
            "Di Fox 2027".to_string(),
        ];
        assert_eq!(filter_by_year(entries, "(2027)"), vec!["Ann Lee (2027)", "Cy Diaz (2027) "]);
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(strip_year_tag("  Jane Doe (2027)  "), "Jane Doe");
        assert_eq!(strip_year_tag("Jane Doe"), "Jane Doe");
        assert_eq!(normalize_name("Mary, Jane DOE (2026)"), "mary, jane doe");
    }
}
