use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Middle initials such as the " J." in "Michael J. Fox"
    static ref INITIAL_TOKEN: Regex = Regex::new(r" [A-Z]\.").unwrap();
}

/// Normalizes a display name for search: initial tokens are removed and
/// diacritics are stripped.
pub fn searchable_name(name: &str) -> String {
    let without_initials = INITIAL_TOKEN.replace_all(name, "");

    without_initials.nfd().filter(|c| c.is_ascii()).collect()
}
