pub mod episode;
pub mod person;
pub mod screen_time;
pub mod season;
pub mod show;
pub mod user;

/// Optional free-text fields store NULL rather than empty strings. In a
/// patch a present-but-blank value is an explicit clear; absent means
/// unchanged.
pub(crate) fn normalize_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
