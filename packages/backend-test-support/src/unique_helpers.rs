//! Test helpers for generating unique test data
//!
//! Uses ULIDs so that names created by concurrently running tests never collide.

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("player");
/// let id2 = unique_str("player");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("player-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique player display name, short enough for name columns.
pub fn unique_display_name(prefix: &str) -> String {
    let ulid = Ulid::new().to_string();
    format!("{}-{}", prefix, &ulid[ulid.len() - 8..])
}
