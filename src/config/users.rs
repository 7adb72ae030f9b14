//! Admin user configuration loaded from environment variables.
//!
//! The audit log endpoints are restricted to the usernames listed in
//! `ADMIN_USERNAMES` (comma-separated). With the variable unset nobody is an admin.

use std::collections::HashSet;

/// Parses a comma-separated username list, ignoring blanks and surrounding whitespace.
#[must_use]
pub fn parse_admin_usernames(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Reads the admin usernames from `ADMIN_USERNAMES`.
#[must_use]
pub fn get_admin_usernames() -> HashSet<String> {
    std::env::var("ADMIN_USERNAMES")
        .map(|raw| parse_admin_usernames(&raw))
        .unwrap_or_default()
}
