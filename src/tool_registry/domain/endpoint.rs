//! Derivation of direct tool server probe URLs.

const HEALTH_SUFFIX: &str = "/health";
const TOOLS_SUFFIX: &str = "/tools";

/// Returns the health-check URL for a configured server URL.
///
/// A URL already ending in `/health` or `/health/` is returned unchanged.
/// Otherwise trailing slashes are stripped and `/health` is appended.
#[must_use]
pub fn health_check_url(server_url: &str) -> String {
    let single_slash_trimmed = server_url.strip_suffix('/').unwrap_or(server_url);
    if single_slash_trimmed.ends_with(HEALTH_SUFFIX) {
        return server_url.to_owned();
    }
    format!("{}{HEALTH_SUFFIX}", server_url.trim_end_matches('/'))
}

/// Returns the tools-listing URL for a configured server URL.
///
/// Trailing slashes are always stripped; `/tools` is appended unless the
/// stripped URL already ends with it.
#[must_use]
pub fn tools_url(server_url: &str) -> String {
    let stripped = server_url.trim_end_matches('/');
    if stripped.ends_with(TOOLS_SUFFIX) {
        return stripped.to_owned();
    }
    format!("{stripped}{TOOLS_SUFFIX}")
}
