//! Public URL helpers

/// Join a configured public base URL with an absolute path.
///
/// Without a base the path is returned unchanged so links stay relative.
pub fn join_public_url(base: Option<&str>, path: &str) -> String {
    match base.map(str::trim).filter(|b| !b.is_empty()) {
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/')),
        None => format!("/{}", path.trim_start_matches('/')),
    }
}

/// Hide the secret part of a token URL for logs: only the first characters
/// of the last path segment are kept.
pub fn mask_token_url(url: &str) -> String {
    match url.rsplit_once('/') {
        Some((prefix, token)) if !token.is_empty() => {
            let visible: String = token.chars().take(4).collect();
            format!("{}/{}...", prefix, visible)
        }
        _ => url.to_string(),
    }
}
