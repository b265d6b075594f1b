//! Instagram username validation shared by the proxy routes.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

pub const MAX_USERNAME_LEN: usize = 30;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._]+$").expect("username pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsernameError {
    #[error("Username required")]
    Missing,

    #[error(
        "El username debe tener máximo 30 caracteres y solo puede contener letras, números, puntos y guiones bajos"
    )]
    Invalid,
}

/// Trims `raw` and checks it against the 1–30 character `[A-Za-z0-9._]` rule.
///
/// Returns the trimmed username on success.
///
/// # Errors
///
/// Returns [`UsernameError::Missing`] for an absent or blank value and
/// [`UsernameError::Invalid`] for anything too long or outside the charset.
pub fn validate_username(raw: Option<&str>) -> Result<&str, UsernameError> {
    let username = raw.map(str::trim).unwrap_or_default();
    if username.is_empty() {
        return Err(UsernameError::Missing);
    }
    if username.chars().count() > MAX_USERNAME_LEN || !USERNAME_RE.is_match(username) {
        return Err(UsernameError::Invalid);
    }
    Ok(username)
}
