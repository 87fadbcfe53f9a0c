// Input validation
//
// Hard limits, not configurable. Messages are user facing (Spanish) and
// name the offending field so forms can highlight it.

use regex::Regex;
use std::sync::OnceLock;

use super::common::ApiError;

// =============================================================================
// Input Size Limits
// =============================================================================

/// Minimum password length in characters
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Maximum password size. Argon2 cost grows with input, so cap it.
pub const MAX_PASSWORD_BYTES: usize = 1024;

/// Names, titles, artist names
pub const MAX_NAME_BYTES: usize = 200;

/// Bios, descriptions, request messages
pub const MAX_TEXT_BYTES: usize = 5 * 1024;

/// Any URL field
pub const MAX_URL_BYTES: usize = 2048;

/// Genres per DJ profile
pub const MAX_GENRES: usize = 20;

// =============================================================================
// Validation Functions
// =============================================================================

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.len() > MAX_NAME_BYTES || !email_regex().is_some_and(|re| re.is_match(email)) {
        return Err(ApiError::validation("Email inválido"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ApiError::validation(
            "La contraseña debe tener al menos 8 caracteres",
        ));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ApiError::validation("La contraseña es demasiado larga"));
    }
    Ok(())
}

/// Required short text: non-blank and within the name limit
pub fn validate_name(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("El campo {field} es obligatorio")));
    }
    if value.len() > MAX_NAME_BYTES {
        tracing::warn!(field, len = value.len(), "Name field exceeds limit");
        return Err(ApiError::validation(format!("El campo {field} es demasiado largo")));
    }
    Ok(())
}

pub fn validate_optional_name(field: &str, value: Option<&str>) -> Result<(), ApiError> {
    value.map_or(Ok(()), |v| validate_name(field, v))
}

pub fn validate_text(field: &str, value: Option<&str>) -> Result<(), ApiError> {
    match value {
        Some(v) if v.len() > MAX_TEXT_BYTES => {
            tracing::warn!(field, len = v.len(), "Text field exceeds limit");
            Err(ApiError::validation(format!("El campo {field} es demasiado largo")))
        }
        _ => Ok(()),
    }
}

/// Absolute http(s) URL within the size limit
pub fn validate_url(field: &str, value: &str) -> Result<(), ApiError> {
    let value = value.trim();
    let has_scheme = value.starts_with("https://") || value.starts_with("http://");
    if !has_scheme || value.len() > MAX_URL_BYTES || value.contains(char::is_whitespace) {
        return Err(ApiError::validation(format!("El campo {field} debe ser una URL válida")));
    }
    Ok(())
}

pub fn validate_optional_url(field: &str, value: Option<&str>) -> Result<(), ApiError> {
    value.map_or(Ok(()), |v| validate_url(field, v))
}

fn mime_regex() -> Option<&'static Regex> {
    static MIME: OnceLock<Option<Regex>> = OnceLock::new();
    MIME.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]*/[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]*$").ok())
        .as_ref()
}

/// Bare `type/subtype`, since it ends up in a signed request header
pub fn validate_content_type(value: Option<&str>) -> Result<(), ApiError> {
    let Some(value) = value else {
        return Ok(());
    };
    let value = value.trim();
    if value.len() > MAX_NAME_BYTES || !mime_regex().is_some_and(|re| re.is_match(value)) {
        return Err(ApiError::validation("El campo contentType no es un tipo MIME válido"));
    }
    Ok(())
}

pub fn validate_genres(genres: Option<&[String]>) -> Result<(), ApiError> {
    let Some(genres) = genres else {
        return Ok(());
    };
    if genres.len() > MAX_GENRES {
        return Err(ApiError::validation("Demasiados géneros"));
    }
    genres.iter().try_for_each(|g| validate_name("genres", g))
}

pub fn validate_duration(value: Option<i32>) -> Result<(), ApiError> {
    match value {
        Some(secs) if secs < 0 => Err(ApiError::validation("La duración no puede ser negativa")),
        _ => Ok(()),
    }
}
