//! Cursor-based pagination for the admin application listing.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Error type for cursor operations.
#[derive(Debug, Error)]
pub enum CursorError {
    #[error("Invalid cursor format")]
    InvalidFormat,
    #[error("Invalid cursor encoding")]
    InvalidEncoding,
    #[error("Invalid timestamp in cursor")]
    InvalidTimestamp,
}

/// Encodes a listing cursor from a creation timestamp and a document id.
///
/// The cursor format is `base64(RFC3339_timestamp|id)`. The composite key
/// keeps the ordering stable across documents sharing a timestamp. The `|`
/// separator is safe because ids are normalized email addresses, which
/// cannot contain it.
pub fn encode_cursor(created_at: DateTime<Utc>, id: &str) -> String {
    let raw = format!(
        "{}|{}",
        created_at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        id
    );
    URL_SAFE_NO_PAD.encode(raw.as_bytes())
}

/// Decodes a listing cursor into `(created_at, id)`.
pub fn decode_cursor(cursor: &str) -> Result<(DateTime<Utc>, String), CursorError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(cursor)
        .map_err(|_| CursorError::InvalidEncoding)?;

    let s = String::from_utf8(decoded).map_err(|_| CursorError::InvalidFormat)?;

    let (timestamp_str, id) = s.split_once('|').ok_or(CursorError::InvalidFormat)?;
    if id.is_empty() {
        return Err(CursorError::InvalidFormat);
    }

    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .map_err(|_| CursorError::InvalidTimestamp)?
        .with_timezone(&Utc);

    Ok((timestamp, id.to_string()))
}
