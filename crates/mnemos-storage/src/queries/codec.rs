//! Column encodings: RFC 3339 timestamps, JSON string lists, little-endian f32 blobs.

use chrono::{DateTime, Utc};

use mnemos_core::errors::{MnemosError, MnemosResult, StorageError};

pub fn encode_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339()
}

pub fn decode_time(id: &str, column: &str, raw: &str) -> MnemosResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| corrupt(id, format!("{column}: {e}")))
}

pub fn decode_opt_time(
    id: &str,
    column: &str,
    raw: Option<String>,
) -> MnemosResult<Option<DateTime<Utc>>> {
    raw.map(|s| decode_time(id, column, &s)).transpose()
}

pub fn encode_list(items: &[String]) -> MnemosResult<String> {
    Ok(serde_json::to_string(items)?)
}

pub fn decode_list(id: &str, column: &str, raw: &str) -> MnemosResult<Vec<String>> {
    serde_json::from_str(raw).map_err(|e| corrupt(id, format!("{column}: {e}")))
}

/// Convert f32 slice to bytes (little-endian).
pub fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes back to an f32 vec. Trailing bytes that don't form a full f32 are ignored.
pub fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

pub fn corrupt(id: &str, reason: String) -> MnemosError {
    MnemosError::StorageError(StorageError::CorruptRow {
        id: id.to_string(),
        reason,
    })
}
