/// Primary keys of every catalog table (`BIGSERIAL`).
pub type DbId = i64;

/// Stored and serialized timestamps are always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
