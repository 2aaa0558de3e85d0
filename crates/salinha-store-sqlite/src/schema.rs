//! SQL schema for the Salinha SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Timestamps are fixed-width RFC 3339 UTC strings. For years 0001 to 9999,
/// the only ones validation admits, lexical order is chronological order and
/// range queries can compare them directly.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS reservations (
    id           TEXT PRIMARY KEY,
    title        TEXT NOT NULL,
    description  TEXT,
    start_time   TEXT NOT NULL,
    end_time     TEXT NOT NULL,
    reserved_by  TEXT NOT NULL,
    room         TEXT NOT NULL,   -- 'salinha' | 'sede'
    created_at   TEXT NOT NULL,   -- server-assigned
    updated_at   TEXT NOT NULL    -- server-assigned; bumped on every update
);

-- No overlap constraint: double-booking is refused before the write, not here.
CREATE INDEX IF NOT EXISTS reservations_start_idx ON reservations(start_time);

PRAGMA user_version = 1;
";
