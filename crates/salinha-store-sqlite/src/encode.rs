//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings with nanosecond
//! precision, so a stored instant reads back unchanged. UUIDs are stored as hyphenated lowercase strings. Rooms are
//! stored by their lowercase name.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use salinha_core::reservation::{Reservation, Room};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Room ─────────────────────────────────────────────────────────────────────

pub fn encode_room(room: Room) -> String { room.to_string() }

pub fn decode_room(s: &str) -> Result<Room> {
  Room::from_str(s).map_err(|_| Error::UnknownRoom(s.to_owned()))
}

// ─── Row type ─────────────────────────────────────────────────────────────────

/// Column list matching [`RawReservation::from_row`].
pub const COLUMNS: &str =
  "id, title, description, start_time, end_time, reserved_by, room, created_at, updated_at";

/// Raw strings read directly from a `reservations` row.
pub struct RawReservation {
  pub id:          String,
  pub title:       String,
  pub description: Option<String>,
  pub start_time:  String,
  pub end_time:    String,
  pub reserved_by: String,
  pub room:        String,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawReservation {
  /// Read a row selected with [`COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      title:       row.get(1)?,
      description: row.get(2)?,
      start_time:  row.get(3)?,
      end_time:    row.get(4)?,
      reserved_by: row.get(5)?,
      room:        row.get(6)?,
      created_at:  row.get(7)?,
      updated_at:  row.get(8)?,
    })
  }

  pub fn into_reservation(self) -> Result<Reservation> {
    Ok(Reservation {
      id:          decode_uuid(&self.id)?,
      title:       self.title,
      description: self.description,
      start_time:  decode_dt(&self.start_time)?,
      end_time:    decode_dt(&self.end_time)?,
      reserved_by: self.reserved_by,
      room:        decode_room(&self.room)?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let early = Utc.with_ymd_and_hms(2026, 1, 2, 9, 5, 0).unwrap();
    let late = early + chrono::Duration::milliseconds(1500);
    let (a, b) = (encode_dt(early), encode_dt(late));
    assert_eq!(a.len(), b.len());
    assert!(a < b);
    assert_eq!(decode_dt(&b).unwrap(), late);
  }

  #[test]
  fn sub_microsecond_instants_stay_distinct() {
    let base = Utc.with_ymd_and_hms(2026, 10, 16, 10, 0, 0).unwrap();
    let (a, b) = (
      base + chrono::Duration::nanoseconds(100),
      base + chrono::Duration::nanoseconds(900),
    );
    assert!(encode_dt(a) < encode_dt(b));
    assert_eq!(decode_dt(&encode_dt(a)).unwrap(), a);
  }

  #[test]
  fn rooms_round_trip_and_reject_unknowns() {
    assert_eq!(decode_room(&encode_room(Room::Sede)).unwrap(), Room::Sede);
    assert!(matches!(decode_room("lobby"), Err(Error::UnknownRoom(_))));
  }
}
