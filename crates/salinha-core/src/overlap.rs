//! Same-room double-booking detection over a snapshot of reservations.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::reservation::{Reservation, Room};

/// Half-open overlap: `[s1, e1)` and `[s2, e2)` share an instant.
/// Back-to-back ranges (`e1 == s2`) do not overlap.
pub fn overlaps(
  s1: DateTime<Utc>,
  e1: DateTime<Utc>,
  s2: DateTime<Utc>,
  e2: DateTime<Utc>,
) -> bool {
  s1 < e2 && e1 > s2
}

/// The first reservation in `existing` that books `room` during
/// `[start, end)`, skipping `exclude_id` (the record being edited).
pub fn first_conflict<'a, I>(
  start: DateTime<Utc>,
  end: DateTime<Utc>,
  room: Room,
  existing: I,
  exclude_id: Option<Uuid>,
) -> Option<&'a Reservation>
where
  I: IntoIterator<Item = &'a Reservation>,
{
  existing
    .into_iter()
    .filter(|r| Some(r.id) != exclude_id)
    .filter(|r| r.room == room)
    .find(|r| overlaps(start, end, r.start_time, r.end_time))
}

pub fn conflicts<'a, I>(
  start: DateTime<Utc>,
  end: DateTime<Utc>,
  room: Room,
  existing: I,
  exclude_id: Option<Uuid>,
) -> bool
where
  I: IntoIterator<Item = &'a Reservation>,
{
  first_conflict(start, end, room, existing, exclude_id).is_some()
}
