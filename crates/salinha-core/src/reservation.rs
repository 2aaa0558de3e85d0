//! Reservation records and the inputs used to create and edit them.
//!
//! A reservation books one room for a half-open `[start_time, end_time)`
//! window. Records are owned by the store: it assigns `id`, `created_at` and
//! `updated_at`, and callers never supply them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

// ─── Room ────────────────────────────────────────────────────────────────────

/// One of the two bookable rooms. Each room is an independent conflict
/// domain.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Room {
  Salinha,
  Sede,
}

// ─── Reservation ─────────────────────────────────────────────────────────────

/// A persisted booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
  pub id:          Uuid,
  pub title:       String,
  pub description: Option<String>,
  pub start_time:  DateTime<Utc>,
  pub end_time:    DateTime<Utc>,
  pub reserved_by: String,
  pub room:        Room,
  /// Store-assigned; never changes after insert.
  pub created_at:  DateTime<Utc>,
  /// Store-assigned; refreshed on every update.
  pub updated_at:  DateTime<Utc>,
}

impl Reservation {
  /// Build the stored form of `input` with store-assigned metadata.
  pub fn from_new(id: Uuid, input: NewReservation, now: DateTime<Utc>) -> Self {
    Self {
      id,
      title: input.title,
      description: input.description,
      start_time: input.start_time,
      end_time: input.end_time,
      reserved_by: input.reserved_by,
      room: input.room,
      created_at: now,
      updated_at: now,
    }
  }

  /// `start_time <= now <= end_time`. Both ends inclusive, matching how the
  /// occupancy card treats a booking that ends exactly now.
  pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
    self.start_time <= now && now <= self.end_time
  }
}

// ─── NewReservation ──────────────────────────────────────────────────────────

/// Input to [`crate::store::ReservationStore::insert`]. Already validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
  pub title:       String,
  pub description: Option<String>,
  pub start_time:  DateTime<Utc>,
  pub end_time:    DateTime<Utc>,
  pub reserved_by: String,
  pub room:        Room,
}

// ─── ReservationPatch ────────────────────────────────────────────────────────

/// A partial update. Only `Some` fields change.
///
/// `description: Some("")` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationPatch {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub start_time:  Option<DateTime<Utc>>,
  pub end_time:    Option<DateTime<Utc>>,
  pub reserved_by: Option<String>,
  pub room:        Option<Room>,
}

impl ReservationPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  /// Copy every present field onto `target`. Does not touch `updated_at`;
  /// that is the store's job.
  pub fn apply_to(&self, target: &mut Reservation) {
    if let Some(title) = &self.title {
      target.title = title.clone();
    }
    if let Some(description) = &self.description {
      target.description =
        (!description.is_empty()).then(|| description.clone());
    }
    if let Some(start) = self.start_time {
      target.start_time = start;
    }
    if let Some(end) = self.end_time {
      target.end_time = end;
    }
    if let Some(reserved_by) = &self.reserved_by {
      target.reserved_by = reserved_by.clone();
    }
    if let Some(room) = self.room {
      target.room = room;
    }
  }
}
