//! Per-room occupancy views built from an already-fetched reservation list.
//!
//! Everything here is a pure transformation; fetching belongs to
//! [`crate::service`].

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::{
  reservation::{Reservation, Room},
  window::{DayWindow, Phase, phase},
};

// ─── RoomView ────────────────────────────────────────────────────────────────

/// Occupancy of one room at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoomView {
  /// The booking in progress. When several overlap (possible only if two
  /// writers raced past the conflict gate) the earliest start wins, then the
  /// lowest id; the losers appear in no list.
  pub current:     Option<Reservation>,
  /// `start > now`, soonest first.
  pub upcoming:    Vec<Reservation>,
  /// Started inside the day window and already over, most recent first.
  pub past:        Vec<Reservation>,
  /// Reservations starting inside the day window, whatever their phase.
  pub today_count: usize,
}

impl RoomView {
  /// Classify `reservations`, which must all belong to one room.
  pub fn classify<'a, I>(now: DateTime<Utc>, window: &DayWindow, reservations: I) -> Self
  where
    I: IntoIterator<Item = &'a Reservation>,
  {
    let mut view = Self::default();
    let mut active: Vec<&Reservation> = Vec::new();

    for r in reservations {
      if window.contains(r.start_time) {
        view.today_count += 1;
      }
      match phase(r, now) {
        Phase::Active => active.push(r),
        Phase::Upcoming => view.upcoming.push(r.clone()),
        Phase::Ended if window.contains(r.start_time) => view.past.push(r.clone()),
        Phase::Ended => {}
      }
    }

    view.current = active
      .into_iter()
      .min_by_key(|r| (r.start_time, r.id))
      .cloned();
    view.upcoming.sort_by_key(|r| (r.start_time, r.id));
    view
      .past
      .sort_by(|a, b| (b.start_time, b.id).cmp(&(a.start_time, a.id)));
    view
  }

  pub fn is_occupied(&self) -> bool { self.current.is_some() }
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

/// Side-by-side views of both rooms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dashboard {
  pub salinha: RoomView,
  pub sede:    RoomView,
}

impl Dashboard {
  pub fn room(&self, room: Room) -> &RoomView {
    match room {
      Room::Salinha => &self.salinha,
      Room::Sede => &self.sede,
    }
  }

  /// Reservations starting today across both rooms.
  pub fn today_total(&self) -> usize {
    self.salinha.today_count + self.sede.today_count
  }
}

/// Split `reservations` by room and classify each against `now`, with "today"
/// taken in `tz`.
pub fn build_dashboard<Tz: TimeZone>(
  now: DateTime<Utc>,
  reservations: &[Reservation],
  tz: &Tz,
) -> Dashboard {
  let window = DayWindow::containing(now, tz);
  let in_room = |room: Room| reservations.iter().filter(move |r| r.room == room);

  Dashboard {
    salinha: RoomView::classify(now, &window, in_room(Room::Salinha)),
    sede:    RoomView::classify(now, &window, in_room(Room::Sede)),
  }
}
