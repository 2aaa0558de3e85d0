//! Day boundaries and reservation phases relative to "now".
//!
//! "Today" is a calendar day in an explicitly supplied time zone, never the
//! host's local zone. The same instant can therefore fall on different days
//! for differently configured deployments.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::reservation::Reservation;

/// Seconds from local midnight to local 23:59:59.
const LAST_SECOND_OF_DAY: i64 = 24 * 60 * 60 - 1;

// ─── DayWindow ───────────────────────────────────────────────────────────────

/// `[local midnight, local 23:59:59]` of one calendar day, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
  pub date:  NaiveDate,
  pub start: DateTime<Utc>,
  pub end:   DateTime<Utc>,
}

impl DayWindow {
  /// The window for `date` as observed in `tz`.
  pub fn for_date<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Self {
    let midnight = date.and_time(NaiveTime::MIN);
    let last = midnight + Duration::seconds(LAST_SECOND_OF_DAY);
    Self {
      date,
      start: local_to_utc(tz, midnight),
      end: local_to_utc(tz, last),
    }
  }

  /// The window of the calendar day `now` falls on in `tz`.
  pub fn containing<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> Self {
    Self::for_date(now.with_timezone(tz).date_naive(), tz)
  }

  pub fn contains(&self, t: DateTime<Utc>) -> bool {
    self.start <= t && t <= self.end
  }
}

/// Resolve a wall-clock time in `tz`. A time skipped by a DST gap is read as
/// UTC instead; fixed offsets never hit that path.
fn local_to_utc<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Utc> {
  tz.from_local_datetime(&local)
    .earliest()
    .map(|dt| dt.with_timezone(&Utc))
    .unwrap_or_else(|| Utc.from_utc_datetime(&local))
}

// ─── Phase ───────────────────────────────────────────────────────────────────

/// Where a reservation sits relative to an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  /// `start > now`.
  Upcoming,
  /// `start <= now <= end`.
  Active,
  /// `end < now`.
  Ended,
}

pub fn phase(reservation: &Reservation, now: DateTime<Utc>) -> Phase {
  if reservation.start_time > now {
    Phase::Upcoming
  } else if reservation.end_time < now {
    Phase::Ended
  } else {
    Phase::Active
  }
}

#[cfg(test)]
mod tests {
  use chrono::FixedOffset;
  use uuid::Uuid;

  use super::*;
  use crate::reservation::{NewReservation, Room};

  fn utc(d: u32, h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, d, h, m, s).unwrap()
  }

  #[test]
  fn utc_window_spans_the_calendar_day() {
    let w = DayWindow::containing(utc(16, 12, 0, 0), &Utc);
    assert_eq!(w.date, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
    assert_eq!(w.start, utc(16, 0, 0, 0));
    assert_eq!(w.end, utc(16, 23, 59, 59));
    assert!(w.contains(w.start));
    assert!(w.contains(w.end));
    assert!(!w.contains(utc(17, 0, 0, 0)));
  }

  #[test]
  fn window_follows_the_configured_offset() {
    let brt = FixedOffset::west_opt(3 * 3600).unwrap();
    // 01:30 UTC on the 17th is still the evening of the 16th at UTC-3.
    let w = DayWindow::containing(utc(17, 1, 30, 0), &brt);
    assert_eq!(w.date, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
    assert_eq!(w.start, utc(16, 3, 0, 0));
    assert_eq!(w.end, utc(17, 2, 59, 59));

    let utc_w = DayWindow::containing(utc(17, 1, 30, 0), &Utc);
    assert_ne!(w, utc_w);
  }

  #[test]
  fn phases_partition_the_timeline() {
    let r = Reservation::from_new(
      Uuid::new_v4(),
      NewReservation {
        title:       "Sync".into(),
        description: None,
        start_time:  utc(16, 10, 0, 0),
        end_time:    utc(16, 11, 0, 0),
        reserved_by: "Rui".into(),
        room:        Room::Sede,
      },
      utc(16, 8, 0, 0),
    );
    assert_eq!(phase(&r, utc(16, 9, 59, 59)), Phase::Upcoming);
    assert_eq!(phase(&r, utc(16, 10, 0, 0)), Phase::Active);
    assert_eq!(phase(&r, utc(16, 11, 0, 0)), Phase::Active);
    assert_eq!(phase(&r, utc(16, 11, 0, 1)), Phase::Ended);
  }
}
