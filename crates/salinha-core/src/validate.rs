//! Field constraints for reservation forms.
//!
//! Forms arrive as loosely-typed input (the room is a plain string, times may
//! be missing) and leave as a [`NewReservation`] or [`ReservationPatch`] only
//! if every constraint holds. Lengths are counted in characters.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;

use crate::{
  error::ValidationErrors,
  reservation::{NewReservation, ReservationPatch, Room},
};

pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;
pub const RESERVED_BY_MAX: usize = 50;
/// Years outside this range do not have a four-digit RFC 3339 form.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

// ─── Forms ───────────────────────────────────────────────────────────────────

/// Create-form input as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationForm {
  #[serde(default)]
  pub title:       String,
  pub description: Option<String>,
  pub start_time:  Option<DateTime<Utc>>,
  pub end_time:    Option<DateTime<Utc>>,
  #[serde(default)]
  pub reserved_by: String,
  #[serde(default)]
  pub room:        String,
}

impl From<NewReservation> for ReservationForm {
  fn from(r: NewReservation) -> Self {
    Self {
      title:       r.title,
      description: r.description,
      start_time:  Some(r.start_time),
      end_time:    Some(r.end_time),
      reserved_by: r.reserved_by,
      room:        r.room.to_string(),
    }
  }
}

/// Edit-form input; every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatchForm {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub start_time:  Option<DateTime<Utc>>,
  pub end_time:    Option<DateTime<Utc>>,
  pub reserved_by: Option<String>,
  pub room:        Option<String>,
}

impl From<ReservationPatch> for PatchForm {
  fn from(p: ReservationPatch) -> Self {
    Self {
      title:       p.title,
      description: p.description,
      start_time:  p.start_time,
      end_time:    p.end_time,
      reserved_by: p.reserved_by,
      room:        p.room.map(|r| r.to_string()),
    }
  }
}

// ─── Field checks ────────────────────────────────────────────────────────────

fn check_title(errors: &mut ValidationErrors, title: &str) {
  let len = title.chars().count();
  if len == 0 {
    errors.push("title", "title is required");
  } else if len > TITLE_MAX {
    errors.push("title", format!("title must be at most {TITLE_MAX} characters"));
  }
}

fn check_description(errors: &mut ValidationErrors, description: &str) {
  if description.chars().count() > DESCRIPTION_MAX {
    errors.push(
      "description",
      format!("description must be at most {DESCRIPTION_MAX} characters"),
    );
  }
}

fn check_reserved_by(errors: &mut ValidationErrors, name: &str) {
  let len = name.chars().count();
  if len == 0 {
    errors.push("reserved_by", "name is required");
  } else if len > RESERVED_BY_MAX {
    errors.push(
      "reserved_by",
      format!("name must be at most {RESERVED_BY_MAX} characters"),
    );
  }
}

fn parse_room(errors: &mut ValidationErrors, room: &str) -> Option<Room> {
  let parsed = Room::from_str(room).ok();
  if parsed.is_none() {
    errors.push("room", "room must be one of: salinha, sede");
  }
  parsed
}

fn check_year(errors: &mut ValidationErrors, field: &'static str, t: DateTime<Utc>) {
  if !YEAR_RANGE.contains(&t.year()) {
    errors.push(field, "time must fall between the years 1 and 9999");
  }
}

fn check_times(
  errors: &mut ValidationErrors,
  start: Option<DateTime<Utc>>,
  end: Option<DateTime<Utc>>,
) {
  if let Some(start) = start {
    check_year(errors, "start_time", start);
  }
  if let Some(end) = end {
    check_year(errors, "end_time", end);
  }
  if let (Some(start), Some(end)) = (start, end) {
    check_window(errors, start, end);
  }
}

/// Push an `end_time` error unless `end > start`.
pub fn check_window(
  errors: &mut ValidationErrors,
  start: DateTime<Utc>,
  end: DateTime<Utc>,
) {
  if end <= start {
    errors.push("end_time", "end time must be after start time");
  }
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Validate a create form. Reports every violated field, not just the first.
pub fn validate_new(form: ReservationForm) -> Result<NewReservation, ValidationErrors> {
  let mut errors = ValidationErrors::default();

  check_title(&mut errors, &form.title);
  if let Some(description) = &form.description {
    check_description(&mut errors, description);
  }
  if form.start_time.is_none() {
    errors.push("start_time", "start time is required");
  }
  if form.end_time.is_none() {
    errors.push("end_time", "end time is required");
  }
  check_times(&mut errors, form.start_time, form.end_time);
  check_reserved_by(&mut errors, &form.reserved_by);
  let room = parse_room(&mut errors, &form.room);

  match (form.start_time, form.end_time, room) {
    (Some(start_time), Some(end_time), Some(room)) if errors.is_empty() => {
      Ok(NewReservation {
        title: form.title,
        description: form.description.filter(|d| !d.is_empty()),
        start_time,
        end_time,
        reserved_by: form.reserved_by,
        room,
      })
    }
    _ => Err(errors),
  }
}

/// Validate the fields present in an edit form. The merged window is checked
/// separately once the stored record is known.
pub fn validate_patch(form: PatchForm) -> Result<ReservationPatch, ValidationErrors> {
  let mut errors = ValidationErrors::default();

  if let Some(title) = &form.title {
    check_title(&mut errors, title);
  }
  if let Some(description) = &form.description {
    check_description(&mut errors, description);
  }
  check_times(&mut errors, form.start_time, form.end_time);
  if let Some(name) = &form.reserved_by {
    check_reserved_by(&mut errors, name);
  }
  let room = match &form.room {
    Some(room) => parse_room(&mut errors, room),
    None => None,
  };

  errors.into_result()?;
  Ok(ReservationPatch {
    title: form.title,
    description: form.description,
    start_time: form.start_time,
    end_time: form.end_time,
    reserved_by: form.reserved_by,
    room,
  })
}
