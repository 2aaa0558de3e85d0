//! [`ReservationService`]: the conflict gate in front of a store.
//!
//! Every create and update runs the same sequence: validate the form, fetch
//! the current reservations, look for a same-room overlap, and only then
//! write. The check and the write are separate store calls, so two writers
//! racing for the same slot can both pass; the store offers no exclusion
//! constraint to close that window.
//!
//! Every store call is bounded by [`ServiceConfig::request_timeout`]; an
//! elapsed call is reported as [`RepositoryErrorKind::Unavailable`].

use std::{future::Future, sync::Arc, time::Duration};

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
  dashboard::{Dashboard, build_dashboard},
  error::{ClassifyError, Error, RepositoryErrorKind, Result, ValidationErrors},
  overlap::first_conflict,
  reservation::{Reservation, Room},
  store::ReservationStore,
  validate::{PatchForm, ReservationForm, check_window, validate_new, validate_patch},
  window::DayWindow,
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ServiceConfig {
  /// The zone whose calendar defines "today".
  pub timezone:        FixedOffset,
  /// Upper bound on any single store call.
  pub request_timeout: Duration,
}

impl Default for ServiceConfig {
  fn default() -> Self {
    Self {
      timezone:        Utc.fix(),
      request_timeout: DEFAULT_REQUEST_TIMEOUT,
    }
  }
}

// ─── Overview ────────────────────────────────────────────────────────────────

/// Everything the landing page shows, assembled in one call.
#[derive(Debug, Clone, Serialize)]
pub struct TodayOverview {
  pub as_of:       DateTime<Utc>,
  pub window:      DayWindow,
  pub dashboard:   Dashboard,
  /// Reservations starting today across both rooms.
  pub today_total: usize,
  /// All stored reservations, any day.
  pub total_count: u64,
  /// Set when a fetch failed and the view fell back to empty data.
  pub error:       Option<String>,
}

// ─── Service ─────────────────────────────────────────────────────────────────

pub struct ReservationService<S> {
  store:  Arc<S>,
  config: ServiceConfig,
}

impl<S> Clone for ReservationService<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), config: self.config.clone() }
  }
}

impl<S: ReservationStore> ReservationService<S> {
  pub fn new(store: Arc<S>, config: ServiceConfig) -> Self { Self { store, config } }

  /// Run one store call under the configured timeout and classify failures.
  async fn call<T, F>(&self, op: &'static str, fut: F) -> Result<T>
  where
    F: Future<Output = Result<T, S::Error>>,
  {
    match tokio::time::timeout(self.config.request_timeout, fut).await {
      Ok(Ok(value)) => Ok(value),
      Ok(Err(e)) => {
        error!(op, kind = %e.kind(), error = %e, "store call failed");
        Err(Error::repository(e))
      }
      Err(elapsed) => {
        error!(op, timeout = ?self.config.request_timeout, "store call timed out");
        Err(Error::Repository {
          kind:   RepositoryErrorKind::Unavailable,
          source: Box::new(elapsed),
        })
      }
    }
  }

  // ── Conflict gate ─────────────────────────────────────────────────────

  /// Whether `[start, end)` in `room` collides with any stored reservation
  /// other than `exclude_id`.
  pub async fn check_conflict(
    &self,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    room: Room,
    exclude_id: Option<Uuid>,
  ) -> Result<bool> {
    let all = self.call("list_all", self.store.list_all()).await?;
    Ok(first_conflict(start, end, room, &all, exclude_id).is_some())
  }

  fn refuse_conflict(
    room: Room,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    existing: &[Reservation],
    exclude_id: Option<Uuid>,
  ) -> Result<()> {
    match first_conflict(start, end, room, existing, exclude_id) {
      Some(clash) => {
        warn!(%room, %start, %end, existing = %clash.id, "time conflict");
        Err(Error::Conflict { room, existing: clash.id })
      }
      None => Ok(()),
    }
  }

  /// Validate, check for overlaps, then insert.
  pub async fn create(&self, form: ReservationForm) -> Result<Reservation> {
    let input = validate_new(form)?;
    let all = self.call("list_all", self.store.list_all()).await?;
    Self::refuse_conflict(input.room, input.start_time, input.end_time, &all, None)?;

    let created = self.call("insert", self.store.insert(input)).await?;
    info!(id = %created.id, room = %created.room, "reservation created");
    Ok(created)
  }

  /// Validate the patch, merge it onto the stored record, check the merged
  /// window against every other reservation, then write only the patch.
  pub async fn update(&self, id: Uuid, form: PatchForm) -> Result<Reservation> {
    let patch = validate_patch(form)?;
    let all = self.call("list_all", self.store.list_all()).await?;

    let mut merged = all
      .iter()
      .find(|r| r.id == id)
      .cloned()
      .ok_or(Error::NotFound(id))?;
    patch.apply_to(&mut merged);

    let mut errors = ValidationErrors::default();
    check_window(&mut errors, merged.start_time, merged.end_time);
    errors.into_result()?;

    Self::refuse_conflict(merged.room, merged.start_time, merged.end_time, &all, Some(id))?;

    let updated = self
      .call("update", self.store.update(id, patch))
      .await
      .map_err(|e| if e.is_not_found() { Error::NotFound(id) } else { e })?;
    info!(%id, room = %updated.room, "reservation updated");
    Ok(updated)
  }

  pub async fn delete(&self, id: Uuid) -> Result<()> {
    self.call("delete_by_id", self.store.delete_by_id(id)).await?;
    info!(%id, "reservation deleted");
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn get(&self, id: Uuid) -> Result<Reservation> {
    self
      .call("get", self.store.get(id))
      .await?
      .ok_or(Error::NotFound(id))
  }

  pub async fn list_all(&self) -> Result<Vec<Reservation>> {
    self.call("list_all", self.store.list_all()).await
  }

  /// Reservations starting on `date` in the configured zone.
  pub async fn list_for_day(&self, date: NaiveDate) -> Result<Vec<Reservation>> {
    let window = DayWindow::for_date(date, &self.config.timezone);
    debug!(%date, start = %window.start, end = %window.end, "listing day");
    self
      .call(
        "list_by_date_range",
        self.store.list_by_date_range(window.start, window.end),
      )
      .await
  }

  pub async fn count(&self) -> Result<u64> {
    self.call("count", self.store.count()).await
  }

  /// Fetch today's reservations and the total count concurrently and build
  /// the dashboard. A failed fetch degrades to empty data with the message
  /// recorded in [`TodayOverview::error`].
  pub async fn load_today(&self, now: DateTime<Utc>) -> TodayOverview {
    let tz = &self.config.timezone;
    let window = DayWindow::containing(now, tz);

    let (today, total) = tokio::join!(
      self.call(
        "list_by_date_range",
        self.store.list_by_date_range(window.start, window.end),
      ),
      self.call("count", self.store.count()),
    );

    let mut error = None;
    let today = today.unwrap_or_else(|e| {
      warn!(error = %e, "falling back to an empty day");
      error.get_or_insert_with(|| e.user_message());
      Vec::new()
    });
    let total_count = total.unwrap_or_else(|e| {
      warn!(error = %e, "falling back to a zero total");
      error.get_or_insert_with(|| e.user_message());
      0
    });

    let dashboard = build_dashboard(now, &today, tz);
    TodayOverview {
      as_of: now,
      window,
      today_total: dashboard.today_total(),
      dashboard,
      total_count,
      error,
    }
  }
}
