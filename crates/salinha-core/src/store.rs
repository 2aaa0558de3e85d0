//! The `ReservationStore` trait.
//!
//! The trait is implemented by storage backends (`salinha-store-sqlite`, and
//! [`crate::memory::MemoryStore`] for tests). The service layer depends on this
//! abstraction, never on a concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  error::ClassifyError,
  reservation::{NewReservation, Reservation, ReservationPatch},
};

/// Abstraction over a reservation store backend.
///
/// Stores persist what they are told: they do not validate fields and they do
/// not check for double bookings. Both are the caller's job.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ReservationStore: Send + Sync {
  type Error: ClassifyError + std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a new reservation. The store assigns `id`, `created_at` and
  /// `updated_at`.
  fn insert(
    &self,
    input: NewReservation,
  ) -> impl Future<Output = Result<Reservation, Self::Error>> + Send + '_;

  /// Apply the present fields of `patch` and refresh `updated_at`. Fails with
  /// a `NotFound`-class error if `id` does not exist.
  fn update(
    &self,
    id: Uuid,
    patch: ReservationPatch,
  ) -> impl Future<Output = Result<Reservation, Self::Error>> + Send + '_;

  /// Permanently remove a reservation. Removing a missing id succeeds.
  fn delete_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve a reservation by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Reservation>, Self::Error>> + Send + '_;

  /// Every reservation, ordered by start time ascending.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Reservation>, Self::Error>> + Send + '_;

  /// Reservations whose start lies in `[start, end]` (both inclusive),
  /// ordered by start time ascending.
  fn list_by_date_range(
    &self,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<Reservation>, Self::Error>> + Send + '_;

  /// Total number of stored reservations.
  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
