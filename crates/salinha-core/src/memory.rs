//! An in-process [`ReservationStore`] for tests and local experiments.
//!
//! Besides plain storage it can simulate a misbehaving backend: every call
//! can be made to fail with a chosen [`RepositoryErrorKind`], or to stall for
//! a fixed latency before answering.

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
  error::{ClassifyError, RepositoryErrorKind},
  reservation::{NewReservation, Reservation, ReservationPatch},
  store::ReservationStore,
};

#[derive(Debug, Error)]
#[error("memory store: {message}")]
pub struct MemoryError {
  pub kind:    RepositoryErrorKind,
  pub message: String,
}

impl ClassifyError for MemoryError {
  fn kind(&self) -> RepositoryErrorKind { self.kind }
}

#[derive(Default)]
struct Inner {
  records: HashMap<Uuid, Reservation>,
  failure: Option<RepositoryErrorKind>,
  latency: Option<Duration>,
}

/// Clones share the same records.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Make every subsequent call fail with `kind` until [`Self::recover`].
  pub async fn fail_with(&self, kind: RepositoryErrorKind) {
    self.inner.write().await.failure = Some(kind);
  }

  pub async fn recover(&self) { self.inner.write().await.failure = None; }

  /// Delay every subsequent call by `latency`.
  pub async fn set_latency(&self, latency: Option<Duration>) {
    self.inner.write().await.latency = latency;
  }

  /// Insert a fully-formed record as-is, bypassing id assignment. Lets tests
  /// stage states the conflict gate would refuse.
  pub async fn seed(&self, reservation: Reservation) {
    self
      .inner
      .write()
      .await
      .records
      .insert(reservation.id, reservation);
  }

  async fn enter(&self) -> Result<(), MemoryError> {
    let (failure, latency) = {
      let inner = self.inner.read().await;
      (inner.failure, inner.latency)
    };
    if let Some(latency) = latency {
      tokio::time::sleep(latency).await;
    }
    match failure {
      Some(kind) => Err(MemoryError { kind, message: format!("injected {kind} failure") }),
      None => Ok(()),
    }
  }

  async fn sorted(&self, keep: impl Fn(&Reservation) -> bool) -> Vec<Reservation> {
    let inner = self.inner.read().await;
    let mut list: Vec<Reservation> =
      inner.records.values().filter(|r| keep(r)).cloned().collect();
    list.sort_by_key(|r| (r.start_time, r.id));
    list
  }
}

impl ReservationStore for MemoryStore {
  type Error = MemoryError;

  async fn insert(&self, input: NewReservation) -> Result<Reservation, MemoryError> {
    self.enter().await?;
    let reservation = Reservation::from_new(Uuid::new_v4(), input, Utc::now());
    self
      .inner
      .write()
      .await
      .records
      .insert(reservation.id, reservation.clone());
    Ok(reservation)
  }

  async fn update(
    &self,
    id: Uuid,
    patch: ReservationPatch,
  ) -> Result<Reservation, MemoryError> {
    self.enter().await?;
    let mut inner = self.inner.write().await;
    let record = inner.records.get_mut(&id).ok_or_else(|| MemoryError {
      kind:    RepositoryErrorKind::NotFound,
      message: format!("no reservation {id}"),
    })?;
    patch.apply_to(record);
    record.updated_at = Utc::now();
    Ok(record.clone())
  }

  async fn delete_by_id(&self, id: Uuid) -> Result<(), MemoryError> {
    self.enter().await?;
    self.inner.write().await.records.remove(&id);
    Ok(())
  }

  async fn get(&self, id: Uuid) -> Result<Option<Reservation>, MemoryError> {
    self.enter().await?;
    Ok(self.inner.read().await.records.get(&id).cloned())
  }

  async fn list_all(&self) -> Result<Vec<Reservation>, MemoryError> {
    self.enter().await?;
    Ok(self.sorted(|_| true).await)
  }

  async fn list_by_date_range(
    &self,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> Result<Vec<Reservation>, MemoryError> {
    self.enter().await?;
    Ok(
      self
        .sorted(|r| start <= r.start_time && r.start_time <= end)
        .await,
    )
  }

  async fn count(&self) -> Result<u64, MemoryError> {
    self.enter().await?;
    Ok(self.inner.read().await.records.len() as u64)
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::reservation::Room;

  fn new(room: Room, h: u32) -> NewReservation {
    NewReservation {
      title:       format!("{h}h"),
      description: None,
      start_time:  Utc.with_ymd_and_hms(2026, 10, 16, h, 0, 0).unwrap(),
      end_time:    Utc.with_ymd_and_hms(2026, 10, 16, h + 1, 0, 0).unwrap(),
      reserved_by: "Ana".into(),
      room,
    }
  }

  #[tokio::test]
  async fn insert_assigns_metadata() {
    let s = MemoryStore::new();
    let r = s.insert(new(Room::Sede, 10)).await.unwrap();
    assert_eq!(r.created_at, r.updated_at);
    assert_eq!(s.get(r.id).await.unwrap(), Some(r));
    assert_eq!(s.count().await.unwrap(), 1);
  }

  #[tokio::test]
  async fn lists_are_ordered_by_start() {
    let s = MemoryStore::new();
    for h in [15, 9, 12] {
      s.insert(new(Room::Salinha, h)).await.unwrap();
    }
    let titles: Vec<String> =
      s.list_all().await.unwrap().into_iter().map(|r| r.title).collect();
    assert_eq!(titles, ["9h", "12h", "15h"]);

    let from = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
    let to = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
    let ranged = s.list_by_date_range(from, to).await.unwrap();
    assert_eq!(ranged.len(), 2);
  }

  #[tokio::test]
  async fn update_bumps_updated_at_and_misses_are_not_found() {
    let s = MemoryStore::new();
    let r = s.insert(new(Room::Sede, 10)).await.unwrap();
    let patch = ReservationPatch { title: Some("Moved".into()), ..Default::default() };
    let updated = s.update(r.id, patch.clone()).await.unwrap();
    assert_eq!(updated.title, "Moved");
    assert!(updated.updated_at >= r.updated_at);
    assert_eq!(updated.created_at, r.created_at);

    let err = s.update(Uuid::new_v4(), patch).await.unwrap_err();
    assert_eq!(err.kind(), RepositoryErrorKind::NotFound);
  }

  #[tokio::test]
  async fn delete_is_idempotent() {
    let s = MemoryStore::new();
    let r = s.insert(new(Room::Sede, 10)).await.unwrap();
    s.delete_by_id(r.id).await.unwrap();
    s.delete_by_id(r.id).await.unwrap();
    assert_eq!(s.count().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn injected_failures_are_classified() {
    let s = MemoryStore::new();
    s.fail_with(RepositoryErrorKind::Network).await;
    let err = s.list_all().await.unwrap_err();
    assert_eq!(err.kind(), RepositoryErrorKind::Network);
    s.recover().await;
    assert!(s.list_all().await.is_ok());
  }
}
