//! [`SqliteStore`], the SQLite implementation of [`ReservationStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use tracing::debug;
use uuid::Uuid;

use salinha_core::{
  reservation::{NewReservation, Reservation, ReservationPatch},
  store::ReservationStore,
};

use crate::{
  encode::{COLUMNS, RawReservation, encode_dt, encode_room, encode_uuid},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A reservation store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT {COLUMNS} ...` query and decode every row.
  async fn select(
    &self,
    sql: String,
    params: Vec<String>,
  ) -> Result<Vec<Reservation>> {
    let raws: Vec<RawReservation> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), RawReservation::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReservation::into_reservation).collect()
  }
}

// ─── ReservationStore impl ───────────────────────────────────────────────────

impl ReservationStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn insert(&self, input: NewReservation) -> Result<Reservation> {
    let reservation = Reservation::from_new(Uuid::new_v4(), input, Utc::now());

    let id_str      = encode_uuid(reservation.id);
    let title       = reservation.title.clone();
    let description = reservation.description.clone();
    let start_str   = encode_dt(reservation.start_time);
    let end_str     = encode_dt(reservation.end_time);
    let reserved_by = reservation.reserved_by.clone();
    let room_str    = encode_room(reservation.room);
    let at_str      = encode_dt(reservation.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO reservations (
             id, title, description, start_time, end_time,
             reserved_by, room, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
          rusqlite::params![
            id_str,
            title,
            description,
            start_str,
            end_str,
            reserved_by,
            room_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    debug!(id = %reservation.id, "inserted reservation");
    Ok(reservation)
  }

  async fn update(&self, id: Uuid, patch: ReservationPatch) -> Result<Reservation> {
    let id_str      = encode_uuid(id);
    let title       = patch.title;
    let description = patch.description;
    let start_str   = patch.start_time.map(encode_dt);
    let end_str     = patch.end_time.map(encode_dt);
    let reserved_by = patch.reserved_by;
    let room_str    = patch.room.map(encode_room);
    let at_str      = encode_dt(Utc::now());

    let raw: Option<RawReservation> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "UPDATE reservations SET
             title       = COALESCE(?2, title),
             description = CASE WHEN ?3 IS NULL THEN description
                                WHEN ?3 = ''    THEN NULL
                                ELSE ?3 END,
             start_time  = COALESCE(?4, start_time),
             end_time    = COALESCE(?5, end_time),
             reserved_by = COALESCE(?6, reserved_by),
             room        = COALESCE(?7, room),
             updated_at  = ?8
           WHERE id = ?1
           RETURNING {COLUMNS}"
        );
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params![
                id_str,
                title,
                description,
                start_str,
                end_str,
                reserved_by,
                room_str,
                at_str,
              ],
              RawReservation::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.ok_or(Error::NotFound(id))?.into_reservation()
  }

  async fn delete_by_id(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM reservations WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    debug!(%id, removed, "deleted reservation");
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get(&self, id: Uuid) -> Result<Option<Reservation>> {
    let sql = format!("SELECT {COLUMNS} FROM reservations WHERE id = ?1");
    Ok(self.select(sql, vec![encode_uuid(id)]).await?.into_iter().next())
  }

  async fn list_all(&self) -> Result<Vec<Reservation>> {
    let sql = format!("SELECT {COLUMNS} FROM reservations ORDER BY start_time ASC, id ASC");
    self.select(sql, Vec::new()).await
  }

  async fn list_by_date_range(
    &self,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> Result<Vec<Reservation>> {
    let sql = format!(
      "SELECT {COLUMNS} FROM reservations
       WHERE start_time >= ?1 AND start_time <= ?2
       ORDER BY start_time ASC, id ASC"
    );
    self.select(sql, vec![encode_dt(start), encode_dt(end)]).await
  }

  async fn count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM reservations", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n as u64)
  }
}
