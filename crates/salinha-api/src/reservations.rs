//! Handlers for `/reservations` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/reservations` | Optional `?date=YYYY-MM-DD` (local day) |
//! | `POST`   | `/reservations` | Body: [`ReservationForm`]; 201 + stored record |
//! | `GET`    | `/reservations/count` | `{"count": n}` |
//! | `GET`    | `/reservations/{id}` | 404 if not found |
//! | `PATCH`  | `/reservations/{id}` | Body: [`PatchForm`]; returns the updated record |
//! | `DELETE` | `/reservations/{id}` | 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use salinha_core::{
  reservation::Reservation,
  service::ReservationService,
  store::ReservationStore,
  validate::{PatchForm, ReservationForm},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Restrict to reservations starting on this calendar day in the
  /// configured zone.
  pub date: Option<NaiveDate>,
}

/// `GET /reservations[?date=YYYY-MM-DD]`
pub async fn list<S: ReservationStore>(
  State(service): State<Arc<ReservationService<S>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Reservation>>, ApiError> {
  let reservations = match params.date {
    Some(date) => service.list_for_day(date).await?,
    None => service.list_all().await?,
  };
  Ok(Json(reservations))
}

// ─── Count ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CountBody {
  pub count: u64,
}

/// `GET /reservations/count`
pub async fn count<S: ReservationStore>(
  State(service): State<Arc<ReservationService<S>>>,
) -> Result<Json<CountBody>, ApiError> {
  Ok(Json(CountBody { count: service.count().await? }))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /reservations/{id}`
pub async fn get_one<S: ReservationStore>(
  State(service): State<Arc<ReservationService<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, ApiError> {
  Ok(Json(service.get(id).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /reservations`: runs the conflict gate, returns 201 + the stored
/// [`Reservation`].
pub async fn create<S: ReservationStore>(
  State(service): State<Arc<ReservationService<S>>>,
  Json(form): Json<ReservationForm>,
) -> Result<impl IntoResponse, ApiError> {
  let created = service.create(form).await?;
  Ok((StatusCode::CREATED, Json(created)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /reservations/{id}`: only the supplied fields change.
pub async fn update_one<S: ReservationStore>(
  State(service): State<Arc<ReservationService<S>>>,
  Path(id): Path<Uuid>,
  Json(form): Json<PatchForm>,
) -> Result<Json<Reservation>, ApiError> {
  if is_blank(&form) {
    return Err(ApiError::BadRequest("no fields to update".into()));
  }
  Ok(Json(service.update(id, form).await?))
}

fn is_blank(form: &PatchForm) -> bool {
  form.title.is_none()
    && form.description.is_none()
    && form.start_time.is_none()
    && form.end_time.is_none()
    && form.reserved_by.is_none()
    && form.room.is_none()
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /reservations/{id}`
pub async fn delete_one<S: ReservationStore>(
  State(service): State<Arc<ReservationService<S>>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  service.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
