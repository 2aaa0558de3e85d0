//! Handler for `GET /dashboard`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::{DateTime, Utc};
use salinha_core::{
  service::{ReservationService, TodayOverview},
  store::ReservationStore,
};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize, Default)]
pub struct DashboardParams {
  /// Evaluate the dashboard at this instant instead of the current time.
  pub now: Option<DateTime<Utc>>,
}

/// `GET /dashboard[?now=<rfc3339>]`
///
/// Never fails: a store error yields empty rooms and an `error` message.
pub async fn handler<S: ReservationStore>(
  State(service): State<Arc<ReservationService<S>>>,
  Query(params): Query<DashboardParams>,
) -> Json<TodayOverview> {
  let now = params.now.unwrap_or_else(Utc::now);
  debug!(%now, "building dashboard");
  Json(service.load_today(now).await)
}
