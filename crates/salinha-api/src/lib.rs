//! JSON REST API for Salinha.
//!
//! Exposes an axum [`Router`] backed by a [`ReservationService`] over any
//! [`ReservationStore`]. TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", salinha_api::api_router(service.clone()))
//! ```

pub mod dashboard;
pub mod error;
pub mod reservations;

use std::sync::Arc;

use axum::{Router, routing::get};
use salinha_core::{service::ReservationService, store::ReservationStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<ReservationService<S>>) -> Router<()>
where
  S: ReservationStore + 'static,
{
  Router::new()
    // Reservations
    .route(
      "/reservations",
      get(reservations::list::<S>).post(reservations::create::<S>),
    )
    .route("/reservations/count", get(reservations::count::<S>))
    .route(
      "/reservations/{id}",
      get(reservations::get_one::<S>)
        .patch(reservations::update_one::<S>)
        .delete(reservations::delete_one::<S>),
    )
    // Dashboard
    .route("/dashboard", get(dashboard::handler::<S>))
    .with_state(service)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use salinha_core::{
    error::RepositoryErrorKind,
    memory::MemoryStore,
    service::ServiceConfig,
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  fn make_app() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    let service = ReservationService::new(Arc::new(store.clone()), ServiceConfig::default());
    (api_router(Arc::new(service)), store)
  }

  async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn booking(room: &str, start: &str, end: &str) -> Value {
    json!({
      "title": "Planning",
      "reserved_by": "Ana",
      "room": room,
      "start_time": start,
      "end_time": end,
    })
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_201_with_assigned_id() {
    let (app, _) = make_app();
    let resp = send(
      &app,
      "POST",
      "/reservations",
      Some(booking("salinha", "2026-10-16T10:00:00Z", "2026-10-16T11:00:00Z")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert!(body["id"].is_string());
    assert_eq!(body["room"], "salinha");
  }

  #[tokio::test]
  async fn overlapping_create_returns_409() {
    let (app, _) = make_app();
    send(
      &app,
      "POST",
      "/reservations",
      Some(booking("salinha", "2026-10-16T10:00:00Z", "2026-10-16T11:00:00Z")),
    )
    .await;

    let resp = send(
      &app,
      "POST",
      "/reservations",
      Some(booking("salinha", "2026-10-16T10:30:00Z", "2026-10-16T11:30:00Z")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("conflict"));

    let adjacent = send(
      &app,
      "POST",
      "/reservations",
      Some(booking("salinha", "2026-10-16T11:00:00Z", "2026-10-16T12:00:00Z")),
    )
    .await;
    assert_eq!(adjacent.status(), StatusCode::CREATED);
  }

  #[tokio::test]
  async fn invalid_form_returns_422_with_fields() {
    let (app, _) = make_app();
    let resp = send(
      &app,
      "POST",
      "/reservations",
      Some(booking("garage", "2026-10-16T11:00:00Z", "2026-10-16T10:00:00Z")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(resp).await;
    let fields: Vec<&str> = body["fields"]
      .as_array()
      .unwrap()
      .iter()
      .map(|f| f["field"].as_str().unwrap())
      .collect();
    assert_eq!(fields, ["end_time", "room"]);
  }

  // ── Read / update / delete ──────────────────────────────────────────────────

  #[tokio::test]
  async fn get_patch_delete_lifecycle() {
    let (app, _) = make_app();
    let created = json_body(
      send(
        &app,
        "POST",
        "/reservations",
        Some(booking("sede", "2026-10-16T10:00:00Z", "2026-10-16T11:00:00Z")),
      )
      .await,
    )
    .await;
    let id = created["id"].as_str().unwrap().to_owned();
    let uri = format!("/reservations/{id}");

    let fetched = send(&app, "GET", &uri, None).await;
    assert_eq!(fetched.status(), StatusCode::OK);

    let patched = send(&app, "PATCH", &uri, Some(json!({ "title": "Retro" }))).await;
    assert_eq!(patched.status(), StatusCode::OK);
    assert_eq!(json_body(patched).await["title"], "Retro");

    let blank = send(&app, "PATCH", &uri, Some(json!({}))).await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    let deleted = send(&app, "DELETE", &uri, None).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = send(&app, "GET", &uri, None).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn list_filters_by_local_day_and_counts_everything() {
    let (app, _) = make_app();
    for (start, end) in [
      ("2026-10-15T10:00:00Z", "2026-10-15T11:00:00Z"),
      ("2026-10-16T10:00:00Z", "2026-10-16T11:00:00Z"),
      ("2026-10-16T12:00:00Z", "2026-10-16T13:00:00Z"),
    ] {
      send(&app, "POST", "/reservations", Some(booking("sede", start, end))).await;
    }

    let all = json_body(send(&app, "GET", "/reservations", None).await).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let day = json_body(send(&app, "GET", "/reservations?date=2026-10-16", None).await).await;
    assert_eq!(day.as_array().unwrap().len(), 2);

    let count = json_body(send(&app, "GET", "/reservations/count", None).await).await;
    assert_eq!(count["count"], 3);
  }

  // ── Dashboard ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn dashboard_classifies_each_room() {
    let (app, _) = make_app();
    for (start, end) in [
      ("2026-10-16T09:00:00Z", "2026-10-16T10:00:00Z"),
      ("2026-10-16T11:30:00Z", "2026-10-16T12:30:00Z"),
      ("2026-10-16T14:00:00Z", "2026-10-16T15:00:00Z"),
    ] {
      send(&app, "POST", "/reservations", Some(booking("salinha", start, end))).await;
    }

    let resp = send(&app, "GET", "/dashboard?now=2026-10-16T12:00:00Z", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let salinha = &body["dashboard"]["salinha"];
    assert_eq!(salinha["current"]["start_time"], "2026-10-16T11:30:00Z");
    assert_eq!(salinha["upcoming"].as_array().unwrap().len(), 1);
    assert_eq!(salinha["past"].as_array().unwrap().len(), 1);
    assert_eq!(salinha["today_count"], 3);
    assert!(body["dashboard"]["sede"]["current"].is_null());
    assert_eq!(body["total_count"], 3);
    assert!(body["error"].is_null());
  }

  #[tokio::test]
  async fn store_outage_maps_to_503_but_dashboard_degrades() {
    let (app, store) = make_app();
    store.fail_with(RepositoryErrorKind::Unavailable).await;

    let list = send(&app, "GET", "/reservations", None).await;
    assert_eq!(list.status(), StatusCode::SERVICE_UNAVAILABLE);

    let dash = send(&app, "GET", "/dashboard", None).await;
    assert_eq!(dash.status(), StatusCode::OK);
    let body = json_body(dash).await;
    assert!(body["error"].is_string());
    assert!(body["dashboard"]["salinha"]["upcoming"].as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn permission_denied_maps_to_403() {
    let (app, store) = make_app();
    store.fail_with(RepositoryErrorKind::PermissionDenied).await;
    let resp = send(&app, "GET", "/reservations/count", None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }
}
