//! Salinha HTTP server wiring.
//!
//! Holds the runtime configuration and assembles the application router; the
//! binary in `main.rs` only parses arguments, opens the store and serves.

use std::{path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context as _;
use axum::Router;
use chrono::FixedOffset;
use salinha_core::{
  service::{DEFAULT_REQUEST_TIMEOUT, ReservationService, ServiceConfig},
  store::ReservationStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SALINHA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub store_path:           PathBuf,
  /// UTC offset defining the local calendar day, e.g. `-03:00`.
  pub timezone:             String,
  pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "127.0.0.1".to_string(),
      port:                 8080,
      store_path:           PathBuf::from("salinha.db"),
      timezone:             "+00:00".to_string(),
      request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// The service settings these options describe.
  pub fn service_config(&self) -> anyhow::Result<ServiceConfig> {
    let timezone = FixedOffset::from_str(self.timezone.trim())
      .with_context(|| format!("invalid timezone offset {:?}", self.timezone))?;
    anyhow::ensure!(
      self.request_timeout_secs > 0,
      "request_timeout_secs must be positive"
    );
    Ok(ServiceConfig {
      timezone,
      request_timeout: Duration::from_secs(self.request_timeout_secs),
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The complete application: the JSON API with request tracing.
pub fn app<S>(store: S, config: ServiceConfig) -> Router
where
  S: ReservationStore + 'static,
{
  let service = ReservationService::new(Arc::new(store), config);
  salinha_api::api_router(Arc::new(service)).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use salinha_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  #[test]
  fn defaults_are_usable() {
    let cfg = ServerConfig::default();
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    let service = cfg.service_config().unwrap();
    assert_eq!(service.timezone.local_minus_utc(), 0);
    assert_eq!(service.request_timeout, Duration::from_secs(10));
  }

  #[test]
  fn parses_negative_offsets() {
    let cfg = ServerConfig { timezone: "-03:00".into(), ..Default::default() };
    let service = cfg.service_config().unwrap();
    assert_eq!(service.timezone.local_minus_utc(), -3 * 3600);
  }

  #[test]
  fn rejects_bad_settings() {
    let zone = ServerConfig { timezone: "America/Sao_Paulo".into(), ..Default::default() };
    assert!(zone.service_config().is_err());

    let timeout = ServerConfig { request_timeout_secs: 0, ..Default::default() };
    assert!(timeout.service_config().is_err());
  }

  #[test]
  fn partial_config_falls_back_to_defaults() {
    let settings = config::Config::builder()
      .add_source(config::File::from_str(
        "port = 9000\ntimezone = \"-03:00\"",
        config::FileFormat::Toml,
      ))
      .build()
      .unwrap();
    let cfg: ServerConfig = settings.try_deserialize().unwrap();
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.timezone, "-03:00");
  }

  #[tokio::test]
  async fn app_serves_over_sqlite() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app = app(store, ServiceConfig::default());

    let body = serde_json::json!({
      "title": "Standup",
      "reserved_by": "Ana",
      "room": "sede",
      "start_time": "2026-10-16T09:00:00Z",
      "end_time": "2026-10-16T09:15:00Z",
    });
    let resp = app
      .clone()
      .oneshot(
        Request::post("/reservations")
          .header("content-type", "application/json")
          .body(Body::from(body.to_string()))
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
      .oneshot(Request::get("/reservations/count").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let count: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(count["count"], 1);
  }
}
