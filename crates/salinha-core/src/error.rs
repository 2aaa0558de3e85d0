//! Error types for `salinha-core`.

use serde::Serialize;
use strum::Display;
use thiserror::Error;
use uuid::Uuid;

use crate::reservation::Room;

// ─── Validation ──────────────────────────────────────────────────────────────

/// A single violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   &'static str,
  pub message: String,
}

/// Every field constraint a form violated, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error(
  "invalid reservation: {}",
  .fields.iter().map(|f| f.field).collect::<Vec<_>>().join(", ")
)]
pub struct ValidationErrors {
  pub fields: Vec<FieldError>,
}

impl ValidationErrors {
  pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
    self.fields.push(FieldError { field, message: message.into() });
  }

  pub fn is_empty(&self) -> bool { self.fields.is_empty() }

  /// The message for `field`, if it failed.
  pub fn get(&self, field: &str) -> Option<&str> {
    self
      .fields
      .iter()
      .find(|f| f.field == field)
      .map(|f| f.message.as_str())
  }

  /// `Ok(())` when nothing was pushed.
  pub fn into_result(self) -> Result<(), Self> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }
}

// ─── Repository ──────────────────────────────────────────────────────────────

/// The coarse failure classes a storage backend can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RepositoryErrorKind {
  PermissionDenied,
  Unavailable,
  Network,
  NotFound,
  Unknown,
}

impl RepositoryErrorKind {
  /// Human-readable message shown to the person using the app.
  pub fn user_message(self) -> &'static str {
    match self {
      Self::PermissionDenied => {
        "Database access denied. Please check security rules."
      }
      Self::Unavailable => {
        "Database is temporarily unavailable. Please try again."
      }
      Self::Network => "Network error. Please check your internet connection.",
      Self::NotFound => "Reservation not found.",
      Self::Unknown => "Operation failed. Please try again.",
    }
  }
}

/// Implemented by store error types so the service can map backend failures
/// onto [`RepositoryErrorKind`] without knowing the backend.
pub trait ClassifyError {
  fn kind(&self) -> RepositoryErrorKind;
}

// ─── Service ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationErrors),

  #[error("time conflict in {room} with reservation {existing}")]
  Conflict { room: Room, existing: Uuid },

  #[error("reservation not found: {0}")]
  NotFound(Uuid),

  #[error("{kind} store error: {source}")]
  Repository {
    kind:   RepositoryErrorKind,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl Error {
  pub fn repository<E>(err: E) -> Self
  where
    E: ClassifyError + std::error::Error + Send + Sync + 'static,
  {
    Self::Repository { kind: err.kind(), source: Box::new(err) }
  }

  /// The message a UI should show for this failure.
  pub fn user_message(&self) -> String {
    match self {
      Self::Validation(errors) => errors
        .fields
        .first()
        .map(|f| f.message.clone())
        .unwrap_or_else(|| "Invalid reservation.".to_owned()),
      Self::Conflict { .. } => {
        "Time conflict detected. Please choose a different time.".to_owned()
      }
      Self::NotFound(_) => RepositoryErrorKind::NotFound.user_message().into(),
      Self::Repository { kind, .. } => kind.user_message().to_owned(),
    }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::NotFound(_)
        | Self::Repository { kind: RepositoryErrorKind::NotFound, .. }
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
