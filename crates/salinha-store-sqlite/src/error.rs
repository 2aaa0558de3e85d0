//! Error type for `salinha-store-sqlite`.

use rusqlite::ErrorCode;
use salinha_core::error::{ClassifyError, RepositoryErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown room in row: {0:?}")]
  UnknownRoom(String),

  #[error("reservation not found: {0}")]
  NotFound(uuid::Uuid),
}

impl ClassifyError for Error {
  fn kind(&self) -> RepositoryErrorKind {
    match self {
      Error::NotFound(_) => RepositoryErrorKind::NotFound,
      Error::Database(tokio_rusqlite::Error::ConnectionClosed) => {
        RepositoryErrorKind::Unavailable
      }
      Error::Database(tokio_rusqlite::Error::Rusqlite(e)) => classify_sqlite(e),
      _ => RepositoryErrorKind::Unknown,
    }
  }
}

fn classify_sqlite(e: &rusqlite::Error) -> RepositoryErrorKind {
  let rusqlite::Error::SqliteFailure(failure, _) = e else {
    return RepositoryErrorKind::Unknown;
  };
  match failure.code {
    ErrorCode::PermissionDenied
    | ErrorCode::ReadOnly
    | ErrorCode::AuthorizationForStatementDenied => {
      RepositoryErrorKind::PermissionDenied
    }
    ErrorCode::DatabaseBusy
    | ErrorCode::DatabaseLocked
    | ErrorCode::CannotOpen
    | ErrorCode::SystemIoFailure
    | ErrorCode::FileLockingProtocolFailed => RepositoryErrorKind::Unavailable,
    _ => RepositoryErrorKind::Unknown,
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
