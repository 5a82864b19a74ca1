//! Error types for `cata-core`.

use thiserror::Error;

use crate::form::RequiredField;

#[derive(Debug, Error)]
pub enum Error {
  #[error("name must not be empty")]
  EmptyName,

  #[error("no taster is logged in")]
  NotLoggedIn,

  #[error("missing required field: {0}")]
  MissingField(RequiredField),

  #[error("not a number: {0:?}")]
  InvalidNumber(String),

  #[error("score {0} is outside 1-5")]
  ScoreOutOfRange(i64),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
