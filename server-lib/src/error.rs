use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use rusqlite;
use serde_json;
use std::fmt;
use trackprotocol::messages::MessageReply;
use trackprotocol::sync_data::PayloadError;

pub const NOT_LOGGED_IN: &str = "Authentication required";
pub const INTERNAL_ERROR: &str = "Internal server error";

pub enum Error {
  Rusqlite(rusqlite::Error),
  String(String),
  SerdeJson(serde_json::Error),
  IoError(std::io::Error),
  Auth(trackauth::error::Error),
  Toml(String),
  Simple(simple_error::SimpleError),
  // no User-Id on the request.
  NotLoggedIn,
  Validation(String),
  Conflict(String),
  NotFound(String),
  // failed sync; already rolled back.  message includes the cause.
  Sync(String),
  Annotated(AnnotatedE),
}

pub struct AnnotatedE {
  pub error: Box<Error>,
  pub source: Box<Error>,
}

pub fn annotate(e: Error, source: Error) -> Error {
  Error::Annotated(AnnotatedE {
    error: Box::new(e),
    source: Box::new(source),
  })
}

pub fn annotate_string(s: String, source: Error) -> Error {
  annotate(Error::String(s), source)
}

impl fmt::Display for AnnotatedE {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} \n source: {}", self.error, self.source)
  }
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    None
  }
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self {
      Error::Rusqlite(rue) => write!(f, "{}", rue),
      Error::String(e) => write!(f, "{}", e),
      Error::SerdeJson(e) => write!(f, "{}", e),
      Error::IoError(e) => write!(f, "{}", e),
      Error::Auth(e) => write!(f, "{}", e),
      Error::Toml(e) => write!(f, "{}", e),
      Error::Simple(e) => write!(f, "{}", e),
      Error::NotLoggedIn => write!(f, "{}", NOT_LOGGED_IN),
      Error::Validation(e) => write!(f, "{}", e),
      Error::Conflict(e) => write!(f, "{}", e),
      Error::NotFound(e) => write!(f, "{}", e),
      Error::Sync(e) => write!(f, "{}", e),
      Error::Annotated(e) => write!(f, "{}", e),
    }
  }
}

impl fmt::Debug for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self {
      Error::Rusqlite(rue) => write!(f, "Rusqlite({:?})", rue),
      Error::String(e) => write!(f, "String({})", e),
      Error::SerdeJson(e) => write!(f, "SerdeJson({:?})", e),
      Error::IoError(e) => write!(f, "IoError({:?})", e),
      Error::Auth(e) => write!(f, "Auth({:?})", e),
      Error::Toml(e) => write!(f, "Toml({})", e),
      Error::Simple(e) => write!(f, "Simple({:?})", e),
      Error::NotLoggedIn => write!(f, "NotLoggedIn"),
      Error::Validation(e) => write!(f, "Validation({})", e),
      Error::Conflict(e) => write!(f, "Conflict({})", e),
      Error::NotFound(e) => write!(f, "NotFound({})", e),
      Error::Sync(e) => write!(f, "Sync({})", e),
      Error::Annotated(e) => write!(f, "Annotated({})", e),
    }
  }
}

impl ResponseError for Error {
  fn status_code(&self) -> StatusCode {
    match self {
      Error::NotLoggedIn => StatusCode::UNAUTHORIZED,
      Error::Validation(_) => StatusCode::BAD_REQUEST,
      Error::Conflict(_) => StatusCode::CONFLICT,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::Auth(trackauth::error::Error::InvalidLogin) => StatusCode::UNAUTHORIZED,
      Error::Auth(trackauth::error::Error::Validation(_)) => StatusCode::BAD_REQUEST,
      Error::Auth(trackauth::error::Error::Conflict(_)) => StatusCode::CONFLICT,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let message = match self {
      Error::Sync(_) => self.to_string(),
      _ if status == StatusCode::INTERNAL_SERVER_ERROR => {
        error!("internal error: {:?}", self);
        INTERNAL_ERROR.to_string()
      }
      _ => self.to_string(),
    };
    HttpResponse::build(status).json(MessageReply { message })
  }
}

impl From<rusqlite::Error> for Error {
  fn from(error: rusqlite::Error) -> Self {
    Error::Rusqlite(error)
  }
}

impl From<String> for Error {
  fn from(s: String) -> Self {
    Error::String(s)
  }
}

impl From<&str> for Error {
  fn from(s: &str) -> Self {
    Error::String(s.to_string())
  }
}

impl From<serde_json::Error> for Error {
  fn from(e: serde_json::Error) -> Self {
    Error::SerdeJson(e)
  }
}

impl From<std::io::Error> for Error {
  fn from(e: std::io::Error) -> Self {
    Error::IoError(e)
  }
}

impl From<trackauth::error::Error> for Error {
  fn from(e: trackauth::error::Error) -> Self {
    Error::Auth(e)
  }
}

impl From<toml::de::Error> for Error {
  fn from(e: toml::de::Error) -> Self {
    Error::Toml(e.to_string())
  }
}

impl From<toml::ser::Error> for Error {
  fn from(e: toml::ser::Error) -> Self {
    Error::Toml(e.to_string())
  }
}

impl From<simple_error::SimpleError> for Error {
  fn from(e: simple_error::SimpleError) -> Self {
    Error::Simple(e)
  }
}

impl From<PayloadError> for Error {
  fn from(e: PayloadError) -> Self {
    Error::Validation(e.to_string())
  }
}
