use rusqlite;
use std::fmt;

pub const MISSING_CREDENTIALS: &str = "Username and password are required";
pub const USERNAME_TAKEN: &str = "Username already exists";
pub const INVALID_LOGIN: &str = "Invalid username or password";

pub enum Error {
  Rusqlite(rusqlite::Error),
  SystemTimeError(std::time::SystemTimeError),
  String(String),
  Validation(String),
  Conflict(String),
  // no distinction between unknown user and bad password.
  InvalidLogin,
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Error::Rusqlite(e) => Some(e),
      Error::SystemTimeError(e) => Some(e),
      _ => None,
    }
  }
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self {
      Error::Rusqlite(rue) => write!(f, "{}", rue),
      Error::SystemTimeError(e) => write!(f, "{}", e),
      Error::String(e) => write!(f, "{}", e),
      Error::Validation(e) => write!(f, "{}", e),
      Error::Conflict(e) => write!(f, "{}", e),
      Error::InvalidLogin => write!(f, "{}", INVALID_LOGIN),
    }
  }
}

impl fmt::Debug for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self {
      Error::Rusqlite(rue) => write!(f, "Rusqlite({:?})", rue),
      Error::SystemTimeError(e) => write!(f, "SystemTimeError({:?})", e),
      Error::String(e) => write!(f, "String({})", e),
      Error::Validation(e) => write!(f, "Validation({})", e),
      Error::Conflict(e) => write!(f, "Conflict({})", e),
      Error::InvalidLogin => write!(f, "InvalidLogin"),
    }
  }
}

impl From<rusqlite::Error> for Error {
  fn from(error: rusqlite::Error) -> Self {
    Error::Rusqlite(error)
  }
}

impl From<std::time::SystemTimeError> for Error {
  fn from(error: std::time::SystemTimeError) -> Self {
    Error::SystemTimeError(error)
  }
}

impl From<std::num::TryFromIntError> for Error {
  fn from(error: std::num::TryFromIntError) -> Self {
    Error::String(error.to_string())
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
