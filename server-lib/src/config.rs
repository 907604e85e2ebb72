use crate::error as zkerr;
use serde_derive::{Deserialize, Serialize};
use simple_error::SimpleError;
use std::env;
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
  pub ip: String,
  pub port: u16,
  pub db: PathBuf,
  // cors origins: the frontend site, plus any alternates.
  pub mainsite: String,
  pub altmainsite: Vec<String>,
}

// DATABASE_URL, when set, overrides the configured db file.
pub fn apply_env(config: &mut Config) -> Result<(), zkerr::Error> {
  match env::var("DATABASE_URL") {
    Ok(url) => {
      config.db = db_path_from_url(url.as_str())?;
      Ok(())
    }
    Err(_) => Ok(()),
  }
}

// accepts sqlite urls in the sqlite:///relative.db or sqlite:////abs/path.db
// form, or a bare file path.
pub fn db_path_from_url(url: &str) -> Result<PathBuf, zkerr::Error> {
  if let Some(path) = url.strip_prefix("sqlite:///") {
    if path.is_empty() {
      Err(SimpleError::new(format!("no file in database url: '{}'", url)).into())
    } else {
      Ok(PathBuf::from(path))
    }
  } else if url.contains("://") {
    Err(
      SimpleError::new(format!(
        "unsupported database url: '{}'; only sqlite is supported",
        url
      ))
      .into(),
    )
  } else {
    Ok(PathBuf::from(url))
  }
}
