use crate::error::Error;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::convert::TryInto;
use std::time::SystemTime;

pub fn salt_string() -> String {
  get_rand_string(10)
}

pub fn get_rand_string(len: usize) -> String {
  rand::thread_rng()
    .sample_iter(&Alphanumeric)
    .take(len)
    .map(char::from)
    .collect()
}

pub fn hash_password(pwd: &str, salt: &str) -> String {
  sha256::digest(format!("{}{}", pwd, salt).as_str())
}

pub fn verify_password(pwd: &str, salt: &str, hashwd: &str) -> bool {
  hash_password(pwd, salt) == hashwd
}

pub fn now() -> Result<i64, Error> {
  let nowsecs = SystemTime::now()
    .duration_since(SystemTime::UNIX_EPOCH)
    .map(|n| n.as_secs())?;
  let s: i64 = nowsecs.try_into()?;
  Ok(s * 1000)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_salted_hash() {
    let salt1 = salt_string();
    let salt2 = salt_string();
    assert_eq!(salt1.len(), 10);
    assert_ne!(salt1, salt2);

    let h1 = hash_password("pw1", salt1.as_str());
    assert_ne!(h1, "pw1");
    assert!(verify_password("pw1", salt1.as_str(), h1.as_str()));
    assert!(!verify_password("pw2", salt1.as_str(), h1.as_str()));

    // same password, different salt, different hash.
    assert_ne!(h1, hash_password("pw1", salt2.as_str()));
  }
}
