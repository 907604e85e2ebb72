use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

pub const NO_DATA: &str = "No data provided";

// body of a sync request: a complete list replaces the owner's collection, a
// single object upserts one item.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncPayload<D> {
  List(Vec<D>),
  Single(D),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PayloadError {
  Empty,
  Malformed(String),
}

impl fmt::Display for PayloadError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PayloadError::Empty => write!(f, "{}", NO_DATA),
      PayloadError::Malformed(e) => write!(f, "Malformed payload: {}", e),
    }
  }
}

impl<D: DeserializeOwned> SyncPayload<D> {
  pub fn from_slice(body: &[u8]) -> Result<SyncPayload<D>, PayloadError> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
      return Err(PayloadError::Empty);
    }
    let value: Value =
      serde_json::from_slice(body).map_err(|e| PayloadError::Malformed(e.to_string()))?;
    SyncPayload::from_value(value)
  }

  // null, {} and [] all count as no data.
  pub fn from_value(value: Value) -> Result<SyncPayload<D>, PayloadError> {
    match value {
      Value::Null => Err(PayloadError::Empty),
      Value::Array(ref items) if items.is_empty() => Err(PayloadError::Empty),
      Value::Object(ref fields) if fields.is_empty() => Err(PayloadError::Empty),
      Value::Array(_) => serde_json::from_value(value)
        .map(SyncPayload::List)
        .map_err(|e| PayloadError::Malformed(e.to_string())),
      Value::Object(_) => serde_json::from_value(value)
        .map(SyncPayload::Single)
        .map_err(|e| PayloadError::Malformed(e.to_string())),
      _ => Err(PayloadError::Malformed(
        "expected a json object or array".to_string(),
      )),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::content::NoteData;
  use serde_json::json;

  #[test]
  fn test_payload_forms() {
    match SyncPayload::<NoteData>::from_value(json!([{"title": "a"}, {"title": "b"}])) {
      Ok(SyncPayload::List(v)) => assert_eq!(v.len(), 2),
      x => panic!("expected list, got {:?}", x),
    }
    match SyncPayload::<NoteData>::from_value(json!({"title": "a"})) {
      Ok(SyncPayload::Single(n)) => assert_eq!(n.title, Some("a".to_string())),
      x => panic!("expected single, got {:?}", x),
    }
  }

  #[test]
  fn test_empty_payloads() {
    for v in vec![json!(null), json!([]), json!({})] {
      assert_eq!(
        SyncPayload::<NoteData>::from_value(v),
        Err(PayloadError::Empty)
      );
    }
    assert_eq!(
      SyncPayload::<NoteData>::from_slice(b"  "),
      Err(PayloadError::Empty)
    );
  }

  #[test]
  fn test_malformed_payloads() {
    assert!(matches!(
      SyncPayload::<NoteData>::from_value(json!(42)),
      Err(PayloadError::Malformed(_))
    ));
    assert!(matches!(
      SyncPayload::<NoteData>::from_slice(b"{not json"),
      Err(PayloadError::Malformed(_))
    ));
    assert!(matches!(
      SyncPayload::<NoteData>::from_value(json!([{"title": "a"}, 7])),
      Err(PayloadError::Malformed(_))
    ));
  }
}
