// a coding-practice item, as stored and as returned to its owner.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
  pub id: String,
  pub name: String,
  pub link: Option<String>,
  pub topic: String,
  pub difficulty: String,
  pub time_complexity: Option<String>,
  pub space_complexity: Option<String>,
  pub notes: Option<String>,
  pub solved: bool,
  pub important: bool,
  pub solution_code: Option<String>,
  pub added_date: String,
  pub user_id: String,
  pub is_public: bool,
}

// incoming Problem json.  every field may be missing or null; which ones are
// required depends on whether this creates or updates.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProblemData {
  pub id: Option<String>,
  pub name: Option<String>,
  pub link: Option<String>,
  pub topic: Option<String>,
  pub difficulty: Option<String>,
  pub time_complexity: Option<String>,
  pub space_complexity: Option<String>,
  pub notes: Option<String>,
  pub solved: Option<bool>,
  pub important: Option<bool>,
  pub solution_code: Option<String>,
  pub added_date: Option<String>,
  pub user_id: Option<String>,
  pub is_public: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
  pub id: String,
  pub title: String,
  pub topic: String,
  pub link: Option<String>,
  pub remarks: Option<String>,
  pub added_date: String,
  pub user_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NoteData {
  pub id: Option<String>,
  pub title: Option<String>,
  pub topic: Option<String>,
  pub link: Option<String>,
  pub remarks: Option<String>,
  pub added_date: Option<String>,
  pub user_id: Option<String>,
}

// public feed entry: the problem plus its author's name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProblemWithAuthor {
  #[serde(flatten)]
  pub problem: Problem,
  pub username: String,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_problem_json_shape() {
    let p = Problem {
      id: "p1".to_string(),
      name: "Two Sum".to_string(),
      link: None,
      topic: "Arrays".to_string(),
      difficulty: "Easy".to_string(),
      time_complexity: Some("O(n)".to_string()),
      space_complexity: None,
      notes: None,
      solved: true,
      important: false,
      solution_code: None,
      added_date: "2024-01-01".to_string(),
      user_id: "u1".to_string(),
      is_public: true,
    };

    let v = serde_json::to_value(ProblemWithAuthor {
      problem: p,
      username: "alice".to_string(),
    })
    .unwrap();

    assert_eq!(v["timeComplexity"], json!("O(n)"));
    assert_eq!(v["spaceComplexity"], json!(null));
    assert_eq!(v["addedDate"], json!("2024-01-01"));
    assert_eq!(v["userId"], json!("u1"));
    assert_eq!(v["isPublic"], json!(true));
    assert_eq!(v["username"], json!("alice"));
  }

  #[test]
  fn test_partial_data() {
    let pd: ProblemData =
      serde_json::from_value(json!({"name": "Two Sum", "solved": null, "solutionCode": "x"}))
        .unwrap();
    assert_eq!(pd.name, Some("Two Sum".to_string()));
    assert_eq!(pd.solved, None);
    assert_eq!(pd.solution_code, Some("x".to_string()));
    assert_eq!(pd.id, None);

    // wrong json type is an error, not a silent None.
    assert!(serde_json::from_value::<NoteData>(json!({"title": 5})).is_err());
  }
}
