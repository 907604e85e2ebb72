use serde_derive::{Deserialize, Serialize};

// stored user record.  hashwd and salt never leave the server.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
  pub id: String,
  pub name: String,
  pub hashwd: String,
  pub salt: String,
  pub createdate: i64,
}

// what the outside world gets to see of a user.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PublicUser {
  pub id: String,
  pub username: String,
}

impl From<&User> for PublicUser {
  fn from(user: &User) -> Self {
    PublicUser {
      id: user.id.clone(),
      username: user.name.clone(),
    }
  }
}

// missing fields deserialize as empty, so they fail validation rather than parsing.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RegistrationData {
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub password: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Login {
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub password: String,
}
