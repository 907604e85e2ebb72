use trackauth::data::PublicUser;

// every reply without a more specific shape, errors included.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageReply {
  pub message: String,
}

impl MessageReply {
  pub fn new(message: &str) -> Self {
    MessageReply {
      message: message.to_string(),
    }
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RegisterReply {
  pub message: String,
  pub user: PublicUser,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginReply {
  pub message: String,
  pub user_id: String,
  pub username: String,
}
