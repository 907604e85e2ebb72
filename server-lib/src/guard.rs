use crate::error as zkerr;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};

// request header naming the caller.  it is never taken from the json body.
pub const USER_ID_HEADER: &str = "User-Id";

// the owner every collection operation is scoped to.  the id is taken on
// trust; an id with no user behind it just never matches any rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
  pub user_id: String,
}

pub fn extract(req: &HttpRequest) -> Result<AuthContext, zkerr::Error> {
  match req
    .headers()
    .get(USER_ID_HEADER)
    .and_then(|hv| hv.to_str().ok())
  {
    Some(uid) if !uid.is_empty() => Ok(AuthContext {
      user_id: uid.to_string(),
    }),
    _ => Err(zkerr::Error::NotLoggedIn),
  }
}

impl FromRequest for AuthContext {
  type Error = zkerr::Error;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(extract(req))
  }
}
