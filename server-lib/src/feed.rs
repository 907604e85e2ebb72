use crate::collection::Collection;
use crate::error as zkerr;
use log::warn;
use rusqlite::Connection;
use trackprotocol::content::{Problem, ProblemWithAuthor};

pub const UNKNOWN_USER: &str = "Unknown User";

// every problem from every user.  is_public is not consulted.
pub fn list_public_feed(conn: &Connection) -> Result<Vec<ProblemWithAuthor>, zkerr::Error> {
  let problems = Problem::read_all(conn)?;

  Ok(
    problems
      .into_iter()
      .map(|problem| {
        let username = match trackauth::dbfun::read_user_by_id(conn, problem.user_id.as_str()) {
          Ok(Some(user)) => user.name,
          Ok(None) => UNKNOWN_USER.to_string(),
          Err(e) => {
            warn!("author lookup failed for {}: {:?}", problem.user_id, e);
            UNKNOWN_USER.to_string()
          }
        };
        ProblemWithAuthor { problem, username }
      })
      .collect(),
  )
}
