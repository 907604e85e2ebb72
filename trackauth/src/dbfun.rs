use crate::data::{Login, PublicUser, RegistrationData, User};
use crate::error::{Error, INVALID_LOGIN, MISSING_CREDENTIALS, USERNAME_TAKEN};
use crate::util::{hash_password, now, salt_string, verify_password};
use log::info;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use uuid::Uuid;

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
  Ok(User {
    id: row.get(0)?,
    name: row.get(1)?,
    hashwd: row.get(2)?,
    salt: row.get(3)?,
    createdate: row.get(4)?,
  })
}

pub fn read_user_by_name(conn: &Connection, name: &str) -> Result<Option<User>, Error> {
  let user = conn
    .query_row(
      "select id, name, hashwd, salt, createdate
        from user where name = ?1",
      params![name],
      user_from_row,
    )
    .optional()?;

  Ok(user)
}

pub fn read_user_by_id(conn: &Connection, id: &str) -> Result<Option<User>, Error> {
  let user = conn
    .query_row(
      "select id, name, hashwd, salt, createdate
        from user where id = ?1",
      params![id],
      user_from_row,
    )
    .optional()?;

  Ok(user)
}

pub fn read_users(conn: &Connection) -> Result<Vec<PublicUser>, Error> {
  let mut pstmt = conn.prepare("select id, name from user order by createdate, name")?;
  let users = pstmt
    .query_map(params![], |row| {
      Ok(PublicUser {
        id: row.get(0)?,
        username: row.get(1)?,
      })
    })?
    .collect::<Result<Vec<PublicUser>, rusqlite::Error>>()?;
  Ok(users)
}

pub fn new_user(conn: &Connection, rd: &RegistrationData) -> Result<User, Error> {
  if rd.username.is_empty() || rd.password.is_empty() {
    return Err(Error::Validation(MISSING_CREDENTIALS.to_string()));
  }

  let tr = conn.unchecked_transaction()?;

  if read_user_by_name(&tr, rd.username.as_str())?.is_some() {
    return Err(Error::Conflict(USERNAME_TAKEN.to_string()));
  }

  let salt = salt_string();
  let user = User {
    id: Uuid::new_v4().to_string(),
    name: rd.username.clone(),
    hashwd: hash_password(rd.password.as_str(), salt.as_str()),
    salt,
    createdate: now()?,
  };

  // a concurrent registration can still beat us to the unique index.
  match tr.execute(
    "insert into user (id, name, hashwd, salt, createdate)
      values (?1, ?2, ?3, ?4, ?5)",
    params![user.id, user.name, user.hashwd, user.salt, user.createdate],
  ) {
    Ok(_) => (),
    Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
      return Err(Error::Conflict(USERNAME_TAKEN.to_string()))
    }
    Err(e) => return Err(e.into()),
  }

  tr.commit()?;

  info!("new user: {} ({})", user.name, user.id);

  Ok(user)
}

pub fn login(conn: &Connection, login: &Login) -> Result<User, Error> {
  if login.username.is_empty() || login.password.is_empty() {
    return Err(Error::Validation(MISSING_CREDENTIALS.to_string()));
  }

  match read_user_by_name(conn, login.username.as_str())? {
    Some(user) => {
      if verify_password(
        login.password.as_str(),
        user.salt.as_str(),
        user.hashwd.as_str(),
      ) {
        info!("logged in, user: {:?}", user.name);
        Ok(user)
      } else {
        // don't distinguish between bad user id and bad pwd!
        info!("login failed: {}", INVALID_LOGIN);
        Err(Error::InvalidLogin)
      }
    }
    None => {
      info!("login failed: {}", INVALID_LOGIN);
      Err(Error::InvalidLogin)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::migrations;
  use barrel::backend::Sqlite;
  use barrel::Migration;

  fn test_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    let mut m = Migration::new();
    migrations::initialdb(&mut m);
    conn.execute_batch(m.make::<Sqlite>().as_str()).unwrap();
    conn
  }

  fn rd(username: &str, password: &str) -> RegistrationData {
    RegistrationData {
      username: username.to_string(),
      password: password.to_string(),
    }
  }

  fn li(username: &str, password: &str) -> Login {
    Login {
      username: username.to_string(),
      password: password.to_string(),
    }
  }

  #[test]
  fn test_register_and_login() {
    let conn = test_conn();

    let alice = new_user(&conn, &rd("alice", "pw1")).unwrap();
    assert_eq!(alice.name, "alice");
    assert_ne!(alice.hashwd, "pw1");

    let loggedin = login(&conn, &li("alice", "pw1")).unwrap();
    assert_eq!(loggedin.id, alice.id);

    let byid = read_user_by_id(&conn, alice.id.as_str()).unwrap().unwrap();
    assert_eq!(byid.name, "alice");
    assert_eq!(read_user_by_id(&conn, "nobody").unwrap(), None);
  }

  #[test]
  fn test_duplicate_username() {
    let conn = test_conn();
    new_user(&conn, &rd("alice", "pw1")).unwrap();

    match new_user(&conn, &rd("alice", "other")) {
      Err(Error::Conflict(msg)) => assert_eq!(msg, USERNAME_TAKEN),
      x => panic!("expected conflict, got {:?}", x),
    }

    // exact match only.
    assert!(new_user(&conn, &rd("Alice", "pw1")).is_ok());
    assert_eq!(read_users(&conn).unwrap().len(), 2);
  }

  #[test]
  fn test_missing_fields() {
    let conn = test_conn();
    match new_user(&conn, &rd("", "pw1")) {
      Err(Error::Validation(msg)) => assert_eq!(msg, MISSING_CREDENTIALS),
      x => panic!("expected validation error, got {:?}", x),
    }
    match login(&conn, &li("alice", "")) {
      Err(Error::Validation(_)) => (),
      x => panic!("expected validation error, got {:?}", x),
    }
  }

  #[test]
  fn test_login_failures_identical() {
    let conn = test_conn();
    new_user(&conn, &rd("alice", "pw1")).unwrap();

    let wrongpwd = login(&conn, &li("alice", "nope")).unwrap_err();
    let nouser = login(&conn, &li("bob", "pw1")).unwrap_err();

    assert!(matches!(wrongpwd, Error::InvalidLogin));
    assert!(matches!(nouser, Error::InvalidLogin));
    assert_eq!(wrongpwd.to_string(), nouser.to_string());
  }
}
