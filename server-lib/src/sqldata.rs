use crate::error as zkerr;
use crate::migrations as zkm;
use barrel::backend::Sqlite;
use log::info;
use rusqlite::{params, Connection};
use serde_derive::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use trackauth::data::PublicUser;
use trackprotocol::content::{Note, Problem};

pub fn connection_open(dbfile: &Path) -> Result<Connection, zkerr::Error> {
  let conn = Connection::open(dbfile)?;
  conn.execute("PRAGMA foreign_keys = true;", params![])?;

  // full syncs hold a write lock; wait for them rather than failing.
  conn.busy_handler(Some(|count| {
    info!("busy_handler: {}", count);
    let d = Duration::from_millis(50);
    std::thread::sleep(d);
    count < 200
  }))?;

  Ok(conn)
}

pub fn get_single_value(conn: &Connection, name: &str) -> Result<Option<String>, zkerr::Error> {
  match conn.query_row(
    "select value from singlevalue where name = ?1",
    params![name],
    |row| Ok(row.get(0)?),
  ) {
    Ok(v) => Ok(Some(v)),
    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
    Err(x) => Err(x.into()),
  }
}

pub fn set_single_value(conn: &Connection, name: &str, value: &str) -> Result<(), zkerr::Error> {
  conn.execute(
    "insert into singlevalue (name, value) values (?1, ?2)
        on conflict (name) do update set value = ?2 where name = ?1",
    params![name, value],
  )?;
  Ok(())
}

pub fn dbinit(dbfile: &Path) -> Result<(), zkerr::Error> {
  // sqlite treats a zero length file as an empty db.
  let fresh = !dbfile.exists() || std::fs::metadata(dbfile)?.len() == 0;

  let conn = connection_open(dbfile)?;

  if fresh {
    info!("initialdb");
    conn.execute_batch(zkm::initialdb().make::<Sqlite>().as_str())?;
    set_single_value(&conn, "migration_level", "1")?;
  }

  let nlevel = match get_single_value(&conn, "migration_level")? {
    None => 0,
    Some(level) => match level.parse::<i32>() {
      Ok(l) => l,
      Err(e) => return Err(format!("bad migration_level '{}': {}", level, e).into()),
    },
  };

  if nlevel < 1 {
    return Err(
      format!(
        "no migration_level in existing db '{}'",
        dbfile.display()
      )
      .into(),
    );
  }

  info!("db migration level: {}", nlevel);

  Ok(())
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TrackDatabase {
  pub users: Vec<PublicUser>,
  pub problems: Vec<Problem>,
  pub notes: Vec<Note>,
}

pub fn export_db(conn: &Connection) -> Result<TrackDatabase, zkerr::Error> {
  use crate::collection::Collection;

  Ok(TrackDatabase {
    users: trackauth::dbfun::read_users(conn)?,
    problems: Problem::read_all(conn)?,
    notes: Note::read_all(conn)?,
  })
}
