//! Per-entity storage for the synced collections.
//!
//! A `Collection` ties a record type to its table: the row mapping, how a
//! record is built from incoming json, and how a partial update is applied.
//! The sync engine only talks to collections through this trait.

use crate::error as zkerr;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use trackprotocol::content::{Note, NoteData, Problem, ProblemData};

pub trait Collection: Sized + Serialize + Clone + Debug {
  type Data: DeserializeOwned + Debug;

  const TABLE: &'static str;
  // select list, matching from_row.
  const COLUMNS: &'static str;
  // "Problem", for messages.
  const LABEL: &'static str;
  // "problems", for messages.
  const PLURAL: &'static str;
  // key of the entity in upsert replies.
  const ENTITY_KEY: &'static str;

  fn from_row(row: &Row) -> rusqlite::Result<Self>;

  fn id(&self) -> &str;
  fn owner(&self) -> &str;

  fn data_id(data: &Self::Data) -> Option<&str>;
  fn data_owner(data: &Self::Data) -> Option<&str>;

  // new record from json.  fails if a required field is missing.
  fn create(id: String, owner: &str, data: &Self::Data) -> Result<Self, zkerr::Error>;

  // overwrite each field present in data.  id and owner never change.
  fn merge(&mut self, data: &Self::Data);

  fn insert(conn: &Connection, item: &Self) -> Result<(), zkerr::Error>;
  fn update(conn: &Connection, item: &Self) -> Result<(), zkerr::Error>;

  fn read(conn: &Connection, id: &str) -> Result<Option<Self>, zkerr::Error> {
    Ok(
      conn
        .query_row(
          format!("select {} from {} where id = ?1", Self::COLUMNS, Self::TABLE).as_str(),
          params![id],
          Self::from_row,
        )
        .optional()?,
    )
  }

  fn read_by_owner(conn: &Connection, owner: &str) -> Result<Vec<Self>, zkerr::Error> {
    let mut pstmt = conn.prepare(
      format!(
        "select {} from {} where user = ?1 order by rowid",
        Self::COLUMNS,
        Self::TABLE
      )
      .as_str(),
    )?;
    let items = pstmt
      .query_map(params![owner], Self::from_row)?
      .collect::<Result<Vec<Self>, rusqlite::Error>>()?;
    Ok(items)
  }

  fn read_all(conn: &Connection) -> Result<Vec<Self>, zkerr::Error> {
    let mut pstmt = conn.prepare(
      format!("select {} from {} order by rowid", Self::COLUMNS, Self::TABLE).as_str(),
    )?;
    let items = pstmt
      .query_map(params![], Self::from_row)?
      .collect::<Result<Vec<Self>, rusqlite::Error>>()?;
    Ok(items)
  }

  fn delete_by_owner(conn: &Connection, owner: &str) -> Result<usize, zkerr::Error> {
    Ok(conn.execute(
      format!("delete from {} where user = ?1", Self::TABLE).as_str(),
      params![owner],
    )?)
  }

  fn delete_scoped(conn: &Connection, owner: &str, id: &str) -> Result<usize, zkerr::Error> {
    Ok(conn.execute(
      format!("delete from {} where id = ?1 and user = ?2", Self::TABLE).as_str(),
      params![id, owner],
    )?)
  }
}

fn required(field: &Option<String>, name: &str) -> Result<String, zkerr::Error> {
  match field {
    Some(v) => Ok(v.clone()),
    None => Err(zkerr::Error::String(format!("missing required field: {}", name))),
  }
}

fn merge_field<T: Clone>(target: &mut T, field: &Option<T>) {
  if let Some(v) = field {
    *target = v.clone();
  }
}

// an optional column only gets overwritten by a non-null value.
fn merge_opt<T: Clone>(target: &mut Option<T>, field: &Option<T>) {
  if let Some(v) = field {
    *target = Some(v.clone());
  }
}

impl Collection for Problem {
  type Data = ProblemData;

  const TABLE: &'static str = "problem";
  const COLUMNS: &'static str = "id, name, link, topic, difficulty, time_complexity, \
    space_complexity, notes, solved, important, solution_code, added_date, user, is_public";
  const LABEL: &'static str = "Problem";
  const PLURAL: &'static str = "problems";
  const ENTITY_KEY: &'static str = "problem";

  fn from_row(row: &Row) -> rusqlite::Result<Self> {
    Ok(Problem {
      id: row.get(0)?,
      name: row.get(1)?,
      link: row.get(2)?,
      topic: row.get(3)?,
      difficulty: row.get(4)?,
      time_complexity: row.get(5)?,
      space_complexity: row.get(6)?,
      notes: row.get(7)?,
      solved: row.get(8)?,
      important: row.get(9)?,
      solution_code: row.get(10)?,
      added_date: row.get(11)?,
      user_id: row.get(12)?,
      is_public: row.get(13)?,
    })
  }

  fn id(&self) -> &str {
    self.id.as_str()
  }

  fn owner(&self) -> &str {
    self.user_id.as_str()
  }

  fn data_id(data: &ProblemData) -> Option<&str> {
    data.id.as_deref().filter(|id| !id.is_empty())
  }

  fn data_owner(data: &ProblemData) -> Option<&str> {
    data.user_id.as_deref()
  }

  fn create(id: String, owner: &str, data: &ProblemData) -> Result<Self, zkerr::Error> {
    Ok(Problem {
      id,
      name: required(&data.name, "name")?,
      link: data.link.clone(),
      topic: required(&data.topic, "topic")?,
      difficulty: required(&data.difficulty, "difficulty")?,
      time_complexity: data.time_complexity.clone(),
      space_complexity: data.space_complexity.clone(),
      notes: data.notes.clone(),
      solved: data.solved.unwrap_or(false),
      important: data.important.unwrap_or(false),
      solution_code: data.solution_code.clone(),
      added_date: required(&data.added_date, "addedDate")?,
      user_id: owner.to_string(),
      is_public: data.is_public.unwrap_or(false),
    })
  }

  fn merge(&mut self, data: &ProblemData) {
    merge_field(&mut self.name, &data.name);
    merge_opt(&mut self.link, &data.link);
    merge_field(&mut self.topic, &data.topic);
    merge_field(&mut self.difficulty, &data.difficulty);
    merge_opt(&mut self.time_complexity, &data.time_complexity);
    merge_opt(&mut self.space_complexity, &data.space_complexity);
    merge_opt(&mut self.notes, &data.notes);
    merge_field(&mut self.solved, &data.solved);
    merge_field(&mut self.important, &data.important);
    merge_opt(&mut self.solution_code, &data.solution_code);
    merge_field(&mut self.added_date, &data.added_date);
    merge_field(&mut self.is_public, &data.is_public);
  }

  fn insert(conn: &Connection, p: &Problem) -> Result<(), zkerr::Error> {
    conn.execute(
      "insert into problem (id, name, link, topic, difficulty, time_complexity,
         space_complexity, notes, solved, important, solution_code, added_date, user, is_public)
       values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
      params![
        p.id,
        p.name,
        p.link,
        p.topic,
        p.difficulty,
        p.time_complexity,
        p.space_complexity,
        p.notes,
        p.solved,
        p.important,
        p.solution_code,
        p.added_date,
        p.user_id,
        p.is_public
      ],
    )?;
    Ok(())
  }

  fn update(conn: &Connection, p: &Problem) -> Result<(), zkerr::Error> {
    conn.execute(
      "update problem set name = ?1, link = ?2, topic = ?3, difficulty = ?4,
         time_complexity = ?5, space_complexity = ?6, notes = ?7, solved = ?8,
         important = ?9, solution_code = ?10, added_date = ?11, is_public = ?12
       where id = ?13 and user = ?14",
      params![
        p.name,
        p.link,
        p.topic,
        p.difficulty,
        p.time_complexity,
        p.space_complexity,
        p.notes,
        p.solved,
        p.important,
        p.solution_code,
        p.added_date,
        p.is_public,
        p.id,
        p.user_id
      ],
    )?;
    Ok(())
  }
}

impl Collection for Note {
  type Data = NoteData;

  const TABLE: &'static str = "note";
  const COLUMNS: &'static str = "id, title, topic, link, remarks, added_date, user";
  const LABEL: &'static str = "Note";
  const PLURAL: &'static str = "notes";
  const ENTITY_KEY: &'static str = "note";

  fn from_row(row: &Row) -> rusqlite::Result<Self> {
    Ok(Note {
      id: row.get(0)?,
      title: row.get(1)?,
      topic: row.get(2)?,
      link: row.get(3)?,
      remarks: row.get(4)?,
      added_date: row.get(5)?,
      user_id: row.get(6)?,
    })
  }

  fn id(&self) -> &str {
    self.id.as_str()
  }

  fn owner(&self) -> &str {
    self.user_id.as_str()
  }

  fn data_id(data: &NoteData) -> Option<&str> {
    data.id.as_deref().filter(|id| !id.is_empty())
  }

  fn data_owner(data: &NoteData) -> Option<&str> {
    data.user_id.as_deref()
  }

  fn create(id: String, owner: &str, data: &NoteData) -> Result<Self, zkerr::Error> {
    Ok(Note {
      id,
      title: required(&data.title, "title")?,
      topic: required(&data.topic, "topic")?,
      link: data.link.clone(),
      remarks: data.remarks.clone(),
      added_date: required(&data.added_date, "addedDate")?,
      user_id: owner.to_string(),
    })
  }

  fn merge(&mut self, data: &NoteData) {
    merge_field(&mut self.title, &data.title);
    merge_field(&mut self.topic, &data.topic);
    merge_opt(&mut self.link, &data.link);
    merge_opt(&mut self.remarks, &data.remarks);
    merge_field(&mut self.added_date, &data.added_date);
  }

  fn insert(conn: &Connection, n: &Note) -> Result<(), zkerr::Error> {
    conn.execute(
      "insert into note (id, title, topic, link, remarks, added_date, user)
       values (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
      params![n.id, n.title, n.topic, n.link, n.remarks, n.added_date, n.user_id],
    )?;
    Ok(())
  }

  fn update(conn: &Connection, n: &Note) -> Result<(), zkerr::Error> {
    conn.execute(
      "update note set title = ?1, topic = ?2, link = ?3, remarks = ?4, added_date = ?5
       where id = ?6 and user = ?7",
      params![n.title, n.topic, n.link, n.remarks, n.added_date, n.id, n.user_id],
    )?;
    Ok(())
  }
}
