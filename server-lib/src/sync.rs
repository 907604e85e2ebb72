//! Reconciling a client's items with the stored collection of one owner.
//!
//! Two request shapes reach `sync_or_upsert`:
//!
//! - a list is the owner's complete collection.  Everything the owner has is
//!   deleted and the list is inserted, in one transaction.  Items not in the
//!   list are gone.
//! - a single object is an upsert.  An item the owner already has under that
//!   id gets a partial update; anything else creates a new item owned by the
//!   caller.
//!
//! Writes run in IMMEDIATE transactions, so two full syncs against the same
//! database take turns instead of interleaving their deletes and inserts.

use crate::collection::Collection;
use crate::error as zkerr;
use crate::guard::AuthContext;
use log::{error, info};
use rusqlite::{Connection, TransactionBehavior};
use trackprotocol::sync_data::SyncPayload;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum SyncResult<T> {
  // full replace; count of items inserted.
  Replaced(usize),
  Updated(T),
  Created(T),
}

pub fn new_id() -> String {
  Uuid::new_v4().to_string()
}

pub fn list<T: Collection>(conn: &Connection, ac: &AuthContext) -> Result<Vec<T>, zkerr::Error> {
  T::read_by_owner(conn, ac.user_id.as_str())
}

pub fn sync_or_upsert<T: Collection>(
  conn: &mut Connection,
  ac: &AuthContext,
  payload: &SyncPayload<T::Data>,
) -> Result<SyncResult<T>, zkerr::Error> {
  let res = match payload {
    SyncPayload::List(items) => replace_all::<T>(conn, ac, items).map(SyncResult::Replaced),
    SyncPayload::Single(data) => upsert::<T>(conn, ac, data),
  };

  // any transaction still open was dropped, and so rolled back.
  res.map_err(|e| {
    error!("{} sync failed for {}: {:?}", T::LABEL, ac.user_id, e);
    zkerr::Error::Sync(format!("Error syncing {}: {}", T::PLURAL, e))
  })
}

fn replace_all<T: Collection>(
  conn: &mut Connection,
  ac: &AuthContext,
  items: &[T::Data],
) -> Result<usize, zkerr::Error> {
  let owner = ac.user_id.as_str();
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let removed = T::delete_by_owner(&tx, owner)?;

  let mut count = 0;
  for data in items {
    // an item claiming some other owner doesn't belong in this sync.
    if T::data_owner(data) != Some(owner) {
      info!("{} sync for {}: skipping item {:?}", T::LABEL, owner, T::data_id(data));
      continue;
    }

    let id = T::data_id(data).map(|id| id.to_string()).unwrap_or_else(new_id);
    let item = T::create(id, owner, data)?;
    T::insert(&tx, &item)?;
    count += 1;
  }

  tx.commit()?;

  info!(
    "{} list synced for {}: {} removed, {} inserted",
    T::LABEL,
    owner,
    removed,
    count
  );

  Ok(count)
}

fn upsert<T: Collection>(
  conn: &mut Connection,
  ac: &AuthContext,
  data: &T::Data,
) -> Result<SyncResult<T>, zkerr::Error> {
  let owner = ac.user_id.as_str();
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let existing = match T::data_id(data) {
    Some(id) => T::read(&tx, id)?,
    None => None,
  };

  let res = match existing {
    Some(mut item) if item.owner() == owner => {
      item.merge(data);
      T::update(&tx, &item)?;
      info!("{} updated: {} for {}", T::LABEL, item.id(), owner);
      SyncResult::Updated(item)
    }
    Some(other) => {
      // the id belongs to someone else.  leave theirs alone, and make ours
      // under a new id.
      info!(
        "{} id {} is taken; creating a new item for {}",
        T::LABEL,
        other.id(),
        owner
      );
      let item = T::create(new_id(), owner, data)?;
      T::insert(&tx, &item)?;
      SyncResult::Created(item)
    }
    None => {
      let id = T::data_id(data).map(|id| id.to_string()).unwrap_or_else(new_id);
      let item = T::create(id, owner, data)?;
      T::insert(&tx, &item)?;
      info!("{} added: {} for {}", T::LABEL, item.id(), owner);
      SyncResult::Created(item)
    }
  };

  tx.commit()?;

  Ok(res)
}

// false when there's no such id for this owner, including when the id is
// someone else's.
pub fn delete_scoped<T: Collection>(
  conn: &Connection,
  ac: &AuthContext,
  id: &str,
) -> Result<bool, zkerr::Error> {
  let deleted = T::delete_scoped(conn, ac.user_id.as_str(), id)? > 0;
  info!(
    "{} delete {} for {}: {}",
    T::LABEL,
    id,
    ac.user_id,
    if deleted { "deleted" } else { "not found" }
  );
  Ok(deleted)
}
