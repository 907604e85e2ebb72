use barrel::{types, Migration};

pub fn initialdb() -> Migration {
  let mut m = Migration::new();

  // table for storing single values.
  m.create_table("singlevalue", |t| {
    t.add_column("name", types::text().nullable(false).unique(true));
    t.add_column("value", types::text().nullable(false));
  });

  trackauth::migrations::initialdb(&mut m);

  // 'user' is not a foreign key; rows for an owner that doesn't resolve are
  // allowed, and show up as 'Unknown User' in the public feed.
  m.create_table("problem", |t| {
    t.add_column("id", types::text().primary(true).nullable(false));
    t.add_column("name", types::text().nullable(false));
    t.add_column("link", types::text().nullable(true));
    t.add_column("topic", types::text().nullable(false));
    t.add_column("difficulty", types::text().nullable(false));
    t.add_column("time_complexity", types::text().nullable(true));
    t.add_column("space_complexity", types::text().nullable(true));
    t.add_column("notes", types::text().nullable(true));
    t.add_column("solved", types::boolean().nullable(false));
    t.add_column("important", types::boolean().nullable(false));
    t.add_column("solution_code", types::text().nullable(true));
    t.add_column("added_date", types::text().nullable(false));
    t.add_column("user", types::text().nullable(false));
    t.add_column("is_public", types::boolean().nullable(false));
    t.add_index("problemuser", types::index(vec!["user"]));
  });

  m.create_table("note", |t| {
    t.add_column("id", types::text().primary(true).nullable(false));
    t.add_column("title", types::text().nullable(false));
    t.add_column("topic", types::text().nullable(false));
    t.add_column("link", types::text().nullable(true));
    t.add_column("remarks", types::text().nullable(true));
    t.add_column("added_date", types::text().nullable(false));
    t.add_column("user", types::text().nullable(false));
    t.add_index("noteuser", types::index(vec!["user"]));
  });

  m
}
