use barrel::{types, Migration};

// user table, added to the application's initial migration.
pub fn initialdb(m: &mut Migration) {
  m.create_table("user", |t| {
    t.add_column("id", types::text().primary(true).nullable(false));
    t.add_column("name", types::text().nullable(false).unique(true));
    t.add_column("hashwd", types::text().nullable(false));
    t.add_column("salt", types::text().nullable(false));
    t.add_column("createdate", types::integer().nullable(false));
  });
}
