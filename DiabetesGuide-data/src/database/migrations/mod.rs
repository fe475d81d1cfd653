// Database migrations
// Only SQLite is supported; the schema is created idempotently on pool start-up.

mod sqlite;
pub use sqlite::run_migrations as run_sqlite_migrations;
