#![allow(dead_code)]

use advisory_crm::db::{DbPool, establish_connection_pool};
use advisory_crm::domain::client::NewClient;
use advisory_crm::domain::team_member::NewTeamMember;
use chrono::NaiveDateTime;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Migrated SQLite database living in a temporary directory.
///
/// The directory and every file SQLite creates inside it are removed when the
/// value is dropped.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("create pool");
        let mut conn = pool.get().expect("get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");
        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

pub fn at(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").expect("timestamp")
}

pub fn lead(name: &str, email: &str) -> NewClient {
    NewClient::try_lead(name, email).expect("valid lead")
}

pub fn advisor(name: &str, email: &str) -> NewTeamMember {
    NewTeamMember::advisor(name.try_into().expect("name"), email.try_into().expect("email"))
}
