//! The record store: a PostgreSQL pool manager and the backend for the `emails` table.

mod emails;

pub use emails::{EmailBmc, EmailRecord};

use sqlx::{postgres::PgPoolOptions, Connection, PgConnection, PgPool};
use tracing::info;

use crate::config::DbConfig;

#[derive(Clone, Debug)]
pub struct DbManager {
    db: PgPool,
}

impl DbManager {
    /// Creates the pool without opening a connection.
    /// The first store call (or `migrate`) connects, so the app can come up while the database
    /// is down and report it on `/test-connect`.
    pub fn new(db_config: &DbConfig) -> Self {
        info!("{:<20} - Initializing the DB pool", "init_db");

        let db_pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(db_config.acquire_timeout())
            .connect_lazy_with(db_config.connection_options());

        Self { db: db_pool }
    }

    /// Runs the migrations embedded from `./migrations`.
    pub async fn migrate(&self) -> Result<()> {
        info!("{:<20} - Running DB migrations", "migrate_db");
        sqlx::migrate!("./migrations").run(&self.db).await?;
        Ok(())
    }

    /// Checks that a connection can be acquired and used.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    /// Creates the database named in `db_config` on the server and migrates it.
    /// Used to give every integration test its own database.
    pub async fn configure_for_test(db_config: &DbConfig) -> Result<Self> {
        let mut connection =
            PgConnection::connect_with(&db_config.connection_options_without_db()).await?;

        let sql = format!(r#"CREATE DATABASE "{}";"#, db_config.db_name);
        sqlx::query(&sql).execute(&mut connection).await?;

        let dm = Self::new(db_config);
        dm.migrate().await?;

        Ok(dm)
    }

    pub fn db(&self) -> &PgPool {
        &self.db
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no email record with id: {id}")]
    EmailNotFound { id: i64 },
    #[error("email is already registered: {email}")]
    EmailTaken { email: String },
    #[error("database is unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("sqlx error: {0}")]
    Sqlx(#[source] sqlx::Error),
    #[error("sqlx migration error: {0}")]
    SqlxMigrate(#[from] sqlx::migrate::MigrateError),
}

impl Error {
    /// Maps a unique constraint violation to `EmailTaken`, everything else goes through `From`.
    fn from_write(error: sqlx::Error, email: &str) -> Self {
        match &error {
            sqlx::Error::Database(db_er) if db_er.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Error::EmailTaken {
                    email: email.to_string(),
                }
            }
            _ => error.into(),
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(error: sqlx::Error) -> Self {
        if is_unavailable(&error) {
            Error::Unavailable(error)
        } else {
            Error::Sqlx(error)
        }
    }
}

/// Errors that mean the store can't be reached (or gave up on us) rather than a broken query.
fn is_unavailable(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db_er) => db_er.code().is_some_and(|code| {
            // 08: connection exception, 53300: too many connections,
            // 57014: statement timeout, 57P01..57P03: server shutting down
            code.starts_with("08")
                || matches!(&*code, "53300" | "57014" | "57P01" | "57P02" | "57P03")
        }),
        _ => false,
    }
}
