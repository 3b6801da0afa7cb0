//! Postgres connection pool and schema bootstrap.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `UniqueViolation(field)` | Username/email already taken (field from constraint name) |
//! | Database (other) | Any other | `Unavailable` | Other database errors |
//! | PoolTimedOut / PoolClosed | N/A | `Unavailable` | Pool exhausted or shut down |
//! | Other | N/A | `Unavailable` | Network errors, connection failures, etc. |

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, instrument};

use quill_auth::{StoreError, UniqueField};

pub const USERNAME_CONSTRAINT: &str = "identities_username_key";
pub const EMAIL_CONSTRAINT: &str = "identities_email_key";

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS identities (
        id BIGSERIAL PRIMARY KEY,
        username TEXT NOT NULL,
        email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        CONSTRAINT identities_username_key UNIQUE (username),
        CONSTRAINT identities_email_key UNIQUE (email)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        owner_id BIGINT NOT NULL REFERENCES identities (id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS posts_owner_id_idx ON posts (owner_id)",
];

/// Open a connection pool. `acquire_timeout` bounds how long a store call
/// waits for a connection.
pub async fn connect(database_url: &str, acquire_timeout: Duration) -> Result<PgPool, StoreError> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))
}

/// Create tables and constraints if they do not exist yet.
#[instrument(skip(pool), err)]
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    }
    info!("database schema ready");
    Ok(())
}

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                return StoreError::UniqueViolation(unique_field(db_err.constraint(), db_err.message()));
            }
            StoreError::Unavailable(format!("database error in {}: {}", operation, db_err.message()))
        }
        sqlx::Error::PoolTimedOut => StoreError::Unavailable(format!("connection pool timed out in {}", operation)),
        sqlx::Error::PoolClosed => StoreError::Unavailable(format!("connection pool closed in {}", operation)),
        _ => StoreError::Unavailable(format!("sqlx error in {}: {}", operation, err)),
    }
}

fn unique_field(constraint: Option<&str>, message: &str) -> UniqueField {
    match constraint {
        Some(USERNAME_CONSTRAINT) => UniqueField::Username,
        Some(EMAIL_CONSTRAINT) => UniqueField::Email,
        _ if message.contains("email") => UniqueField::Email,
        _ => UniqueField::Username,
    }
}
