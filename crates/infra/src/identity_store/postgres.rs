//! Postgres-backed identity store.
//!
//! Uniqueness is enforced by the `identities_username_key` and
//! `identities_email_key` constraints (see [`crate::db::ensure_schema`]); a
//! violation surfaces as `StoreError::UniqueViolation` naming the column.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use quill_auth::{Identity, IdentityStore, NewIdentity, StoreError};
use quill_core::IdentityId;

use crate::db::map_sqlx_error;

#[derive(Debug, Clone)]
pub struct PostgresIdentityStore {
    pool: PgPool,
}

impl PostgresIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

struct IdentityRow(Identity);

impl<'r> sqlx::FromRow<'r, PgRow> for IdentityRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(IdentityRow(Identity {
            id: IdentityId::from_i64(row.try_get("id")?),
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
        }))
    }
}

#[async_trait]
impl IdentityStore for PostgresIdentityStore {
    #[instrument(skip(self, email), err)]
    async fn find_by_email_or_username(&self, email: &str, username: &str) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, username, email, password_hash
            FROM identities
            WHERE username = $1 OR email = $2
            ORDER BY (username = $1) DESC
            LIMIT 1
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_email_or_username", e))?;

        Ok(row.map(|r| r.0))
    }

    #[instrument(skip(self, email), err)]
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            "SELECT id, username, email, password_hash FROM identities WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_email", e))?;

        Ok(row.map(|r| r.0))
    }

    #[instrument(skip(self), err)]
    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            "SELECT id, username, email, password_hash FROM identities WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_id", e))?;

        Ok(row.map(|r| r.0))
    }

    #[instrument(skip(self, identity), fields(username = %identity.username), err)]
    async fn insert(&self, identity: NewIdentity) -> Result<IdentityId, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO identities (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&identity.username)
        .bind(&identity.email)
        .bind(&identity.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_identity", e))?;

        Ok(IdentityId::from_i64(id))
    }
}
