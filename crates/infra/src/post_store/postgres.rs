//! Postgres-backed post store.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use quill_auth::StoreError;
use quill_core::{IdentityId, PostId};
use quill_posts::{NewPost, Post, PostChanges, PostStore};

use crate::db::map_sqlx_error;

#[derive(Debug, Clone)]
pub struct PostgresPostStore {
    pool: PgPool,
}

impl PostgresPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

struct PostRow(Post);

impl<'r> sqlx::FromRow<'r, PgRow> for PostRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(PostRow(Post {
            id: PostId::from_i64(row.try_get("id")?),
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            owner_id: IdentityId::from_i64(row.try_get("owner_id")?),
        }))
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query_as::<_, PostRow>("SELECT id, title, content, owner_id FROM posts ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_posts", e))?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    #[instrument(skip(self), err)]
    async fn get(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        let row = sqlx::query_as::<_, PostRow>("SELECT id, title, content, owner_id FROM posts WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_post", e))?;

        Ok(row.map(|r| r.0))
    }

    #[instrument(skip(self), err)]
    async fn list_by_owner(&self, owner: IdentityId) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT id, title, content, owner_id FROM posts WHERE owner_id = $1 ORDER BY id",
        )
        .bind(owner.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_posts_by_owner", e))?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    #[instrument(skip(self, post), err)]
    async fn insert(&self, owner: IdentityId, post: NewPost) -> Result<Post, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, content, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, owner_id
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(owner.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_post", e))?;

        Ok(row.0)
    }

    #[instrument(skip(self, changes), err)]
    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Option<Post>, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content)
            WHERE id = $1
            RETURNING id, title, content, owner_id
            "#,
        )
        .bind(id.as_i64())
        .bind(changes.title)
        .bind(changes.content)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_post", e))?;

        Ok(row.map(|r| r.0))
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: PostId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_post", e))?;

        Ok(result.rows_affected() > 0)
    }
}
