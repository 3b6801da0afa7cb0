//! Service wiring: picks the stores and assembles the auth and post services.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use quill_auth::{
    AuthError, BearerAuthenticator, IdentityService, IdentityStore, PasswordAuthenticator, PasswordHasher,
    SigningKey, StoreError, TokenService,
};
use quill_infra::{InMemoryIdentityStore, InMemoryPostStore, PostgresIdentityStore, PostgresPostStore, db};
use quill_posts::{PostService, PostStore};

use crate::config::AppConfig;

pub type DynIdentityStore = Arc<dyn IdentityStore>;
pub type DynPostStore = Arc<dyn PostStore>;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("store setup failed: {0}")]
    Store(#[from] StoreError),

    #[error("service setup failed: {0}")]
    Auth(#[from] AuthError),
}

/// Everything the handlers need. Shared read-only across requests.
pub struct AppServices {
    pub identities: Arc<IdentityService<DynIdentityStore>>,
    pub tokens: Arc<TokenService>,
    pub posts: Arc<PostService<DynPostStore>>,
    pub login: PasswordAuthenticator<DynIdentityStore>,
    pub bearer: Arc<BearerAuthenticator<DynIdentityStore>>,
}

impl AppServices {
    pub fn from_stores(
        config: &AppConfig,
        identity_store: DynIdentityStore,
        post_store: DynPostStore,
    ) -> Result<Self, AuthError> {
        let hasher = PasswordHasher::new(config.hash_cost)?;
        let identities = Arc::new(IdentityService::new(identity_store, hasher, config.store_timeout));
        let tokens = Arc::new(TokenService::new(
            SigningKey::from_secret(config.jwt_secret.as_bytes()),
            config.token_ttl,
        ));
        let posts = Arc::new(PostService::new(post_store, config.store_timeout));

        Ok(Self {
            login: PasswordAuthenticator::new(identities.clone()),
            bearer: Arc::new(BearerAuthenticator::new(tokens.clone(), identities.clone())),
            identities,
            tokens,
            posts,
        })
    }

    pub fn in_memory(config: &AppConfig) -> Result<Self, AuthError> {
        Self::from_stores(
            config,
            Arc::new(InMemoryIdentityStore::new()),
            Arc::new(InMemoryPostStore::new()),
        )
    }
}

/// Postgres when `DATABASE_URL` is configured, in-memory otherwise.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, BootstrapError> {
    let Some(database_url) = config.database_url.as_deref() else {
        info!("DATABASE_URL not set; using in-memory stores");
        return Ok(AppServices::in_memory(config)?);
    };

    let pool = db::connect(database_url, config.store_timeout).await?;
    db::ensure_schema(&pool).await?;
    info!("using postgres stores");

    Ok(AppServices::from_stores(
        config,
        Arc::new(PostgresIdentityStore::new(pool.clone())),
        Arc::new(PostgresPostStore::new(pool)),
    )?)
}
