use crate::auth::repo::UserDirectory;
use crate::config::AppConfig;
use crate::entries::repo::{EntryStore, JsonFileStore};
use crate::security::RateLimiter;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn EntryStore>,
    pub users: Arc<UserDirectory>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store = Arc::new(JsonFileStore::new(config.data_file.clone())) as Arc<dyn EntryStore>;
        Ok(Self::from_parts(config, store))
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn EntryStore>) -> Self {
        let users = Arc::new(UserDirectory::with_admin(&config.admin));
        let limiter = Arc::new(RateLimiter::new(
            config.rate_limit.max_requests,
            config.rate_limit.window_secs,
        ));
        Self {
            config,
            store,
            users,
            limiter,
        }
    }

    /// State backed by a data file at `data_file`, with test-friendly settings.
    #[cfg(test)]
    pub fn fake(data_file: std::path::PathBuf) -> Self {
        use crate::config::{
            AdminConfig, JwtConfig, RateLimitConfig, DEFAULT_ADMIN_PASSWORD_HASH,
        };

        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            data_file: data_file.clone(),
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 60 * 24 * 365,
            },
            cors_origins: vec![
                "http://localhost:3000".into(),
                "http://localhost:5173".into(),
            ],
            rate_limit: RateLimitConfig {
                max_requests: 100,
                window_secs: 15 * 60,
                trust_proxy: true,
            },
            admin: AdminConfig {
                username: "admin".into(),
                password_hash: DEFAULT_ADMIN_PASSWORD_HASH.into(),
            },
        });
        let store = Arc::new(JsonFileStore::new(data_file)) as Arc<dyn EntryStore>;
        Self::from_parts(config, store)
    }
}
