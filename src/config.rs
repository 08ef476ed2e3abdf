use std::path::PathBuf;

use serde::Deserialize;

/// Bcrypt hash of the default admin password (`password`).
pub const DEFAULT_ADMIN_PASSWORD_HASH: &str =
    "$2a$10$92IXUNpkjO0rOQ5byMi.Ye4oKoEa3Ro9llC/.og/at2.uheWG/igi";

const DEV_JWT_SECRET: &str = "your-super-secret-jwt-key-change-in-production";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: i64,
    pub trust_proxy: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
    pub jwt: JwtConfig,
    pub cors_origins: Vec<String>,
    pub rate_limit: RateLimitConfig,
    pub admin: AdminConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ => {
                tracing::warn!("JWT_SECRET not set; using the development secret");
                DEV_JWT_SECRET.into()
            }
        };
        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "directory-api".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "directory-api-admin".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 60 * 24 * 365),
        };

        let cors_origins = std::env::var("CORS_ORIGINS")
            .map(|v| split_list(&v))
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".into(),
                    "http://localhost:5173".into(),
                ]
            });

        let rate_limit = RateLimitConfig {
            max_requests: env_parse("RATE_LIMIT_MAX", 100),
            window_secs: env_parse("RATE_LIMIT_WINDOW_SECS", 15 * 60),
            trust_proxy: env_parse("TRUST_PROXY", true),
        };

        let admin = AdminConfig {
            username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            password_hash: std::env::var("ADMIN_PASSWORD_HASH")
                .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD_HASH.into()),
        };

        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_parse("APP_PORT", 5000),
            data_file: std::env::var("DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data.json")),
            jwt,
            cors_origins,
            rate_limit,
            admin,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_skips_blanks() {
        assert_eq!(
            split_list(" http://a.test , ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn env_parse_falls_back_on_garbage() {
        std::env::set_var("DIRECTORY_API_TEST_PORT", "not-a-port");
        assert_eq!(env_parse::<u16>("DIRECTORY_API_TEST_PORT", 5000), 5000);
        std::env::set_var("DIRECTORY_API_TEST_PORT", " 8081 ");
        assert_eq!(env_parse::<u16>("DIRECTORY_API_TEST_PORT", 5000), 8081);
        std::env::remove_var("DIRECTORY_API_TEST_PORT");
    }
}
