use serde::Deserialize;
use tracing::warn;

const DEV_JWT_SECRET: &str = "change-me-in-production";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    /// Clock skew tolerated when checking `exp`.
    pub leeway_seconds: u64,
}

/// Knobs for the auth lifecycle that differed between deployments.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AuthPolicy {
    /// Refuse a password change whose new password equals the old one.
    pub reject_unchanged_password: bool,
    /// Refuse to create a user whose email is already taken.
    pub unique_email: bool,
    pub min_password_len: usize,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            reject_unchanged_password: true,
            unique_email: false,
            min_password_len: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub use_ssl: bool,
    pub region: String,
}

impl StorageConfig {
    /// Endpoint with scheme, as the S3 client and public URLs expect it.
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://") {
            return self.endpoint.trim_end_matches('/').to_string();
        }
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}", scheme, self.endpoint.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt: JwtConfig,
    pub auth: AuthPolicy,
    pub allow_create_user: bool,
    pub cors_origins: Vec<String>,
    pub storage: Option<StorageConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let env = env_or("ENV", "development");
        let production = env == "production";

        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ if production => anyhow::bail!("JWT_SECRET must be set in production"),
            _ => {
                warn!("JWT_SECRET not set; using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let jwt = JwtConfig {
            secret,
            issuer: env_or("JWT_ISSUER", "gallery-cms"),
            audience: env_or("JWT_AUDIENCE", "gallery-cms-admin"),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 60 * 24),
            leeway_seconds: env_parse("JWT_LEEWAY_SECONDS", 0),
        };

        let defaults = AuthPolicy::default();
        let auth = AuthPolicy {
            reject_unchanged_password: env_parse(
                "AUTH_REJECT_UNCHANGED_PASSWORD",
                defaults.reject_unchanged_password,
            ),
            unique_email: env_parse("AUTH_UNIQUE_EMAIL", defaults.unique_email),
            min_password_len: env_parse("AUTH_MIN_PASSWORD_LEN", defaults.min_password_len),
        };

        Ok(Self {
            host: env_or("APP_HOST", "0.0.0.0"),
            port: env_parse("APP_PORT", 8080),
            database_url: database_url(),
            jwt,
            auth,
            allow_create_user: env_parse("ALLOW_CREATE_USER", !production),
            cors_origins: parse_origins(&env_or(
                "CORS_ORIGINS",
                "http://localhost:3000,http://127.0.0.1:3000",
            )),
            storage: storage_from_env(),
            env,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or(key: &str, fallback: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(fallback)
}

fn database_url() -> String {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        if !url.is_empty() {
            return url;
        }
    }
    format!(
        "postgres://{}:{}@{}:{}/{}?sslmode={}",
        env_or("POSTGRES_USER", "gallery"),
        std::env::var("POSTGRES_PASSWORD").unwrap_or_default(),
        env_or("POSTGRES_HOST", "db"),
        env_or("POSTGRES_PORT", "5432"),
        env_or("POSTGRES_DB", "gallery"),
        env_or("POSTGRES_SSL_MODE", "disable"),
    )
}

fn storage_from_env() -> Option<StorageConfig> {
    let endpoint = std::env::var("OSS_ENDPOINT").unwrap_or_default();
    let bucket = std::env::var("OSS_BUCKET").unwrap_or_default();
    if endpoint.is_empty() || bucket.is_empty() {
        return None;
    }
    Some(StorageConfig {
        endpoint,
        bucket,
        access_key: std::env::var("OSS_ACCESS_KEY_ID").unwrap_or_default(),
        secret_key: std::env::var("OSS_ACCESS_KEY_SECRET").unwrap_or_default(),
        use_ssl: env_parse("OSS_USE_SSL", false),
        region: env_or("OSS_REGION", "us-east-1"),
    })
}

pub(crate) fn parse_origins(raw: &str) -> Vec<String> {
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
    fn parse_origins_trims_and_skips_empty() {
        let origins = parse_origins(" http://a.test ,, http://b.test,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn endpoint_url_adds_scheme_from_ssl_flag() {
        let mut cfg = StorageConfig {
            endpoint: "minio:9000".into(),
            bucket: "photos".into(),
            access_key: "k".into(),
            secret_key: "s".into(),
            use_ssl: false,
            region: "us-east-1".into(),
        };
        assert_eq!(cfg.endpoint_url(), "http://minio:9000");
        cfg.use_ssl = true;
        assert_eq!(cfg.endpoint_url(), "https://minio:9000");
        cfg.endpoint = "https://oss.example.com/".into();
        assert_eq!(cfg.endpoint_url(), "https://oss.example.com");
    }

    #[test]
    fn default_policy_rejects_unchanged_password() {
        let p = AuthPolicy::default();
        assert!(p.reject_unchanged_password);
        assert!(!p.unique_email);
        assert_eq!(p.min_password_len, 8);
    }
}
