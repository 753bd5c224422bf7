use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have sensible defaults suitable for
/// local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the CEP lookup service (default: ViaCEP).
    pub cep_base_url: String,
    /// Timeout for one CEP lookup request in seconds (default: `5`).
    pub cep_timeout_secs: u64,
    /// Maximum decoded size of a single attachment in bytes (default: 5 MiB).
    pub max_attachment_bytes: usize,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `CEP_BASE_URL`         | `https://viacep.com.br`    |
    /// | `CEP_TIMEOUT_SECS`     | `5`                        |
    /// | `MAX_ATTACHMENT_BYTES` | `5242880`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let cep_base_url =
            std::env::var("CEP_BASE_URL").unwrap_or_else(|_| "https://viacep.com.br".into());

        let cep_timeout_secs: u64 = std::env::var("CEP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("CEP_TIMEOUT_SECS must be a valid u64");

        let max_attachment_bytes: usize = std::env::var("MAX_ATTACHMENT_BYTES")
            .unwrap_or_else(|_| (5 * 1024 * 1024).to_string())
            .parse()
            .expect("MAX_ATTACHMENT_BYTES must be a valid usize");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            cep_base_url,
            cep_timeout_secs,
            max_attachment_bytes,
            jwt,
        }
    }
}
