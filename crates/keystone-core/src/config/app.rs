//! Server, CORS, and security-header configuration.

use serde::{Deserialize, Serialize};

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// URL prefix under which the API is mounted.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// API version segment appended to the prefix (empty to disable).
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Whether an incoming `X-Request-ID` header is trusted as the trace id.
    /// When disabled, a fresh id is generated for every request.
    #[serde(default)]
    pub trust_request_id: bool,
    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,
    /// Security response header configuration.
    #[serde(default)]
    pub security: SecurityHeadersConfig,
}

impl ServerConfig {
    /// The mount point for API routes, e.g. `/api/v1`.
    pub fn api_root(&self) -> String {
        let prefix = self.api_prefix.trim_matches('/');
        let version = self.api_version.trim_matches('/');
        if version.is_empty() {
            format!("/{prefix}")
        } else {
            format!("/{prefix}/{version}")
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_prefix: default_api_prefix(),
            api_version: default_api_version(),
            trust_request_id: false,
            cors: CorsConfig::default(),
            security: SecurityHeadersConfig::default(),
        }
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins (use `["*"]` for development only).
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// Allowed HTTP methods.
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,
    /// Allowed HTTP headers.
    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: Vec<String>,
    /// Whether credentials are allowed. Ignored when origins contain `*`.
    #[serde(default = "default_true")]
    pub allow_credentials: bool,
    /// Max age for preflight cache in seconds.
    #[serde(default = "default_max_age")]
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: default_allowed_methods(),
            allowed_headers: default_allowed_headers(),
            allow_credentials: default_true(),
            max_age_seconds: default_max_age(),
        }
    }
}

/// Security response header configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityHeadersConfig {
    /// Master switch for all security headers.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Whether to emit `Strict-Transport-Security`.
    #[serde(default = "default_true")]
    pub hsts_enabled: bool,
    /// HSTS max-age in seconds.
    #[serde(default = "default_hsts_max_age")]
    pub hsts_max_age_seconds: u64,
    /// Whether to emit `X-Frame-Options: DENY`.
    #[serde(default = "default_true")]
    pub frame_deny: bool,
    /// `Referrer-Policy` header value.
    #[serde(default = "default_referrer_policy")]
    pub referrer_policy: String,
    /// `Permissions-Policy` header value.
    #[serde(default = "default_permissions_policy")]
    pub permissions_policy: String,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hsts_enabled: true,
            hsts_max_age_seconds: default_hsts_max_age(),
            frame_deny: true,
            referrer_policy: default_referrer_policy(),
            permissions_policy: default_permissions_policy(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_api_prefix() -> String {
    "api".to_string()
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_allowed_methods() -> Vec<String> {
    vec![
        "GET".to_string(),
        "POST".to_string(),
        "PUT".to_string(),
        "DELETE".to_string(),
        "PATCH".to_string(),
        "OPTIONS".to_string(),
    ]
}

fn default_allowed_headers() -> Vec<String> {
    vec!["Authorization".to_string(), "Content-Type".to_string()]
}

fn default_max_age() -> u64 {
    600
}

fn default_hsts_max_age() -> u64 {
    63_072_000
}

fn default_referrer_policy() -> String {
    "no-referrer".to_string()
}

fn default_permissions_policy() -> String {
    "geolocation=(), microphone=(), camera=()".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_root_joins_prefix_and_version() {
        let server = ServerConfig::default();
        assert_eq!(server.api_root(), "/api/v1");
    }

    #[test]
    fn api_root_without_version() {
        let server = ServerConfig {
            api_version: String::new(),
            ..ServerConfig::default()
        };
        assert_eq!(server.api_root(), "/api");
    }

    #[test]
    fn api_root_strips_extra_slashes() {
        let server = ServerConfig {
            api_prefix: "/api/".to_string(),
            api_version: "/v2/".to_string(),
            ..ServerConfig::default()
        };
        assert_eq!(server.api_root(), "/api/v2");
    }
}
