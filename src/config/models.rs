// src/config/models.rs
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;
use url::Url;

pub const DEFAULT_PORT: u16 = 15672;
pub const DEFAULT_VHOST: &str = "/";
pub const DEFAULT_USERNAME: &str = "guest";
pub const DEFAULT_PASSWORD: &str = "guest";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// RFC 3986 unreserved characters stay literal; everything else is escaped,
/// which in particular turns the default vhost "/" into "%2F".
const VHOST_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required --hostname")]
    MissingHostname,

    #[error("invalid --proxyurl {url:?}: {source}")]
    InvalidProxyUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Immutable settings for one probe run, constructed once from the CLI.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub host: String,
    pub port: u16,
    pub vhost: String,
    pub username: String,
    pub password: String,
    pub use_tls: bool,
    pub verify_tls: bool,
    pub use_env_proxy: bool,
    pub proxy_url: Option<Url>,
    pub timeout_secs: u64,
}

impl CheckConfig {
    /// Aliveness endpoint for the configured vhost, with the vhost encoded
    /// as a single path segment.
    pub fn aliveness_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        let vhost = utf8_percent_encode(&self.vhost, VHOST_SEGMENT);
        format!(
            "{}://{}:{}/api/aliveness-test/{}",
            scheme, self.host, self.port, vhost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> CheckConfig {
        CheckConfig {
            host: "rabbit.example.com".to_string(),
            port: DEFAULT_PORT,
            vhost: DEFAULT_VHOST.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            use_tls: false,
            verify_tls: true,
            use_env_proxy: true,
            proxy_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    #[test]
    fn default_vhost_is_escaped_into_the_path() {
        let config = base_config();
        assert_eq!(
            config.aliveness_url(),
            "http://rabbit.example.com:15672/api/aliveness-test/%2F"
        );
    }

    #[test]
    fn named_vhost_passes_through_unescaped() {
        let config = CheckConfig {
            vhost: "production".to_string(),
            ..base_config()
        };
        assert_eq!(
            config.aliveness_url(),
            "http://rabbit.example.com:15672/api/aliveness-test/production"
        );
    }

    #[test]
    fn slash_inside_vhost_name_is_escaped() {
        let config = CheckConfig {
            vhost: "tenants/acme".to_string(),
            ..base_config()
        };
        assert_eq!(
            config.aliveness_url(),
            "http://rabbit.example.com:15672/api/aliveness-test/tenants%2Facme"
        );
    }

    #[test]
    fn tls_switches_the_scheme() {
        let config = CheckConfig {
            use_tls: true,
            port: 15671,
            ..base_config()
        };
        assert_eq!(
            config.aliveness_url(),
            "https://rabbit.example.com:15671/api/aliveness-test/%2F"
        );
    }
}
