// src/config/mod.rs
mod models;

pub use models::*;

use clap::{ArgAction, Parser};
use url::Url;

/// Check that a RabbitMQ vhost can round-trip a test message via the
/// management API aliveness-test endpoint.
#[derive(Parser, Debug)]
#[command(name = "check_rabbitmq_aliveness", version, about)]
pub struct Cli {
    /// Management API host to probe
    #[arg(short = 'H', long, visible_alias = "host", value_name = "HOST")]
    pub hostname: Option<String>,

    /// Management API port
    #[arg(long, default_value_t = DEFAULT_PORT, value_name = "PORT")]
    pub port: u16,

    /// Username for HTTP basic authentication
    #[arg(
        short = 'u',
        long,
        visible_alias = "user",
        env = "RABBITMQ_USER",
        default_value = DEFAULT_USERNAME,
        value_name = "USER"
    )]
    pub username: String,

    /// Password for HTTP basic authentication
    #[arg(
        short = 'p',
        long,
        env = "RABBITMQ_PASSWORD",
        hide_env_values = true,
        default_value = DEFAULT_PASSWORD,
        value_name = "PASSWORD"
    )]
    pub password: String,

    /// Virtual host to run the aliveness test against
    #[arg(long, default_value = DEFAULT_VHOST, value_name = "VHOST")]
    pub vhost: String,

    /// Use HTTPS when talking to the management API
    #[arg(
        long,
        default_value_t = false,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub ssl: bool,

    /// Verify the server TLS certificate
    #[arg(
        long = "ssl_strict",
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub ssl_strict: bool,

    /// Honor the standard proxy environment variables
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub proxy: bool,

    /// Route the request through this proxy instead of the environment
    #[arg(long = "proxyurl", value_name = "URL")]
    pub proxy_url: Option<String>,

    /// Seconds before the whole request is abandoned
    #[arg(short = 't', long, default_value_t = DEFAULT_TIMEOUT_SECS, value_name = "SECONDS")]
    pub timeout: u64,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Validate the parsed arguments into an immutable config. The hostname
    /// is checked here rather than by clap so that its absence surfaces as
    /// UNKNOWN, not as a usage error.
    pub fn into_config(self) -> Result<CheckConfig, ConfigError> {
        let host = match self.hostname {
            Some(host) if !host.is_empty() => host,
            _ => return Err(ConfigError::MissingHostname),
        };

        let proxy_url = match self.proxy_url {
            Some(raw) => {
                let parsed = Url::parse(&raw)
                    .map_err(|source| ConfigError::InvalidProxyUrl { url: raw, source })?;
                Some(parsed)
            }
            None => None,
        };

        Ok(CheckConfig {
            host,
            port: self.port,
            vhost: self.vhost,
            username: self.username,
            password: self.password,
            use_tls: self.ssl,
            verify_tls: self.ssl_strict,
            use_env_proxy: self.proxy,
            proxy_url,
            timeout_secs: self.timeout,
        })
    }
}
