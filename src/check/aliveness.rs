// src/check/aliveness.rs
use crate::check::CheckResult;
use crate::config::CheckConfig;
use reqwest::{Client, Proxy, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("check_rabbitmq_aliveness/", env!("CARGO_PKG_VERSION"));

/// Body returned by the aliveness-test endpoint. Both fields are optional;
/// a missing field is an explicit failure case, never a decode panic.
#[derive(Debug, Deserialize)]
pub struct AlivenessResponse {
    pub status: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

pub struct AlivenessChecker {
    config: CheckConfig,
    client: Client,
}

/// Run one aliveness probe. An unbuildable client is a config-class failure
/// and maps to UNKNOWN; once the client exists every outcome is OK/CRITICAL.
pub async fn run(config: CheckConfig) -> CheckResult {
    match AlivenessChecker::new(config) {
        Ok(checker) => checker.check().await,
        Err(err) => CheckResult::unknown(err.to_string()),
    }
}

impl AlivenessChecker {
    pub fn new(config: CheckConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT);

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url.clone()).map_err(ClientError::Build)?;
            builder = builder.proxy(proxy);
        } else if !config.use_env_proxy {
            builder = builder.no_proxy();
        }

        // Opt-in insecure mode: only reachable via an explicit
        // --ssl_strict=false on an HTTPS probe.
        if config.use_tls && !config.verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(ClientError::Build)?;

        Ok(Self { config, client })
    }

    /// Exactly one GET against the aliveness endpoint; transport failures
    /// come back as CRITICAL results, not errors.
    pub async fn check(&self) -> CheckResult {
        let url = self.config.aliveness_url();
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.as_str())
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await;

        match response {
            Ok(response) => self.classify(response).await,
            Err(err) if err.is_timeout() => {
                warn!("aliveness request timed out: {}", err);
                CheckResult::critical(format!(
                    "timed out after {}s connecting to {}",
                    self.config.timeout_secs, self.config.host
                ))
            }
            Err(err) => {
                warn!("aliveness request failed: {}", err);
                CheckResult::critical(err.to_string())
            }
        }
    }

    async fn classify(&self, response: Response) -> CheckResult {
        let status = response.status();
        let vhost = &self.config.vhost;
        debug!("management API answered {}", status);

        match status {
            StatusCode::BAD_REQUEST => {
                let body = read_body(response).await;
                match serde_json::from_str::<AlivenessResponse>(&body) {
                    Ok(AlivenessResponse {
                        reason: Some(reason),
                        ..
                    }) => CheckResult::critical(reason),
                    // No usable reason field: surface the body as-is.
                    _ => CheckResult::critical(body),
                }
            }
            StatusCode::UNAUTHORIZED => CheckResult::critical(format!("Access refused: {vhost}")),
            StatusCode::NOT_FOUND => CheckResult::critical(format!("Not found: {vhost}")),
            s if s.as_u16() >= 200 && s.as_u16() < 400 => {
                let body = read_body(response).await;
                match serde_json::from_str::<AlivenessResponse>(&body) {
                    Ok(AlivenessResponse {
                        status: Some(ref ok),
                        ..
                    }) if ok == "ok" => CheckResult::ok(format!("vhost: {vhost}")),
                    // Decoded but not "ok", or the field is absent, or the
                    // body is not JSON at all: surface the raw body.
                    _ => CheckResult::critical(body),
                }
            }
            other => CheckResult::critical(format!(
                "Received {} for vhost: {}",
                status_line(other),
                vhost
            )),
        }
    }
}

async fn read_body(response: Response) -> String {
    response.text().await.unwrap_or_default()
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
