//! HTTP mail relay notifier
//!
//! Messages are POSTed as JSON (`from`, `to`, `subject`, `body`) to a relay
//! endpoint that performs the actual delivery. A bearer token, when
//! configured, is read from the environment (a `.env` file is honoured) and
//! sent with every request.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

use crate::config::RelayConfig;
use crate::core::Message;
use crate::error::{SantaError, SantaResult};
use crate::traits::Notifier;

#[derive(Debug, Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Notifier backed by an HTTP mail relay
pub struct HttpRelayNotifier {
    client: reqwest::Client,
    endpoint: String,
    from_address: String,
    token: Option<String>,
}

impl fmt::Debug for HttpRelayNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRelayNotifier")
            .field("endpoint", &self.endpoint)
            .field("from_address", &self.from_address)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl HttpRelayNotifier {
    /// Build from configuration, resolving the token from the environment
    pub fn from_config(from_address: &str, relay: &RelayConfig) -> SantaResult<Self> {
        let token = match &relay.token_env {
            Some(name) => Some(Self::read_token(name)?),
            None => None,
        };
        Self::new(
            relay.endpoint.clone(),
            from_address.to_string(),
            token,
            Duration::from_millis(relay.timeout_ms),
        )
    }

    pub fn new(endpoint: String, from_address: String, token: Option<String>, timeout: Duration) -> SantaResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SantaError::notification(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            from_address,
            token,
        })
    }

    fn read_token(name: &str) -> SantaResult<String> {
        // Missing .env is fine, the variable may come from the real environment
        let _ = dotenv::dotenv();
        match std::env::var(name) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(SantaError::config(format!("relay token variable {name} is not set"))),
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl Notifier for HttpRelayNotifier {
    async fn connect(&self) -> SantaResult<()> {
        let response = self
            .authorized(self.client.get(&self.endpoint))
            .send()
            .await
            .map_err(|e| SantaError::notification(format!("relay {} unreachable: {e}", self.endpoint)))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SantaError::notification(format!(
                "relay {} rejected credentials ({})",
                self.endpoint,
                response.status()
            ))),
            status if status.is_server_error() => Err(SantaError::notification(format!(
                "relay {} is unavailable ({status})",
                self.endpoint
            ))),
            // Any other answer (including 405 for GET) proves the relay is up
            status => {
                debug!(endpoint = %self.endpoint, %status, "🔌 Relay reachable");
                Ok(())
            }
        }
    }

    async fn send(&self, message: &Message) -> SantaResult<()> {
        let payload = RelayPayload {
            from: &self.from_address,
            to: &message.to,
            subject: &message.subject,
            body: &message.body,
        };

        let response = self
            .authorized(self.client.post(&self.endpoint))
            .json(&payload)
            .send()
            .await
            .map_err(|e| SantaError::notification(format!("sending to {} failed: {e}", message.to)))?;

        if !response.status().is_success() {
            return Err(SantaError::notification(format!(
                "relay refused message to {} ({})",
                message.to,
                response.status()
            )));
        }

        debug!(to = %message.to, participant = %message.participant, "📨 Message relayed");
        Ok(())
    }
}
