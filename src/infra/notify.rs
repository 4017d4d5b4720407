//! Batch summary notifications
//!
//! Summaries go to a WeCom group robot as markdown messages. Delivery is
//! strictly best effort, callers log a failed send and move on, a build
//! batch never fails because the webhook was unreachable.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::defaults::WEBHOOK_ENDPOINT;
use crate::config::Settings;
use crate::error::NotifyError;

/// A sink batch summaries are delivered to
#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn send_markdown(&self, text: &str) -> Result<(), NotifyError>;
}

/// WeCom group robot webhook
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    endpoint: String,
    key: String,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_endpoint(WEBHOOK_ENDPOINT, key)
    }

    pub fn with_endpoint(endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            key: key.into(),
            client: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WebhookResponse {
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

impl Notifier for WebhookNotifier {
    async fn send_markdown(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}?key={}", self.endpoint, self.key);
        let body = json!({
            "msgtype": "markdown",
            "markdown": { "content": text },
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|error| NotifyError::Request {
                error: error.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Http {
                status: status.as_u16(),
            });
        }

        let parsed: WebhookResponse =
            response.json().await.map_err(|error| NotifyError::Request {
                error: error.to_string(),
            })?;
        if parsed.errcode != 0 {
            return Err(NotifyError::Api {
                code: parsed.errcode,
                message: parsed.errmsg,
            });
        }

        tracing::debug!("summary notification delivered");
        Ok(())
    }
}

/// Notification sink chosen from the effective settings
#[derive(Debug, Clone)]
pub enum AnyNotifier {
    Webhook(WebhookNotifier),
    Noop,
}

impl AnyNotifier {
    /// Webhook delivery needs both the notify switch and a configured key
    pub fn from_settings(settings: &Settings) -> Self {
        if !settings.notify {
            return Self::Noop;
        }
        match settings.webhook_key.as_deref() {
            Some(key) if !key.is_empty() => Self::Webhook(WebhookNotifier::new(key)),
            _ => {
                tracing::debug!("no webhook key configured, summary stays local");
                Self::Noop
            }
        }
    }
}

impl Notifier for AnyNotifier {
    async fn send_markdown(&self, text: &str) -> Result<(), NotifyError> {
        match self {
            Self::Webhook(webhook) => webhook.send_markdown(text).await,
            Self::Noop => {
                tracing::debug!("notification sink disabled, dropping summary");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notifier_for(server: &MockServer) -> WebhookNotifier {
        WebhookNotifier::with_endpoint(format!("{}/send", server.uri()), "test-key")
    }

    #[tokio::test]
    async fn test_delivers_markdown_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({"msgtype": "markdown"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": "ok"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        notifier_for(&server)
            .send_markdown("# mbuild report")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_api_error_code_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"errcode": 93000, "errmsg": "invalid webhook url"})),
            )
            .mount(&server)
            .await;

        let error = notifier_for(&server)
            .send_markdown("text")
            .await
            .unwrap_err();
        assert!(matches!(error, NotifyError::Api { code: 93000, .. }));
    }

    #[tokio::test]
    async fn test_http_failure_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let error = notifier_for(&server)
            .send_markdown("text")
            .await
            .unwrap_err();
        assert!(matches!(error, NotifyError::Http { status: 500 }));
    }

    #[tokio::test]
    async fn test_noop_sink_accepts_everything() {
        AnyNotifier::Noop.send_markdown("anything").await.unwrap();
    }
}
