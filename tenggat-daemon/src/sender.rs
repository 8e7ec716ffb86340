use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, multipart::Form};
use serde_json::Value;
use url::Url;

pub const DEFAULT_GATEWAY: &str = "https://api.fonnte.com/send";

/// Delivers a message to a user. `false` means "not delivered, try again later".
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, target: &str, message: &str, token: &str) -> bool;
}

/// WhatsApp delivery through the Fonnte HTTP gateway.
#[derive(Debug, Clone)]
pub struct FonnteSender {
    gateway: Url,
    http_client: reqwest::Client,
}

impl FonnteSender {
    pub fn new(gateway: Url) -> anyhow::Result<Self> {
        Ok(Self {
            gateway,
            http_client: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .timeout(Duration::from_secs(10))
                .build()?,
        })
    }

    async fn try_send(&self, target: &str, message: &str, token: &str) -> anyhow::Result<bool> {
        let form = Form::new()
            .text("target", target.to_string())
            .text("message", message.to_string());

        let response = self
            .http_client
            .post(self.gateway.clone())
            .header(AUTHORIZATION, token)
            .multipart(form)
            .send()
            .await
            .context("Failed to reach gateway")?;

        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .context(format!("Gateway answered {status} without JSON"))?;
        tracing::debug!("Gateway response: {body}");

        Ok(delivered(&body))
    }
}

#[async_trait]
impl MessageSender for FonnteSender {
    #[tracing::instrument(skip(self, message, token))]
    async fn send(&self, target: &str, message: &str, token: &str) -> bool {
        match self.try_send(target, message, token).await {
            Ok(true) => true,
            Ok(false) => {
                tracing::warn!("Gateway refused message");
                false
            }
            Err(error) => {
                tracing::warn!("Failed to send message: {error:?}");
                false
            }
        }
    }
}

/// The gateway reports success in several shapes depending on the account plan.
fn delivered(body: &Value) -> bool {
    body["status"] == Value::Bool(true)
        || body["detail"]
            .as_str()
            .is_some_and(|detail| detail.contains("sent"))
        || (is_truthy(&body["start"]) && is_truthy(&body["end"]))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn sender_for(server: &MockServer) -> FonnteSender {
        let gateway = Url::parse(&format!("{}/send", server.uri())).unwrap();
        FonnteSender::new(gateway).unwrap()
    }

    #[test]
    fn success_shapes() {
        assert!(delivered(&json!({ "status": true })));
        assert!(delivered(&json!({ "detail": "success! message in queue, sent" })));
        assert!(delivered(&json!({ "start": 1, "end": 2 })));

        assert!(!delivered(&json!({ "status": false, "reason": "invalid token" })));
        assert!(!delivered(&json!({ "detail": "failed" })));
        assert!(!delivered(&json!({ "start": 1 })));
        assert!(!delivered(&json!({ "start": 0, "end": 0 })));
        assert!(!delivered(&json!([])));
    }

    #[tokio::test]
    async fn posts_form_with_token_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send"))
            .and(header("Authorization", "secret-token"))
            .and(body_string_contains("081234567890"))
            .and(body_string_contains("Pay rent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": true })))
            .expect(1)
            .mount(&server)
            .await;

        let sender = sender_for(&server).await;
        assert!(
            sender
                .send("081234567890", "Tugas: *Pay rent*", "secret-token")
                .await
        );
    }

    #[tokio::test]
    async fn refusal_is_a_failed_send() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "status": false, "reason": "invalid token" })),
            )
            .mount(&server)
            .await;

        let sender = sender_for(&server).await;
        assert!(!sender.send("081234567890", "hello", "bad-token").await);
    }

    #[tokio::test]
    async fn non_json_error_is_a_failed_send() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let sender = sender_for(&server).await;
        assert!(!sender.send("081234567890", "hello", "token").await);
    }

    #[tokio::test]
    async fn unreachable_gateway_is_a_failed_send() {
        let server = MockServer::start().await;
        let sender = sender_for(&server).await;
        drop(server);

        assert!(!sender.send("081234567890", "hello", "token").await);
    }
}
