use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use log::debug;
use reqwest::{Client, Url};
use serde_json::{json, Value};
use sha2::Sha256;

use super::Notifier;
use crate::core::{
    common::http_client_factory,
    configuration::{WebhookConfiguration, WebhookKind},
};

type HmacSha256 = Hmac<Sha256>;

/// Chat robot webhooks: DingTalk (optionally signed), WeCom and ServerChan
pub struct WebhookNotifier {
    client: Client,
    kind: WebhookKind,
    url: Url,
    secret: Option<String>,
}

impl WebhookNotifier {
    pub fn new(
        conf: &WebhookConfiguration,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self {
            client: http_client_factory()?,
            kind: conf.kind,
            url: Url::parse(conf.url.trim())?,
            secret: conf.secret.clone().filter(|s| !s.is_empty()),
        })
    }

    /// Target url and json payload for the configured robot
    pub fn build_request(
        &self,
        title: &str,
        body: &str,
        timestamp_ms: i64,
    ) -> Result<(Url, Value), Box<dyn std::error::Error + Send + Sync>> {
        let mut url = self.url.clone();
        let text = json!({
            "msgtype": "text",
            "text": { "content": format!("{title}\n\n{body}") }
        });

        let payload = match self.kind {
            WebhookKind::DingTalk => {
                if let Some(secret) = &self.secret {
                    let timestamp = timestamp_ms.to_string();
                    let sign = sign(secret, &timestamp)?;
                    url.query_pairs_mut()
                        .append_pair("timestamp", &timestamp)
                        .append_pair("sign", &sign);
                }
                text
            }
            WebhookKind::WeChat => text,
            WebhookKind::ServerChan => json!({ "title": title, "desp": body }),
        };

        Ok((url, payload))
    }
}

/// DingTalk signature: base64(HMAC-SHA256(secret, "{timestamp}\n{secret}"))
pub fn sign(
    secret: &str,
    timestamp: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Err(e) => return Err(Box::new(e)),
        Ok(h) => h,
    };

    mac.update(format!("{timestamp}\n{secret}").as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> String {
        match self.kind {
            WebhookKind::DingTalk => "钉钉",
            WebhookKind::WeChat => "企业微信",
            WebhookKind::ServerChan => "Server酱",
        }
        .to_string()
    }

    async fn send(
        &self,
        title: &str,
        body: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (url, payload) =
            self.build_request(title, body, chrono::Utc::now().timestamp_millis())?;

        debug!("posting notification to {}", url.host_str().unwrap_or_default());

        self.client
            .post(url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
