use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ApiConfiguration {
    /// host serving the online login and the ticket redirect
    pub client_url: String,
    /// host serving the market api (`/prod-api/...`)
    pub market_url: String,
    /// target page passed to the ticket redirect
    pub market_redirect_url: String,
    pub activity_id: u32,
    /// per request timeout in seconds
    pub timeout: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

impl Default for ApiConfiguration {
    fn default() -> Self {
        Self {
            client_url: "https://m.client.10010.com".to_string(),
            market_url: "https://backward.bol.wo.cn".to_string(),
            market_redirect_url: "https://contact.bol.wo.cn/market".to_string(),
            activity_id: 12,
            timeout: 10,
            retries: 3,
            backoff_ms: 300,
        }
    }
}

impl ApiConfiguration {
    pub fn client_endpoint(&self, path: &str) -> String {
        format!("{}/mobileService/{}", self.client_url.trim_end_matches('/'), path)
    }

    pub fn market_endpoint(&self, path: &str) -> String {
        format!("{}/prod-api/{}", self.market_url.trim_end_matches('/'), path)
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CoreConfiguration {
    pub auto_grant: bool,
    /// pause in seconds between two accounts
    pub account_delay: u64,
    /// pause in seconds between two draws
    pub raffle_delay: u64,
}

impl Default for CoreConfiguration {
    fn default() -> Self {
        Self {
            auto_grant: false,
            account_delay: 3,
            raffle_delay: 1,
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct NotifyConfiguration {
    pub hook_command: Option<String>,
    pub webhook: Option<WebhookConfiguration>,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WebhookKind {
    DingTalk,
    WeChat,
    ServerChan,
}

#[derive(Deserialize, Clone, Debug)]
pub struct WebhookConfiguration {
    #[serde(default = "enabled")]
    pub enable: bool,
    pub kind: WebhookKind,
    #[serde(default)]
    pub url: String,
    pub secret: Option<String>,
}

fn enabled() -> bool {
    true
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct LogConfiguration {
    pub level: Option<String>,
    pub retention: Option<usize>,
    pub directory: Option<String>,
}
