use std::time::Duration;

use log::{debug, error, warn};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    redirect::Policy,
    Client, Method, RequestBuilder, Response,
};
use serde::de::DeserializeOwned;

use crate::core::configuration::ApiConfiguration;

use super::transport::{MarketResponseError, RequestBody};

pub const MARKET_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10; \
Redmi K30 Pro Build/QKQ1.191117.002; wv) \
AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/100.0.4896.58 \
Mobile Safari/537.36 unicom{version:android@11.0500}";

/// Process wide HTTP client talking to the market hosts.
///
/// Cloning is cheap, both inner clients share their connection pools.
/// Transport failures are retried `retries` times with an exponential backoff
/// (`backoff`, `2 * backoff`, `4 * backoff`, ...).
#[derive(Clone)]
pub struct MarketHttpClient {
    client: Client,
    no_redirect_client: Client,
    retries: u32,
    backoff: Duration,
}

impl MarketHttpClient {
    pub fn new(conf: &ApiConfiguration) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        debug!("creating market http client");

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let builder = || {
            reqwest::ClientBuilder::new()
                .user_agent(MARKET_USER_AGENT)
                .default_headers(headers.clone())
                .timeout(Duration::from_secs(conf.timeout))
        };

        let client = builder().build()?;
        let no_redirect_client = builder().redirect(Policy::none()).build()?;

        Ok(Self {
            client,
            no_redirect_client,
            retries: conf.retries,
            backoff: Duration::from_millis(conf.backoff_ms),
        })
    }

    /// Sends the request and decodes the body as json.
    ///
    /// Any failure (transport exhausted, body not being json) is reported as an error,
    /// callers decide what a missing response means for their step.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<RequestBody>,
    ) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
        let mut request = self.client.request(method, url).headers(headers);

        request = match body {
            Some(RequestBody::Form(fields)) => request.form(&fields),
            Some(RequestBody::Json(value)) => request.json(&value),
            None => request,
        };

        let resp = match self.execute(request).await {
            Err(e) => {
                error!("请求失败: {e}");
                return Err(Box::new(e));
            }
            Ok(r) => r,
        };

        let text = resp.text().await?;

        match serde_json::from_str::<T>(&text) {
            Ok(r) => Ok(r),
            Err(e) => {
                error!("响应非 JSON 格式");
                debug!("{e}: {text}");
                Err(Box::new(MarketResponseError::new(format!(
                    "response of {url} is not json"
                ))))
            }
        }
    }

    /// GET that leaves 3xx answers untouched so their `Location` can be inspected
    pub async fn get_without_redirect(
        &self,
        url: &str,
        headers: HeaderMap,
        query: &[(&str, String)],
    ) -> Result<Response, reqwest::Error> {
        let request = self.no_redirect_client.get(url).headers(headers).query(query);

        self.execute(request).await
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, reqwest::Error> {
        let mut attempt = 0;

        loop {
            let current = match request.try_clone() {
                Some(r) => r,
                None => return request.send().await,
            };

            match current.send().await {
                Ok(r) => return Ok(r),
                Err(e) if attempt < self.retries => {
                    let delay = self.backoff * 2u32.pow(attempt);
                    attempt += 1;
                    warn!(
                        "request failed ({e}), retrying in {}ms ({attempt}/{})",
                        delay.as_millis(),
                        self.retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Plain client used for outbound notifications
pub fn http_client_factory() -> Result<Client, reqwest::Error> {
    debug!("creating HTTP client");

    reqwest::ClientBuilder::new()
        .timeout(Duration::from_secs(10))
        .build()
}
