use crate::core::{
    accounts::{AccountCredential, LoginMethod},
    common::{MarketHttpClient, MarketResponse, RequestBody},
    configuration::ApiConfiguration,
};
use authentication_error::{
    AuthenticationError, ONLINE_LOGIN_FAILED, TICKET_FAILED, USER_TOKEN_FAILED,
};
use common::{ecs_cookie, online_login_form, OnlineLoginResult, UserTokenResult};
use log::{debug, error, info};
use reqwest::{
    header::{HeaderMap, HeaderValue, LOCATION, ORIGIN, REFERER, USER_AGENT},
    Method, Url,
};
use serde_json::Value;

pub mod authentication_error;
pub mod common;
pub use common::MarketSession;

const TICKET_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10; MI 10) \
AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 \
Chrome/108.0.5359.128 Mobile Safari/537.36 \
unicom{version:android@11.0500}";

const CLIENT_VERSION: &str = "android@11.0500";

/// Turns account credentials into a market session:
/// `ecs_token` (direct or online login) -> redirect `ticket` -> `userToken`
pub struct Authenticator<'a> {
    client: &'a MarketHttpClient,
    api: &'a ApiConfiguration,
}

impl<'a> Authenticator<'a> {
    pub fn new(client: &'a MarketHttpClient, api: &'a ApiConfiguration) -> Self {
        Self { client, api }
    }

    /// Runs the whole chain for one account.
    ///
    /// Step failures come back as [`AuthenticationError`], anything else (e.g. a token
    /// that cannot be sent as a header) is returned untouched.
    pub async fn authenticate(
        &self,
        account: &AccountCredential,
    ) -> Result<MarketSession, Box<dyn std::error::Error + Send + Sync>> {
        let ecs_token = match &account.login {
            LoginMethod::SessionToken(t) => t.to_owned(),
            LoginMethod::OnlineToken {
                token_online,
                app_id,
            } => {
                self.login_with_online_token(&account.phone, token_online, app_id)
                    .await?
            }
        };

        let ticket = self.get_ticket(&ecs_token).await?;
        info!("✔ ticket 获取成功");

        let user_token = self.get_user_token(&ticket).await?;
        info!("✔ userToken 获取成功");

        Ok(MarketSession {
            ecs_token,
            user_token,
        })
    }

    pub async fn login_with_online_token(
        &self,
        phone: &str,
        token_online: &str,
        app_id: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        debug!("online login for {phone}");

        let form = online_login_form(token_online, app_id, reqtime());

        let res = self
            .client
            .send_json::<OnlineLoginResult>(
                Method::POST,
                &self.api.client_endpoint("onLine.htm"),
                HeaderMap::new(),
                Some(RequestBody::Form(form)),
            )
            .await;

        match res.ok().and_then(|r| r.ecs_token).filter(|t| !t.is_empty()) {
            Some(token) => {
                info!("{phone} token 登录成功");
                Ok(token)
            }
            None => {
                error!("{phone} token 登录失败");
                Err(Box::new(AuthenticationError::new(
                    ONLINE_LOGIN_FAILED.to_string(),
                )))
            }
        }
    }

    pub async fn get_ticket(
        &self,
        ecs_token: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        debug!("fetching ticket");

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(TICKET_USER_AGENT));
        headers.insert(
            "x-requested-with",
            HeaderValue::from_static("com.sinovatech.unicom.ui"),
        );
        headers.insert(ORIGIN, HeaderValue::from_static("https://img.client.10010.com"));
        headers.insert(REFERER, HeaderValue::from_static("https://img.client.10010.com/"));
        headers.insert(reqwest::header::COOKIE, ecs_cookie(ecs_token)?);

        let query = [
            ("to_url", self.api.market_redirect_url.clone()),
            ("reqtime", reqtime()),
            ("version", CLIENT_VERSION.to_string()),
        ];

        let resp = match self
            .client
            .get_without_redirect(
                &self.api.client_endpoint("openPlatform/openPlatLine.htm"),
                headers,
                &query,
            )
            .await
        {
            Ok(r) => r,
            Err(e) => {
                error!("❌ ticket 请求失败: {e}");
                return Err(Box::new(AuthenticationError::new(TICKET_FAILED.to_string())));
            }
        };

        let location = match resp.headers().get(LOCATION).and_then(|l| l.to_str().ok()) {
            Some(l) => l.to_string(),
            None => {
                error!("❌ 联通拒绝跳转（无 Location）");
                return Err(Box::new(AuthenticationError::new(TICKET_FAILED.to_string())));
            }
        };

        match extract_ticket(&location) {
            Some(t) => Ok(t),
            None => {
                error!("❌ 获取 ticket 失败");
                Err(Box::new(AuthenticationError::new(TICKET_FAILED.to_string())))
            }
        }
    }

    pub async fn get_user_token(
        &self,
        ticket: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        debug!("exchanging ticket for userToken");

        let url = Url::parse_with_params(
            &self.api.market_endpoint("auth/marketUnicomLogin"),
            &[("ticket", ticket)],
        )?;

        let res = self
            .client
            .send_json::<MarketResponse<Value>>(
                Method::POST,
                url.as_str(),
                HeaderMap::new(),
                None,
            )
            .await;

        match res
            .ok()
            .and_then(|r| r.data_as::<UserTokenResult>())
            .and_then(|d| d.token)
            .filter(|t| !t.is_empty())
        {
            Some(token) => Ok(token),
            None => {
                error!("❌ 获取 userToken 失败");
                Err(Box::new(AuthenticationError::new(
                    USER_TOKEN_FAILED.to_string(),
                )))
            }
        }
    }
}

/// Reads the `ticket` query parameter of a redirect target
pub fn extract_ticket(location: &str) -> Option<String> {
    let url = match Url::parse(location) {
        Ok(u) => u,
        Err(_) => Url::parse("http://localhost/").ok()?.join(location).ok()?,
    };

    url.query_pairs()
        .find(|(k, _)| k == "ticket")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

fn reqtime() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}
