use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION, COOKIE};
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct OnlineLoginResult {
    pub ecs_token: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct UserTokenResult {
    pub token: Option<String>,
}

pub fn online_login_form(
    token_online: &str,
    app_id: &str,
    reqtime: String,
) -> Vec<(String, String)> {
    vec![
        ("reqtime".to_string(), reqtime),
        ("netWay".to_string(), "Wifi".to_string()),
        ("version".to_string(), "android@11.0000".to_string()),
        ("token_online".to_string(), token_online.to_string()),
        ("appId".to_string(), app_id.to_string()),
        ("deviceModel".to_string(), "Mi10".to_string()),
        ("step".to_string(), "welcome".to_string()),
        ("androidId".to_string(), "e1d2c3b4a5f6".to_string()),
    ]
}

pub fn ecs_cookie(ecs_token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!("ecs_token={ecs_token}"))
}

/// Credentials of an authenticated account
#[derive(Clone, Debug)]
pub struct MarketSession {
    pub ecs_token: String,
    pub user_token: String,
}

impl MarketSession {
    /// Bearer headers for market calls, some listings also want the `ecs_token` cookie
    pub fn headers(&self, with_cookie: bool) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.user_token))?,
        );

        if with_cookie {
            headers.insert(COOKIE, ecs_cookie(&self.ecs_token)?);
        }

        Ok(headers)
    }
}
