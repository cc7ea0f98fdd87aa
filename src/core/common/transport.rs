use std::fmt::Display;

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Envelope shared by every `/prod-api` endpoint of the market
#[derive(Deserialize, Clone, Debug)]
pub struct MarketResponse<T> {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub code: Option<i64>,
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T> MarketResponse<T> {
    pub fn is_success(&self) -> bool {
        self.code == Some(200)
    }
}

impl MarketResponse<Value> {
    /// Typed view of `data`, `None` when it is missing or shaped differently.
    ///
    /// Endpoints are decoded as `MarketResponse<Value>` first so that an odd `data`
    /// never hides `code`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.data.as_ref().and_then(|d| T::deserialize(d).ok())
    }
}

#[derive(Debug)]
pub enum RequestBody {
    Form(Vec<(String, String)>),
    Json(Value),
}

#[derive(Debug)]
pub struct MarketResponseError {
    pub reason: String,
}

impl MarketResponseError {
    pub fn new(reason: String) -> Self {
        Self { reason }
    }
}

impl Display for MarketResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for MarketResponseError {}

/// Accepts `200`, `"200"` or `null`
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

/// Renders scalar json values as plain strings, `null` as `None`
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Null) | None => None,
        Some(v) => Some(v.to_string()),
    })
}
