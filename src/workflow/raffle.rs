use std::time::Duration;

use log::{error, info};
use reqwest::Method;
use serde_json::Value;

use super::models::{CatalogPrize, DrawResult};
use crate::core::{
    authenticator::MarketSession,
    common::{MarketHttpClient, MarketResponse},
    configuration::ApiConfiguration,
};

/// A catalogue prize containing this marker ("monthly" card/membership) means the pool is flushing
pub const FLUSH_MARKER: &str = "月";

pub const NOT_FLUSHING: &str = "今日未放水，跳过抽奖";

pub struct RaffleAgent<'a> {
    client: &'a MarketHttpClient,
    api: &'a ApiConfiguration,
    session: &'a MarketSession,
}

impl<'a> RaffleAgent<'a> {
    pub fn new(
        client: &'a MarketHttpClient,
        api: &'a ApiConfiguration,
        session: &'a MarketSession,
    ) -> Self {
        Self {
            client,
            api,
            session,
        }
    }

    fn endpoint(&self, name: &str, extra: &str) -> String {
        format!(
            "{}?id={}{}",
            self.api
                .market_endpoint(&format!("promotion/home/raffleActivity/{name}")),
            self.api.activity_id,
            extra
        )
    }

    /// Whether high value prizes are currently in the pool
    pub async fn is_flushing(&self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let res = self
            .client
            .send_json::<MarketResponse<Value>>(
                Method::POST,
                &self.endpoint("prizeList", ""),
                self.session.headers(false)?,
                None,
            )
            .await;

        let prizes = res
            .ok()
            .and_then(|r| r.data_as::<Vec<CatalogPrize>>())
            .unwrap_or_default();

        Ok(prizes
            .iter()
            .any(|p| p.name.as_deref().unwrap_or("").contains(FLUSH_MARKER)))
    }

    pub async fn draw_count(
        &self,
    ) -> Result<Option<u64>, Box<dyn std::error::Error + Send + Sync>> {
        let res = self
            .client
            .send_json::<MarketResponse<Value>>(
                Method::POST,
                &self.endpoint("getUserRaffleCount", ""),
                self.session.headers(false)?,
                None,
            )
            .await;

        let resp = match res {
            Ok(r) => r,
            Err(_) => return Ok(None),
        };

        let count = match resp.data {
            Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
            _ => 0,
        };

        Ok(Some(count))
    }

    /// Uses every remaining draw, one at a time, `delay` apart
    pub async fn draw_all(
        &self,
        delay: Duration,
    ) -> Result<(u64, Vec<String>), Box<dyn std::error::Error + Send + Sync>> {
        let count = match self.draw_count().await? {
            Some(c) => c,
            None => return Ok((0, vec![])),
        };

        info!("当前剩余抽奖次数：{count}");

        let mut details = vec![];

        for _ in 0..count {
            details.push(self.draw_once().await?);
            tokio::time::sleep(delay).await;
        }

        Ok((count, details))
    }

    pub async fn draw_once(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let res = self
            .client
            .send_json::<MarketResponse<Value>>(
                Method::POST,
                &self.endpoint("userRaffle", "&channel="),
                self.session.headers(false)?,
                None,
            )
            .await;

        let resp = match res {
            Ok(r) => r,
            Err(_) => {
                error!("抽奖请求失败");
                return Ok("❌ 抽奖请求失败".to_string());
            }
        };

        if !resp.is_success() {
            error!("抽奖失败");
            let code = resp
                .code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "未知".to_string());
            return Ok(format!("❌ 抽奖失败（响应码：{code}）"));
        }

        let draw = resp.data_as::<DrawResult>().unwrap_or(DrawResult {
            prizes_name: None,
            message: None,
        });

        let label = draw
            .prizes_name
            .filter(|p| !p.is_empty())
            .or(draw.message)
            .unwrap_or_default();

        let result = format!("🎁 {label}");
        info!("抽奖结果：{result}");

        Ok(result)
    }
}
