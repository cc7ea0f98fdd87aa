use log::{error, info};
use reqwest::{header::CONTENT_TYPE, header::HeaderValue, Method};
use serde_json::{json, Value};

use super::models::{PendingPrize, PendingPrizePage};
use crate::core::{
    authenticator::MarketSession,
    common::{MarketHttpClient, MarketResponse, RequestBody},
    configuration::ApiConfiguration,
};

pub const GRANT_DISABLED: &str = "自动领奖功能已关闭";
pub const NOTHING_PENDING: &str = "暂无待领取奖品";

pub struct PrizeAgent<'a> {
    client: &'a MarketHttpClient,
    api: &'a ApiConfiguration,
    session: &'a MarketSession,
}

impl<'a> PrizeAgent<'a> {
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

    pub async fn pending_prizes(
        &self,
    ) -> Result<Vec<PendingPrize>, Box<dyn std::error::Error + Send + Sync>> {
        let payload = json!({
            "id": self.api.activity_id,
            "type": 0,
            "page": 1,
            "limit": 100
        });

        let res = self
            .client
            .send_json::<MarketResponse<Value>>(
                Method::POST,
                &self
                    .api
                    .market_endpoint("promotion/home/raffleActivity/getMyPrize"),
                self.session.headers(false)?,
                Some(RequestBody::Json(payload)),
            )
            .await;

        Ok(res
            .ok()
            .and_then(|r| r.data_as::<PendingPrizePage>())
            .map(|p| p.list)
            .unwrap_or_default())
    }

    pub async fn grant(
        &self,
        prize: &PendingPrize,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let name = prize.prizes_name.clone().unwrap_or_default();
        let url = format!(
            "{}?activityId={}",
            self.api
                .market_endpoint("promotion/home/raffleActivity/grantPrize"),
            self.api.activity_id
        );

        let mut headers = self.session.headers(false)?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let payload = json!({ "recordId": prize.id.clone().unwrap_or(Value::Null) });

        let res = self
            .client
            .send_json::<MarketResponse<Value>>(
                Method::POST,
                &url,
                headers,
                Some(RequestBody::Json(payload)),
            )
            .await;

        match res {
            Ok(r) if r.is_success() => {
                info!("🎉 奖品领取成功：{name}");
                Ok(format!("✅ 领奖成功：{name}"))
            }
            Ok(r) => {
                error!("领奖失败：{name}");
                let code = r
                    .code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "未知".to_string());
                Ok(format!("❌ 领奖失败：{name}（响应码：{code}）"))
            }
            Err(_) => {
                error!("领奖失败：{name}");
                Ok(format!("❌ 领奖失败：{name}（响应码：请求失败）"))
            }
        }
    }

    /// Claims everything pending, or records why nothing was claimed
    pub async fn grant_all(
        &self,
        enabled: bool,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        if !enabled {
            info!("已关闭自动领奖功能，跳过领奖流程");
            return Ok(vec![GRANT_DISABLED.to_string()]);
        }

        let pending = self.pending_prizes().await?;

        if pending.is_empty() {
            info!("暂无待领取奖品");
            return Ok(vec![NOTHING_PENDING.to_string()]);
        }

        info!("发现 {} 个待领取奖品，开始领取...", pending.len());

        let mut details = vec![];
        for prize in pending.iter() {
            details.push(self.grant(prize).await?);
        }

        Ok(details)
    }
}
