use std::time::Duration;

use log::{error, info};

use crate::{
    core::{
        accounts::AccountCredential,
        authenticator::{authentication_error::AuthenticationError, Authenticator},
        common::MarketHttpClient,
        configuration::Configuration,
    },
    report::AccountResult,
};
use prizes::PrizeAgent;
use raffle::{RaffleAgent, NOT_FLUSHING};
use tasks::TaskAgent;

pub mod models;
pub mod prizes;
pub mod raffle;
pub mod tasks;
mod tests;

/// Login, tasks, raffle and prize claiming for one account at a time
#[derive(Clone)]
pub struct AccountWorkflow {
    client: MarketHttpClient,
    conf: Configuration,
}

impl AccountWorkflow {
    pub fn new(client: MarketHttpClient, conf: Configuration) -> Self {
        Self { client, conf }
    }

    /// Never fails, whatever happens ends up in the returned record
    pub async fn run(&self, account: &AccountCredential) -> AccountResult {
        info!("\n===== 开始处理账号：{} =====", account.phone);

        let mut result = AccountResult::new(&account.phone);

        if let Err(e) = self.execute(account, &mut result).await {
            error!("账号 {} 执行异常: {e}", account.phone);
            result.message = format!("执行异常: {e}");
        }

        result
    }

    async fn execute(
        &self,
        account: &AccountCredential,
        result: &mut AccountResult,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let api = &self.conf.api;
        let authenticator = Authenticator::new(&self.client, api);

        let session = match authenticator.authenticate(account).await {
            Ok(s) => s,
            Err(e) => {
                if let Some(auth_error) = e.downcast_ref::<AuthenticationError>() {
                    result.message = auth_error.reason().to_string();
                    return Ok(());
                }
                return Err(e);
            }
        };

        let task_agent = TaskAgent::new(&self.client, api, &session);
        for task in task_agent.list().await?.iter() {
            result.record_task(task_agent.execute(task).await?);
        }

        info!("检查抽奖池放水情况...");
        let raffle_agent = RaffleAgent::new(&self.client, api, &session);
        if raffle_agent.is_flushing().await? {
            info!("✔ 抽奖池已放水，开始抽奖");
            let (count, details) = raffle_agent
                .draw_all(Duration::from_secs(self.conf.core.raffle_delay))
                .await?;
            result.raffle_count = count;
            result.raffle_details = details;
        } else {
            info!("❌ 今日未放水，跳过抽奖");
            result.raffle_details = vec![NOT_FLUSHING.to_string()];
        }

        result.grant_details = PrizeAgent::new(&self.client, api, &session)
            .grant_all(self.conf.core.auto_grant)
            .await?;

        result.success = true;
        result.message = "执行完成".to_string();
        info!("===== 账号 {} 处理完成 =====\n", account.phone);

        Ok(())
    }
}
