use std::time::Duration;

use log::{error, info};

use crate::{
    core::{
        accounts::AccountCredential, authenticator::Authenticator, common::MarketHttpClient,
        configuration::Configuration,
    },
    notifiers::NotificationDispatcher,
    report::{AccountResult, Report},
    workflow::AccountWorkflow,
};

/// ### Run every account and notify
/// Accounts are processed one after the other, `core.account_delay` seconds apart.
/// A failing account never stops the run, its failure is part of the report.
/// ## Arguments
/// * `conf` - The configuration object
/// * `accounts` - The parsed accounts
/// ## Returns
/// * `Report` - The report handed to the notifiers
pub async fn run(conf: Configuration, accounts: Vec<AccountCredential>) -> Report {
    info!(
        "自动领奖功能状态: {}",
        if conf.core.auto_grant { "开启" } else { "关闭" }
    );

    let mut results: Vec<AccountResult> = vec![];

    if let Err(e) = process_accounts(&conf, &accounts, &mut results).await {
        error!("处理账号列表全局异常：{e}");
        results.push(AccountResult::global_failure(&e.to_string()));
    }

    info!("===== 开始执行通知流程 =====");

    let report = Report::new(&results);
    let dispatcher = NotificationDispatcher::from_configuration(&conf);

    if dispatcher.dispatch(&report.title, &report.body).await.is_none() {
        error!("❌ 所有通知渠道均发送失败");
    }

    report
}

async fn process_accounts(
    conf: &Configuration,
    accounts: &[AccountCredential],
    results: &mut Vec<AccountResult>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let client = MarketHttpClient::new(&conf.api)?;
    let workflow = AccountWorkflow::new(client, conf.clone());

    for account in accounts.iter() {
        let task_workflow = workflow.clone();
        let task_account = account.clone();

        // a panicking account must not take the others down
        let handle = tokio::spawn(async move { task_workflow.run(&task_account).await });

        let result = match handle.await {
            Ok(r) => r,
            Err(e) => {
                error!("账号 {} 执行异常: {e}", account.phone);
                AccountResult::failure(&account.phone, format!("执行异常: {e}"))
            }
        };

        results.push(result);

        tokio::time::sleep(Duration::from_secs(conf.core.account_delay)).await;
    }

    Ok(())
}

/// ### Session diagnostic
/// Authenticates every account without touching tasks, raffle or prizes
/// ## Arguments
/// * `conf` - The configuration object
/// * `accounts` - The parsed accounts
/// * `show_token` - Whether to print the obtained tokens or not
pub async fn session_diagnostic(
    conf: Configuration,
    accounts: Vec<AccountCredential>,
    show_token: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let client = MarketHttpClient::new(&conf.api)?;
    let authenticator = Authenticator::new(&client, &conf.api);

    for account in accounts.iter() {
        match authenticator.authenticate(account).await {
            Ok(session) => {
                info!("{} session ok", account.phone);
                if show_token {
                    println!("{} ECS_TOKEN: {}", account.phone, session.ecs_token);
                    println!("{} USER_TOKEN: {}", account.phone, session.user_token);
                }
            }
            Err(e) => error!("{} session failed: {e}", account.phone),
        }
    }

    Ok(())
}
