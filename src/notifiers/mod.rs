use async_trait::async_trait;
use log::{error, info, warn};
use mockall::automock;

use crate::core::configuration::{Configuration, NotifyConfiguration};
use command::CommandNotifier;
use console::ConsoleNotifier;
use webhook::WebhookNotifier;

pub mod command;
pub mod console;
pub mod webhook;
mod tests;

/// A channel able to deliver the end of run report
#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> String;
    async fn send(&self, title: &str, body: &str)
        -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug)]
pub struct NotifierError {
    reason: String,
}

impl NotifierError {
    pub fn new(reason: String) -> Self {
        Self { reason }
    }
}

impl std::fmt::Display for NotifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for NotifierError {}

/// Tries each notifier in order until one delivers
pub struct NotificationDispatcher {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotificationDispatcher {
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    /// host hook, then webhook, then the log output
    pub fn from_configuration(conf: &Configuration) -> Self {
        let mut notifiers: Vec<Box<dyn Notifier>> = vec![];
        let notify: &NotifyConfiguration = &conf.notify;

        if let Some(command) = notify.hook_command.as_ref().filter(|c| !c.trim().is_empty()) {
            notifiers.push(Box::new(CommandNotifier::new(command.trim().to_string())));
        }

        if let Some(webhook) = notify.webhook.as_ref().filter(|w| w.enable) {
            match conf.assert_webhook_is_valid() {
                Ok(_) => match WebhookNotifier::new(webhook) {
                    Ok(n) => notifiers.push(Box::new(n)),
                    Err(e) => error!("cannot create webhook notifier: {e}"),
                },
                Err(e) => warn!("⚠️ 自定义通知未启用或未配置webhook: {e}"),
            }
        }

        notifiers.push(Box::new(ConsoleNotifier));

        Self::new(notifiers)
    }

    /// Name of the notifier that delivered, `None` when all of them failed
    pub async fn dispatch(&self, title: &str, body: &str) -> Option<String> {
        for notifier in self.notifiers.iter() {
            let name = notifier.name();

            match notifier.send(title, body).await {
                Ok(_) => {
                    info!("✅ {name} 通知发送成功");
                    return Some(name);
                }
                Err(e) => error!("⚠️ {name} 通知发送失败：{e}"),
            }
        }

        None
    }
}
