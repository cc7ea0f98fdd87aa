use async_trait::async_trait;
use log::info;

use super::Notifier;

/// Last resort, writes the report to the log
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> String {
        "console".to_string()
    }

    async fn send(
        &self,
        title: &str,
        body: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("⚠️ 未配置任何通知渠道，以下是精细化通知内容：");
        info!("{title}\n\n{body}");
        Ok(())
    }
}
