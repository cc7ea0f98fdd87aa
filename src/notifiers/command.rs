use async_trait::async_trait;
use log::debug;
use tokio::process::Command;

use super::{Notifier, NotifierError};

/// Hands the report to a notification command provided by the host
/// (e.g. the panel running the job), as `<command> <title> <body>`
pub struct CommandNotifier {
    program: String,
}

impl CommandNotifier {
    pub fn new(program: String) -> Self {
        Self { program }
    }
}

#[async_trait]
impl Notifier for CommandNotifier {
    fn name(&self) -> String {
        format!("hook ({})", self.program)
    }

    async fn send(
        &self,
        title: &str,
        body: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        debug!("running notification hook {}", self.program);

        let status = Command::new(&self.program)
            .arg(title)
            .arg(body)
            .status()
            .await?;

        if !status.success() {
            return Err(Box::new(NotifierError::new(format!(
                "{} exited with {status}",
                self.program
            ))));
        }

        Ok(())
    }
}
