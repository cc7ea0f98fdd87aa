use reqwest::Url;
use serde::Deserialize;
use std::path::Path;
use tokio::{fs::File, io::AsyncReadExt};

pub mod sections;

pub use sections::{
    ApiConfiguration, CoreConfiguration, LogConfiguration, NotifyConfiguration,
    WebhookConfiguration, WebhookKind,
};

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Configuration {
    pub api: ApiConfiguration,
    pub core: CoreConfiguration,
    pub notify: NotifyConfiguration,
    pub log: LogConfiguration,
}

impl Configuration {
    pub fn assert_webhook_is_valid(&self) -> Result<(), &str> {
        let webhook = match &self.notify.webhook {
            None => return Ok(()),
            Some(w) => w,
        };

        if !webhook.enable {
            return Ok(());
        }

        if webhook.url.trim().is_empty() {
            return Err("webhook is enabled but no url is configured");
        }

        if Url::parse(webhook.url.trim()).is_err() {
            return Err("webhook url cannot be parsed");
        }

        Ok(())
    }

    pub fn assert_api_urls_are_valid(&self) -> Result<(), &str> {
        if Url::parse(&self.api.client_url).is_err() {
            return Err("api.client_url cannot be parsed");
        }

        if Url::parse(&self.api.market_url).is_err() {
            return Err("api.market_url cannot be parsed");
        }

        Ok(())
    }
}

pub async fn get_configuration(
    file_path: String,
) -> Result<Configuration, Box<dyn std::error::Error + Send + Sync>> {
    let path = Path::new(&file_path);

    if !path.exists() {
        return Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("configuration file is missing: {file_path}"),
        )));
    }

    let mut file = File::open(path).await?;
    let mut buffer = vec![];

    file.read_to_end(&mut buffer).await?;

    let result = String::from_utf8(buffer)?;

    Ok(toml::from_str::<Configuration>(&result)?)
}
