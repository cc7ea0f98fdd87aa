use lazy_static::lazy_static;
use log::{error, info};
use regex::Regex;
use reqwest::{Method, Url};
use serde_json::Value;

use super::models::{Task, TaskList};
use crate::{
    core::{
        authenticator::MarketSession,
        common::{MarketHttpClient, MarketResponse},
        configuration::ApiConfiguration,
    },
    report::{TaskOutcome, TaskStatus},
};

lazy_static! {
    static ref COMPLEX_TASK: Regex = Regex::new("购买|秒杀").unwrap();
    static ref VIEW_TASK: Regex = Regex::new("浏览|查看").unwrap();
    static ref SHARE_TASK: Regex = Regex::new("分享").unwrap();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskAction {
    Skip,
    Done,
    View,
    Share,
    Unknown,
}

impl TaskAction {
    fn endpoint(&self) -> Option<&'static str> {
        match self {
            TaskAction::View => Some("checkView"),
            TaskAction::Share => Some("checkShare"),
            _ => None,
        }
    }
}

/// Decides what to do with a task from its name and progress.
///
/// Purchase and flash sale tasks are never attempted, finished tasks are left alone,
/// remaining ones are matched on their (chinese) name.
pub fn classify(task: &Task) -> TaskAction {
    let name = task.display_name();

    if COMPLEX_TASK.is_match(name) {
        return TaskAction::Skip;
    }

    if task.is_completed() {
        return TaskAction::Done;
    }

    if VIEW_TASK.is_match(name) {
        TaskAction::View
    } else if SHARE_TASK.is_match(name) {
        TaskAction::Share
    } else {
        TaskAction::Unknown
    }
}

pub struct TaskAgent<'a> {
    client: &'a MarketHttpClient,
    api: &'a ApiConfiguration,
    session: &'a MarketSession,
}

impl<'a> TaskAgent<'a> {
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

    /// Tasks of the activity, empty when the listing cannot be fetched
    pub async fn list(&self) -> Result<Vec<Task>, Box<dyn std::error::Error + Send + Sync>> {
        let url = format!(
            "{}?activityId={}",
            self.api
                .market_endpoint("promotion/activityTask/getAllActivityTasks"),
            self.api.activity_id
        );

        let res = self
            .client
            .send_json::<MarketResponse<Value>>(
                Method::GET,
                &url,
                self.session.headers(true)?,
                None,
            )
            .await;

        Ok(res
            .ok()
            .and_then(|r| r.data_as::<TaskList>())
            .map(|d| d.tasks)
            .unwrap_or_default())
    }

    pub async fn execute(
        &self,
        task: &Task,
    ) -> Result<TaskOutcome, Box<dyn std::error::Error + Send + Sync>> {
        let name = task.display_name().to_string();
        let action = classify(task);

        let endpoint = match (action, action.endpoint()) {
            (_, Some(e)) => e,
            (TaskAction::Skip, _) => {
                info!("[跳过复杂任务] {name}");
                return Ok(outcome(name, TaskStatus::Skip, "复杂任务跳过"));
            }
            (TaskAction::Done, _) => {
                info!("任务已完成：{name}");
                return Ok(outcome(name, TaskStatus::Done, "任务已完成无需执行"));
            }
            _ => {
                info!("无法识别任务类型：{name}");
                return Ok(outcome(name, TaskStatus::Unknown, "无法识别任务类型"));
            }
        };

        let url = Url::parse_with_params(
            &self
                .api
                .market_endpoint(&format!("promotion/activityTaskShare/{endpoint}")),
            &[("checkKey", task.param1.clone().unwrap_or_default())],
        )?;

        let res = self
            .client
            .send_json::<MarketResponse<Value>>(
                Method::POST,
                url.as_str(),
                self.session.headers(false)?,
                None,
            )
            .await;

        match res {
            Ok(r) if r.is_success() => {
                info!("任务完成：{name}");
                Ok(outcome(name, TaskStatus::Success, "任务执行成功"))
            }
            Ok(r) => {
                error!("任务失败：{name} {}", r.msg.unwrap_or_default());
                let code = r.code.map(|c| c.to_string()).unwrap_or_else(|| "未知".to_string());
                Ok(outcome(name, TaskStatus::Fail, &format!("响应码：{code}")))
            }
            Err(_) => {
                error!("任务失败：{name}");
                Ok(outcome(name, TaskStatus::Fail, "响应码：请求失败"))
            }
        }
    }
}

fn outcome(name: String, status: TaskStatus, reason: &str) -> TaskOutcome {
    TaskOutcome {
        name,
        status,
        reason: reason.to_string(),
    }
}
