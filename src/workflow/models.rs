use serde::Deserialize;
use serde_json::Value;

use crate::core::common::transport::{lenient_i64, lenient_string};

#[derive(Deserialize, Clone, Debug, Default)]
pub struct TaskList {
    #[serde(default, rename = "activityTaskUserDetailVOList")]
    pub tasks: Vec<Task>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Task {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// number of completions required
    #[serde(default, rename = "triggerTime", deserialize_with = "lenient_i64")]
    pub trigger_time: Option<i64>,
    /// number of completions so far
    #[serde(default, rename = "triggeredTime", deserialize_with = "lenient_i64")]
    pub triggered_time: Option<i64>,
    /// key of the completion call
    #[serde(default, deserialize_with = "lenient_string")]
    pub param1: Option<String>,
}

impl Task {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("未知任务")
    }

    pub fn is_completed(&self) -> bool {
        self.triggered_time.unwrap_or(0) >= self.trigger_time.unwrap_or(1)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct CatalogPrize {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DrawResult {
    #[serde(default, rename = "prizesName")]
    pub prizes_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct PendingPrizePage {
    #[serde(default)]
    pub list: Vec<PendingPrize>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct PendingPrize {
    /// record identifier, sent back verbatim when claiming
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, rename = "prizesName")]
    pub prizes_name: Option<String>,
}
