use std::fmt::Write;

use log::{error, info, warn};
use serde::Serialize;


pub const TITLE_WITH_FAILURES: &str = "📱 联通权益超市任务通知【含失败】";
pub const TITLE_ALL_SUCCESS: &str = "📱 联通权益超市任务通知【全部成功】";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Success,
    Fail,
    Skip,
    Done,
    Unknown,
}

/// Outcome of one task, `reason` is shown for fail/skip/unknown entries
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskOutcome {
    pub name: String,
    pub status: TaskStatus,
    pub reason: String,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub success: u32,
    pub fail: u32,
    pub skip: u32,
    pub done: u32,
    pub unknown: u32,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskDetails {
    pub success: Vec<String>,
    pub fail: Vec<String>,
    pub skip: Vec<String>,
    pub done: Vec<String>,
    pub unknown: Vec<String>,
}

/// Everything gathered while processing one account
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct AccountResult {
    pub phone: String,
    pub success: bool,
    pub message: String,
    pub task_stats: TaskStats,
    pub task_details: TaskDetails,
    pub raffle_count: u64,
    pub raffle_details: Vec<String>,
    pub grant_details: Vec<String>,
}

impl AccountResult {
    pub fn new(phone: &str) -> Self {
        Self {
            phone: phone.to_string(),
            success: false,
            message: String::new(),
            task_stats: TaskStats::default(),
            task_details: TaskDetails::default(),
            raffle_count: 0,
            raffle_details: vec![],
            grant_details: vec![],
        }
    }

    pub fn failure(phone: &str, message: String) -> Self {
        let mut result = Self::new(phone);
        result.message = message;
        result
    }

    pub fn global_failure(reason: &str) -> Self {
        Self::failure("全局异常", format!("脚本执行异常：{reason}"))
    }

    pub fn no_valid_account() -> Self {
        Self::failure(
            "无有效账号",
            "未配置UNICOM_ACCOUNTS或配置格式错误".to_string(),
        )
    }

    pub fn record_task(&mut self, outcome: TaskOutcome) {
        let with_reason = format!("{}（{}）", outcome.name, outcome.reason);

        match outcome.status {
            TaskStatus::Success => {
                self.task_stats.success += 1;
                self.task_details.success.push(outcome.name);
            }
            TaskStatus::Fail => {
                self.task_stats.fail += 1;
                self.task_details.fail.push(with_reason);
            }
            TaskStatus::Skip => {
                self.task_stats.skip += 1;
                self.task_details.skip.push(with_reason);
            }
            TaskStatus::Done => {
                self.task_stats.done += 1;
                self.task_details.done.push(outcome.name);
            }
            TaskStatus::Unknown => {
                self.task_stats.unknown += 1;
                self.task_details.unknown.push(with_reason);
            }
        }
    }
}

/// Title and body of the end of run notification
pub struct Report {
    pub title: String,
    pub body: String,
}

impl Report {
    pub fn new(results: &[AccountResult]) -> Self {
        info!("===== 进入通知函数 ===== | 账号结果数量: {}", results.len());

        let fallback;
        let results = if results.is_empty() {
            warn!("⚠️ 无任何账号执行结果");
            fallback = vec![AccountResult::no_valid_account()];
            &fallback[..]
        } else {
            results
        };

        let title = build_title(results).to_string();

        let body = match build_body(results, chrono::Local::now()) {
            Ok(b) => {
                info!("精细化通知内容构建完成 | 内容长度：{}", b.chars().count());
                b
            }
            Err(e) => {
                error!("构建通知内容异常: {e}");
                degraded_body(&e.to_string(), results)
            }
        };

        Self { title, body }
    }
}

pub fn has_failures(results: &[AccountResult]) -> bool {
    results
        .iter()
        .any(|r| !r.success || r.task_stats.fail > 0)
}

pub fn build_title(results: &[AccountResult]) -> &'static str {
    if has_failures(results) {
        TITLE_WITH_FAILURES
    } else {
        TITLE_ALL_SUCCESS
    }
}

pub fn build_body<Tz: chrono::TimeZone>(
    results: &[AccountResult],
    finished_at: chrono::DateTime<Tz>,
) -> Result<String, std::fmt::Error>
where
    Tz::Offset: std::fmt::Display,
{
    let success_count = results.iter().filter(|r| r.success).count();
    let failure_count = results.len() - success_count;

    let mut out = String::new();

    writeln!(out, "📊 全局执行汇总")?;
    writeln!(
        out,
        "✅ 成功账号：{success_count}  |  ❌ 失败账号：{failure_count}"
    )?;
    writeln!(out, "{}", "=".repeat(30))?;

    for (index, res) in results.iter().enumerate() {
        let status = if res.success { "✅ 成功" } else { "❌ 失败" };
        let message = if res.message.is_empty() {
            "无详情"
        } else {
            res.message.as_str()
        };

        writeln!(out, "\n{}. 📱 手机号：{}", index + 1, res.phone)?;
        writeln!(out, "   📈 执行状态：{status}")?;
        writeln!(out, "   💡 执行说明：{message}")?;

        let stats = &res.task_stats;
        writeln!(out, "\n   📋 任务统计：")?;
        writeln!(
            out,
            "   成：{} | 败：{} | 跳：{} | 完：{} | 未知：{}",
            stats.success, stats.fail, stats.skip, stats.done, stats.unknown
        )?;

        let details = &res.task_details;
        for (label, entries) in [
            ("  ✅ 成功任务：", &details.success),
            ("  ❌ 失败任务：", &details.fail),
            ("  ⏭️  跳过任务：", &details.skip),
            ("  ✔ 已完成任务：", &details.done),
            ("  ❓ 未知任务：", &details.unknown),
        ] {
            if !entries.is_empty() {
                writeln!(out, "{label}{}", entries.join(", "))?;
            }
        }

        writeln!(out, "\n   🎰 抽奖详情：")?;
        writeln!(out, "       抽奖次数：{}", res.raffle_count)?;
        writeln!(out, "       抽奖结果：{}", res.raffle_details.join("; "))?;

        writeln!(out, "   🎁 领奖详情：")?;
        writeln!(out, "       {}", res.grant_details.join("；"))?;

        writeln!(out, "{}", "-".repeat(30))?;
    }

    write!(
        out,
        "\n🕒 执行完成时间：{}",
        finished_at.format("%Y-%m-%d %H:%M:%S")
    )?;

    Ok(out)
}

pub fn degraded_body(reason: &str, results: &[AccountResult]) -> String {
    let dump = serde_json::to_string_pretty(results).unwrap_or_else(|e| e.to_string());

    format!("⚠️ 通知内容构建失败：{reason}\n账号结果：{dump}")
}
