use flexi_logger::{
    filter::{self, LogLineFilter},
    Age, Cleanup, Criterion, DeferredNow, Duplicate, FileSpec, Logger, LoggerHandle, Naming,
};
use log::{LevelFilter, Record};

use super::configuration::LogConfiguration;

const DEFAULT_LOG_DIRECTORY: &str = "./unicom_logs";
const DEFAULT_RETENTION: usize = 7;

pub struct IgnoreReqwest;

impl LogLineFilter for IgnoreReqwest {
    fn write(
        &self,
        now: &mut flexi_logger::DeferredNow,
        record: &log::Record,
        log_line_writer: &dyn filter::LogLineWriter,
    ) -> std::io::Result<()> {
        let path = record.module_path().unwrap_or_default();

        if path.starts_with("reqwest") || path.starts_with("hyper") {
            return Ok(());
        }

        log_line_writer.write(now, record)
    }
}

/// `[2024-01-01 08:00:00.123] message`
pub fn millis_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "[{}] {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        record.args()
    )
}

/// Logs to stdout and to daily files `unicom_task_*.log`, the handle must be kept alive
pub fn init(
    conf: &LogConfiguration,
    verbosity: Option<LevelFilter>,
) -> Result<LoggerHandle, flexi_logger::FlexiLoggerError> {
    let level = match verbosity {
        Some(v) => v.to_string(),
        None => conf.level.clone().unwrap_or_else(|| "info".to_string()),
    }
    .to_lowercase();

    let directory = conf
        .directory
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_DIRECTORY.to_string());

    Logger::try_with_str(level)?
        .log_to_file(
            FileSpec::default()
                .directory(directory)
                .basename("unicom_task"),
        )
        .duplicate_to_stdout(Duplicate::All)
        .format(millis_format)
        .filter(Box::new(IgnoreReqwest))
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(conf.retention.unwrap_or(DEFAULT_RETENTION)),
        )
        .start()
}
