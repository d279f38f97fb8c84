// ============================================================================
// 日志后端：实现 log::Log，同时输出到 stderr 和 <log_dir>/packager.log
// 行格式：<时间> - <模块> - <级别> - <消息>
// ============================================================================

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::utils::error::{AppError, AppResult};

/// 日志文件名
pub const LOG_FILE_NAME: &str = "packager.log";

/// 双路日志记录器：stderr + 追加写入的日志文件
pub struct PackagerLogger {
    level: LevelFilter,
    file: Option<Mutex<File>>,
}

impl PackagerLogger {
    /// 创建日志记录器，`log_dir` 为 None 时只输出到 stderr
    pub fn new(log_dir: Option<&Path>, level: LevelFilter) -> AppResult<Self> {
        let file = match log_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(|e| AppError::io_with_path(dir, e))?;
                let path = dir.join(LOG_FILE_NAME);
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .map_err(|e| AppError::io_with_path(&path, e))?;
                Some(Mutex::new(file))
            }
            None => None,
        };

        Ok(Self { level, file })
    }

    /// 格式化单条日志
    pub fn format_line(&self, record: &Record) -> String {
        format!(
            "{} - {} - {} - {}",
            timestamp(),
            record.target(),
            level_name(record.level()),
            record.args()
        )
    }
}

impl Log for PackagerLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = self.format_line(record);
        eprintln!("{}", line);

        if let Some(file) = &self.file {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{}", line);
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut f) = file.lock() {
                let _ = f.flush();
            }
        }
    }
}

/// 安装全局日志记录器
///
/// 重复安装时保留第一次的记录器，不视为错误。
pub fn init(log_dir: Option<&Path>, level: LevelFilter) -> AppResult<()> {
    let logger = PackagerLogger::new(log_dir, level)?;
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
    Ok(())
}

/// 将配置中的级别名解析为 LevelFilter，未知名称回退到 Info
pub fn parse_level(name: &str) -> LevelFilter {
    name.trim().parse().unwrap_or(LevelFilter::Info)
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

fn timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let fmt = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second],[subsecond digits:3]"
    );
    now.format(&fmt).unwrap_or_else(|_| now.to_string())
}

// ============================================================================
// 单元测试
// ============================================================================
