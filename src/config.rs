// ============================================================================
// 应用配置：可选 JSON 配置文件 + 命令行覆盖
// 配置以普通结构体显式传递给各组件，组件本身不持有全局状态
// ============================================================================

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::services::command_builder::DEFAULT_PROGRAM;
use crate::utils::error::{AppError, AppResult};

/// 未指定 --config 时在当前目录查找的配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "py-packager.json";

/// 应用设置
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// 日志目录，日志写入 `<log_dir>/packager.log`
    pub log_dir: PathBuf,
    /// 日志级别（error / warn / info / debug / trace）
    pub log_level: String,
    /// 打包工具程序名
    pub pyinstaller: String,
    /// 是否在新终端窗口中执行打包
    pub new_window: bool,
    /// 默认是否生成单文件
    pub default_onefile: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            log_level: "info".to_string(),
            pyinstaller: DEFAULT_PROGRAM.to_string(),
            new_window: true,
            default_onefile: true,
        }
    }
}

/// 加载配置
///
/// - 显式指定的配置文件不存在 → ConfigError
/// - 未指定时读取当前目录下的 py-packager.json（不存在则使用默认值）
pub fn load_config(explicit: Option<&Path>) -> AppResult<AppConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(AppError::ConfigError(format!(
                    "配置文件不存在：{}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.is_file() {
                return Ok(AppConfig::default());
            }
            fallback
        }
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| AppError::ConfigError(format!("无法读取 {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| AppError::ConfigError(format!("无法解析 {}: {}", path.display(), e)))
}

// ============================================================================
// 单元测试
// ============================================================================
