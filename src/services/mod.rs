// ============================================================================
// 业务层：纯 Rust 核心逻辑
// ✅ 特点：不依赖命令行解析，保持纯净，方便写 #[test]
// ⛔ 禁止：直接打印到 stdout（输出由 commands 层负责）
// ============================================================================

pub mod command_builder;
pub mod icon_converter;
pub mod launcher;
pub mod platform;
pub mod scanner;
pub mod version_parser;

// ============================================================================
// 常量定义
// ============================================================================

/// 版本信息文件的保留文件名
pub const VERSION_FILE_NAME: &str = "versionmark.txt";

/// 依赖清单的保留文件名
pub const REQUIREMENTS_FILE_NAME: &str = "requirements.txt";

/// 虚拟环境目录名（只按名称识别，不检查内容）
pub const VENV_DIR_NAME: &str = "venv";

/// 默认输出目录名（位于主脚本所在目录下）
pub const DEFAULT_DIST_DIR: &str = "dist";

/// 主脚本扩展名
pub const SCRIPT_EXTENSION: &str = "py";

/// 识别为图标的扩展名
pub const ICON_EXTENSIONS: &[&str] = &["ico", "png", "jpg", "jpeg"];

/// 识别为数据文件的扩展名
pub const DATA_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "xml", "csv", "txt"];

/// 图标转换输出的固定尺寸（升序）
pub const ICON_SIZES: &[u32] = &[16, 32, 48, 64, 128];
