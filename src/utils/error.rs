// ============================================================================
// 统一错误类型定义
// 使用 thiserror 派生宏，所有组件统一返回 AppResult
// ============================================================================

use thiserror::Error;

/// 应用统一错误枚举
///
/// 每个变体对应一类错误，组件遇错立即返回，不做重试。
/// 由命令层（CLI）负责捕获并展示给用户。
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件不存在（主脚本、版本文件、虚拟环境激活脚本等）
    #[error("文件不存在：{0}")]
    NotFound(String),

    /// 格式错误（版本信息文件无法解析、图像无法解码）
    #[error("格式错误：{0}")]
    FormatError(String),

    /// 文件系统 IO 错误（目录无法读取、文件无法写入）
    #[error("IO 错误：{0}")]
    IoError(#[from] std::io::Error),

    /// 参数验证失败（如未指定主脚本或输出目录）
    #[error("验证失败：{0}")]
    ValidationError(String),

    /// 无法启动打包窗口
    #[error("启动打包失败：{0}")]
    LaunchError(String),

    /// 配置文件读取或解析失败
    #[error("配置错误：{0}")]
    ConfigError(String),
}

/// 便捷类型别名，统一项目内的 Result 签名
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// 带路径上下文的 IO 错误，保留原始 ErrorKind
    pub fn io_with_path(path: &std::path::Path, err: std::io::Error) -> Self {
        AppError::IoError(std::io::Error::new(
            err.kind(),
            format!("{}: {}", path.display(), err),
        ))
    }
}
