// ============================================================================
// 打包命令构造：根据 BuildRequest 生成 PyInstaller 参数序列
// ✅ 只能做：参数验证、参数拼装、命令行渲染
// ⛔ 禁止：启动进程（由 launcher 负责）
// ============================================================================

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::models::dtos::{BuildCommand, BuildRequest, VersionInfo};
use crate::services::platform::PlatformStrategy;
use crate::services::scanner::project_dir_of;
use crate::services::version_parser::parse_version_file;
use crate::utils::error::{AppError, AppResult};

/// 默认的打包工具程序名
pub const DEFAULT_PROGRAM: &str = "pyinstaller";

/// 验证打包参数：主脚本与输出目录必须指定，主脚本必须存在
pub fn validate_build_request(request: &BuildRequest) -> AppResult<()> {
    let no_script = request.script_path.as_os_str().is_empty();
    let no_output = request.output_dir.as_os_str().is_empty();

    match (no_script, no_output) {
        (true, true) => Err(AppError::ValidationError(
            "请选择主脚本文件和输出目录".to_string(),
        )),
        (true, false) => Err(AppError::ValidationError("请选择主脚本文件".to_string())),
        (false, true) => Err(AppError::ValidationError("请选择输出目录".to_string())),
        (false, false) => {
            if request.script_path.is_file() {
                Ok(())
            } else {
                Err(AppError::NotFound(format!(
                    "主脚本 {}",
                    request.script_path.display()
                )))
            }
        }
    }
}

/// 路径参数加双引号，不做其他转义（路径中含双引号不受支持）
pub fn quote_path(path: &Path) -> String {
    format!("\"{}\"", path.display())
}

/// 由版本信息推导输出文件名：`{ProductName}_v{ProductVersion 点号换下划线}`
///
/// 任一字段为空时返回 None，沿用打包工具的默认命名。
pub fn output_base_name(info: &VersionInfo) -> Option<String> {
    let product_name = info.product_name.trim();
    let product_version = info.product_version.trim();

    if product_name.is_empty() || product_version.is_empty() {
        return None;
    }

    Some(format!(
        "{}_v{}",
        product_name,
        product_version.replace('.', "_")
    ))
}

/// 读取版本文件并推导输出文件名
pub fn resolve_output_name(version_file: Option<&Path>) -> AppResult<Option<String>> {
    let Some(path) = version_file else {
        return Ok(None);
    };

    let info = parse_version_file(path)?;
    let name = output_base_name(&info);
    match &name {
        Some(name) => log::info!("使用版本信息命名: {}", name),
        None => log::info!("版本信息缺少产品名称或版本号，使用默认名称"),
    }
    Ok(name)
}

/// 合并额外文件，保持首次出现的顺序并去重
pub fn merge_extra_files<I>(groups: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut seen = HashSet::new();
    groups
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

/// 构造打包命令
///
/// 指定虚拟环境时先检查激活脚本，缺失则在生成任何参数前返回 NotFound。
pub fn build_command(
    request: &BuildRequest,
    platform: &dyn PlatformStrategy,
    program: &str,
) -> AppResult<BuildCommand> {
    // 1. 虚拟环境激活前缀
    let activation = match &request.venv_path {
        Some(venv) => {
            let script = platform.activation_script(venv);
            if !script.is_file() {
                return Err(AppError::NotFound(format!(
                    "虚拟环境激活脚本 {}",
                    script.display()
                )));
            }
            Some(platform.activation_prefix(&script))
        }
        None => None,
    };

    // 2. 由版本信息决定输出名称
    let output_name = resolve_output_name(request.version_file.as_deref())?;

    // 3. 拼装参数
    let mut args: Vec<String> = Vec::new();

    if request.onefile {
        args.push("--onefile".to_string());
    } else {
        args.push("--onedir".to_string());
    }

    args.push("--distpath".to_string());
    args.push(quote_path(&request.output_dir));

    if let Some(name) = output_name {
        args.push("--name".to_string());
        args.push(format!("\"{}\"", name));
    }

    if let Some(icon) = &request.icon_path {
        args.push("--icon".to_string());
        args.push(quote_path(icon));
    }

    if let Some(version_file) = &request.version_file {
        args.push("--version-file".to_string());
        args.push(quote_path(version_file));
    }

    let separator = platform.data_separator();
    for file in &request.extra_files {
        args.push("--add-data".to_string());
        args.push(format!("\"{}{}.\"", file.display(), separator));
    }

    // 4. 主脚本作为最后一个位置参数
    args.push(quote_path(&request.script_path));

    Ok(BuildCommand {
        activation,
        program: program.to_string(),
        args,
        work_dir: project_dir_of(&request.script_path)?,
    })
}

/// 渲染为单行命令
pub fn render_command_line(command: &BuildCommand) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(command.args.len() + 2);
    if let Some(activation) = &command.activation {
        parts.push(activation);
    }
    parts.push(&command.program);
    parts.extend(command.args.iter().map(String::as_str));
    parts.join(" ")
}

// ============================================================================
// 单元测试
// ============================================================================
