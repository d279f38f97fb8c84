// ============================================================================
// 构建相关 Commands
// 负责：汇总用户选项与扫描结果、转换图标、构造并启动打包命令
// ============================================================================

use std::path::{Path, PathBuf};

use crate::cli::BuildArgs;
use crate::config::AppConfig;
use crate::models::dtos::{BuildRequest, LaunchReceipt, ScanResult};
use crate::services::command_builder::{
    build_command, merge_extra_files, render_command_line, validate_build_request,
};
use crate::services::icon_converter::{convert_to_ico, needs_conversion};
use crate::services::launcher::launch_detached;
use crate::services::platform::{current_platform, get_platform, PlatformStrategy};
use crate::services::scanner::{default_output_dir, scan_project};
use crate::utils::error::{AppError, AppResult};

/// build 命令的结果
#[derive(Debug)]
pub enum BuildOutcome {
    /// --dry-run：只生成命令行
    DryRun(String),
    /// 打包窗口已启动（不代表打包完成）
    Launched(LaunchReceipt),
}

/// 汇总命令行选项与扫描结果，生成 BuildRequest
///
/// 命令行显式指定的选项优先于扫描结果；非 .ico 图标在此处先转换
/// （--dry-run 时不转换，只使用转换后的目标路径）。
pub fn prepare_build_request(args: &BuildArgs, config: &AppConfig) -> AppResult<BuildRequest> {
    if !args.script.is_file() {
        return Err(AppError::NotFound(format!("主脚本 {}", args.script.display())));
    }
    let script = std::path::absolute(&args.script)?;

    let scan = if args.no_scan {
        ScanResult::default()
    } else {
        scan_project(&script)?
    };

    let output_dir = match &args.output {
        Some(dir) => std::path::absolute(dir)?,
        None => default_output_dir(&script)?,
    };

    let venv_path = if args.no_venv {
        None
    } else {
        absolute_opt(args.venv.as_deref())?.or(scan.venv_dir)
    };

    let icon_path = match absolute_opt(args.icon.as_deref())?.or(scan.icon_file) {
        Some(icon) if needs_conversion(&icon) => {
            if args.dry_run {
                Some(icon.with_extension("ico"))
            } else {
                Some(convert_to_ico(&icon, None)?)
            }
        }
        other => other,
    };

    let added = args
        .add_data
        .iter()
        .map(std::path::absolute)
        .collect::<Result<Vec<_>, _>>()?;
    let extra_files: Vec<PathBuf> = merge_extra_files(scan.data_files.into_iter().chain(added));

    let onefile = if args.onefile {
        true
    } else if args.onedir {
        false
    } else {
        config.default_onefile
    };

    let request = BuildRequest {
        script_path: script,
        output_dir,
        onefile,
        venv_path,
        icon_path,
        extra_files,
        version_file: absolute_opt(args.version_file.as_deref())?.or(scan.version_file),
    };

    validate_build_request(&request)?;
    Ok(request)
}

/// 启动脚本会先切换到主脚本目录，用户给出的相对路径需按当前目录补全
fn absolute_opt(path: Option<&Path>) -> AppResult<Option<PathBuf>> {
    Ok(path.map(std::path::absolute).transpose()?)
}

/// 构建打包命令并启动（或在 --dry-run 时仅返回命令行）
pub fn build_package(args: &BuildArgs, config: &AppConfig) -> AppResult<BuildOutcome> {
    log::info!("开始打包过程...");

    let request = prepare_build_request(args, config)?;
    let platform: Box<dyn PlatformStrategy> = match &args.platform {
        Some(name) => get_platform(name)?,
        None => current_platform(),
    };

    let command = build_command(&request, platform.as_ref(), &config.pyinstaller)?;

    if args.dry_run {
        return Ok(BuildOutcome::DryRun(render_command_line(&command)));
    }

    let receipt = launch_detached(&command, platform.as_ref(), config.new_window)?;
    log::info!("打包命令已启动，请在新窗口中查看进度");
    Ok(BuildOutcome::Launched(receipt))
}

// ============================================================================
// 单元测试
// ============================================================================
