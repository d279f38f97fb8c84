// ============================================================================
// 项目相关 Commands
// 负责：项目扫描、版本信息查看与保存、图标转换
// ============================================================================

use std::path::{Path, PathBuf};

use crate::cli::VersionSaveArgs;
use crate::models::dtos::{ProjectInfo, VersionInfo};
use crate::services::icon_converter;
use crate::services::scanner;
use crate::services::version_parser;
use crate::services::{SCRIPT_EXTENSION, VERSION_FILE_NAME};
use crate::utils::error::{AppError, AppResult};

/// 扫描项目：识别主脚本目录中的相关文件，并给出默认输出目录
pub fn scan_project_files(script: &Path) -> AppResult<ProjectInfo> {
    if !script.is_file() {
        return Err(AppError::NotFound(format!("主脚本 {}", script.display())));
    }

    let scan = scanner::scan_project(script)?;
    let default_output_dir = scanner::default_output_dir(script)?;

    Ok(ProjectInfo {
        script: script.to_path_buf(),
        default_output_dir,
        scan,
    })
}

/// 加载版本信息文件
pub fn load_version_info(file: &Path) -> AppResult<VersionInfo> {
    version_parser::parse_version_file(file).inspect_err(|e| {
        log::error!("加载版本信息失败: {}", e);
    })
}

/// 版本文件保存位置：传入主脚本时使用其目录下的 versionmark.txt
pub fn version_file_target(target: &Path) -> AppResult<PathBuf> {
    let is_script = target
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case(SCRIPT_EXTENSION))
        .unwrap_or(false);

    if is_script {
        Ok(scanner::project_dir_of(target)?.join(VERSION_FILE_NAME))
    } else {
        Ok(target.to_path_buf())
    }
}

/// 保存版本信息：版本号留空时使用 1.0.0.0
pub fn save_version_info(args: &VersionSaveArgs) -> AppResult<PathBuf> {
    let path = version_file_target(&args.target)?;

    let info = version_parser::derive_numeric_versions(VersionInfo {
        company_name: args.company_name.clone(),
        file_description: args.file_description.clone(),
        file_version: args.file_version.clone(),
        legal_copyright: args.legal_copyright.clone(),
        product_name: args.product_name.clone(),
        product_version: args.product_version.clone(),
        ..Default::default()
    })?;

    version_parser::save_version_file(&path, &info)?;
    Ok(path)
}

/// 图标转换
pub fn convert_icon(image: &Path, output: Option<&Path>) -> AppResult<PathBuf> {
    icon_converter::convert_to_ico(image, output)
}

// ============================================================================
// 单元测试
// ============================================================================
