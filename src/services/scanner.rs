// ============================================================================
// 扫描服务：识别主脚本所在目录中的项目文件
// 纯 Rust 函数，只扫描当前目录，不进入子目录
// ============================================================================

use std::path::{Path, PathBuf};

use crate::models::dtos::ScanResult;
use crate::services::{
    DATA_EXTENSIONS, DEFAULT_DIST_DIR, ICON_EXTENSIONS, REQUIREMENTS_FILE_NAME,
    SCRIPT_EXTENSION, VENV_DIR_NAME, VERSION_FILE_NAME,
};
use crate::utils::error::{AppError, AppResult};

/// 单个文件的分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    VersionFile,
    Script,
    Requirements,
    Icon,
    Data,
    Ignored,
}

/// 按文件名分类（大小写不敏感，按顺序首个匹配生效）
pub fn classify_file_name(file_name: &str) -> FileKind {
    let name = file_name.to_lowercase();
    let has_ext = |ext: &str| name.ends_with(&format!(".{}", ext));

    if name == VERSION_FILE_NAME {
        FileKind::VersionFile
    } else if has_ext(SCRIPT_EXTENSION) {
        FileKind::Script
    } else if name == REQUIREMENTS_FILE_NAME {
        FileKind::Requirements
    } else if ICON_EXTENSIONS.iter().any(|ext| has_ext(ext)) {
        FileKind::Icon
    } else if DATA_EXTENSIONS.iter().any(|ext| has_ext(ext)) {
        FileKind::Data
    } else {
        FileKind::Ignored
    }
}

/// 主脚本所在的项目目录
pub fn project_dir_of(main_script: &Path) -> AppResult<PathBuf> {
    match main_script.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Ok(PathBuf::from(".")),
        Some(parent) => Ok(parent.to_path_buf()),
        None => Err(AppError::ValidationError(format!(
            "无法获取主脚本所在目录：{}",
            main_script.display()
        ))),
    }
}

/// 默认输出目录：主脚本所在目录下的 dist/
pub fn default_output_dir(main_script: &Path) -> AppResult<PathBuf> {
    Ok(project_dir_of(main_script)?.join(DEFAULT_DIST_DIR))
}

/// 扫描主脚本所在目录，识别相关文件
///
/// 目录无法读取时整体失败，不返回部分结果。
/// 图标只保留列举顺序中遇到的第一个，后续图像文件直接忽略。
pub fn scan_project(main_script: &Path) -> AppResult<ScanResult> {
    let project_dir = project_dir_of(main_script)?;
    log::info!("开始扫描目录: {}", project_dir.display());

    let mut result = ScanResult::default();

    let venv_path = project_dir.join(VENV_DIR_NAME);
    if venv_path.is_dir() {
        result.venv_dir = Some(venv_path);
    }

    let entries = std::fs::read_dir(&project_dir).map_err(|e| {
        log::error!("扫描目录时出错: {}", e);
        AppError::io_with_path(&project_dir, e)
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            log::error!("扫描目录时出错: {}", e);
            AppError::io_with_path(&project_dir, e)
        })?;

        let path = entry.path();
        // 跳过目录
        if !path.is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        match classify_file_name(&file_name) {
            FileKind::VersionFile => result.version_file = Some(path),
            FileKind::Script => {
                result.python_files.insert(path);
            }
            FileKind::Requirements => result.requirements = Some(path),
            FileKind::Icon => {
                if result.icon_file.is_none() {
                    result.icon_file = Some(path);
                } else {
                    log::debug!("已存在图标文件，忽略: {}", path.display());
                }
            }
            FileKind::Data => {
                result.data_files.insert(path);
            }
            FileKind::Ignored => {}
        }
    }

    log::info!(
        "目录扫描完成，找到 {} 个Python文件",
        result.python_files.len()
    );
    if let Some(version_file) = &result.version_file {
        log::info!("找到版本信息文件: {}", version_file.display());
    }

    Ok(result)
}

// ============================================================================
// 单元测试
// ============================================================================
