// ============================================================================
// 平台差异策略
// ============================================================================
//
// Windows 与 Unix 两个分支只在以下几点不同：
// - --add-data 参数中源路径与目标路径之间的分隔符
// - 虚拟环境激活脚本的位置与调用语法
// - 临时启动脚本的扩展名与内容
// 每个平台实现 PlatformStrategy trait，通过 get_platform 工厂函数获取。

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

// ============================================================================
// 平台策略 Trait 定义
// ============================================================================

/// 平台策略 trait
pub trait PlatformStrategy {
    /// 平台标识（"windows" / "unix"）
    fn name(&self) -> &str;

    /// --add-data 中 `源路径<分隔符>目标目录` 的分隔符
    fn data_separator(&self) -> char;

    /// 虚拟环境中激活脚本的位置
    fn activation_script(&self, venv_path: &Path) -> PathBuf;

    /// 激活虚拟环境的命令前缀（以 `&&` 结尾）
    fn activation_prefix(&self, activation_script: &Path) -> String;

    /// 临时启动脚本扩展名
    fn launcher_extension(&self) -> &str;

    /// 临时启动脚本内容：切换到工作目录、执行命令、等待用户确认
    fn launcher_script(&self, work_dir: &Path, command_line: &str) -> String;
}

// ============================================================================
// Windows 策略
// ============================================================================

/// Windows：`call "venv\Scripts\activate.bat" &&`，分隔符 `;`
pub struct WindowsPlatform;

impl PlatformStrategy for WindowsPlatform {
    fn name(&self) -> &str {
        "windows"
    }

    fn data_separator(&self) -> char {
        ';'
    }

    fn activation_script(&self, venv_path: &Path) -> PathBuf {
        venv_path.join("Scripts").join("activate.bat")
    }

    fn activation_prefix(&self, activation_script: &Path) -> String {
        format!("call \"{}\" &&", activation_script.display())
    }

    fn launcher_extension(&self) -> &str {
        "bat"
    }

    fn launcher_script(&self, work_dir: &Path, command_line: &str) -> String {
        // chcp 65001 保证中文路径与输出正常显示
        format!(
            "\r\n@echo off\r\nchcp 65001 > nul\r\ncd /d \"{}\"\r\n{}\r\necho.\r\necho 打包完成，按任意键关闭窗口...\r\npause >nul\r\n",
            work_dir.display(),
            command_line
        )
    }
}

// ============================================================================
// Unix 策略
// ============================================================================

/// Linux / macOS：`source "venv/bin/activate" &&`，分隔符 `:`
pub struct UnixPlatform;

impl PlatformStrategy for UnixPlatform {
    fn name(&self) -> &str {
        "unix"
    }

    fn data_separator(&self) -> char {
        ':'
    }

    fn activation_script(&self, venv_path: &Path) -> PathBuf {
        venv_path.join("bin").join("activate")
    }

    fn activation_prefix(&self, activation_script: &Path) -> String {
        format!("source \"{}\" &&", activation_script.display())
    }

    fn launcher_extension(&self) -> &str {
        "sh"
    }

    fn launcher_script(&self, work_dir: &Path, command_line: &str) -> String {
        // 执行完毕后删除脚本自身
        format!(
            "#!/usr/bin/env bash\ncd \"{}\"\n{}\necho\necho \"打包完成，按回车键关闭窗口...\"\nrm -f \"$0\"\nread -r _\n",
            work_dir.display(),
            command_line
        )
    }
}

// ============================================================================
// 工厂函数
// ============================================================================

/// 根据平台标识获取对应的策略
pub fn get_platform(name: &str) -> AppResult<Box<dyn PlatformStrategy>> {
    match name {
        "windows" => Ok(Box::new(WindowsPlatform)),
        "unix" | "linux" | "macos" => Ok(Box::new(UnixPlatform)),
        _ => Err(AppError::ValidationError(format!("不支持的平台：{}", name))),
    }
}

/// 当前编译目标平台的策略
pub fn current_platform() -> Box<dyn PlatformStrategy> {
    if cfg!(windows) {
        Box::new(WindowsPlatform)
    } else {
        Box::new(UnixPlatform)
    }
}

// ============================================================================
// 单元测试
// ============================================================================
