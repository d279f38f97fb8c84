// ============================================================================
// 启动服务：在独立窗口中执行打包命令（启动即返回，不等待打包结束）
// ✅ 只能做：生成临时启动脚本、启动外部进程
// ⛔ 禁止：等待子进程或读取其退出码（打包进度由新窗口展示）
// ============================================================================

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::models::dtos::{BuildCommand, LaunchReceipt};
use crate::services::command_builder::render_command_line;
use crate::services::platform::PlatformStrategy;
use crate::utils::error::{AppError, AppResult};

/// 写入临时启动脚本，返回脚本路径
///
/// 脚本在执行结束后自行删除；此处只负责创建。
pub fn write_launcher_script(
    command: &BuildCommand,
    platform: &dyn PlatformStrategy,
) -> AppResult<PathBuf> {
    let content = platform.launcher_script(&command.work_dir, &render_command_line(command));

    let mut file = tempfile::Builder::new()
        .prefix("py-packager-")
        .suffix(&format!(".{}", platform.launcher_extension()))
        .tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;

    let (_, path) = file.keep().map_err(|e| AppError::IoError(e.error))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .map_err(|e| AppError::io_with_path(&path, e))?;
    }

    Ok(path)
}

/// 生成启动脚本并交给 `spawn` 启动
///
/// 启动失败时立即删除临时脚本（尽力而为，删除失败只记录日志）。
pub fn launch_with<F>(
    command: &BuildCommand,
    platform: &dyn PlatformStrategy,
    spawn: F,
) -> AppResult<LaunchReceipt>
where
    F: FnOnce(&Path, &Path) -> std::io::Result<()>,
{
    let script_path = write_launcher_script(command, platform)?;
    let command_line = render_command_line(command);
    log::info!("执行打包命令: {}", command_line);

    let cleanup_path = script_path.clone();
    let guard = scopeguard::guard((), move |_| {
        if let Err(e) = std::fs::remove_file(&cleanup_path) {
            log::warn!("删除临时脚本失败 {}: {}", cleanup_path.display(), e);
        }
    });

    spawn(&script_path, &command.work_dir)
        .map_err(|e| AppError::LaunchError(format!("无法启动打包窗口: {}", e)))?;

    // 启动成功：脚本由子进程在结束时删除
    scopeguard::ScopeGuard::into_inner(guard);

    Ok(LaunchReceipt {
        script_path,
        work_dir: command.work_dir.clone(),
        command_line,
    })
}

/// 在新窗口中启动打包命令，启动后立即返回
pub fn launch_detached(
    command: &BuildCommand,
    platform: &dyn PlatformStrategy,
    new_window: bool,
) -> AppResult<LaunchReceipt> {
    launch_with(command, platform, |script, work_dir| {
        spawn_launcher(script, work_dir, new_window)
    })
}

/// cmd.exe 参数：执行 .bat 后删除它，路径加引号以支持含空格的临时目录
#[cfg(any(target_os = "windows", test))]
fn windows_cmd_args(script: &Path, new_window: bool) -> String {
    let bat = script.display();
    if new_window {
        format!(
            "/C start \"\" cmd /k \"chcp 65001>nul && \"{}\" & del \"{}\"\"",
            bat, bat
        )
    } else {
        format!("/C \"\"{}\" & del \"{}\"\"", bat, bat)
    }
}

/// 按平台启动脚本，不等待子进程
fn spawn_launcher(script: &Path, work_dir: &Path, new_window: bool) -> std::io::Result<()> {
    #[cfg(target_os = "windows")]
    {
        use std::os::windows::process::CommandExt;

        Command::new("cmd")
            .raw_arg(windows_cmd_args(script, new_window))
            .current_dir(work_dir)
            .spawn()?;
        return Ok(());
    }

    #[cfg(target_os = "macos")]
    {
        if new_window {
            Command::new("open")
                .arg("-a")
                .arg("Terminal")
                .arg(script)
                .current_dir(work_dir)
                .spawn()?;
            return Ok(());
        }
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        if new_window {
            match Command::new("x-terminal-emulator")
                .arg("-e")
                .arg("bash")
                .arg(script)
                .current_dir(work_dir)
                .spawn()
            {
                Ok(_) => return Ok(()),
                Err(e) => log::warn!("无法打开终端窗口，改为在当前终端执行: {}", e),
            }
        }
    }

    #[cfg(unix)]
    {
        Command::new("bash")
            .arg(script)
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .spawn()?;
        Ok(())
    }

    #[cfg(not(any(unix, target_os = "windows")))]
    {
        let _ = (script, work_dir, new_window);
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "不支持当前操作系统",
        ))
    }
}

// ============================================================================
// 单元测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::platform::UnixPlatform;
    use tempfile::TempDir;

    #[test]
    fn test_windows_cmd_args_quote_script_with_spaces() {
        let script = Path::new(r"C:\Users\First Last\AppData\Local\Temp\pack_1.bat");

        let args = windows_cmd_args(script, true);
        assert!(args.starts_with("/C start \"\" cmd /k \"chcp 65001>nul && "));
        assert!(args.contains(&format!("\"{}\" & del \"{}\"", script.display(), script.display())));

        let args = windows_cmd_args(script, false);
        assert_eq!(
            args,
            format!("/C \"\"{}\" & del \"{}\"\"", script.display(), script.display())
        );
    }

    fn sample_command(work_dir: &Path) -> BuildCommand {
        BuildCommand {
            activation: None,
            program: "pyinstaller".to_string(),
            args: vec!["--onefile".to_string(), "\"app.py\"".to_string()],
            work_dir: work_dir.to_path_buf(),
        }
    }

    #[test]
    fn test_write_launcher_script_content() {
        let dir = TempDir::new().unwrap();
        let command = sample_command(dir.path());

        let script = write_launcher_script(&command, &UnixPlatform).unwrap();
        let content = std::fs::read_to_string(&script).unwrap();
        assert!(script.to_string_lossy().ends_with(".sh"));
        assert!(content.contains("pyinstaller --onefile \"app.py\""));

        std::fs::remove_file(script).unwrap();
    }

    #[test]
    fn test_launch_returns_after_spawn() {
        let dir = TempDir::new().unwrap();
        let command = sample_command(dir.path());

        let receipt = launch_with(&command, &UnixPlatform, |script, work_dir| {
            assert!(script.exists());
            assert_eq!(work_dir, dir.path());
            Ok(())
        })
        .unwrap();

        assert_eq!(receipt.command_line, "pyinstaller --onefile \"app.py\"");
        // 启动成功后脚本由子进程负责删除
        assert!(receipt.script_path.exists());
        std::fs::remove_file(receipt.script_path).unwrap();
    }

    #[test]
    fn test_launch_failure_removes_script() {
        let dir = TempDir::new().unwrap();
        let command = sample_command(dir.path());
        let mut seen: Option<PathBuf> = None;

        let result = launch_with(&command, &UnixPlatform, |script, _| {
            seen = Some(script.to_path_buf());
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no terminal"))
        });

        assert!(matches!(result, Err(AppError::LaunchError(_))));
        assert!(!seen.unwrap().exists());
    }
}
