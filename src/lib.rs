// ============================================================================
// [总线] 程序的组装车间
// ✅ 只能做：pub mod 暴露子模块、解析命令行、初始化日志与配置、分发命令
// ⛔ 禁止：直接实现业务逻辑
// ============================================================================

pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

use std::io::Write;
use std::path::Path;

use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands, VersionCommands};
use crate::commands::build::BuildOutcome;
use crate::config::AppConfig;
use crate::models::dtos::{ProjectInfo, VersionInfo};
use crate::utils::error::AppResult;
use crate::utils::logger;

// ============================================================================
// 应用入口
// ============================================================================

/// 解析命令行、加载配置、初始化日志后执行命令，结果输出到 stdout
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        logger::parse_level(&config.log_level)
    };
    logger::init(Some(config.log_dir.as_path()), level)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &config, &mut out)
}

/// 执行已解析的命令（不初始化日志，便于测试）
pub fn execute(cli: &Cli, config: &AppConfig, out: &mut dyn Write) -> AppResult<()> {
    match &cli.command {
        Commands::Scan { script, json } => {
            let info = commands::project::scan_project_files(script)?;
            if *json {
                let text = serde_json::to_string_pretty(&info).map_err(std::io::Error::other)?;
                writeln!(out, "{}", text)?;
            } else {
                print_project_info(&info, out)?;
            }
            log::info!("项目文件扫描完成");
        }
        Commands::Build(args) => match commands::build::build_package(args, config)? {
            BuildOutcome::DryRun(line) => writeln!(out, "{}", line)?,
            BuildOutcome::Launched(receipt) => {
                writeln!(out, "打包命令已启动，请在新窗口中查看进度")?;
                writeln!(out, "{}", receipt.command_line)?;
            }
        },
        Commands::Icon { image, output } => {
            let path = commands::project::convert_icon(image, output.as_deref())?;
            writeln!(out, "{}", path.display())?;
        }
        Commands::Version(VersionCommands::Show { file }) => {
            let info = commands::project::load_version_info(file)?;
            print_version_info(&info, out)?;
        }
        Commands::Version(VersionCommands::Save(args)) => {
            let path = commands::project::save_version_info(args)?;
            writeln!(out, "版本信息已保存到: {}", path.display())?;
        }
    }

    Ok(())
}

// ============================================================================
// 输出格式
// ============================================================================

fn display_opt(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "（未找到）".to_string())
}

fn print_project_info(info: &ProjectInfo, out: &mut dyn Write) -> AppResult<()> {
    let scan = &info.scan;
    writeln!(out, "主脚本: {}", info.script.display())?;
    writeln!(out, "默认输出目录: {}", info.default_output_dir.display())?;
    writeln!(out, "虚拟环境: {}", display_opt(scan.venv_dir.as_deref()))?;
    writeln!(out, "版本信息文件: {}", display_opt(scan.version_file.as_deref()))?;
    writeln!(out, "图标文件: {}", display_opt(scan.icon_file.as_deref()))?;
    writeln!(out, "依赖清单: {}", display_opt(scan.requirements.as_deref()))?;

    writeln!(out, "Python 文件 ({}):", scan.python_files.len())?;
    for path in &scan.python_files {
        writeln!(out, "  {}", path.display())?;
    }
    writeln!(out, "数据文件 ({}):", scan.data_files.len())?;
    for path in &scan.data_files {
        writeln!(out, "  {}", path.display())?;
    }
    Ok(())
}

fn print_version_info(info: &VersionInfo, out: &mut dyn Write) -> AppResult<()> {
    let fields = [
        ("ProductName", &info.product_name),
        ("FileVersion", &info.file_version),
        ("ProductVersion", &info.product_version),
        ("CompanyName", &info.company_name),
        ("FileDescription", &info.file_description),
        ("LegalCopyright", &info.legal_copyright),
    ];
    for (key, value) in fields {
        writeln!(out, "{}: {}", key, value)?;
    }
    writeln!(out, "filevers: {:?}", info.file_version_numeric)?;
    writeln!(out, "prodvers: {:?}", info.product_version_numeric)?;
    Ok(())
}
