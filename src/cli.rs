// ============================================================================
// 命令行定义（clap derive）
// 只声明参数结构，具体逻辑由 commands 层实现
// ============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "py-packager", version, about = "Python 项目打包助手（基于 PyInstaller）")]
pub struct Cli {
    /// 配置文件路径（默认读取当前目录下的 py-packager.json）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// 扫描主脚本所在目录，识别虚拟环境、图标、版本文件和数据文件
    Scan {
        /// 主脚本路径
        script: PathBuf,
        /// 以 JSON 输出扫描结果
        #[arg(long)]
        json: bool,
    },
    /// 构造 PyInstaller 命令并在新窗口中启动打包
    Build(BuildArgs),
    /// 将图像转换为多尺寸 ICO 图标
    Icon {
        /// 源图像路径
        image: PathBuf,
        /// 输出 ICO 路径（默认替换源文件扩展名）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 查看或保存版本信息文件
    #[command(subcommand)]
    Version(VersionCommands),
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// 主脚本路径
    pub script: PathBuf,

    /// 输出目录（默认为主脚本目录下的 dist/）
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 生成单文件（覆盖配置中的 default_onefile）
    #[arg(long, conflicts_with = "onedir")]
    pub onefile: bool,

    /// 生成目录而不是单文件
    #[arg(long)]
    pub onedir: bool,

    /// 虚拟环境目录（默认使用扫描到的 venv/）
    #[arg(long, conflicts_with = "no_venv")]
    pub venv: Option<PathBuf>,

    /// 不使用虚拟环境
    #[arg(long)]
    pub no_venv: bool,

    /// 图标文件，非 .ico 图像会先转换
    #[arg(long)]
    pub icon: Option<PathBuf>,

    /// 版本信息文件
    #[arg(long)]
    pub version_file: Option<PathBuf>,

    /// 额外打包的数据文件，可重复
    #[arg(long = "add-data")]
    pub add_data: Vec<PathBuf>,

    /// 不自动扫描项目目录
    #[arg(long)]
    pub no_scan: bool,

    /// 只打印命令，不启动打包
    #[arg(long)]
    pub dry_run: bool,

    /// 目标平台（windows / unix），默认当前平台
    #[arg(long)]
    pub platform: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum VersionCommands {
    /// 解析并显示版本信息文件
    Show {
        /// 版本信息文件路径
        file: PathBuf,
    },
    /// 保存版本信息文件
    Save(VersionSaveArgs),
}

#[derive(Debug, Args)]
pub struct VersionSaveArgs {
    /// 版本文件路径；传入 .py 主脚本时保存到其目录下的 versionmark.txt
    pub target: PathBuf,

    #[arg(long, default_value = "")]
    pub company_name: String,

    #[arg(long, default_value = "")]
    pub file_description: String,

    /// 留空时使用 1.0.0.0
    #[arg(long, default_value = "")]
    pub file_version: String,

    #[arg(long, default_value = "")]
    pub legal_copyright: String,

    #[arg(long, default_value = "")]
    pub product_name: String,

    /// 留空时使用 1.0.0.0
    #[arg(long, default_value = "")]
    pub product_version: String,
}
