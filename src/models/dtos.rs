// ============================================================================
// 数据传输对象（DTO）定义
// 组件之间传递的数据结构，仅包含字段定义和序列化派生
// ⛔ 禁止：包含复杂的业务逻辑方法
// ============================================================================

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// 版本信息，对应 PyInstaller 版本文件中的字段
///
/// 两个数字元组始终为 4 位，由对应的点分版本字符串推导而来。
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct VersionInfo {
    pub company_name: String,
    pub file_description: String,
    pub file_version: String,
    pub legal_copyright: String,
    pub product_name: String,
    pub product_version: String,
    /// FixedFileInfo.filevers
    #[serde(rename = "filevers")]
    pub file_version_numeric: [u32; 4],
    /// FixedFileInfo.prodvers
    #[serde(rename = "prodvers")]
    pub product_version_numeric: [u32; 4],
}

/// 项目扫描结果，由 `scanner::scan_project` 返回
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// 目录下的 .py 文件
    pub python_files: BTreeSet<PathBuf>,
    /// 可能需要随包分发的数据文件
    pub data_files: BTreeSet<PathBuf>,
    /// requirements.txt
    pub requirements: Option<PathBuf>,
    /// versionmark.txt
    pub version_file: Option<PathBuf>,
    /// 目录中遇到的第一个图标/图像文件
    pub icon_file: Option<PathBuf>,
    /// 项目根目录下名为 venv 的子目录
    pub venv_dir: Option<PathBuf>,
}

/// 项目信息，由 `scan` 命令返回
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProjectInfo {
    /// 主脚本路径
    pub script: PathBuf,
    /// 默认输出目录（主脚本目录下的 dist/）
    pub default_output_dir: PathBuf,
    pub scan: ScanResult,
}

/// 一次打包调用的参数
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BuildRequest {
    pub script_path: PathBuf,
    pub output_dir: PathBuf,
    /// true 生成单文件，false 生成目录
    pub onefile: bool,
    pub venv_path: Option<PathBuf>,
    pub icon_path: Option<PathBuf>,
    /// 按用户添加顺序排列的额外数据文件
    pub extra_files: Vec<PathBuf>,
    pub version_file: Option<PathBuf>,
}

/// 构造好的打包命令
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BuildCommand {
    /// 虚拟环境激活前缀，如 `source "/p/venv/bin/activate" &&`
    pub activation: Option<String>,
    /// 打包工具程序名
    pub program: String,
    /// 有序参数列表，路径参数已加双引号
    pub args: Vec<String>,
    /// 执行命令的工作目录（主脚本所在目录）
    pub work_dir: PathBuf,
}

/// 启动回执：只表示打包窗口已启动，不代表打包完成
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LaunchReceipt {
    /// 临时启动脚本路径（脚本执行完毕后自行删除）
    pub script_path: PathBuf,
    pub work_dir: PathBuf,
    pub command_line: String,
}
