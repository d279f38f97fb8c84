// ============================================================================
// 版本信息服务：PyInstaller 版本文件的解析与生成
// ✅ 只能做：文本 ↔ VersionInfo 转换、版本文件读写
// ⛔ 禁止：对字符串值做转义（值中含单引号会破坏解析，属已知限制）
// ============================================================================

use std::path::Path;

use regex::Regex;

use crate::models::dtos::VersionInfo;
use crate::utils::error::{AppError, AppResult};

/// 数字元组缺失时使用的默认值
pub const DEFAULT_VERSION_TUPLE: [u32; 4] = [1, 0, 0, 0];

/// 表单中版本号留空时使用的默认版本字符串
pub const DEFAULT_VERSION_STRING: &str = "1.0.0.0";

/// 解析前必须存在的结构标记
const REQUIRED_MARKERS: &[&str] = &["VSVersionInfo(", "FixedFileInfo("];

/// StringTable 的语言/代码页标识（简体中文 + Unicode）
const STRING_TABLE_ID: &str = "080404b0";

/// VarFileInfo 中的 Translation 值
const TRANSLATION: [u32; 2] = [2052, 1200];

// ============================================================================
// 解析
// ============================================================================

/// 解析版本文件文本
///
/// - 缺少结构标记 → FormatError
/// - 数字元组标记缺失 → 默认 (1, 0, 0, 0)
/// - 数字元组存在但含非整数 → FormatError
/// - 字符串字段缺失 → 空字符串
pub fn parse_version_text(content: &str) -> AppResult<VersionInfo> {
    for marker in REQUIRED_MARKERS {
        if !content.contains(marker) {
            return Err(AppError::FormatError(format!(
                "版本信息文件缺少结构标记 {}",
                marker
            )));
        }
    }

    Ok(VersionInfo {
        company_name: extract_string(content, "CompanyName")?,
        file_description: extract_string(content, "FileDescription")?,
        file_version: extract_string(content, "FileVersion")?,
        legal_copyright: extract_string(content, "LegalCopyright")?,
        product_name: extract_string(content, "ProductName")?,
        product_version: extract_string(content, "ProductVersion")?,
        file_version_numeric: extract_tuple(content, "filevers")?,
        product_version_numeric: extract_tuple(content, "prodvers")?,
    })
}

/// 读取并解析版本信息文件
pub fn parse_version_file(path: &Path) -> AppResult<VersionInfo> {
    if !path.is_file() {
        log::error!("版本信息文件不存在: {}", path.display());
        return Err(AppError::NotFound(format!(
            "版本信息文件 {}",
            path.display()
        )));
    }

    let bytes = std::fs::read(path).map_err(|e| AppError::io_with_path(path, e))?;
    let content = String::from_utf8(bytes).map_err(|_| {
        AppError::FormatError(format!("版本信息文件不是有效的 UTF-8 文本: {}", path.display()))
    })?;

    parse_version_text(&content).inspect_err(|e| {
        log::error!("解析版本信息文件时出错: {}", e);
    })
}

/// 提取 `key=(a, b, c, d)` 形式的数字元组，结果补齐/截断为 4 位
fn extract_tuple(content: &str, key: &str) -> AppResult<[u32; 4]> {
    let pattern = format!(r"{}=\s*\(([\d,\s]+)\)", regex::escape(key));
    let re = Regex::new(&pattern)
        .map_err(|e| AppError::FormatError(format!("正则编译失败：{}", e)))?;

    let Some(caps) = re.captures(content) else {
        return Ok(DEFAULT_VERSION_TUPLE);
    };

    let parts = caps[1]
        .split(',')
        .map(|part| {
            part.trim().parse::<u32>().map_err(|_| {
                AppError::FormatError(format!("{} 中的版本号无效：({})", key, &caps[1]))
            })
        })
        .collect::<AppResult<Vec<u32>>>()?;

    Ok(pad_tuple(&parts))
}

/// 提取 `StringStruct(u'key', u'value')` 中的 value
fn extract_string(content: &str, key: &str) -> AppResult<String> {
    let pattern = format!(r"StringStruct\(u'{}',\s*u'([^']*?)'\)", regex::escape(key));
    let re = Regex::new(&pattern)
        .map_err(|e| AppError::FormatError(format!("正则编译失败：{}", e)))?;

    Ok(re
        .captures(content)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default())
}

// ============================================================================
// 版本号转换
// ============================================================================

/// 将点分版本字符串转换为 4 位元组：不足补 0，多余截断
pub fn version_str_to_tuple(version: &str) -> AppResult<[u32; 4]> {
    let parts = version
        .split('.')
        .map(|part| {
            part.trim().parse::<u32>().map_err(|_| {
                AppError::FormatError(format!("版本号格式错误：{}", version))
            })
        })
        .collect::<AppResult<Vec<u32>>>()?;

    Ok(pad_tuple(&parts))
}

fn pad_tuple(parts: &[u32]) -> [u32; 4] {
    let mut tuple = [0u32; 4];
    for (slot, value) in tuple.iter_mut().zip(parts) {
        *slot = *value;
    }
    tuple
}

/// 根据字符串版本号推导两个数字元组（用于表单输入）
///
/// 版本号留空时使用 `1.0.0.0`。
pub fn derive_numeric_versions(mut info: VersionInfo) -> AppResult<VersionInfo> {
    if info.file_version.trim().is_empty() {
        info.file_version = DEFAULT_VERSION_STRING.to_string();
    }
    if info.product_version.trim().is_empty() {
        info.product_version = DEFAULT_VERSION_STRING.to_string();
    }

    info.file_version_numeric = version_str_to_tuple(&info.file_version)?;
    info.product_version_numeric = version_str_to_tuple(&info.product_version)?;
    Ok(info)
}

// ============================================================================
// 生成
// ============================================================================

fn format_tuple(tuple: &[u32]) -> String {
    let items: Vec<String> = tuple.iter().map(|n| n.to_string()).collect();
    format!("({})", items.join(", "))
}

/// 将 VersionInfo 填入固定模板
pub fn serialize_version_info(info: &VersionInfo) -> String {
    format!(
        r#"# UTF-8
#
# For more details about fixed file info 'ffi' see:
# http://msdn.microsoft.com/en-us/library/ms646997.aspx
VSVersionInfo(
  ffi=FixedFileInfo(
    # filevers and prodvers should be always a tuple with four items: (1, 2, 3, 4)
    filevers={filevers},
    prodvers={prodvers},
    # Contains a bitmask that specifies the valid bits 'flags'r
    mask=0x3f,
    # Contains a bitmask that specifies the Boolean attributes of the file.
    flags=0x0,
    # The operating system for which this file was designed.
    # 0x4 - NT and there is no need to change it.
    OS=0x40004,
    # The general type of file.
    # 0x1 - the file is an application.
    fileType=0x1,
    # The function of the file.
    # 0x0 - the function is not defined for this fileType
    subtype=0x0,
    # Creation date and time stamp.
    date=(0, 0)
    ),
  kids=[
    StringFileInfo(
      [
      StringTable(
        u'{table_id}',
        [StringStruct(u'CompanyName', u'{company_name}'),
        StringStruct(u'FileDescription', u'{file_description}'),
        StringStruct(u'FileVersion', u'{file_version}'),
        StringStruct(u'LegalCopyright', u'{legal_copyright}'),
        StringStruct(u'ProductName', u'{product_name}'),
        StringStruct(u'ProductVersion', u'{product_version}')])
      ]),
    VarFileInfo([VarStruct(u'Translation', [{lang}, {codepage}])])
  ]
)
"#,
        filevers = format_tuple(&info.file_version_numeric),
        prodvers = format_tuple(&info.product_version_numeric),
        table_id = STRING_TABLE_ID,
        company_name = info.company_name,
        file_description = info.file_description,
        file_version = info.file_version,
        legal_copyright = info.legal_copyright,
        product_name = info.product_name,
        product_version = info.product_version,
        lang = TRANSLATION[0],
        codepage = TRANSLATION[1],
    )
}

/// 保存版本信息文件（UTF-8）
pub fn save_version_file(path: &Path, info: &VersionInfo) -> AppResult<()> {
    std::fs::write(path, serialize_version_info(info)).map_err(|e| {
        log::error!("保存版本信息文件时出错: {}", e);
        AppError::io_with_path(path, e)
    })?;

    log::info!("版本信息已保存到: {}", path.display());
    Ok(())
}

// ============================================================================
// 单元测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn sample_info() -> VersionInfo {
        VersionInfo {
            company_name: "示例公司".to_string(),
            file_description: "打包测试程序".to_string(),
            file_version: "2.1.0.7".to_string(),
            legal_copyright: "Copyright (C) 2024".to_string(),
            product_name: "DemoApp".to_string(),
            product_version: "2.1".to_string(),
            file_version_numeric: [2, 1, 0, 7],
            product_version_numeric: [2, 1, 0, 0],
        }
    }

    #[test]
    fn test_serialize_contains_fixed_blocks() {
        let text = serialize_version_info(&sample_info());

        assert!(text.contains("filevers=(2, 1, 0, 7),"));
        assert!(text.contains("prodvers=(2, 1, 0, 0),"));
        assert!(text.contains("mask=0x3f,"));
        assert!(text.contains("OS=0x40004,"));
        assert!(text.contains("u'080404b0',"));
        assert!(text.contains("StringStruct(u'ProductName', u'DemoApp')"));
        assert!(text.contains("VarStruct(u'Translation', [2052, 1200])"));
    }

    #[test]
    fn test_serialize_string_fields_in_fixed_order() {
        let text = serialize_version_info(&sample_info());
        let keys = [
            "CompanyName",
            "FileDescription",
            "FileVersion",
            "LegalCopyright",
            "ProductName",
            "ProductVersion",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| text.find(&format!("StringStruct(u'{}'", k)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_parse_round_trip_sample() {
        let info = sample_info();
        let parsed = parse_version_text(&serialize_version_info(&info)).unwrap();
        assert_eq!(parsed, info);
    }

    #[test]
    fn test_parse_missing_tuple_defaults() {
        let text = "VSVersionInfo(\n  ffi=FixedFileInfo(\n    mask=0x3f,\n  ),\n\
                    StringStruct(u'ProductName', u'NoTuple')\n)";
        let parsed = parse_version_text(text).unwrap();

        assert_eq!(parsed.file_version_numeric, DEFAULT_VERSION_TUPLE);
        assert_eq!(parsed.product_version_numeric, DEFAULT_VERSION_TUPLE);
        assert_eq!(parsed.product_name, "NoTuple");
    }

    #[test]
    fn test_parse_missing_strings_are_empty() {
        let text = "VSVersionInfo(ffi=FixedFileInfo(filevers=(3, 0, 0, 0), prodvers=(3, 1)))";
        let parsed = parse_version_text(text).unwrap();

        assert_eq!(parsed.company_name, "");
        assert_eq!(parsed.product_version, "");
        assert_eq!(parsed.file_version_numeric, [3, 0, 0, 0]);
        assert_eq!(parsed.product_version_numeric, [3, 1, 0, 0]);
    }

    #[test]
    fn test_parse_long_tuple_truncated() {
        let text = "VSVersionInfo(ffi=FixedFileInfo(filevers=(1, 2, 3, 4, 5, 6)))";
        let parsed = parse_version_text(text).unwrap();
        assert_eq!(parsed.file_version_numeric, [1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_malformed_tuple_is_format_error() {
        let text = "VSVersionInfo(ffi=FixedFileInfo(filevers=(1,, 2)))";
        let result = parse_version_text(text);
        assert!(matches!(result, Err(AppError::FormatError(_))));
    }

    #[test]
    fn test_parse_missing_markers_is_format_error() {
        let result = parse_version_text("StringStruct(u'ProductName', u'X')");
        assert!(matches!(result, Err(AppError::FormatError(_))));
    }

    #[test]
    fn test_version_str_to_tuple_pads_and_truncates() {
        assert_eq!(version_str_to_tuple("1").unwrap(), [1, 0, 0, 0]);
        assert_eq!(version_str_to_tuple("1.2").unwrap(), [1, 2, 0, 0]);
        assert_eq!(version_str_to_tuple("1.2.3.4").unwrap(), [1, 2, 3, 4]);
        assert_eq!(version_str_to_tuple("1.2.3.4.5").unwrap(), [1, 2, 3, 4]);
    }

    #[test]
    fn test_version_str_to_tuple_rejects_non_numeric() {
        assert!(matches!(
            version_str_to_tuple("1.x"),
            Err(AppError::FormatError(_))
        ));
        assert!(version_str_to_tuple("").is_err());
    }

    #[test]
    fn test_derive_numeric_versions_defaults_blank() {
        let info = VersionInfo {
            product_name: "App".to_string(),
            product_version: "3.2".to_string(),
            ..Default::default()
        };
        let derived = derive_numeric_versions(info).unwrap();

        assert_eq!(derived.file_version, "1.0.0.0");
        assert_eq!(derived.file_version_numeric, [1, 0, 0, 0]);
        assert_eq!(derived.product_version_numeric, [3, 2, 0, 0]);
    }

    #[test]
    fn test_version_file_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("versionmark.txt");

        save_version_file(&path, &sample_info()).unwrap();
        let loaded = parse_version_file(&path).unwrap();
        assert_eq!(loaded, sample_info());
    }

    #[test]
    fn test_parse_version_file_missing() {
        let dir = TempDir::new().unwrap();
        let result = parse_version_file(&dir.path().join("versionmark.txt"));
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_parse_version_file_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("versionmark.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

        let result = parse_version_file(&path);
        assert!(matches!(result, Err(AppError::FormatError(_))));
    }

    fn field_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 ._()\\-]{0,24}"
    }

    fn tuple_strategy() -> impl Strategy<Value = [u32; 4]> {
        prop::array::uniform4(0u32..65536)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// 任意合法 VersionInfo 生成后再解析应完全一致
        #[test]
        fn prop_serialize_parse_round_trip(
            company_name in field_strategy(),
            file_description in field_strategy(),
            file_version in field_strategy(),
            legal_copyright in field_strategy(),
            product_name in field_strategy(),
            product_version in field_strategy(),
            filevers in tuple_strategy(),
            prodvers in tuple_strategy(),
        ) {
            let info = VersionInfo {
                company_name,
                file_description,
                file_version,
                legal_copyright,
                product_name,
                product_version,
                file_version_numeric: filevers,
                product_version_numeric: prodvers,
            };

            let parsed = parse_version_text(&serialize_version_info(&info)).unwrap();
            prop_assert_eq!(parsed, info);
        }

        /// 1~4 段版本号补齐为 4 位，多余部分截断
        #[test]
        fn prop_version_str_to_tuple_length_four(
            parts in prop::collection::vec(0u32..100_000, 1..7)
        ) {
            let version: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
            let tuple = version_str_to_tuple(&version.join(".")).unwrap();

            for i in 0..4 {
                let expected = parts.get(i).copied().unwrap_or(0);
                prop_assert_eq!(tuple[i], expected);
            }
        }
    }
}
