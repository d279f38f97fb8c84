// ============================================================================
// 图标转换服务：将常见图像（PNG、JPG 等）转换为多尺寸 ICO 文件
// ============================================================================

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;

use crate::services::ICON_SIZES;
use crate::utils::error::{AppError, AppResult};

/// 是否需要转换（已经是 .ico 的图标直接使用）
pub fn needs_conversion(icon_path: &Path) -> bool {
    !icon_path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("ico"))
        .unwrap_or(false)
}

/// 将图像文件转换为 ICO
///
/// 未指定输出路径时，将源文件扩展名替换为 `.ico`。
/// 源文件不存在或无法解码时返回 FormatError，且不会生成输出文件。
pub fn convert_to_ico(image_path: &Path, output_path: Option<&Path>) -> AppResult<PathBuf> {
    let output = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| image_path.with_extension("ico"));

    let img = image::open(image_path).map_err(|e| {
        log::error!("转换图标时出错: {}", e);
        AppError::FormatError(format!("无法解码图像 {}: {}", image_path.display(), e))
    })?;
    let rgba = img.to_rgba8();

    let mut icon_dir = ico::IconDir::new(ico::ResourceType::Icon);
    for &size in ICON_SIZES {
        let resized = image::imageops::resize(&rgba, size, size, FilterType::Lanczos3);
        let icon_image = ico::IconImage::from_rgba_data(size, size, resized.into_raw());
        let entry = ico::IconDirEntry::encode(&icon_image).map_err(|e| {
            AppError::FormatError(format!("无法编码 {}x{} 图标: {}", size, size, e))
        })?;
        icon_dir.add_entry(entry);
    }

    let file = File::create(&output).map_err(|e| AppError::io_with_path(&output, e))?;

    // 写入失败时删除不完整的输出文件
    let guard_path = output.clone();
    let guard = scopeguard::guard((), move |_| {
        let _ = std::fs::remove_file(&guard_path);
    });

    icon_dir
        .write(BufWriter::new(file))
        .map_err(|e| AppError::io_with_path(&output, e))?;

    scopeguard::ScopeGuard::into_inner(guard);

    log::info!(
        "成功将 {} 转换为图标文件 {}",
        image_path.display(),
        output.display()
    );
    Ok(output)
}

// ============================================================================
// 单元测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]));
        img.save(path).unwrap();
    }

    fn read_sizes(ico_path: &Path) -> Vec<u32> {
        let file = fs::File::open(ico_path).unwrap();
        let dir = ico::IconDir::read(file).unwrap();
        dir.entries().iter().map(|e| e.width()).collect()
    }

    #[test]
    fn test_convert_png_default_output() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("logo.png");
        write_png(&png, 300, 200);

        let ico_path = convert_to_ico(&png, None).unwrap();
        assert_eq!(ico_path, dir.path().join("logo.ico"));
        assert!(ico_path.exists());
        assert_eq!(read_sizes(&ico_path), vec![16, 32, 48, 64, 128]);
    }

    #[test]
    fn test_convert_png_explicit_output() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("logo.png");
        write_png(&png, 64, 64);
        let target = dir.path().join("app-icon.ico");

        let ico_path = convert_to_ico(&png, Some(target.as_path())).unwrap();
        assert_eq!(ico_path, target);
        assert!(target.exists());
        assert!(!dir.path().join("logo.ico").exists());
    }

    #[test]
    fn test_convert_missing_image_is_format_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.png");

        let result = convert_to_ico(&missing, None);
        assert!(matches!(result, Err(AppError::FormatError(_))));
        assert!(!dir.path().join("missing.ico").exists());
    }

    #[test]
    fn test_convert_corrupt_image_is_format_error() {
        let dir = TempDir::new().unwrap();
        let corrupt = dir.path().join("broken.png");
        fs::write(&corrupt, b"definitely not a png").unwrap();

        let result = convert_to_ico(&corrupt, None);
        assert!(matches!(result, Err(AppError::FormatError(_))));
        assert!(!dir.path().join("broken.ico").exists());
    }

    #[test]
    fn test_needs_conversion() {
        assert!(needs_conversion(Path::new("logo.png")));
        assert!(needs_conversion(Path::new("logo")));
        assert!(!needs_conversion(Path::new("logo.ICO")));
    }
}
