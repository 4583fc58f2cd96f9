//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、图像解码与编码、调用核心隐写算法以及向用户报告结果。

use crate::cli::{CapacityArgs, HideArgs, Mode, RecoverArgs};
use crate::constants::{HIDDEN_IMAGE_PREFIX, RECOVERED_PREFIX};
use crate::grid::PixelGrid;
use crate::steganography::{binary, text};
use anyhow::{Context, Result};
use colored::Colorize;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和负载文件、检查隐写空间是否足够、调用对应编码方式的隐写核心函数，
/// 最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与编码方式的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取或解码输入的图像，或无法读取负载文件。
/// * 图像没有足够的空间来隐藏负载。
/// * 文本模式下负载含有 0-255 范围之外的字符。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_path(&args.image, HIDDEN_IMAGE_PREFIX, "png"));
    ensure_writable(&dest, args.force)?;

    let mut grid = load_grid(&args.image)?;

    match args.mode {
        Mode::Binary => {
            let payload = fs::read(&args.payload).with_context(|| {
                format!(
                    "Unable to read payload file: {}",
                    args.payload.to_string_lossy().red().bold()
                )
            })?;

            let available = binary::capacity_bytes(&grid);
            anyhow::ensure!(
                available >= payload.len(),
                "Not enough space in the image to hide the payload. \nRequired: {} bytes, Available: {} bytes",
                payload.len().to_string().red().bold(),
                available.to_string().green().bold()
            );

            let report = binary::embed(&mut grid, &payload).with_context(|| {
                "Failed to hide the payload in the image. \nThe image may be too small to hold the length trailer."
            })?;
            info!(
                "hid {} bits in {} pixels",
                report.payload_bits, report.carrier_pixels
            );
        }
        Mode::Text => {
            let content = fs::read_to_string(&args.payload).with_context(|| {
                format!(
                    "Unable to read text file: {}",
                    args.payload.to_string_lossy().red().bold()
                )
            })?;

            let required = content.chars().count();
            let available = text::capacity_chars(&grid);
            anyhow::ensure!(
                available >= required,
                "Not enough space in the image to hide the text. \nRequired: {} characters, Available: {} characters",
                required.to_string().red().bold(),
                available.to_string().green().bold()
            );

            let report = text::embed(&mut grid, &content).with_context(|| {
                "Text mode only supports characters in the 0-255 range. \nUse binary mode for arbitrary content."
            })?;
            info!(
                "hid {} characters, terminated: {}",
                report.chars_hidden, report.terminated
            );
        }
    }

    grid.to_rgba_image().save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The payload has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用对应编码方式的恢复核心函数，
/// 最后将恢复的内容写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与编码方式的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取或解码输入的图像文件。
/// * 二进制模式下长度头与图像不符。
/// * 文本模式下指定了 `--strict` 且没有找到终止符。
/// * 无法写入到目标文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let extension = match args.mode {
        Mode::Binary => "bin",
        Mode::Text => "txt",
    };
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_path(&args.image, RECOVERED_PREFIX, extension));
    ensure_writable(&output, args.force)?;

    let grid = load_grid(&args.image)?;

    let recovered = match args.mode {
        Mode::Binary => {
            if let Ok(declared_bits) = binary::read_length(&grid) {
                debug!("length header declares {declared_bits} bits");
            }

            binary::extract(&grid).with_context(|| {
                format!(
                    "Failed to recover the payload from '{}'. \nThe image may not contain a hidden payload or is corrupted.",
                    args.image.to_string_lossy().red().bold()
                )
            })?
        }
        Mode::Text => {
            let extraction = text::extract(&grid);
            let content = extraction.to_text();

            if args.strict {
                extraction.into_terminated().with_context(|| {
                    format!(
                        "Failed to recover text from '{}'. \nThe image may not contain hidden text or is corrupted.",
                        args.image.to_string_lossy().red().bold()
                    )
                })?;
            } else if !extraction.is_terminated() {
                warn!(
                    "no terminator found in {}, saving {} recovered characters as-is",
                    args.image.display(),
                    extraction.codes().len()
                );
            }

            content.into_bytes()
        }
    };

    info!("recovered {} bytes", recovered.len());

    fs::write(&output, recovered).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            output.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The payload has been successfully recovered and saved: {}",
        output.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 图像在两种编码方式下的容量。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageCapacity {
    pub width: u32,
    pub height: u32,
    /// 二进制模式可隐藏的字节数。
    pub binary_bytes: usize,
    /// 文本模式可隐藏的字符数 (不含终止符)。
    pub text_chars: usize,
}

/// 读取图像并计算两种编码方式下的容量。
///
/// # Errors
///
/// 无法读取或解码图像文件时返回错误。
pub fn measure_capacity(path: &Path) -> Result<ImageCapacity> {
    let grid = load_grid(path)?;

    Ok(ImageCapacity {
        width: grid.width(),
        height: grid.height(),
        binary_bytes: binary::capacity_bytes(&grid),
        text_chars: text::capacity_chars(&grid),
    })
}

/// 处理 'Capacity' 命令的执行逻辑：打印图像在两种编码方式下能容纳的负载大小。
pub fn handle_capacity(args: CapacityArgs) -> Result<ImageCapacity> {
    let capacity = measure_capacity(&args.image)?;

    println!(
        "{} ({}x{})",
        args.image.to_string_lossy().bold(),
        capacity.width,
        capacity.height
    );
    println!(
        "  binary: {} bytes",
        capacity.binary_bytes.to_string().green().bold()
    );
    println!(
        "  text:   {} characters",
        capacity.text_chars.to_string().green().bold()
    );

    Ok(capacity)
}

/// 读取并解码图像文件，转换为像素网格。
fn load_grid(path: &Path) -> Result<PixelGrid> {
    let image = image::open(path)
        .with_context(|| {
            format!(
                "Unable to read image file: {}",
                path.to_string_lossy().red().bold()
            )
        })?
        .to_rgba8();

    debug!(
        "loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );

    Ok(PixelGrid::from_rgba_image(&image))
}

/// 未指定 `--force` 时拒绝覆盖已存在的文件。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 在 `source` 旁生成 `<prefix><文件名>.<extension>` 形式的默认路径。
fn default_path(source: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    source.with_file_name(format!("{prefix}{stem}.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_sit_next_to_source() {
        let source = Path::new("/tmp/pictures/cover.bmp");
        assert_eq!(
            default_path(source, HIDDEN_IMAGE_PREFIX, "png"),
            PathBuf::from("/tmp/pictures/doctored_cover.png")
        );
        assert_eq!(
            default_path(Path::new("doctored_cover.png"), RECOVERED_PREFIX, "txt"),
            PathBuf::from("recovered_doctored_cover.txt")
        );
    }
}
