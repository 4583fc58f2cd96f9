//! # 长度前缀二进制编解码 (方案 A)
//!
//! 按列优先顺序遍历像素 (外层 x，内层 y)，每个像素的 A、R、G、B 通道各存一位。
//! 最后一行的最后 6 个像素是保留尾部，存放 24 位大端序的负载位数，
//! 从不用于负载数据。

use crate::bits::{bits_to_bytes, bits_to_length, bytes_to_bits, embed_parity, length_header, parity};
use crate::constants::{CHANNELS_PER_PIXEL, MAX_PAYLOAD_BITS, TRAILER_PIXELS};
use crate::error::{Result, StegoError};
use crate::grid::{Pixel, PixelGrid};
use log::debug;

/// 一次成功嵌入的统计信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryEmbedReport {
    /// 写入的负载位数 (即长度头中的值)。
    pub payload_bits: usize,
    /// 承载负载位的像素数，不含保留尾部。
    pub carrier_pixels: usize,
}

/// 把 `payload` 隐藏到 `grid` 中，原地修改像素。
///
/// 所有容量检查都在修改之前完成：失败时 `grid` 保持原样。
///
/// # Errors
///
/// * [`StegoError::CapacityExceeded`]：负载超过 16,777,215 位，或所需像素数超过非保留像素数。
/// * [`StegoError::GridTooSmall`]：图像放不下完整的长度尾部。
pub fn embed(grid: &mut PixelGrid, payload: &[u8]) -> Result<BinaryEmbedReport> {
    let bits = bytes_to_bits(payload);

    if bits.len() > MAX_PAYLOAD_BITS {
        return Err(StegoError::CapacityExceeded {
            required_bits: bits.len(),
            available_bits: MAX_PAYLOAD_BITS,
        });
    }

    let payload_pixels = payload_pixels(grid)?;
    if bits.len().div_ceil(CHANNELS_PER_PIXEL) > payload_pixels {
        return Err(StegoError::CapacityExceeded {
            required_bits: bits.len(),
            available_bits: payload_pixels * CHANNELS_PER_PIXEL,
        });
    }

    debug!(
        "embedding {} payload bits into {}x{} grid ({} carrier pixels available)",
        bits.len(),
        grid.width(),
        grid.height(),
        payload_pixels
    );

    let (width, height) = (grid.width(), grid.height());
    let mut header_bits = length_header(bits.len()).into_iter();
    let mut payload_bits = bits.iter().copied().peekable();
    let mut carrier_pixels = 0;

    for (x, y) in column_major(width, height) {
        if in_trailer(width, height, x, y) {
            write_pixel(&mut grid[(x, y)], &mut header_bits);
        } else if payload_bits.peek().is_some() {
            write_pixel(&mut grid[(x, y)], &mut payload_bits);
            carrier_pixels += 1;
        }
    }

    Ok(BinaryEmbedReport {
        payload_bits: bits.len(),
        carrier_pixels,
    })
}

/// 从 `grid` 中恢复由 [`embed`] 隐藏的负载。
///
/// 负载像素的读取顺序与嵌入时相同，并同样跳过保留尾部。
///
/// # Errors
///
/// * [`StegoError::GridTooSmall`]：图像放不下长度尾部。
/// * [`StegoError::TruncatedStream`]：长度头声明的位数超出图像容量，
///   通常说明图像中并没有隐藏数据。
pub fn extract(grid: &PixelGrid) -> Result<Vec<u8>> {
    let declared_bits = read_length(grid)?;
    let payload_pixels = payload_pixels(grid)?;
    let needed_pixels = declared_bits.div_ceil(CHANNELS_PER_PIXEL);

    if needed_pixels > payload_pixels {
        return Err(StegoError::TruncatedStream {
            declared_bits,
            available_bits: payload_pixels * CHANNELS_PER_PIXEL,
        });
    }

    let (width, height) = (grid.width(), grid.height());
    let bits: Vec<bool> = column_major(width, height)
        .filter(|&(x, y)| !in_trailer(width, height, x, y))
        .take(needed_pixels)
        .flat_map(|(x, y)| read_pixel(&grid[(x, y)]))
        .take(declared_bits)
        .collect();

    debug!("recovered {} of {} declared bits", bits.len(), declared_bits);

    Ok(bits_to_bytes(&bits))
}

/// 只读取保留尾部中的长度头，返回声明的负载位数。
///
/// # Errors
///
/// 图像放不下长度尾部时返回 [`StegoError::GridTooSmall`]。
pub fn read_length(grid: &PixelGrid) -> Result<usize> {
    ensure_trailer(grid)?;

    let y = grid.height() - 1;
    let header: Vec<bool> = (grid.width() - TRAILER_PIXELS..grid.width())
        .flat_map(|x| read_pixel(&grid[(x, y)]))
        .collect();

    Ok(bits_to_length(&header))
}

/// [`embed`] 能接受的最大负载位数。图像放不下长度尾部时为 0。
pub fn capacity_bits(grid: &PixelGrid) -> usize {
    payload_pixels(grid)
        .map(|pixels| (pixels * CHANNELS_PER_PIXEL).min(MAX_PAYLOAD_BITS))
        .unwrap_or(0)
}

/// [`embed`] 能接受的最大负载字节数。
pub fn capacity_bytes(grid: &PixelGrid) -> usize {
    capacity_bits(grid) / 8
}

fn ensure_trailer(grid: &PixelGrid) -> Result<()> {
    if grid.width() < TRAILER_PIXELS || grid.height() == 0 {
        return Err(StegoError::GridTooSmall {
            width: grid.width(),
            height: grid.height(),
        });
    }
    Ok(())
}

fn payload_pixels(grid: &PixelGrid) -> Result<usize> {
    ensure_trailer(grid)?;
    Ok(grid.pixel_count() - TRAILER_PIXELS as usize)
}

fn column_major(width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    (0..width).flat_map(move |x| (0..height).map(move |y| (x, y)))
}

/// `x > width - 7 && y > height - 2`，写成不会下溢的形式。
fn in_trailer(width: u32, height: u32, x: u32, y: u32) -> bool {
    x + TRAILER_PIXELS >= width && y + 1 >= height
}

fn write_pixel(pixel: &mut Pixel, bits: &mut impl Iterator<Item = bool>) {
    for channel in pixel.argb_mut() {
        let Some(bit) = bits.next() else {
            break;
        };
        *channel = embed_parity(*channel, bit);
    }
}

fn read_pixel(pixel: &Pixel) -> [bool; CHANNELS_PER_PIXEL] {
    pixel.argb().map(parity)
}
