//! # 像素网格模块
//!
//! 编解码器只认识 [`PixelGrid`]：宽、高，以及每个像素 4 个独立的 8 位通道。
//! 与 `image` crate 之间的转换也放在这里，文件读写则交给调用方。

use crate::error::{Result, StegoError};
use image::{Rgba, RgbaImage};
use std::ops::{Index, IndexMut};

/// 一个像素的 4 个通道。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// 所有通道取同一个值。
    pub const fn splat(value: u8) -> Self {
        Self::new(value, value, value, value)
    }

    /// 按 A、R、G、B 顺序返回可变通道引用。
    pub fn argb_mut(&mut self) -> [&mut u8; 4] {
        [&mut self.a, &mut self.r, &mut self.g, &mut self.b]
    }

    /// 按 A、R、G、B 顺序返回通道值。
    pub const fn argb(&self) -> [u8; 4] {
        [self.a, self.r, self.g, self.b]
    }

    pub const fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// 以 `(x, y)` 寻址的二维像素网格，内部按行存储。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl PixelGrid {
    /// 创建一个每个像素都等于 `fill` 的网格。
    pub fn new(width: u32, height: u32, fill: Pixel) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    /// 用按行排列的像素创建网格。
    ///
    /// # Errors
    ///
    /// 如果 `pixels.len()` 不等于 `width * height`，返回 [`StegoError::DimensionMismatch`]。
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(StegoError::DimensionMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&Pixel> {
        self.pixels.get(self.offset(x, y)?)
    }

    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut Pixel> {
        let offset = self.offset(x, y)?;
        self.pixels.get_mut(offset)
    }

    /// 按行顺序遍历全部像素。
    pub fn pixels(&self) -> impl Iterator<Item = &Pixel> {
        self.pixels.iter()
    }

    /// 从 `image` crate 的 RGBA 缓冲区构建网格。
    pub fn from_rgba_image(image: &RgbaImage) -> Self {
        let pixels = image
            .pixels()
            .map(|&Rgba([r, g, b, a])| Pixel::new(a, r, g, b))
            .collect();

        Self {
            width: image.width(),
            height: image.height(),
            pixels,
        }
    }

    /// 转换回 `image` crate 的 RGBA 缓冲区，以便编码保存。
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let p = self[(x, y)];
            Rgba([p.r, p.g, p.b, p.a])
        })
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }
}

impl Index<(u32, u32)> for PixelGrid {
    type Output = Pixel;

    fn index(&self, (x, y): (u32, u32)) -> &Pixel {
        self.get(x, y)
            .unwrap_or_else(|| panic!("pixel ({x}, {y}) outside {}x{} grid", self.width, self.height))
    }
}

impl IndexMut<(u32, u32)> for PixelGrid {
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut Pixel {
        let (width, height) = (self.width, self.height);
        self.get_mut(x, y)
            .unwrap_or_else(|| panic!("pixel ({x}, {y}) outside {width}x{height} grid"))
    }
}
