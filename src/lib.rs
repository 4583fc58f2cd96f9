//! # parity_lsb 库
//!
//! 本库包含 LSB 奇偶隐写工具的核心逻辑：
//! 作用于 [`grid::PixelGrid`] 的两种编解码方案，以及命令行外壳。

// 声明库包含的所有模块。

pub mod bits;
pub mod cli;
pub mod constants;
pub mod error;
pub mod grid;
pub mod handler;
pub mod steganography;

pub use error::{Result, StegoError};
pub use grid::{Pixel, PixelGrid};
