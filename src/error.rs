//! # 错误类型模块
//!
//! [`StegoError`] 涵盖编解码核心的所有失败情况。
//! 容量与尺寸类错误总是在修改像素之前检查并返回。

use thiserror::Error;

/// 隐写编码或解码过程中可能出现的错误。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 负载超出长度头可表示的范围，或超出图像中非保留像素的容量。
    #[error("Not enough space: payload needs {required_bits} bits, but only {available_bits} are available")]
    CapacityExceeded {
        required_bits: usize,
        available_bits: usize,
    },

    /// 图像放不下完整的 6 像素长度尾部。
    #[error("Image of {width}x{height} pixels is too small to hold the 6-pixel length trailer")]
    GridTooSmall { width: u32, height: u32 },

    /// 长度头声明的位数超出了图像实际能承载的位数。
    #[error(
        "Length header declares {declared_bits} bits, but the image only carries {available_bits}; it probably holds no hidden payload"
    )]
    TruncatedStream {
        declared_bits: usize,
        available_bits: usize,
    },

    /// 扫描完整幅图像也没有遇到零字节终止符。
    #[error("No terminator found after {recovered_chars} characters")]
    MissingTerminator { recovered_chars: usize },

    /// 文本中含有超出 0-255 范围的字符。
    #[error("Character {character:?} at index {index} is outside the 0-255 range")]
    UnsupportedCharacter { character: char, index: usize },

    /// 像素数量与宽高不符。
    #[error("Expected {expected} pixels, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, StegoError>;
