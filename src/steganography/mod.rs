//! # 隐写核心算法
//!
//! 两种互不兼容的 LSB 奇偶编解码方案：
//!
//! * [`binary`]：列优先遍历，24 位长度头存于图像右下角的 6 个保留像素。
//! * [`text`]：行优先遍历，以零字节终止。
//!
//! 两者都只借用 [`crate::grid::PixelGrid`]，嵌入时原地修改，提取时只读。

pub mod binary;
pub mod text;
