/// 每个像素参与二进制编码 (方案 A) 的通道数：A、R、G、B。
pub const CHANNELS_PER_PIXEL: usize = 4;

/// 文本编码 (方案 B) 只使用的颜色通道数：R、G、B。
pub const TEXT_SLOTS_PER_PIXEL: usize = 3;

/// 长度头所占的位数。
/// 长度以 24 位大端序存储，因此负载最多 2^24 - 1 位。
pub const LENGTH_HEADER_BITS: usize = 24;

/// 保留尾部的像素数 (最后一行的最后 6 列)。
/// 6 个像素 × 4 个通道 = 24 位，正好容纳长度头。
pub const TRAILER_PIXELS: u32 = (LENGTH_HEADER_BITS / CHANNELS_PER_PIXEL) as u32;

/// 长度头能表示的最大负载位数。
pub const MAX_PAYLOAD_BITS: usize = (1 << LENGTH_HEADER_BITS) - 1;

/// 一个字符占用的通道槽位数。
pub const BITS_PER_CHAR: usize = 8;

/// 未指定输出路径时，隐写图像文件名的前缀。
pub const HIDDEN_IMAGE_PREFIX: &str = "doctored_";

/// 未指定输出路径时，恢复文件名的前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";
