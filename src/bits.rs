//! # 位转换模块
//!
//! 字节与位序列之间的互转、24 位长度头，以及单个通道的奇偶写入规则。
//! 位序列统一按 MSB 在前排列。

use crate::constants::LENGTH_HEADER_BITS;

/// 把每个字节展开成 8 位，MSB 在前。
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1 == 1))
        .collect()
}

/// [`bytes_to_bits`] 的逆操作。末尾不足 8 位的部分会被丢弃。
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8))
        .collect()
}

/// 把负载位数编码为 24 位大端序长度头。
///
/// 调用方需保证 `bit_count` 不超过 [`crate::constants::MAX_PAYLOAD_BITS`]，高位会被截断。
pub fn length_header(bit_count: usize) -> [bool; LENGTH_HEADER_BITS] {
    std::array::from_fn(|i| (bit_count >> (LENGTH_HEADER_BITS - 1 - i)) & 1 == 1)
}

/// 把大端序位序列解释为无符号整数。
pub fn bits_to_length(bits: &[bool]) -> usize {
    bits.iter().fold(0usize, |acc, &bit| (acc << 1) | bit as usize)
}

/// 调整通道值，使其奇偶性等于 `bit`，改动量至多为 1。
///
/// 奇数值写 0 时减 1，偶数值写 1 时加 1。0 是偶数、255 是奇数，
/// 所以结果永远不会越界。
pub fn embed_parity(value: u8, bit: bool) -> u8 {
    match (value % 2 == 1, bit) {
        (true, false) => value - 1,
        (false, true) => value + 1,
        _ => value,
    }
}

/// 读取通道值的奇偶性作为一位。
pub fn parity(value: u8) -> bool {
    value % 2 == 1
}
