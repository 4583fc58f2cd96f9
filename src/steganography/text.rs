//! # 终止符分隔文本编解码 (方案 B)
//!
//! 按行优先顺序遍历像素 (外层 y，内层 x)，只使用 R、G、B 三个通道，
//! 把它们拼接成连续的"槽位"序列。每 8 个槽位存一个字符，字符可以跨越像素边界。
//! 文本末尾写入 8 个零位作为终止符。Alpha 通道从不修改。
//!
//! 嵌入时字符按 LSB 在前写出，提取时按 MSB 在前累加后再反转位序。
//! 合法的 NUL 字符与终止符无法区分，提取会在它处截断。

use crate::bits::parity;
use crate::constants::{BITS_PER_CHAR, TEXT_SLOTS_PER_PIXEL};
use crate::error::{Result, StegoError};
use crate::grid::PixelGrid;
use log::debug;

/// 嵌入状态机的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedState {
    /// 仍在写入文本字符。
    Hiding,
    /// 文本已写完，正在写入零终止符。
    FillingZeros,
}

/// 每组 8 个槽位开始时要执行的动作。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStart {
    /// 载入下一个字符。
    LoadChar,
    /// 文本已用完，开始写零。
    BeginFilling,
    /// 继续写零 (终止符尚未写满)。
    KeepFilling,
    /// 终止符已写满，立即结束。
    Stop,
}

impl EmbedState {
    /// 纯转移函数：根据当前状态、是否还有剩余字符、已写零位数，决定下一状态与动作。
    pub fn at_group_start(self, chars_left: bool, zeros_written: usize) -> (Self, GroupStart) {
        match self {
            Self::FillingZeros if zeros_written >= BITS_PER_CHAR => (self, GroupStart::Stop),
            Self::FillingZeros => (self, GroupStart::KeepFilling),
            Self::Hiding if chars_left => (self, GroupStart::LoadChar),
            Self::Hiding => (Self::FillingZeros, GroupStart::BeginFilling),
        }
    }
}

/// 在 [`GroupStart::Stop`] 时，如果当前像素已经写入了部分槽位 (1 或 2 个)，
/// 就把它提交回网格；刚开始的新像素则不提交。
pub fn commits_partial_pixel(slot: usize) -> bool {
    slot % TEXT_SLOTS_PER_PIXEL != 0
}

/// 一次文本嵌入的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEmbedReport {
    /// 完整写入的字符数。
    pub chars_hidden: usize,
    /// 是否写完了 8 位零终止符。为 `false` 时图像在中途耗尽，提取结果不可靠。
    pub terminated: bool,
}

/// 逐槽位驱动状态机，产生每个槽位要写入的位。
struct SlotWriter<'t> {
    codes: std::slice::Iter<'t, u8>,
    state: EmbedState,
    value: u8,
    loaded: usize,
    zeros: usize,
    slot: usize,
}

impl<'t> SlotWriter<'t> {
    fn new(codes: &'t [u8]) -> Self {
        Self {
            codes: codes.iter(),
            state: EmbedState::Hiding,
            value: 0,
            loaded: 0,
            zeros: 0,
            slot: 0,
        }
    }

    /// 返回 `None` 表示应当停止；否则返回该槽位要写入的位。
    fn next_bit(&mut self) -> Option<u8> {
        if self.slot % BITS_PER_CHAR == 0 {
            let chars_left = !self.codes.as_slice().is_empty();
            let (state, action) = self.state.at_group_start(chars_left, self.zeros);
            self.state = state;
            match action {
                GroupStart::Stop => return None,
                GroupStart::LoadChar => {
                    // at_group_start 只在还有字符时给出 LoadChar
                    self.value = self.codes.next().copied().unwrap_or(0);
                    self.loaded += 1;
                }
                GroupStart::BeginFilling | GroupStart::KeepFilling => {}
            }
        }

        self.slot += 1;
        match self.state {
            EmbedState::Hiding => {
                let bit = self.value % 2;
                self.value /= 2;
                Some(bit)
            }
            EmbedState::FillingZeros => {
                self.zeros += 1;
                Some(0)
            }
        }
    }

    fn report(&self) -> TextEmbedReport {
        let terminated = self.zeros >= BITS_PER_CHAR;
        // 只有在写字符途中耗尽时，最后载入的字符才不完整
        let cut_off = self.state == EmbedState::Hiding && self.slot % BITS_PER_CHAR != 0;
        let chars_hidden = if cut_off {
            self.loaded.saturating_sub(1)
        } else {
            self.loaded
        };
        TextEmbedReport {
            chars_hidden,
            terminated,
        }
    }
}

/// 把 `text` 隐藏到 `grid` 中。
///
/// # Errors
///
/// 任何字符超出 0-255 范围时返回 [`StegoError::UnsupportedCharacter`]，此时网格未被修改。
pub fn embed(grid: &mut PixelGrid, text: &str) -> Result<TextEmbedReport> {
    let codes = text
        .chars()
        .enumerate()
        .map(|(index, character)| {
            u8::try_from(character).map_err(|_| StegoError::UnsupportedCharacter { character, index })
        })
        .collect::<Result<Vec<u8>>>()?;

    Ok(embed_codes(grid, &codes))
}

/// 把字符码序列隐藏到 `grid` 中。
///
/// 图像在终止符写完之前耗尽时不会报错，只在返回值中标记 `terminated == false`。
pub fn embed_codes(grid: &mut PixelGrid, codes: &[u8]) -> TextEmbedReport {
    let mut writer = SlotWriter::new(codes);

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let pixel = &mut grid[(x, y)];
            let mut rgb = pixel.rgb().map(|channel| channel - channel % 2);

            let mut stopped_at = None;
            for (n, channel) in rgb.iter_mut().enumerate() {
                match writer.next_bit() {
                    Some(bit) => *channel += bit,
                    None => {
                        stopped_at = Some(n);
                        break;
                    }
                }
            }

            match stopped_at {
                Some(n) => {
                    if commits_partial_pixel(n) {
                        [pixel.r, pixel.g, pixel.b] = rgb;
                    }
                    debug!("text terminator written, stopped at pixel ({x}, {y})");
                    return writer.report();
                }
                None => {
                    [pixel.r, pixel.g, pixel.b] = rgb;
                }
            }
        }
    }

    let report = writer.report();
    debug!("image exhausted while embedding text: {report:?}");
    report
}

/// 提取结果：恢复的字符码，以及是否遇到了终止符。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextExtraction {
    codes: Vec<u8>,
    terminated: bool,
}

impl TextExtraction {
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    /// 遇到零字节终止符时为 `true`；扫描完整幅图像都没遇到时为 `false`。
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// 按 Latin-1 把字符码解码为字符串。
    pub fn to_text(&self) -> String {
        self.codes.iter().map(|&code| char::from(code)).collect()
    }

    /// 严格模式：没有终止符时返回 [`StegoError::MissingTerminator`]。
    pub fn into_terminated(self) -> Result<Vec<u8>> {
        if self.terminated {
            Ok(self.codes)
        } else {
            Err(StegoError::MissingTerminator {
                recovered_chars: self.codes.len(),
            })
        }
    }
}

/// 从 `grid` 中提取文本，遇到零字节即停止。
///
/// 整幅图像扫描完仍未遇到终止符时，返回已累积的部分文本。
pub fn extract(grid: &PixelGrid) -> TextExtraction {
    let mut codes = Vec::new();
    let mut value = 0u8;
    let mut slot = 0usize;

    for pixel in grid.pixels() {
        for channel in pixel.rgb() {
            value = (value << 1) | parity(channel) as u8;
            slot += 1;

            if slot % BITS_PER_CHAR == 0 {
                let code = value.reverse_bits();
                value = 0;

                if code == 0 {
                    return TextExtraction {
                        codes,
                        terminated: true,
                    };
                }
                codes.push(code);
            }
        }
    }

    TextExtraction {
        codes,
        terminated: false,
    }
}

/// 在写满终止符的前提下，`grid` 最多能容纳的字符数。
pub fn capacity_chars(grid: &PixelGrid) -> usize {
    (grid.pixel_count() * TEXT_SLOTS_PER_PIXEL / BITS_PER_CHAR).saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Pixel;
    use rand::Rng;

    fn random_grid(width: u32, height: u32) -> PixelGrid {
        let mut rng = rand::rng();
        let pixels = (0..width * height)
            .map(|_| Pixel::new(rng.random(), rng.random(), rng.random(), rng.random()))
            .collect();
        PixelGrid::from_pixels(width, height, pixels).unwrap()
    }

    #[test]
    fn transitions() {
        use EmbedState::*;
        use GroupStart::*;

        assert_eq!(Hiding.at_group_start(true, 0), (Hiding, LoadChar));
        assert_eq!(Hiding.at_group_start(false, 0), (FillingZeros, BeginFilling));
        assert_eq!(FillingZeros.at_group_start(false, 0), (FillingZeros, KeepFilling));
        assert_eq!(FillingZeros.at_group_start(false, 8), (FillingZeros, Stop));
    }

    #[test]
    fn partial_pixel_commit_rule() {
        assert!(!commits_partial_pixel(0));
        assert!(commits_partial_pixel(1));
        assert!(commits_partial_pixel(2));
        assert!(!commits_partial_pixel(24));
        assert!(commits_partial_pixel(32));
    }

    #[test]
    fn text_round_trips() {
        let mut grid = random_grid(20, 10);
        let report = embed(&mut grid, "Hello, steganography! ÿé").unwrap();
        assert_eq!(
            report,
            TextEmbedReport {
                chars_hidden: 24,
                terminated: true
            }
        );

        let extraction = extract(&grid);
        assert!(extraction.is_terminated());
        assert_eq!(extraction.to_text(), "Hello, steganography! ÿé");
    }

    #[test]
    fn every_nonzero_code_round_trips() {
        let codes: Vec<u8> = (1..=u8::MAX).collect();
        let mut grid = random_grid(30, 30);
        embed_codes(&mut grid, &codes);
        assert_eq!(extract(&grid).into_terminated().unwrap(), codes);
    }

    #[test]
    fn embedded_nul_truncates() {
        let mut grid = random_grid(10, 10);
        embed(&mut grid, "AB\0CD").unwrap();
        assert_eq!(extract(&grid).to_text(), "AB");
    }

    #[test]
    fn alpha_is_never_modified() {
        let original = random_grid(10, 10);
        let mut grid = original.clone();
        embed(&mut grid, "alpha stays").unwrap();

        let alphas = |g: &PixelGrid| g.pixels().map(|p| p.a).collect::<Vec<_>>();
        assert_eq!(alphas(&grid), alphas(&original));
    }

    #[test]
    fn stops_after_terminator() {
        // 1 个字符 + 终止符 = 16 槽位 → 第 6 个像素写了 1 个槽位后停止
        let original = PixelGrid::new(8, 2, Pixel::splat(255));
        let mut grid = original.clone();
        embed(&mut grid, "A").unwrap();

        // 像素 0..=4 完整写入，像素 5 的 R 在停止前写入并提交
        for x in 0..6 {
            assert!(grid[(x, 0)].rgb() != [255; 3], "pixel ({x}, 0) should be written");
        }
        // 像素 5：槽位 15 (R) 是终止符最后一位，G、B 只被清零
        assert_eq!(grid[(5, 0)].rgb(), [254, 254, 254]);
        for x in 6..8 {
            assert_eq!(grid[(x, 0)], original[(x, 0)]);
        }
        assert_eq!(grid[(0, 1)], original[(0, 1)]);
    }

    #[test]
    fn new_pixel_is_not_committed_at_group_boundary() {
        // 2 个字符 + 终止符 = 24 槽位，正好写满 8 个像素，第 9 个像素不动
        let original = PixelGrid::new(9, 1, Pixel::splat(255));
        let mut grid = original.clone();
        let report = embed(&mut grid, "AB").unwrap();

        assert!(report.terminated);
        assert_eq!(grid[(8, 0)], original[(8, 0)]);
        assert_eq!(extract(&grid).to_text(), "AB");
    }

    #[test]
    fn empty_text_writes_only_terminator() {
        // 8 个零槽位：像素 0、1 写满，像素 2 在 B 槽位处停止，只提交已写的 R、G
        let original = PixelGrid::new(4, 1, Pixel::splat(255));
        let mut grid = original.clone();
        let report = embed(&mut grid, "").unwrap();
        assert_eq!(
            report,
            TextEmbedReport {
                chars_hidden: 0,
                terminated: true
            }
        );
        for x in 0..3 {
            assert_eq!(grid[(x, 0)], Pixel::new(255, 254, 254, 254), "pixel ({x}, 0)");
        }
        assert_eq!(grid[(3, 0)], original[(3, 0)]);

        let extraction = extract(&grid);
        assert!(extraction.is_terminated());
        assert!(extraction.codes().is_empty());
    }

    #[test]
    fn exhausted_during_terminator_counts_last_char() {
        // 4 个像素 = 12 槽位："A" 占 8 个，终止符只写了 4 位
        let mut grid = PixelGrid::new(4, 1, Pixel::splat(0));
        let report = embed(&mut grid, "A").unwrap();
        assert_eq!(
            report,
            TextEmbedReport {
                chars_hidden: 1,
                terminated: false
            }
        );
        assert_eq!(extract(&grid).to_text(), "A");
    }

    #[test]
    fn exhausted_image_leaves_text_unterminated() {
        // 4 个像素 = 12 槽位，只够 1 个字符
        let mut grid = PixelGrid::new(2, 2, Pixel::splat(0));
        let report = embed(&mut grid, "xyz").unwrap();
        assert_eq!(
            report,
            TextEmbedReport {
                chars_hidden: 1,
                terminated: false
            }
        );

        let extraction = extract(&grid);
        assert!(!extraction.is_terminated());
        assert_eq!(extraction.to_text(), "x");
        assert_eq!(
            extraction.into_terminated().unwrap_err(),
            StegoError::MissingTerminator { recovered_chars: 1 }
        );
    }

    #[test]
    fn exact_fit_terminates() {
        let mut grid = random_grid(8, 2);
        let capacity = capacity_chars(&grid);
        assert_eq!(capacity, 5);

        let text = "a".repeat(capacity);
        assert!(embed(&mut grid, &text).unwrap().terminated);
        assert_eq!(extract(&grid).to_text(), text);
    }

    #[test]
    fn wide_characters_are_rejected_before_mutation() {
        let original = random_grid(10, 10);
        let mut grid = original.clone();
        let err = embed(&mut grid, "ok€").unwrap_err();

        assert_eq!(
            err,
            StegoError::UnsupportedCharacter {
                character: '€',
                index: 2
            }
        );
        assert_eq!(grid, original);
    }

    #[test]
    fn extraction_is_idempotent() {
        let mut grid = random_grid(12, 12);
        embed(&mut grid, "twice").unwrap();
        assert_eq!(extract(&grid), extract(&grid));
    }
}
