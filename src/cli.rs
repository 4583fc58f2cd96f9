//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// 一款基于 LSB 奇偶编码的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复二进制数据与文本。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB 奇偶编码的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复二进制数据与文本。"
)]
pub struct Cli {
    /// 输出调试日志。
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像中隐藏文件内容。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的内容。
    Recover(RecoverArgs),

    /// 显示图像在两种编码方式下的容量。
    Capacity(CapacityArgs),
}

/// 编码方式。两种方式互不兼容，恢复时必须与隐藏时一致。
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// 任意二进制数据，24 位长度头存于图像右下角。
    #[default]
    Binary,
    /// Latin-1 文本，以零字节结尾。
    Text,
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的内容的文件路径。
    #[arg(short, long)]
    pub payload: PathBuf,

    /// 隐写完成后，保存结果图像的输出路径。默认为输入图像旁的 `doctored_<名称>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 编码方式。
    #[arg(short, long, value_enum, default_value_t = Mode::Binary)]
    pub mode: Mode,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复后保存内容的输出路径。默认为 `recovered_<名称>.bin` 或 `recovered_<名称>.txt`。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 编码方式。
    #[arg(short, long, value_enum, default_value_t = Mode::Binary)]
    pub mode: Mode,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 文本模式下，没有找到终止符时报错而不是保存部分文本。
    #[arg(short, long)]
    pub strict: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要检查的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,
}
