use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;

use parity_lsb::{
    cli::{Cli, Commands},
    handler::{handle_capacity, handle_hide, handle_recover},
};

/// 初始化日志系统
///
/// 默认输出 `warn` 及以上级别，`--verbose` 时输出 `debug`；
/// `RUST_LOG` 环境变量优先于二者。
fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    Builder::new()
        .filter_level(level)
        .parse_env(Env::default())
        .format_timestamp(None)
        .init();
}

/// 程序的主入口点
///
/// 负责解析命令行参数，并根据指定的子命令（`hide`、`recover` 或 `capacity`）
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    init_logger(cli.verbose);

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Hide(args) => handle_hide(args),
        Commands::Recover(args) => handle_recover(args),
        Commands::Capacity(args) => handle_capacity(args).map(|_| ()),
    }
}
