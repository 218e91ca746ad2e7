// apps/mt_cli/src/main.rs

//! MariTrack 命令行界面
//!
//! 提供拉格朗日粒子追踪模拟的命令行工具。
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 5: Application**：只使用 `RunConfig` 与
//! 工厂构造的 `OptModel`，不接触数值与校验细节。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// MariTrack 拉格朗日粒子追踪命令行工具
#[derive(Parser)]
#[command(name = "mt_cli")]
#[command(author = "MariTrack Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MariTrack Lagrangian particle tracking", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行模拟
    Run(commands::run::RunArgs),
    /// 显示信息
    Info(commands::info::InfoArgs),
    /// 验证配置
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 执行命令
    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
