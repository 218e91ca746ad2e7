// apps/mt_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示版本、已注册数据源与可用数值方法。

use anyhow::Result;
use clap::Args;

use mt_config::{NumMethodKind, RunConfig};
use mt_model::ModelFactory;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 显示默认配置 JSON
    #[arg(long)]
    pub defaults: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    println!("=== MariTrack 信息 ===");
    println!("MariTrack CLI 版本: {}", env!("CARGO_PKG_VERSION"));
    println!("目标平台: {}", std::env::consts::ARCH);
    println!("操作系统: {}", std::env::consts::OS);

    let factory = ModelFactory::with_defaults();
    println!("\n已注册数据源:");
    for name in factory.registered_names() {
        println!("  - {}", name);
    }

    println!("\n可用数值方法:");
    for kind in NumMethodKind::ALL {
        println!("  - {}", kind);
    }

    if args.defaults {
        println!("\n=== 默认配置 ===");
        let config = RunConfig::default();
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    Ok(())
}
