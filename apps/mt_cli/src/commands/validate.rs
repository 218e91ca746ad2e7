// apps/mt_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 验证运行配置文件的正确性，不构造模型、不触碰数据。

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use mt_config::RunConfig;
use mt_model::ModelFactory;

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 同时检查数据源名称是否已注册
    #[arg(long)]
    pub check_source: bool,
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("验证配置: {}", args.config.display());

    let config = RunConfig::from_file(&args.config)
        .with_context(|| format!("配置无效: {}", args.config.display()))?;

    println!("  ✓ JSON 解析通过");
    println!("  ✓ 数值范围检查通过");
    println!(
        "  数据源={}, 方法={}, dt={} s, 垂向基准={}",
        config.data_source.name,
        config.numerics.num_method,
        config.numerics.time_step,
        config.simulation.depth_coordinates
    );

    if args.check_source {
        let factory = ModelFactory::with_defaults();
        let registered = factory
            .registered_names()
            .iter()
            .any(|n| n.eq_ignore_ascii_case(&config.data_source.name));
        if registered {
            println!("  ✓ 数据源已注册");
        } else {
            bail!(
                "数据源 '{}' 未注册 (已注册: {:?})",
                config.data_source.name,
                factory.registered_names()
            );
        }
    }

    println!("\n✓ 验证通过");
    Ok(())
}
