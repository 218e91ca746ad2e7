// apps/mt_cli/src/commands/run.rs

//! 运行模拟命令
//!
//! 按配置构造模型，播种一个释放批次并逐步推进。
//! 释放批次来自 JSON 文件（group_ids/x/y/z 并行数组），
//! 未指定文件时在默认理想化海盆内布置演示网格。

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use mt_config::RunConfig;
use mt_model::create_model;

/// 运行模拟参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径（JSON；缺省使用默认配置）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 释放批次文件路径（JSON 并行数组）
    #[arg(short, long)]
    pub release: Option<PathBuf>,

    /// 推进步数
    #[arg(short, long, default_value = "24")]
    pub steps: u64,

    /// 覆盖配置中的时间步长 [秒]
    #[arg(long)]
    pub dt: Option<f64>,

    /// 播种时刻 [秒]
    #[arg(long, default_value = "0.0")]
    pub start_time: f64,
}

/// 释放批次（并行数组，与粒子索引一一对应）
#[derive(Debug, Deserialize)]
struct Release {
    group_ids: Vec<i32>,
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

impl Release {
    /// 默认理想化海盆内的 3×3 演示网格，水深 0.5 m 处释放
    fn demo_grid() -> Self {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..3 {
            for j in 0..3 {
                x.push(0.25 + 0.25 * i as f64);
                y.push(0.25 + 0.25 * j as f64);
            }
        }
        let n = x.len();
        Self {
            group_ids: vec![1; n],
            x,
            y,
            z: vec![-0.5; n],
        }
    }

    fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取释放批次文件: {}", path.display()))?;
        serde_json::from_str(&content).context("释放批次解析失败")
    }
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== MariTrack 模拟启动 ===");

    let mut config = match &args.config {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?,
        None => RunConfig::default(),
    };
    if let Some(dt) = args.dt {
        config.numerics.time_step = dt;
    }
    config.validate().context("配置校验失败")?;

    info!(
        "数据源: {}, 数值方法: {}, dt={} s",
        config.data_source.name, config.numerics.num_method, config.numerics.time_step
    );

    let mut model = create_model(&config).context("构造模型失败")?;

    // 释放批次
    let release = match &args.release {
        Some(path) => Release::from_file(path)?,
        None => {
            info!("未指定释放批次，使用演示网格");
            Release::demo_grid()
        }
    };
    info!("释放批次: {} 个粒子", release.group_ids.len());

    model
        .set_particle_data(&release.group_ids, &release.x, &release.y, &release.z)
        .context("设置粒子数据失败")?;

    let report = model.seed(args.start_time).context("播种失败")?;
    info!("播种: {} 有效, {} 被标记", report.seeded, report.rejected);

    // 模拟循环
    let dt = config.numerics.time_step;
    let wall = Instant::now();
    let mut time = args.start_time;

    for step in 0..args.steps {
        let stats = model
            .update(time, dt)
            .with_context(|| format!("第 {} 步失败 (t={} s)", step, time))?;
        time += dt;

        if stats.exited_domain > 0 || stats.vertical_violations > 0 {
            warn!(
                "t={:.1} s: {} 离域, {} 垂向越界, 剩余 {} 有效",
                time, stats.exited_domain, stats.vertical_violations, stats.active_after
            );
        }

        if stats.active_after == 0 {
            warn!("全部粒子已离域，提前结束于第 {} 步", step + 1);
            break;
        }
    }

    let elapsed = wall.elapsed();
    let snap = model.snapshot();

    info!("=== 模拟完成 ===");
    info!("模拟时长: {:.1} s (模型时间)", time - args.start_time);
    info!("计算时间: {:.3} s", elapsed.as_secs_f64());
    info!("粒子: {} 总数, {} 有效", snap.len(), snap.n_active());

    println!("\n=== 粒子终态 ===");
    for i in 0..snap.len() {
        println!(
            "  #{:<4} 组 {:<4} ({:>10.4}, {:>10.4}, {:>9.4})  {:?}",
            i, snap.group_ids[i], snap.x[i], snap.y[i], snap.z[i], snap.status[i]
        );
    }

    Ok(())
}
