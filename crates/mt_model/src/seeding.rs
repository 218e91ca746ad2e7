// crates/mt_model/src/seeding.rs

//! 播种与校验引擎
//!
//! 将外部提供的初始位置转换为有效的域内粒子状态。校验在临时
//! 缓冲上完成，整批通过后才写回存储——任何致命错误都不会留下
//! 半成品状态（回滚语义）。
//!
//! # 校验顺序（逐粒子）
//!
//! 1. 水平域判定：`(x, y)` 在 `time` 时刻是否在模型域内
//! 2. 垂向基准解析：查询该点的水位 ζ 与水深 h
//! 3. 垂向边界检查并换算为规范坐标（绝对高程，表面 ζ、海床 −h）：
//!    - 表面相对深度：z ≤ 0，ζ + z ≥ −h
//!    - 海床相对高度：z ≥ 0，−h + z ≤ ζ
//!
//! # 批次策略
//!
//! 全部粒子水平越界一律立即以域错误拒绝——决不静默产出空运行。
//! 其余失败按 [`SeedPolicy`] 处理：`RejectBatch` 整批拒绝（默认），
//! `FlagInvalid` 标记失败粒子并继续，但要求至少一个粒子有效。

use tracing::debug;

use mt_config::{DepthCoordinates, SeedPolicy, SimulationConfig};
use mt_data::DataReader;
use mt_foundation::{MtError, MtResult};

use crate::particle::{ParticleSet, ParticleStatus};

/// 播种结果报告
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    /// 通过校验、进入有效状态的粒子数
    pub seeded: usize,
    /// 被标记为无效的粒子数（仅 `FlagInvalid` 策略下非零）
    pub rejected: usize,
}

/// 单个粒子的校验结论
#[derive(Debug, Clone, Copy)]
enum Verdict {
    /// 通过，携带规范化垂向坐标
    Valid(f64),
    /// 水平越界
    Outside,
    /// 垂向越界
    VerticalViolation,
}

/// 播种并校验整个粒子批次
///
/// 成功时存储中每个通过的粒子状态为 [`ParticleStatus::Active`]，
/// 垂向坐标已换算为规范坐标；失败时存储保持原状。
pub fn seed_particles(
    store: &mut ParticleSet,
    reader: &dyn DataReader,
    config: &SimulationConfig,
    time: f64,
) -> MtResult<SeedReport> {
    let n = store.len();
    if n == 0 {
        return Err(MtError::invalid_input("播种前未设置粒子数据"));
    }

    // 先做水平域判定：全部越界是无条件的致命错误
    let inside: Vec<bool> = (0..n)
        .map(|i| reader.contains(store.x[i], store.y[i], time))
        .collect();

    if inside.iter().all(|&ok| !ok) {
        return Err(MtError::domain("所有种子粒子均位于模型域之外"));
    }

    // 逐粒子校验，结论写入临时缓冲
    let mut verdicts = Vec::with_capacity(n);
    for i in 0..n {
        if !inside[i] {
            if config.seed_policy == SeedPolicy::RejectBatch {
                return Err(MtError::domain(format!(
                    "种子粒子 {} 位于模型域之外: ({}, {})",
                    i, store.x[i], store.y[i]
                )));
            }
            verdicts.push(Verdict::Outside);
            continue;
        }

        match check_vertical(store, reader, config.depth_coordinates, i, time) {
            Ok(z_abs) => verdicts.push(Verdict::Valid(z_abs)),
            Err(err) => {
                if config.seed_policy == SeedPolicy::RejectBatch {
                    return Err(err);
                }
                verdicts.push(Verdict::VerticalViolation);
            }
        }
    }

    let seeded = verdicts
        .iter()
        .filter(|v| matches!(v, Verdict::Valid(_)))
        .count();
    if seeded == 0 {
        return Err(MtError::domain("没有通过校验的种子粒子"));
    }

    // 整批通过后写回存储
    for (i, verdict) in verdicts.iter().enumerate() {
        match *verdict {
            Verdict::Valid(z_abs) => {
                store.z[i] = z_abs;
                store.status[i] = ParticleStatus::Active;
            }
            Verdict::Outside => store.status[i] = ParticleStatus::OutsideDomain,
            Verdict::VerticalViolation => store.status[i] = ParticleStatus::BoundaryViolation,
        }
    }

    let report = SeedReport {
        seeded,
        rejected: n - seeded,
    };
    debug!(
        seeded = report.seeded,
        rejected = report.rejected,
        policy = %config.seed_policy,
        "粒子播种完成"
    );
    Ok(report)
}

/// 垂向边界检查与规范坐标换算
fn check_vertical(
    store: &ParticleSet,
    reader: &dyn DataReader,
    datum: DepthCoordinates,
    particle: usize,
    time: f64,
) -> MtResult<f64> {
    let (x, y, z_in) = store.position(particle);
    let zeta = reader.free_surface_elevation(x, y, time)?;
    let h = reader.sea_floor_depth(x, y, time)?;
    let floor = -h;

    match datum {
        DepthCoordinates::DepthBelowSurface => {
            // z 为相对表面向下的偏移，正值意味着位于自由表面之上
            if z_in > 0.0 {
                return Err(MtError::bounds_violation(
                    particle,
                    z_in,
                    0.0,
                    "种子粒子高于自由表面",
                ));
            }
            let z_abs = zeta + z_in;
            if z_abs < floor {
                return Err(MtError::bounds_violation(
                    particle,
                    z_in,
                    floor,
                    "种子粒子低于海床",
                ));
            }
            Ok(z_abs)
        }
        DepthCoordinates::HeightAboveFloor => {
            // z 为相对海床向上的偏移，负值意味着位于海床之下
            if z_in < 0.0 {
                return Err(MtError::bounds_violation(
                    particle,
                    z_in,
                    0.0,
                    "种子粒子低于海床",
                ));
            }
            let z_abs = floor + z_in;
            if z_abs > zeta {
                return Err(MtError::bounds_violation(
                    particle,
                    z_in,
                    zeta,
                    "种子粒子高于自由表面",
                ));
            }
            Ok(z_abs)
        }
    }
}

// ============================================================
// 测试
// ============================================================
