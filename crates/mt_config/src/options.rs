// crates/mt_config/src/options.rs

//! 枚举型配置项
//!
//! 将字符串配置值映射为类型化枚举，反序列化阶段完成解析。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 垂向坐标基准
///
/// 决定外部给出的粒子 z 坐标如何解释：
/// - `DepthBelowSurface`: z 为相对自由表面向下的深度偏移（非正值）
/// - `HeightAboveFloor`: z 为相对海床向上的高度偏移（非负值）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DepthCoordinates {
    /// 表面相对深度
    #[default]
    DepthBelowSurface,
    /// 海床相对高度
    HeightAboveFloor,
}

impl fmt::Display for DepthCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DepthBelowSurface => write!(f, "depth_below_surface"),
            Self::HeightAboveFloor => write!(f, "height_above_floor"),
        }
    }
}

/// 播种批次的部分失败策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// 任一粒子校验失败即整批拒绝
    #[default]
    RejectBatch,
    /// 仅标记失败粒子，有效子集继续模拟（要求至少一个粒子有效）
    FlagInvalid,
}

impl fmt::Display for SeedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RejectBatch => write!(f, "reject_batch"),
            Self::FlagInvalid => write!(f, "flag_invalid"),
        }
    }
}

/// 数值积分方法
///
/// 在引擎构造时解析一次，积分循环内不再做字符串比较。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NumMethodKind {
    /// 测试用恒等变换（不查询数据源）
    Test,
    /// 一阶显式欧拉
    Euler,
    /// 经典四阶 Runge-Kutta (默认推荐)
    #[default]
    Rk4,
    /// 步长倍增自适应 RK4
    AdaptiveRk4,
}

impl NumMethodKind {
    /// 全部可用方法（供 CLI info 列举）
    pub const ALL: [NumMethodKind; 4] = [
        Self::Test,
        Self::Euler,
        Self::Rk4,
        Self::AdaptiveRk4,
    ];
}

impl fmt::Display for NumMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Test => write!(f, "test"),
            Self::Euler => write!(f, "euler"),
            Self::Rk4 => write!(f, "rk4"),
            Self::AdaptiveRk4 => write!(f, "adaptive_rk4"),
        }
    }
}
