// crates/mt_model/src/num_method.rs

//! 数值积分方法
//!
//! 对单个粒子位置求解平流方程 dx/dt = u(x, t)，u 由数据源查询。
//!
//! ## 可用方法
//!
//! - `test`: 恒等变换，不查询数据源，用于单元测试
//! - `euler`: 一阶显式欧拉
//! - `rk4`: 经典四阶 Runge-Kutta (默认推荐)
//! - `adaptive_rk4`: 步长倍增自适应 RK4
//!
//! ### 经典 RK4
//!
//! ```text
//! k1 = u(x, t)
//! k2 = u(x + dt/2 k1, t + dt/2)
//! k3 = u(x + dt/2 k2, t + dt/2)
//! k4 = u(x + dt k3,   t + dt)
//! x' = x + dt/6 (k1 + 2 k2 + 2 k3 + k4)
//! ```
//!
//! ### 步长倍增误差估计
//!
//! 每个子步比较一次整步与两次半步的结果，二者之差作为局部误差
//! 估计。超差时子步减半重试；细化次数到达预算上限仍超差则返回
//! [`MtError::Convergence`]，决不交出未收敛的位置。
//!
//! ## 参考文献
//!
//! 1. Press, W. H., et al. (2007). Numerical Recipes (3rd ed.),
//!    §17.2 Adaptive Stepsize Control for Runge-Kutta.

use glam::DVec3;

use mt_config::{NumMethodKind, NumericsConfig};
use mt_data::DataReader;
use mt_foundation::{MtError, MtResult};

/// 数值积分方法 trait
///
/// 实现者对单个粒子做一个时间步的推进；`particle` 仅用于
/// 错误上下文，方法本身不访问粒子存储。
pub trait NumMethod: Send + Sync {
    /// 方法名称
    fn name(&self) -> &'static str;

    /// 时间精度阶数
    fn order(&self) -> u8;

    /// 推进单个粒子一个时间步，返回新位置
    fn advect(
        &self,
        reader: &dyn DataReader,
        particle: usize,
        pos: DVec3,
        time: f64,
        dt: f64,
    ) -> MtResult<DVec3>;
}

// ============================================================
// 具体方法
// ============================================================

/// 测试用恒等变换
///
/// 不查询数据源，位置原样返回。用于在无场数据的情况下
/// 验证编排与存储契约。
#[derive(Debug, Clone, Copy, Default)]
pub struct TestNumMethod;

impl NumMethod for TestNumMethod {
    fn name(&self) -> &'static str {
        "test"
    }

    fn order(&self) -> u8 {
        0
    }

    fn advect(
        &self,
        _reader: &dyn DataReader,
        _particle: usize,
        pos: DVec3,
        _time: f64,
        _dt: f64,
    ) -> MtResult<DVec3> {
        Ok(pos)
    }
}

/// 一阶显式欧拉
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerNumMethod;

impl NumMethod for EulerNumMethod {
    fn name(&self) -> &'static str {
        "euler"
    }

    fn order(&self) -> u8 {
        1
    }

    fn advect(
        &self,
        reader: &dyn DataReader,
        _particle: usize,
        pos: DVec3,
        time: f64,
        dt: f64,
    ) -> MtResult<DVec3> {
        let u = reader.velocity(pos.x, pos.y, pos.z, time)?;
        Ok(pos + u * dt)
    }
}

/// 经典四阶 Runge-Kutta
#[derive(Debug, Clone, Copy, Default)]
pub struct Rk4NumMethod;

impl Rk4NumMethod {
    /// 单个 RK4 步
    fn rk4_step(
        reader: &dyn DataReader,
        pos: DVec3,
        time: f64,
        dt: f64,
    ) -> MtResult<DVec3> {
        let half = 0.5 * dt;
        let k1 = reader.velocity(pos.x, pos.y, pos.z, time)?;
        let p2 = pos + k1 * half;
        let k2 = reader.velocity(p2.x, p2.y, p2.z, time + half)?;
        let p3 = pos + k2 * half;
        let k3 = reader.velocity(p3.x, p3.y, p3.z, time + half)?;
        let p4 = pos + k3 * dt;
        let k4 = reader.velocity(p4.x, p4.y, p4.z, time + dt)?;
        Ok(pos + (k1 + 2.0 * k2 + 2.0 * k3 + k4) * (dt / 6.0))
    }
}

impl NumMethod for Rk4NumMethod {
    fn name(&self) -> &'static str {
        "rk4"
    }

    fn order(&self) -> u8 {
        4
    }

    fn advect(
        &self,
        reader: &dyn DataReader,
        _particle: usize,
        pos: DVec3,
        time: f64,
        dt: f64,
    ) -> MtResult<DVec3> {
        Self::rk4_step(reader, pos, time, dt)
    }
}

/// 步长倍增自适应 RK4
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveRk4NumMethod {
    /// 位置误差容差 [m]
    tolerance: f64,
    /// 最大细化次数
    max_refinements: u32,
}

impl AdaptiveRk4NumMethod {
    /// 按数值配置创建
    pub fn new(tolerance: f64, max_refinements: u32) -> Self {
        Self {
            tolerance,
            max_refinements,
        }
    }
}

impl NumMethod for AdaptiveRk4NumMethod {
    fn name(&self) -> &'static str {
        "adaptive_rk4"
    }

    fn order(&self) -> u8 {
        4
    }

    fn advect(
        &self,
        reader: &dyn DataReader,
        particle: usize,
        pos: DVec3,
        time: f64,
        dt: f64,
    ) -> MtResult<DVec3> {
        if dt == 0.0 {
            return Ok(pos);
        }

        let end = time + dt;
        let direction = dt.signum();
        let mut refinements: u32 = 0;
        let mut sub = dt;
        let mut t = time;
        let mut p = pos;

        // 剩余区间小于步长容差即视为完成
        let eps = dt.abs() * 1e-12;

        while (end - t) * direction > eps {
            let remaining = end - t;
            let step = if sub.abs() < remaining.abs() {
                sub
            } else {
                remaining
            };

            let full = Rk4NumMethod::rk4_step(reader, p, t, step)?;
            let mid = Rk4NumMethod::rk4_step(reader, p, t, 0.5 * step)?;
            let halves = Rk4NumMethod::rk4_step(reader, mid, t + 0.5 * step, 0.5 * step)?;

            if (full - halves).length() <= self.tolerance {
                // 半步解精度更高，取其为本子步结果
                p = halves;
                t += step;
            } else {
                refinements += 1;
                if refinements > self.max_refinements {
                    return Err(MtError::convergence(particle, time, dt, self.max_refinements));
                }
                sub = 0.5 * step;
            }
        }

        Ok(p)
    }
}

// ============================================================
// 枚举分发
// ============================================================

/// 数值方法枚举包装器 - 替代 Box<dyn NumMethod>
///
/// 在引擎构造时按配置解析一次，积分循环内静态分发。
#[derive(Debug, Clone, Copy)]
pub enum NumMethodEnum {
    /// 测试用恒等变换
    Test(TestNumMethod),
    /// 一阶显式欧拉
    Euler(EulerNumMethod),
    /// 经典四阶 Runge-Kutta
    Rk4(Rk4NumMethod),
    /// 自适应 RK4
    AdaptiveRk4(AdaptiveRk4NumMethod),
}

impl NumMethodEnum {
    /// 方法名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Test(m) => m.name(),
            Self::Euler(m) => m.name(),
            Self::Rk4(m) => m.name(),
            Self::AdaptiveRk4(m) => m.name(),
        }
    }

    /// 时间精度阶数
    pub fn order(&self) -> u8 {
        match self {
            Self::Test(m) => m.order(),
            Self::Euler(m) => m.order(),
            Self::Rk4(m) => m.order(),
            Self::AdaptiveRk4(m) => m.order(),
        }
    }

    /// 推进单个粒子一个时间步
    pub fn advect(
        &self,
        reader: &dyn DataReader,
        particle: usize,
        pos: DVec3,
        time: f64,
        dt: f64,
    ) -> MtResult<DVec3> {
        match self {
            Self::Test(m) => m.advect(reader, particle, pos, time, dt),
            Self::Euler(m) => m.advect(reader, particle, pos, time, dt),
            Self::Rk4(m) => m.advect(reader, particle, pos, time, dt),
            Self::AdaptiveRk4(m) => m.advect(reader, particle, pos, time, dt),
        }
    }
}

/// 按配置创建数值方法
pub fn create_num_method(kind: NumMethodKind, numerics: &NumericsConfig) -> NumMethodEnum {
    match kind {
        NumMethodKind::Test => NumMethodEnum::Test(TestNumMethod),
        NumMethodKind::Euler => NumMethodEnum::Euler(EulerNumMethod),
        NumMethodKind::Rk4 => NumMethodEnum::Rk4(Rk4NumMethod),
        NumMethodKind::AdaptiveRk4 => NumMethodEnum::AdaptiveRk4(AdaptiveRk4NumMethod::new(
            numerics.adaptive.tolerance,
            numerics.adaptive.max_refinements,
        )),
    }
}

// ============================================================
// 测试
// ============================================================
