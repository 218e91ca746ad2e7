// crates/mt_model/src/engine.rs

//! 积分引擎
//!
//! 按时间步推进全部有效粒子，并在每步之后按播种同样的规则复查
//! 域成员与垂向边界。
//!
//! # 并行策略
//!
//! 同一步内粒子间无耦合，采用"收集后提交"：先（并行）计算每个
//! 粒子的推进结论，再串行写回存储。粒子数低于
//! `min_parallel_size` 时走串行路径，避免小问题的调度开销。
//! 数据源在整个步内只读共享。
//!
//! # 状态转移
//!
//! - 新位置仍在域内且在垂向边界内 → 保持 `Active`
//! - 新位置水平越界 → `OutsideDomain`，位置冻结在离域点
//! - 新位置垂向越界 → `BoundaryViolation`，位置冻结
//!
//! 离域与垂向转移是正常状态迁移而非错误；积分错误
//! （如自适应不收敛）使整步失败且不修改存储。

use glam::DVec3;
use rayon::prelude::*;
use tracing::trace;

use mt_config::NumericsConfig;
use mt_data::DataReader;
use mt_foundation::MtResult;

use crate::num_method::{create_num_method, NumMethodEnum};
use crate::particle::{ParticleSet, ParticleStatus};

/// 低于此粒子数时不启用并行
const DEFAULT_MIN_PARALLEL_SIZE: usize = 256;

/// 单步统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// 本步被推进的粒子数
    pub advanced: usize,
    /// 本步水平离域的粒子数
    pub exited_domain: usize,
    /// 本步垂向越界的粒子数
    pub vertical_violations: usize,
    /// 步后仍有效的粒子数
    pub active_after: usize,
}

/// 单个粒子的推进结论
#[derive(Debug, Clone, Copy)]
enum Advance {
    /// 非有效粒子，跳过
    Skipped,
    /// 推进到新位置，仍有效
    Moved(DVec3),
    /// 新位置水平越界
    Exited(DVec3),
    /// 新位置垂向越界
    VerticalOut(DVec3),
}

/// 积分引擎
///
/// 数值方法在构造时解析一次；`step` 不持有存储，
/// 仅在调用期间借用。
#[derive(Debug, Clone)]
pub struct IntegrationEngine {
    method: NumMethodEnum,
    min_parallel_size: usize,
}

impl IntegrationEngine {
    /// 按数值配置创建引擎
    pub fn new(numerics: &NumericsConfig) -> Self {
        Self {
            method: create_num_method(numerics.num_method, numerics),
            min_parallel_size: DEFAULT_MIN_PARALLEL_SIZE,
        }
    }

    /// 覆盖并行阈值
    pub fn with_min_parallel_size(mut self, n: usize) -> Self {
        self.min_parallel_size = n;
        self
    }

    /// 当前数值方法
    pub fn method(&self) -> &NumMethodEnum {
        &self.method
    }

    /// 推进一个时间步
    ///
    /// `dt == 0` 时为恒等操作。出错（如不收敛）时存储保持原状。
    pub fn step(
        &self,
        store: &mut ParticleSet,
        reader: &dyn DataReader,
        time: f64,
        dt: f64,
    ) -> MtResult<StepStats> {
        let n = store.len();
        if dt == 0.0 {
            return Ok(StepStats {
                active_after: store.n_active(),
                ..Default::default()
            });
        }

        // 并行计算推进结论，串行提交
        let outcomes: Vec<MtResult<Advance>> = if n >= self.min_parallel_size {
            (0..n)
                .into_par_iter()
                .map(|i| self.advance_one(store, reader, i, time, dt))
                .collect()
        } else {
            (0..n)
                .map(|i| self.advance_one(store, reader, i, time, dt))
                .collect()
        };

        let mut stats = StepStats::default();
        let mut resolved = Vec::with_capacity(n);
        for outcome in outcomes {
            resolved.push(outcome?);
        }

        for (i, outcome) in resolved.into_iter().enumerate() {
            match outcome {
                Advance::Skipped => {}
                Advance::Moved(p) => {
                    store.x[i] = p.x;
                    store.y[i] = p.y;
                    store.z[i] = p.z;
                    stats.advanced += 1;
                }
                Advance::Exited(p) => {
                    store.x[i] = p.x;
                    store.y[i] = p.y;
                    store.z[i] = p.z;
                    store.status[i] = ParticleStatus::OutsideDomain;
                    stats.advanced += 1;
                    stats.exited_domain += 1;
                }
                Advance::VerticalOut(p) => {
                    store.x[i] = p.x;
                    store.y[i] = p.y;
                    store.z[i] = p.z;
                    store.status[i] = ParticleStatus::BoundaryViolation;
                    stats.advanced += 1;
                    stats.vertical_violations += 1;
                }
            }
        }

        stats.active_after = store.n_active();
        trace!(
            method = self.method.name(),
            time,
            dt,
            advanced = stats.advanced,
            exited = stats.exited_domain,
            "积分步完成"
        );
        Ok(stats)
    }

    /// 推进单个粒子并复查边界
    fn advance_one(
        &self,
        store: &ParticleSet,
        reader: &dyn DataReader,
        particle: usize,
        time: f64,
        dt: f64,
    ) -> MtResult<Advance> {
        if !store.status(particle).is_active() {
            return Ok(Advance::Skipped);
        }

        let (x, y, z) = store.position(particle);
        let pos = DVec3::new(x, y, z);
        let new_pos = self.method.advect(reader, particle, pos, time, dt)?;

        // 位置未变不会产生新的越界，也无需再查询数据源
        if new_pos == pos {
            return Ok(Advance::Moved(new_pos));
        }

        let t_new = time + dt;
        if !reader.contains(new_pos.x, new_pos.y, t_new) {
            return Ok(Advance::Exited(new_pos));
        }

        let zeta = reader.free_surface_elevation(new_pos.x, new_pos.y, t_new)?;
        let h = reader.sea_floor_depth(new_pos.x, new_pos.y, t_new)?;
        if new_pos.z > zeta || new_pos.z < -h {
            return Ok(Advance::VerticalOut(new_pos));
        }

        Ok(Advance::Moved(new_pos))
    }
}

// ============================================================
// 测试
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use glam::DVec2;
    use mt_config::{NumMethodKind, SimulationConfig};
    use mt_data::IdealizedReader;
    use mt_foundation::MtError;

    use crate::seeding::seed_particles;

    fn numerics(kind: NumMethodKind) -> NumericsConfig {
        NumericsConfig {
            num_method: kind,
            ..Default::default()
        }
    }

    fn seeded_store(reader: &IdealizedReader, x: &[f64], y: &[f64], z: &[f64]) -> ParticleSet {
        let mut store = ParticleSet::new();
        let group_ids = vec![1; x.len()];
        store.set(&group_ids, x, y, z).unwrap();
        seed_particles(&mut store, reader, &SimulationConfig::default(), 0.0).unwrap();
        store
    }

    /// 在 velocity 上 panic 的数据源，用于验证 test 方法不做任何查询
    struct PanicReader;

    impl DataReader for PanicReader {
        fn contains(&self, _x: f64, _y: f64, _time: f64) -> bool {
            panic!("不应查询 contains")
        }
        fn sea_floor_depth(&self, _x: f64, _y: f64, _time: f64) -> MtResult<f64> {
            panic!("不应查询 sea_floor_depth")
        }
        fn free_surface_elevation(&self, _x: f64, _y: f64, _time: f64) -> MtResult<f64> {
            panic!("不应查询 free_surface_elevation")
        }
        fn velocity(&self, _x: f64, _y: f64, _z: f64, _time: f64) -> MtResult<glam::DVec3> {
            panic!("不应查询 velocity")
        }
        fn datetimes(&self) -> MtResult<Vec<DateTime<Utc>>> {
            Ok(Vec::new())
        }
        fn datetime(&self, _time_index: usize) -> MtResult<DateTime<Utc>> {
            panic!("不应查询 datetime")
        }
    }

    #[test]
    fn test_zero_dt_is_identity() {
        let reader = IdealizedReader::new().with_drift(DVec3::new(0.1, 0.0, 0.0));
        let mut store = seeded_store(&reader, &[0.5], &[0.5], &[-0.5]);
        let engine = IntegrationEngine::new(&numerics(NumMethodKind::Euler));

        let before = store.snapshot();
        let stats = engine.step(&mut store, &reader, 0.0, 0.0).unwrap();

        assert_eq!(stats.advanced, 0);
        assert_eq!(stats.active_after, 1);
        let after = store.snapshot();
        assert_eq!(before.x, after.x);
        assert_eq!(before.status, after.status);
    }

    #[test]
    fn test_drift_advances_active_particles() {
        let reader = IdealizedReader::new().with_drift(DVec3::new(0.01, 0.0, 0.0));
        let mut store = seeded_store(&reader, &[0.1, 0.2], &[0.5, 0.5], &[-0.5, -0.5]);
        let engine = IntegrationEngine::new(&numerics(NumMethodKind::Euler));

        let stats = engine.step(&mut store, &reader, 0.0, 10.0).unwrap();
        assert_eq!(stats.advanced, 2);
        assert_eq!(stats.exited_domain, 0);
        assert!((store.position(0).0 - 0.2).abs() < 1e-12);
        assert!((store.position(1).0 - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_domain_exit_freezes_position() {
        let reader = IdealizedReader::new().with_drift(DVec3::new(0.01, 0.0, 0.0));
        let mut store = seeded_store(&reader, &[0.95], &[0.5], &[-0.5]);
        let engine = IntegrationEngine::new(&numerics(NumMethodKind::Euler));

        // 0.95 + 0.1 = 1.05 → 离域
        let stats = engine.step(&mut store, &reader, 0.0, 10.0).unwrap();
        assert_eq!(stats.exited_domain, 1);
        assert_eq!(stats.active_after, 0);
        assert_eq!(store.status(0), ParticleStatus::OutsideDomain);
        let exit_x = store.position(0).0;
        assert!((exit_x - 1.05).abs() < 1e-12);

        // 后续步不再移动
        let stats = engine.step(&mut store, &reader, 10.0, 10.0).unwrap();
        assert_eq!(stats.advanced, 0);
        assert!((store.position(0).0 - exit_x).abs() < 1e-15);
    }

    #[test]
    fn test_vertical_violation_transition() {
        // 向上漂移把粒子推出自由表面
        let reader = IdealizedReader::new().with_drift(DVec3::new(0.0, 0.0, 0.01));
        let mut store = seeded_store(&reader, &[0.5], &[0.5], &[-0.05]);
        let engine = IntegrationEngine::new(&numerics(NumMethodKind::Euler));

        let stats = engine.step(&mut store, &reader, 0.0, 10.0).unwrap();
        assert_eq!(stats.vertical_violations, 1);
        assert_eq!(store.status(0), ParticleStatus::BoundaryViolation);
    }

    #[test]
    fn test_no_op_method_never_queries_reader() {
        let seeding_reader = IdealizedReader::new();
        let mut store = seeded_store(&seeding_reader, &[0.5], &[0.5], &[-0.5]);
        let engine = IntegrationEngine::new(&numerics(NumMethodKind::Test));

        // PanicReader 证明 test 方法全程不触碰数据源
        let stats = engine.step(&mut store, &PanicReader, 0.0, 60.0).unwrap();
        assert_eq!(stats.advanced, 1);
        assert_eq!(store.status(0), ParticleStatus::Active);
        assert!((store.position(0).0 - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_parallel_path_matches_serial() {
        let reader = IdealizedReader::new()
            .with_extent(DVec2::new(-50.0, -50.0), DVec2::new(50.0, 50.0))
            .with_floor_depth(20.0)
            .with_rotation(0.01);
        let n = 64;
        let x: Vec<f64> = (0..n).map(|i| -10.0 + 0.3 * i as f64).collect();
        let y: Vec<f64> = (0..n).map(|i| -8.0 + 0.25 * i as f64).collect();
        let z = vec![-1.0; n];

        let mut serial = seeded_store(&reader, &x, &y, &z);
        let mut parallel = serial.clone();

        let base = numerics(NumMethodKind::Rk4);
        let serial_engine = IntegrationEngine::new(&base).with_min_parallel_size(usize::MAX);
        let parallel_engine = IntegrationEngine::new(&base).with_min_parallel_size(1);

        serial_engine.step(&mut serial, &reader, 0.0, 30.0).unwrap();
        parallel_engine.step(&mut parallel, &reader, 0.0, 30.0).unwrap();

        for i in 0..n {
            let a = serial.position(i);
            let b = parallel.position(i);
            assert!((a.0 - b.0).abs() < 1e-15);
            assert!((a.1 - b.1).abs() < 1e-15);
        }
    }

    #[test]
    fn test_convergence_error_leaves_store_unchanged() {
        let reader = IdealizedReader::new()
            .with_extent(DVec2::new(-50.0, -50.0), DVec2::new(50.0, 50.0))
            .with_floor_depth(20.0)
            .with_rotation(0.05);
        let mut store = seeded_store(&reader, &[10.0, 12.0], &[0.0, 0.0], &[-1.0, -1.0]);

        let mut cfg = numerics(NumMethodKind::AdaptiveRk4);
        cfg.adaptive.tolerance = 1e-300;
        cfg.adaptive.max_refinements = 1;
        let engine = IntegrationEngine::new(&cfg);

        let before = store.snapshot();
        let err = engine.step(&mut store, &reader, 0.0, 3600.0).unwrap_err();
        assert!(matches!(err, MtError::Convergence { .. }));

        let after = store.snapshot();
        assert_eq!(before.x, after.x);
        assert_eq!(before.status, after.status);
    }
}
