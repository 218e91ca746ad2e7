// crates/mt_model/src/model.rs

//! 粒子追踪模型编排器
//!
//! [`OptModel`] 独占持有粒子存储，串接播种与积分两个阶段。
//! 本类型只做时序编排：域判定、垂向换算、数值推进分别在
//! [`crate::seeding`] 与 [`crate::engine`] 中实现并单独测试。

use std::fmt;

use tracing::info;

use mt_config::{RunConfig, SimulationConfig};
use mt_data::DataReader;
use mt_foundation::{MtError, MtResult};

use crate::engine::{IntegrationEngine, StepStats};
use crate::particle::{ParticleSet, ParticleSnapshot};
use crate::seeding::{seed_particles, SeedReport};

/// 离线粒子追踪模型
///
/// 调用顺序：[`set_particle_data`](OptModel::set_particle_data) →
/// [`seed`](OptModel::seed) → 重复 [`update`](OptModel::update)。
/// 运行可在步与步之间中止，不支持步内中止。
pub struct OptModel {
    simulation: SimulationConfig,
    engine: IntegrationEngine,
    reader: Box<dyn DataReader>,
    store: ParticleSet,
    seeded: bool,
}

impl fmt::Debug for OptModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptModel")
            .field("simulation", &self.simulation)
            .field("engine", &self.engine)
            .field("store", &self.store)
            .field("seeded", &self.seeded)
            .finish_non_exhaustive()
    }
}

impl OptModel {
    /// 创建模型
    ///
    /// 数值方法按配置解析一次；配置须先通过
    /// [`RunConfig::validate`]（工厂路径已保证）。
    pub fn new(config: &RunConfig, reader: Box<dyn DataReader>) -> MtResult<Self> {
        config.validate()?;
        Ok(Self {
            simulation: config.simulation.clone(),
            engine: IntegrationEngine::new(&config.numerics),
            reader,
            store: ParticleSet::new(),
            seeded: false,
        })
    }

    /// 设置粒子初始数据
    ///
    /// 纯数据赋值，不做域校验；校验在 [`seed`](OptModel::seed) 中进行。
    pub fn set_particle_data(
        &mut self,
        group_ids: &[i32],
        x: &[f64],
        y: &[f64],
        z: &[f64],
    ) -> MtResult<()> {
        self.seeded = false;
        self.store.set(group_ids, x, y, z)
    }

    /// 播种：校验初始位置并激活粒子
    ///
    /// 失败（域错误/垂向越界）时存储保持原状，运行应当中止。
    pub fn seed(&mut self, time: f64) -> MtResult<SeedReport> {
        let report = seed_particles(&mut self.store, self.reader.as_ref(), &self.simulation, time)?;
        self.seeded = true;
        info!(
            seeded = report.seeded,
            rejected = report.rejected,
            time,
            "播种完成"
        );
        Ok(report)
    }

    /// 推进一个时间步
    pub fn update(&mut self, time: f64, dt: f64) -> MtResult<StepStats> {
        if !self.seeded {
            return Err(MtError::invalid_input("尚未播种，不能推进"));
        }
        self.engine
            .step(&mut self.store, self.reader.as_ref(), time, dt)
    }

    /// 只读快照（用于上报）
    pub fn snapshot(&self) -> ParticleSnapshot {
        self.store.snapshot()
    }

    /// 粒子总数
    pub fn n_particles(&self) -> usize {
        self.store.len()
    }

    /// 有效粒子数
    pub fn n_active(&self) -> usize {
        self.store.n_active()
    }

    /// 当前数值方法名称
    pub fn num_method_name(&self) -> &'static str {
        self.engine.method().name()
    }

    /// 数据源引用
    pub fn reader(&self) -> &dyn DataReader {
        self.reader.as_ref()
    }
}
