// crates/mt_model/src/lib.rs

//! MariTrack Model Layer (Layer 4)
//!
//! 粒子模拟核心：状态存储、播种校验、数值积分与编排。
//!
//! # 模块概览
//!
//! - [`particle`]: SoA 粒子状态存储 ([`ParticleSet`] / [`ParticleSnapshot`])
//! - [`seeding`]: 播种与校验引擎（水平域判定 + 垂向基准换算）
//! - [`num_method`]: 数值积分方法 (test/euler/rk4/adaptive_rk4)
//! - [`engine`]: 积分引擎（逐步推进 + 越界复查 + 并行化）
//! - [`model`]: [`OptModel`] 编排器 (set_particle_data / seed / update)
//! - [`factory`]: 按数据源名称构造 reader + model 配对
//!
//! # 控制流
//!
//! ```text
//! set_particle_data ─> seed ─> update ─> update ─> ...
//!      (纯赋值)       (校验)    (积分步)
//! ```
//!
//! 粒子间相互独立，同一步内逐粒子推进可并行；
//! 步与步之间严格串行（第 n+1 步依赖第 n 步的场状态）。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod factory;
pub mod model;
pub mod num_method;
pub mod particle;
pub mod seeding;

pub use engine::{IntegrationEngine, StepStats};
pub use factory::{create_model, ModelFactory, ReaderConstructor};
pub use model::OptModel;
pub use num_method::{create_num_method, NumMethod, NumMethodEnum};
pub use particle::{ParticleSet, ParticleSnapshot, ParticleStatus};
pub use seeding::{seed_particles, SeedReport};
