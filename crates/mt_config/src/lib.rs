// crates/mt_config/src/lib.rs

//! MariTrack Config Layer (Layer 2)
//!
//! 运行配置层，提供粒子追踪模拟的全部可配置项。
//!
//! # 模块概览
//!
//! - [`options`]: 枚举型配置项（垂向基准、播种策略、数值方法）
//! - [`run_config`]: [`RunConfig`] 运行配置（serde JSON，含校验）
//!
//! # 设计原则
//!
//! 1. **类型化枚举**: 方法/基准等选项在反序列化时即确定，
//!    不在运行期做字符串分发
//! 2. **显式校验**: 配置加载后调用 `validate()`，
//!    未识别的模型名在工厂阶段以类型化错误拒绝
//! 3. **全 f64 配置**: 数值项统一使用 f64 存储

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod options;
pub mod run_config;

pub use options::{DepthCoordinates, NumMethodKind, SeedPolicy};
pub use run_config::{AdaptiveConfig, DataSourceConfig, NumericsConfig, RunConfig, SimulationConfig};
