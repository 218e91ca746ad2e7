// crates/mt_data/src/lib.rs

//! MariTrack Data Layer (Layer 3)
//!
//! 数据源抽象层，定义粒子核心与具体环流模型数据之间的边界。
//!
//! # 模块概览
//!
//! - [`reader`]: [`DataReader`] trait，域判定/水深/水位/流速/时间索引查询
//! - [`datetime`]: CF 时间单位解析、取整与时间读取变体
//! - [`idealized`]: 理想化矩形海盆数据源（演示与测试）
//!
//! # 设计原则
//!
//! 1. **窄接口**: 粒子核心只通过 [`DataReader`] 查询数据，
//!    不感知文件格式
//! 2. **只读共享**: 一个积分步内 reader 以 `&dyn` 在工作线程间共享
//! 3. **时间变体可替换**: 不同模型的时间编码由
//!    [`datetime::DateTimeReader`] 的变体处理，按数据源名称选择

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod datetime;
pub mod idealized;
pub mod reader;

pub use datetime::{CfTimeUnits, DateTimeReader, InMemoryTimeSource, TimeUnit, TimeVariableSource};
pub use idealized::IdealizedReader;
pub use reader::DataReader;
