// crates/mt_foundation/src/lib.rs

//! MariTrack Foundation Layer
//!
//! 零依赖基础层（仅依赖 thiserror），提供整个项目的统一错误抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 [`MtError`] 与结果别名 [`MtResult`]
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: mt_cli        ─> anyhow 包装
//! Layer 4: mt_model      ─> 粒子模拟核心
//! Layer 3: mt_data       ─> 数据源抽象
//! Layer 2: mt_config     ─> 运行配置
//! Layer 1: mt_foundation ─> MtError / MtResult (本层)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

pub use error::{MtError, MtResult};
