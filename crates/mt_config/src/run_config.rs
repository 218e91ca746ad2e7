// crates/mt_config/src/run_config.rs

//! RunConfig - 运行配置（全 f64）
//!
//! 定义一次粒子追踪运行的全部配置参数，JSON 序列化存储。
//! 加载后必须通过 `validate()` 校验。

use serde::{Deserialize, Serialize};
use std::path::Path;

use mt_foundation::{MtError, MtResult};

use crate::options::{DepthCoordinates, NumMethodKind, SeedPolicy};

/// 运行配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunConfig {
    /// 数据源配置
    #[serde(default)]
    pub data_source: DataSourceConfig,

    /// 模拟配置
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// 数值配置
    #[serde(default)]
    pub numerics: NumericsConfig,
}

/// 数据源配置
///
/// `name` 同时选择具体 Data Reader 与时间读取变体
/// （如 FVCOM 使用整数天 + 毫秒的分裂时间对）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// 数据源名称 (如 "FVCOM", "ROMS", "idealized")
    #[serde(default = "default_source_name")]
    pub name: String,

    /// 时间变量名
    #[serde(default = "default_time_var_name")]
    pub time_var_name: String,

    /// 时间取整间隔 [s]
    #[serde(default = "default_rounding_interval")]
    pub rounding_interval: u32,
}

fn default_source_name() -> String {
    "idealized".into()
}
fn default_time_var_name() -> String {
    "time".into()
}
fn default_rounding_interval() -> u32 {
    3600
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            name: default_source_name(),
            time_var_name: default_time_var_name(),
            rounding_interval: default_rounding_interval(),
        }
    }
}

/// 模拟配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SimulationConfig {
    /// 垂向坐标基准
    #[serde(default)]
    pub depth_coordinates: DepthCoordinates,

    /// 播种部分失败策略
    #[serde(default)]
    pub seed_policy: SeedPolicy,
}

/// 数值配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericsConfig {
    /// 数值积分方法
    #[serde(default)]
    pub num_method: NumMethodKind,

    /// 时间步长 [s]
    #[serde(default = "default_time_step")]
    pub time_step: f64,

    /// 自适应子步配置
    #[serde(default)]
    pub adaptive: AdaptiveConfig,
}

fn default_time_step() -> f64 {
    60.0
}

impl Default for NumericsConfig {
    fn default() -> Self {
        Self {
            num_method: NumMethodKind::default(),
            time_step: default_time_step(),
            adaptive: AdaptiveConfig::default(),
        }
    }
}

/// 自适应子步配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveConfig {
    /// 位置误差容差 [m]
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// 最大细化次数
    #[serde(default = "default_max_refinements")]
    pub max_refinements: u32,
}

fn default_tolerance() -> f64 {
    1e-3
}
fn default_max_refinements() -> u32 {
    12
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_refinements: default_max_refinements(),
        }
    }
}

impl RunConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> MtResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MtError::file_not_found(path));
        }
        let content = std::fs::read_to_string(path)?;
        let config: RunConfig = serde_json::from_str(&content)
            .map_err(|e| MtError::config(format!("配置解析失败: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> MtResult<()> {
        if self.data_source.name.trim().is_empty() {
            return Err(MtError::missing_config("data_source.name"));
        }

        if self.data_source.time_var_name.trim().is_empty() {
            return Err(MtError::missing_config("data_source.time_var_name"));
        }

        if self.data_source.rounding_interval == 0 {
            return Err(MtError::invalid_config(
                "data_source.rounding_interval",
                "0",
                "取整间隔必须为正秒数",
            ));
        }

        if !self.numerics.time_step.is_finite() || self.numerics.time_step <= 0.0 {
            return Err(MtError::invalid_config(
                "numerics.time_step",
                self.numerics.time_step.to_string(),
                "时间步长必须为正",
            ));
        }

        if !self.numerics.adaptive.tolerance.is_finite() || self.numerics.adaptive.tolerance <= 0.0
        {
            return Err(MtError::invalid_config(
                "numerics.adaptive.tolerance",
                self.numerics.adaptive.tolerance.to_string(),
                "容差必须为正",
            ));
        }

        if self.numerics.adaptive.max_refinements == 0 {
            return Err(MtError::invalid_config(
                "numerics.adaptive.max_refinements",
                "0",
                "细化次数至少为 1",
            ));
        }

        Ok(())
    }
}
