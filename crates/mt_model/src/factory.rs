// crates/mt_model/src/factory.rs

//! 模型工厂
//!
//! 按配置中的数据源名称构造匹配的 Data Reader 与模型配对。
//! 默认注册理想化海盆数据源；FVCOM/ROMS 等具体读取器由调用方
//! 通过 [`ModelFactory::register`] 挂入。未识别的名称以
//! [`MtError::UnsupportedModel`] 拒绝，不落入任何兜底分支。

use mt_config::RunConfig;
use mt_data::{DataReader, IdealizedReader};
use mt_foundation::{MtError, MtResult};

use crate::model::OptModel;

/// Data Reader 构造函数
pub type ReaderConstructor = fn(&RunConfig) -> MtResult<Box<dyn DataReader>>;

/// 模型工厂
#[derive(Default)]
pub struct ModelFactory {
    constructors: Vec<(String, ReaderConstructor)>,
}

fn build_idealized(_config: &RunConfig) -> MtResult<Box<dyn DataReader>> {
    Ok(Box::new(IdealizedReader::new()))
}

impl ModelFactory {
    /// 创建空工厂（无任何注册项）
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建带默认注册项的工厂
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        factory.register("idealized", build_idealized);
        factory
    }

    /// 注册数据源构造函数
    ///
    /// 同名（不区分大小写）的已有注册项会被替换。
    pub fn register(&mut self, name: impl Into<String>, ctor: ReaderConstructor) {
        let name = name.into();
        self.constructors
            .retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.constructors.push((name, ctor));
    }

    /// 已注册的数据源名称
    pub fn registered_names(&self) -> Vec<&str> {
        self.constructors.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// 按配置构造模型
    pub fn create(&self, config: &RunConfig) -> MtResult<OptModel> {
        config.validate()?;
        let name = config.data_source.name.as_str();
        let ctor = self
            .constructors
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, c)| *c)
            .ok_or_else(|| MtError::unsupported_model(name))?;

        let reader = ctor(config)?;
        OptModel::new(config, reader)
    }
}

/// 使用默认注册表按配置构造模型
pub fn create_model(config: &RunConfig) -> MtResult<OptModel> {
    ModelFactory::with_defaults().create(config)
}

// ============================================================
// 测试
// ============================================================
