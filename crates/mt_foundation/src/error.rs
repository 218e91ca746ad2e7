// crates/mt_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `MtError` 枚举和 `MtResult` 类型别名，用于整个项目的错误处理。
//!
//! # 设计原则
//!
//! 1. **单层错误**: 粒子追踪核心规模有限，全部错误集中在本枚举
//! 2. **易用性**: 每个变体提供便捷构造方法
//! 3. **可诊断**: 数值类错误携带粒子索引、时刻、步长等上下文
//!
//! # 错误分类
//!
//! - 输入类: [`MtError::InvalidInput`] / [`MtError::SizeMismatch`]
//! - 播种类: [`MtError::Domain`] / [`MtError::BoundsViolation`]
//! - 积分类: [`MtError::Convergence`]
//! - 构造类: [`MtError::UnsupportedModel`] / 配置错误
//! - 外围类: IO、时间解析

use std::path::PathBuf;
use thiserror::Error;

/// 统一结果类型
pub type MtResult<T> = Result<T, MtError>;

/// MariTrack 错误类型
#[derive(Error, Debug)]
pub enum MtError {
    // ========================================================================
    // 输入相关错误
    // ========================================================================

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 并行数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    // ========================================================================
    // 播种相关错误
    // ========================================================================

    /// 种子批次水平位置全部落在模型域之外
    #[error("粒子域错误: {message}")]
    Domain {
        /// 具体错误信息
        message: String,
    },

    /// 垂向坐标越界（高于自由表面或低于海床）
    #[error("垂向越界: 粒子 {particle} z={z}, 边界 {bound}: {message}")]
    BoundsViolation {
        /// 粒子索引
        particle: usize,
        /// 输入的垂向坐标
        z: f64,
        /// 被违反的边界值
        bound: f64,
        /// 具体错误信息
        message: String,
    },

    // ========================================================================
    // 积分相关错误
    // ========================================================================

    /// 自适应子步细化预算耗尽
    #[error("积分不收敛: 粒子 {particle} t={time} dt={dt}, 细化 {refinements} 次后仍超差")]
    Convergence {
        /// 粒子索引
        particle: usize,
        /// 当前时刻 [s]
        time: f64,
        /// 时间步长 [s]
        dt: f64,
        /// 已执行的细化次数
        refinements: u32,
    },

    // ========================================================================
    // 构造与配置错误
    // ========================================================================

    /// 不支持的数据源/环流模型名称
    #[error("不支持的环流模型: {name}")]
    UnsupportedModel {
        /// 配置给出的名称
        name: String,
    },

    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    /// 缺少配置项
    #[error("缺少必需的配置项: {key}")]
    MissingConfig {
        /// 配置键名
        key: String,
    },

    /// 配置值无效
    #[error("配置值无效: {key}={value}, 原因: {reason}")]
    InvalidConfig {
        /// 配置键名
        key: String,
        /// 配置值
        value: String,
        /// 无效原因说明
        reason: String,
    },

    // ========================================================================
    // 外围错误
    // ========================================================================

    /// 时间解析或换算错误
    #[error("时间错误: {message}")]
    Time {
        /// 具体错误信息
        message: String,
    },

    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 文件不存在
    #[error("文件不存在: {path}")]
    FileNotFound {
        /// 未找到的路径
        path: PathBuf,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl MtError {
    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 域错误
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain {
            message: message.into(),
        }
    }

    /// 垂向越界
    pub fn bounds_violation(
        particle: usize,
        z: f64,
        bound: f64,
        message: impl Into<String>,
    ) -> Self {
        Self::BoundsViolation {
            particle,
            z,
            bound,
            message: message.into(),
        }
    }

    /// 积分不收敛
    pub fn convergence(particle: usize, time: f64, dt: f64, refinements: u32) -> Self {
        Self::Convergence {
            particle,
            time,
            dt,
            refinements,
        }
    }

    /// 不支持的模型
    pub fn unsupported_model(name: impl Into<String>) -> Self {
        Self::UnsupportedModel { name: name.into() }
    }

    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 缺少配置
    pub fn missing_config(key: impl Into<String>) -> Self {
        Self::MissingConfig { key: key.into() }
    }

    /// 配置值无效
    pub fn invalid_config(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// 时间错误
    pub fn time(message: impl Into<String>) -> Self {
        Self::Time {
            message: message.into(),
        }
    }

    /// IO 错误
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// 文件不存在
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl MtError {
    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> MtResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }
}

impl From<std::io::Error> for MtError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

// ========================================================================
// 测试
// ========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MtError::config("测试配置错误");
        assert!(err.to_string().contains("配置错误"));
    }

    #[test]
    fn test_size_mismatch_display() {
        let err = MtError::size_mismatch("x", 10, 5);
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("5"));
    }

    #[test]
    fn test_convergence_context() {
        let err = MtError::convergence(3, 120.0, 60.0, 12);
        let text = err.to_string();
        assert!(text.contains('3'));
        assert!(text.contains("120"));
        assert!(text.contains("12"));
    }

    #[test]
    fn test_bounds_violation_context() {
        let err = MtError::bounds_violation(0, 0.1, 0.0, "高于自由表面");
        assert!(matches!(err, MtError::BoundsViolation { particle: 0, .. }));
    }

    #[test]
    fn test_check_size() {
        assert!(MtError::check_size("test", 10, 10).is_ok());
        assert!(MtError::check_size("test", 10, 5).is_err());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let mt_err: MtError = io_err.into();
        assert!(matches!(mt_err, MtError::Io { .. }));
    }

    #[test]
    fn test_unsupported_model() {
        let err = MtError::unsupported_model("HYCOM");
        assert!(err.to_string().contains("HYCOM"));
    }
}
