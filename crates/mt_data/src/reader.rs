// crates/mt_data/src/reader.rs

//! 数据源读取抽象
//!
//! 抽象一个环流模型数据源（海洋/大气/波浪）的空间与时间查询接口。

use chrono::{DateTime, Utc};
use glam::DVec3;

use mt_foundation::MtResult;

/// 环流数据读取接口
///
/// 粒子核心查询数据源的唯一通道。实现方负责网格定位与插值；
/// 查询为同步且有界的，一个积分步内以只读方式在线程间共享。
///
/// 约定：
/// - 水深 `sea_floor_depth` 为正值，海床位于 `z = -h`
/// - 水位 `free_surface_elevation` 为基准面起算的 ζ
/// - `velocity` 对域边界附近的点外推取值；域成员关系仅由
///   [`contains`](DataReader::contains) 判定
pub trait DataReader: Send + Sync {
    /// 水平点 `(x, y)` 在 `time` 时刻是否位于有效模型域内
    fn contains(&self, x: f64, y: f64, time: f64) -> bool;

    /// 点 `(x, y)` 处的海床水深 h [m]
    fn sea_floor_depth(&self, x: f64, y: f64, time: f64) -> MtResult<f64>;

    /// 点 `(x, y)` 处的自由表面水位 ζ [m]
    fn free_surface_elevation(&self, x: f64, y: f64, time: f64) -> MtResult<f64>;

    /// 点 `(x, y, z)` 处的三维流速 [m/s]
    fn velocity(&self, x: f64, y: f64, z: f64, time: f64) -> MtResult<DVec3>;

    /// 完整时间索引（已取整的日历时间序列）
    fn datetimes(&self) -> MtResult<Vec<DateTime<Utc>>>;

    /// 单个时间索引项
    fn datetime(&self, time_index: usize) -> MtResult<DateTime<Utc>>;
}
