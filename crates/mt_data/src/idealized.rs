// crates/mt_data/src/idealized.rs

//! 理想化矩形海盆数据源
//!
//! 平底矩形海盆 + 刚体旋转流场 + 均匀漂移，时间索引按固定间隔合成。
//! 用于演示运行、工厂默认注册项以及积分方法的精度验证
//! （刚体旋转是时间可逆的）。

use chrono::{DateTime, Duration, TimeZone, Utc};
use glam::{DVec2, DVec3};

use mt_foundation::{MtError, MtResult};

use crate::reader::DataReader;

/// 理想化海盆数据源
///
/// 域为 `[min, max]` 矩形，底床平坦（水深 `floor_depth`），
/// 水位恒为 `surface_elevation`。流速场：
///
/// ```text
/// u = -ω (y - yc) + drift.x
/// v =  ω (x - xc) + drift.y
/// w =  drift.z
/// ```
///
/// 其中 `(xc, yc)` 为海盆中心。流速在全平面有定义（边界外外推），
/// 域成员关系只由 `contains` 判定。
#[derive(Debug, Clone)]
pub struct IdealizedReader {
    min: DVec2,
    max: DVec2,
    floor_depth: f64,
    surface_elevation: f64,
    omega: f64,
    drift: DVec3,
    start: DateTime<Utc>,
    interval_secs: f64,
    n_times: usize,
}

impl Default for IdealizedReader {
    /// 单位正方形海盆：水深 1 m，水位 0 m，静止流场
    fn default() -> Self {
        Self {
            min: DVec2::ZERO,
            max: DVec2::ONE,
            floor_depth: 1.0,
            surface_elevation: 0.0,
            omega: 0.0,
            drift: DVec3::ZERO,
            start: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            interval_secs: 3600.0,
            n_times: 25,
        }
    }
}

impl IdealizedReader {
    /// 创建默认海盆
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置域范围
    pub fn with_extent(mut self, min: DVec2, max: DVec2) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// 设置水深 [m]
    pub fn with_floor_depth(mut self, h: f64) -> Self {
        self.floor_depth = h;
        self
    }

    /// 设置水位 [m]
    pub fn with_surface_elevation(mut self, zeta: f64) -> Self {
        self.surface_elevation = zeta;
        self
    }

    /// 设置刚体旋转角速度 [rad/s]
    pub fn with_rotation(mut self, omega: f64) -> Self {
        self.omega = omega;
        self
    }

    /// 设置均匀漂移流速 [m/s]
    pub fn with_drift(mut self, drift: DVec3) -> Self {
        self.drift = drift;
        self
    }

    /// 设置时间索引（起始时刻、间隔、条目数）
    pub fn with_time_index(
        mut self,
        start: DateTime<Utc>,
        interval_secs: f64,
        n_times: usize,
    ) -> Self {
        self.start = start;
        self.interval_secs = interval_secs;
        self.n_times = n_times;
        self
    }

    /// 海盆中心
    #[inline]
    pub fn center(&self) -> DVec2 {
        0.5 * (self.min + self.max)
    }
}

impl DataReader for IdealizedReader {
    fn contains(&self, x: f64, y: f64, _time: f64) -> bool {
        x >= self.min.x && x <= self.max.x && y >= self.min.y && y <= self.max.y
    }

    fn sea_floor_depth(&self, _x: f64, _y: f64, _time: f64) -> MtResult<f64> {
        Ok(self.floor_depth)
    }

    fn free_surface_elevation(&self, _x: f64, _y: f64, _time: f64) -> MtResult<f64> {
        Ok(self.surface_elevation)
    }

    fn velocity(&self, x: f64, y: f64, _z: f64, _time: f64) -> MtResult<DVec3> {
        let c = self.center();
        Ok(DVec3::new(
            -self.omega * (y - c.y) + self.drift.x,
            self.omega * (x - c.x) + self.drift.y,
            self.drift.z,
        ))
    }

    fn datetimes(&self) -> MtResult<Vec<DateTime<Utc>>> {
        Ok((0..self.n_times)
            .map(|i| {
                self.start
                    + Duration::milliseconds((i as f64 * self.interval_secs * 1000.0) as i64)
            })
            .collect())
    }

    fn datetime(&self, time_index: usize) -> MtResult<DateTime<Utc>> {
        if time_index >= self.n_times {
            return Err(MtError::time(format!(
                "时间索引越界: {} 超出范围 0..{}",
                time_index, self.n_times
            )));
        }
        Ok(self.start
            + Duration::milliseconds((time_index as f64 * self.interval_secs * 1000.0) as i64))
    }
}
