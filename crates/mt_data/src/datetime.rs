// crates/mt_data/src/datetime.rs

//! CF 时间解析与时间读取变体
//!
//! 不同环流模型对时间的编码方式不同：多数模型用单一连续时间变量
//! （CF "units since reference" 约定），FVCOM 则把时间拆成
//! 整数天 (`Itime`) 与当日毫秒 (`Itime2`) 两个低/高精度变量。
//! 本模块提供：
//!
//! - [`CfTimeUnits`]: 解析 "seconds|minutes|hours|days since <时刻>"
//! - [`round_datetimes`]: 按配置间隔对日历时间取整
//! - [`TimeVariableSource`]: 原始时间数组 + 单位元数据的提供接口
//! - [`DateTimeReader`]: 按数据源名称选择的时间读取变体
//!
//! # 使用示例
//!
//! ```
//! use mt_data::datetime::CfTimeUnits;
//!
//! let units = CfTimeUnits::parse("hours since 2020-01-01 00:00:00").unwrap();
//! let dt = units.to_datetime(24.0); // 1天后
//! assert_eq!(dt.format("%Y-%m-%d").to_string(), "2020-01-02");
//! ```

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use std::fmt;

use mt_config::DataSourceConfig;
use mt_foundation::{MtError, MtResult};

/// FVCOM 分裂时间对中毫秒变量的换算系数（天/毫秒）
const DAYS_PER_MILLISECOND: f64 = 1.0 / (1000.0 * 60.0 * 60.0 * 24.0);

// ============================================================
// 时间单位
// ============================================================

/// CF 时间单位类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// 秒
    Seconds,
    /// 分钟
    Minutes,
    /// 小时
    Hours,
    /// 天
    Days,
}

impl TimeUnit {
    /// 从字符串解析
    pub fn parse(s: &str) -> MtResult<Self> {
        match s.to_lowercase().as_str() {
            "second" | "seconds" | "s" => Ok(Self::Seconds),
            "minute" | "minutes" | "min" => Ok(Self::Minutes),
            "hour" | "hours" | "h" | "hr" => Ok(Self::Hours),
            "day" | "days" | "d" => Ok(Self::Days),
            other => Err(MtError::time(format!("未知时间单位: {}", other))),
        }
    }

    /// 转换为秒
    pub fn to_seconds(&self, value: f64) -> f64 {
        match self {
            Self::Seconds => value,
            Self::Minutes => value * 60.0,
            Self::Hours => value * 3600.0,
            Self::Days => value * 86400.0,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds => write!(f, "seconds"),
            Self::Minutes => write!(f, "minutes"),
            Self::Hours => write!(f, "hours"),
            Self::Days => write!(f, "days"),
        }
    }
}

// ============================================================
// CF 时间单位
// ============================================================

/// CF 时间单位
///
/// 表示 "units since reference_time" 格式，参考时刻按标准历解释为 UTC。
#[derive(Debug, Clone)]
pub struct CfTimeUnits {
    /// 时间单位类型
    pub unit: TimeUnit,
    /// 参考时刻
    pub reference: DateTime<Utc>,
}

impl CfTimeUnits {
    /// 从 units 属性解析
    ///
    /// 支持 `"seconds since 1970-01-01 00:00:00"` /
    /// `"days since 1900-01-01"` / ISO `T` 分隔等常见写法。
    pub fn parse(units_str: &str) -> MtResult<Self> {
        let lower = units_str.to_lowercase();
        let since_pos = lower
            .find(" since ")
            .ok_or_else(|| MtError::time(format!("缺少 'since' 关键字: {}", units_str)))?;

        let unit = TimeUnit::parse(units_str[..since_pos].trim())?;

        let ref_str = units_str[since_pos + 7..]
            .trim()
            .trim_end_matches('Z')
            .replace('T', " ");
        let reference = parse_reference(&ref_str)
            .ok_or_else(|| MtError::time(format!("无效的参考时刻: {}", ref_str)))?;

        Ok(Self { unit, reference })
    }

    /// 将 CF 时间值转换为日历时间
    pub fn to_datetime(&self, value: f64) -> DateTime<Utc> {
        let millis = (self.unit.to_seconds(value) * 1000.0).round() as i64;
        self.reference + Duration::milliseconds(millis)
    }

    /// 批量转换时间值
    pub fn to_datetimes(&self, values: &[f64]) -> Vec<DateTime<Utc>> {
        values.iter().map(|&v| self.to_datetime(v)).collect()
    }
}

impl fmt::Display for CfTimeUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} since {}",
            self.unit,
            self.reference.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

fn parse_reference(s: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Some(DateTime::from_naive_utc_and_offset(naive, Utc))
}

// ============================================================
// 时间取整
// ============================================================

/// 将日历时间取整到最近的间隔整倍数
///
/// `interval_secs` 以秒计，四舍五入（半程向上）。
pub fn round_datetime(dt: DateTime<Utc>, interval_secs: u32) -> DateTime<Utc> {
    let interval_ms = i64::from(interval_secs) * 1000;
    let ms = dt.timestamp_millis();
    let rounded = (ms + interval_ms / 2).div_euclid(interval_ms) * interval_ms;
    DateTime::from_timestamp_millis(rounded).unwrap_or(dt)
}

/// 批量取整
pub fn round_datetimes(datetimes: &[DateTime<Utc>], interval_secs: u32) -> Vec<DateTime<Utc>> {
    datetimes
        .iter()
        .map(|&dt| round_datetime(dt, interval_secs))
        .collect()
}

// ============================================================
// 原始时间变量来源
// ============================================================

/// 原始时间变量的提供接口
///
/// 具体数据源（NetCDF 驱动等）通过本接口交出原始时间数组和
/// 对应的单位属性，时间读取变体不感知文件格式。
pub trait TimeVariableSource {
    /// 按变量名取数值数组
    fn values(&self, name: &str) -> MtResult<&[f64]>;

    /// 按变量名取单位属性
    fn units(&self, name: &str) -> MtResult<&str>;
}

/// 内存中的时间变量集合
///
/// 测试与理想化数据源使用。
#[derive(Debug, Clone, Default)]
pub struct InMemoryTimeSource {
    variables: Vec<(String, Vec<f64>, String)>,
}

impl InMemoryTimeSource {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加变量
    pub fn with_variable(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
        units: impl Into<String>,
    ) -> Self {
        self.variables.push((name.into(), values, units.into()));
        self
    }
}

impl TimeVariableSource for InMemoryTimeSource {
    fn values(&self, name: &str) -> MtResult<&[f64]> {
        self.variables
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, v, _)| v.as_slice())
            .ok_or_else(|| MtError::time(format!("时间变量不存在: {}", name)))
    }

    fn units(&self, name: &str) -> MtResult<&str> {
        self.variables
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, _, u)| u.as_str())
            .ok_or_else(|| MtError::time(format!("时间变量不存在: {}", name)))
    }
}

// ============================================================
// 时间读取变体
// ============================================================

/// 时间读取变体
///
/// 按数据源名称选择；读取结果统一为取整后的 UTC 日历时间。
#[derive(Debug, Clone)]
pub enum DateTimeReader {
    /// 单一连续时间变量
    Single {
        /// 时间变量名
        time_var_name: String,
        /// 取整间隔 [s]
        rounding_interval: u32,
    },
    /// 整数天 + 当日毫秒的分裂变量对（FVCOM `Itime`/`Itime2` 约定）
    SplitDayMillisecond {
        /// 整数天变量名
        day_var: String,
        /// 当日毫秒变量名
        millisecond_var: String,
        /// 取整间隔 [s]
        rounding_interval: u32,
    },
}

impl DateTimeReader {
    /// 按数据源名称构造读取变体
    ///
    /// FVCOM 的原生 `time` 变量精度不足，改用 `Itime`/`Itime2`
    /// 变量对重建；其余数据源读取配置命名的单一时间变量。
    pub fn for_source(name: &str, config: &DataSourceConfig) -> Self {
        if name.eq_ignore_ascii_case("fvcom") {
            Self::SplitDayMillisecond {
                day_var: "Itime".into(),
                millisecond_var: "Itime2".into(),
                rounding_interval: config.rounding_interval,
            }
        } else {
            Self::Single {
                time_var_name: config.time_var_name.clone(),
                rounding_interval: config.rounding_interval,
            }
        }
    }

    /// 读取完整时间序列
    pub fn read(&self, source: &dyn TimeVariableSource) -> MtResult<Vec<DateTime<Utc>>> {
        match self {
            Self::Single {
                time_var_name,
                rounding_interval,
            } => {
                let units = CfTimeUnits::parse(source.units(time_var_name)?)?;
                let raw = source.values(time_var_name)?;
                Ok(round_datetimes(&units.to_datetimes(raw), *rounding_interval))
            }
            Self::SplitDayMillisecond {
                day_var,
                millisecond_var,
                rounding_interval,
            } => {
                // 单位取自天变量，毫秒变量折算为天的小数部分
                let units = CfTimeUnits::parse(source.units(day_var)?)?;
                let days = source.values(day_var)?;
                let msecs = source.values(millisecond_var)?;
                MtError::check_size("Itime2", days.len(), msecs.len())?;

                let raw: Vec<f64> = days
                    .iter()
                    .zip(msecs.iter())
                    .map(|(&d, &ms)| d + ms * DAYS_PER_MILLISECOND)
                    .collect();
                Ok(round_datetimes(&units.to_datetimes(&raw), *rounding_interval))
            }
        }
    }

    /// 读取单个时间索引项
    pub fn read_at(
        &self,
        source: &dyn TimeVariableSource,
        time_index: usize,
    ) -> MtResult<DateTime<Utc>> {
        let all = self.read(source)?;
        all.get(time_index).copied().ok_or_else(|| {
            MtError::time(format!(
                "时间索引越界: {} 超出范围 0..{}",
                time_index,
                all.len()
            ))
        })
    }
}

// ============================================================
// 测试
// ============================================================
