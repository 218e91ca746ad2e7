// crates/mt_model/src/particle.rs

//! 粒子状态存储
//!
//! 采用 SoA (Structure of Arrays) 布局，按粒子索引对齐的并行数组：
//!
//! ```text
//! group_ids: [g_0, g_1, g_2, ...]
//! x:         [x_0, x_1, x_2, ...]
//! y:         [y_0, y_1, y_2, ...]
//! z:         [z_0, z_1, z_2, ...]
//! status:    [s_0, s_1, s_2, ...]
//! ```
//!
//! 粒子从不被删除：离域以状态标记表示，保证粒子索引与全部
//! 并行数组的位置对应关系在整个运行期间稳定。

use serde::{Deserialize, Serialize};

use mt_foundation::{MtError, MtResult};

/// 粒子状态标志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParticleStatus {
    /// 已赋值但尚未通过播种校验
    #[default]
    Pending,
    /// 有效，参与积分
    Active,
    /// 已离开水平模型域，位置冻结
    OutsideDomain,
    /// 违反垂向边界，位置冻结
    BoundaryViolation,
}

impl ParticleStatus {
    /// 是否参与后续积分
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// 粒子集合（SoA 布局）
///
/// 一次运行期间由编排器独占持有；播种与积分引擎仅在单次调用内
/// 以引用访问。粒子数在播种后固定，积分期间不增不减。
#[derive(Debug, Clone, Default)]
pub struct ParticleSet {
    pub(crate) group_ids: Vec<i32>,
    pub(crate) x: Vec<f64>,
    pub(crate) y: Vec<f64>,
    pub(crate) z: Vec<f64>,
    pub(crate) status: Vec<ParticleStatus>,
}

impl ParticleSet {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 替换整个粒子集
    ///
    /// 四个数组必须等长且非空；状态全部重置为 [`ParticleStatus::Pending`]。
    pub fn set(
        &mut self,
        group_ids: &[i32],
        x: &[f64],
        y: &[f64],
        z: &[f64],
    ) -> MtResult<()> {
        let n = group_ids.len();
        if n == 0 {
            return Err(MtError::invalid_input("粒子数据为空"));
        }
        MtError::check_size("x_positions", n, x.len())?;
        MtError::check_size("y_positions", n, y.len())?;
        MtError::check_size("z_positions", n, z.len())?;

        self.group_ids = group_ids.to_vec();
        self.x = x.to_vec();
        self.y = y.to_vec();
        self.z = z.to_vec();
        self.status = vec![ParticleStatus::Pending; n];
        Ok(())
    }

    /// 粒子数量
    #[inline]
    pub fn len(&self) -> usize {
        self.group_ids.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.group_ids.is_empty()
    }

    /// 有效粒子数量
    pub fn n_active(&self) -> usize {
        self.status.iter().filter(|s| s.is_active()).count()
    }

    /// 单个粒子的状态
    #[inline]
    pub fn status(&self, particle: usize) -> ParticleStatus {
        self.status[particle]
    }

    /// 单个粒子的位置
    #[inline]
    pub fn position(&self, particle: usize) -> (f64, f64, f64) {
        (self.x[particle], self.y[particle], self.z[particle])
    }

    /// 单个粒子的组号
    #[inline]
    pub fn group_id(&self, particle: usize) -> i32 {
        self.group_ids[particle]
    }

    /// 只读快照（用于上报，无副作用）
    pub fn snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot {
            group_ids: self.group_ids.clone(),
            x: self.x.clone(),
            y: self.y.clone(),
            z: self.z.clone(),
            status: self.status.clone(),
        }
    }
}

/// 粒子集合的只读快照
///
/// 数组顺序与粒子索引一致，可直接序列化上报。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleSnapshot {
    /// 组号（释放批次标识，核心不解释其含义）
    pub group_ids: Vec<i32>,
    /// 水平 x 坐标
    pub x: Vec<f64>,
    /// 水平 y 坐标
    pub y: Vec<f64>,
    /// 规范化垂向坐标（基准面起算的绝对高程）
    pub z: Vec<f64>,
    /// 状态标志
    pub status: Vec<ParticleStatus>,
}

impl ParticleSnapshot {
    /// 粒子数量
    pub fn len(&self) -> usize {
        self.group_ids.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.group_ids.is_empty()
    }

    /// 有效粒子数量
    pub fn n_active(&self) -> usize {
        self.status.iter().filter(|s| s.is_active()).count()
    }
}

// ============================================================
// 测试
// ============================================================
