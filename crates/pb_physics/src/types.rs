// crates/pb_physics/src/types.rs

//! 核心类型定义
//!
//! - [`PrimitiveState`]: 点上的原始变量 (p, u, ρ)
//! - [`ConservativeState`]: 守恒变量 ρu（压力基分裂中只有动量分量）
//! - [`EdgeContext`]: 一条边的全部输入（两侧状态、拉普拉斯、传感器、邻点数、法向量）
//!
//! # 布局约定
//!
//! 向量统一使用 `glam::DVec3` 存储。二维问题中 z 分量必须为 0，
//! `new_2d` 系列构造函数保证这一点；格式在计算前检查法向量与两侧速度，
//! 违反时返回 `NumericsError::OutOfPlane`。

use glam::DVec3;
use pb_foundation::{PbError, PbResult};

/// 支持的最大空间维数
pub const MAX_DIM: usize = 3;

/// 从切片构造向量（长度 2 或 3）
pub fn vector_from_slice(values: &[f64]) -> PbResult<DVec3> {
    match values {
        [x, y] => Ok(DVec3::new(*x, *y, 0.0)),
        [x, y, z] => Ok(DVec3::new(*x, *y, *z)),
        _ => Err(PbError::unsupported_dimension(values.len())),
    }
}

// ============================================================
// 原始变量
// ============================================================

/// 单点原始变量
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PrimitiveState {
    /// 压力
    pub pressure: f64,
    /// 速度
    pub velocity: DVec3,
    /// 密度
    pub density: f64,
}

impl PrimitiveState {
    /// 创建原始状态
    #[inline]
    pub const fn new(pressure: f64, velocity: DVec3, density: f64) -> Self {
        Self {
            pressure,
            velocity,
            density,
        }
    }

    /// 二维状态
    #[inline]
    pub const fn new_2d(pressure: f64, u: f64, v: f64, density: f64) -> Self {
        Self::new(pressure, DVec3::new(u, v, 0.0), density)
    }

    /// 三维状态
    #[inline]
    pub const fn new_3d(pressure: f64, u: f64, v: f64, w: f64, density: f64) -> Self {
        Self::new(pressure, DVec3::new(u, v, w), density)
    }

    /// 从速度切片创建（长度即维数）
    pub fn from_slice(pressure: f64, velocity: &[f64], density: f64) -> PbResult<Self> {
        Ok(Self::new(pressure, vector_from_slice(velocity)?, density))
    }

    /// 对应的守恒变量 ρu
    #[inline]
    pub fn conservative(&self) -> ConservativeState {
        ConservativeState::from_primitive(self)
    }

    /// 两侧算术平均
    #[inline]
    pub fn mean(&self, other: &Self) -> Self {
        Self {
            pressure: 0.5 * (self.pressure + other.pressure),
            velocity: (self.velocity + other.velocity) * 0.5,
            density: 0.5 * (self.density + other.density),
        }
    }

    /// 法向投影速度 u·n
    #[inline]
    pub fn projected_velocity(&self, normal: DVec3) -> f64 {
        self.velocity.dot(normal)
    }

    /// 状态是否有效
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.pressure.is_finite() && self.velocity.is_finite() && self.density.is_finite()
    }
}

// ============================================================
// 守恒变量
// ============================================================

/// 单点守恒变量（动量 ρu）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConservativeState {
    /// 动量
    pub momentum: DVec3,
}

impl ConservativeState {
    /// 零状态
    pub const ZERO: Self = Self {
        momentum: DVec3::ZERO,
    };

    /// 直接由动量创建
    #[inline]
    pub const fn new(momentum: DVec3) -> Self {
        Self { momentum }
    }

    /// 由原始变量计算
    #[inline]
    pub fn from_primitive(state: &PrimitiveState) -> Self {
        Self {
            momentum: state.velocity * state.density,
        }
    }
}

// ============================================================
// 边上下文
// ============================================================

/// 一条边的输入
///
/// 法向量为面积加权、由 I 指向 J。残差与 Jacobian 符号都以此方向为准。
///
/// # 示例
///
/// ```
/// use pb_physics::types::{EdgeContext, PrimitiveState};
/// use glam::DVec3;
///
/// let left = PrimitiveState::new_2d(1.0, 1.0, 0.0, 1.0);
/// let right = PrimitiveState::new_2d(1.0, 0.5, 0.0, 1.0);
/// let ctx = EdgeContext::new(2, left, right, DVec3::X)
///     .with_points(0, 1)
///     .with_neighbors(4, 4);
/// assert_eq!(ctx.conservative_i().momentum, DVec3::X);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeContext {
    /// 空间维数
    pub n_dim: usize,
    /// I 点编号
    pub point_i: usize,
    /// J 点编号
    pub point_j: usize,
    /// I 侧原始变量
    pub primitive_i: PrimitiveState,
    /// J 侧原始变量
    pub primitive_j: PrimitiveState,
    /// 外部提供的 I 侧守恒变量（缺省时由原始变量推导）
    pub conservative_i: Option<ConservativeState>,
    /// 外部提供的 J 侧守恒变量
    pub conservative_j: Option<ConservativeState>,
    /// I 点未除面积的拉普拉斯
    pub laplacian_i: DVec3,
    /// J 点未除面积的拉普拉斯
    pub laplacian_j: DVec3,
    /// I 点激波传感器
    pub sensor_i: f64,
    /// J 点激波传感器
    pub sensor_j: f64,
    /// I 点邻点数
    pub neighbors_i: usize,
    /// J 点邻点数
    pub neighbors_j: usize,
    /// 面积加权法向量（I → J）
    pub normal: DVec3,
}

impl EdgeContext {
    /// 以两侧状态和法向量创建，其余输入为零
    pub fn new(
        n_dim: usize,
        primitive_i: PrimitiveState,
        primitive_j: PrimitiveState,
        normal: DVec3,
    ) -> Self {
        Self {
            n_dim,
            point_i: 0,
            point_j: 0,
            primitive_i,
            primitive_j,
            conservative_i: None,
            conservative_j: None,
            laplacian_i: DVec3::ZERO,
            laplacian_j: DVec3::ZERO,
            sensor_i: 0.0,
            sensor_j: 0.0,
            neighbors_i: 0,
            neighbors_j: 0,
            normal,
        }
    }

    /// 设置点编号
    pub fn with_points(mut self, point_i: usize, point_j: usize) -> Self {
        self.point_i = point_i;
        self.point_j = point_j;
        self
    }

    /// 设置外部守恒变量
    pub fn with_conservative(mut self, u_i: ConservativeState, u_j: ConservativeState) -> Self {
        self.conservative_i = Some(u_i);
        self.conservative_j = Some(u_j);
        self
    }

    /// 设置拉普拉斯
    pub fn with_laplacians(mut self, laplacian_i: DVec3, laplacian_j: DVec3) -> Self {
        self.laplacian_i = laplacian_i;
        self.laplacian_j = laplacian_j;
        self
    }

    /// 设置传感器
    pub fn with_sensors(mut self, sensor_i: f64, sensor_j: f64) -> Self {
        self.sensor_i = sensor_i;
        self.sensor_j = sensor_j;
        self
    }

    /// 设置邻点数
    pub fn with_neighbors(mut self, neighbors_i: usize, neighbors_j: usize) -> Self {
        self.neighbors_i = neighbors_i;
        self.neighbors_j = neighbors_j;
        self
    }

    /// I 侧守恒变量
    #[inline]
    pub fn conservative_i(&self) -> ConservativeState {
        self.conservative_i
            .unwrap_or_else(|| self.primitive_i.conservative())
    }

    /// J 侧守恒变量
    #[inline]
    pub fn conservative_j(&self) -> ConservativeState {
        self.conservative_j
            .unwrap_or_else(|| self.primitive_j.conservative())
    }

    /// 两侧平均原始状态
    #[inline]
    pub fn mean_state(&self) -> PrimitiveState {
        self.primitive_i.mean(&self.primitive_j)
    }

    /// 面积（法向量模长）
    #[inline]
    pub fn area(&self) -> f64 {
        self.normal.length()
    }

    /// 交换 I/J 并反转法向量
    pub fn reversed(&self) -> Self {
        Self {
            n_dim: self.n_dim,
            point_i: self.point_j,
            point_j: self.point_i,
            primitive_i: self.primitive_j,
            primitive_j: self.primitive_i,
            conservative_i: self.conservative_j,
            conservative_j: self.conservative_i,
            laplacian_i: self.laplacian_j,
            laplacian_j: self.laplacian_i,
            sensor_i: self.sensor_j,
            sensor_j: self.sensor_i,
            neighbors_i: self.neighbors_j,
            neighbors_j: self.neighbors_i,
            normal: -self.normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_from_slice() {
        assert_eq!(vector_from_slice(&[1.0, 2.0]).unwrap(), DVec3::new(1.0, 2.0, 0.0));
        assert_eq!(
            vector_from_slice(&[1.0, 2.0, 3.0]).unwrap(),
            DVec3::new(1.0, 2.0, 3.0)
        );
        assert!(vector_from_slice(&[1.0]).is_err());
    }

    #[test]
    fn test_primitive_mean() {
        let a = PrimitiveState::new_2d(1.0, 1.0, 0.0, 1.0);
        let b = PrimitiveState::new_2d(3.0, 0.5, 2.0, 2.0);
        let m = a.mean(&b);
        assert_eq!(m.pressure, 2.0);
        assert_eq!(m.velocity, DVec3::new(0.75, 1.0, 0.0));
        assert_eq!(m.density, 1.5);
    }

    #[test]
    fn test_conservative_from_primitive() {
        let s = PrimitiveState::new_3d(0.0, 1.0, -2.0, 3.0, 2.0);
        assert_eq!(s.conservative().momentum, DVec3::new(2.0, -4.0, 6.0));
    }

    #[test]
    fn test_supplied_conservative_overrides() {
        let s = PrimitiveState::new_2d(0.0, 1.0, 0.0, 1.0);
        let u = ConservativeState::new(DVec3::new(5.0, 0.0, 0.0));
        let ctx = EdgeContext::new(2, s, s, DVec3::X).with_conservative(u, ConservativeState::ZERO);
        assert_eq!(ctx.conservative_i(), u);
        assert_eq!(ctx.conservative_j(), ConservativeState::ZERO);

        let plain = EdgeContext::new(2, s, s, DVec3::X);
        assert_eq!(plain.conservative_j(), s.conservative());
    }

    #[test]
    fn test_reversed_edge() {
        let a = PrimitiveState::new_2d(1.0, 1.0, 0.0, 1.0);
        let b = PrimitiveState::new_2d(2.0, 0.0, 1.0, 1.0);
        let ctx = EdgeContext::new(2, a, b, DVec3::new(1.0, 2.0, 0.0))
            .with_points(3, 7)
            .with_neighbors(5, 6)
            .with_sensors(0.1, 0.2);
        let rev = ctx.reversed();
        assert_eq!(rev.point_i, 7);
        assert_eq!(rev.primitive_i, b);
        assert_eq!(rev.neighbors_i, 6);
        assert_eq!(rev.sensor_j, 0.1);
        assert_eq!(rev.normal, DVec3::new(-1.0, -2.0, 0.0));
        assert_eq!(rev.reversed(), ctx);
    }
}
