// crates/pb_physics/src/numerics/flux.rs

//! 压力基无粘投影通量及其 Jacobian
//!
//! # 数学原理
//!
//! 动量方程的投影通量：
//! ```text
//! F_d = ρ u_d (u·n) + p n_d
//! ```
//!
//! 以守恒变量 U = ρu 为自变量（ρ、p 固定）求导：
//! ```text
//! ∂F_d/∂U_k = δ_dk (u·n) + u_d n_k
//! ```
//! ρ 在导数中约去。

use glam::DVec3;

use crate::types::MAX_DIM;

/// nVar × nVar 的 Jacobian 块（行主序）
///
/// 存储固定为 3×3，`n_var` 之外的行列保持为零。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JacobianBlock {
    n_var: usize,
    entries: [[f64; MAX_DIM]; MAX_DIM],
}

impl JacobianBlock {
    /// 零块
    #[inline]
    pub fn zeros(n_var: usize) -> Self {
        assert!(
            (1..=MAX_DIM).contains(&n_var),
            "JacobianBlock n_var={} 超出 1..={}",
            n_var,
            MAX_DIM
        );
        Self {
            n_var,
            entries: [[0.0; MAX_DIM]; MAX_DIM],
        }
    }

    /// 变量数
    #[inline]
    pub fn n_var(&self) -> usize {
        self.n_var
    }

    /// 读取元素
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.n_var && col < self.n_var, "Jacobian 索引越界");
        self.entries[row][col]
    }

    /// 写入元素
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.n_var && col < self.n_var, "Jacobian 索引越界");
        self.entries[row][col] = value;
    }

    /// 对角线加上常数
    #[inline]
    pub fn add_diagonal(&mut self, value: f64) {
        for i in 0..self.n_var {
            self.entries[i][i] += value;
        }
    }

    /// 清零
    #[inline]
    pub fn fill_zero(&mut self) {
        self.entries = [[0.0; MAX_DIM]; MAX_DIM];
    }

    /// 第 `row` 行（长度 n_var）
    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.entries[row][..self.n_var]
    }

    /// 行主序展开，便于交给外部稀疏装配
    pub fn to_row_major(&self) -> Vec<f64> {
        (0..self.n_var)
            .flat_map(|r| self.row(r).iter().copied())
            .collect()
    }

    /// 所有元素有限
    pub fn is_finite(&self) -> bool {
        (0..self.n_var).all(|r| self.row(r).iter().all(|v| v.is_finite()))
    }
}

/// 投影通量
///
/// `flux[d] = ρ u_d (u·n) + p n_d`
#[inline]
pub fn project_flux(density: f64, velocity: DVec3, pressure: f64, normal: DVec3) -> DVec3 {
    let proj_vel = velocity.dot(normal);
    velocity * (density * proj_vel) + normal * pressure
}

/// 投影通量 Jacobian（乘以 `scaling`）
///
/// `J[d][k] = scaling · (δ_dk (u·n) + u_d n_k)`
///
/// 密度保留在签名中与 [`project_flux`] 对齐。
#[inline]
pub fn project_jacobian(
    _density: f64,
    velocity: DVec3,
    normal: DVec3,
    scaling: f64,
    n_var: usize,
) -> JacobianBlock {
    let mut block = JacobianBlock::zeros(n_var);
    let proj_vel = velocity.dot(normal);
    for d in 0..n_var {
        for k in 0..n_var {
            let delta = if d == k { proj_vel } else { 0.0 };
            block.entries[d][k] = scaling * (delta + velocity[d] * normal[k]);
        }
    }
    block
}
