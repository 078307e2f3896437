// crates/pb_physics/src/numerics/dissipation.rs

//! 中心格式人工耗散系数
//!
//! # 谱半径与拉伸因子
//!
//! ```text
//! λ_x   = |2 (u_x·n)|
//! λ̄     = (λ_i + λ_j) / 2
//! φ_x   = (λ_x / (4 λ̄))^0.3
//! Ψ     = 4 φ_i φ_j / (φ_i + φ_j)
//! ```
//!
//! λ̄ 低于 [`STRETCHING_LAMBDA_FLOOR`] 时（静止边、纯压力驱动流）Ψ 取 1。
//!
//! # 连通度缩放
//!
//! ```text
//! sc2 = 3 (n_i + n_j) / (n_i n_j),   sc4 = sc2² / 4
//! ε2  = κ2 · (s_i + s_j)/2 · sc2
//! ε4  = max(0, κ4 − ε2) · sc4
//! ε0  = κ0 · sc0 · nDim / 3          (Lax, sc0 = sc2)
//! ```

use glam::DVec3;
use pb_config::NumericsConfig;
use pb_foundation::{safe_div, SAFE_DIV_EPSILON};

/// 拉伸因子指数
pub const STRETCHING_EXPONENT: f64 = 0.3;

/// 平均谱半径下限
pub const STRETCHING_LAMBDA_FLOOR: f64 = SAFE_DIV_EPSILON;

/// 局部谱半径 |2 (u·n)|
#[inline]
pub fn local_spectral_radius(velocity: DVec3, normal: DVec3) -> f64 {
    (2.0 * velocity.dot(normal)).abs()
}

/// 边两侧谱半径
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpectralRadii {
    /// I 侧
    pub lambda_i: f64,
    /// J 侧
    pub lambda_j: f64,
    /// 平均值
    pub mean: f64,
}

impl SpectralRadii {
    /// 由两侧速度计算
    #[inline]
    pub fn from_velocities(velocity_i: DVec3, velocity_j: DVec3, normal: DVec3) -> Self {
        let lambda_i = local_spectral_radius(velocity_i, normal);
        let lambda_j = local_spectral_radius(velocity_j, normal);
        Self {
            lambda_i,
            lambda_j,
            mean: 0.5 * (lambda_i + lambda_j),
        }
    }

    /// 拉伸因子 Ψ
    #[inline]
    pub fn stretching_factor(&self) -> f64 {
        stretching_factor(self.lambda_i, self.lambda_j, self.mean)
    }
}

/// 最近一次边计算的耗散诊断
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DissipationDiagnostics {
    /// 两侧谱半径
    pub radii: SpectralRadii,
    /// 拉伸因子 Ψ
    pub stretching_factor: f64,
    /// 低阶系数（JST 为 ε2，Lax 为 ε0）
    pub epsilon_low: f64,
    /// 高阶系数（JST 为 ε4，Lax 为 0）
    pub epsilon_high: f64,
    /// I 侧对角修正
    pub diagonal_i: f64,
    /// J 侧对角修正（按从 J_j 中减去的量记录）
    pub diagonal_j: f64,
}

impl DissipationDiagnostics {
    /// 耗散整体缩放 Ψ λ̄
    #[inline]
    pub fn scale(&self) -> f64 {
        self.stretching_factor * self.radii.mean
    }
}

/// 拉伸因子 Ψ = 4 φ_i φ_j / (φ_i + φ_j)
#[inline]
pub fn stretching_factor(lambda_i: f64, lambda_j: f64, mean_lambda: f64) -> f64 {
    if mean_lambda < STRETCHING_LAMBDA_FLOOR {
        log::trace!("平均谱半径 {:.3e} 低于下限，拉伸因子取 1", mean_lambda);
        return 1.0;
    }
    let phi_i = (lambda_i / (4.0 * mean_lambda)).powf(STRETCHING_EXPONENT);
    let phi_j = (lambda_j / (4.0 * mean_lambda)).powf(STRETCHING_EXPONENT);
    // λ_i + λ_j = 2 λ̄，较大一侧 φ ≥ 0.25^0.3，分母不会退化
    safe_div(4.0 * phi_i * phi_j, phi_i + phi_j, 1.0)
}

/// 连通度缩放 3 (n_i + n_j) / (n_i n_j)
///
/// 调用方保证 n_i, n_j ≥ 1。
#[inline]
pub fn connectivity_scale(neighbors_i: usize, neighbors_j: usize) -> f64 {
    let n_i = neighbors_i as f64;
    let n_j = neighbors_j as f64;
    3.0 * (n_i + n_j) / (n_i * n_j)
}

/// JST 耗散系数
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JstCoefficients {
    /// 2 阶系数 ε2
    pub epsilon_2: f64,
    /// 4 阶系数 ε4（已截断到非负）
    pub epsilon_4: f64,
    /// 2 阶连通度缩放
    pub sc2: f64,
    /// 4 阶连通度缩放
    pub sc4: f64,
}

/// 人工耗散模型
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DissipationModel {
    /// 1 阶系数 κ0
    pub kappa_1st: f64,
    /// 2 阶系数 κ2
    pub kappa_2nd: f64,
    /// 4 阶系数 κ4
    pub kappa_4th: f64,
}

impl Default for DissipationModel {
    fn default() -> Self {
        Self::from_config(&NumericsConfig::default())
    }
}

impl DissipationModel {
    /// 创建耗散模型
    pub fn new(kappa_1st: f64, kappa_2nd: f64, kappa_4th: f64) -> Self {
        Self {
            kappa_1st,
            kappa_2nd,
            kappa_4th,
        }
    }

    /// 从配置读取系数
    pub fn from_config(config: &NumericsConfig) -> Self {
        Self::new(config.kappa_1st, config.kappa_2nd, config.kappa_4th)
    }

    /// JST 混合 2/4 阶系数
    #[inline]
    pub fn jst_coefficients(
        &self,
        sensor_i: f64,
        sensor_j: f64,
        neighbors_i: usize,
        neighbors_j: usize,
    ) -> JstCoefficients {
        let sc2 = connectivity_scale(neighbors_i, neighbors_j);
        let sc4 = sc2 * sc2 / 4.0;
        let epsilon_2 = self.kappa_2nd * 0.5 * (sensor_i + sensor_j) * sc2;
        let epsilon_4 = (self.kappa_4th - epsilon_2).max(0.0) * sc4;
        JstCoefficients {
            epsilon_2,
            epsilon_4,
            sc2,
            sc4,
        }
    }

    /// Lax 1 阶系数 ε0
    #[inline]
    pub fn lax_coefficient(&self, neighbors_i: usize, neighbors_j: usize, n_dim: usize) -> f64 {
        let sc0 = connectivity_scale(neighbors_i, neighbors_j);
        self.kappa_1st * sc0 * n_dim as f64 / 3.0
    }
}
