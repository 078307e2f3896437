// crates/pb_physics/src/schemes/central_jst.rs

//! JST 中心格式
//!
//! 平均状态的投影通量加上混合 2/4 阶人工耗散：
//!
//! ```text
//! R = F(Ū) + (ε2 (U_i − U_j) − ε4 (L_i − L_j)) Ψ λ̄
//! ```
//!
//! 隐式时两侧取相同的 0.5 倍 Jacobian，再做对角修正：
//!
//! ```text
//! J_i += (ε2 + ε4 (n_i + 1)) Ψ λ̄ · I
//! J_j −= (ε2 + ε4 (n_j + 1)) Ψ λ̄ · I
//! ```

use pb_config::NumericsConfig;

use super::traits::{
    debug_check_finite, EdgeContribution, EdgeNumerics, NumericsError, SchemeCapabilities,
    SchemeParams,
};
use crate::numerics::{
    project_flux, project_jacobian, DissipationDiagnostics, DissipationModel, SpectralRadii,
};
use crate::types::EdgeContext;

/// JST 格式
#[derive(Debug, Clone)]
pub struct CentralJstScheme {
    params: SchemeParams,
    dissipation: DissipationModel,
    last: DissipationDiagnostics,
}

impl CentralJstScheme {
    /// 由配置创建
    pub fn new(config: &NumericsConfig) -> Result<Self, NumericsError> {
        Ok(Self::from_params(
            SchemeParams::from_config(config)?,
            DissipationModel::from_config(config),
        ))
    }

    /// 从参数直接创建
    pub fn from_params(params: SchemeParams, dissipation: DissipationModel) -> Self {
        log::debug!(
            "创建 JST 格式: {}D, implicit={}, κ2={}, κ4={}",
            params.n_dim,
            params.implicit,
            dissipation.kappa_2nd,
            dissipation.kappa_4th
        );
        Self {
            params,
            dissipation,
            last: DissipationDiagnostics::default(),
        }
    }

    /// 耗散模型
    pub fn dissipation(&self) -> &DissipationModel {
        &self.dissipation
    }

    /// 最近一次计算的诊断
    pub fn last_diagnostics(&self) -> &DissipationDiagnostics {
        &self.last
    }
}

impl EdgeNumerics for CentralJstScheme {
    fn name(&self) -> &'static str {
        "JST"
    }

    fn capabilities(&self) -> SchemeCapabilities {
        SchemeCapabilities {
            order: 2,
            provides_jacobian: true,
            exact_jacobian: false,
            uses_dissipation: true,
        }
    }

    fn params(&self) -> &SchemeParams {
        &self.params
    }

    fn compute_residual(
        &mut self,
        ctx: &EdgeContext,
        out: &mut EdgeContribution,
    ) -> Result<(), NumericsError> {
        self.params.check(ctx, out)?;
        self.params.check_neighbors(ctx)?;

        let mean = ctx.mean_state();
        let flux = project_flux(mean.density, mean.velocity, mean.pressure, ctx.normal);

        let radii = SpectralRadii::from_velocities(
            ctx.primitive_i.velocity,
            ctx.primitive_j.velocity,
            ctx.normal,
        );
        let psi = radii.stretching_factor();
        let coeffs = self.dissipation.jst_coefficients(
            ctx.sensor_i,
            ctx.sensor_j,
            ctx.neighbors_i,
            ctx.neighbors_j,
        );

        let diff_u = ctx.conservative_i().momentum - ctx.conservative_j().momentum;
        let diff_lap = ctx.laplacian_i - ctx.laplacian_j;
        let damping = (diff_u * coeffs.epsilon_2 - diff_lap * coeffs.epsilon_4) * psi * radii.mean;
        out.set_residual(flux + damping);

        let diagonal_i = (coeffs.epsilon_2 + coeffs.epsilon_4 * (ctx.neighbors_i as f64 + 1.0))
            * psi
            * radii.mean;
        let diagonal_j = (coeffs.epsilon_2 + coeffs.epsilon_4 * (ctx.neighbors_j as f64 + 1.0))
            * psi
            * radii.mean;

        if self.params.implicit {
            let block = project_jacobian(
                mean.density,
                mean.velocity,
                ctx.normal,
                0.5,
                self.params.n_var(),
            );
            out.set_jacobians(block, block);
            let (jac_i, jac_j) = out.jacobians_mut();
            jac_i.add_diagonal(diagonal_i);
            jac_j.add_diagonal(-diagonal_j);
        } else {
            out.clear_jacobians();
        }

        self.last = DissipationDiagnostics {
            radii,
            stretching_factor: psi,
            epsilon_low: coeffs.epsilon_2,
            epsilon_high: coeffs.epsilon_4,
            diagonal_i,
            diagonal_j,
        };

        debug_check_finite(self.name(), ctx, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveState;
    use glam::DVec3;

    fn jst(implicit: bool) -> CentralJstScheme {
        let mut config = NumericsConfig::new(2, pb_config::ConvectiveScheme::CentralJst);
        if implicit {
            config = config.implicit();
        }
        CentralJstScheme::new(&config).unwrap()
    }

    #[test]
    fn test_equal_states_no_dissipation() {
        let s = PrimitiveState::new_2d(2.0, 1.0, -0.5, 1.2);
        let n = DVec3::new(0.6, 0.8, 0.0);
        let ctx = EdgeContext::new(2, s, s, n)
            .with_neighbors(4, 5)
            .with_sensors(0.3, 0.3);
        let mut scheme = jst(false);
        let mut out = EdgeContribution::new(2);
        scheme.compute_residual(&ctx, &mut out).unwrap();

        let flux = project_flux(s.density, s.velocity, s.pressure, n);
        assert_eq!(out.residual(), &[flux.x, flux.y]);
    }

    #[test]
    fn test_zero_neighbors_rejected() {
        let s = PrimitiveState::new_2d(1.0, 1.0, 0.0, 1.0);
        let ctx = EdgeContext::new(2, s, s, DVec3::X).with_neighbors(0, 3);
        let mut out = EdgeContribution::new(2);
        assert_eq!(
            jst(false).compute_residual(&ctx, &mut out),
            Err(NumericsError::InvalidNeighborCount {
                neighbors_i: 0,
                neighbors_j: 3
            })
        );
    }

    #[test]
    fn test_implicit_diagonal_correction() {
        let left = PrimitiveState::new_2d(1.0, 1.0, 0.2, 1.0);
        let right = PrimitiveState::new_2d(1.1, 0.8, 0.1, 1.0);
        let n = DVec3::new(1.0, 0.5, 0.0);
        let ctx = EdgeContext::new(2, left, right, n).with_neighbors(4, 6);
        let mut scheme = jst(true);
        let mut out = EdgeContribution::new(2);
        scheme.compute_residual(&ctx, &mut out).unwrap();

        let mean = ctx.mean_state();
        let base = project_jacobian(mean.density, mean.velocity, n, 0.5, 2);
        let diag = *scheme.last_diagnostics();
        assert!(diag.diagonal_i > 0.0);

        let jac_i = out.jacobian_i().unwrap();
        let jac_j = out.jacobian_j().unwrap();
        assert_eq!(jac_i.get(0, 1), base.get(0, 1));
        assert_eq!(jac_j.get(1, 0), base.get(1, 0));
        assert_eq!(jac_i.get(0, 0), base.get(0, 0) + diag.diagonal_i);
        assert_eq!(jac_j.get(1, 1), base.get(1, 1) - diag.diagonal_j);
    }

    #[test]
    fn test_fourth_order_uses_laplacian() {
        let s = PrimitiveState::new_2d(1.0, 1.0, 0.0, 1.0);
        let ctx = EdgeContext::new(2, s, s, DVec3::X)
            .with_neighbors(4, 4)
            .with_laplacians(DVec3::new(1.0, 0.0, 0.0), DVec3::ZERO);
        let mut scheme = jst(false);
        let mut out = EdgeContribution::new(2);
        scheme.compute_residual(&ctx, &mut out).unwrap();

        let diag = *scheme.last_diagnostics();
        let flux = project_flux(1.0, s.velocity, 1.0, DVec3::X);
        let expected = flux.x - diag.epsilon_high * 1.0 * diag.stretching_factor * diag.radii.mean;
        assert!((out.residual()[0] - expected).abs() < 1e-14);
        assert!(out.residual()[0] < flux.x);
    }
}
