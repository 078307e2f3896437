// crates/pb_physics/src/schemes/central_lax.rs

//! Lax 中心格式
//!
//! 与 JST 相同的对称通量，耗散只有 1 阶项：
//!
//! ```text
//! R   = F(Ū) + ε0 (U_i − U_j) Ψ λ̄
//! J_i += ε0 Ψ λ̄ · I,   J_j −= ε0 Ψ λ̄ · I
//! ```
//!
//! U_i、U_j 始终由原始变量重新计算，忽略外部提供的守恒变量。

use pb_config::NumericsConfig;

use super::traits::{
    debug_check_finite, EdgeContribution, EdgeNumerics, NumericsError, SchemeCapabilities,
    SchemeParams,
};
use crate::numerics::{
    project_flux, project_jacobian, DissipationDiagnostics, DissipationModel, SpectralRadii,
};
use crate::types::EdgeContext;

/// Lax 格式
#[derive(Debug, Clone)]
pub struct CentralLaxScheme {
    params: SchemeParams,
    dissipation: DissipationModel,
    last: DissipationDiagnostics,
}

impl CentralLaxScheme {
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
            "创建 Lax 格式: {}D, implicit={}, κ0={}",
            params.n_dim,
            params.implicit,
            dissipation.kappa_1st
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

impl EdgeNumerics for CentralLaxScheme {
    fn name(&self) -> &'static str {
        "Lax"
    }

    fn capabilities(&self) -> SchemeCapabilities {
        SchemeCapabilities {
            order: 1,
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
        let epsilon_0 =
            self.dissipation
                .lax_coefficient(ctx.neighbors_i, ctx.neighbors_j, self.params.n_dim);

        let diff_u =
            ctx.primitive_i.conservative().momentum - ctx.primitive_j.conservative().momentum;
        out.set_residual(flux + diff_u * epsilon_0 * psi * radii.mean);

        let diagonal = epsilon_0 * psi * radii.mean;
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
            jac_i.add_diagonal(diagonal);
            jac_j.add_diagonal(-diagonal);
        } else {
            out.clear_jacobians();
        }

        self.last = DissipationDiagnostics {
            radii,
            stretching_factor: psi,
            epsilon_low: epsilon_0,
            epsilon_high: 0.0,
            diagonal_i: diagonal,
            diagonal_j: diagonal,
        };

        debug_check_finite(self.name(), ctx, out)
    }
}
