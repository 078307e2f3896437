// crates/pb_physics/src/schemes/upwind.rs

//! 一阶迎风（供体单元）格式
//!
//! 面通量 `ρ̄ (ū·n)` 决定供体一侧，残差取供体速度乘以面通量。
//! 无重构、无限制器。面通量恰为 0 时按 J 侧处理。

use pb_config::NumericsConfig;

use super::traits::{
    debug_check_finite, EdgeContribution, EdgeNumerics, NumericsError, SchemeCapabilities,
    SchemeParams,
};
use crate::numerics::{project_jacobian, JacobianBlock};
use crate::types::EdgeContext;

/// 迎风格式
#[derive(Debug, Clone)]
pub struct UpwindScheme {
    params: SchemeParams,
    last_face_flux: f64,
}

impl UpwindScheme {
    /// 由配置创建
    pub fn new(config: &NumericsConfig) -> Result<Self, NumericsError> {
        Ok(Self::from_params(SchemeParams::from_config(config)?))
    }

    /// 从参数直接创建
    pub fn from_params(params: SchemeParams) -> Self {
        log::debug!(
            "创建 Upwind 格式: {}D, implicit={}",
            params.n_dim,
            params.implicit
        );
        Self {
            params,
            last_face_flux: 0.0,
        }
    }

    /// 上一次计算的面通量
    #[inline]
    pub fn last_face_flux(&self) -> f64 {
        self.last_face_flux
    }
}

impl EdgeNumerics for UpwindScheme {
    fn name(&self) -> &'static str {
        "Upwind"
    }

    fn capabilities(&self) -> SchemeCapabilities {
        SchemeCapabilities {
            order: 1,
            provides_jacobian: true,
            exact_jacobian: false,
            uses_dissipation: false,
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

        let mean = ctx.mean_state();
        let face_flux = mean.density * mean.projected_velocity(ctx.normal);
        self.last_face_flux = face_flux;

        let from_i = face_flux > 0.0;
        let donor = if from_i {
            &ctx.primitive_i
        } else {
            &ctx.primitive_j
        };
        out.set_residual(donor.velocity * face_flux);

        if self.params.implicit {
            let n_var = self.params.n_var();
            let donor_block =
                project_jacobian(donor.density, donor.velocity, ctx.normal, 1.0, n_var);
            let zero = JacobianBlock::zeros(n_var);
            if from_i {
                out.set_jacobians(donor_block, zero);
            } else {
                out.set_jacobians(zero, donor_block);
            }
        } else {
            out.clear_jacobians();
        }

        debug_check_finite(self.name(), ctx, out)
    }
}
