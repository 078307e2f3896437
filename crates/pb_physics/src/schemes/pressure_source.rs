// crates/pb_physics/src/schemes/pressure_source.rs

//! 压力面源项 `p̄ n`
//!
//! 无状态，不产生 Jacobian。

use pb_config::NumericsConfig;

use super::traits::{
    debug_check_finite, EdgeContribution, EdgeNumerics, NumericsError, SchemeCapabilities,
    SchemeParams,
};
use crate::types::EdgeContext;

/// 压力源项
#[derive(Debug, Clone)]
pub struct PressureSourceTerm {
    params: SchemeParams,
}

impl PressureSourceTerm {
    /// 由配置创建
    pub fn new(config: &NumericsConfig) -> Result<Self, NumericsError> {
        Ok(Self::from_params(SchemeParams::from_config(config)?))
    }

    /// 从参数直接创建
    pub fn from_params(params: SchemeParams) -> Self {
        log::debug!("创建压力源项: {}D", params.n_dim);
        Self { params }
    }
}

impl EdgeNumerics for PressureSourceTerm {
    fn name(&self) -> &'static str {
        "PressureSource"
    }

    fn capabilities(&self) -> SchemeCapabilities {
        SchemeCapabilities {
            order: 2,
            provides_jacobian: false,
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
        let mean_pressure = 0.5 * (ctx.primitive_i.pressure + ctx.primitive_j.pressure);
        out.set_residual(ctx.normal * mean_pressure);
        out.clear_jacobians();
        debug_check_finite(self.name(), ctx, out)
    }
}
