// crates/pb_physics/src/schemes/dispatch.rs

//! 按配置选择格式
//!
//! 热循环中只调用 [`Numerics::compute_residual`]，分派在枚举上静态完成。

use pb_config::{ConvectiveScheme, NumericsConfig};

use super::central_jst::CentralJstScheme;
use super::central_lax::CentralLaxScheme;
use super::pressure_source::PressureSourceTerm;
use super::traits::{
    EdgeContribution, EdgeNumerics, NumericsError, SchemeCapabilities, SchemeParams,
};
use super::upwind::UpwindScheme;
use crate::types::EdgeContext;

/// 全部边格式
#[derive(Debug, Clone)]
pub enum Numerics {
    /// 一阶迎风
    Upwind(UpwindScheme),
    /// JST 中心格式
    CentralJst(CentralJstScheme),
    /// Lax 中心格式
    CentralLax(CentralLaxScheme),
    /// 压力源项
    PressureSource(PressureSourceTerm),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Numerics::Upwind($s) => $body,
            Numerics::CentralJst($s) => $body,
            Numerics::CentralLax($s) => $body,
            Numerics::PressureSource($s) => $body,
        }
    };
}

impl EdgeNumerics for Numerics {
    fn name(&self) -> &'static str {
        dispatch!(self, s => s.name())
    }

    fn capabilities(&self) -> SchemeCapabilities {
        dispatch!(self, s => s.capabilities())
    }

    fn params(&self) -> &SchemeParams {
        dispatch!(self, s => s.params())
    }

    #[inline]
    fn compute_residual(
        &mut self,
        ctx: &EdgeContext,
        out: &mut EdgeContribution,
    ) -> Result<(), NumericsError> {
        dispatch!(self, s => s.compute_residual(ctx, out))
    }
}

/// 按 `convective_scheme` 创建对流格式
pub fn create_numerics(config: &NumericsConfig) -> Result<Numerics, NumericsError> {
    let numerics = match config.convective_scheme {
        ConvectiveScheme::Upwind => Numerics::Upwind(UpwindScheme::new(config)?),
        ConvectiveScheme::CentralJst => Numerics::CentralJst(CentralJstScheme::new(config)?),
        ConvectiveScheme::CentralLax => Numerics::CentralLax(CentralLaxScheme::new(config)?),
    };
    Ok(numerics)
}

/// 创建与对流格式配套的压力源项
pub fn create_pressure_source(config: &NumericsConfig) -> Result<Numerics, NumericsError> {
    Ok(Numerics::PressureSource(PressureSourceTerm::new(config)?))
}
