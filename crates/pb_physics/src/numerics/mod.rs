// crates/pb_physics/src/numerics/mod.rs

//! 数值核心
//!
//! - [`flux`]: 投影通量与精确 Jacobian，所有格式共用
//! - [`dissipation`]: 中心格式的人工耗散系数

pub mod dissipation;
pub mod flux;

pub use dissipation::{
    connectivity_scale, local_spectral_radius, stretching_factor, DissipationDiagnostics,
    DissipationModel, JstCoefficients, SpectralRadii, STRETCHING_EXPONENT,
    STRETCHING_LAMBDA_FLOOR,
};
pub use flux::{project_flux, project_jacobian, JacobianBlock};
