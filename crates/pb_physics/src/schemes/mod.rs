// crates/pb_physics/src/schemes/mod.rs

//! 边数值格式
//!
//! - [`UpwindScheme`]: 一阶供体单元迎风
//! - [`CentralJstScheme`]: JST 混合 2/4 阶耗散中心格式
//! - [`CentralLaxScheme`]: Lax 1 阶耗散中心格式
//! - [`PressureSourceTerm`]: 压力面源项
//!
//! 所有格式实现 [`EdgeNumerics`]，由 [`create_numerics`] 按配置选择。

pub mod central_jst;
pub mod central_lax;
pub mod dispatch;
pub mod pressure_source;
pub mod traits;
pub mod upwind;

pub use central_jst::CentralJstScheme;
pub use central_lax::CentralLaxScheme;
pub use dispatch::{create_numerics, create_pressure_source, Numerics};
pub use pressure_source::PressureSourceTerm;
pub use traits::{EdgeContribution, EdgeNumerics, NumericsError, SchemeCapabilities, SchemeParams};
pub use upwind::UpwindScheme;
