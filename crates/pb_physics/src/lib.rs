// crates/pb_physics/src/lib.rs

//! 压力基不可压缩求解器的数值核心
//!
//! 提供：
//! - 核心类型定义 (types)
//! - 投影通量、Jacobian 与人工耗散 (numerics)
//! - 边数值格式 (schemes)：迎风、JST、Lax、压力源项
//! - 离散伴随点存储 (adjoint)
//! - 边批量计算 (engine)
//!
//! # 调用约定
//!
//! 外部边循环为每条边构造 [`EdgeContext`]，调用
//! [`EdgeNumerics::compute_residual`] 得到 [`EdgeContribution`]，
//! 再把残差与 Jacobian 散射到两个端点。散射与稀疏矩阵装配不在本 crate 内。
//!
//! ```
//! use glam::DVec3;
//! use pb_config::{ConvectiveScheme, NumericsConfig};
//! use pb_physics::{create_numerics, EdgeContext, EdgeContribution, EdgeNumerics, PrimitiveState};
//!
//! let config = NumericsConfig::new(2, ConvectiveScheme::Upwind);
//! let mut numerics = create_numerics(&config).unwrap();
//!
//! let left = PrimitiveState::new_2d(1.0, 1.0, 0.0, 1.0);
//! let right = PrimitiveState::new_2d(1.0, 0.5, 0.0, 1.0);
//! let ctx = EdgeContext::new(2, left, right, DVec3::X);
//!
//! let mut out = EdgeContribution::new(numerics.n_var());
//! numerics.compute_residual(&ctx, &mut out).unwrap();
//! assert_eq!(out.residual(), &[0.75, 0.0]);
//! ```

#![warn(missing_docs)]

pub mod adjoint;
pub mod engine;
pub mod numerics;
pub mod schemes;
pub mod types;

pub use adjoint::{AdjointField, AdjointNodeStore, FieldArena};
pub use engine::{BatchConfig, BatchStrategy, EdgeBatchEvaluator};
pub use numerics::{
    project_flux, project_jacobian, DissipationDiagnostics, DissipationModel, JacobianBlock,
};
pub use schemes::{
    create_numerics, create_pressure_source, CentralJstScheme, CentralLaxScheme, EdgeContribution,
    EdgeNumerics, Numerics, NumericsError, PressureSourceTerm, SchemeCapabilities, SchemeParams,
    UpwindScheme,
};
pub use types::{ConservativeState, EdgeContext, PrimitiveState};
