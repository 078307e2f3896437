// crates/pb_config/src/lib.rs

//! PbFlow Config Layer
//!
//! 配置层，提供数值格式与伴随存储的构造期配置。
//! 本层所有数值使用 f64，不含泛型。
//!
//! # 模块概览
//!
//! - [`numerics_config`]: `NumericsConfig`、`AdjointConfig`、`PbConfig`
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! pb_physics    ─> create_numerics(&NumericsConfig), AdjointNodeStore::from_config
//! pb_config     ─> NumericsConfig, AdjointConfig (本层)
//! pb_foundation ─> PbError
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod numerics_config;

pub use error::ConfigError;
pub use numerics_config::{
    AdjointConfig, ConvectiveScheme, NumericsConfig, PbConfig, TimeIntegration,
};
