// crates/pb_physics/src/adjoint/mod.rs

//! 离散伴随点存储
//!
//! - [`FieldArena`]: 单字段连续存储
//! - [`AdjointNodeStore`]: 全部伴随字段及扫掠、快照操作

pub mod arena;
pub mod store;

pub use arena::FieldArena;
pub use store::{AdjointField, AdjointNodeStore};
