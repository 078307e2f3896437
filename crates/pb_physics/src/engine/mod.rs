// crates/pb_physics/src/engine/mod.rs

//! 计算引擎

pub mod parallel;

pub use parallel::{
    BatchConfig, BatchConfigBuilder, BatchMetrics, BatchStrategy, EdgeBatchEvaluator,
};
