// crates/pb_foundation/src/lib.rs

//! PbFlow Foundation Layer
//!
//! 基础层，为数值核心与伴随存储提供公共抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 `PbError` 与 `ensure!` 宏
//! - [`float`]: 数值常量与安全除法
//!
//! # 示例
//!
//! ```
//! use pb_foundation::error::{PbError, PbResult};
//! use pb_foundation::float::safe_div;
//!
//! fn ratio(a: f64, b: f64) -> PbResult<f64> {
//!     pb_foundation::ensure!(b >= 0.0, PbError::invalid_input("b 必须非负"));
//!     Ok(safe_div(a, b, 0.0))
//! }
//!
//! assert_eq!(ratio(1.0, 0.0).unwrap(), 0.0);
//! assert!(ratio(1.0, -1.0).is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod float;

pub use error::{PbError, PbResult};
pub use float::{safe_div, SAFE_DIV_EPSILON};

