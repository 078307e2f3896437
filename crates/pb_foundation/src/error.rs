// crates/pb_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `PbError` 枚举和 `PbResult` 类型别名。数值格式相关的错误在
//! `pb_physics::schemes` 中单独定义，配置错误在 `pb_config` 中定义。
//!
//! # 示例
//!
//! ```
//! use pb_foundation::error::{PbError, PbResult};
//!
//! fn n_points() -> PbResult<usize> {
//!     Err(PbError::invalid_input("网格点数不能为零"))
//! }
//! assert!(n_points().is_err());
//! ```

use thiserror::Error;

/// 统一结果类型
pub type PbResult<T> = Result<T, PbError>;

/// PbFlow 错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PbError {
    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别描述
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    /// 不支持的空间维数
    #[error("不支持的空间维数: {n_dim} (仅支持 2 或 3)")]
    UnsupportedDimension {
        /// 请求的维数
        n_dim: usize,
    },

    /// 数值错误（NaN/Inf 等）
    #[error("数值错误: {message}")]
    Numerical {
        /// 具体错误信息
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl PbError {
    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 索引越界
    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// 不支持的维数
    pub fn unsupported_dimension(n_dim: usize) -> Self {
        Self::UnsupportedDimension { n_dim }
    }

    /// 数值错误
    pub fn numerical(message: impl Into<String>) -> Self {
        Self::Numerical {
            message: message.into(),
        }
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl PbError {
    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> PbResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }

    /// 检查索引是否在范围内
    #[inline]
    pub fn check_index(index_type: &'static str, index: usize, len: usize) -> PbResult<()> {
        if index >= len {
            Err(Self::index_out_of_bounds(index_type, index, len))
        } else {
            Ok(())
        }
    }

    /// 检查空间维数（2 或 3）
    #[inline]
    pub fn check_dimension(n_dim: usize) -> PbResult<()> {
        if n_dim == 2 || n_dim == 3 {
            Ok(())
        } else {
            Err(Self::unsupported_dimension(n_dim))
        }
    }
}

// ========================================================================
// 宏
// ========================================================================

/// 条件不满足时返回错误
///
/// ```
/// use pb_foundation::{ensure, PbError, PbResult};
///
/// fn positive(v: f64) -> PbResult<f64> {
///     ensure!(v > 0.0, PbError::invalid_input("必须为正"));
///     Ok(v)
/// }
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !($cond) {
            return Err(($err).into());
        }
    };
}

// ========================================================================
// 测试
// ========================================================================
