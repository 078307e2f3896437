// crates/pb_physics/src/schemes/traits.rs

//! 边数值格式统一接口

use pb_config::NumericsConfig;
use pb_foundation::PbError;

use crate::numerics::JacobianBlock;
use crate::types::{EdgeContext, MAX_DIM};

/// 单条边的计算结果
///
/// 由调用方创建并在边循环中复用；格式每次调用都会完整覆盖其内容。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeContribution {
    n_var: usize,
    residual: [f64; MAX_DIM],
    jacobian_i: JacobianBlock,
    jacobian_j: JacobianBlock,
    has_jacobian: bool,
}

impl EdgeContribution {
    /// 创建 nVar 大小的输出
    pub fn new(n_var: usize) -> Self {
        Self {
            n_var,
            residual: [0.0; MAX_DIM],
            jacobian_i: JacobianBlock::zeros(n_var),
            jacobian_j: JacobianBlock::zeros(n_var),
            has_jacobian: false,
        }
    }

    /// 变量数
    #[inline]
    pub fn n_var(&self) -> usize {
        self.n_var
    }

    /// 残差（长度 n_var）
    #[inline]
    pub fn residual(&self) -> &[f64] {
        &self.residual[..self.n_var]
    }

    /// 可写残差
    #[inline]
    pub fn residual_mut(&mut self) -> &mut [f64] {
        &mut self.residual[..self.n_var]
    }

    /// I 侧（供体）Jacobian，显式或无 Jacobian 的格式返回 `None`
    #[inline]
    pub fn jacobian_i(&self) -> Option<&JacobianBlock> {
        self.has_jacobian.then_some(&self.jacobian_i)
    }

    /// J 侧（受体）Jacobian
    #[inline]
    pub fn jacobian_j(&self) -> Option<&JacobianBlock> {
        self.has_jacobian.then_some(&self.jacobian_j)
    }

    /// 是否带 Jacobian
    #[inline]
    pub fn has_jacobian(&self) -> bool {
        self.has_jacobian
    }

    /// 清零并标记无 Jacobian
    pub fn reset(&mut self) {
        self.residual = [0.0; MAX_DIM];
        self.jacobian_i.fill_zero();
        self.jacobian_j.fill_zero();
        self.has_jacobian = false;
    }

    /// 检查数值有效性
    pub fn is_valid(&self) -> bool {
        self.residual().iter().all(|v| v.is_finite())
            && (!self.has_jacobian || (self.jacobian_i.is_finite() && self.jacobian_j.is_finite()))
    }

    pub(crate) fn set_residual(&mut self, values: glam::DVec3) {
        self.residual = [0.0; MAX_DIM];
        for d in 0..self.n_var {
            self.residual[d] = values[d];
        }
    }

    pub(crate) fn set_jacobians(&mut self, jacobian_i: JacobianBlock, jacobian_j: JacobianBlock) {
        self.jacobian_i = jacobian_i;
        self.jacobian_j = jacobian_j;
        self.has_jacobian = true;
    }

    pub(crate) fn jacobians_mut(&mut self) -> (&mut JacobianBlock, &mut JacobianBlock) {
        (&mut self.jacobian_i, &mut self.jacobian_j)
    }

    pub(crate) fn clear_jacobians(&mut self) {
        self.jacobian_i.fill_zero();
        self.jacobian_j.fill_zero();
        self.has_jacobian = false;
    }
}

/// 格式能力标志
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemeCapabilities {
    /// 精度阶数
    pub order: u8,
    /// 隐式时是否给出 Jacobian
    pub provides_jacobian: bool,
    /// Jacobian 是否为残差的精确导数
    pub exact_jacobian: bool,
    /// 是否包含人工耗散
    pub uses_dissipation: bool,
}

/// 构造期参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemeParams {
    /// 空间维数
    pub n_dim: usize,
    /// 是否隐式
    pub implicit: bool,
    /// 是否启用重力
    pub gravity: bool,
    /// Froude 数
    pub froude: f64,
    /// 是否网格运动
    pub grid_movement: bool,
}

impl SchemeParams {
    /// 从配置创建（先验证配置）
    pub fn from_config(config: &NumericsConfig) -> Result<Self, NumericsError> {
        config
            .validate()
            .map_err(|e| NumericsError::Config(e.to_string()))?;
        Ok(Self {
            n_dim: config.n_dim,
            implicit: config.is_implicit(),
            gravity: config.gravity,
            froude: config.froude,
            grid_movement: config.grid_movement,
        })
    }

    /// 变量数（压力基分裂中等于维数）
    #[inline]
    pub fn n_var(&self) -> usize {
        self.n_dim
    }

    /// 检查边输入与输出缓冲区
    ///
    /// 二维时法向量与两侧速度的 z 分量必须为 0。
    #[inline]
    pub fn check(&self, ctx: &EdgeContext, out: &EdgeContribution) -> Result<(), NumericsError> {
        if ctx.n_dim != self.n_dim {
            return Err(NumericsError::DimensionMismatch {
                expected: self.n_dim,
                actual: ctx.n_dim,
            });
        }
        if self.n_dim == 2 {
            for (field, value) in [
                ("normal", ctx.normal.z),
                ("primitive_i.velocity", ctx.primitive_i.velocity.z),
                ("primitive_j.velocity", ctx.primitive_j.velocity.z),
            ] {
                if value != 0.0 {
                    return Err(NumericsError::OutOfPlane { field, value });
                }
            }
        }
        if out.n_var() != self.n_var() {
            return Err(NumericsError::SizeMismatch {
                expected: self.n_var(),
                actual: out.n_var(),
            });
        }
        Ok(())
    }

    /// 中心格式额外要求邻点数 ≥ 1
    #[inline]
    pub fn check_neighbors(&self, ctx: &EdgeContext) -> Result<(), NumericsError> {
        if ctx.neighbors_i == 0 || ctx.neighbors_j == 0 {
            return Err(NumericsError::InvalidNeighborCount {
                neighbors_i: ctx.neighbors_i,
                neighbors_j: ctx.neighbors_j,
            });
        }
        Ok(())
    }
}

/// 边数值格式 trait
///
/// 一个实例持有可变的诊断缓存，只能由一个线程使用；
/// 并行时每个工作线程克隆一份私有实例。
pub trait EdgeNumerics: Send {
    /// 格式名称
    fn name(&self) -> &'static str;

    /// 能力标志
    fn capabilities(&self) -> SchemeCapabilities;

    /// 构造期参数
    fn params(&self) -> &SchemeParams;

    /// 空间维数
    fn n_dim(&self) -> usize {
        self.params().n_dim
    }

    /// 变量数
    fn n_var(&self) -> usize {
        self.params().n_var()
    }

    /// 是否隐式
    fn is_implicit(&self) -> bool {
        self.params().implicit
    }

    /// 计算一条边的残差与（隐式时）Jacobian
    ///
    /// `out` 的内容被整体覆盖。
    fn compute_residual(
        &mut self,
        ctx: &EdgeContext,
        out: &mut EdgeContribution,
    ) -> Result<(), NumericsError>;
}

/// 数值格式错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NumericsError {
    /// 边上下文维数与格式不一致
    #[error("维数不匹配: 格式为 {expected}D, 边输入为 {actual}D")]
    DimensionMismatch {
        /// 格式维数
        expected: usize,
        /// 输入维数
        actual: usize,
    },
    /// 二维输入带有非零 z 分量
    #[error("二维边输入的 {field} 含非零 z 分量: {value}")]
    OutOfPlane {
        /// 出错的输入
        field: &'static str,
        /// z 分量
        value: f64,
    },
    /// 输出缓冲区大小不匹配
    #[error("输出缓冲区大小不匹配: 期望 nVar={expected}, 实际 {actual}")]
    SizeMismatch {
        /// 格式变量数
        expected: usize,
        /// 缓冲区变量数
        actual: usize,
    },
    /// 邻点数为零
    #[error("邻点数无效: n_i={neighbors_i}, n_j={neighbors_j}（中心格式要求均 ≥ 1）")]
    InvalidNeighborCount {
        /// I 点邻点数
        neighbors_i: usize,
        /// J 点邻点数
        neighbors_j: usize,
    },
    /// 结果非有限
    #[error("数值错误: {message}")]
    NonFinite {
        /// 具体信息
        message: String,
    },
    /// 配置无效
    #[error("配置错误: {0}")]
    Config(String),
}

impl From<NumericsError> for PbError {
    fn from(err: NumericsError) -> Self {
        match err {
            NumericsError::DimensionMismatch { expected, actual } => {
                PbError::size_mismatch("edge.n_dim", expected, actual)
            }
            NumericsError::SizeMismatch { expected, actual } => {
                PbError::size_mismatch("edge_contribution.n_var", expected, actual)
            }
            NumericsError::NonFinite { message } => PbError::numerical(message),
            other => PbError::invalid_input(other.to_string()),
        }
    }
}

/// debug 构建下检查输出有限
#[inline]
pub(crate) fn debug_check_finite(
    name: &'static str,
    ctx: &EdgeContext,
    out: &EdgeContribution,
) -> Result<(), NumericsError> {
    if cfg!(debug_assertions) && !out.is_valid() {
        return Err(NumericsError::NonFinite {
            message: format!(
                "{} 在边 ({}, {}) 上产生非有限结果",
                name, ctx.point_i, ctx.point_j
            ),
        });
    }
    Ok(())
}
