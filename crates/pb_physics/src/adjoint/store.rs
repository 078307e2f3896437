// crates/pb_physics/src/adjoint/store.rs

//! 离散伴随点存储
//!
//! 全网格一次分配，每个字段一块 [`FieldArena`]，按 (点, 分量) 寻址。
//!
//! # 字段
//!
//! | 字段 | 宽度 | 说明 |
//! |------|------|------|
//! | `solution` | nVar | 伴随解，创建时取初始向量 |
//! | `sensitivity` | nDim | 目标函数对坐标的导数 |
//! | `sensitivity_shifted_lagrangian` | nDim | 平移拉格朗日灵敏度 |
//! | `sensitivity_augmented_lagrangian` | nDim × kinds | 增广拉格朗日灵敏度 |
//! | `solution_direct` | nVar | 原问题解快照 |
//! | `dual_time_derivative(_n)` | nVar | 双时间导数及上一步 |
//! | `cross_term_derivative` | nVar | 耦合交叉项 |
//! | `geometry_cross_term_derivative(_flow)` | nDim | 几何交叉项（两份分别累加） |
//! | `solution_geometry(_old)` | nDim | 几何伴随解及旧值 |
//! | `geometry_direct` | nDim | 原问题几何快照 |
//! | `solution_bgs` | nDim | BGS 子迭代伴随解 |
//! | `solution_geometry_bgs_k` | nDim | 子迭代起点的几何解 |
//!
//! 灵敏度在一次反向扫掠中累加，存储不会自动清零，
//! 由调用方在扫掠开始时调用 [`AdjointNodeStore::begin_sweep`]。
//!
//! 越界的 (点, 分量) 属于前置条件错误，直接 panic；
//! 需要检查的场景使用 [`AdjointNodeStore::try_get`]。

use pb_config::{AdjointConfig, NumericsConfig};
use pb_foundation::{ensure, PbError, PbResult};

use super::arena::FieldArena;

/// 字段标识，用于通用访问
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdjointField {
    /// 伴随解
    Solution,
    /// 坐标灵敏度
    Sensitivity,
    /// 平移拉格朗日灵敏度
    SensitivityShiftedLagrangian,
    /// 增广拉格朗日灵敏度（分量 = dim × kinds + kind）
    SensitivityAugmentedLagrangian,
    /// 原问题解快照
    SolutionDirect,
    /// 双时间导数
    DualTimeDerivative,
    /// 上一物理步的双时间导数
    DualTimeDerivativeN,
    /// 交叉项导数
    CrossTermDerivative,
    /// 几何交叉项导数
    GeometryCrossTermDerivative,
    /// 流场侧几何交叉项导数
    GeometryCrossTermDerivativeFlow,
    /// 几何伴随解
    SolutionGeometry,
    /// 旧几何伴随解
    SolutionGeometryOld,
    /// 原问题几何快照
    GeometryDirect,
    /// BGS 伴随解
    SolutionBgs,
    /// BGS 子迭代起点几何解
    SolutionGeometryBgsK,
}

impl AdjointField {
    /// 全部字段
    pub const ALL: [AdjointField; 15] = [
        AdjointField::Solution,
        AdjointField::Sensitivity,
        AdjointField::SensitivityShiftedLagrangian,
        AdjointField::SensitivityAugmentedLagrangian,
        AdjointField::SolutionDirect,
        AdjointField::DualTimeDerivative,
        AdjointField::DualTimeDerivativeN,
        AdjointField::CrossTermDerivative,
        AdjointField::GeometryCrossTermDerivative,
        AdjointField::GeometryCrossTermDerivativeFlow,
        AdjointField::SolutionGeometry,
        AdjointField::SolutionGeometryOld,
        AdjointField::GeometryDirect,
        AdjointField::SolutionBgs,
        AdjointField::SolutionGeometryBgsK,
    ];

    /// 字段名
    pub fn name(self) -> &'static str {
        match self {
            AdjointField::Solution => "solution",
            AdjointField::Sensitivity => "sensitivity",
            AdjointField::SensitivityShiftedLagrangian => "sensitivity_shifted_lagrangian",
            AdjointField::SensitivityAugmentedLagrangian => "sensitivity_augmented_lagrangian",
            AdjointField::SolutionDirect => "solution_direct",
            AdjointField::DualTimeDerivative => "dual_time_derivative",
            AdjointField::DualTimeDerivativeN => "dual_time_derivative_n",
            AdjointField::CrossTermDerivative => "cross_term_derivative",
            AdjointField::GeometryCrossTermDerivative => "geometry_cross_term_derivative",
            AdjointField::GeometryCrossTermDerivativeFlow => "geometry_cross_term_derivative_flow",
            AdjointField::SolutionGeometry => "solution_geometry",
            AdjointField::SolutionGeometryOld => "solution_geometry_old",
            AdjointField::GeometryDirect => "geometry_direct",
            AdjointField::SolutionBgs => "solution_bgs",
            AdjointField::SolutionGeometryBgsK => "solution_geometry_bgs_k",
        }
    }
}

/// 为单个字段生成 (点, 分量) 与整行访问器
macro_rules! field_accessors {
    ($field:ident, $set:ident, $row:ident, $set_row:ident, $doc:literal) => {
        #[doc = concat!("读取", $doc)]
        #[inline]
        pub fn $field(&self, point: usize, comp: usize) -> f64 {
            self.$field.get(point, comp)
        }

        #[doc = concat!("写入", $doc)]
        #[inline]
        pub fn $set(&mut self, point: usize, comp: usize, value: f64) {
            self.$field.set(point, comp, value);
        }

        #[doc = concat!("一个点的", $doc, "整行")]
        #[inline]
        pub fn $row(&self, point: usize) -> &[f64] {
            self.$field.row(point)
        }

        #[doc = concat!("整行写入", $doc)]
        #[inline]
        pub fn $set_row(&mut self, point: usize, values: &[f64]) {
            self.$field.set_row(point, values);
        }
    };
}

/// 离散伴随点存储
#[derive(Debug, Clone, PartialEq)]
pub struct AdjointNodeStore {
    n_points: usize,
    n_dim: usize,
    n_var: usize,
    augmented_lagrangian_kinds: usize,
    sweep_count: u64,

    solution: FieldArena,
    sensitivity: FieldArena,
    sensitivity_shifted_lagrangian: FieldArena,
    sensitivity_augmented_lagrangian: FieldArena,
    solution_direct: FieldArena,
    dual_time_derivative: FieldArena,
    dual_time_derivative_n: FieldArena,
    cross_term_derivative: FieldArena,
    geometry_cross_term_derivative: FieldArena,
    geometry_cross_term_derivative_flow: FieldArena,
    solution_geometry: FieldArena,
    solution_geometry_old: FieldArena,
    geometry_direct: FieldArena,
    solution_bgs: FieldArena,
    solution_geometry_bgs_k: FieldArena,
}

impl AdjointNodeStore {
    /// 创建存储
    ///
    /// `initial` 为每个点伴随解的初值（长度 nVar），其余字段全零。
    pub fn new(
        initial: &[f64],
        n_points: usize,
        n_dim: usize,
        n_var: usize,
        augmented_lagrangian_kinds: usize,
    ) -> PbResult<Self> {
        PbError::check_dimension(n_dim)?;
        ensure!(n_var > 0, PbError::invalid_input("伴随存储 nVar 必须 ≥ 1"));
        ensure!(
            augmented_lagrangian_kinds > 0,
            PbError::invalid_input("增广拉格朗日种类数必须 ≥ 1")
        );
        PbError::check_size("initial", n_var, initial.len())?;

        let field = |f: AdjointField, width: usize| FieldArena::new(f.name(), n_points, width);

        let mut solution = field(AdjointField::Solution, n_var);
        for row in solution.rows_mut() {
            row.copy_from_slice(initial);
        }

        log::debug!(
            "创建伴随存储: {} 点, nDim={}, nVar={}, 增广拉格朗日种类={}",
            n_points,
            n_dim,
            n_var,
            augmented_lagrangian_kinds
        );

        Ok(Self {
            n_points,
            n_dim,
            n_var,
            augmented_lagrangian_kinds,
            sweep_count: 0,
            solution,
            sensitivity: field(AdjointField::Sensitivity, n_dim),
            sensitivity_shifted_lagrangian: field(AdjointField::SensitivityShiftedLagrangian, n_dim),
            sensitivity_augmented_lagrangian: field(
                AdjointField::SensitivityAugmentedLagrangian,
                n_dim * augmented_lagrangian_kinds,
            ),
            solution_direct: field(AdjointField::SolutionDirect, n_var),
            dual_time_derivative: field(AdjointField::DualTimeDerivative, n_var),
            dual_time_derivative_n: field(AdjointField::DualTimeDerivativeN, n_var),
            cross_term_derivative: field(AdjointField::CrossTermDerivative, n_var),
            geometry_cross_term_derivative: field(AdjointField::GeometryCrossTermDerivative, n_dim),
            geometry_cross_term_derivative_flow: field(
                AdjointField::GeometryCrossTermDerivativeFlow,
                n_dim,
            ),
            solution_geometry: field(AdjointField::SolutionGeometry, n_dim),
            solution_geometry_old: field(AdjointField::SolutionGeometryOld, n_dim),
            geometry_direct: field(AdjointField::GeometryDirect, n_dim),
            solution_bgs: field(AdjointField::SolutionBgs, n_dim),
            solution_geometry_bgs_k: field(AdjointField::SolutionGeometryBgsK, n_dim),
        })
    }

    /// 按配置创建，nVar 取 nDim
    pub fn from_config(
        initial: &[f64],
        n_points: usize,
        numerics: &NumericsConfig,
        adjoint: &AdjointConfig,
    ) -> PbResult<Self> {
        adjoint
            .validate()
            .map_err(|e| PbError::invalid_input(e.to_string()))?;
        Self::new(
            initial,
            n_points,
            numerics.n_dim,
            numerics.n_dim,
            adjoint.augmented_lagrangian_kinds,
        )
    }

    // ========== 尺寸 ==========

    /// 点数
    #[inline]
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// 空间维数
    #[inline]
    pub fn n_dim(&self) -> usize {
        self.n_dim
    }

    /// 变量数
    #[inline]
    pub fn n_var(&self) -> usize {
        self.n_var
    }

    /// 增广拉格朗日种类数
    #[inline]
    pub fn augmented_lagrangian_kinds(&self) -> usize {
        self.augmented_lagrangian_kinds
    }

    /// 已开始的扫掠次数
    #[inline]
    pub fn sweep_count(&self) -> u64 {
        self.sweep_count
    }

    // ========== 通用访问 ==========

    /// 按标识取字段
    pub fn field(&self, field: AdjointField) -> &FieldArena {
        match field {
            AdjointField::Solution => &self.solution,
            AdjointField::Sensitivity => &self.sensitivity,
            AdjointField::SensitivityShiftedLagrangian => &self.sensitivity_shifted_lagrangian,
            AdjointField::SensitivityAugmentedLagrangian => &self.sensitivity_augmented_lagrangian,
            AdjointField::SolutionDirect => &self.solution_direct,
            AdjointField::DualTimeDerivative => &self.dual_time_derivative,
            AdjointField::DualTimeDerivativeN => &self.dual_time_derivative_n,
            AdjointField::CrossTermDerivative => &self.cross_term_derivative,
            AdjointField::GeometryCrossTermDerivative => &self.geometry_cross_term_derivative,
            AdjointField::GeometryCrossTermDerivativeFlow => {
                &self.geometry_cross_term_derivative_flow
            }
            AdjointField::SolutionGeometry => &self.solution_geometry,
            AdjointField::SolutionGeometryOld => &self.solution_geometry_old,
            AdjointField::GeometryDirect => &self.geometry_direct,
            AdjointField::SolutionBgs => &self.solution_bgs,
            AdjointField::SolutionGeometryBgsK => &self.solution_geometry_bgs_k,
        }
    }

    /// 按标识取可写字段
    pub fn field_mut(&mut self, field: AdjointField) -> &mut FieldArena {
        match field {
            AdjointField::Solution => &mut self.solution,
            AdjointField::Sensitivity => &mut self.sensitivity,
            AdjointField::SensitivityShiftedLagrangian => &mut self.sensitivity_shifted_lagrangian,
            AdjointField::SensitivityAugmentedLagrangian => {
                &mut self.sensitivity_augmented_lagrangian
            }
            AdjointField::SolutionDirect => &mut self.solution_direct,
            AdjointField::DualTimeDerivative => &mut self.dual_time_derivative,
            AdjointField::DualTimeDerivativeN => &mut self.dual_time_derivative_n,
            AdjointField::CrossTermDerivative => &mut self.cross_term_derivative,
            AdjointField::GeometryCrossTermDerivative => &mut self.geometry_cross_term_derivative,
            AdjointField::GeometryCrossTermDerivativeFlow => {
                &mut self.geometry_cross_term_derivative_flow
            }
            AdjointField::SolutionGeometry => &mut self.solution_geometry,
            AdjointField::SolutionGeometryOld => &mut self.solution_geometry_old,
            AdjointField::GeometryDirect => &mut self.geometry_direct,
            AdjointField::SolutionBgs => &mut self.solution_bgs,
            AdjointField::SolutionGeometryBgsK => &mut self.solution_geometry_bgs_k,
        }
    }

    /// 通用读取，越界 panic
    #[inline]
    pub fn get(&self, field: AdjointField, point: usize, comp: usize) -> f64 {
        self.field(field).get(point, comp)
    }

    /// 通用写入，越界 panic
    #[inline]
    pub fn set(&mut self, field: AdjointField, point: usize, comp: usize, value: f64) {
        self.field_mut(field).set(point, comp, value);
    }

    /// 带检查的读取
    pub fn try_get(&self, field: AdjointField, point: usize, comp: usize) -> PbResult<f64> {
        self.field(field).try_get(point, comp)
    }

    /// 带检查的写入
    pub fn try_set(
        &mut self,
        field: AdjointField,
        point: usize,
        comp: usize,
        value: f64,
    ) -> PbResult<()> {
        self.field_mut(field).try_set(point, comp, value)
    }

    // ========== 命名访问 ==========

    field_accessors!(solution, set_solution, solution_row, set_solution_row, "伴随解");
    field_accessors!(sensitivity, set_sensitivity, sensitivity_row, set_sensitivity_row, "坐标灵敏度");
    field_accessors!(
        sensitivity_shifted_lagrangian,
        set_sensitivity_shifted_lagrangian,
        sensitivity_shifted_lagrangian_row,
        set_sensitivity_shifted_lagrangian_row,
        "平移拉格朗日灵敏度"
    );
    field_accessors!(
        solution_direct,
        set_solution_direct,
        solution_direct_row,
        set_solution_direct_row,
        "原问题解快照"
    );
    field_accessors!(
        dual_time_derivative,
        set_dual_time_derivative,
        dual_time_derivative_row,
        set_dual_time_derivative_row,
        "双时间导数"
    );
    field_accessors!(
        dual_time_derivative_n,
        set_dual_time_derivative_n,
        dual_time_derivative_n_row,
        set_dual_time_derivative_n_row,
        "上一步双时间导数"
    );
    field_accessors!(
        cross_term_derivative,
        set_cross_term_derivative,
        cross_term_derivative_row,
        set_cross_term_derivative_row,
        "交叉项导数"
    );
    field_accessors!(
        geometry_cross_term_derivative,
        set_geometry_cross_term_derivative,
        geometry_cross_term_derivative_row,
        set_geometry_cross_term_derivative_row,
        "几何交叉项导数"
    );
    field_accessors!(
        geometry_cross_term_derivative_flow,
        set_geometry_cross_term_derivative_flow,
        geometry_cross_term_derivative_flow_row,
        set_geometry_cross_term_derivative_flow_row,
        "流场侧几何交叉项导数"
    );
    field_accessors!(
        solution_geometry,
        set_solution_geometry,
        solution_geometry_row,
        set_solution_geometry_row,
        "几何伴随解"
    );
    field_accessors!(
        solution_geometry_old,
        set_solution_geometry_old,
        solution_geometry_old_row,
        set_solution_geometry_old_row,
        "旧几何伴随解"
    );
    field_accessors!(
        geometry_direct,
        set_geometry_direct,
        geometry_direct_row,
        set_geometry_direct_row,
        "原问题几何快照"
    );
    field_accessors!(solution_bgs, set_solution_bgs, solution_bgs_row, set_solution_bgs_row, "BGS 伴随解");
    field_accessors!(
        solution_geometry_bgs_k,
        set_solution_geometry_bgs_k,
        solution_geometry_bgs_k_row,
        set_solution_geometry_bgs_k_row,
        "子迭代起点几何解"
    );

    // ========== 增广拉格朗日 ==========

    #[inline]
    fn augmented_comp(&self, dim: usize, kind: usize) -> usize {
        assert!(dim < self.n_dim, "增广拉格朗日: 维度 {} 越界 (nDim {})", dim, self.n_dim);
        assert!(
            kind < self.augmented_lagrangian_kinds,
            "增广拉格朗日: 种类 {} 越界 (种类数 {})",
            kind,
            self.augmented_lagrangian_kinds
        );
        dim * self.augmented_lagrangian_kinds + kind
    }

    /// 读取增广拉格朗日灵敏度
    #[inline]
    pub fn sensitivity_augmented_lagrangian(&self, point: usize, dim: usize, kind: usize) -> f64 {
        let comp = self.augmented_comp(dim, kind);
        self.sensitivity_augmented_lagrangian.get(point, comp)
    }

    /// 写入增广拉格朗日灵敏度
    #[inline]
    pub fn set_sensitivity_augmented_lagrangian(
        &mut self,
        point: usize,
        dim: usize,
        kind: usize,
        value: f64,
    ) {
        let comp = self.augmented_comp(dim, kind);
        self.sensitivity_augmented_lagrangian.set(point, comp, value);
    }

    // ========== 累加 ==========

    /// 累加坐标灵敏度
    #[inline]
    pub fn add_sensitivity(&mut self, point: usize, dim: usize, value: f64) {
        self.sensitivity.add(point, dim, value);
    }

    /// 累加平移拉格朗日灵敏度
    #[inline]
    pub fn add_sensitivity_shifted_lagrangian(&mut self, point: usize, dim: usize, value: f64) {
        self.sensitivity_shifted_lagrangian.add(point, dim, value);
    }

    /// 累加增广拉格朗日灵敏度
    #[inline]
    pub fn add_sensitivity_augmented_lagrangian(
        &mut self,
        point: usize,
        dim: usize,
        kind: usize,
        value: f64,
    ) {
        let comp = self.augmented_comp(dim, kind);
        self.sensitivity_augmented_lagrangian.add(point, comp, value);
    }

    /// 累加几何交叉项
    #[inline]
    pub fn add_geometry_cross_term_derivative(&mut self, point: usize, dim: usize, value: f64) {
        self.geometry_cross_term_derivative.add(point, dim, value);
    }

    /// 累加流场侧几何交叉项
    #[inline]
    pub fn add_geometry_cross_term_derivative_flow(
        &mut self,
        point: usize,
        dim: usize,
        value: f64,
    ) {
        self.geometry_cross_term_derivative_flow
            .add(point, dim, value);
    }

    /// 两份几何交叉项之和
    #[inline]
    pub fn total_geometry_cross_term(&self, point: usize, dim: usize) -> f64 {
        self.geometry_cross_term_derivative.get(point, dim)
            + self.geometry_cross_term_derivative_flow.get(point, dim)
    }

    // ========== 扫掠与快照 ==========

    /// 清零三个灵敏度字段
    pub fn reset_sensitivities(&mut self) {
        self.sensitivity.fill(0.0);
        self.sensitivity_shifted_lagrangian.fill(0.0);
        self.sensitivity_augmented_lagrangian.fill(0.0);
    }

    /// 开始一次反向扫掠：清零灵敏度并计数
    pub fn begin_sweep(&mut self) {
        self.reset_sensitivities();
        self.sweep_count += 1;
        log::trace!("伴随扫掠 #{} 开始，灵敏度已清零", self.sweep_count);
    }

    /// 当前几何解写入旧值槽
    pub fn snapshot_old_geometry(&mut self) {
        self.solution_geometry_old
            .copy_from(&self.solution_geometry);
    }

    /// 记录子迭代起点的几何解
    pub fn snapshot_geometry_bgs(&mut self) {
        self.solution_geometry_bgs_k
            .copy_from(&self.solution_geometry);
    }

    /// 当前几何解相对子迭代起点的变化
    #[inline]
    pub fn geometry_bgs_delta(&self, point: usize, dim: usize) -> f64 {
        self.solution_geometry.get(point, dim) - self.solution_geometry_bgs_k.get(point, dim)
    }

    /// 全网格最大 |几何 BGS 变化|
    pub fn max_geometry_bgs_delta(&self) -> f64 {
        self.solution_geometry
            .max_abs_diff(&self.solution_geometry_bgs_k)
    }

    /// 物理时间步推进：双时间导数移入上一步槽
    pub fn shift_dual_time(&mut self) {
        self.dual_time_derivative_n
            .copy_from(&self.dual_time_derivative);
    }
}
