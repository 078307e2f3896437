// crates/pb_physics/src/adjoint/arena.rs

//! 按 (点, 分量) 寻址的连续存储
//!
//! 每个字段一块 `n_points × width` 的行主序 `Vec<f64>`，创建后不再重新分配。

use pb_foundation::{PbError, PbResult};
use rayon::prelude::*;

/// 单字段存储
#[derive(Debug, Clone, PartialEq)]
pub struct FieldArena {
    name: &'static str,
    n_points: usize,
    width: usize,
    data: Vec<f64>,
}

impl FieldArena {
    /// 全零字段
    pub fn new(name: &'static str, n_points: usize, width: usize) -> Self {
        Self {
            name,
            n_points,
            width,
            data: vec![0.0; n_points * width],
        }
    }

    /// 字段名
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 点数
    #[inline]
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// 每点分量数
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn offset(&self, point: usize, comp: usize) -> usize {
        assert!(
            point < self.n_points,
            "{}: 点索引 {} 越界 (点数 {})",
            self.name,
            point,
            self.n_points
        );
        assert!(
            comp < self.width,
            "{}: 分量索引 {} 越界 (宽度 {})",
            self.name,
            comp,
            self.width
        );
        point * self.width + comp
    }

    /// 读取，越界 panic
    #[inline]
    pub fn get(&self, point: usize, comp: usize) -> f64 {
        self.data[self.offset(point, comp)]
    }

    /// 写入，越界 panic
    #[inline]
    pub fn set(&mut self, point: usize, comp: usize, value: f64) {
        let idx = self.offset(point, comp);
        self.data[idx] = value;
    }

    /// 累加，越界 panic
    #[inline]
    pub fn add(&mut self, point: usize, comp: usize, value: f64) {
        let idx = self.offset(point, comp);
        self.data[idx] += value;
    }

    /// 带检查的读取
    pub fn try_get(&self, point: usize, comp: usize) -> PbResult<f64> {
        PbError::check_index(self.name, point, self.n_points)?;
        PbError::check_index(self.name, comp, self.width)?;
        Ok(self.data[point * self.width + comp])
    }

    /// 带检查的写入
    pub fn try_set(&mut self, point: usize, comp: usize, value: f64) -> PbResult<()> {
        PbError::check_index(self.name, point, self.n_points)?;
        PbError::check_index(self.name, comp, self.width)?;
        self.data[point * self.width + comp] = value;
        Ok(())
    }

    /// 一个点的整行
    #[inline]
    pub fn row(&self, point: usize) -> &[f64] {
        let start = self.offset(point, 0);
        &self.data[start..start + self.width]
    }

    /// 一个点的可写整行
    #[inline]
    pub fn row_mut(&mut self, point: usize) -> &mut [f64] {
        let start = self.offset(point, 0);
        &mut self.data[start..start + self.width]
    }

    /// 整行写入，长度必须等于宽度
    pub fn set_row(&mut self, point: usize, values: &[f64]) {
        assert_eq!(
            values.len(),
            self.width,
            "{}: 行长度 {} 与宽度 {} 不符",
            self.name,
            values.len(),
            self.width
        );
        self.row_mut(point).copy_from_slice(values);
    }

    /// 全部置为 `value`
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// 从同形状字段复制
    pub fn copy_from(&mut self, other: &FieldArena) {
        assert_eq!(
            (self.n_points, self.width),
            (other.n_points, other.width),
            "{} ← {}: 形状不一致",
            self.name,
            other.name
        );
        self.data.copy_from_slice(&other.data);
    }

    /// 扁平视图
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// 可写扁平视图
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// 按点切分的可写行迭代器
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, f64> {
        // 宽度为 0 时数据为空，按 1 切分避免 panic
        let width = self.width.max(1);
        self.data.chunks_exact_mut(width)
    }

    /// 按点切分的并行可写行迭代器，各行互不重叠
    pub fn par_rows_mut(&mut self) -> rayon::slice::ChunksExactMut<'_, f64> {
        let width = self.width.max(1);
        self.data.par_chunks_exact_mut(width)
    }

    /// 与另一同形状字段的最大绝对差
    pub fn max_abs_diff(&self, other: &FieldArena) -> f64 {
        assert_eq!(
            (self.n_points, self.width),
            (other.n_points, other.width),
            "{} vs {}: 形状不一致",
            self.name,
            other.name
        );
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}
