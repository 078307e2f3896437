// crates/pb_physics/src/engine/parallel.rs

//! 边批量计算
//!
//! 对一组边上下文求残差与 Jacobian，按输入顺序返回结果：
//! - 串行：一个格式实例依次处理
//! - 并行：rayon `map_init` 为每个工作线程克隆一份私有格式实例
//!
//! 结果散射到点上的累加不在此处进行，由调用方负责避免同一点的并发写。

use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::schemes::{EdgeContribution, EdgeNumerics, NumericsError};
use crate::types::EdgeContext;

// ============================================================
// 配置
// ============================================================

/// 批量策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchStrategy {
    /// 串行执行
    Sequential,
    /// 并行执行
    Parallel,
    /// 边数不少于 `min_parallel_size` 时并行
    #[default]
    Auto,
}

/// 批量计算配置
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// 策略
    pub strategy: BatchStrategy,
    /// 最小并行边数
    pub min_parallel_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            strategy: BatchStrategy::Auto,
            min_parallel_size: 1024,
        }
    }
}

impl BatchConfig {
    /// 创建构建器
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder::default()
    }
}

/// 配置构建器
#[derive(Default)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    /// 设置策略
    pub fn strategy(mut self, strategy: BatchStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// 设置最小并行边数
    pub fn min_parallel_size(mut self, size: usize) -> Self {
        self.config.min_parallel_size = size;
        self
    }

    /// 完成构建
    pub fn build(self) -> BatchConfig {
        self.config
    }
}

// ============================================================
// 性能指标
// ============================================================

/// 性能指标
#[derive(Debug, Clone, Default)]
pub struct BatchMetrics {
    /// 总调用次数
    pub total_calls: usize,
    /// 并行调用次数
    pub parallel_calls: usize,
    /// 串行调用次数
    pub sequential_calls: usize,
    /// 总耗时
    pub total_duration: Duration,
    /// 处理的边总数
    pub total_edges: usize,
}

impl BatchMetrics {
    /// 记录一次计算
    pub fn record(&mut self, n_edges: usize, is_parallel: bool, duration: Duration) {
        self.total_calls += 1;
        self.total_edges += n_edges;
        self.total_duration += duration;
        if is_parallel {
            self.parallel_calls += 1;
        } else {
            self.sequential_calls += 1;
        }
    }

    /// 重置
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 平均每边耗时
    pub fn avg_time_per_edge(&self) -> Duration {
        if self.total_edges > 0 {
            Duration::from_secs_f64(self.total_duration.as_secs_f64() / self.total_edges as f64)
        } else {
            Duration::ZERO
        }
    }
}

// ============================================================
// 批量计算器
// ============================================================

/// 边批量计算器
///
/// `prototype` 只被克隆，从不直接计算，因此批量结果与其内部诊断状态无关。
pub struct EdgeBatchEvaluator<S> {
    prototype: S,
    config: BatchConfig,
    metrics: BatchMetrics,
}

impl<S> EdgeBatchEvaluator<S>
where
    S: EdgeNumerics + Clone + Sync,
{
    /// 创建计算器
    pub fn new(prototype: S, config: BatchConfig) -> Self {
        log::debug!(
            "创建边批量计算器: 格式={}, 策略={:?}, 并行阈值={}",
            prototype.name(),
            config.strategy,
            config.min_parallel_size
        );
        Self {
            prototype,
            config,
            metrics: BatchMetrics::default(),
        }
    }

    /// 格式原型
    pub fn prototype(&self) -> &S {
        &self.prototype
    }

    /// 配置
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// 性能指标
    pub fn metrics(&self) -> &BatchMetrics {
        &self.metrics
    }

    fn use_parallel(&self, n_edges: usize) -> bool {
        match self.config.strategy {
            BatchStrategy::Sequential => false,
            BatchStrategy::Parallel => true,
            BatchStrategy::Auto => n_edges >= self.config.min_parallel_size,
        }
    }

    /// 计算全部边，返回与输入同序的结果
    ///
    /// 任一边出错时返回错误。
    pub fn evaluate(
        &mut self,
        contexts: &[EdgeContext],
    ) -> Result<Vec<EdgeContribution>, NumericsError> {
        let mut outputs = vec![EdgeContribution::new(self.prototype.n_var()); contexts.len()];
        self.evaluate_into(contexts, &mut outputs)?;
        Ok(outputs)
    }

    /// 计算到已分配的输出缓冲区
    pub fn evaluate_into(
        &mut self,
        contexts: &[EdgeContext],
        outputs: &mut [EdgeContribution],
    ) -> Result<(), NumericsError> {
        if contexts.len() != outputs.len() {
            return Err(NumericsError::SizeMismatch {
                expected: contexts.len(),
                actual: outputs.len(),
            });
        }

        let n_edges = contexts.len();
        let is_parallel = self.use_parallel(n_edges);
        let start = Instant::now();

        let result = if is_parallel {
            self.evaluate_parallel(contexts, outputs)
        } else {
            self.evaluate_serial(contexts, outputs)
        };

        self.metrics.record(n_edges, is_parallel, start.elapsed());
        result
    }

    fn evaluate_serial(
        &self,
        contexts: &[EdgeContext],
        outputs: &mut [EdgeContribution],
    ) -> Result<(), NumericsError> {
        let mut scheme = self.prototype.clone();
        for (ctx, out) in contexts.iter().zip(outputs.iter_mut()) {
            scheme.compute_residual(ctx, out)?;
        }
        Ok(())
    }

    fn evaluate_parallel(
        &self,
        contexts: &[EdgeContext],
        outputs: &mut [EdgeContribution],
    ) -> Result<(), NumericsError> {
        let prototype = &self.prototype;
        contexts
            .par_iter()
            .zip(outputs.par_iter_mut())
            .map_init(
                || prototype.clone(),
                |scheme, (ctx, out)| scheme.compute_residual(ctx, out),
            )
            .collect::<Result<(), NumericsError>>()
    }
}
