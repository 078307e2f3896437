// crates/pb_config/src/numerics_config.rs

//! 数值格式与伴随存储配置
//!
//! 所有字段均带 serde 默认值，JSON 中缺失的键使用默认配置。
//! 人工耗散系数的默认值与常用的 JST 参数一致：
//! kappa_1st = 0.15, kappa_2nd = 0.5, kappa_4th = 0.02。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// 对流格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConvectiveScheme {
    /// 一阶迎风（供体单元）
    Upwind,
    /// JST 中心格式（2/4 阶混合人工耗散）
    #[default]
    CentralJst,
    /// Lax 中心格式（1 阶人工耗散）
    CentralLax,
}

impl std::fmt::Display for ConvectiveScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upwind => write!(f, "Upwind"),
            Self::CentralJst => write!(f, "Central-JST"),
            Self::CentralLax => write!(f, "Central-Lax"),
        }
    }
}

/// 时间积分方式
///
/// 只有 `EulerImplicit` 需要 Jacobian 块。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeIntegration {
    /// 显式
    #[default]
    Explicit,
    /// 隐式欧拉（Newton 型线性化）
    EulerImplicit,
}

/// 数值格式配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericsConfig {
    /// 空间维数（2 或 3）
    #[serde(default = "default_n_dim")]
    pub n_dim: usize,

    /// 对流格式
    #[serde(default)]
    pub convective_scheme: ConvectiveScheme,

    /// 时间积分方式
    #[serde(default)]
    pub time_integration: TimeIntegration,

    /// 是否启用重力体积力
    #[serde(default)]
    pub gravity: bool,

    /// Froude 数
    #[serde(default)]
    pub froude: f64,

    /// 1 阶人工耗散系数（Lax）
    #[serde(default = "default_kappa_1st")]
    pub kappa_1st: f64,

    /// 2 阶人工耗散系数（JST）
    #[serde(default = "default_kappa_2nd")]
    pub kappa_2nd: f64,

    /// 4 阶人工耗散系数（JST）
    #[serde(default = "default_kappa_4th")]
    pub kappa_4th: f64,

    /// 是否网格运动
    #[serde(default)]
    pub grid_movement: bool,
}

fn default_n_dim() -> usize { 2 }
fn default_kappa_1st() -> f64 { 0.15 }
fn default_kappa_2nd() -> f64 { 0.5 }
fn default_kappa_4th() -> f64 { 0.02 }

impl Default for NumericsConfig {
    fn default() -> Self {
        Self {
            n_dim: default_n_dim(),
            convective_scheme: ConvectiveScheme::default(),
            time_integration: TimeIntegration::default(),
            gravity: false,
            froude: 0.0,
            kappa_1st: default_kappa_1st(),
            kappa_2nd: default_kappa_2nd(),
            kappa_4th: default_kappa_4th(),
            grid_movement: false,
        }
    }
}

impl NumericsConfig {
    /// 指定维数和格式的配置
    pub fn new(n_dim: usize, convective_scheme: ConvectiveScheme) -> Self {
        Self {
            n_dim,
            convective_scheme,
            ..Self::default()
        }
    }

    /// 切换为隐式
    pub fn implicit(mut self) -> Self {
        self.time_integration = TimeIntegration::EulerImplicit;
        self
    }

    /// 是否需要 Jacobian
    #[inline]
    pub fn is_implicit(&self) -> bool {
        self.time_integration == TimeIntegration::EulerImplicit
    }

    /// 关闭全部人工耗散（用于对比中心格式的对称通量部分）
    pub fn without_dissipation(mut self) -> Self {
        self.kappa_1st = 0.0;
        self.kappa_2nd = 0.0;
        self.kappa_4th = 0.0;
        self
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_dim != 2 && self.n_dim != 3 {
            return Err(ConfigError::invalid_value(
                "numerics.n_dim",
                self.n_dim,
                "维数必须为 2 或 3",
            ));
        }

        for (key, value) in [
            ("numerics.kappa_1st", self.kappa_1st),
            ("numerics.kappa_2nd", self.kappa_2nd),
            ("numerics.kappa_4th", self.kappa_4th),
            ("numerics.froude", self.froude),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid_value(key, value, "必须为非负有限值"));
            }
        }

        if self.gravity && self.froude == 0.0 {
            log::warn!("启用了重力但 Froude 数为 0，体积力项将由外部驱动自行处理");
        }
        if self.convective_scheme == ConvectiveScheme::CentralJst
            && self.kappa_4th > self.kappa_2nd
        {
            log::warn!(
                "kappa_4th={} 大于 kappa_2nd={}，4 阶耗散在光滑区可能过强",
                self.kappa_4th,
                self.kappa_2nd
            );
        }

        Ok(())
    }
}

/// 伴随存储配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjointConfig {
    /// 增广拉格朗日灵敏度的变体数
    #[serde(default = "default_augmented_lagrangian_kinds")]
    pub augmented_lagrangian_kinds: usize,
}

fn default_augmented_lagrangian_kinds() -> usize { 2 }

impl Default for AdjointConfig {
    fn default() -> Self {
        Self {
            augmented_lagrangian_kinds: default_augmented_lagrangian_kinds(),
        }
    }
}

impl AdjointConfig {
    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.augmented_lagrangian_kinds == 0 {
            return Err(ConfigError::invalid_value(
                "adjoint.augmented_lagrangian_kinds",
                self.augmented_lagrangian_kinds,
                "至少需要一个增广拉格朗日变体",
            ));
        }
        Ok(())
    }
}

/// 顶层配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PbConfig {
    /// 数值格式
    #[serde(default)]
    pub numerics: NumericsConfig,

    /// 伴随存储
    #[serde(default)]
    pub adjoint: AdjointConfig,
}

impl PbConfig {
    /// 从 JSON 字符串解析并验证
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PbConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.numerics.validate()?;
        self.adjoint.validate()
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
