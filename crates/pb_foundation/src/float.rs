// crates/pb_foundation/src/float.rs

//! 数值常量与安全浮点运算

// ============================================================================
// 数值常量
// ============================================================================

/// 安全除法的最小分母阈值
pub const SAFE_DIV_EPSILON: f64 = 1e-14;

// ============================================================================
// 辅助函数
// ============================================================================

/// 安全除法
///
/// 分母绝对值低于 [`SAFE_DIV_EPSILON`] 或结果非有限时返回 `fallback`。
#[inline]
pub fn safe_div(a: f64, b: f64, fallback: f64) -> f64 {
    if b.abs() < SAFE_DIV_EPSILON {
        fallback
    } else {
        let result = a / b;
        if result.is_finite() {
            result
        } else {
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_div() {
        assert_eq!(safe_div(1.0, 2.0, 0.0), 0.5);
        assert_eq!(safe_div(1.0, 0.0, -1.0), -1.0);
        assert_eq!(safe_div(1.0, 1e-16, 7.0), 7.0);
    }
}
