// ==========================================
// 供应链产品目录系统 - 组成预算校验引擎
// ==========================================
// 红线: 百分比预算上限 100%,epsilon 固定 1e-6,不从配置读取
// 红线: 超出 epsilon 的浮点漂移按真实不匹配处理,不自动修正
// ==========================================
// 职责: 组成占比预算判定与人工申报物质的精确切分门禁
// 输入: 已分配占比合计 + 候选占比
// 输出: 布尔判定(本引擎自身不抛错,非法输入由调用方拦截)
// ==========================================

use crate::domain::substance::Substance;
use tracing::debug;

/// 组成占比比较的统一 epsilon
///
/// 说明: 存量数据与校验共用同一口径,禁止配置化,避免口径漂移
pub const PERCENT_EPSILON: f64 = 1e-6;

/// 组成预算上限 (百分比)
pub const FULL_PERCENT: f64 = 100.0;

// ==========================================
// CompositionValidator - 组成预算校验引擎
// ==========================================
// 无状态引擎,所有输入通过参数传入
pub struct CompositionValidator {
    // 无状态
}

impl CompositionValidator {
    /// 创建新的组成预算校验引擎
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心判定
    // ==========================================

    /// 判断候选占比是否仍在预算内
    ///
    /// # 参数
    /// - `current_total`: 已分配占比合计 ∈ [0,100]
    /// - `candidate`: 候选占比,调用方须保证为 (0,100] 内的有限数
    /// - `cap`: 预算上限(通常为 100)
    ///
    /// # 返回
    /// - true: current_total + candidate <= cap + epsilon
    pub fn can_allocate(&self, current_total: f64, candidate: f64, cap: f64) -> bool {
        current_total + candidate <= cap + PERCENT_EPSILON
    }

    /// 按默认上限 100% 判断候选占比是否仍在预算内
    pub fn can_allocate_default(&self, current_total: f64, candidate: f64) -> bool {
        self.can_allocate(current_total, candidate, FULL_PERCENT)
    }

    /// 判断合计是否与目标精确一致 (epsilon 内)
    ///
    /// # 参数
    /// - `total`: 实际合计
    /// - `target`: 目标值(通常为 100)
    pub fn is_exact_total(&self, total: f64, target: f64) -> bool {
        (total - target).abs() <= PERCENT_EPSILON
    }

    /// 剩余预算 (用于界面提示)
    ///
    /// # 返回
    /// - max(cap - current_total, 0)
    pub fn remaining_budget(&self, current_total: f64, cap: f64) -> f64 {
        (cap - current_total).max(0.0)
    }

    // ==========================================
    // 人工申报物质门禁
    // ==========================================

    /// 判断子组成是否恰好切分 100%
    ///
    /// 用途: 带子组成的 MANUAL 物质提交门禁;
    ///       不满足时由调用方报错并阻断提交
    pub fn manual_children_complete(&self, children: &[Substance]) -> bool {
        if children.is_empty() {
            return true;
        }
        let total: f64 = children.iter().map(|c| c.percentage).sum();
        let complete = self.is_exact_total(total, FULL_PERCENT);
        if !complete {
            debug!(
                children = children.len(),
                total = total,
                "子组成合计未精确切分 100%"
            );
        }
        complete
    }
}

impl Default for CompositionValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::InputType;

    fn child(percentage: f64) -> Substance {
        Substance {
            code: None,
            name: format!("成分-{}", percentage),
            percentage,
            projected_weight_kg: 0.0,
            input_type: InputType::Chemical,
            source_type: None,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_can_allocate_within_budget() {
        let validator = CompositionValidator::new();
        // 恰好填满
        assert!(validator.can_allocate_default(60.0, 40.0));
        // 仍有余量
        assert!(validator.can_allocate_default(0.0, 100.0));
        assert!(validator.can_allocate_default(99.0, 1.0));
    }

    #[test]
    fn test_can_allocate_over_budget() {
        let validator = CompositionValidator::new();
        assert!(!validator.can_allocate_default(60.0, 40.0001));
        assert!(!validator.can_allocate_default(100.0, 0.1));
    }

    #[test]
    fn test_can_allocate_epsilon_boundary() {
        let validator = CompositionValidator::new();
        // epsilon 内的越界视为仍在预算内 (浮点容差)
        assert!(validator.can_allocate_default(60.0, 40.0000005));
        // 超出 epsilon 即为越界
        assert!(!validator.can_allocate_default(60.0, 40.00001));
    }

    #[test]
    fn test_can_allocate_custom_cap() {
        let validator = CompositionValidator::new();
        assert!(validator.can_allocate(20.0, 30.0, 50.0));
        assert!(!validator.can_allocate(20.0, 30.1, 50.0));
    }

    #[test]
    fn test_is_exact_total() {
        let validator = CompositionValidator::new();
        assert!(validator.is_exact_total(100.0, 100.0));
        // epsilon 内
        assert!(validator.is_exact_total(100.0000005, 100.0));
        assert!(validator.is_exact_total(99.9999995, 100.0));
        // 超出 epsilon
        assert!(!validator.is_exact_total(99.99, 100.0));
        assert!(!validator.is_exact_total(100.00001, 100.0));
    }

    #[test]
    fn test_remaining_budget() {
        let validator = CompositionValidator::new();
        assert_eq!(validator.remaining_budget(60.0, 100.0), 40.0);
        // 已超限时剩余预算为 0,不返回负数
        assert_eq!(validator.remaining_budget(120.0, 100.0), 0.0);
    }

    #[test]
    fn test_manual_children_exact_partition() {
        let validator = CompositionValidator::new();

        // [30, 30, 40] → 恰好 100,允许提交
        let ok = vec![child(30.0), child(30.0), child(40.0)];
        assert!(validator.manual_children_complete(&ok));

        // [30, 30, 39.999999] → 差 1e-6 以上,阻断提交
        let short = vec![child(30.0), child(30.0), child(39.999999)];
        assert!(!validator.manual_children_complete(&short));
    }

    #[test]
    fn test_manual_children_empty_is_complete() {
        let validator = CompositionValidator::new();
        // 无子组成的物质不受切分门禁约束
        assert!(validator.manual_children_complete(&[]));
    }
}
