// ==========================================
// 组成预算校验引擎集成测试
// ==========================================
// 测试目标: 预算判定边界、精确切分门禁、epsilon 口径
// ==========================================

use supply_chain_catalog::engine::composition::{CompositionValidator, PERCENT_EPSILON};

#[test]
fn test_allocation_within_budget_always_allowed() {
    let validator = CompositionValidator::new();

    // current + candidate <= 100 的组合全部放行
    let cases = [
        (0.0, 100.0),
        (50.0, 50.0),
        (99.999999, 0.000001),
        (33.3, 66.7),
        (0.0, 0.001),
    ];
    for (current, candidate) in cases {
        assert!(
            validator.can_allocate_default(current, candidate),
            "current={} candidate={} 应在预算内",
            current,
            candidate
        );
    }
}

#[test]
fn test_allocation_beyond_epsilon_rejected() {
    let validator = CompositionValidator::new();

    // 超出 100.000001 的组合全部拒绝
    let cases = [(60.0, 40.001), (100.0, 1.0), (99.0, 1.1), (0.0, 100.1)];
    for (current, candidate) in cases {
        assert!(
            !validator.can_allocate_default(current, candidate),
            "current={} candidate={} 应被拒绝",
            current,
            candidate
        );
    }
}

#[test]
fn test_exact_total_epsilon_boundary() {
    let validator = CompositionValidator::new();

    // epsilon 内视为精确一致
    assert!(validator.is_exact_total(100.0000005, 100.0));
    // 超出 epsilon 视为真实不匹配,不自动修正
    assert!(!validator.is_exact_total(99.99, 100.0));
}

#[test]
fn test_epsilon_constant_value() {
    // 口径固定,禁止漂移
    assert_eq!(PERCENT_EPSILON, 1e-6);
}

#[test]
fn test_remaining_budget_hint() {
    let validator = CompositionValidator::new();
    assert_eq!(validator.remaining_budget(37.5, 100.0), 62.5);
    assert_eq!(validator.remaining_budget(100.0, 100.0), 0.0);
}
