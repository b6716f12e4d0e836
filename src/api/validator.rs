// ==========================================
// 供应链产品目录系统 - 输入校验器
// ==========================================
// 职责: API 入口的数值输入校验(有限性/取值范围)
// 说明: 组成预算引擎假设输入已在此处拦截非法值;
//       candidate == 0 在此处判为非法,引擎层不再复核
// ==========================================

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::engine::composition::FULL_PERCENT;

// ==========================================
// CompositionInputValidator - 组成输入校验器
// ==========================================
pub struct CompositionInputValidator;

impl CompositionInputValidator {
    pub fn new() -> Self {
        Self
    }

    /// 校验占比: 有限数且 ∈ (0,100]
    pub fn validate_percentage(&self, field: &str, value: f64) -> ApiResult<()> {
        let mut violations = Vec::new();

        if !value.is_finite() {
            violations.push(ValidationViolation {
                field: field.to_string(),
                value: value.to_string(),
                reason: "占比必须为有限数".to_string(),
            });
        } else if value <= 0.0 {
            violations.push(ValidationViolation {
                field: field.to_string(),
                value: value.to_string(),
                reason: "占比必须大于 0".to_string(),
            });
        } else if value > FULL_PERCENT {
            violations.push(ValidationViolation {
                field: field.to_string(),
                value: value.to_string(),
                reason: "占比不得超过 100".to_string(),
            });
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ApiError::ValidationError {
                reason: format!("字段 {} 取值非法", field),
                violations,
            })
        }
    }

    /// 校验数量/重量: 有限数且 > 0
    pub fn validate_positive(&self, field: &str, value: f64) -> ApiResult<()> {
        if value.is_finite() && value > 0.0 {
            return Ok(());
        }
        Err(ApiError::ValidationError {
            reason: format!("字段 {} 取值非法", field),
            violations: vec![ValidationViolation {
                field: field.to_string(),
                value: value.to_string(),
                reason: "必须为大于 0 的有限数".to_string(),
            }],
        })
    }

    /// 校验非空标识符
    pub fn validate_id(&self, field: &str, value: &str) -> ApiResult<()> {
        if value.trim().is_empty() {
            return Err(ApiError::InvalidInput(format!("{} 不能为空", field)));
        }
        Ok(())
    }
}

impl Default for CompositionInputValidator {
    fn default() -> Self {
        Self::new()
    }
}
