// ==========================================
// 供应链产品目录系统 - API 层
// ==========================================
// 职责: 业务接口,编排仓储与引擎
// 红线: 所有写入经过输入校验与操作日志
// ==========================================

pub mod approval_api;
pub mod error;
pub mod material_api;
pub mod order_api;
pub mod product_api;
pub mod validator;

// 重导出核心 API
pub use approval_api::ApprovalApi;
pub use error::{ApiError, ApiResult, ValidationViolation};
pub use material_api::{MaterialApi, MaterialDraft};
pub use order_api::{NewOrderLine, OrderApi};
pub use product_api::ProductApi;
pub use validator::CompositionInputValidator;
