// ==========================================
// 供应链产品目录系统 - 引擎层
// ==========================================
// 职责: 纯计算业务规则,单遍同步,无挂起点
// 红线: Engine 不触碰存储,所有数据通过参数与查找函数传入
// 红线: Engine 不修改输入,输出为全新结构
// ==========================================

pub mod aggregation;
pub mod composition;
pub mod derivation;

// 重导出核心引擎
pub use aggregation::BillOfSubstancesAggregator;
pub use composition::{CompositionValidator, FULL_PERCENT, PERCENT_EPSILON};
pub use derivation::DerivationService;
