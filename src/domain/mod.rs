// ==========================================
// 供应链产品目录系统 - 领域层
// ==========================================
// 职责: 实体与类型定义,不依赖存储与业务规则
// ==========================================

pub mod action_log;
pub mod approval;
pub mod material;
pub mod order;
pub mod partner;
pub mod product;
pub mod substance;
pub mod types;

// 重导出核心实体
pub use action_log::{ActionLog, ActionType};
pub use approval::ApprovalRequest;
pub use material::{DqLevel, DqReport, DqViolation, ImportResult, ImportSummary, Material, RawMaterialRow};
pub use order::{OrderLine, TradeOrder};
pub use partner::Partner;
pub use product::{BomLine, Product};
pub use substance::{AggregatedSubstance, Substance, SubstanceSource};
