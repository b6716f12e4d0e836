// ==========================================
// 供应链产品目录系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod action_log_repo;
pub mod approval_repo;
pub mod error;
pub mod material_repo;
pub mod order_repo;
pub mod partner_repo;
pub mod product_repo;

// 重导出核心仓储
pub use action_log_repo::ActionLogRepository;
pub use approval_repo::ApprovalRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use material_repo::MaterialRepository;
pub use order_repo::OrderRepository;
pub use partner_repo::PartnerRepository;
pub use product_repo::ProductRepository;

use chrono::{DateTime, Utc};

// RFC3339 时间解析,解析失败回落为当前时间
pub(crate) fn parse_utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
