// ==========================================
// 供应链产品目录系统 - 主入口
// ==========================================
// 技术栈: Rust + SQLite
// 职责: 初始化日志与数据库,输出目录概况
// ==========================================

use std::sync::{Arc, Mutex};

use supply_chain_catalog::db::{get_default_db_path, init_schema, open_sqlite_connection};
use supply_chain_catalog::domain::types::ApprovalStatus;
use supply_chain_catalog::repository::{
    ApprovalRepository, MaterialRepository, PartnerRepository, ProductRepository,
};

fn main() {
    // 初始化日志系统
    supply_chain_catalog::logging::init();

    tracing::info!("==================================================");
    tracing::info!("供应链产品目录系统");
    tracing::info!("系统版本: {}", supply_chain_catalog::VERSION);
    tracing::info!("==================================================");

    // 获取数据库路径
    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    // 打开连接并初始化 schema(幂等)
    let conn = match open_sqlite_connection(&db_path) {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(error = %e, "数据库连接失败");
            std::process::exit(1);
        }
    };
    if let Err(e) = init_schema(&conn) {
        tracing::error!(error = %e, "schema 初始化失败");
        std::process::exit(1);
    }
    let conn = Arc::new(Mutex::new(conn));

    // 输出目录概况
    let partner_repo = PartnerRepository::from_connection(Arc::clone(&conn));
    let material_repo = MaterialRepository::from_connection(Arc::clone(&conn));
    let product_repo = ProductRepository::from_connection(Arc::clone(&conn));
    let approval_repo = ApprovalRepository::from_connection(Arc::clone(&conn));

    let partners = partner_repo.list_all().map(|v| v.len()).unwrap_or(0);
    let materials = material_repo.list_all().map(|v| v.len()).unwrap_or(0);
    let products = product_repo.list_all().map(|v| v.len()).unwrap_or(0);
    let pending_approvals = approval_repo
        .find_by_status(ApprovalStatus::Pending)
        .map(|v| v.len())
        .unwrap_or(0);
    tracing::info!(
        partners = partners,
        materials = materials,
        products = products,
        pending_approvals = pending_approvals,
        "目录概况"
    );

    tracing::info!("初始化完成");
}
