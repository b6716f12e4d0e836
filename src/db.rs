// ==========================================
// 供应链产品目录系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为,避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout,减少并发写入时的偶发 busy 错误
// - 统一建表入口,测试与二进制共用同一 schema
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout(毫秒)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明:
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 默认数据库路径 (平台数据目录下的 supply-chain-catalog/catalog.db)
///
/// 说明: 数据目录不可用时回落到当前目录
pub fn get_default_db_path() -> String {
    let mut path: PathBuf = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("supply-chain-catalog");
    if let Err(e) = std::fs::create_dir_all(&path) {
        tracing::warn!(error = %e, "创建数据目录失败,回落到当前目录");
        path = PathBuf::from(".");
    }
    path.push("catalog.db");
    path.to_string_lossy().to_string()
}

/// 初始化数据库 schema(幂等,CREATE TABLE IF NOT EXISTS)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS partner (
            partner_id TEXT PRIMARY KEY,
            partner_name TEXT NOT NULL,
            kind TEXT NOT NULL,
            contact_email TEXT,
            country TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS material (
            material_id TEXT PRIMARY KEY,
            material_name TEXT NOT NULL,
            weight_kg REAL NOT NULL,
            supplier_id TEXT,
            substances_json TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS product (
            product_id TEXT PRIMARY KEY,
            product_name TEXT NOT NULL,
            brand_id TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS product_bom (
            product_id TEXT NOT NULL REFERENCES product(product_id) ON DELETE CASCADE,
            seq_no INTEGER NOT NULL,
            material_id TEXT NOT NULL,
            quantity REAL NOT NULL,
            percentage REAL NOT NULL,
            unit_cost REAL,
            PRIMARY KEY (product_id, seq_no)
        );

        CREATE TABLE IF NOT EXISTS trade_order (
            order_id TEXT PRIMARY KEY,
            order_no TEXT NOT NULL,
            kind TEXT NOT NULL,
            status TEXT NOT NULL,
            buyer_id TEXT NOT NULL,
            seller_id TEXT NOT NULL,
            mirror_order_id TEXT,
            created_by TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS order_line (
            order_id TEXT NOT NULL REFERENCES trade_order(order_id) ON DELETE CASCADE,
            seq_no INTEGER NOT NULL,
            product_id TEXT NOT NULL,
            quantity REAL NOT NULL,
            unit_price REAL NOT NULL,
            PRIMARY KEY (order_id, seq_no)
        );

        CREATE TABLE IF NOT EXISTS approval_request (
            approval_id TEXT PRIMARY KEY,
            target_kind TEXT NOT NULL,
            target_id TEXT NOT NULL,
            status TEXT NOT NULL,
            requested_by TEXT NOT NULL,
            requested_at TEXT NOT NULL,
            reviewed_by TEXT,
            reviewed_at TEXT,
            review_comment TEXT,
            revision INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS action_log (
            action_id TEXT PRIMARY KEY,
            action_type TEXT NOT NULL,
            action_ts TEXT NOT NULL,
            actor TEXT NOT NULL,
            target_kind TEXT,
            target_id TEXT,
            payload_json TEXT,
            detail TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_order_line_order ON order_line(order_id);
        CREATE INDEX IF NOT EXISTS idx_approval_status ON approval_request(status);
        CREATE INDEX IF NOT EXISTS idx_action_log_target ON action_log(target_kind, target_id);
        "#,
    )
}
