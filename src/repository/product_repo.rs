// ==========================================
// 供应链产品目录系统 - 产品/BOM 数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: BOM 行独立成表 (product_bom),按 seq_no 排序读取
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::product::{BomLine, Product};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_utc;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ProductRepository - 产品仓储
// ==========================================
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 产品主数据
    // ==========================================

    /// 插入或更新产品
    pub fn upsert(&self, product: &Product) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO product (
                product_id, product_name, brand_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                product.product_id,
                product.product_name,
                product.brand_id,
                product.created_at.to_rfc3339(),
                product.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// 按 product_id 查询产品
    pub fn find_by_id(&self, product_id: &str) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT product_id, product_name, brand_id, created_at, updated_at
            FROM product
            WHERE product_id = ?1
            "#,
        )?;

        let result = stmt.query_row(params![product_id], Self::map_product_row);
        match result {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询全部产品
    pub fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT product_id, product_name, brand_id, created_at, updated_at
            FROM product
            ORDER BY product_name
            "#,
        )?;

        let rows = stmt.query_map([], Self::map_product_row)?;
        let mut products = Vec::new();
        for row in rows {
            products.push(row?);
        }
        Ok(products)
    }

    /// 删除产品(BOM 行级联删除)
    pub fn delete(&self, product_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM product WHERE product_id = ?1",
            params![product_id],
        )?;
        Ok(affected > 0)
    }

    // ==========================================
    // BOM 行
    // ==========================================

    /// 插入 BOM 行
    pub fn insert_bom_line(&self, line: &BomLine) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO product_bom (
                product_id, seq_no, material_id, quantity, percentage, unit_cost
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                line.product_id,
                line.seq_no,
                line.material_id,
                line.quantity,
                line.percentage,
                line.unit_cost,
            ],
        )?;
        Ok(())
    }

    /// 查询产品的 BOM 行(按 seq_no 排序)
    pub fn list_bom_lines(&self, product_id: &str) -> RepositoryResult<Vec<BomLine>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT product_id, seq_no, material_id, quantity, percentage, unit_cost
            FROM product_bom
            WHERE product_id = ?1
            ORDER BY seq_no
            "#,
        )?;

        let rows = stmt.query_map(params![product_id], Self::map_bom_row)?;
        let mut lines = Vec::new();
        for row in rows {
            lines.push(row?);
        }
        Ok(lines)
    }

    /// 产品 BOM 的下一个行序号 (max(seq_no)+1,空 BOM 为 1)
    pub fn next_bom_seq_no(&self, product_id: &str) -> RepositoryResult<i32> {
        let conn = self.get_conn()?;
        let max: Option<i32> = conn.query_row(
            "SELECT MAX(seq_no) FROM product_bom WHERE product_id = ?1",
            params![product_id],
            |row| row.get(0),
        )?;
        Ok(max.unwrap_or(0) + 1)
    }

    /// 删除 BOM 行
    pub fn delete_bom_line(&self, product_id: &str, seq_no: i32) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM product_bom WHERE product_id = ?1 AND seq_no = ?2",
            params![product_id, seq_no],
        )?;
        Ok(affected > 0)
    }

    fn map_product_row(row: &Row<'_>) -> rusqlite::Result<Product> {
        Ok(Product {
            product_id: row.get(0)?,
            product_name: row.get(1)?,
            brand_id: row.get(2)?,
            created_at: parse_utc(&row.get::<_, String>(3)?),
            updated_at: parse_utc(&row.get::<_, String>(4)?),
        })
    }

    fn map_bom_row(row: &Row<'_>) -> rusqlite::Result<BomLine> {
        Ok(BomLine {
            product_id: row.get(0)?,
            seq_no: row.get(1)?,
            material_id: row.get(2)?,
            quantity: row.get(3)?,
            percentage: row.get(4)?,
            unit_cost: row.get(5)?,
        })
    }
}
