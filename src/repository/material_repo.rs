// ==========================================
// 供应链产品目录系统 - 物料数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑,只负责数据访问
// 约束: 所有查询使用参数化,防止 SQL 注入
// 说明: 物质组成树以 JSON 列 (substances_json) 整体存储
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::material::Material;
use crate::domain::substance::Substance;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_utc;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// MaterialRepository - 物料仓储
// ==========================================
pub struct MaterialRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaterialRepository {
    /// 创建新的 MaterialRepository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入或更新物料(INSERT OR REPLACE,upsert 语义)
    pub fn upsert(&self, material: &Material) -> RepositoryResult<()> {
        let substances_json = serde_json::to_string(&material.substances)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO material (
                material_id, material_name, weight_kg, supplier_id,
                substances_json, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                material.material_id,
                material.material_name,
                material.weight_kg,
                material.supplier_id,
                substances_json,
                material.created_at.to_rfc3339(),
                material.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// 批量插入物料(事务内 upsert)
    ///
    /// # 返回
    /// - Ok(usize): 成功写入的记录数
    pub fn batch_upsert(&self, materials: &[Material]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for material in materials {
            let substances_json = serde_json::to_string(&material.substances)?;
            tx.execute(
                r#"
                INSERT OR REPLACE INTO material (
                    material_id, material_name, weight_kg, supplier_id,
                    substances_json, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    material.material_id,
                    material.material_name,
                    material.weight_kg,
                    material.supplier_id,
                    substances_json,
                    material.created_at.to_rfc3339(),
                    material.updated_at.to_rfc3339(),
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 按 material_id 查询物料
    ///
    /// # 返回
    /// - Ok(Some(Material)): 找到记录
    /// - Ok(None): 未找到记录
    pub fn find_by_id(&self, material_id: &str) -> RepositoryResult<Option<Material>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT material_id, material_name, weight_kg, supplier_id,
                   substances_json, created_at, updated_at
            FROM material
            WHERE material_id = ?1
            "#,
        )?;

        let result = stmt.query_row(params![material_id], Self::map_row);

        match result {
            Ok(material) => Ok(Some(material)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询全部物料(按名称排序)
    pub fn list_all(&self) -> RepositoryResult<Vec<Material>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT material_id, material_name, weight_kg, supplier_id,
                   substances_json, created_at, updated_at
            FROM material
            ORDER BY material_name
            "#,
        )?;

        let rows = stmt.query_map([], Self::map_row)?;
        let mut materials = Vec::new();
        for row in rows {
            materials.push(row?);
        }
        Ok(materials)
    }

    /// 按供应商查询物料
    pub fn find_by_supplier(&self, supplier_id: &str) -> RepositoryResult<Vec<Material>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT material_id, material_name, weight_kg, supplier_id,
                   substances_json, created_at, updated_at
            FROM material
            WHERE supplier_id = ?1
            ORDER BY material_name
            "#,
        )?;

        let rows = stmt.query_map(params![supplier_id], Self::map_row)?;
        let mut materials = Vec::new();
        for row in rows {
            materials.push(row?);
        }
        Ok(materials)
    }

    /// 删除物料
    ///
    /// # 返回
    /// - Ok(true): 删除了记录
    /// - Ok(false): 记录不存在
    pub fn delete(&self, material_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM material WHERE material_id = ?1",
            params![material_id],
        )?;
        Ok(affected > 0)
    }

    // 行映射: substances_json 反解为物质树
    fn map_row(row: &Row<'_>) -> rusqlite::Result<Material> {
        let substances_json: String = row.get(4)?;
        let substances: Vec<Substance> =
            serde_json::from_str(&substances_json).unwrap_or_default();
        Ok(Material {
            material_id: row.get(0)?,
            material_name: row.get(1)?,
            weight_kg: row.get(2)?,
            supplier_id: row.get(3)?,
            substances,
            created_at: parse_utc(&row.get::<_, String>(5)?),
            updated_at: parse_utc(&row.get::<_, String>(6)?),
        })
    }
}
