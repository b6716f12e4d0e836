// ==========================================
// 供应链产品目录系统 - 合作方数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::partner::Partner;
use crate::domain::types::PartnerKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_utc;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// PartnerRepository - 合作方仓储
// ==========================================
pub struct PartnerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PartnerRepository {
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

    /// 插入或更新合作方
    pub fn upsert(&self, partner: &Partner) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO partner (
                partner_id, partner_name, kind, contact_email, country,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                partner.partner_id,
                partner.partner_name,
                partner.kind.to_string(),
                partner.contact_email,
                partner.country,
                partner.created_at.to_rfc3339(),
                partner.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// 按 partner_id 查询合作方
    pub fn find_by_id(&self, partner_id: &str) -> RepositoryResult<Option<Partner>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT partner_id, partner_name, kind, contact_email, country,
                   created_at, updated_at
            FROM partner
            WHERE partner_id = ?1
            "#,
        )?;

        let result = stmt.query_row(params![partner_id], Self::map_row);
        match result {
            Ok(partner) => Ok(Some(partner)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 按类型查询合作方
    pub fn find_by_kind(&self, kind: PartnerKind) -> RepositoryResult<Vec<Partner>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT partner_id, partner_name, kind, contact_email, country,
                   created_at, updated_at
            FROM partner
            WHERE kind = ?1
            ORDER BY partner_name
            "#,
        )?;

        let rows = stmt.query_map(params![kind.to_string()], Self::map_row)?;
        let mut partners = Vec::new();
        for row in rows {
            partners.push(row?);
        }
        Ok(partners)
    }

    /// 查询全部合作方
    pub fn list_all(&self) -> RepositoryResult<Vec<Partner>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT partner_id, partner_name, kind, contact_email, country,
                   created_at, updated_at
            FROM partner
            ORDER BY partner_name
            "#,
        )?;

        let rows = stmt.query_map([], Self::map_row)?;
        let mut partners = Vec::new();
        for row in rows {
            partners.push(row?);
        }
        Ok(partners)
    }

    /// 删除合作方
    pub fn delete(&self, partner_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM partner WHERE partner_id = ?1",
            params![partner_id],
        )?;
        Ok(affected > 0)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Partner> {
        let kind_str: String = row.get(2)?;
        let kind = match kind_str.as_str() {
            "BRAND" => PartnerKind::Brand,
            "MANUFACTURER" => PartnerKind::Manufacturer,
            _ => PartnerKind::Supplier,
        };
        Ok(Partner {
            partner_id: row.get(0)?,
            partner_name: row.get(1)?,
            kind,
            contact_email: row.get(3)?,
            country: row.get(4)?,
            created_at: parse_utc(&row.get::<_, String>(5)?),
            updated_at: parse_utc(&row.get::<_, String>(6)?),
        })
    }
}
