// ==========================================
// 供应链产品目录系统 - 操作日志仓储
// ==========================================
// 红线: Repository 不含业务逻辑;日志只增不改
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::action_log::ActionLog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ActionLogRepository - 操作日志仓储
// ==========================================
pub struct ActionLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ActionLogRepository {
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

    /// 追加操作日志
    pub fn insert(&self, log: &ActionLog) -> RepositoryResult<()> {
        let payload = log
            .payload_json
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO action_log (
                action_id, action_type, action_ts, actor,
                target_kind, target_id, payload_json, detail
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                log.action_id,
                log.action_type,
                log.action_ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                log.actor,
                log.target_kind,
                log.target_id,
                payload,
                log.detail,
            ],
        )?;
        Ok(())
    }

    /// 按对象查询操作日志(时间倒序)
    pub fn find_by_target(
        &self,
        target_kind: &str,
        target_id: &str,
    ) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_type, action_ts, actor,
                   target_kind, target_id, payload_json, detail
            FROM action_log
            WHERE target_kind = ?1 AND target_id = ?2
            ORDER BY action_ts DESC
            "#,
        )?;

        let rows = stmt.query_map(params![target_kind, target_id], Self::map_row)?;
        let mut logs = Vec::new();
        for row in rows {
            logs.push(row?);
        }
        Ok(logs)
    }

    /// 查询最近 N 条操作日志
    pub fn list_recent(&self, limit: i64) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_type, action_ts, actor,
                   target_kind, target_id, payload_json, detail
            FROM action_log
            ORDER BY action_ts DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit], Self::map_row)?;
        let mut logs = Vec::new();
        for row in rows {
            logs.push(row?);
        }
        Ok(logs)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<ActionLog> {
        let ts_str: String = row.get(2)?;
        let payload_str: Option<String> = row.get(6)?;
        Ok(ActionLog {
            action_id: row.get(0)?,
            action_type: row.get(1)?,
            action_ts: chrono::NaiveDateTime::parse_from_str(&ts_str, "%Y-%m-%d %H:%M:%S")
                .unwrap_or_default(),
            actor: row.get(3)?,
            target_kind: row.get(4)?,
            target_id: row.get(5)?,
            payload_json: payload_str.and_then(|s| serde_json::from_str(&s).ok()),
            detail: row.get(7)?,
        })
    }
}
