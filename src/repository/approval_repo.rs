// ==========================================
// 供应链产品目录系统 - 审批数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 并发控制: 裁决更新带 revision 条件,不匹配即乐观锁冲突
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::approval::ApprovalRequest;
use crate::domain::types::{ApprovalStatus, ApprovalTargetKind};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_utc;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ApprovalRepository - 审批仓储
// ==========================================
pub struct ApprovalRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ApprovalRepository {
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

    /// 插入审批请求
    pub fn insert(&self, request: &ApprovalRequest) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO approval_request (
                approval_id, target_kind, target_id, status,
                requested_by, requested_at, reviewed_by, reviewed_at,
                review_comment, revision
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                request.approval_id,
                request.target_kind.to_string(),
                request.target_id,
                request.status.to_string(),
                request.requested_by,
                request.requested_at.to_rfc3339(),
                request.reviewed_by,
                request.reviewed_at.map(|dt| dt.to_rfc3339()),
                request.review_comment,
                request.revision,
            ],
        )?;
        Ok(())
    }

    /// 按 approval_id 查询审批请求
    pub fn find_by_id(&self, approval_id: &str) -> RepositoryResult<Option<ApprovalRequest>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT approval_id, target_kind, target_id, status,
                   requested_by, requested_at, reviewed_by, reviewed_at,
                   review_comment, revision
            FROM approval_request
            WHERE approval_id = ?1
            "#,
        )?;

        let result = stmt.query_row(params![approval_id], Self::map_row);
        match result {
            Ok(request) => Ok(Some(request)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 按状态查询审批请求(按申请时间排序)
    pub fn find_by_status(&self, status: ApprovalStatus) -> RepositoryResult<Vec<ApprovalRequest>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT approval_id, target_kind, target_id, status,
                   requested_by, requested_at, reviewed_by, reviewed_at,
                   review_comment, revision
            FROM approval_request
            WHERE status = ?1
            ORDER BY requested_at
            "#,
        )?;

        let rows = stmt.query_map(params![status.to_string()], Self::map_row)?;
        let mut requests = Vec::new();
        for row in rows {
            requests.push(row?);
        }
        Ok(requests)
    }

    /// 带乐观锁的裁决更新
    ///
    /// # 参数
    /// - expected_revision: 调用方读到的修订号
    ///
    /// # 返回
    /// - Ok(()): 更新成功 (revision 自增 1)
    /// - Err(OptimisticLockFailure): 修订号不匹配,说明已被并发修改
    pub fn update_decision(
        &self,
        approval_id: &str,
        expected_revision: i32,
        status: ApprovalStatus,
        reviewed_by: Option<&str>,
        reviewed_at: Option<DateTime<Utc>>,
        review_comment: Option<&str>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE approval_request
            SET status = ?3, reviewed_by = ?4, reviewed_at = ?5,
                review_comment = ?6, revision = revision + 1
            WHERE approval_id = ?1 AND revision = ?2
            "#,
            params![
                approval_id,
                expected_revision,
                status.to_string(),
                reviewed_by,
                reviewed_at.map(|dt| dt.to_rfc3339()),
                review_comment,
            ],
        )?;

        if affected == 0 {
            // 区分"不存在"与"修订号不匹配"
            let actual: Option<i32> = conn
                .query_row(
                    "SELECT revision FROM approval_request WHERE approval_id = ?1",
                    params![approval_id],
                    |row| row.get(0),
                )
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(other),
                })?;

            return match actual {
                Some(actual_revision) => Err(RepositoryError::OptimisticLockFailure {
                    approval_id: approval_id.to_string(),
                    expected: expected_revision,
                    actual: actual_revision,
                }),
                None => Err(RepositoryError::NotFound {
                    entity: "ApprovalRequest".to_string(),
                    id: approval_id.to_string(),
                }),
            };
        }

        Ok(())
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<ApprovalRequest> {
        let target_kind_str: String = row.get(1)?;
        let status_str: String = row.get(3)?;
        Ok(ApprovalRequest {
            approval_id: row.get(0)?,
            target_kind: match target_kind_str.as_str() {
                "PRODUCT" => ApprovalTargetKind::Product,
                "MATERIAL" => ApprovalTargetKind::Material,
                _ => ApprovalTargetKind::Order,
            },
            target_id: row.get(2)?,
            status: match status_str.as_str() {
                "PENDING" => ApprovalStatus::Pending,
                "APPROVED" => ApprovalStatus::Approved,
                "REJECTED" => ApprovalStatus::Rejected,
                _ => ApprovalStatus::Withdrawn,
            },
            requested_by: row.get(4)?,
            requested_at: parse_utc(&row.get::<_, String>(5)?),
            reviewed_by: row.get(6)?,
            reviewed_at: row
                .get::<_, Option<String>>(7)?
                .map(|s| parse_utc(&s)),
            review_comment: row.get(8)?,
            revision: row.get(9)?,
        })
    }
}
