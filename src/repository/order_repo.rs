// ==========================================
// 供应链产品目录系统 - 订单数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑;镜像创建的原子性由事务保证
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::order::{OrderLine, TradeOrder};
use crate::domain::types::{OrderKind, OrderStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_utc;
use rusqlite::{params, Connection, Row, Transaction};
use std::sync::{Arc, Mutex};

// ==========================================
// OrderRepository - 订单仓储
// ==========================================
pub struct OrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderRepository {
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

    /// 在同一事务内写入订单对 (原单 + 镜像单) 及各自订单行
    ///
    /// # 说明
    /// - 镜像关联字段由调用方(API 层)预先填好
    /// - 任一写入失败整体回滚,不会出现"有单无镜像"的中间态
    pub fn insert_order_pair(
        &self,
        order: &TradeOrder,
        order_lines: &[OrderLine],
        mirror: &TradeOrder,
        mirror_lines: &[OrderLine],
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        Self::insert_order_tx(&tx, order)?;
        Self::insert_order_tx(&tx, mirror)?;
        for line in order_lines {
            Self::insert_line_tx(&tx, line)?;
        }
        for line in mirror_lines {
            Self::insert_line_tx(&tx, line)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn insert_order_tx(tx: &Transaction<'_>, order: &TradeOrder) -> RepositoryResult<()> {
        tx.execute(
            r#"
            INSERT INTO trade_order (
                order_id, order_no, kind, status, buyer_id, seller_id,
                mirror_order_id, created_by, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                order.order_id,
                order.order_no,
                order.kind.to_string(),
                order.status.to_string(),
                order.buyer_id,
                order.seller_id,
                order.mirror_order_id,
                order.created_by,
                order.created_at.to_rfc3339(),
                order.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn insert_line_tx(tx: &Transaction<'_>, line: &OrderLine) -> RepositoryResult<()> {
        tx.execute(
            r#"
            INSERT INTO order_line (order_id, seq_no, product_id, quantity, unit_price)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                line.order_id,
                line.seq_no,
                line.product_id,
                line.quantity,
                line.unit_price,
            ],
        )?;
        Ok(())
    }

    /// 按 order_id 查询订单
    pub fn find_by_id(&self, order_id: &str) -> RepositoryResult<Option<TradeOrder>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT order_id, order_no, kind, status, buyer_id, seller_id,
                   mirror_order_id, created_by, created_at, updated_at
            FROM trade_order
            WHERE order_id = ?1
            "#,
        )?;

        let result = stmt.query_row(params![order_id], Self::map_order_row);
        match result {
            Ok(order) => Ok(Some(order)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询订单行(按 seq_no 排序)
    pub fn list_lines(&self, order_id: &str) -> RepositoryResult<Vec<OrderLine>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT order_id, seq_no, product_id, quantity, unit_price
            FROM order_line
            WHERE order_id = ?1
            ORDER BY seq_no
            "#,
        )?;

        let rows = stmt.query_map(params![order_id], Self::map_line_row)?;
        let mut lines = Vec::new();
        for row in rows {
            lines.push(row?);
        }
        Ok(lines)
    }

    /// 按合作方查询订单 (买方或卖方视角)
    pub fn find_by_partner(&self, partner_id: &str) -> RepositoryResult<Vec<TradeOrder>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT order_id, order_no, kind, status, buyer_id, seller_id,
                   mirror_order_id, created_by, created_at, updated_at
            FROM trade_order
            WHERE buyer_id = ?1 OR seller_id = ?1
            ORDER BY created_at DESC
            "#,
        )?;

        let rows = stmt.query_map(params![partner_id], Self::map_order_row)?;
        let mut orders = Vec::new();
        for row in rows {
            orders.push(row?);
        }
        Ok(orders)
    }

    /// 更新订单状态
    pub fn update_status(&self, order_id: &str, status: OrderStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE trade_order
            SET status = ?2, updated_at = ?3
            WHERE order_id = ?1
            "#,
            params![
                order_id,
                status.to_string(),
                chrono::Utc::now().to_rfc3339()
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "TradeOrder".to_string(),
                id: order_id.to_string(),
            });
        }
        Ok(())
    }

    /// 在同一事务内同步更新订单对的状态 (原单 + 镜像单)
    pub fn update_status_pair(
        &self,
        order_id: &str,
        mirror_order_id: &str,
        status: OrderStatus,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let now = chrono::Utc::now().to_rfc3339();
        for id in [order_id, mirror_order_id] {
            let affected = tx.execute(
                r#"
                UPDATE trade_order
                SET status = ?2, updated_at = ?3
                WHERE order_id = ?1
                "#,
                params![id, status.to_string(), now],
            )?;
            if affected == 0 {
                return Err(RepositoryError::NotFound {
                    entity: "TradeOrder".to_string(),
                    id: id.to_string(),
                });
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn map_order_row(row: &Row<'_>) -> rusqlite::Result<TradeOrder> {
        let kind_str: String = row.get(2)?;
        let status_str: String = row.get(3)?;
        Ok(TradeOrder {
            order_id: row.get(0)?,
            order_no: row.get(1)?,
            kind: if kind_str == "PURCHASE" {
                OrderKind::Purchase
            } else {
                OrderKind::Sales
            },
            status: match status_str.as_str() {
                "DRAFT" => OrderStatus::Draft,
                "SUBMITTED" => OrderStatus::Submitted,
                "CONFIRMED" => OrderStatus::Confirmed,
                "FULFILLED" => OrderStatus::Fulfilled,
                _ => OrderStatus::Cancelled,
            },
            buyer_id: row.get(4)?,
            seller_id: row.get(5)?,
            mirror_order_id: row.get(6)?,
            created_by: row.get(7)?,
            created_at: parse_utc(&row.get::<_, String>(8)?),
            updated_at: parse_utc(&row.get::<_, String>(9)?),
        })
    }

    fn map_line_row(row: &Row<'_>) -> rusqlite::Result<OrderLine> {
        Ok(OrderLine {
            order_id: row.get(0)?,
            seq_no: row.get(1)?,
            product_id: row.get(2)?,
            quantity: row.get(3)?,
            unit_price: row.get(4)?,
        })
    }
}
