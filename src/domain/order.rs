// ==========================================
// 供应链产品目录系统 - 订单领域模型
// ==========================================
// 依据: 数据字典 - trade_order/order_line 表
// 红线: PO/SO 镜像通过 mirror_order_id 双向关联,一单一镜像
// ==========================================

use crate::domain::types::{OrderKind, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// TradeOrder - 贸易订单 (采购单/销售单)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeOrder {
    // ===== 主键 =====
    pub order_id: String,               // 订单 ID

    // ===== 基础信息 =====
    pub order_no: String,               // 订单号 (如 PO-20260501-0001)
    pub kind: OrderKind,                // 订单类型 (PURCHASE/SALES)
    pub status: OrderStatus,            // 订单状态

    // ===== 双方 =====
    pub buyer_id: String,               // 买方合作方 ID
    pub seller_id: String,              // 卖方合作方 ID

    // ===== 镜像关联 =====
    pub mirror_order_id: Option<String>, // 镜像订单 ID (PO↔SO 双向)

    // ===== 审计字段 =====
    pub created_by: String,             // 创建人
    pub created_at: DateTime<Utc>,      // 创建时间
    pub updated_at: DateTime<Utc>,      // 更新时间
}

impl TradeOrder {
    /// 判断是否为采购订单
    pub fn is_purchase(&self) -> bool {
        self.kind == OrderKind::Purchase
    }

    /// 判断是否已进入终态
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// 判断是否存在镜像订单
    pub fn has_mirror(&self) -> bool {
        self.mirror_order_id.is_some()
    }
}

// ==========================================
// OrderLine - 订单行
// ==========================================
// 对齐: order_line 表 (复合主键: order_id + seq_no)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: String,     // 关联订单
    pub seq_no: i32,          // 行序号
    pub product_id: String,   // 产品 ID
    pub quantity: f64,        // 数量
    pub unit_price: f64,      // 单价
}

impl OrderLine {
    /// 行金额 (数量 × 单价)
    pub fn line_amount(&self) -> f64 {
        self.quantity * self.unit_price
    }
}
