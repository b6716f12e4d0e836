// ==========================================
// 供应链产品目录系统 - 领域类型定义
// ==========================================
// 依据: 数据字典 - 枚举口径
// 序列化格式: SCREAMING_SNAKE_CASE (与存储层一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 物质录入类型 (Input Type)
// ==========================================
// CHEMICAL: 纯化学物质(带 CAS 号)
// MANUAL: 人工申报物质,可携带子组成,子组成必须恰好切分 100%
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputType {
    Chemical, // 化学物质
    Manual,   // 人工申报
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputType::Chemical => write!(f, "CHEMICAL"),
            InputType::Manual => write!(f, "MANUAL"),
        }
    }
}

// ==========================================
// 合作方类型 (Partner Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartnerKind {
    Brand,        // 品牌方
    Manufacturer, // 制造商
    Supplier,     // 供应商
}

impl fmt::Display for PartnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartnerKind::Brand => write!(f, "BRAND"),
            PartnerKind::Manufacturer => write!(f, "MANUFACTURER"),
            PartnerKind::Supplier => write!(f, "SUPPLIER"),
        }
    }
}

// ==========================================
// 订单类型 (Order Kind)
// ==========================================
// 红线: PO/SO 镜像成对出现,一单一镜像
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    Purchase, // 采购订单 (PO)
    Sales,    // 销售订单 (SO)
}

impl OrderKind {
    /// 镜像方向: PO 的镜像是 SO,反之亦然
    pub fn mirror(&self) -> OrderKind {
        match self {
            OrderKind::Purchase => OrderKind::Sales,
            OrderKind::Sales => OrderKind::Purchase,
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Purchase => write!(f, "PURCHASE"),
            OrderKind::Sales => write!(f, "SALES"),
        }
    }
}

// ==========================================
// 订单状态 (Order Status)
// ==========================================
// 合法转换: DRAFT→SUBMITTED→CONFIRMED→FULFILLED
//           DRAFT/SUBMITTED/CONFIRMED→CANCELLED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Draft,     // 草稿
    Submitted, // 已提交
    Confirmed, // 已确认
    Fulfilled, // 已履约
    Cancelled, // 已取消
}

impl OrderStatus {
    /// 判断到目标状态的转换是否合法
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        matches!(
            (self, target),
            (OrderStatus::Draft, OrderStatus::Submitted)
                | (OrderStatus::Submitted, OrderStatus::Confirmed)
                | (OrderStatus::Confirmed, OrderStatus::Fulfilled)
                | (OrderStatus::Draft, OrderStatus::Cancelled)
                | (OrderStatus::Submitted, OrderStatus::Cancelled)
                | (OrderStatus::Confirmed, OrderStatus::Cancelled)
        )
    }

    /// 判断是否为终态 (不再允许任何转换)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Fulfilled | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Draft => write!(f, "DRAFT"),
            OrderStatus::Submitted => write!(f, "SUBMITTED"),
            OrderStatus::Confirmed => write!(f, "CONFIRMED"),
            OrderStatus::Fulfilled => write!(f, "FULFILLED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

// ==========================================
// 审批状态 (Approval Status)
// ==========================================
// 合法转换: PENDING→APPROVED/REJECTED (审批人)
//           PENDING→WITHDRAWN (申请人)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    Pending,   // 待审批
    Approved,  // 已通过
    Rejected,  // 已驳回
    Withdrawn, // 已撤回
}

impl ApprovalStatus {
    pub fn can_transition_to(&self, target: ApprovalStatus) -> bool {
        matches!(
            (self, target),
            (ApprovalStatus::Pending, ApprovalStatus::Approved)
                | (ApprovalStatus::Pending, ApprovalStatus::Rejected)
                | (ApprovalStatus::Pending, ApprovalStatus::Withdrawn)
        )
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::Pending => write!(f, "PENDING"),
            ApprovalStatus::Approved => write!(f, "APPROVED"),
            ApprovalStatus::Rejected => write!(f, "REJECTED"),
            ApprovalStatus::Withdrawn => write!(f, "WITHDRAWN"),
        }
    }
}

// ==========================================
// 审批对象类型 (Approval Target Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalTargetKind {
    Product,  // 产品
    Material, // 物料
    Order,    // 订单
}

impl fmt::Display for ApprovalTargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalTargetKind::Product => write!(f, "PRODUCT"),
            ApprovalTargetKind::Material => write!(f, "MATERIAL"),
            ApprovalTargetKind::Order => write!(f, "ORDER"),
        }
    }
}
