// ==========================================
// 供应链产品目录系统 - 操作日志领域模型
// ==========================================
// 依据: 审计要求 - 所有写入必须记录
// 对齐: action_log 表
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// ActionLog - 操作日志
// ==========================================
// 红线: 所有写入必须记录
// 用途: 审计追踪,变更溯源
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    // ===== 主键 =====
    pub action_id: String,             // 日志 ID
    pub action_type: String,           // 操作类型(存储为字符串)
    pub action_ts: NaiveDateTime,      // 操作时间戳
    pub actor: String,                 // 操作人

    // ===== 操作对象 =====
    pub target_kind: Option<String>,   // 对象类型 (PRODUCT/MATERIAL/ORDER/...)
    pub target_id: Option<String>,     // 对象 ID

    // ===== 操作负载 =====
    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,        // 详细描述
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    CreateMaterial,   // 创建物料
    UpdateMaterial,   // 更新物料
    DeleteMaterial,   // 删除物料
    ImportMaterials,  // 批量导入物料
    CreateProduct,    // 创建产品
    UpdateProduct,    // 更新产品
    DeleteProduct,    // 删除产品
    AddBomLine,       // 添加 BOM 行
    RemoveBomLine,    // 移除 BOM 行
    CreateOrder,      // 创建订单(含镜像)
    OrderTransition,  // 订单状态流转
    SubmitApproval,   // 提交审批
    ReviewApproval,   // 裁决审批
    WithdrawApproval, // 撤回审批
}

impl ActionType {
    /// 存储口径的字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::CreateMaterial => "CREATE_MATERIAL",
            ActionType::UpdateMaterial => "UPDATE_MATERIAL",
            ActionType::DeleteMaterial => "DELETE_MATERIAL",
            ActionType::ImportMaterials => "IMPORT_MATERIALS",
            ActionType::CreateProduct => "CREATE_PRODUCT",
            ActionType::UpdateProduct => "UPDATE_PRODUCT",
            ActionType::DeleteProduct => "DELETE_PRODUCT",
            ActionType::AddBomLine => "ADD_BOM_LINE",
            ActionType::RemoveBomLine => "REMOVE_BOM_LINE",
            ActionType::CreateOrder => "CREATE_ORDER",
            ActionType::OrderTransition => "ORDER_TRANSITION",
            ActionType::SubmitApproval => "SUBMIT_APPROVAL",
            ActionType::ReviewApproval => "REVIEW_APPROVAL",
            ActionType::WithdrawApproval => "WITHDRAW_APPROVAL",
        }
    }
}
