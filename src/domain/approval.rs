// ==========================================
// 供应链产品目录系统 - 审批领域模型
// ==========================================
// 依据: 数据字典 - approval_request 表
// 红线: 审批裁决使用乐观锁 (revision),冲突即失败,不静默覆盖
// ==========================================

use crate::domain::types::{ApprovalStatus, ApprovalTargetKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ApprovalRequest - 审批请求
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRequest {
    // ===== 主键 =====
    pub approval_id: String,              // 审批 ID

    // ===== 审批对象 =====
    pub target_kind: ApprovalTargetKind,  // 对象类型 (PRODUCT/MATERIAL/ORDER)
    pub target_id: String,                // 对象 ID

    // ===== 流转状态 =====
    pub status: ApprovalStatus,           // 状态 (PENDING/APPROVED/REJECTED/WITHDRAWN)

    // ===== 申请方 =====
    pub requested_by: String,             // 申请人
    pub requested_at: DateTime<Utc>,      // 申请时间

    // ===== 裁决方 =====
    pub reviewed_by: Option<String>,      // 审批人
    pub reviewed_at: Option<DateTime<Utc>>, // 裁决时间
    pub review_comment: Option<String>,   // 裁决意见

    // ===== 并发控制 =====
    pub revision: i32,                    // 乐观锁修订号
}

impl ApprovalRequest {
    /// 判断是否待审批
    pub fn is_pending(&self) -> bool {
        self.status == ApprovalStatus::Pending
    }

    /// 判断是否已通过
    pub fn is_approved(&self) -> bool {
        self.status == ApprovalStatus::Approved
    }

    /// 判断是否已裁决 (通过或驳回)
    pub fn is_decided(&self) -> bool {
        matches!(
            self.status,
            ApprovalStatus::Approved | ApprovalStatus::Rejected
        )
    }
}
