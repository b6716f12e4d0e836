// ==========================================
// 供应链产品目录系统 - 审批 API
// ==========================================
// 职责: 审批提交、裁决、撤回与查询
// 红线: 裁决使用乐观锁 (expected_revision),冲突即失败
// 红线: 仅 PENDING 状态允许流转
// ==========================================

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::CompositionInputValidator;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::approval::ApprovalRequest;
use crate::domain::types::{ApprovalStatus, ApprovalTargetKind};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::approval_repo::ApprovalRepository;

// ==========================================
// ApprovalApi - 审批 API
// ==========================================

/// 审批 API
///
/// 职责:
/// 1. 审批请求提交
/// 2. 裁决(通过/驳回)与撤回,带乐观锁
/// 3. 审批查询
/// 4. ActionLog 记录
pub struct ApprovalApi {
    approval_repo: Arc<ApprovalRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    input_validator: CompositionInputValidator,
}

impl ApprovalApi {
    /// 创建新的 ApprovalApi 实例
    pub fn new(
        approval_repo: Arc<ApprovalRepository>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            approval_repo,
            action_log_repo,
            input_validator: CompositionInputValidator::new(),
        }
    }

    // ==========================================
    // 提交接口
    // ==========================================

    /// 提交审批请求
    pub fn submit(
        &self,
        target_kind: ApprovalTargetKind,
        target_id: &str,
        requested_by: &str,
    ) -> ApiResult<ApprovalRequest> {
        self.input_validator.validate_id("target_id", target_id)?;
        self.input_validator
            .validate_id("requested_by", requested_by)?;

        let request = ApprovalRequest {
            approval_id: Uuid::new_v4().to_string(),
            target_kind,
            target_id: target_id.to_string(),
            status: ApprovalStatus::Pending,
            requested_by: requested_by.to_string(),
            requested_at: chrono::Utc::now(),
            reviewed_by: None,
            reviewed_at: None,
            review_comment: None,
            revision: 0,
        };
        self.approval_repo.insert(&request)?;

        info!(
            approval_id = %request.approval_id,
            target_kind = %target_kind,
            target_id = %target_id,
            "审批请求已提交"
        );
        self.log_action(
            ActionType::SubmitApproval,
            requested_by,
            &request.approval_id,
            Some(format!("提交审批: {} {}", target_kind, target_id)),
        )?;

        Ok(request)
    }

    // ==========================================
    // 裁决接口
    // ==========================================

    /// 通过审批
    pub fn approve(
        &self,
        approval_id: &str,
        expected_revision: i32,
        reviewer: &str,
        comment: Option<&str>,
    ) -> ApiResult<ApprovalRequest> {
        self.decide(
            approval_id,
            expected_revision,
            ApprovalStatus::Approved,
            reviewer,
            comment,
        )
    }

    /// 驳回审批
    pub fn reject(
        &self,
        approval_id: &str,
        expected_revision: i32,
        reviewer: &str,
        comment: Option<&str>,
    ) -> ApiResult<ApprovalRequest> {
        self.decide(
            approval_id,
            expected_revision,
            ApprovalStatus::Rejected,
            reviewer,
            comment,
        )
    }

    /// 申请人撤回
    pub fn withdraw(
        &self,
        approval_id: &str,
        expected_revision: i32,
        actor: &str,
    ) -> ApiResult<ApprovalRequest> {
        let request = self.get_approval(approval_id)?;
        if request.requested_by != actor {
            return Err(ApiError::BusinessRuleViolation(
                "仅申请人可撤回审批请求".to_string(),
            ));
        }
        self.decide(
            approval_id,
            expected_revision,
            ApprovalStatus::Withdrawn,
            actor,
            None,
        )
    }

    // 统一裁决路径: 状态转换校验 → 乐观锁更新 → 日志
    fn decide(
        &self,
        approval_id: &str,
        expected_revision: i32,
        target: ApprovalStatus,
        actor: &str,
        comment: Option<&str>,
    ) -> ApiResult<ApprovalRequest> {
        let request = self.get_approval(approval_id)?;

        if !request.status.can_transition_to(target) {
            return Err(ApiError::InvalidStateTransition {
                from: request.status.to_string(),
                to: target.to_string(),
            });
        }

        self.approval_repo.update_decision(
            approval_id,
            expected_revision,
            target,
            Some(actor),
            Some(chrono::Utc::now()),
            comment,
        )?;

        let action_type = match target {
            ApprovalStatus::Withdrawn => ActionType::WithdrawApproval,
            _ => ActionType::ReviewApproval,
        };
        self.log_action(
            action_type,
            actor,
            approval_id,
            Some(format!("审批流转 {} → {}", request.status, target)),
        )?;

        self.get_approval(approval_id)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 按 ID 查询审批请求
    pub fn get_approval(&self, approval_id: &str) -> ApiResult<ApprovalRequest> {
        self.input_validator.validate_id("approval_id", approval_id)?;
        self.approval_repo.find_by_id(approval_id)?.ok_or_else(|| {
            ApiError::NotFound(crate::i18n::t_with_args(
                "approval.not_found",
                &[("id", approval_id)],
            ))
        })
    }

    /// 查询待审批列表
    pub fn list_pending(&self) -> ApiResult<Vec<ApprovalRequest>> {
        Ok(self.approval_repo.find_by_status(ApprovalStatus::Pending)?)
    }

    // ==========================================
    // 操作日志
    // ==========================================

    fn log_action(
        &self,
        action_type: ActionType,
        actor: &str,
        approval_id: &str,
        detail: Option<String>,
    ) -> ApiResult<()> {
        let log = ActionLog {
            action_id: Uuid::new_v4().to_string(),
            action_type: action_type.as_str().to_string(),
            action_ts: chrono::Utc::now().naive_utc(),
            actor: actor.to_string(),
            target_kind: Some("APPROVAL".to_string()),
            target_id: Some(approval_id.to_string()),
            payload_json: None,
            detail,
        };
        self.action_log_repo.insert(&log)?;
        Ok(())
    }
}
