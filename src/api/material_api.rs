// ==========================================
// 供应链产品目录系统 - 物料 API
// ==========================================
// 职责: 物料 CRUD、物质组成门禁、折算重量派生、操作日志
// 红线: 带子组成的 MANUAL 物质必须恰好切分 100%,否则阻断提交
// 红线: 顶层占比合计超过 100% 仅警告,不阻断保存
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::CompositionInputValidator;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::material::Material;
use crate::domain::substance::Substance;
use crate::domain::types::InputType;
use crate::engine::composition::{CompositionValidator, FULL_PERCENT};
use crate::engine::derivation::DerivationService;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::material_repo::MaterialRepository;

// ==========================================
// MaterialDraft - 物料写入请求
// ==========================================
/// 创建/更新物料的请求结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialDraft {
    pub material_name: String,
    pub weight_kg: f64,
    pub supplier_id: Option<String>,
    pub substances: Vec<Substance>,
}

// ==========================================
// MaterialApi - 物料 API
// ==========================================

/// 物料 API
///
/// 职责:
/// 1. 物料查询与维护
/// 2. 物质组成校验(输入校验 + 预算门禁 + 子组成切分门禁)
/// 3. 折算重量派生
/// 4. ActionLog 记录
pub struct MaterialApi {
    material_repo: Arc<MaterialRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    input_validator: CompositionInputValidator,
    composition: CompositionValidator,
    derivation: DerivationService,
}

impl MaterialApi {
    /// 创建新的 MaterialApi 实例
    pub fn new(
        material_repo: Arc<MaterialRepository>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            material_repo,
            action_log_repo,
            input_validator: CompositionInputValidator::new(),
            composition: CompositionValidator::new(),
            derivation: DerivationService::new(),
        }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 按 ID 查询物料
    pub fn get_material(&self, material_id: &str) -> ApiResult<Material> {
        self.input_validator.validate_id("material_id", material_id)?;
        self.material_repo.find_by_id(material_id)?.ok_or_else(|| {
            ApiError::NotFound(crate::i18n::t_with_args(
                "material.not_found",
                &[("id", material_id)],
            ))
        })
    }

    /// 查询全部物料
    pub fn list_materials(&self) -> ApiResult<Vec<Material>> {
        Ok(self.material_repo.list_all()?)
    }

    /// 顶层组成剩余预算(用于界面提示)
    pub fn remaining_budget(&self, material_id: &str) -> ApiResult<f64> {
        let material = self.get_material(material_id)?;
        let total = self.derivation.top_level_percentage_total(&material);
        Ok(self.composition.remaining_budget(total, FULL_PERCENT))
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 创建物料
    ///
    /// # 校验
    /// - 输入校验: 名称/重量/各级占比
    /// - 硬门禁: MANUAL 物质子组成恰好切分 100%
    /// - 软检查: 顶层占比合计超过 100% 记警告
    pub fn create_material(&self, draft: MaterialDraft, actor: &str) -> ApiResult<Material> {
        self.validate_draft(&draft)?;

        let now = chrono::Utc::now();
        let mut material = Material {
            material_id: Uuid::new_v4().to_string(),
            material_name: draft.material_name,
            weight_kg: draft.weight_kg,
            supplier_id: draft.supplier_id,
            substances: draft.substances,
            created_at: now,
            updated_at: now,
        };

        self.derivation.derive_material(&mut material);
        self.derivation.check_over_allocation(&material);
        self.material_repo.upsert(&material)?;

        info!(material_id = %material.material_id, actor = %actor, "物料已创建");
        self.log_action(
            ActionType::CreateMaterial,
            actor,
            &material.material_id,
            Some(format!("创建物料 {}", material.material_name)),
        )?;

        Ok(material)
    }

    /// 更新物料(整体覆盖语义)
    pub fn update_material(
        &self,
        material_id: &str,
        draft: MaterialDraft,
        actor: &str,
    ) -> ApiResult<Material> {
        let existing = self.get_material(material_id)?;
        self.validate_draft(&draft)?;

        let mut material = Material {
            material_id: existing.material_id,
            material_name: draft.material_name,
            weight_kg: draft.weight_kg,
            supplier_id: draft.supplier_id,
            substances: draft.substances,
            created_at: existing.created_at,
            updated_at: chrono::Utc::now(),
        };

        self.derivation.derive_material(&mut material);
        self.derivation.check_over_allocation(&material);
        self.material_repo.upsert(&material)?;

        self.log_action(
            ActionType::UpdateMaterial,
            actor,
            material_id,
            Some(format!("更新物料 {}", material.material_name)),
        )?;

        Ok(material)
    }

    /// 向物料追加一条顶层物质
    ///
    /// # 校验
    /// - 预算硬门禁: 已分配合计 + 候选占比 ≤ 100 + epsilon,否则拒绝
    /// - MANUAL 子组成切分门禁
    pub fn add_substance(
        &self,
        material_id: &str,
        substance: Substance,
        actor: &str,
    ) -> ApiResult<Material> {
        let mut material = self.get_material(material_id)?;
        self.validate_substance_tree(&substance)?;

        let current_total = self.derivation.top_level_percentage_total(&material);
        if !self
            .composition
            .can_allocate_default(current_total, substance.percentage)
        {
            debug!(
                material_id = %material_id,
                current_total = current_total,
                candidate = substance.percentage,
                "物质占比超出组成预算,拒绝追加"
            );
            return Err(ApiError::CompositionBudgetExceeded {
                current_total,
                candidate: substance.percentage,
                cap: FULL_PERCENT,
            });
        }

        material.substances.push(substance);
        material.updated_at = chrono::Utc::now();
        self.derivation.derive_material(&mut material);
        self.material_repo.upsert(&material)?;

        self.log_action(
            ActionType::UpdateMaterial,
            actor,
            material_id,
            Some("追加物质".to_string()),
        )?;

        Ok(material)
    }

    /// 删除物料
    pub fn delete_material(&self, material_id: &str, actor: &str) -> ApiResult<()> {
        self.input_validator.validate_id("material_id", material_id)?;
        let deleted = self.material_repo.delete(material_id)?;
        if !deleted {
            return Err(ApiError::NotFound(crate::i18n::t_with_args(
                "material.not_found",
                &[("id", material_id)],
            )));
        }

        self.log_action(ActionType::DeleteMaterial, actor, material_id, None)?;
        Ok(())
    }

    // ==========================================
    // 校验
    // ==========================================

    fn validate_draft(&self, draft: &MaterialDraft) -> ApiResult<()> {
        if draft.material_name.trim().is_empty() {
            return Err(ApiError::InvalidInput("物料名称不能为空".to_string()));
        }
        self.input_validator
            .validate_positive("weight_kg", draft.weight_kg)?;

        for substance in &draft.substances {
            self.validate_substance_tree(substance)?;
        }
        Ok(())
    }

    // 递归校验物质树: 占比范围、子组成归属、MANUAL 切分门禁
    fn validate_substance_tree(&self, substance: &Substance) -> ApiResult<()> {
        if substance.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("物质名称不能为空".to_string()));
        }
        self.input_validator
            .validate_percentage("percentage", substance.percentage)?;

        if !substance.children.is_empty() {
            // 子组成仅允许出现在 MANUAL 物质下
            if substance.input_type != InputType::Manual {
                return Err(ApiError::InvalidInput(format!(
                    "物质 {} 为 CHEMICAL,不允许携带子组成",
                    substance.name
                )));
            }

            // 硬门禁: 子组成必须恰好切分 100%
            if !self.composition.manual_children_complete(&substance.children) {
                let total: f64 = substance.children.iter().map(|c| c.percentage).sum();
                return Err(ApiError::ManualChildrenIncomplete {
                    substance: substance.name.clone(),
                    total,
                });
            }

            for child in &substance.children {
                self.validate_substance_tree(child)?;
            }
        }

        Ok(())
    }

    // ==========================================
    // 操作日志
    // ==========================================

    fn log_action(
        &self,
        action_type: ActionType,
        actor: &str,
        material_id: &str,
        detail: Option<String>,
    ) -> ApiResult<()> {
        let log = ActionLog {
            action_id: Uuid::new_v4().to_string(),
            action_type: action_type.as_str().to_string(),
            action_ts: chrono::Utc::now().naive_utc(),
            actor: actor.to_string(),
            target_kind: Some("MATERIAL".to_string()),
            target_id: Some(material_id.to_string()),
            payload_json: None,
            detail,
        };
        self.action_log_repo.insert(&log)?;
        Ok(())
    }
}
