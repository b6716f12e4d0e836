// ==========================================
// 供应链产品目录系统 - 产品/BOM API
// ==========================================
// 职责: 产品 CRUD、BOM 行维护、物质清单聚合
// 红线: BOM 行占比合计不得超过 100%(硬门禁,聚合口径依赖此预算)
// 红线: 聚合为只读派生,缺失物料按零贡献跳过
// ==========================================

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::CompositionInputValidator;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::product::{BomLine, Product};
use crate::domain::substance::AggregatedSubstance;
use crate::engine::aggregation::BillOfSubstancesAggregator;
use crate::engine::composition::{CompositionValidator, FULL_PERCENT};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::material_repo::MaterialRepository;
use crate::repository::product_repo::ProductRepository;

// ==========================================
// ProductApi - 产品 API
// ==========================================

/// 产品 API
///
/// 职责:
/// 1. 产品查询与维护
/// 2. BOM 行维护(占比预算硬门禁)
/// 3. 产品物质清单聚合 (Bill of Substances)
/// 4. ActionLog 记录
pub struct ProductApi {
    product_repo: Arc<ProductRepository>,
    material_repo: Arc<MaterialRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    input_validator: CompositionInputValidator,
    composition: CompositionValidator,
    aggregator: BillOfSubstancesAggregator,
}

impl ProductApi {
    /// 创建新的 ProductApi 实例
    pub fn new(
        product_repo: Arc<ProductRepository>,
        material_repo: Arc<MaterialRepository>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            product_repo,
            material_repo,
            action_log_repo,
            input_validator: CompositionInputValidator::new(),
            composition: CompositionValidator::new(),
            aggregator: BillOfSubstancesAggregator::new(),
        }
    }

    // ==========================================
    // 产品主数据
    // ==========================================

    /// 创建产品
    pub fn create_product(
        &self,
        product_name: &str,
        brand_id: Option<String>,
        actor: &str,
    ) -> ApiResult<Product> {
        if product_name.trim().is_empty() {
            return Err(ApiError::InvalidInput("产品名称不能为空".to_string()));
        }

        let now = chrono::Utc::now();
        let product = Product {
            product_id: Uuid::new_v4().to_string(),
            product_name: product_name.to_string(),
            brand_id,
            created_at: now,
            updated_at: now,
        };
        self.product_repo.upsert(&product)?;

        info!(product_id = %product.product_id, actor = %actor, "产品已创建");
        self.log_action(
            ActionType::CreateProduct,
            actor,
            &product.product_id,
            Some(format!("创建产品 {}", product.product_name)),
        )?;

        Ok(product)
    }

    /// 按 ID 查询产品
    pub fn get_product(&self, product_id: &str) -> ApiResult<Product> {
        self.input_validator.validate_id("product_id", product_id)?;
        self.product_repo.find_by_id(product_id)?.ok_or_else(|| {
            ApiError::NotFound(crate::i18n::t_with_args(
                "product.not_found",
                &[("id", product_id)],
            ))
        })
    }

    /// 查询全部产品
    pub fn list_products(&self) -> ApiResult<Vec<Product>> {
        Ok(self.product_repo.list_all()?)
    }

    /// 删除产品(BOM 行级联删除)
    pub fn delete_product(&self, product_id: &str, actor: &str) -> ApiResult<()> {
        self.input_validator.validate_id("product_id", product_id)?;
        let deleted = self.product_repo.delete(product_id)?;
        if !deleted {
            return Err(ApiError::NotFound(crate::i18n::t_with_args(
                "product.not_found",
                &[("id", product_id)],
            )));
        }

        self.log_action(ActionType::DeleteProduct, actor, product_id, None)?;
        Ok(())
    }

    // ==========================================
    // BOM 行维护
    // ==========================================

    /// 添加 BOM 行
    ///
    /// # 校验
    /// - 输入校验: 数量/占比
    /// - 预算硬门禁: 现有行占比合计 + 候选占比 ≤ 100 + epsilon
    /// - 物料仅按 ID 引用,不校验其存在性(聚合时缺失按零贡献)
    pub fn add_bom_line(
        &self,
        product_id: &str,
        material_id: &str,
        quantity: f64,
        percentage: f64,
        unit_cost: Option<f64>,
        actor: &str,
    ) -> ApiResult<BomLine> {
        // 产品必须存在
        self.get_product(product_id)?;
        self.input_validator.validate_id("material_id", material_id)?;
        self.input_validator.validate_positive("quantity", quantity)?;
        self.input_validator
            .validate_percentage("percentage", percentage)?;

        let existing = self.product_repo.list_bom_lines(product_id)?;
        let current_total: f64 = existing.iter().map(|l| l.percentage).sum();
        if !self.composition.can_allocate_default(current_total, percentage) {
            debug!(
                product_id = %product_id,
                current_total = current_total,
                candidate = percentage,
                "BOM 行占比超出产品组成预算,拒绝添加"
            );
            return Err(ApiError::CompositionBudgetExceeded {
                current_total,
                candidate: percentage,
                cap: FULL_PERCENT,
            });
        }

        let line = BomLine {
            product_id: product_id.to_string(),
            seq_no: self.product_repo.next_bom_seq_no(product_id)?,
            material_id: material_id.to_string(),
            quantity,
            percentage,
            unit_cost,
        };
        self.product_repo.insert_bom_line(&line)?;

        self.log_action(
            ActionType::AddBomLine,
            actor,
            product_id,
            Some(format!("添加 BOM 行: 物料 {}", material_id)),
        )?;

        Ok(line)
    }

    /// 移除 BOM 行
    pub fn remove_bom_line(&self, product_id: &str, seq_no: i32, actor: &str) -> ApiResult<()> {
        let removed = self.product_repo.delete_bom_line(product_id, seq_no)?;
        if !removed {
            return Err(ApiError::NotFound(format!(
                "BOM 行(product_id={}, seq_no={})不存在",
                product_id, seq_no
            )));
        }

        self.log_action(
            ActionType::RemoveBomLine,
            actor,
            product_id,
            Some(format!("移除 BOM 行 seq_no={}", seq_no)),
        )?;
        Ok(())
    }

    /// 查询产品 BOM 行(按 seq_no 排序)
    pub fn list_bom_lines(&self, product_id: &str) -> ApiResult<Vec<BomLine>> {
        self.get_product(product_id)?;
        Ok(self.product_repo.list_bom_lines(product_id)?)
    }

    /// BOM 占比剩余预算(用于界面提示)
    pub fn remaining_bom_budget(&self, product_id: &str) -> ApiResult<f64> {
        let lines = self.list_bom_lines(product_id)?;
        let current_total: f64 = lines.iter().map(|l| l.percentage).sum();
        Ok(self.composition.remaining_budget(current_total, FULL_PERCENT))
    }

    // ==========================================
    // 物质清单聚合
    // ==========================================

    /// 产品物质清单 (Bill of Substances)
    ///
    /// # 说明
    /// - 只读派生,不回写任何实体
    /// - 缺失物料/无组成物料按零贡献跳过
    /// - 输出按加权占比降序
    pub fn bill_of_substances(&self, product_id: &str) -> ApiResult<Vec<AggregatedSubstance>> {
        let lines = self.list_bom_lines(product_id)?;
        let repo = Arc::clone(&self.material_repo);
        let result = self
            .aggregator
            .aggregate(&lines, move |id| repo.find_by_id(id).ok().flatten());
        Ok(result)
    }

    // ==========================================
    // 操作日志
    // ==========================================

    fn log_action(
        &self,
        action_type: ActionType,
        actor: &str,
        product_id: &str,
        detail: Option<String>,
    ) -> ApiResult<()> {
        let log = ActionLog {
            action_id: Uuid::new_v4().to_string(),
            action_type: action_type.as_str().to_string(),
            action_ts: chrono::Utc::now().naive_utc(),
            actor: actor.to_string(),
            target_kind: Some("PRODUCT".to_string()),
            target_id: Some(product_id.to_string()),
            payload_json: None,
            detail,
        };
        self.action_log_repo.insert(&log)?;
        Ok(())
    }
}
