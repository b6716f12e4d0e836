// ==========================================
// 供应链产品目录系统 - 订单 API
// ==========================================
// 职责: PO/SO 镜像创建、状态流转、订单查询
// 红线: 创建采购订单必须同事务生成镜像销售订单,双向关联
// 红线: 状态流转必须合法,且同步传播到镜像单
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::CompositionInputValidator;
use crate::config::catalog_config_trait::CatalogConfigReader;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::order::{OrderLine, TradeOrder};
use crate::domain::types::{OrderKind, OrderStatus};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::order_repo::OrderRepository;
use crate::repository::partner_repo::PartnerRepository;

// ==========================================
// NewOrderLine - 订单行请求
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderLine {
    pub product_id: String,
    pub quantity: f64,
    pub unit_price: f64,
}

// ==========================================
// OrderApi - 订单 API
// ==========================================

/// 订单 API
///
/// 职责:
/// 1. 采购订单创建 + 销售镜像单生成
/// 2. 状态流转(合法性校验 + 镜像传播)
/// 3. 订单查询
/// 4. ActionLog 记录
pub struct OrderApi {
    order_repo: Arc<OrderRepository>,
    partner_repo: Arc<PartnerRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    input_validator: CompositionInputValidator,
}

impl OrderApi {
    /// 创建新的 OrderApi 实例
    pub fn new(
        order_repo: Arc<OrderRepository>,
        partner_repo: Arc<PartnerRepository>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            order_repo,
            partner_repo,
            action_log_repo,
            input_validator: CompositionInputValidator::new(),
        }
    }

    // ==========================================
    // 创建接口
    // ==========================================

    /// 创建采购订单(同事务生成镜像销售订单)
    ///
    /// # 参数
    /// - buyer_id: 买方合作方(品牌方/制造商)
    /// - seller_id: 卖方合作方(制造商/供应商)
    /// - lines: 订单行
    /// - config: 配置读取器(订单号前缀)
    ///
    /// # 返回
    /// - Ok(TradeOrder): 买方视角的采购订单(mirror_order_id 指向镜像)
    pub async fn create_purchase_order<C>(
        &self,
        buyer_id: &str,
        seller_id: &str,
        lines: &[NewOrderLine],
        created_by: &str,
        config: &C,
    ) -> ApiResult<TradeOrder>
    where
        C: CatalogConfigReader + ?Sized,
    {
        self.input_validator.validate_id("buyer_id", buyer_id)?;
        self.input_validator.validate_id("seller_id", seller_id)?;
        if buyer_id == seller_id {
            return Err(ApiError::BusinessRuleViolation(
                "买方与卖方不能为同一合作方".to_string(),
            ));
        }
        if lines.is_empty() {
            return Err(ApiError::InvalidInput("订单行不能为空".to_string()));
        }
        for (i, line) in lines.iter().enumerate() {
            self.input_validator
                .validate_id(&format!("lines[{}].product_id", i), &line.product_id)?;
            self.input_validator
                .validate_positive(&format!("lines[{}].quantity", i), line.quantity)?;
            self.input_validator
                .validate_positive(&format!("lines[{}].unit_price", i), line.unit_price)?;
        }

        // 买卖双方必须存在且角色匹配
        let buyer = self
            .partner_repo
            .find_by_id(buyer_id)?
            .ok_or_else(|| ApiError::NotFound(format!("合作方(id={})不存在", buyer_id)))?;
        let seller = self
            .partner_repo
            .find_by_id(seller_id)?
            .ok_or_else(|| ApiError::NotFound(format!("合作方(id={})不存在", seller_id)))?;
        if !buyer.can_buy() {
            return Err(ApiError::BusinessRuleViolation(format!(
                "合作方 {} (类型 {}) 不能作为买方",
                buyer.partner_name, buyer.kind
            )));
        }
        if !seller.can_sell() {
            return Err(ApiError::BusinessRuleViolation(format!(
                "合作方 {} (类型 {}) 不能作为卖方",
                seller.partner_name, seller.kind
            )));
        }

        // 订单号: 前缀-公共词干,镜像单共享词干
        let po_prefix = config
            .get_purchase_order_prefix()
            .await
            .map_err(|e| ApiError::InternalError(format!("配置读取失败: {}", e)))?;
        let so_prefix = config
            .get_sales_order_prefix()
            .await
            .map_err(|e| ApiError::InternalError(format!("配置读取失败: {}", e)))?;
        let stem = Uuid::new_v4().simple().to_string();

        let now = chrono::Utc::now();
        let order_id = Uuid::new_v4().to_string();
        let mirror_id = Uuid::new_v4().to_string();

        let order = TradeOrder {
            order_id: order_id.clone(),
            order_no: format!("{}-{}", po_prefix, stem),
            kind: OrderKind::Purchase,
            status: OrderStatus::Draft,
            buyer_id: buyer_id.to_string(),
            seller_id: seller_id.to_string(),
            mirror_order_id: Some(mirror_id.clone()),
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        };
        // 镜像单: 卖方视角的销售订单,行内容一致
        let mirror = TradeOrder {
            order_id: mirror_id.clone(),
            order_no: format!("{}-{}", so_prefix, stem),
            kind: OrderKind::Purchase.mirror(),
            status: OrderStatus::Draft,
            buyer_id: buyer_id.to_string(),
            seller_id: seller_id.to_string(),
            mirror_order_id: Some(order_id.clone()),
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        };

        let build_lines = |target_id: &str| -> Vec<OrderLine> {
            lines
                .iter()
                .enumerate()
                .map(|(i, line)| OrderLine {
                    order_id: target_id.to_string(),
                    seq_no: (i + 1) as i32,
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                })
                .collect()
        };

        self.order_repo.insert_order_pair(
            &order,
            &build_lines(&order_id),
            &mirror,
            &build_lines(&mirror_id),
        )?;

        info!(
            order_id = %order.order_id,
            order_no = %order.order_no,
            mirror_order_id = %mirror_id,
            "采购订单与镜像销售订单已创建"
        );
        self.log_action(
            ActionType::CreateOrder,
            created_by,
            &order.order_id,
            Some(format!("创建采购订单 {} (镜像 {})", order.order_no, mirror.order_no)),
        )?;

        Ok(order)
    }

    // ==========================================
    // 状态流转
    // ==========================================

    /// 订单状态流转(同步传播到镜像单)
    ///
    /// # 校验
    /// - 转换必须在合法转换表内,否则 InvalidStateTransition
    pub fn transition_order(
        &self,
        order_id: &str,
        target: OrderStatus,
        actor: &str,
    ) -> ApiResult<TradeOrder> {
        let order = self.get_order(order_id)?;

        if !order.status.can_transition_to(target) {
            return Err(ApiError::InvalidStateTransition {
                from: order.status.to_string(),
                to: target.to_string(),
            });
        }

        match &order.mirror_order_id {
            Some(mirror_id) => {
                self.order_repo
                    .update_status_pair(order_id, mirror_id, target)?;
            }
            None => {
                // 镜像缺失属于数据异常,仅更新本单并警告
                warn!(order_id = %order_id, "订单缺失镜像关联,仅更新本单状态");
                self.order_repo.update_status(order_id, target)?;
            }
        }

        self.log_action(
            ActionType::OrderTransition,
            actor,
            order_id,
            Some(format!("状态流转 {} → {}", order.status, target)),
        )?;

        self.get_order(order_id)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 按 ID 查询订单
    pub fn get_order(&self, order_id: &str) -> ApiResult<TradeOrder> {
        self.input_validator.validate_id("order_id", order_id)?;
        self.order_repo.find_by_id(order_id)?.ok_or_else(|| {
            ApiError::NotFound(crate::i18n::t_with_args(
                "order.not_found",
                &[("id", order_id)],
            ))
        })
    }

    /// 查询订单行
    pub fn list_order_lines(&self, order_id: &str) -> ApiResult<Vec<OrderLine>> {
        self.get_order(order_id)?;
        Ok(self.order_repo.list_lines(order_id)?)
    }

    /// 按合作方查询订单(买方或卖方视角)
    pub fn list_orders_by_partner(&self, partner_id: &str) -> ApiResult<Vec<TradeOrder>> {
        self.input_validator.validate_id("partner_id", partner_id)?;
        Ok(self.order_repo.find_by_partner(partner_id)?)
    }

    // ==========================================
    // 操作日志
    // ==========================================

    fn log_action(
        &self,
        action_type: ActionType,
        actor: &str,
        order_id: &str,
        detail: Option<String>,
    ) -> ApiResult<()> {
        let log = ActionLog {
            action_id: Uuid::new_v4().to_string(),
            action_type: action_type.as_str().to_string(),
            action_ts: chrono::Utc::now().naive_utc(),
            actor: actor.to_string(),
            target_kind: Some("ORDER".to_string()),
            target_id: Some(order_id.to_string()),
            payload_json: None,
            detail,
        };
        self.action_log_repo.insert(&log)?;
        Ok(())
    }
}
