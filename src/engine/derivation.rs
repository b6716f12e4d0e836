// ==========================================
// 供应链产品目录系统 - 折算重量派生服务
// ==========================================
// 职责: projected_weight_kg 派生 + 顶层组成超限软检查
// 口径: 折算重量 = 父级重量 × percentage / 100,逐层递归
// 红线: 超限仅记警告,不阻断保存与聚合
// ==========================================

use crate::domain::material::Material;
use crate::domain::substance::Substance;
use crate::engine::composition::{FULL_PERCENT, PERCENT_EPSILON};
use tracing::warn;

pub struct DerivationService;

impl DerivationService {
    pub fn new() -> Self {
        Self
    }

    /// 派生单条物质的折算重量
    ///
    /// # 规则
    /// - projected_weight_kg = parent_weight_kg × percentage / 100
    pub fn derive_projected_weight(&self, parent_weight_kg: f64, percentage: f64) -> f64 {
        parent_weight_kg * percentage / 100.0
    }

    /// 重算整个物料的物质树折算重量
    ///
    /// # 规则
    /// - 顶层物质以物料重量为父级重量
    /// - 子组成以父物质的折算重量为父级重量,逐层递归
    pub fn derive_material(&self, material: &mut Material) {
        let parent_weight = material.weight_kg;
        for substance in &mut material.substances {
            self.derive_substance_tree(substance, parent_weight);
        }
    }

    fn derive_substance_tree(&self, substance: &mut Substance, parent_weight_kg: f64) {
        substance.projected_weight_kg =
            self.derive_projected_weight(parent_weight_kg, substance.percentage);
        for child in &mut substance.children {
            self.derive_substance_tree(child, substance.projected_weight_kg);
        }
    }

    /// 物料顶层物质占比合计
    pub fn top_level_percentage_total(&self, material: &Material) -> f64 {
        material.substances.iter().map(|s| s.percentage).sum()
    }

    /// 顶层组成超限软检查
    ///
    /// # 返回
    /// - true: 合计超过 100% (epsilon 外),已记警告
    /// - false: 合计在预算内
    pub fn check_over_allocation(&self, material: &Material) -> bool {
        let total = self.top_level_percentage_total(material);
        let over = total > FULL_PERCENT + PERCENT_EPSILON;
        if over {
            warn!(
                material_id = %material.material_id,
                total_percentage = total,
                "物料顶层物质占比合计超过 100%,仅警告,不阻断"
            );
        }
        over
    }
}

impl Default for DerivationService {
    fn default() -> Self {
        Self::new()
    }
}
