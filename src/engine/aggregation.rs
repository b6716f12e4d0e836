// ==========================================
// 供应链产品目录系统 - 物质清单聚合引擎
// ==========================================
// 红线: 聚合为只读派生,不回写任何实体
// 红线: 物料缺失按零贡献跳过,不报错 (尽力而为的展示口径)
// ==========================================
// 职责: 产品 BOM → 加权物质清单 (Bill of Substances)
// 输入: BOM 行列表 + 物料查找函数
// 输出: 按加权占比降序的聚合物质条目
// ==========================================
// 注: 存量数据中的 NaN/∞ 会按 IEEE-754 规则传播进合计,
//     本引擎不做拦截;新数据由 API 层输入校验拦截
// ==========================================

use crate::domain::material::Material;
use crate::domain::product::BomLine;
use crate::domain::substance::{AggregatedSubstance, SubstanceSource};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, warn};

// ==========================================
// BillOfSubstancesAggregator - 物质清单聚合引擎
// ==========================================
// 无状态引擎,纯函数式单遍聚合
pub struct BillOfSubstancesAggregator {
    // 无状态
}

impl BillOfSubstancesAggregator {
    /// 创建新的物质清单聚合引擎
    pub fn new() -> Self {
        Self {}
    }

    /// 聚合产品 BOM 为加权物质清单
    ///
    /// # 参数
    /// - `bom_lines`: BOM 行列表(有序)
    /// - `lookup_material`: 物料查找函数 (id → 物料)
    ///
    /// # 返回
    /// 聚合物质条目,按 total_percentage 降序;同值保持首次出现顺序
    ///
    /// # 口径
    /// - 加权占比 = substance.percentage × (bom_line.percentage / 100)
    /// - 加权重量 = substance.projected_weight_kg × bom_line.quantity
    /// - 聚合键 = code 非空取 code,否则取 name
    /// - 每条 (物料, BOM 行) 贡献追加一条来源记录,不合并去重
    /// - 查不到的物料、无物质组成的物料按零贡献跳过
    pub fn aggregate<F>(
        &self,
        bom_lines: &[BomLine],
        lookup_material: F,
    ) -> Vec<AggregatedSubstance>
    where
        F: Fn(&str) -> Option<Material>,
    {
        // 聚合键 → 输出下标,保持首次出现顺序
        let mut index_by_key: HashMap<String, usize> = HashMap::new();
        let mut entries: Vec<AggregatedSubstance> = Vec::new();
        let mut skipped_missing = 0;
        let mut skipped_empty = 0;

        for line in bom_lines {
            // 1. 解析物料;缺失按零贡献跳过
            let material = match lookup_material(&line.material_id) {
                Some(m) => m,
                None => {
                    skipped_missing += 1;
                    warn!(
                        material_id = %line.material_id,
                        seq_no = line.seq_no,
                        "BOM 行引用的物料不存在,该行不计入物质聚合"
                    );
                    continue;
                }
            };

            if material.substances.is_empty() {
                skipped_empty += 1;
                debug!(
                    material_id = %material.material_id,
                    "物料无物质组成,该行不计入物质聚合"
                );
                continue;
            }

            // 2. 逐物质累加加权贡献
            let line_share = line.percentage / 100.0;
            for substance in &material.substances {
                let weighted_percentage = substance.percentage * line_share;
                let weighted_weight = substance.projected_weight_kg * line.quantity;

                let key = substance.aggregation_key().to_string();
                let idx = match index_by_key.get(&key) {
                    Some(&idx) => idx,
                    None => {
                        let idx = entries.len();
                        index_by_key.insert(key.clone(), idx);
                        entries.push(AggregatedSubstance {
                            key,
                            code: substance.code.clone(),
                            name: substance.name.clone(),
                            total_percentage: 0.0,
                            total_weight_kg: 0.0,
                            sources: Vec::new(),
                        });
                        idx
                    }
                };

                let entry = &mut entries[idx];
                entry.total_percentage += weighted_percentage;
                entry.total_weight_kg += weighted_weight;
                // 同一物料经由多条 BOM 行出现时各自追加来源,不合并
                entry.sources.push(SubstanceSource {
                    material_id: material.material_id.clone(),
                    material_name: material.material_name.clone(),
                    percentage: weighted_percentage,
                    weight_kg: weighted_weight,
                });
            }
        }

        // 3. 按加权占比降序;sort_by 为稳定排序,同值保持首次出现顺序
        entries.sort_by(|a, b| {
            b.total_percentage
                .partial_cmp(&a.total_percentage)
                .unwrap_or(Ordering::Equal)
        });

        debug!(
            bom_lines = bom_lines.len(),
            substances = entries.len(),
            skipped_missing = skipped_missing,
            skipped_empty = skipped_empty,
            "物质清单聚合完成"
        );

        entries
    }
}

impl Default for BillOfSubstancesAggregator {
    fn default() -> Self {
        Self::new()
    }
}
