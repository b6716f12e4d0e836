// ==========================================
// 供应链产品目录系统 - 物质领域模型
// ==========================================
// 依据: 数据字典 - substance 组成结构
// 红线: percentage ∈ (0,100]; MANUAL 物质的子组成之和必须恰好为 100%
// ==========================================

use crate::domain::types::InputType;
use serde::{Deserialize, Serialize};

// ==========================================
// Substance - 物质组成
// ==========================================
// 用途: 物料的化学/申报组成,以 JSON 列整体存储于 material 行内
// 说明: projected_weight_kg 为派生字段 (父重量 × percentage/100),
//       由 Derivation 服务统一计算,不由调用方手工维护
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substance {
    // ===== 标识 =====
    pub code: Option<String>,      // CAS 类编码(可选,非空时作为聚合键)
    pub name: String,              // 物质名称

    // ===== 组成口径 =====
    pub percentage: f64,           // 组成占比 (0,100],可携带多位小数
    pub projected_weight_kg: f64,  // 折算重量 (kg,派生字段)
    pub input_type: InputType,     // 录入类型 (CHEMICAL/MANUAL)
    pub source_type: Option<String>, // 来源类型(可选,如 NATURAL/SYNTHETIC)

    // ===== 子组成 =====
    // 仅 MANUAL 物质允许非空;子组成占比相对父物质为 100%
    #[serde(default)]
    pub children: Vec<Substance>,
}

impl Substance {
    /// 聚合键: code 非空(去除首尾空白后)时取 code,否则取 name
    pub fn aggregation_key(&self) -> &str {
        match &self.code {
            Some(code) if !code.trim().is_empty() => code,
            _ => &self.name,
        }
    }

    /// 判断是否为带子组成的人工申报物质
    pub fn is_manual_with_children(&self) -> bool {
        self.input_type == InputType::Manual && !self.children.is_empty()
    }
}

// ==========================================
// AggregatedSubstance - 聚合物质条目 (派生,不落库)
// ==========================================
// 用途: 产品 BOM 聚合为物质清单的输出结构,供展示层消费
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSubstance {
    pub key: String,               // 聚合键 (code 非空取 code,否则取 name)
    pub code: Option<String>,      // CAS 类编码(取首次出现的值)
    pub name: String,              // 物质名称(取首次出现的值)
    pub total_percentage: f64,     // 加权占比合计
    pub total_weight_kg: f64,      // 加权重量合计 (kg)
    pub sources: Vec<SubstanceSource>, // 贡献来源(每条 BOM 行贡献一条,不合并)
}

// ==========================================
// SubstanceSource - 物质贡献来源
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstanceSource {
    pub material_id: String,       // 贡献物料 ID
    pub material_name: String,     // 贡献物料名称
    pub percentage: f64,           // 该来源的加权占比
    pub weight_kg: f64,            // 该来源的加权重量 (kg)
}
