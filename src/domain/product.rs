// ==========================================
// 供应链产品目录系统 - 产品领域模型
// ==========================================
// 依据: 数据字典 - product/product_bom 表
// 红线: BOM 行仅按 ID 引用物料,无级联所有权
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Product - 产品
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,          // 产品 ID
    pub product_name: String,        // 产品名称
    pub brand_id: Option<String>,    // 品牌方 ID (引用 partner,可选)
    pub created_at: DateTime<Utc>,   // 创建时间
    pub updated_at: DateTime<Utc>,   // 更新时间
}

// ==========================================
// BomLine - BOM 行 (产品物料清单明细)
// ==========================================
// 红线: 行顺序由 seq_no 决定,聚合按此顺序遍历
// 对齐: product_bom 表 (复合主键: product_id + seq_no)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomLine {
    // ===== 主键字段 =====
    pub product_id: String,        // 关联产品
    pub seq_no: i32,               // 行序号

    // ===== 引用与配比 =====
    pub material_id: String,       // 物料 ID (仅引用,不校验级联)
    pub quantity: f64,             // 用量 (件数)
    pub percentage: f64,           // 占产品组成的百分比份额

    // ===== 成本口径 =====
    pub unit_cost: Option<f64>,    // 单件成本(可选)
}

impl Product {
    /// 判断产品是否归属某品牌方
    pub fn belongs_to(&self, partner_id: &str) -> bool {
        self.brand_id.as_deref() == Some(partner_id)
    }
}
