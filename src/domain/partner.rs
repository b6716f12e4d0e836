// ==========================================
// 供应链产品目录系统 - 合作方领域模型
// ==========================================
// 依据: 数据字典 - partner 表
// ==========================================

use crate::domain::types::PartnerKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Partner - 合作方 (品牌方/制造商/供应商)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub partner_id: String,             // 合作方 ID
    pub partner_name: String,           // 合作方名称
    pub kind: PartnerKind,              // 类型 (BRAND/MANUFACTURER/SUPPLIER)
    pub contact_email: Option<String>,  // 联系邮箱(可选)
    pub country: Option<String>,        // 国家/地区代码(可选)
    pub created_at: DateTime<Utc>,      // 创建时间
    pub updated_at: DateTime<Utc>,      // 更新时间
}

impl Partner {
    /// 判断是否可作为订单卖方 (制造商/供应商)
    pub fn can_sell(&self) -> bool {
        matches!(self.kind, PartnerKind::Manufacturer | PartnerKind::Supplier)
    }

    /// 判断是否可作为订单买方 (品牌方/制造商)
    pub fn can_buy(&self) -> bool {
        matches!(self.kind, PartnerKind::Brand | PartnerKind::Manufacturer)
    }
}
