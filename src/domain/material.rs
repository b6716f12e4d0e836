// ==========================================
// 供应链产品目录系统 - 物料领域模型
// ==========================================
// 依据: 数据字典 - material 表
// 红线: 物料顶层物质占比之和超过 100% 仅记警告,不阻断聚合
// ==========================================

use crate::domain::substance::Substance;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Material - 物料 (组件)
// ==========================================
// 用途: 产品 BOM 的引用对象,携带物质组成
// 对齐: material 表,substances 以 JSON 列整体存储
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    // ===== 主键 =====
    pub material_id: String,          // 物料唯一标识

    // ===== 基础信息 =====
    pub material_name: String,        // 物料名称
    pub weight_kg: f64,               // 物料单件重量 (kg)
    pub supplier_id: Option<String>,  // 供应商 ID (引用 partner,可选)

    // ===== 物质组成 =====
    pub substances: Vec<Substance>,   // 顶层物质组成列表

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,    // 记录创建时间
    pub updated_at: DateTime<Utc>,    // 记录更新时间
}

// ==========================================
// RawMaterialRow - CSV 导入中间结构体
// ==========================================
// 用途: 导入管道中间产物 (文件解析 → 此结构 → 物料装配)
// 生命周期: 仅在导入流程内
// 说明: 一行对应一条物质;同一 material_id 的多行装配为一个物料
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMaterialRow {
    // 源字段(已类型转换)
    pub material_id: Option<String>,
    pub material_name: Option<String>,
    pub weight_kg: Option<f64>,
    pub supplier_id: Option<String>,
    pub substance_code: Option<String>,
    pub substance_name: Option<String>,
    pub percentage: Option<f64>,
    pub input_type: Option<String>,

    // 元信息
    pub row_number: usize, // 原始文件行号(用于 DQ 报告)
}

// ==========================================
// DqLevel - 数据质量级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Error,   // 错误(阻断该行导入)
    Warning, // 警告(允许导入)
    Info,    // 提示(仅记录)
}

// ==========================================
// DqViolation - 数据质量违规记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: usize,           // 原始文件行号
    pub material_id: Option<String>, // 物料 ID(如果可解析)
    pub level: DqLevel,              // 违规级别
    pub field: String,               // 违规字段
    pub message: String,             // 违规描述
}

// ==========================================
// ImportSummary - 导入汇总统计
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_rows: usize,   // 总行数
    pub success: usize,      // 成功导入行数
    pub blocked: usize,      // 阻断行数 (ERROR)
    pub warning: usize,      // 警告条数 (WARNING)
}

// ==========================================
// DqReport - 数据质量报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqReport {
    pub summary: ImportSummary,       // 汇总统计
    pub violations: Vec<DqViolation>, // 违规明细
}

// ==========================================
// ImportResult - 导入结果
// ==========================================
// 用途: 导入接口返回值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    pub materials_imported: usize,    // 成功落库的物料数
    pub report: DqReport,             // DQ 报告
}
