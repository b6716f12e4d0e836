// ==========================================
// 供应链产品目录系统 - 物料 CSV 导入器
// ==========================================
// 职责: CSV 解析 → DQ 校验 → 物料装配 → 折算重量派生 → 批量落库
// 红线: ERROR 级违规阻断该物料,WARNING 级允许导入
// 红线: 同一 material_id 的多行装配为一个物料,一行一条物质
// ==========================================
// CSV 列: material_id, material_name, weight_kg, supplier_id,
//         substance_code, substance_name, percentage, input_type
// ==========================================

use crate::config::catalog_config_trait::CatalogConfigReader;
use crate::domain::material::{
    DqLevel, DqReport, DqViolation, ImportResult, ImportSummary, Material, RawMaterialRow,
};
use crate::domain::substance::Substance;
use crate::domain::types::InputType;
use crate::engine::composition::FULL_PERCENT;
use crate::engine::derivation::DerivationService;
use crate::importer::error::{ImportError, ImporterResult};
use crate::repository::material_repo::MaterialRepository;
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

// ==========================================
// MaterialImporter - 物料导入器
// ==========================================
pub struct MaterialImporter {
    material_repo: Arc<MaterialRepository>,
    derivation: DerivationService,
}

impl MaterialImporter {
    pub fn new(material_repo: Arc<MaterialRepository>) -> Self {
        Self {
            material_repo,
            derivation: DerivationService::new(),
        }
    }

    /// 从 CSV 文件批量导入物料
    ///
    /// # 参数
    /// - path: CSV 文件路径
    /// - config: 配置读取器(重量异常阈值)
    ///
    /// # 返回
    /// - Ok(ImportResult): 导入结果 + DQ 报告
    /// - Err(ImportError): 文件级错误(不存在/表头缺列)
    ///
    /// # 流程
    /// 1. 解析 CSV 为 RawMaterialRow
    /// 2. 行级 DQ 校验(ERROR 阻断该行,WARNING 放行)
    /// 3. 按 material_id 装配物料(保持首次出现顺序)
    /// 4. 派生折算重量,顶层超限记 WARNING
    /// 5. 事务内批量 upsert
    pub async fn import_csv<C>(&self, path: &str, config: &C) -> ImporterResult<ImportResult>
    where
        C: CatalogConfigReader + ?Sized,
    {
        if !Path::new(path).exists() {
            return Err(ImportError::FileNotFound(path.to_string()));
        }

        let weight_anomaly_threshold = config
            .get_weight_anomaly_threshold_kg()
            .await
            .map_err(|e| ImportError::ConfigError(e.to_string()))?;

        // 1. 解析
        let rows = self.parse_rows(path)?;
        let total_rows = rows.len();

        // 2. 行级 DQ 校验
        let mut violations: Vec<DqViolation> = Vec::new();
        let mut valid_rows: Vec<RawMaterialRow> = Vec::new();
        for row in rows {
            let row_violations = self.validate_row(&row, weight_anomaly_threshold);
            let blocked = row_violations.iter().any(|v| v.level == DqLevel::Error);
            violations.extend(row_violations);
            if !blocked {
                valid_rows.push(row);
            }
        }

        // 3. 装配物料
        let materials = self.assemble_materials(&valid_rows, &mut violations);

        // 4. 落库
        let imported = self.material_repo.batch_upsert(&materials)?;

        // 阻断按行计数,警告按违规条目计数
        let blocked = total_rows - valid_rows.len();
        let warning = violations
            .iter()
            .filter(|v| v.level == DqLevel::Warning)
            .count();

        let report = DqReport {
            summary: ImportSummary {
                total_rows,
                success: valid_rows.len(),
                blocked,
                warning,
            },
            violations,
        };

        info!(
            total_rows = total_rows,
            materials = imported,
            blocked = blocked,
            warning = warning,
            "物料 CSV 导入完成"
        );

        Ok(ImportResult {
            materials_imported: imported,
            report,
        })
    }

    // ==========================================
    // 解析
    // ==========================================

    fn parse_rows(&self, path: &str) -> ImporterResult<Vec<RawMaterialRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;

        // 表头校验
        let headers = reader.headers()?.clone();
        let required = [
            "material_id",
            "material_name",
            "weight_kg",
            "substance_name",
            "percentage",
        ];
        for column in required {
            if !headers.iter().any(|h| h == column) {
                return Err(ImportError::MissingColumn(column.to_string()));
            }
        }
        let col = |name: &str| headers.iter().position(|h| h == name);
        let idx_material_id = col("material_id").unwrap();
        let idx_material_name = col("material_name").unwrap();
        let idx_weight = col("weight_kg").unwrap();
        let idx_supplier = col("supplier_id");
        let idx_code = col("substance_code");
        let idx_substance_name = col("substance_name").unwrap();
        let idx_percentage = col("percentage").unwrap();
        let idx_input_type = col("input_type");

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let field = |idx: usize| -> Option<String> {
                record
                    .get(idx)
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_string())
            };
            let opt_field = |idx: Option<usize>| idx.and_then(|c| field(c));

            rows.push(RawMaterialRow {
                material_id: field(idx_material_id),
                material_name: field(idx_material_name),
                weight_kg: field(idx_weight).and_then(|s| s.parse::<f64>().ok()),
                supplier_id: opt_field(idx_supplier),
                substance_code: opt_field(idx_code),
                substance_name: field(idx_substance_name),
                percentage: field(idx_percentage).and_then(|s| s.parse::<f64>().ok()),
                input_type: opt_field(idx_input_type),
                // 数据行从表头之后计起,与编辑器展示一致
                row_number: i + 2,
            });
        }

        Ok(rows)
    }

    // ==========================================
    // 行级 DQ 校验
    // ==========================================

    fn validate_row(&self, row: &RawMaterialRow, weight_threshold: f64) -> Vec<DqViolation> {
        let mut violations = Vec::new();
        let mut push = |level: DqLevel, field: &str, message: String| {
            violations.push(DqViolation {
                row_number: row.row_number,
                material_id: row.material_id.clone(),
                level,
                field: field.to_string(),
                message,
            });
        };

        if row.material_id.is_none() {
            push(DqLevel::Error, "material_id", "物料 ID 缺失".to_string());
        }
        if row.material_name.is_none() {
            push(DqLevel::Error, "material_name", "物料名称缺失".to_string());
        }
        if row.substance_name.is_none() {
            push(DqLevel::Error, "substance_name", "物质名称缺失".to_string());
        }

        match row.weight_kg {
            None => push(DqLevel::Error, "weight_kg", "重量缺失或非法".to_string()),
            Some(w) if !w.is_finite() || w <= 0.0 => {
                push(DqLevel::Error, "weight_kg", format!("重量非法: {}", w));
            }
            Some(w) if w > weight_threshold => {
                push(
                    DqLevel::Warning,
                    "weight_kg",
                    format!("重量 {} kg 超过异常阈值 {} kg,疑似单位错误", w, weight_threshold),
                );
            }
            Some(_) => {}
        }

        match row.percentage {
            None => push(DqLevel::Error, "percentage", "占比缺失或非法".to_string()),
            Some(p) if !p.is_finite() || p <= 0.0 || p > FULL_PERCENT => {
                push(
                    DqLevel::Error,
                    "percentage",
                    format!("占比 {} 超出有效范围 (0,100]", p),
                );
            }
            Some(_) => {}
        }

        violations
    }

    // ==========================================
    // 物料装配
    // ==========================================

    fn assemble_materials(
        &self,
        rows: &[RawMaterialRow],
        violations: &mut Vec<DqViolation>,
    ) -> Vec<Material> {
        // material_id → 输出下标,保持首次出现顺序
        let mut index_by_id: HashMap<String, usize> = HashMap::new();
        let mut materials: Vec<Material> = Vec::new();
        let now = Utc::now();

        for row in rows {
            // ERROR 级已在行校验阶段过滤,此处字段必然存在
            let (material_id, material_name, weight_kg, substance_name, percentage) = match (
                &row.material_id,
                &row.material_name,
                row.weight_kg,
                &row.substance_name,
                row.percentage,
            ) {
                (Some(id), Some(name), Some(w), Some(sn), Some(p)) => (id, name, w, sn, p),
                _ => continue,
            };

            let idx = match index_by_id.get(material_id) {
                Some(&idx) => idx,
                None => {
                    let idx = materials.len();
                    index_by_id.insert(material_id.clone(), idx);
                    materials.push(Material {
                        material_id: material_id.clone(),
                        material_name: material_name.clone(),
                        weight_kg,
                        supplier_id: row.supplier_id.clone(),
                        substances: Vec::new(),
                        created_at: now,
                        updated_at: now,
                    });
                    idx
                }
            };

            let input_type = match row.input_type.as_deref() {
                Some("MANUAL") => InputType::Manual,
                _ => InputType::Chemical,
            };

            materials[idx].substances.push(Substance {
                code: row.substance_code.clone(),
                name: substance_name.clone(),
                percentage,
                projected_weight_kg: 0.0,
                input_type,
                source_type: None,
                children: Vec::new(),
            });
        }

        // 派生折算重量 + 顶层超限软检查
        for material in &mut materials {
            self.derivation.derive_material(material);

            if self.derivation.check_over_allocation(material) {
                let total = self.derivation.top_level_percentage_total(material);
                violations.push(DqViolation {
                    row_number: 0,
                    material_id: Some(material.material_id.clone()),
                    level: DqLevel::Warning,
                    field: "percentage".to_string(),
                    message: format!("物料顶层物质占比合计 {} 超过 100%", total),
                });
            }
        }

        materials
    }
}
