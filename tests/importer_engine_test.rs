// ==========================================
// MaterialImporter 集成测试
// ==========================================
// 测试目标: CSV 解析、DQ 阻断/警告、物料装配与折算重量派生
// ==========================================


use std::io::Write;
use std::sync::Arc;
use supply_chain_catalog::config::ConfigManager;
use supply_chain_catalog::domain::material::DqLevel;
use supply_chain_catalog::importer::error::ImportError;
use supply_chain_catalog::importer::material_importer::MaterialImporter;
use supply_chain_catalog::repository::MaterialRepository;
use test_helpers::{create_test_db, insert_test_config, open_test_connection, shared_connection};

struct TestContext {
    importer: MaterialImporter,
    material_repo: Arc<MaterialRepository>,
    config: ConfigManager,
}

fn build_context(db_path: &str) -> TestContext {
    let conn = shared_connection(db_path).expect("Failed to open connection");
    let material_repo = Arc::new(MaterialRepository::from_connection(Arc::clone(&conn)));
    let importer = MaterialImporter::new(Arc::clone(&material_repo));
    let config = ConfigManager::from_connection(conn).expect("创建 ConfigManager 失败");
    TestContext {
        importer,
        material_repo,
        config,
    }
}

fn write_csv(content: &str) -> (tempfile::NamedTempFile, String) {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp csv");
    file.write_all(content.as_bytes()).expect("写入 CSV 失败");
    let path = file.path().to_str().unwrap().to_string();
    (file, path)
}

#[tokio::test]
async fn test_import_assembles_materials_by_id() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let ctx = build_context(&db_path);

    let (_csv, csv_path) = write_csv(
        "material_id,material_name,weight_kg,supplier_id,substance_code,substance_name,percentage,input_type\n\
         M1,基材甲,50.0,S1,CAS-001,物质A,20.0,CHEMICAL\n\
         M1,基材甲,50.0,S1,CAS-002,物质B,30.0,CHEMICAL\n\
         M2,基材乙,10.0,,,香精,5.0,MANUAL\n",
    );

    let result = ctx
        .importer
        .import_csv(&csv_path, &ctx.config)
        .await
        .expect("导入失败");

    assert_eq!(result.materials_imported, 2);
    assert_eq!(result.report.summary.total_rows, 3);
    assert_eq!(result.report.summary.success, 3);
    assert_eq!(result.report.summary.blocked, 0);

    // M1 装配两条物质,折算重量已派生
    let m1 = ctx
        .material_repo
        .find_by_id("M1")
        .unwrap()
        .expect("M1 未落库");
    assert_eq!(m1.substances.len(), 2);
    assert_eq!(m1.substances[0].projected_weight_kg, 10.0); // 50 × 20%
    assert_eq!(m1.substances[1].projected_weight_kg, 15.0); // 50 × 30%

    // M2 的 input_type 解析为 MANUAL
    let m2 = ctx.material_repo.find_by_id("M2").unwrap().expect("M2 未落库");
    assert_eq!(
        m2.substances[0].input_type,
        supply_chain_catalog::domain::types::InputType::Manual
    );
}

#[tokio::test]
async fn test_import_blocks_invalid_rows() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let ctx = build_context(&db_path);

    // 第 2 行缺物料 ID,第 3 行占比越界,第 4 行合法
    let (_csv, csv_path) = write_csv(
        "material_id,material_name,weight_kg,supplier_id,substance_code,substance_name,percentage,input_type\n\
         ,基材甲,50.0,,,物质A,20.0,CHEMICAL\n\
         M2,基材乙,10.0,,,物质B,120.0,CHEMICAL\n\
         M3,基材丙,10.0,,,物质C,40.0,CHEMICAL\n",
    );

    let result = ctx
        .importer
        .import_csv(&csv_path, &ctx.config)
        .await
        .expect("导入失败");

    assert_eq!(result.report.summary.total_rows, 3);
    assert_eq!(result.report.summary.success, 1);
    assert_eq!(result.report.summary.blocked, 2);
    assert_eq!(result.materials_imported, 1);

    // 阻断行不落库
    assert!(ctx.material_repo.find_by_id("M2").unwrap().is_none());
    assert!(ctx.material_repo.find_by_id("M3").unwrap().is_some());

    // 违规明细携带行号
    let blocked_rows: Vec<usize> = result
        .report
        .violations
        .iter()
        .filter(|v| v.level == DqLevel::Error)
        .map(|v| v.row_number)
        .collect();
    assert!(blocked_rows.contains(&2));
    assert!(blocked_rows.contains(&3));
}

#[tokio::test]
async fn test_import_warns_on_over_allocation() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let ctx = build_context(&db_path);

    // 顶层合计 110% → 警告但放行
    let (_csv, csv_path) = write_csv(
        "material_id,material_name,weight_kg,supplier_id,substance_code,substance_name,percentage,input_type\n\
         M1,超配料,10.0,,,物质A,70.0,CHEMICAL\n\
         M1,超配料,10.0,,,物质B,40.0,CHEMICAL\n",
    );

    let result = ctx
        .importer
        .import_csv(&csv_path, &ctx.config)
        .await
        .expect("导入失败");

    assert_eq!(result.materials_imported, 1);
    assert!(result
        .report
        .violations
        .iter()
        .any(|v| v.level == DqLevel::Warning && v.field == "percentage"));
    assert!(ctx.material_repo.find_by_id("M1").unwrap().is_some());
}

#[tokio::test]
async fn test_import_weight_anomaly_threshold_from_config() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    {
        let conn = open_test_connection(&db_path).expect("Failed to open db");
        insert_test_config(&conn, "import/weight_anomaly_threshold_kg", "100.0")
            .expect("写入配置失败");
    }
    let ctx = build_context(&db_path);

    let (_csv, csv_path) = write_csv(
        "material_id,material_name,weight_kg,supplier_id,substance_code,substance_name,percentage,input_type\n\
         M1,重料,500.0,,,物质A,10.0,CHEMICAL\n",
    );

    let result = ctx
        .importer
        .import_csv(&csv_path, &ctx.config)
        .await
        .expect("导入失败");

    // 超过配置阈值 → 警告但放行
    assert_eq!(result.materials_imported, 1);
    assert!(result
        .report
        .violations
        .iter()
        .any(|v| v.level == DqLevel::Warning && v.field == "weight_kg"));
}

#[tokio::test]
async fn test_import_missing_file_and_missing_column() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let ctx = build_context(&db_path);

    // 文件不存在
    let result = ctx.importer.import_csv("/no/such/file.csv", &ctx.config).await;
    assert!(matches!(result, Err(ImportError::FileNotFound(_))));

    // 表头缺少 percentage 列
    let (_csv, csv_path) = write_csv("material_id,material_name,weight_kg,substance_name\n");
    let result = ctx.importer.import_csv(&csv_path, &ctx.config).await;
    assert!(matches!(result, Err(ImportError::MissingColumn(_))));
}
