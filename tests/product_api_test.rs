// ==========================================
// ProductApi 集成测试
// ==========================================
// 测试目标: 产品/BOM 维护、占比预算门禁、物质清单聚合
// ==========================================


use std::sync::Arc;
use supply_chain_catalog::api::error::ApiError;
use supply_chain_catalog::api::product_api::ProductApi;
use supply_chain_catalog::repository::{
    ActionLogRepository, MaterialRepository, ProductRepository,
};
use test_helpers::{build_material, build_substance, create_test_db, shared_connection};

struct TestContext {
    api: ProductApi,
    material_repo: Arc<MaterialRepository>,
}

fn build_context(db_path: &str) -> TestContext {
    let conn = shared_connection(db_path).expect("Failed to open connection");
    let material_repo = Arc::new(MaterialRepository::from_connection(Arc::clone(&conn)));
    let api = ProductApi::new(
        Arc::new(ProductRepository::from_connection(Arc::clone(&conn))),
        Arc::clone(&material_repo),
        Arc::new(ActionLogRepository::from_connection(conn)),
    );
    TestContext { api, material_repo }
}

#[test]
fn test_bom_budget_enforced_on_add() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let ctx = build_context(&db_path);

    let product = ctx
        .api
        .create_product("洗发水", None, "tester")
        .expect("创建产品失败");

    // 60 + 40 = 100 放行
    ctx.api
        .add_bom_line(&product.product_id, "M1", 1.0, 60.0, None, "tester")
        .expect("添加 BOM 行失败");
    ctx.api
        .add_bom_line(&product.product_id, "M2", 1.0, 40.0, None, "tester")
        .expect("添加 BOM 行失败");

    // 100 + 0.5 超出预算 → 拒绝
    let rejected = ctx
        .api
        .add_bom_line(&product.product_id, "M3", 1.0, 0.5, None, "tester");
    assert!(matches!(
        rejected,
        Err(ApiError::CompositionBudgetExceeded { .. })
    ));

    // 剩余预算为 0
    let remaining = ctx
        .api
        .remaining_bom_budget(&product.product_id)
        .expect("查询失败");
    assert_eq!(remaining, 0.0);
}

#[test]
fn test_bom_lines_keep_insertion_order() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let ctx = build_context(&db_path);

    let product = ctx
        .api
        .create_product("面霜", None, "tester")
        .expect("创建产品失败");
    ctx.api
        .add_bom_line(&product.product_id, "M-b", 1.0, 30.0, None, "tester")
        .unwrap();
    ctx.api
        .add_bom_line(&product.product_id, "M-a", 1.0, 20.0, None, "tester")
        .unwrap();

    let lines = ctx.api.list_bom_lines(&product.product_id).unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].seq_no, 1);
    assert_eq!(lines[0].material_id, "M-b");
    assert_eq!(lines[1].seq_no, 2);
    assert_eq!(lines[1].material_id, "M-a");
}

#[test]
fn test_bill_of_substances_weighting() {
    // 场景: 一条 BOM 行 (占比 50%,数量 2),物料物质 (20%,折算 10kg)
    // 期望: 聚合占比 10%,聚合重量 20kg
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let ctx = build_context(&db_path);

    ctx.material_repo
        .upsert(&build_material(
            "M1",
            "基材",
            50.0,
            vec![build_substance(Some("CAS-001"), "物质A", 20.0, 10.0)],
        ))
        .expect("物料写入失败");

    let product = ctx
        .api
        .create_product("精华液", None, "tester")
        .expect("创建产品失败");
    ctx.api
        .add_bom_line(&product.product_id, "M1", 2.0, 50.0, None, "tester")
        .unwrap();

    let bill = ctx
        .api
        .bill_of_substances(&product.product_id)
        .expect("聚合失败");

    assert_eq!(bill.len(), 1);
    assert_eq!(bill[0].key, "CAS-001");
    assert_eq!(bill[0].total_percentage, 10.0);
    assert_eq!(bill[0].total_weight_kg, 20.0);
    assert_eq!(bill[0].sources.len(), 1);
    assert_eq!(bill[0].sources[0].material_name, "基材");
}

#[test]
fn test_bill_of_substances_merges_shared_code() {
    // 场景: 两条 BOM 行引用两个物料,均含 CAS-001 → 单条聚合,来源两条
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let ctx = build_context(&db_path);

    ctx.material_repo
        .upsert(&build_material(
            "M1",
            "基材甲",
            10.0,
            vec![build_substance(Some("CAS-001"), "物质A", 40.0, 4.0)],
        ))
        .unwrap();
    ctx.material_repo
        .upsert(&build_material(
            "M2",
            "基材乙",
            10.0,
            vec![build_substance(Some("CAS-001"), "物质A", 20.0, 2.0)],
        ))
        .unwrap();

    let product = ctx
        .api
        .create_product("乳液", None, "tester")
        .expect("创建产品失败");
    ctx.api
        .add_bom_line(&product.product_id, "M1", 1.0, 50.0, None, "tester")
        .unwrap();
    ctx.api
        .add_bom_line(&product.product_id, "M2", 1.0, 50.0, None, "tester")
        .unwrap();

    let bill = ctx.api.bill_of_substances(&product.product_id).unwrap();
    assert_eq!(bill.len(), 1);
    assert_eq!(bill[0].sources.len(), 2);
    assert_eq!(bill[0].total_percentage, 30.0); // 40×0.5 + 20×0.5
}

#[test]
fn test_bill_of_substances_skips_missing_material() {
    // 场景: BOM 行引用不存在的物料 → 零贡献,聚合不报错
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let ctx = build_context(&db_path);

    ctx.material_repo
        .upsert(&build_material(
            "M1",
            "基材",
            10.0,
            vec![build_substance(Some("CAS-001"), "物质A", 20.0, 2.0)],
        ))
        .unwrap();

    let product = ctx
        .api
        .create_product("洁面乳", None, "tester")
        .expect("创建产品失败");
    ctx.api
        .add_bom_line(&product.product_id, "M1", 1.0, 50.0, None, "tester")
        .unwrap();
    ctx.api
        .add_bom_line(&product.product_id, "GHOST", 1.0, 50.0, None, "tester")
        .unwrap();

    let bill = ctx.api.bill_of_substances(&product.product_id).unwrap();
    assert_eq!(bill.len(), 1);
    assert_eq!(bill[0].total_percentage, 10.0);
}

#[test]
fn test_bill_of_substances_sorted_descending() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let ctx = build_context(&db_path);

    ctx.material_repo
        .upsert(&build_material(
            "M1",
            "混合料",
            10.0,
            vec![
                build_substance(Some("CAS-A"), "物质A", 5.0, 0.5),
                build_substance(Some("CAS-B"), "物质B", 40.0, 4.0),
                build_substance(Some("CAS-C"), "物质C", 12.0, 1.2),
            ],
        ))
        .unwrap();

    let product = ctx
        .api
        .create_product("香氛", None, "tester")
        .expect("创建产品失败");
    ctx.api
        .add_bom_line(&product.product_id, "M1", 1.0, 100.0, None, "tester")
        .unwrap();

    let bill = ctx.api.bill_of_substances(&product.product_id).unwrap();
    let totals: Vec<f64> = bill.iter().map(|e| e.total_percentage).collect();
    assert_eq!(totals, vec![40.0, 12.0, 5.0]);
}

#[test]
fn test_remove_bom_line() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let ctx = build_context(&db_path);

    let product = ctx
        .api
        .create_product("牙膏", None, "tester")
        .expect("创建产品失败");
    let line = ctx
        .api
        .add_bom_line(&product.product_id, "M1", 1.0, 30.0, None, "tester")
        .unwrap();

    ctx.api
        .remove_bom_line(&product.product_id, line.seq_no, "tester")
        .expect("移除失败");
    assert!(ctx.api.list_bom_lines(&product.product_id).unwrap().is_empty());

    // 再次移除 → NotFound
    assert!(matches!(
        ctx.api.remove_bom_line(&product.product_id, line.seq_no, "tester"),
        Err(ApiError::NotFound(_))
    ));
}
