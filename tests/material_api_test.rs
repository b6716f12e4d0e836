// ==========================================
// MaterialApi 集成测试
// ==========================================
// 测试目标: 物料 CRUD、组成门禁、折算重量派生、操作日志
// ==========================================


use std::sync::Arc;
use supply_chain_catalog::api::error::ApiError;
use supply_chain_catalog::api::material_api::{MaterialApi, MaterialDraft};
use supply_chain_catalog::domain::substance::Substance;
use supply_chain_catalog::domain::types::InputType;
use supply_chain_catalog::repository::{ActionLogRepository, MaterialRepository};
use test_helpers::{build_substance, create_test_db, shared_connection};

fn build_api(db_path: &str) -> MaterialApi {
    let conn = shared_connection(db_path).expect("Failed to open connection");
    MaterialApi::new(
        Arc::new(MaterialRepository::from_connection(Arc::clone(&conn))),
        Arc::new(ActionLogRepository::from_connection(conn)),
    )
}

fn manual_substance(name: &str, percentage: f64, children: Vec<Substance>) -> Substance {
    Substance {
        code: None,
        name: name.to_string(),
        percentage,
        projected_weight_kg: 0.0,
        input_type: InputType::Manual,
        source_type: None,
        children,
    }
}

#[test]
fn test_create_material_derives_projected_weights() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let api = build_api(&db_path);

    let draft = MaterialDraft {
        material_name: "基材".to_string(),
        weight_kg: 50.0,
        supplier_id: None,
        substances: vec![build_substance(Some("CAS-001"), "物质A", 20.0, 0.0)],
    };
    let material = api.create_material(draft, "tester").expect("创建物料失败");

    // 折算重量 = 50 × 20% = 10
    assert_eq!(material.substances[0].projected_weight_kg, 10.0);

    // 落库后可读回,物质树保留
    let loaded = api.get_material(&material.material_id).expect("读回失败");
    assert_eq!(loaded.substances.len(), 1);
    assert_eq!(loaded.substances[0].projected_weight_kg, 10.0);
}

#[test]
fn test_manual_children_must_partition_exactly() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let api = build_api(&db_path);

    // [30, 30, 40] → 恰好 100,提交放行
    let ok_draft = MaterialDraft {
        material_name: "复配料".to_string(),
        weight_kg: 10.0,
        supplier_id: None,
        substances: vec![manual_substance(
            "复配香精",
            50.0,
            vec![
                build_substance(None, "成分A", 30.0, 0.0),
                build_substance(None, "成分B", 30.0, 0.0),
                build_substance(None, "成分C", 40.0, 0.0),
            ],
        )],
    };
    assert!(api.create_material(ok_draft, "tester").is_ok());

    // [30, 30, 39.999999] → 差超 epsilon,阻断提交
    let bad_draft = MaterialDraft {
        material_name: "缺口复配料".to_string(),
        weight_kg: 10.0,
        supplier_id: None,
        substances: vec![manual_substance(
            "复配香精",
            50.0,
            vec![
                build_substance(None, "成分A", 30.0, 0.0),
                build_substance(None, "成分B", 30.0, 0.0),
                build_substance(None, "成分C", 39.999999, 0.0),
            ],
        )],
    };
    match api.create_material(bad_draft, "tester") {
        Err(ApiError::ManualChildrenIncomplete { substance, .. }) => {
            assert_eq!(substance, "复配香精");
        }
        other => panic!("Expected ManualChildrenIncomplete, got {:?}", other.map(|m| m.material_id)),
    }
}

#[test]
fn test_chemical_substance_rejects_children() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let api = build_api(&db_path);

    let mut substance = build_substance(Some("CAS-001"), "纯物质", 50.0, 0.0);
    substance.children = vec![build_substance(None, "杂质", 100.0, 0.0)];

    let draft = MaterialDraft {
        material_name: "非法料".to_string(),
        weight_kg: 1.0,
        supplier_id: None,
        substances: vec![substance],
    };
    assert!(matches!(
        api.create_material(draft, "tester"),
        Err(ApiError::InvalidInput(_))
    ));
}

#[test]
fn test_add_substance_enforces_budget() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let api = build_api(&db_path);

    let draft = MaterialDraft {
        material_name: "基材".to_string(),
        weight_kg: 10.0,
        supplier_id: None,
        substances: vec![build_substance(Some("CAS-001"), "物质A", 60.0, 0.0)],
    };
    let material = api.create_material(draft, "tester").expect("创建物料失败");

    // 预算内: 60 + 40 = 100
    let added = api.add_substance(
        &material.material_id,
        build_substance(Some("CAS-002"), "物质B", 40.0, 0.0),
        "tester",
    );
    assert!(added.is_ok());

    // 预算外: 100 + 0.1 → 拒绝
    let rejected = api.add_substance(
        &material.material_id,
        build_substance(Some("CAS-003"), "物质C", 0.1, 0.0),
        "tester",
    );
    assert!(matches!(
        rejected,
        Err(ApiError::CompositionBudgetExceeded { .. })
    ));
}

#[test]
fn test_over_allocation_is_soft_warning() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let api = build_api(&db_path);

    // 顶层合计 110%: 整体保存不阻断(仅警告),区别于逐条追加的硬门禁
    let draft = MaterialDraft {
        material_name: "超配料".to_string(),
        weight_kg: 10.0,
        supplier_id: None,
        substances: vec![
            build_substance(None, "物质A", 70.0, 0.0),
            build_substance(None, "物质B", 40.0, 0.0),
        ],
    };
    assert!(api.create_material(draft, "tester").is_ok());
}

#[test]
fn test_zero_percentage_rejected_at_input_layer() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let api = build_api(&db_path);

    let draft = MaterialDraft {
        material_name: "零占比料".to_string(),
        weight_kg: 10.0,
        supplier_id: None,
        substances: vec![build_substance(None, "物质A", 0.0, 0.0)],
    };
    assert!(matches!(
        api.create_material(draft, "tester"),
        Err(ApiError::ValidationError { .. })
    ));
}

#[test]
fn test_remaining_budget_hint() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let api = build_api(&db_path);

    let draft = MaterialDraft {
        material_name: "基材".to_string(),
        weight_kg: 10.0,
        supplier_id: None,
        substances: vec![build_substance(None, "物质A", 37.5, 0.0)],
    };
    let material = api.create_material(draft, "tester").expect("创建物料失败");

    let remaining = api.remaining_budget(&material.material_id).expect("查询失败");
    assert_eq!(remaining, 62.5);
}

#[test]
fn test_delete_material_and_action_log() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let conn = shared_connection(&db_path).expect("Failed to open connection");
    let action_log_repo = Arc::new(ActionLogRepository::from_connection(Arc::clone(&conn)));
    let api = MaterialApi::new(
        Arc::new(MaterialRepository::from_connection(Arc::clone(&conn))),
        Arc::clone(&action_log_repo),
    );

    let draft = MaterialDraft {
        material_name: "临时料".to_string(),
        weight_kg: 1.0,
        supplier_id: None,
        substances: Vec::new(),
    };
    let material = api.create_material(draft, "tester").expect("创建物料失败");
    api.delete_material(&material.material_id, "tester")
        .expect("删除失败");

    // 删除后不可查
    assert!(matches!(
        api.get_material(&material.material_id),
        Err(ApiError::NotFound(_))
    ));

    // 创建与删除各记一条日志
    let logs = action_log_repo
        .find_by_target("MATERIAL", &material.material_id)
        .expect("日志查询失败");
    assert_eq!(logs.len(), 2);
}
