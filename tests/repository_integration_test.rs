// ==========================================
// 仓储层集成测试
// ==========================================
// 测试目标: 实体落库/读回、物质树 JSON 列往返、乐观锁语义
// ==========================================


use chrono::Utc;
use supply_chain_catalog::domain::approval::ApprovalRequest;
use supply_chain_catalog::domain::substance::Substance;
use supply_chain_catalog::domain::types::{
    ApprovalStatus, ApprovalTargetKind, InputType, PartnerKind,
};
use supply_chain_catalog::repository::{
    ApprovalRepository, MaterialRepository, PartnerRepository, RepositoryError,
};
use test_helpers::{build_material, build_partner, build_substance, create_test_db};

#[test]
fn test_material_substance_tree_round_trip() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let repo = MaterialRepository::new(&db_path).expect("创建仓储失败");

    // 带嵌套子组成的物质树
    let mut parent = build_substance(None, "复配香精", 40.0, 4.0);
    parent.input_type = InputType::Manual;
    parent.children = vec![
        build_substance(Some("CAS-1"), "成分A", 25.0, 1.0),
        build_substance(Some("CAS-2"), "成分B", 75.0, 3.0),
    ];
    let material = build_material("M1", "复配料", 10.0, vec![parent]);

    repo.upsert(&material).expect("写入失败");
    let loaded = repo.find_by_id("M1").expect("查询失败").expect("未找到");

    assert_eq!(loaded.material_name, "复配料");
    assert_eq!(loaded.substances.len(), 1);
    let loaded_parent = &loaded.substances[0];
    assert_eq!(loaded_parent.input_type, InputType::Manual);
    assert_eq!(loaded_parent.children.len(), 2);
    assert_eq!(loaded_parent.children[1].code.as_deref(), Some("CAS-2"));
    assert_eq!(loaded_parent.children[1].percentage, 75.0);
}

#[test]
fn test_material_upsert_overwrites() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let repo = MaterialRepository::new(&db_path).expect("创建仓储失败");

    repo.upsert(&build_material("M1", "旧名称", 1.0, Vec::new()))
        .unwrap();
    repo.upsert(&build_material("M1", "新名称", 2.0, Vec::new()))
        .unwrap();

    let loaded = repo.find_by_id("M1").unwrap().unwrap();
    assert_eq!(loaded.material_name, "新名称");
    assert_eq!(loaded.weight_kg, 2.0);
    assert_eq!(repo.list_all().unwrap().len(), 1);
}

#[test]
fn test_partner_kind_round_trip() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let repo = PartnerRepository::new(&db_path).expect("创建仓储失败");

    repo.upsert(&build_partner("B1", "品牌甲", PartnerKind::Brand))
        .unwrap();
    repo.upsert(&build_partner("F1", "工厂乙", PartnerKind::Manufacturer))
        .unwrap();
    repo.upsert(&build_partner("S1", "供应商丙", PartnerKind::Supplier))
        .unwrap();

    assert_eq!(
        repo.find_by_id("F1").unwrap().unwrap().kind,
        PartnerKind::Manufacturer
    );
    assert_eq!(repo.find_by_kind(PartnerKind::Brand).unwrap().len(), 1);
    assert_eq!(repo.list_all().unwrap().len(), 3);

    assert!(repo.delete("S1").unwrap());
    assert!(repo.find_by_id("S1").unwrap().is_none());
}

#[test]
fn test_approval_optimistic_lock_at_repository_level() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let repo = ApprovalRepository::new(&db_path).expect("创建仓储失败");

    let request = ApprovalRequest {
        approval_id: "A1".to_string(),
        target_kind: ApprovalTargetKind::Material,
        target_id: "M1".to_string(),
        status: ApprovalStatus::Pending,
        requested_by: "requester".to_string(),
        requested_at: Utc::now(),
        reviewed_by: None,
        reviewed_at: None,
        review_comment: None,
        revision: 0,
    };
    repo.insert(&request).expect("写入失败");

    // 错误修订号 → 乐观锁冲突,并报告实际修订号
    let stale = repo.update_decision(
        "A1",
        3,
        ApprovalStatus::Approved,
        Some("reviewer"),
        Some(Utc::now()),
        None,
    );
    match stale {
        Err(RepositoryError::OptimisticLockFailure {
            expected, actual, ..
        }) => {
            assert_eq!(expected, 3);
            assert_eq!(actual, 0);
        }
        other => panic!("Expected OptimisticLockFailure, got {:?}", other),
    }

    // 正确修订号 → 更新成功且修订号自增
    repo.update_decision(
        "A1",
        0,
        ApprovalStatus::Approved,
        Some("reviewer"),
        Some(Utc::now()),
        Some("ok"),
    )
    .expect("裁决失败");

    let loaded = repo.find_by_id("A1").unwrap().unwrap();
    assert_eq!(loaded.status, ApprovalStatus::Approved);
    assert_eq!(loaded.revision, 1);

    // 不存在的审批 → NotFound
    let missing = repo.update_decision(
        "GHOST",
        0,
        ApprovalStatus::Rejected,
        None,
        None,
        None,
    );
    assert!(matches!(missing, Err(RepositoryError::NotFound { .. })));
}

#[test]
fn test_substance_wire_format() {
    // 物质 JSON 序列化采用 SCREAMING_SNAKE_CASE 枚举口径
    let substance = Substance {
        code: Some("7732-18-5".to_string()),
        name: "水".to_string(),
        percentage: 60.0,
        projected_weight_kg: 6.0,
        input_type: InputType::Chemical,
        source_type: None,
        children: Vec::new(),
    };
    let json = serde_json::to_string(&substance).unwrap();
    assert!(json.contains("\"CHEMICAL\""));

    let back: Substance = serde_json::from_str(&json).unwrap();
    assert_eq!(back, substance);
}
