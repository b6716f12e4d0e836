// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证配置读取功能的正确性(默认值与覆写)
// ==========================================


use supply_chain_catalog::config::{CatalogConfigReader, ConfigManager};
use test_helpers::{create_test_db, insert_test_config, open_test_connection};

#[tokio::test]
async fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[tokio::test]
async fn test_defaults_without_overrides() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    assert_eq!(
        config_manager
            .get_over_allocation_warn_threshold()
            .await
            .unwrap(),
        100.0
    );
    assert_eq!(config_manager.get_purchase_order_prefix().await.unwrap(), "PO");
    assert_eq!(config_manager.get_sales_order_prefix().await.unwrap(), "SO");
    assert_eq!(config_manager.get_default_currency().await.unwrap(), "USD");
    assert_eq!(
        config_manager
            .get_weight_anomaly_threshold_kg()
            .await
            .unwrap(),
        10000.0
    );
}

#[tokio::test]
async fn test_overrides_from_config_kv() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    {
        let conn = open_test_connection(&db_path).expect("Failed to open db");
        insert_test_config(&conn, "order/purchase_prefix", "CG").expect("Failed to insert config");
        insert_test_config(&conn, "order/default_currency", "CNY")
            .expect("Failed to insert config");
        insert_test_config(&conn, "import/weight_anomaly_threshold_kg", "500.0")
            .expect("Failed to insert config");
    }

    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    assert_eq!(config_manager.get_purchase_order_prefix().await.unwrap(), "CG");
    assert_eq!(config_manager.get_default_currency().await.unwrap(), "CNY");
    assert_eq!(
        config_manager
            .get_weight_anomaly_threshold_kg()
            .await
            .unwrap(),
        500.0
    );
    // 未覆写项保持默认
    assert_eq!(config_manager.get_sales_order_prefix().await.unwrap(), "SO");
}

#[tokio::test]
async fn test_set_and_snapshot() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    config_manager
        .set_global_config_value("order/sales_prefix", "XS")
        .expect("Failed to set config");
    assert_eq!(config_manager.get_sales_order_prefix().await.unwrap(), "XS");

    let snapshot = config_manager.get_config_snapshot().expect("快照失败");
    assert!(snapshot.contains("order/sales_prefix"));
    assert!(snapshot.contains("XS"));
}
