// ==========================================
// 供应链产品目录系统 - 目录配置读取 Trait
// ==========================================
// 职责: 定义导入/API 模块所需的配置读取接口(不包含实现)
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// CatalogConfigReader Trait
// ==========================================
// 用途: 导入与 API 模块所需的配置读取接口
// 实现者: ConfigManager(从 config_kv 表读取)
#[async_trait]
pub trait CatalogConfigReader: Send + Sync {
    // ===== 组成口径配置 =====

    /// 获取顶层组成超限警告阈值(百分比)
    ///
    /// # 默认值
    /// - 100.0
    ///
    /// # 用途
    /// - 物料顶层物质占比合计超过该值时记警告(软检查)
    async fn get_over_allocation_warn_threshold(&self) -> Result<f64, Box<dyn Error>>;

    // ===== 订单配置 =====

    /// 获取采购订单号前缀
    ///
    /// # 默认值
    /// - "PO"
    async fn get_purchase_order_prefix(&self) -> Result<String, Box<dyn Error>>;

    /// 获取销售订单号前缀
    ///
    /// # 默认值
    /// - "SO"
    async fn get_sales_order_prefix(&self) -> Result<String, Box<dyn Error>>;

    /// 获取默认币种
    ///
    /// # 默认值
    /// - "USD"
    async fn get_default_currency(&self) -> Result<String, Box<dyn Error>>;

    // ===== 数据质量配置 =====

    /// 获取重量异常上限(kg)
    ///
    /// # 默认值
    /// - 10000.0
    ///
    /// # 用途
    /// - 用于检测可能的单位错误(如原始数据单位为 g)
    async fn get_weight_anomaly_threshold_kg(&self) -> Result<f64, Box<dyn Error>>;
}
