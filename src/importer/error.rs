// ==========================================
// 供应链产品目录系统 - 导入层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入层错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件解析失败: {0}")]
    ParseError(String),

    #[error("表头缺失必需列: {0}")]
    MissingColumn(String),

    #[error("配置读取失败: {0}")]
    ConfigError(String),

    #[error("数据写入失败: {0}")]
    RepositoryError(#[from] RepositoryError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::ParseError(err.to_string())
    }
}

/// Result 类型别名
/// 注: 与领域层的 ImportResult 结构体区分命名
pub type ImporterResult<T> = Result<T, ImportError>;
