// ==========================================
// 藻类农场管理系统 - API层错误类型
// ==========================================
// 职责: 把引擎/仓储错误转换为面向操作员的消息
// 内部保留精确的错误种类, 边界层再统一折叠为 500
// ==========================================

use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务校验错误
    // ==========================================
    /// 数量为负或不是数字
    #[error("数量无效: {0}")]
    InvalidQuantity(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 参数越界或格式错误 (时间窗口/日期)
    #[error("参数无效: {0}")]
    InvalidParameter(String),

    #[error("数据状态异常: {0}")]
    InvalidState(String),

    /// 请求体无法解析或缺少必填字段
    #[error("请求数据无法解析: {0}")]
    InvalidPayload(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 导出错误
    // ==========================================
    #[error("导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定错误码 (前端/日志检索用)
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidQuantity(_) => "INVALID_QUANTITY",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidParameter(_) => "INVALID_PARAMETER",
            ApiError::InvalidState(_) => "INVALID_STATE",
            ApiError::InvalidPayload(_) => "INVALID_PAYLOAD",
            ApiError::BusinessRuleViolation(_) => "BUSINESS_RULE_VIOLATION",
            ApiError::DatabaseError(_)
            | ApiError::DatabaseConnectionError(_)
            | ApiError::DatabaseTransactionError(_) => "DATABASE_ERROR",
            ApiError::ExportError(_) => "EXPORT_ERROR",
            ApiError::InternalError(_) | ApiError::Other(_) => "INTERNAL_ERROR",
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::CheckConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("检查约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidState(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidQuantity(msg) => ApiError::InvalidQuantity(msg),
            EngineError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            EngineError::InvalidParameter(msg) => ApiError::InvalidParameter(msg),
            EngineError::InvalidState(msg) => ApiError::InvalidState(msg),
            EngineError::Repository(repo) => repo.into(),
        }
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_conversion() {
        let api_err: ApiError = EngineError::NotFound {
            entity: "产品",
            id: "42".to_string(),
        }
        .into();
        match &api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("产品"));
                assert!(msg.contains("42"));
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
        assert_eq!(api_err.code(), "NOT_FOUND");

        let api_err: ApiError = EngineError::InvalidQuantity("-1".to_string()).into();
        assert_eq!(api_err.code(), "INVALID_QUANTITY");
    }

    #[test]
    fn test_repository_error_through_engine() {
        let api_err: ApiError =
            EngineError::Repository(RepositoryError::LockError("poisoned".to_string())).into();
        assert!(matches!(api_err, ApiError::DatabaseConnectionError(_)));
        assert_eq!(api_err.code(), "DATABASE_ERROR");
    }
}
