// ==========================================
// 藻类农场管理系统 - 引擎层错误类型
// ==========================================
// 校验类错误(数量/参数/状态)与存储错误分开,
// 边界层可以统一折叠,内部仍能拿到精确的错误种类
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// 数量为负或不是数字
    #[error("无效数量: {0}")]
    InvalidQuantity(String),

    /// 产品/批次ID不存在
    #[error("{entity}不存在: id={id}")]
    NotFound { entity: &'static str, id: String },

    /// 参数越界或格式错误(如负的时间窗口)
    #[error("无效参数: {0}")]
    InvalidParameter(String),

    /// 数据完整性违规(如未知的饲喂方案)
    #[error("数据状态异常: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type EngineResult<T> = Result<T, EngineError>;
