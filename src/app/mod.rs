// ==========================================
// 藻类农场管理系统 - 应用层
// ==========================================
// 职责: 组装共享状态, 提供边界命令
// ==========================================

pub mod commands;
pub mod state;

// 重导出
pub use commands::CommandResponse;
pub use state::{get_default_db_path, AppState};
