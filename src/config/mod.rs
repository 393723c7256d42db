// ==========================================
// 藻类农场管理系统 - 配置层
// ==========================================
// 职责: 系统配置管理,支持作用域覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod dashboard_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, DEFAULT_WINDOW_DAYS};
pub use dashboard_config_trait::DashboardConfigReader;
