// ==========================================
// 藻类农场管理系统 - 驾驶舱配置读取 Trait
// ==========================================
// 职责: 定义 API 层所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// DashboardConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait DashboardConfigReader: Send + Sync {
    /// 驾驶舱默认窗口天数
    ///
    /// # 默认值
    /// - 30
    async fn get_default_window_days(&self) -> Result<i64, Box<dyn Error>>;

    /// 界面/导出语言
    ///
    /// # 默认值
    /// - es
    async fn get_locale(&self) -> Result<String, Box<dyn Error>>;
}
