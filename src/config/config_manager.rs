// ==========================================
// 藻类农场管理系统 - 配置管理器
// ==========================================
// 职责: 配置查询与覆写
// 存储: config_kv 表 (scope_id 固定为 global)
// ==========================================

use crate::config::dashboard_config_trait::DashboardConfigReader;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 驾驶舱默认窗口天数
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 读取配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入配置 (UPSERT)
    ///
    /// 只接受 config_keys 中登记的键
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        if !config_keys::ALL.contains(&key) {
            return Err(format!("未知配置项: {}", key).into());
        }

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES (?1, ?2, ?3, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;

        tracing::info!(key, value, "配置已更新");
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }
}

#[async_trait]
impl DashboardConfigReader for ConfigManager {
    async fn get_default_window_days(&self) -> Result<i64, Box<dyn Error>> {
        let default = DEFAULT_WINDOW_DAYS.to_string();
        let value = self.get_config_or_default(config_keys::DEFAULT_WINDOW_DAYS, &default)?;
        match value.trim().parse::<i64>() {
            Ok(days) if days >= 0 => Ok(days),
            _ => {
                tracing::warn!(value = %value, "默认窗口配置无效,使用 {}", DEFAULT_WINDOW_DAYS);
                Ok(DEFAULT_WINDOW_DAYS)
            }
        }
    }

    async fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::LOCALE, crate::i18n::DEFAULT_LOCALE)?;
        Ok(crate::i18n::normalize_locale(&value).to_string())
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 驾驶舱
    pub const DEFAULT_WINDOW_DAYS: &str = "dashboard/default_window_days";

    // 界面语言
    pub const LOCALE: &str = "ui/locale";

    pub const ALL: [&str; 2] = [DEFAULT_WINDOW_DAYS, LOCALE];
}
