// ==========================================
// 藻类农场管理系统 - 鸡群批次与日报领域模型
// ==========================================
// 批次(FlockBatch): 同一饲喂方案下从同一天开始跟踪的一群蛋鸡
// 日报(DailyFlockReport): 创建后不可变,引用(不拥有)批次
// ==========================================

use crate::domain::types::DietType;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// FlockBatch - 鸡群批次
// ==========================================
// 红线: initial_bird_count > 0, 设定后只读(不做批次中途扩缩)
// 停用只能由外部管理动作触发
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlockBatch {
    pub batch_id: i64,
    pub name: String,
    pub diet_type: DietType,
    pub initial_bird_count: u32,
    pub start_date: NaiveDate,
    pub active: bool,
}

/// 新建批次请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFlockBatch {
    pub name: String,
    pub diet_type: DietType,
    pub initial_bird_count: u32,
    pub start_date: NaiveDate,
}

impl NewFlockBatch {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("批次名称不能为空".to_string());
        }
        if self.initial_bird_count == 0 {
            return Err("初始鸡只数必须大于0".to_string());
        }
        Ok(())
    }
}

// ==========================================
// DailyFlockReport - 鸡群日报
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFlockReport {
    pub report_id: String,
    pub batch_id: i64,
    pub report_date: NaiveDate,
    pub eggs_collected: u32,
    pub eggs_broken: u32,
    pub feed_consumed_kg: Decimal,
    pub mortality: u32,
    pub notes: Option<String>,
    pub responsible: Option<String>,
    pub created_at: NaiveDateTime,
}

impl DailyFlockReport {
    /// 单条日报产蛋率 (%)
    ///
    /// eggs_collected / initial_bird_count × 100; 鸡只数为0时返回0
    pub fn laying_rate(&self, batch: &FlockBatch) -> Decimal {
        if batch.initial_bird_count == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.eggs_collected) * Decimal::ONE_HUNDRED
            / Decimal::from(batch.initial_bird_count)
    }
}

/// 录入日报请求
///
/// report_date 为空时由存储层按时钟取当天
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDailyReport {
    pub batch_id: i64,
    pub eggs_collected: u32,
    pub eggs_broken: u32,
    pub feed_consumed_kg: Decimal,
    pub mortality: u32,
    pub notes: Option<String>,
    pub responsible: Option<String>,
    pub report_date: Option<NaiveDate>,
}
