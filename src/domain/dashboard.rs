// ==========================================
// 藻类农场管理系统 - 驾驶舱读模型
// ==========================================
// 只读汇总结构,由对比服务组装,不引起任何写入
// ==========================================

use crate::domain::types::{DietType, ProductCategory};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 单个产品的当前库存与窗口外推
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductProjection {
    pub product_id: i64,
    pub name: String,
    pub category: ProductCategory,
    pub category_label: String,
    pub current_stock: Decimal,
    pub projected_stock: Decimal,
}

/// 单个饲喂组在窗口内的表现
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPerformance {
    pub diet_type: DietType,
    pub total_eggs: u64,
    pub total_bird_days: u64,
    pub batches_with_data: usize,
    pub laying_rate: Decimal, // 平均日产蛋率 (%), 保留2位
}

impl GroupPerformance {
    pub fn empty(diet_type: DietType) -> Self {
        Self {
            diet_type,
            total_eggs: 0,
            total_bird_days: 0,
            batches_with_data: 0,
            laying_rate: Decimal::ZERO,
        }
    }
}

/// 近期生产动态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentProductionEntry {
    pub event_id: String,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: Decimal,
    pub event_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub responsible: String,
}

/// 近期鸡群日报动态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentFlockEntry {
    pub report_id: String,
    pub batch_id: i64,
    pub batch_name: String,
    pub diet_type: DietType,
    pub report_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub eggs_collected: u32,
    pub laying_rate: Decimal, // 当日产蛋率 (%), 保留2位
    pub feed_consumed_kg: Decimal,
    pub mortality: u32,
    pub notes: Option<String>,
}

/// 驾驶舱汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub window_days: u64,
    pub cutoff_date: NaiveDate,
    pub products: Vec<ProductProjection>,
    pub experimental: GroupPerformance,
    pub control: GroupPerformance,
    pub winner: DietType,
    pub recent_production: Vec<RecentProductionEntry>,
    pub recent_flock_reports: Vec<RecentFlockEntry>,
}
