// ==========================================
// 藻类农场管理系统 - 产品与生产事件领域模型
// ==========================================
// 红线: 库存与日产能不得为负,违规只能被拒绝,不做静默截断
// 红线: 数量一律使用十进制定点数,浮点只出现在展示/导出边界
// ==========================================

use crate::domain::types::ProductCategory;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// Product - 产品
// ==========================================
// stock_actual 只能由库存台账的 apply_production 修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    pub category: ProductCategory,
    pub stock_actual: Decimal,            // 当前库存 (kg/L)
    pub capacidad_maxima_diaria: Decimal, // 日最大产能 (kg/L)
}

impl Product {
    /// 线性产能外推: stock + capacity × horizon_days
    ///
    /// 产能在整个外推期内视为常数,不做趋势拟合。
    /// 超大窗口(全量历史)下使用饱和运算,不会溢出 panic。
    pub fn projected_stock(&self, horizon_days: u64) -> Decimal {
        let added = self
            .capacidad_maxima_diaria
            .saturating_mul(Decimal::from(horizon_days));
        self.stock_actual.saturating_add(added)
    }
}

/// 新建产品请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: ProductCategory,
    pub stock_actual: Decimal,
    pub capacidad_maxima_diaria: Decimal,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("产品名称不能为空".to_string());
        }
        if self.stock_actual < Decimal::ZERO {
            return Err(format!("库存不能为负: {}", self.stock_actual));
        }
        if self.capacidad_maxima_diaria < Decimal::ZERO {
            return Err(format!("日产能不能为负: {}", self.capacidad_maxima_diaria));
        }
        Ok(())
    }
}

// ==========================================
// ProductionEvent - 生产事件
// ==========================================
// 创建后不可变; event_date 可回填(离线采集)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionEvent {
    pub event_id: String,
    pub product_id: i64,
    pub quantity: Decimal,         // 产量 (kg/L)
    pub event_date: NaiveDate,     // 实际作业日期
    pub created_at: NaiveDateTime, // 系统入库时间
    pub responsible: String,       // 负责人
}
