// ==========================================
// 藻类农场管理系统 - 库存台账引擎
// ==========================================
// 职责:
// - 接收生产事件: 校验 → 写事件 → 原子增加库存
// - 线性产能外推: stock + capacity × horizon
// 红线: 库存只增不减(本核心无出库路径)
// 红线: 十进制精确运算,不经过浮点
// ==========================================

use crate::domain::product::{Product, ProductionEvent};
use crate::engine::clock::Clock;
use crate::engine::error::{EngineError, EngineResult};
use crate::repository::error::RepositoryError;
use crate::repository::product_repo::ProductRepository;
use crate::repository::production_event_repo::ProductionEventRepository;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

// ==========================================
// InventoryLedger - 库存台账
// ==========================================
pub struct InventoryLedger {
    product_repo: Arc<ProductRepository>,
    event_repo: Arc<ProductionEventRepository>,
    clock: Arc<dyn Clock>,
}

impl InventoryLedger {
    pub fn new(
        product_repo: Arc<ProductRepository>,
        event_repo: Arc<ProductionEventRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            product_repo,
            event_repo,
            clock,
        }
    }

    /// 登记生产并增加库存
    ///
    /// # 参数
    /// - `product_id`: 产品ID
    /// - `quantity`: 产量 (>= 0)
    /// - `responsible`: 负责人
    /// - `event_date`: 实际作业日期; None 时取时钟当天
    ///
    /// # 返回
    /// - Ok(ProductionEvent): 已持久化的不可变事件
    /// - Err(InvalidQuantity): 产量为负,库存不变
    /// - Err(NotFound): 产品不存在
    #[instrument(skip(self), fields(product_id = %product_id, quantity = %quantity))]
    pub fn apply_production(
        &self,
        product_id: i64,
        quantity: Decimal,
        responsible: &str,
        event_date: Option<NaiveDate>,
    ) -> EngineResult<ProductionEvent> {
        if quantity < Decimal::ZERO {
            tracing::warn!(product_id, %quantity, "拒绝负产量");
            return Err(EngineError::InvalidQuantity(format!(
                "产量不能为负: {}",
                quantity
            )));
        }

        let event = ProductionEvent {
            event_id: Uuid::new_v4().to_string(),
            product_id,
            quantity,
            event_date: event_date.unwrap_or_else(|| self.clock.today()),
            created_at: self.clock.now(),
            responsible: responsible.trim().to_string(),
        };

        let updated = self
            .event_repo
            .insert_and_increment_stock(&event)
            .map_err(|e| match e {
                RepositoryError::NotFound { id, .. } => EngineError::NotFound {
                    entity: "产品",
                    id,
                },
                other => EngineError::Repository(other),
            })?;

        tracing::info!(
            product_id,
            event_id = %event.event_id,
            %quantity,
            new_stock = %updated.stock_actual,
            "生产事件已入账"
        );

        Ok(event)
    }

    /// 线性外推 (纯函数)
    pub fn project(&self, product: &Product, horizon_days: u64) -> Decimal {
        product.projected_stock(horizon_days)
    }

    /// 当前库存 (原样返回)
    pub fn current_stock(&self, product: &Product) -> Decimal {
        product.stock_actual
    }

    /// 按ID读取产品
    pub fn get_product(&self, product_id: i64) -> EngineResult<Product> {
        self.product_repo
            .find_by_id(product_id)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "产品",
                id: product_id.to_string(),
            })
    }

    /// 全部产品
    pub fn list_products(&self) -> EngineResult<Vec<Product>> {
        Ok(self.product_repo.list_all()?)
    }
}
