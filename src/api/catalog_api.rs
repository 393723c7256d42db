// ==========================================
// 藻类农场管理系统 - 基础资料 API
// ==========================================
// 职责: 管理面板的产品/批次登记与查询
// - 产品: 名称非空, 库存与产能 >= 0
// - 批次: 名称非空, 初始鸡只数 > 0
// - 批次停用是唯一的批次状态变更
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::flock::{FlockBatch, NewFlockBatch};
use crate::domain::product::{NewProduct, Product};
use crate::repository::flock_batch_repo::FlockBatchRepository;
use crate::repository::product_repo::ProductRepository;
use rust_decimal::Decimal;
use std::sync::Arc;

pub struct CatalogApi {
    product_repo: Arc<ProductRepository>,
    batch_repo: Arc<FlockBatchRepository>,
}

impl CatalogApi {
    pub fn new(product_repo: Arc<ProductRepository>, batch_repo: Arc<FlockBatchRepository>) -> Self {
        Self {
            product_repo,
            batch_repo,
        }
    }

    /// 登记产品
    pub fn register_product(&self, product: NewProduct) -> ApiResult<Product> {
        if product.stock_actual < Decimal::ZERO || product.capacidad_maxima_diaria < Decimal::ZERO {
            return Err(ApiError::InvalidQuantity(format!(
                "库存与产能不能为负: stock={}, capacity={}",
                product.stock_actual, product.capacidad_maxima_diaria
            )));
        }
        product.validate().map_err(ApiError::InvalidParameter)?;

        let created = self.product_repo.insert(&product)?;
        tracing::info!(product_id = created.product_id, name = %created.name, "产品已登记");
        Ok(created)
    }

    /// 登记鸡群批次
    pub fn register_batch(&self, batch: NewFlockBatch) -> ApiResult<FlockBatch> {
        batch.validate().map_err(ApiError::InvalidParameter)?;

        let created = self.batch_repo.insert(&batch)?;
        tracing::info!(
            batch_id = created.batch_id,
            diet = %created.diet_type,
            birds = created.initial_bird_count,
            "鸡群批次已登记"
        );
        Ok(created)
    }

    /// 全部产品 (录入表单下拉)
    pub fn list_products(&self) -> ApiResult<Vec<Product>> {
        Ok(self.product_repo.list_all()?)
    }

    /// 活跃批次 (录入表单下拉)
    pub fn list_active_batches(&self) -> ApiResult<Vec<FlockBatch>> {
        Ok(self.batch_repo.list_active()?)
    }

    /// 停用批次
    pub fn deactivate_batch(&self, batch_id: i64) -> ApiResult<()> {
        self.batch_repo.set_active(batch_id, false)?;
        tracing::info!(batch_id, "鸡群批次已停用");
        Ok(())
    }
}
