// ==========================================
// 藻类农场管理系统 - 生产事件数据仓储
// ==========================================
// 红线: 生产事件只追加,不更新不删除
// 红线: 库存读-改-写必须在同一个 IMMEDIATE 事务内完成,
//       同一产品的并发事件串行化,不允许丢失更新
// ==========================================

use crate::domain::dashboard::RecentProductionEntry;
use crate::domain::product::{Product, ProductionEvent};
use crate::domain::types::ProductCategory;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_repo::map_product_row;
use crate::repository::row_codec::{
    code_at, date_at, decimal_at, format_date, format_decimal, format_timestamp, timestamp_at,
};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, TransactionBehavior};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// 生产台账导出行 (事件 + 产品信息)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionLedgerRow {
    pub event_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub product_name: String,
    pub category: ProductCategory,
    pub quantity: Decimal,
    pub responsible: String,
}

// ==========================================
// ProductionEventRepository - 生产事件仓储
// ==========================================
pub struct ProductionEventRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionEventRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入生产事件并原子增加库存
    ///
    /// # 参数
    /// - `event`: 已校验的生产事件 (quantity >= 0)
    ///
    /// # 返回
    /// - Ok(Product): 增加库存后的产品
    /// - Err(NotFound): 产品不存在(事件不会写入)
    pub fn insert_and_increment_stock(
        &self,
        event: &ProductionEvent,
    ) -> RepositoryResult<Product> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let product = tx
            .query_row(
                r#"
                SELECT product_id, name, category, stock_actual, capacidad_maxima_diaria
                FROM product WHERE product_id = ?1
                "#,
                params![event.product_id],
                map_product_row,
            )
            .optional()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Product".to_string(),
                id: event.product_id.to_string(),
            })?;

        let new_stock = product
            .stock_actual
            .checked_add(event.quantity)
            .ok_or_else(|| RepositoryError::FieldValueError {
                field: "stock_actual".to_string(),
                message: format!("库存溢出: {} + {}", product.stock_actual, event.quantity),
            })?;

        tx.execute(
            r#"
            INSERT INTO production_event (
                event_id, product_id, quantity, event_date, created_at, responsible
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                event.event_id,
                event.product_id,
                format_decimal(event.quantity),
                format_date(event.event_date),
                format_timestamp(event.created_at),
                event.responsible,
            ],
        )?;

        tx.execute(
            "UPDATE product SET stock_actual = ?1 WHERE product_id = ?2",
            params![format_decimal(new_stock), event.product_id],
        )?;

        tx.commit()?;

        Ok(Product {
            stock_actual: new_stock,
            ..product
        })
    }

    /// 近期生产动态
    ///
    /// 排序: 作业日期倒序 → 入库时间倒序
    pub fn find_recent(&self, limit: usize) -> RepositoryResult<Vec<RecentProductionEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT e.event_id, e.product_id, p.name, e.quantity,
                   e.event_date, e.created_at, e.responsible
            FROM production_event e
            JOIN product p ON p.product_id = e.product_id
            ORDER BY e.event_date DESC, e.created_at DESC, e.rowid DESC
            LIMIT ?1
            "#,
        )?;

        let entries = stmt
            .query_map(params![limit as i64], |row| {
                Ok(RecentProductionEntry {
                    event_id: row.get(0)?,
                    product_id: row.get(1)?,
                    product_name: row.get(2)?,
                    quantity: decimal_at(row, 3)?,
                    event_date: date_at(row, 4)?,
                    created_at: timestamp_at(row, 5)?,
                    responsible: row.get(6)?,
                })
            })?
            .collect::<SqliteResult<Vec<RecentProductionEntry>>>()?;

        Ok(entries)
    }

    /// 全量生产台账(导出用,作业日期倒序)
    pub fn list_ledger_desc(&self) -> RepositoryResult<Vec<ProductionLedgerRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT e.event_date, e.created_at, p.name, p.category, e.quantity, e.responsible
            FROM production_event e
            JOIN product p ON p.product_id = e.product_id
            ORDER BY e.event_date DESC, e.created_at DESC, e.rowid DESC
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ProductionLedgerRow {
                    event_date: date_at(row, 0)?,
                    created_at: timestamp_at(row, 1)?,
                    product_name: row.get(2)?,
                    category: code_at(row, 3)?,
                    quantity: decimal_at(row, 4)?,
                    responsible: row.get(5)?,
                })
            })?
            .collect::<SqliteResult<Vec<ProductionLedgerRow>>>()?;

        Ok(rows)
    }
}
