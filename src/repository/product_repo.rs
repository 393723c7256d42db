// ==========================================
// 藻类农场管理系统 - 产品数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: 库存写入只走 ProductionEventRepository::insert_and_increment_stock
// ==========================================

use crate::domain::product::{NewProduct, Product};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_codec::{code_at, decimal_at, format_decimal};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

const PRODUCT_COLUMNS: &str =
    "product_id, name, category, stock_actual, capacidad_maxima_diaria";

/// 行映射
pub(crate) fn map_product_row(row: &rusqlite::Row<'_>) -> SqliteResult<Product> {
    Ok(Product {
        product_id: row.get(0)?,
        name: row.get(1)?,
        category: code_at(row, 2)?,
        stock_actual: decimal_at(row, 3)?,
        capacidad_maxima_diaria: decimal_at(row, 4)?,
    })
}

// ==========================================
// ProductRepository - 产品仓储
// ==========================================
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入产品,返回完整实体
    pub fn insert(&self, product: &NewProduct) -> RepositoryResult<Product> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO product (name, category, stock_actual, capacidad_maxima_diaria)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                product.name.trim(),
                product.category.code(),
                format_decimal(product.stock_actual),
                format_decimal(product.capacidad_maxima_diaria),
            ],
        )?;

        Ok(Product {
            product_id: conn.last_insert_rowid(),
            name: product.name.trim().to_string(),
            category: product.category,
            stock_actual: product.stock_actual,
            capacidad_maxima_diaria: product.capacidad_maxima_diaria,
        })
    }

    /// 按ID查询
    ///
    /// # 返回
    /// - Ok(Some(Product)): 找到
    /// - Ok(None): 未找到
    pub fn find_by_id(&self, product_id: i64) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM product WHERE product_id = ?1", PRODUCT_COLUMNS);

        let product = conn
            .query_row(&sql, params![product_id], map_product_row)
            .optional()?;

        Ok(product)
    }

    /// 查询全部产品(按ID升序)
    pub fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM product ORDER BY product_id", PRODUCT_COLUMNS);

        let mut stmt = conn.prepare(&sql)?;
        let products = stmt
            .query_map([], map_product_row)?
            .collect::<SqliteResult<Vec<Product>>>()?;

        Ok(products)
    }
}
