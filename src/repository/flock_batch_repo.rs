// ==========================================
// 藻类农场管理系统 - 鸡群批次数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: 停用批次不级联删除历史日报
// ==========================================

use crate::domain::flock::{FlockBatch, NewFlockBatch};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_codec::{code_at, date_at, format_date};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

const BATCH_COLUMNS: &str =
    "batch_id, name, diet_type, initial_bird_count, start_date, active";

fn map_batch_row(row: &rusqlite::Row<'_>) -> SqliteResult<FlockBatch> {
    Ok(FlockBatch {
        batch_id: row.get(0)?,
        name: row.get(1)?,
        diet_type: code_at(row, 2)?,
        initial_bird_count: row.get(3)?,
        start_date: date_at(row, 4)?,
        active: row.get(5)?,
    })
}

// ==========================================
// FlockBatchRepository - 鸡群批次仓储
// ==========================================
pub struct FlockBatchRepository {
    conn: Arc<Mutex<Connection>>,
}

impl FlockBatchRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入批次(默认启用)
    pub fn insert(&self, batch: &NewFlockBatch) -> RepositoryResult<FlockBatch> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO flock_batch (name, diet_type, initial_bird_count, start_date, active)
            VALUES (?1, ?2, ?3, ?4, 1)
            "#,
            params![
                batch.name.trim(),
                batch.diet_type.code(),
                batch.initial_bird_count,
                format_date(batch.start_date),
            ],
        )?;

        Ok(FlockBatch {
            batch_id: conn.last_insert_rowid(),
            name: batch.name.trim().to_string(),
            diet_type: batch.diet_type,
            initial_bird_count: batch.initial_bird_count,
            start_date: batch.start_date,
            active: true,
        })
    }

    pub fn find_by_id(&self, batch_id: i64) -> RepositoryResult<Option<FlockBatch>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM flock_batch WHERE batch_id = ?1", BATCH_COLUMNS);

        let batch = conn
            .query_row(&sql, params![batch_id], map_batch_row)
            .optional()?;

        Ok(batch)
    }

    /// 查询全部启用批次
    pub fn list_active(&self) -> RepositoryResult<Vec<FlockBatch>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM flock_batch WHERE active = 1 ORDER BY batch_id",
            BATCH_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let batches = stmt
            .query_map([], map_batch_row)?
            .collect::<SqliteResult<Vec<FlockBatch>>>()?;

        Ok(batches)
    }

    /// 设置启用标志(外部管理动作)
    ///
    /// # 返回
    /// - Err(NotFound): 批次不存在
    pub fn set_active(&self, batch_id: i64, active: bool) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE flock_batch SET active = ?1 WHERE batch_id = ?2",
            params![active, batch_id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "FlockBatch".to_string(),
                id: batch_id.to_string(),
            });
        }
        Ok(())
    }
}
