// ==========================================
// 藻类农场管理系统 - 鸡群日报数据仓储
// ==========================================
// 红线: 日报只追加,不更新不删除
// ==========================================

use crate::domain::flock::{DailyFlockReport, FlockBatch};
use crate::domain::types::DietType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_codec::{
    code_at, date_at, decimal_at, format_date, format_decimal, format_timestamp, timestamp_at,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// 鸡群日报导出行 (日报 + 批次信息)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlockLedgerRow {
    pub report_date: NaiveDate,
    pub batch_name: String,
    pub diet_type: DietType,
    pub eggs_collected: u32,
    pub feed_consumed_kg: Decimal,
    pub mortality: u32,
    pub responsible: Option<String>,
    pub notes: Option<String>,
}

const REPORT_COLUMNS: &str = "report_id, batch_id, report_date, eggs_collected, eggs_broken, \
     feed_consumed_kg, mortality, notes, responsible, created_at";

fn map_report_row(row: &rusqlite::Row<'_>) -> SqliteResult<DailyFlockReport> {
    Ok(DailyFlockReport {
        report_id: row.get(0)?,
        batch_id: row.get(1)?,
        report_date: date_at(row, 2)?,
        eggs_collected: row.get(3)?,
        eggs_broken: row.get(4)?,
        feed_consumed_kg: decimal_at(row, 5)?,
        mortality: row.get(6)?,
        notes: row.get(7)?,
        responsible: row.get(8)?,
        created_at: timestamp_at(row, 9)?,
    })
}

// ==========================================
// FlockReportRepository - 鸡群日报仓储
// ==========================================
pub struct FlockReportRepository {
    conn: Arc<Mutex<Connection>>,
}

impl FlockReportRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入日报
    ///
    /// 批次不存在时由外键约束拒绝 (ForeignKeyViolation)
    pub fn insert(&self, report: &DailyFlockReport) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO daily_flock_report (
                report_id, batch_id, report_date, eggs_collected, eggs_broken,
                feed_consumed_kg, mortality, notes, responsible, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                report.report_id,
                report.batch_id,
                format_date(report.report_date),
                report.eggs_collected,
                report.eggs_broken,
                format_decimal(report.feed_consumed_kg),
                report.mortality,
                report.notes,
                report.responsible,
                format_timestamp(report.created_at),
            ],
        )?;

        Ok(())
    }

    /// 查询批次在截止日期(含)之后的日报
    pub fn find_by_batch_since(
        &self,
        batch_id: i64,
        cutoff_date: NaiveDate,
    ) -> RepositoryResult<Vec<DailyFlockReport>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM daily_flock_report \
             WHERE batch_id = ?1 AND report_date >= ?2 \
             ORDER BY report_date, created_at, rowid",
            REPORT_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let reports = stmt
            .query_map(params![batch_id, format_date(cutoff_date)], map_report_row)?
            .collect::<SqliteResult<Vec<DailyFlockReport>>>()?;

        Ok(reports)
    }

    /// 近期鸡群日报动态 (附所属批次)
    ///
    /// 排序: 日报日期倒序 → 入库时间倒序
    pub fn find_recent(
        &self,
        limit: usize,
    ) -> RepositoryResult<Vec<(FlockBatch, DailyFlockReport)>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT r.report_id, r.batch_id, r.report_date, r.eggs_collected, r.eggs_broken,
                   r.feed_consumed_kg, r.mortality, r.notes, r.responsible, r.created_at,
                   b.name, b.diet_type, b.initial_bird_count, b.start_date, b.active
            FROM daily_flock_report r
            JOIN flock_batch b ON b.batch_id = r.batch_id
            ORDER BY r.report_date DESC, r.created_at DESC, r.rowid DESC
            LIMIT ?1
            "#,
        )?;

        let entries = stmt
            .query_map(params![limit as i64], |row| {
                let report = map_report_row(row)?;
                let batch = FlockBatch {
                    batch_id: report.batch_id,
                    name: row.get(10)?,
                    diet_type: code_at(row, 11)?,
                    initial_bird_count: row.get(12)?,
                    start_date: date_at(row, 13)?,
                    active: row.get(14)?,
                };
                Ok((batch, report))
            })?
            .collect::<SqliteResult<Vec<(FlockBatch, DailyFlockReport)>>>()?;

        Ok(entries)
    }

    /// 全量日报台账(导出用,日期倒序)
    pub fn list_ledger_desc(&self) -> RepositoryResult<Vec<FlockLedgerRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT r.report_date, b.name, b.diet_type, r.eggs_collected,
                   r.feed_consumed_kg, r.mortality, r.responsible, r.notes
            FROM daily_flock_report r
            JOIN flock_batch b ON b.batch_id = r.batch_id
            ORDER BY r.report_date DESC, r.created_at DESC, r.rowid DESC
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(FlockLedgerRow {
                    report_date: date_at(row, 0)?,
                    batch_name: row.get(1)?,
                    diet_type: code_at(row, 2)?,
                    eggs_collected: row.get(3)?,
                    feed_consumed_kg: decimal_at(row, 4)?,
                    mortality: row.get(5)?,
                    responsible: row.get(6)?,
                    notes: row.get(7)?,
                })
            })?
            .collect::<SqliteResult<Vec<FlockLedgerRow>>>()?;

        Ok(rows)
    }
}
