// ==========================================
// 藻类农场管理系统 - 鸡群日报存储引擎
// ==========================================
// 职责:
// - 校验并记录鸡群日报 (只追加)
// - 按批次+截止日期读取日报
// - 近期日报动态 (附单条产蛋率)
// 业务口径: 不限制产蛋数 ≤ 鸡只数, 现场多报照单全收
// ==========================================

use crate::domain::dashboard::RecentFlockEntry;
use crate::domain::flock::{DailyFlockReport, FlockBatch, NewDailyReport};
use crate::engine::clock::Clock;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::performance::round_rate;
use crate::repository::flock_batch_repo::FlockBatchRepository;
use crate::repository::flock_report_repo::FlockReportRepository;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

// ==========================================
// FlockReportStore - 鸡群日报存储
// ==========================================
pub struct FlockReportStore {
    batch_repo: Arc<FlockBatchRepository>,
    report_repo: Arc<FlockReportRepository>,
    clock: Arc<dyn Clock>,
}

impl FlockReportStore {
    pub fn new(
        batch_repo: Arc<FlockBatchRepository>,
        report_repo: Arc<FlockReportRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            batch_repo,
            report_repo,
            clock,
        }
    }

    /// 记录一条日报
    ///
    /// 整数字段由 u32 保证非负; feed_consumed_kg 需 >= 0;
    /// report_date 缺省取时钟当天
    #[instrument(skip(self, input), fields(batch_id = %input.batch_id, eggs = %input.eggs_collected))]
    pub fn record_daily_report(&self, input: NewDailyReport) -> EngineResult<DailyFlockReport> {
        if input.feed_consumed_kg < Decimal::ZERO {
            tracing::warn!(batch_id = input.batch_id, feed = %input.feed_consumed_kg, "拒绝负饲料量");
            return Err(EngineError::InvalidQuantity(format!(
                "饲料消耗不能为负: {}",
                input.feed_consumed_kg
            )));
        }

        let batch = self.require_batch(input.batch_id)?;

        let report = DailyFlockReport {
            report_id: Uuid::new_v4().to_string(),
            batch_id: batch.batch_id,
            report_date: input.report_date.unwrap_or_else(|| self.clock.today()),
            eggs_collected: input.eggs_collected,
            eggs_broken: input.eggs_broken,
            feed_consumed_kg: input.feed_consumed_kg,
            mortality: input.mortality,
            notes: input.notes,
            responsible: input.responsible,
            created_at: self.clock.now(),
        };

        if report.eggs_collected > batch.initial_bird_count {
            // 多报不拦截,只留痕
            tracing::debug!(
                batch_id = batch.batch_id,
                eggs = report.eggs_collected,
                birds = batch.initial_bird_count,
                "产蛋数超过批次鸡只数"
            );
        }

        self.report_repo.insert(&report)?;

        tracing::info!(
            batch_id = batch.batch_id,
            report_id = %report.report_id,
            report_date = %report.report_date,
            eggs = report.eggs_collected,
            "鸡群日报已记录"
        );

        Ok(report)
    }

    /// 批次在截止日期(含)之后的全部日报
    ///
    /// 返回有限集合,可重复遍历; 调用方不应依赖顺序
    pub fn reports_for_batch_since(
        &self,
        batch_id: i64,
        cutoff_date: NaiveDate,
    ) -> EngineResult<Vec<DailyFlockReport>> {
        Ok(self.report_repo.find_by_batch_since(batch_id, cutoff_date)?)
    }

    /// 最近 limit 条日报, 日期倒序 → 入库时间倒序
    pub fn recent_reports(&self, limit: usize) -> EngineResult<Vec<RecentFlockEntry>> {
        let entries = self
            .report_repo
            .find_recent(limit)?
            .into_iter()
            .map(|(batch, report)| RecentFlockEntry {
                laying_rate: round_rate(report.laying_rate(&batch)),
                report_id: report.report_id,
                batch_id: batch.batch_id,
                batch_name: batch.name,
                diet_type: batch.diet_type,
                report_date: report.report_date,
                created_at: report.created_at,
                eggs_collected: report.eggs_collected,
                feed_consumed_kg: report.feed_consumed_kg,
                mortality: report.mortality,
                notes: report.notes,
            })
            .collect();

        Ok(entries)
    }

    fn require_batch(&self, batch_id: i64) -> EngineResult<FlockBatch> {
        self.batch_repo
            .find_by_id(batch_id)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "批次",
                id: batch_id.to_string(),
            })
    }
}
