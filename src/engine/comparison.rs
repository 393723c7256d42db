// ==========================================
// 藻类农场管理系统 - 饲喂对比服务
// ==========================================
// 职责: 组装驾驶舱汇总 (只读)
// 流程:
// 1. cutoff = today - window_days
// 2. 全部产品: 当前库存 + 窗口外推
// 3. 活跃批次按饲喂方案分为实验组/对照组
// 4. 两组分别聚合产蛋率
// 5. 胜出组: experimental > control 才判实验组, 持平判对照组
// 6. 近期动态: 各取最近 5 条
// ==========================================

use crate::domain::dashboard::{DashboardSummary, GroupPerformance, ProductProjection};
use crate::domain::flock::{DailyFlockReport, FlockBatch};
use crate::domain::types::DietType;
use crate::engine::clock::Clock;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::flock_report_store::FlockReportStore;
use crate::engine::inventory_ledger::InventoryLedger;
use crate::engine::performance::PerformanceAggregator;
use crate::repository::error::RepositoryError;
use crate::repository::flock_batch_repo::FlockBatchRepository;
use crate::repository::production_event_repo::ProductionEventRepository;
use chrono::{Days, NaiveDate};
use std::sync::Arc;
use tracing::instrument;

/// 近期动态条数
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// 胜出规则: 实验组严格大于对照组才胜出
pub fn pick_winner(experimental: &GroupPerformance, control: &GroupPerformance) -> DietType {
    if experimental.laying_rate > control.laying_rate {
        DietType::ExperimentalAlgae
    } else {
        DietType::Control
    }
}

/// 计算窗口截止日期
///
/// 负窗口 → InvalidParameter; 超出日历下限时取 NaiveDate::MIN
pub fn cutoff_for_window(today: NaiveDate, window_days: i64) -> EngineResult<NaiveDate> {
    if window_days < 0 {
        return Err(EngineError::InvalidParameter(format!(
            "时间窗口不能为负: {}",
            window_days
        )));
    }
    Ok(today
        .checked_sub_days(Days::new(window_days as u64))
        .unwrap_or(NaiveDate::MIN))
}

// ==========================================
// ComparisonService - 对比服务
// ==========================================
pub struct ComparisonService {
    ledger: Arc<InventoryLedger>,
    report_store: Arc<FlockReportStore>,
    batch_repo: Arc<FlockBatchRepository>,
    event_repo: Arc<ProductionEventRepository>,
    aggregator: PerformanceAggregator,
    clock: Arc<dyn Clock>,
}

impl ComparisonService {
    pub fn new(
        ledger: Arc<InventoryLedger>,
        report_store: Arc<FlockReportStore>,
        batch_repo: Arc<FlockBatchRepository>,
        event_repo: Arc<ProductionEventRepository>,
            clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger,
            report_store,
            batch_repo,
            event_repo,
            aggregator: PerformanceAggregator::new(),
            clock,
        }
    }

    /// 组装驾驶舱汇总
    ///
    /// # 参数
    /// - `window_days`: 窗口天数, 必须 >= 0, 无上限
    #[instrument(skip(self), fields(window_days = %window_days))]
    pub fn build_dashboard(&self, window_days: i64) -> EngineResult<DashboardSummary> {
        let today = self.clock.today();
        let cutoff_date = cutoff_for_window(today, window_days)?;
        let horizon = window_days as u64;

        // 产品外推
        let products = self
            .ledger
            .list_products()?
            .into_iter()
            .map(|p| ProductProjection {
                product_id: p.product_id,
                category: p.category,
                category_label: p.category.label().to_string(),
                current_stock: self.ledger.current_stock(&p),
                projected_stock: self.ledger.project(&p, horizon),
                name: p.name,
            })
            .collect();

        // 按饲喂方案分组
        // 存储中出现未知饲喂代码属于数据完整性问题
        let active = self.batch_repo.list_active().map_err(|e| match e {
            RepositoryError::FieldValueError { field, message } => {
                EngineError::InvalidState(format!("批次饲喂方案无法识别 ({}): {}", field, message))
            }
            other => EngineError::Repository(other),
        })?;
        let (experimental_batches, control_batches) = partition_by_diet(active);

        let experimental =
            self.aggregate_group(DietType::ExperimentalAlgae, &experimental_batches, cutoff_date)?;
        let control = self.aggregate_group(DietType::Control, &control_batches, cutoff_date)?;
        let winner = pick_winner(&experimental, &control);

        let recent_production = self.event_repo.find_recent(RECENT_ACTIVITY_LIMIT)?;
        let recent_flock_reports = self.report_store.recent_reports(RECENT_ACTIVITY_LIMIT)?;

        tracing::info!(
            window_days,
            %cutoff_date,
            experimental_rate = %experimental.laying_rate,
            control_rate = %control.laying_rate,
            %winner,
            "驾驶舱汇总完成"
        );

        Ok(DashboardSummary {
            window_days: horizon,
            cutoff_date,
            products,
            experimental,
            control,
            winner,
            recent_production,
            recent_flock_reports,
        })
    }

    fn aggregate_group(
        &self,
        diet_type: DietType,
        batches: &[FlockBatch],
        cutoff_date: NaiveDate,
    ) -> EngineResult<GroupPerformance> {
        let mut fetched: Vec<(&FlockBatch, Vec<DailyFlockReport>)> =
            Vec::with_capacity(batches.len());
        for batch in batches {
            let reports = self
                .report_store
                .reports_for_batch_since(batch.batch_id, cutoff_date)?;
            fetched.push((batch, reports));
        }

        Ok(self.aggregator.aggregate(
            diet_type,
            fetched.iter().map(|(b, r)| (*b, r.as_slice())),
        ))
    }
}

/// 活跃批次分为 (实验组, 对照组)
fn partition_by_diet(batches: Vec<FlockBatch>) -> (Vec<FlockBatch>, Vec<FlockBatch>) {
    let mut experimental = Vec::new();
    let mut control = Vec::new();

    for batch in batches {
        match batch.diet_type {
            DietType::ExperimentalAlgae => experimental.push(batch),
            DietType::Control => control.push(batch),
        }
    }

    (experimental, control)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn perf(diet: DietType, rate: i64) -> GroupPerformance {
        GroupPerformance {
            laying_rate: Decimal::new(rate, 2),
            ..GroupPerformance::empty(diet)
        }
    }

    #[test]
    fn test_tie_goes_to_control() {
        let e = perf(DietType::ExperimentalAlgae, 5000);
        let c = perf(DietType::Control, 5000);
        assert_eq!(pick_winner(&e, &c), DietType::Control);
    }

    #[test]
    fn test_strictly_greater_experimental_wins() {
        let e = perf(DietType::ExperimentalAlgae, 5001);
        let c = perf(DietType::Control, 5000);
        assert_eq!(pick_winner(&e, &c), DietType::ExperimentalAlgae);
        assert_eq!(pick_winner(&c, &e), DietType::Control);
    }

    #[test]
    fn test_cutoff_for_window() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        assert_eq!(
            cutoff_for_window(today, 30).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
        assert_eq!(cutoff_for_window(today, 0).unwrap(), today);
        assert_eq!(cutoff_for_window(today, i64::MAX).unwrap(), NaiveDate::MIN);
        assert!(matches!(
            cutoff_for_window(today, -1),
            Err(EngineError::InvalidParameter(_))
        ));
    }
}
