// ==========================================
// 藻类农场管理系统 - 产蛋表现聚合引擎
// ==========================================
// 职责: 计算单个饲喂组在窗口内的平均日产蛋率
// 红线: 纯计算,不访问数据库
// ==========================================
// 口径:
// - 无有效日报的批次跳过,不计入任何累加器
// - total_eggs     += Σ eggs_collected
// - total_bird_days += 初始鸡只数 × 日报条数 (按条数,不按日历天数)
// - rate = round(total_eggs / total_bird_days × 100, 2), 否则为 0
// ==========================================

use crate::domain::dashboard::GroupPerformance;
use crate::domain::flock::{DailyFlockReport, FlockBatch};
use crate::domain::types::DietType;
use rust_decimal::{Decimal, RoundingStrategy};

/// 产蛋率保留小数位
pub const RATE_DECIMAL_PLACES: u32 = 2;

/// 产蛋率统一舍入: 2位, 银行家舍入
pub fn round_rate(raw: Decimal) -> Decimal {
    raw.round_dp_with_strategy(RATE_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven)
}

// ==========================================
// PerformanceAggregator - 无状态聚合器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct PerformanceAggregator;

impl PerformanceAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 聚合一个饲喂组
    ///
    /// # 参数
    /// - `diet_type`: 饲喂组
    /// - `groups`: (批次, 该批次窗口内的日报) 序列
    ///
    /// 日报集合已由调用方按截止日期过滤
    pub fn aggregate<'a, I>(&self, diet_type: DietType, groups: I) -> GroupPerformance
    where
        I: IntoIterator<Item = (&'a FlockBatch, &'a [DailyFlockReport])>,
    {
        let mut perf = GroupPerformance::empty(diet_type);

        for (batch, reports) in groups {
            if reports.is_empty() {
                continue;
            }

            let eggs: u64 = reports.iter().map(|r| u64::from(r.eggs_collected)).sum();
            let bird_days =
                u64::from(batch.initial_bird_count).saturating_mul(reports.len() as u64);

            perf.total_eggs = perf.total_eggs.saturating_add(eggs);
            perf.total_bird_days = perf.total_bird_days.saturating_add(bird_days);
            perf.batches_with_data += 1;

            tracing::debug!(
                batch_id = batch.batch_id,
                diet = %diet_type,
                reports = reports.len(),
                eggs,
                bird_days,
                "批次计入聚合"
            );
        }

        perf.laying_rate = Self::rate(perf.total_eggs, perf.total_bird_days, perf.batches_with_data);
        perf
    }

    /// 平均日产蛋率 (%)
    pub fn rate(total_eggs: u64, total_bird_days: u64, batches_with_data: usize) -> Decimal {
        if total_bird_days == 0 || batches_with_data == 0 {
            return Decimal::ZERO;
        }

        let raw = Decimal::from(total_eggs) * Decimal::ONE_HUNDRED / Decimal::from(total_bird_days);
        round_rate(raw)
    }
}
