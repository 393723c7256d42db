// ==========================================
// 藻类农场管理系统 - 引擎层
// ==========================================
// 职责: 实现业务规则,不拼 SQL
// 红线: 数量运算一律用 Decimal
// 红线: "今天" 只来自注入的 Clock
// ==========================================

pub mod clock;
pub mod comparison;
pub mod error;
pub mod flock_report_store;
pub mod inventory_ledger;
pub mod performance;

// 重导出核心引擎
pub use clock::{Clock, FixedClock, SystemClock};
pub use comparison::{cutoff_for_window, pick_winner, ComparisonService, RECENT_ACTIVITY_LIMIT};
pub use error::{EngineError, EngineResult};
pub use flock_report_store::FlockReportStore;
pub use inventory_ledger::InventoryLedger;
pub use performance::{round_rate, PerformanceAggregator, RATE_DECIMAL_PLACES};
