// ==========================================
// 藻类农场管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、读模型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod dashboard;
pub mod flock;
pub mod product;
pub mod types;

// 重导出核心类型
pub use dashboard::{
    DashboardSummary, GroupPerformance, ProductProjection, RecentFlockEntry,
    RecentProductionEntry,
};
pub use flock::{DailyFlockReport, FlockBatch, NewDailyReport, NewFlockBatch};
pub use product::{NewProduct, Product, ProductionEvent};
pub use types::{DietType, ProductCategory, UnknownCodeError};
