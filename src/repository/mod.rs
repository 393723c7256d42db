// ==========================================
// 藻类农场管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod flock_batch_repo;
pub mod flock_report_repo;
pub mod product_repo;
pub mod production_event_repo;
pub mod row_codec;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use flock_batch_repo::FlockBatchRepository;
pub use flock_report_repo::{FlockLedgerRow, FlockReportRepository};
pub use product_repo::ProductRepository;
pub use production_event_repo::{ProductionEventRepository, ProductionLedgerRow};
