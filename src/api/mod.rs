// ==========================================
// 藻类农场管理系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令层 (app::commands) 调用
// ==========================================

pub mod catalog_api;
pub mod dashboard_api;
pub mod error;
pub mod export_api;
pub mod ingest_api;

// 重导出核心类型
pub use catalog_api::CatalogApi;
pub use dashboard_api::{parse_window_param, DashboardApi, DashboardView, StockChartSeries};
pub use error::{ApiError, ApiResult};
pub use export_api::{ExportApi, ExportCell, TabularExport};
pub use ingest_api::{
    attribution_note, FlockSubmission, IngestAck, IngestApi, ProductionSubmission,
    SubmissionKind, SyncOutcome, SyncReport,
};
