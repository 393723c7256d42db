// ==========================================
// 藻类农场管理系统 - 核心库
// ==========================================
// 业务范围: 藻类产品库存台账 + 蛋鸡饲喂对比
// 技术栈: Rust + SQLite
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "es");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装与边界命令
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DietType, ProductCategory};

// 领域实体
pub use domain::{
    DailyFlockReport, DashboardSummary, FlockBatch, GroupPerformance, Product, ProductionEvent,
};

// 引擎
pub use engine::{
    ComparisonService, EngineError, FlockReportStore, InventoryLedger, PerformanceAggregator,
};

// API
pub use api::{CatalogApi, DashboardApi, ExportApi, IngestApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "AlgasBio - Gestión de Planta y Granja";
