// ==========================================
// 藻类农场管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 所有仓储共享同一个 SQLite 连接
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::{CatalogApi, DashboardApi, ExportApi, IngestApi};
use crate::config::config_manager::ConfigManager;
use crate::config::dashboard_config_trait::DashboardConfigReader;
use crate::engine::{
    Clock, ComparisonService, FlockReportStore, InventoryLedger, SystemClock,
};
use crate::repository::{
    FlockBatchRepository, FlockReportRepository, ProductRepository, ProductionEventRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 库存台账
    pub inventory_ledger: Arc<InventoryLedger>,

    /// 鸡群日报存储
    pub flock_report_store: Arc<FlockReportStore>,

    /// 饲喂对比服务
    pub comparison_service: Arc<ComparisonService>,

    /// 现场录入API
    pub ingest_api: Arc<IngestApi>,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 报表导出API
    pub export_api: Arc<ExportApi>,

    /// 基础资料API
    pub catalog_api: Arc<CatalogApi>,
}

impl AppState {
    /// 创建新的AppState实例 (系统时钟)
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::with_clock(db_path, Arc::new(SystemClock))
    }

    /// 创建AppState并注入时钟 (测试用固定日期)
    pub fn with_clock(db_path: String, clock: Arc<dyn Clock>) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = crate::db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        crate::db::ensure_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        Self::from_connection(db_path, conn, clock)
    }

    /// 基于已有连接组装
    pub fn from_connection(
        db_path: String,
        conn: Arc<Mutex<Connection>>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, String> {
        // ==========================================
        // 初始化Repository层
        // ==========================================
        let product_repo = Arc::new(ProductRepository::new(conn.clone()));
        let event_repo = Arc::new(ProductionEventRepository::new(conn.clone()));
        let batch_repo = Arc::new(FlockBatchRepository::new(conn.clone()));
        let report_repo = Arc::new(FlockReportRepository::new(conn.clone()));

        // 配置管理器
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let config_reader: Arc<dyn DashboardConfigReader> = config_manager.clone();

        // ==========================================
        // 初始化Engine层
        // ==========================================
        let inventory_ledger = Arc::new(InventoryLedger::new(
            product_repo.clone(),
            event_repo.clone(),
            clock.clone(),
        ));
        let flock_report_store = Arc::new(FlockReportStore::new(
            batch_repo.clone(),
            report_repo.clone(),
            clock.clone(),
        ));
        let comparison_service = Arc::new(ComparisonService::new(
            inventory_ledger.clone(),
            flock_report_store.clone(),
            batch_repo.clone(),
            event_repo.clone(),
            clock,
        ));

        // ==========================================
        // 初始化API层
        // ==========================================
        let ingest_api = Arc::new(IngestApi::new(
            inventory_ledger.clone(),
            flock_report_store.clone(),
            config_reader.clone(),
        ));
        let dashboard_api = Arc::new(DashboardApi::new(
            comparison_service.clone(),
            config_reader.clone(),
        ));
        let export_api = Arc::new(ExportApi::new(event_repo, report_repo, config_reader));
        let catalog_api = Arc::new(CatalogApi::new(product_repo, batch_repo));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            config_manager,
            inventory_ledger,
            flock_report_store,
            comparison_service,
            ingest_api,
            dashboard_api,
            export_api,
            catalog_api,
        })
    }
}

/// 默认数据库路径
///
/// 优先级: ALGAE_FARM_DB_PATH 环境变量 → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("ALGAE_FARM_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./algae_farm.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("algae-farm-ops-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("algae-farm-ops");
        }

        // 确保目录存在
        if let Err(e) = std::fs::create_dir_all(&path) {
            tracing::warn!("无法创建数据目录 {:?}: {}", path, e);
            return "./algae_farm.db".to_string();
        }
        path = path.join("algae_farm.db");
    }

    path.to_string_lossy().to_string()
}
