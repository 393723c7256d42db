// ==========================================
// 藻类农场管理系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout,减少并发写入时的偶发 busy 错误
// - 幂等建表(首次启动即可用)
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 幂等建表
///
/// 数量列(库存/产能/产量/饲料)以 TEXT 存储十进制规范字符串,
/// 避免 SQLite REAL 带来的二进制舍入漂移。
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS product (
            product_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            stock_actual TEXT NOT NULL DEFAULT '0',
            capacidad_maxima_diaria TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS production_event (
            event_id TEXT PRIMARY KEY,
            product_id INTEGER NOT NULL REFERENCES product(product_id) ON DELETE CASCADE,
            quantity TEXT NOT NULL,
            event_date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            responsible TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS flock_batch (
            batch_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            diet_type TEXT NOT NULL,
            initial_bird_count INTEGER NOT NULL CHECK (initial_bird_count >= 0),
            start_date TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS daily_flock_report (
            report_id TEXT PRIMARY KEY,
            batch_id INTEGER NOT NULL REFERENCES flock_batch(batch_id) ON DELETE CASCADE,
            report_date TEXT NOT NULL,
            eggs_collected INTEGER NOT NULL CHECK (eggs_collected >= 0),
            eggs_broken INTEGER NOT NULL DEFAULT 0 CHECK (eggs_broken >= 0),
            feed_consumed_kg TEXT NOT NULL,
            mortality INTEGER NOT NULL DEFAULT 0 CHECK (mortality >= 0),
            notes TEXT,
            responsible TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_production_event_order
            ON production_event(event_date, created_at);
        CREATE INDEX IF NOT EXISTS idx_daily_report_batch_date
            ON daily_flock_report(batch_id, report_date);
        CREATE INDEX IF NOT EXISTS idx_daily_report_order
            ON daily_flock_report(report_date, created_at);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}
