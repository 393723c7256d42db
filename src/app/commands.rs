// ==========================================
// 藻类农场管理系统 - 边界命令
// ==========================================
// 职责: 与传输层无关的请求处理函数 (HTTP/CLI 均可挂接)
// 约定:
// - 成功: 200 {"status":"ok","mensaje":...}
// - 非 POST 写入: 405
// - 窗口参数错误: 400
// - 其余任何失败: 500 {"status":"error","mensaje":...}
//   现场录入绝不能因为异常中断采集流程
// ==========================================

use crate::api::dashboard_api::parse_window_param;
use crate::api::error::ApiError;
use crate::app::state::AppState;
use crate::config::dashboard_config_trait::DashboardConfigReader;
use crate::i18n;
use serde::Serialize;
use serde_json::{json, Value};

/// 命令响应
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResponse {
    pub status: u16,
    pub body: Value,
}

impl CommandResponse {
    pub fn ok(mensaje: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: json!({ "status": "ok", "mensaje": mensaje.into() }),
        }
    }

    pub fn ok_with(data: Value) -> Self {
        Self {
            status: 200,
            body: json!({ "status": "ok", "data": data }),
        }
    }

    pub fn error(status: u16, err: &ApiError) -> Self {
        Self {
            status,
            body: json!({
                "status": "error",
                "codigo": err.code(),
                "mensaje": err.to_string(),
            }),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

fn is_post(method: &str) -> bool {
    method.trim().eq_ignore_ascii_case("POST")
}

async fn method_not_allowed(state: &AppState) -> CommandResponse {
    let locale = state
        .config_manager
        .get_locale()
        .await
        .unwrap_or_else(|_| i18n::DEFAULT_LOCALE.to_string());
    CommandResponse {
        status: 405,
        body: json!({
            "status": "error",
            "mensaje": i18n::t_in(&locale, "common.method_not_allowed"),
        }),
    }
}

/// 录入失败统一折叠为 500
fn fail_soft(endpoint: &str, err: ApiError) -> CommandResponse {
    tracing::warn!(endpoint, code = err.code(), error = %err, "录入失败");
    CommandResponse::error(500, &err)
}

// ==========================================
// 录入命令
// ==========================================

/// 生产录入
pub async fn save_production(state: &AppState, method: &str, body: &str) -> CommandResponse {
    if !is_post(method) {
        return method_not_allowed(state).await;
    }

    match state.ingest_api.submit_production(body).await {
        Ok(ack) => CommandResponse::ok(ack.message),
        Err(e) => fail_soft("guardar-produccion", e),
    }
}

/// 鸡群日报录入
pub async fn save_flock_report(state: &AppState, method: &str, body: &str) -> CommandResponse {
    if !is_post(method) {
        return method_not_allowed(state).await;
    }

    match state.ingest_api.submit_flock_report(body).await {
        Ok(ack) => CommandResponse::ok(ack.message),
        Err(e) => fail_soft("guardar-granja", e),
    }
}

/// 离线队列回放
///
/// 批次本身可解析即返回 200, 各条结果在 outcomes 中
pub async fn sync_offline(state: &AppState, method: &str, body: &str) -> CommandResponse {
    if !is_post(method) {
        return method_not_allowed(state).await;
    }

    match state.ingest_api.sync_offline_batch(body).await {
        Ok(report) => CommandResponse {
            status: 200,
            body: json!({
                "status": "ok",
                "mensaje": report.message,
                "total": report.total,
                "synced": report.synced,
                "outcomes": report.outcomes,
            }),
        },
        Err(e) => fail_soft("sincronizar", e),
    }
}

// ==========================================
// 查询命令
// ==========================================

/// 驾驶舱 (?dias=N)
pub async fn dashboard(state: &AppState, window_param: Option<&str>) -> CommandResponse {
    let window_days = match window_param.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match parse_window_param(raw) {
            Ok(days) => Some(days),
            Err(e) => return CommandResponse::error(400, &e),
        },
        None => None,
    };

    match state.dashboard_api.get_dashboard(window_days).await {
        Ok(view) => match serde_json::to_value(&view) {
            Ok(data) => CommandResponse::ok_with(data),
            Err(e) => CommandResponse::error(500, &ApiError::InternalError(format!("序列化失败: {}", e))),
        },
        Err(e @ ApiError::InvalidParameter(_)) => CommandResponse::error(400, &e),
        Err(e) => {
            tracing::error!(error = %e, "驾驶舱查询失败");
            CommandResponse::error(500, &e)
        }
    }
}

/// 生产台账 CSV
pub async fn export_production_csv(state: &AppState) -> CommandResponse {
    export_response(state.export_api.export_production().await)
}

/// 鸡群日报 CSV
pub async fn export_flock_csv(state: &AppState) -> CommandResponse {
    export_response(state.export_api.export_flock_reports().await)
}

fn export_response(
    export: Result<crate::api::export_api::TabularExport, ApiError>,
) -> CommandResponse {
    let result = export.and_then(|table| {
        let csv = table.to_csv_string()?;
        Ok((table.file_name, table.rows.len(), csv))
    });

    match result {
        Ok((file_name, rows, csv)) => CommandResponse::ok_with(json!({
            "file_name": format!("{}.csv", file_name),
            "content_type": "text/csv",
            "rows": rows,
            "csv": csv,
        })),
        Err(e) => {
            tracing::error!(error = %e, "导出失败");
            CommandResponse::error(500, &e)
        }
    }
}
