// ==========================================
// 藻类农场管理系统 - 现场录入 API
// ==========================================
// 职责:
// - 解析一条 JSON 录入 (生产 / 鸡群日报)
// - 调用库存台账 / 日报存储
// - 离线队列批量回放
// 约定:
// - 字段同时接受英文名与现场表单的西语名
// - 数值字段接受 JSON 数字或数字字符串, 十进制按文本解析
// - 显式给出日期即视为离线补录, 备注追加 "(Offline)"
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::dashboard_config_trait::DashboardConfigReader;
use crate::domain::flock::NewDailyReport;
use crate::engine::flock_report_store::FlockReportStore;
use crate::engine::inventory_ledger::InventoryLedger;
use crate::i18n;
use chrono::{DateTime, NaiveDate};
use futures::future::join_all;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;

/// 产量列位数上限 (含2位小数)
const QUANTITY_MAX_DIGITS: u32 = 10;
/// 饲料列位数上限 (含2位小数)
const FEED_MAX_DIGITS: u32 = 6;
const DECIMAL_PLACES: u32 = 2;

// ==========================================
// 请求结构
// ==========================================

#[derive(Debug, Deserialize)]
struct RawProductionSubmission {
    #[serde(default, alias = "producto_id")]
    product_id: Option<Value>,
    #[serde(default, alias = "cantidad")]
    quantity: Option<Value>,
    #[serde(default, alias = "responsable")]
    responsible: Option<String>,
    #[serde(default, alias = "fecha_registro")]
    report_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFlockSubmission {
    #[serde(default, alias = "lote_id")]
    batch_id: Option<Value>,
    #[serde(default, alias = "huevos")]
    eggs_collected: Option<Value>,
    #[serde(default, alias = "huevos_rotos")]
    eggs_broken: Option<Value>,
    #[serde(default, alias = "alimento")]
    feed_kg: Option<Value>,
    #[serde(default, alias = "mortalidad")]
    mortality: Option<Value>,
    #[serde(default, alias = "responsable")]
    responsible: Option<String>,
    #[serde(default, alias = "fecha_registro")]
    report_date: Option<String>,
}

/// 生产录入 (已校验字段类型)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionSubmission {
    pub product_id: i64,
    pub quantity: Decimal,
    pub responsible: String,
    pub report_date: Option<NaiveDate>,
}

impl ProductionSubmission {
    pub fn from_json(value: &Value) -> ApiResult<Self> {
        let raw: RawProductionSubmission = serde_json::from_value(value.clone())
            .map_err(|e| ApiError::InvalidPayload(e.to_string()))?;

        Ok(Self {
            product_id: id_field("producto_id", raw.product_id.as_ref())?,
            quantity: decimal_field("cantidad", raw.quantity.as_ref(), QUANTITY_MAX_DIGITS)?,
            responsible: responsible_field(raw.responsible)?,
            report_date: parse_report_date(raw.report_date.as_deref())?,
        })
    }
}

/// 鸡群日报录入 (已校验字段类型)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlockSubmission {
    pub batch_id: i64,
    pub eggs_collected: u32,
    pub eggs_broken: u32,
    pub feed_kg: Decimal,
    pub mortality: u32,
    pub responsible: String,
    pub report_date: Option<NaiveDate>,
}

impl FlockSubmission {
    pub fn from_json(value: &Value) -> ApiResult<Self> {
        let raw: RawFlockSubmission = serde_json::from_value(value.clone())
            .map_err(|e| ApiError::InvalidPayload(e.to_string()))?;

        Ok(Self {
            batch_id: id_field("lote_id", raw.batch_id.as_ref())?,
            eggs_collected: count_field("huevos", raw.eggs_collected.as_ref(), None)?,
            eggs_broken: count_field("huevos_rotos", raw.eggs_broken.as_ref(), Some(0))?,
            feed_kg: decimal_field("alimento", raw.feed_kg.as_ref(), FEED_MAX_DIGITS)?,
            mortality: count_field("mortalidad", raw.mortality.as_ref(), Some(0))?,
            responsible: responsible_field(raw.responsible)?,
            report_date: parse_report_date(raw.report_date.as_deref())?,
        })
    }

    /// 转换为日报写入请求 (备注标注来源)
    pub fn into_new_report(self) -> NewDailyReport {
        let notes = attribution_note(&self.responsible, self.report_date.is_some());
        NewDailyReport {
            batch_id: self.batch_id,
            eggs_collected: self.eggs_collected,
            eggs_broken: self.eggs_broken,
            feed_consumed_kg: self.feed_kg,
            mortality: self.mortality,
            notes: Some(notes),
            responsible: Some(self.responsible),
            report_date: self.report_date,
        }
    }
}

/// 日报备注: 署名, 离线补录时追加标记
pub fn attribution_note(responsible: &str, offline: bool) -> String {
    if offline {
        format!("Rep. por {} (Offline)", responsible)
    } else {
        format!("Rep. por {}", responsible)
    }
}

// ==========================================
// 响应结构
// ==========================================

/// 单条录入确认
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestAck {
    pub message: String,
    pub record_id: String,
    pub offline: bool,
}

/// 离线队列中一条记录的回放结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncOutcome {
    pub temp_id: Value,
    pub ok: bool,
    pub message: String,
}

/// 离线队列回放汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub total: usize,
    pub synced: usize,
    pub message: String,
    pub outcomes: Vec<SyncOutcome>,
}

/// 离线记录类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Production,
    Flock,
}

impl SubmissionKind {
    /// 识别离线记录类型: tipo(ALGAS/GRANJA) 或 kind(production/flock),
    /// 都缺失时按ID字段推断
    pub fn detect(value: &Value) -> ApiResult<Self> {
        let tag = value
            .get("tipo")
            .or_else(|| value.get("kind"))
            .and_then(Value::as_str)
            .map(|s| s.trim().to_ascii_uppercase());

        match tag.as_deref() {
            Some("ALGAS") | Some("PRODUCTION") => Ok(SubmissionKind::Production),
            Some("GRANJA") | Some("FLOCK") => Ok(SubmissionKind::Flock),
            Some(other) => Err(ApiError::InvalidPayload(format!("未知的记录类型: {}", other))),
            None => {
                if value.get("producto_id").is_some() || value.get("product_id").is_some() {
                    Ok(SubmissionKind::Production)
                } else if value.get("lote_id").is_some() || value.get("batch_id").is_some() {
                    Ok(SubmissionKind::Flock)
                } else {
                    Err(ApiError::InvalidPayload("无法识别记录类型".to_string()))
                }
            }
        }
    }
}

// ==========================================
// IngestApi - 现场录入 API
// ==========================================
#[derive(Clone)]
pub struct IngestApi {
    ledger: Arc<InventoryLedger>,
    report_store: Arc<FlockReportStore>,
    config: Arc<dyn DashboardConfigReader>,
}

impl IngestApi {
    pub fn new(
        ledger: Arc<InventoryLedger>,
        report_store: Arc<FlockReportStore>,
        config: Arc<dyn DashboardConfigReader>,
    ) -> Self {
        Self {
            ledger,
            report_store,
            config,
        }
    }

    /// 生产录入
    pub async fn submit_production(&self, body: &str) -> ApiResult<IngestAck> {
        let value = parse_body(body)?;
        let locale = self.locale().await;
        self.ingest_production(&value, &locale)
    }

    /// 鸡群日报录入
    pub async fn submit_flock_report(&self, body: &str) -> ApiResult<IngestAck> {
        let value = parse_body(body)?;
        let locale = self.locale().await;
        self.ingest_flock(&value, &locale)
    }

    /// 离线队列批量回放
    ///
    /// 请求体: 记录数组, 或 {"pendientes": [...]} / {"records": [...]}
    /// 各记录独立提交, 单条失败不影响其余记录
    pub async fn sync_offline_batch(&self, body: &str) -> ApiResult<SyncReport> {
        let value = parse_body(body)?;
        let records = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => match map
                .remove("pendientes")
                .or_else(|| map.remove("records"))
            {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(ApiError::InvalidPayload(
                        "缺少待同步记录列表".to_string(),
                    ))
                }
            },
            _ => return Err(ApiError::InvalidPayload("待同步记录必须是数组".to_string())),
        };

        let locale = self.locale().await;
        let total = records.len();

        let tasks = records.into_iter().map(|record| {
            let api = self.clone();
            let locale = locale.clone();
            let temp_id = record.get("temp_id").cloned().unwrap_or(Value::Null);
            async move {
                let joined =
                    tokio::task::spawn_blocking(move || api.ingest_any(&record, &locale)).await;
                match joined {
                    Ok(Ok(ack)) => SyncOutcome {
                        temp_id,
                        ok: true,
                        message: ack.message,
                    },
                    Ok(Err(e)) => SyncOutcome {
                        temp_id,
                        ok: false,
                        message: e.to_string(),
                    },
                    Err(e) => SyncOutcome {
                        temp_id,
                        ok: false,
                        message: format!("同步任务异常: {}", e),
                    },
                }
            }
        });

        let outcomes = join_all(tasks).await;
        let synced = outcomes.iter().filter(|o| o.ok).count();

        tracing::info!(total, synced, "离线队列回放完成");

        Ok(SyncReport {
            total,
            synced,
            message: i18n::t_in_with_args(
                &locale,
                "ingest.sync_summary",
                &[("ok", &synced.to_string()), ("total", &total.to_string())],
            ),
            outcomes,
        })
    }

    fn ingest_any(&self, value: &Value, locale: &str) -> ApiResult<IngestAck> {
        match SubmissionKind::detect(value)? {
            SubmissionKind::Production => self.ingest_production(value, locale),
            SubmissionKind::Flock => self.ingest_flock(value, locale),
        }
    }

    fn ingest_production(&self, value: &Value, locale: &str) -> ApiResult<IngestAck> {
        let submission = ProductionSubmission::from_json(value).map_err(|e| {
            tracing::warn!(error = %e, "生产录入解析失败");
            e
        })?;

        let event = self.ledger.apply_production(
            submission.product_id,
            submission.quantity,
            &submission.responsible,
            submission.report_date,
        )?;

        Ok(IngestAck {
            message: i18n::t_in(locale, "ingest.production_saved"),
            record_id: event.event_id,
            offline: submission.report_date.is_some(),
        })
    }

    fn ingest_flock(&self, value: &Value, locale: &str) -> ApiResult<IngestAck> {
        let submission = FlockSubmission::from_json(value).map_err(|e| {
            tracing::warn!(error = %e, "鸡群日报解析失败");
            e
        })?;
        let offline = submission.report_date.is_some();

        let report = self
            .report_store
            .record_daily_report(submission.into_new_report())?;

        Ok(IngestAck {
            message: i18n::t_in(locale, "ingest.flock_saved"),
            record_id: report.report_id,
            offline,
        })
    }

    async fn locale(&self) -> String {
        match self.config.get_locale().await {
            Ok(locale) => locale,
            Err(e) => {
                tracing::warn!(error = %e, "读取语言配置失败,使用默认语言");
                i18n::DEFAULT_LOCALE.to_string()
            }
        }
    }
}

// ==========================================
// 字段解析
// ==========================================

fn parse_body(body: &str) -> ApiResult<Value> {
    serde_json::from_str(body).map_err(|e| ApiError::InvalidPayload(e.to_string()))
}

fn missing(field: &str) -> ApiError {
    ApiError::InvalidPayload(format!("缺少字段: {}", field))
}

/// 取字段的数字文本; 空串视为缺失
fn numeric_text(field: &str, value: Option<&Value>) -> ApiResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(other) => Err(ApiError::InvalidQuantity(format!(
            "{}: {} 不是数字",
            field, other
        ))),
    }
}

fn parse_decimal_text(field: &str, text: &str) -> ApiResult<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| ApiError::InvalidQuantity(format!("{}: '{}' 不是有效数字", field, text)))
}

fn decimal_field(field: &str, value: Option<&Value>, max_digits: u32) -> ApiResult<Decimal> {
    let text = numeric_text(field, value)?.ok_or_else(|| missing(field))?;
    let number = parse_decimal_text(field, &text)?;
    check_digits(field, number, max_digits)?;
    Ok(number)
}

/// 总位数 max_digits, 其中小数至多 DECIMAL_PLACES 位
fn check_digits(field: &str, number: Decimal, max_digits: u32) -> ApiResult<()> {
    let normalized = number.normalize();
    if normalized.scale() > DECIMAL_PLACES {
        return Err(ApiError::InvalidQuantity(format!(
            "{}最多{}位小数: {}",
            field, DECIMAL_PLACES, number
        )));
    }

    let limit = Decimal::from(10_u64.pow(max_digits - DECIMAL_PLACES));
    if normalized.abs() >= limit {
        return Err(ApiError::InvalidQuantity(format!(
            "{}超出{}位数上限: {}",
            field, max_digits, number
        )));
    }
    Ok(())
}

/// 非负整数计数; default 为 None 时字段必填
fn count_field(field: &str, value: Option<&Value>, default: Option<u32>) -> ApiResult<u32> {
    let text = match (numeric_text(field, value)?, default) {
        (Some(text), _) => text,
        (None, Some(d)) => return Ok(d),
        (None, None) => return Err(missing(field)),
    };

    let number = parse_decimal_text(field, &text)?;
    if number < Decimal::ZERO {
        return Err(ApiError::InvalidQuantity(format!("{}不能为负: {}", field, text)));
    }
    if !number.fract().is_zero() {
        return Err(ApiError::InvalidQuantity(format!("{}必须是整数: {}", field, text)));
    }
    number
        .to_u32()
        .ok_or_else(|| ApiError::InvalidQuantity(format!("{}超出范围: {}", field, text)))
}

fn id_field(field: &str, value: Option<&Value>) -> ApiResult<i64> {
    let text = numeric_text(field, value)
        .map_err(|e| ApiError::InvalidPayload(e.to_string()))?
        .ok_or_else(|| missing(field))?;
    text.parse::<i64>()
        .map_err(|_| ApiError::InvalidPayload(format!("{}: '{}' 不是有效ID", field, text)))
}

fn responsible_field(value: Option<String>) -> ApiResult<String> {
    match value.map(|s| s.trim().to_string()) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(missing("responsable")),
    }
}

/// 解析日期: YYYY-MM-DD 或 RFC3339 时间戳; 空串视为未提供
fn parse_report_date(value: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    let text = match value.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(t) => t,
    };

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(text)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| ApiError::InvalidParameter(format!("日期格式无效: {}", text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_production_accepts_spanish_field_names() {
        let sub = ProductionSubmission::from_json(&json!({
            "tipo": "ALGAS",
            "producto_id": "3",
            "cantidad": "12.50",
            "responsable": " Luis ",
            "fecha_registro": "2026-04-01",
            "temp_id": 1717000000000_i64
        }))
        .unwrap();

        assert_eq!(sub.product_id, 3);
        assert_eq!(sub.quantity, Decimal::new(1250, 2));
        assert_eq!(sub.responsible, "Luis");
        assert_eq!(sub.report_date, NaiveDate::from_ymd_opt(2026, 4, 1));
    }

    #[test]
    fn test_production_accepts_english_numbers() {
        let sub = ProductionSubmission::from_json(&json!({
            "product_id": 7,
            "quantity": 0.1,
            "responsible": "Ana"
        }))
        .unwrap();
        assert_eq!(sub.quantity, Decimal::new(1, 1));
        assert_eq!(sub.report_date, None);
    }

    #[test]
    fn test_non_numeric_quantity_is_invalid_quantity() {
        let err = ProductionSubmission::from_json(&json!({
            "producto_id": 1, "cantidad": "mucho", "responsable": "Luis"
        }))
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidQuantity(_)));
    }

    #[test]
    fn test_decimal_digit_bounds() {
        let production = |qty: Value| {
            ProductionSubmission::from_json(&json!({
                "producto_id": 1, "cantidad": qty, "responsable": "Luis"
            }))
        };
        assert_eq!(
            production(json!("99999999.99")).unwrap().quantity,
            Decimal::new(9999999999, 2)
        );
        // 末尾零不计小数位
        assert_eq!(production(json!("1.500")).unwrap().quantity, Decimal::new(15, 1));

        for bad in [json!("100000000"), json!("0.125"), json!("50000000000000000000000000000")] {
            let err = production(bad.clone()).unwrap_err();
            assert!(matches!(err, ApiError::InvalidQuantity(_)), "cantidad={}", bad);
        }

        let flock = |feed: Value| {
            FlockSubmission::from_json(&json!({
                "lote_id": 1, "huevos": 10, "alimento": feed, "responsable": "Ana"
            }))
        };
        assert!(flock(json!("9999.99")).is_ok());
        assert!(matches!(flock(json!("10000")), Err(ApiError::InvalidQuantity(_))));
        assert!(matches!(flock(json!(12.345)), Err(ApiError::InvalidQuantity(_))));
    }

    #[test]
    fn test_missing_responsible_is_invalid_payload() {
        let err = ProductionSubmission::from_json(&json!({
            "producto_id": 1, "cantidad": 1
        }))
        .unwrap_err();
        assert_eq!(err.code(), "INVALID_PAYLOAD");
    }

    #[test]
    fn test_flock_defaults_and_notes() {
        let sub = FlockSubmission::from_json(&json!({
            "lote_id": "2",
            "huevos": "95",
            "alimento": "11.75",
            "mortalidad": "",
            "responsable": "Marta"
        }))
        .unwrap();
        assert_eq!(sub.mortality, 0);
        assert_eq!(sub.eggs_broken, 0);

        let report = sub.into_new_report();
        assert_eq!(report.notes.as_deref(), Some("Rep. por Marta"));
        assert_eq!(report.feed_consumed_kg, Decimal::new(1175, 2));
    }

    #[test]
    fn test_flock_offline_note() {
        let sub = FlockSubmission::from_json(&json!({
            "batch_id": 2,
            "eggs_collected": 80,
            "feed_kg": 10,
            "responsible": "Marta",
            "report_date": "2026-03-30"
        }))
        .unwrap();
        let report = sub.into_new_report();
        assert_eq!(report.notes.as_deref(), Some("Rep. por Marta (Offline)"));
        assert_eq!(report.report_date, NaiveDate::from_ymd_opt(2026, 3, 30));
    }

    #[test]
    fn test_empty_date_counts_as_absent() {
        let sub = FlockSubmission::from_json(&json!({
            "lote_id": 1, "huevos": 1, "alimento": 1, "responsable": "Marta",
            "fecha_registro": ""
        }))
        .unwrap();
        assert!(sub.report_date.is_none());
    }

    #[test]
    fn test_negative_or_fractional_counts_rejected() {
        for eggs in [json!(-1), json!("2.5")] {
            let err = FlockSubmission::from_json(&json!({
                "lote_id": 1, "huevos": eggs, "alimento": 1, "responsable": "Marta"
            }))
            .unwrap_err();
            assert!(matches!(err, ApiError::InvalidQuantity(_)));
        }
    }

    #[test]
    fn test_bad_date_is_invalid_parameter() {
        let err = parse_report_date(Some("31/12/2026")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
        assert_eq!(
            parse_report_date(Some("2026-04-01T10:00:00Z")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 4, 1)
        );
    }

    #[test]
    fn test_detect_submission_kind() {
        assert_eq!(
            SubmissionKind::detect(&json!({"tipo": "GRANJA"})).unwrap(),
            SubmissionKind::Flock
        );
        assert_eq!(
            SubmissionKind::detect(&json!({"producto_id": 1})).unwrap(),
            SubmissionKind::Production
        );
        assert!(SubmissionKind::detect(&json!({"tipo": "PESCA"})).is_err());
    }
}
