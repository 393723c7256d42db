// ==========================================
// 藻类农场管理系统 - 报表导出 API
// ==========================================
// 职责: 生成两张全量台账表 (生产 / 鸡群日报)
// - 不做窗口过滤, 日期倒序
// - 末尾追加合计行
// 样式交给表格生成方, 这里只负责单元格与 CSV 落地
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::dashboard_config_trait::DashboardConfigReader;
use crate::i18n;
use crate::repository::flock_report_repo::FlockReportRepository;
use crate::repository::production_event_repo::ProductionEventRepository;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;

/// 入库日期列格式
const SYSTEM_DATE_FORMAT: &str = "%d/%m/%Y";

// ==========================================
// 表格结构
// ==========================================

/// 单元格
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum ExportCell {
    Text(String),
    Date(NaiveDate),
    Number(Decimal),
    Integer(u64),
    Empty,
}

impl ExportCell {
    pub fn render(&self) -> String {
        match self {
            ExportCell::Text(s) => s.clone(),
            ExportCell::Date(d) => d.format("%Y-%m-%d").to_string(),
            ExportCell::Number(n) => n.to_string(),
            ExportCell::Integer(i) => i.to_string(),
            ExportCell::Empty => String::new(),
        }
    }
}

impl From<Option<String>> for ExportCell {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(s) => ExportCell::Text(s),
            None => ExportCell::Empty,
        }
    }
}

/// 一张导出表
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabularExport {
    pub sheet_title: String,
    pub file_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<ExportCell>>,
    pub totals: Vec<ExportCell>,
}

impl TabularExport {
    /// 按 CSV 写出 (表头 + 数据行 + 合计行)
    pub fn write_csv<W: Write>(&self, writer: W) -> ApiResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(ExportCell::render))?;
        }
        wtr.write_record(self.totals.iter().map(ExportCell::render))?;

        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> ApiResult<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// 合计累加; 超出 Decimal 表示范围时报导出错误
fn checked_total(total: Decimal, value: Decimal, column: &str) -> ApiResult<Decimal> {
    total.checked_add(value).ok_or_else(|| {
        ApiError::ExportError(format!("{} 合计溢出: {} + {}", column, total, value))
    })
}

// ==========================================
// ExportApi - 报表导出 API
// ==========================================
pub struct ExportApi {
    event_repo: Arc<ProductionEventRepository>,
    report_repo: Arc<FlockReportRepository>,
    config: Arc<dyn DashboardConfigReader>,
}

impl ExportApi {
    pub fn new(
        event_repo: Arc<ProductionEventRepository>,
        report_repo: Arc<FlockReportRepository>,
        config: Arc<dyn DashboardConfigReader>,
    ) -> Self {
        Self {
            event_repo,
            report_repo,
            config,
        }
    }

    /// 生产台账
    ///
    /// 列: 作业日期, 入库日期, 产品, 类别, 数量, 负责人
    /// 合计: 第4列标签, 第5列数量合计
    pub async fn export_production(&self) -> ApiResult<TabularExport> {
        let locale = self.locale().await;
        let ledger = self.event_repo.list_ledger_desc()?;

        let mut total = Decimal::ZERO;
        let mut rows = Vec::with_capacity(ledger.len());
        for r in ledger {
            total = checked_total(total, r.quantity, "cantidad")?;
            rows.push(vec![
                ExportCell::Date(r.event_date),
                ExportCell::Text(r.created_at.format(SYSTEM_DATE_FORMAT).to_string()),
                ExportCell::Text(r.product_name),
                ExportCell::Text(r.category.label().to_string()),
                ExportCell::Number(r.quantity),
                ExportCell::Text(r.responsible),
            ]);
        }

        tracing::info!(rows = rows.len(), %total, "生产台账导出");

        let key = |col: &str| i18n::t_in(&locale, &format!("export.production.{}", col));
        Ok(TabularExport {
            sheet_title: key("sheet_title"),
            file_name: key("file_name"),
            headers: vec![
                key("col_report_date"),
                key("col_system_date"),
                key("col_product"),
                key("col_category"),
                key("col_quantity"),
                key("col_responsible"),
            ],
            rows,
            totals: vec![
                ExportCell::Empty,
                ExportCell::Empty,
                ExportCell::Empty,
                ExportCell::Text(key("total_label")),
                ExportCell::Number(total),
                ExportCell::Empty,
            ],
        })
    }

    /// 鸡群日报台账
    ///
    /// 列: 日期, 批次, 饲喂方案, 产蛋数, 饲料, 死亡数, 负责人, 备注
    /// 合计: 第3列标签, 第4/5列产蛋与饲料合计
    pub async fn export_flock_reports(&self) -> ApiResult<TabularExport> {
        let locale = self.locale().await;
        let ledger = self.report_repo.list_ledger_desc()?;

        let mut total_eggs: u64 = 0;
        let mut total_feed = Decimal::ZERO;
        let mut rows = Vec::with_capacity(ledger.len());
        for r in ledger {
            total_eggs = total_eggs.saturating_add(u64::from(r.eggs_collected));
            total_feed = checked_total(total_feed, r.feed_consumed_kg, "alimento")?;
            rows.push(vec![
                ExportCell::Date(r.report_date),
                ExportCell::Text(r.batch_name),
                ExportCell::Text(r.diet_type.label().to_string()),
                ExportCell::Integer(u64::from(r.eggs_collected)),
                ExportCell::Number(r.feed_consumed_kg),
                ExportCell::Integer(u64::from(r.mortality)),
                ExportCell::from(r.responsible),
                ExportCell::from(r.notes),
            ]);
        }

        tracing::info!(rows = rows.len(), total_eggs, %total_feed, "鸡群日报导出");

        let key = |col: &str| i18n::t_in(&locale, &format!("export.flock.{}", col));
        Ok(TabularExport {
            sheet_title: key("sheet_title"),
            file_name: key("file_name"),
            headers: vec![
                key("col_report_date"),
                key("col_batch"),
                key("col_diet"),
                key("col_eggs"),
                key("col_feed"),
                key("col_mortality"),
                key("col_responsible"),
                key("col_notes"),
            ],
            rows,
            totals: vec![
                ExportCell::Empty,
                ExportCell::Empty,
                ExportCell::Text(key("total_label")),
                ExportCell::Integer(total_eggs),
                ExportCell::Number(total_feed),
                ExportCell::Empty,
                ExportCell::Empty,
                ExportCell::Empty,
            ],
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_csv_with_totals() {
        let export = TabularExport {
            sheet_title: "Reporte Algas".to_string(),
            file_name: "Reporte_Algas_Completo".to_string(),
            headers: vec!["Fecha".to_string(), "Cantidad".to_string()],
            rows: vec![
                vec![
                    ExportCell::Date(NaiveDate::from_ymd_opt(2026, 4, 2).unwrap()),
                    ExportCell::Number(Decimal::new(125, 1)),
                ],
                vec![ExportCell::Text("a, b".to_string()), ExportCell::Empty],
            ],
            totals: vec![
                ExportCell::Text("TOTAL:".to_string()),
                ExportCell::Number(Decimal::new(125, 1)),
            ],
        };

        let csv_text = export.to_csv_string().unwrap();
        let lines: Vec<&str> = csv_text.lines().collect();
        assert_eq!(lines[0], "Fecha,Cantidad");
        assert_eq!(lines[1], "2026-04-02,12.5");
        assert_eq!(lines[2], "\"a, b\",");
        assert_eq!(lines[3], "TOTAL:,12.5");
    }
}
