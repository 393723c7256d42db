// ==========================================
// 藻类农场管理系统 - 驾驶舱 API
// ==========================================
// 职责: 封装对比服务, 输出前端渲染所需的视图
// 约定: 十进制只在此处转换为 f64 (图表序列)
// ==========================================

use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::DEFAULT_WINDOW_DAYS;
use crate::config::dashboard_config_trait::DashboardConfigReader;
use crate::domain::dashboard::DashboardSummary;
use crate::engine::comparison::ComparisonService;
use crate::i18n;

// ==========================================
// 视图结构
// ==========================================

/// 库存图表序列 (与产品列表一一对应)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockChartSeries {
    pub names: Vec<String>,
    pub current_stock: Vec<f64>,
    pub projected_stock: Vec<f64>,
}

/// 驾驶舱视图
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub window_days: u64,
    pub period_title: String,
    pub stock_chart: StockChartSeries,
    pub experimental_rate: f64,
    pub control_rate: f64,
    pub winner_code: String,
    pub winner_label: String,
    pub summary: DashboardSummary,
}

fn to_chart_value(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// 解析窗口参数 (?dias=N)
pub fn parse_window_param(raw: &str) -> ApiResult<i64> {
    let trimmed = raw.trim();
    let days = trimmed
        .parse::<i64>()
        .map_err(|_| ApiError::InvalidParameter(format!("窗口天数无效: '{}'", trimmed)))?;
    if days < 0 {
        return Err(ApiError::InvalidParameter(format!(
            "窗口天数不能为负: {}",
            days
        )));
    }
    Ok(days)
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    comparison: Arc<ComparisonService>,
    config: Arc<dyn DashboardConfigReader>,
}

impl DashboardApi {
    pub fn new(comparison: Arc<ComparisonService>, config: Arc<dyn DashboardConfigReader>) -> Self {
        Self { comparison, config }
    }

    /// 查询驾驶舱
    ///
    /// # 参数
    /// - window_days: 窗口天数; None 时取配置 (默认 30)
    ///
    /// # 返回
    /// - Ok(DashboardView)
    /// - Err(ApiError::InvalidParameter): 窗口为负
    pub async fn get_dashboard(&self, window_days: Option<i64>) -> ApiResult<DashboardView> {
        let window_days = match window_days {
            Some(days) => days,
            None => self.default_window_days().await,
        };
        let locale = self.locale().await;

        let summary = self.comparison.build_dashboard(window_days)?;
        Ok(Self::render(summary, &locale))
    }

    /// 汇总 → 视图
    pub fn render(summary: DashboardSummary, locale: &str) -> DashboardView {
        let stock_chart = StockChartSeries {
            names: summary.products.iter().map(|p| p.name.clone()).collect(),
            current_stock: summary
                .products
                .iter()
                .map(|p| to_chart_value(p.current_stock))
                .collect(),
            projected_stock: summary
                .products
                .iter()
                .map(|p| to_chart_value(p.projected_stock))
                .collect(),
        };

        DashboardView {
            window_days: summary.window_days,
            period_title: i18n::t_in_with_args(
                locale,
                "dashboard.period_title",
                &[("days", &summary.window_days.to_string())],
            ),
            stock_chart,
            experimental_rate: to_chart_value(summary.experimental.laying_rate),
            control_rate: to_chart_value(summary.control.laying_rate),
            winner_code: summary.winner.code().to_string(),
            winner_label: summary.winner.label().to_string(),
            summary,
        }
    }

    async fn default_window_days(&self) -> i64 {
        match self.config.get_default_window_days().await {
            Ok(days) => days,
            Err(e) => {
                tracing::warn!(error = %e, "读取默认窗口失败,使用 {}", DEFAULT_WINDOW_DAYS);
                DEFAULT_WINDOW_DAYS
            }
        }
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
    use crate::domain::dashboard::{GroupPerformance, ProductProjection};
    use crate::domain::types::{DietType, ProductCategory};
    use chrono::NaiveDate;

    #[test]
    fn test_parse_window_param() {
        assert_eq!(parse_window_param("7").unwrap(), 7);
        assert_eq!(parse_window_param(" 365 ").unwrap(), 365);
        assert!(matches!(
            parse_window_param("-1"),
            Err(ApiError::InvalidParameter(_))
        ));
        assert!(matches!(
            parse_window_param("treinta"),
            Err(ApiError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_render_chart_series() {
        let summary = DashboardSummary {
            window_days: 30,
            cutoff_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            products: vec![ProductProjection {
                product_id: 1,
                name: "Harina de Alga".to_string(),
                category: ProductCategory::RawAlgaeMicronized,
                category_label: ProductCategory::RawAlgaeMicronized.label().to_string(),
                current_stock: Decimal::new(5250, 1),
                projected_stock: Decimal::from(2025),
            }],
            experimental: GroupPerformance {
                laying_rate: Decimal::new(8500, 2),
                ..GroupPerformance::empty(DietType::ExperimentalAlgae)
            },
            control: GroupPerformance::empty(DietType::Control),
            winner: DietType::ExperimentalAlgae,
            recent_production: Vec::new(),
            recent_flock_reports: Vec::new(),
        };

        let view = DashboardApi::render(summary, "es");
        assert_eq!(view.period_title, "Últimos 30 días");
        assert_eq!(view.stock_chart.names, vec!["Harina de Alga".to_string()]);
        assert_eq!(view.stock_chart.current_stock, vec![525.0]);
        assert_eq!(view.stock_chart.projected_stock, vec![2025.0]);
        assert_eq!(view.experimental_rate, 85.0);
        assert_eq!(view.winner_code, "ALGAS");
    }
}
