// ==========================================
// 藻类农场管理系统 - 行编解码工具
// ==========================================
// 职责: 统一日期/时间戳/十进制/枚举代码的存取格式
// 约定:
// - 日期: %Y-%m-%d
// - 时间戳: %Y-%m-%d %H:%M:%S%.6f (定长,字典序即时间序)
// - 十进制: 规范字符串
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rust_decimal::Decimal;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

fn conversion_failure<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub fn date_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| conversion_failure(idx, e))
}

pub fn timestamp_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f")
        .map_err(|e| conversion_failure(idx, e))
}

pub fn decimal_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(raw.trim()).map_err(|e| conversion_failure(idx, e))
}

/// 读取枚举代码列 (ProductCategory / DietType)
pub fn code_at<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>().map_err(|e| conversion_failure(idx, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_format_is_fixed_width() {
        let a = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_micro_opt(9, 5, 1, 7)
            .unwrap();
        let b = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_micro_opt(9, 5, 1, 120_000)
            .unwrap();
        let (sa, sb) = (format_timestamp(a), format_timestamp(b));
        assert_eq!(sa.len(), sb.len());
        assert!(sa < sb);
    }

    #[test]
    fn test_decimal_text_is_canonical() {
        assert_eq!(format_decimal(Decimal::from_str("10.500").unwrap()), "10.5");
        assert_eq!(format_decimal(Decimal::from_str("0.00").unwrap()), "0");
    }
}
