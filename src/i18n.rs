// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持西班牙语（默认）、英文、中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 文案一律按显式语言取, 不读写全局 locale
// ==========================================

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 3] = ["es", "en", "zh-CN"];

/// 默认语言
pub const DEFAULT_LOCALE: &str = "es";

/// 规范化语言代码, 不支持的代码回落到默认语言
pub fn normalize_locale(locale: &str) -> &'static str {
    let trimmed = locale.trim();
    SUPPORTED_LOCALES
        .iter()
        .find(|l| l.eq_ignore_ascii_case(trimmed))
        .copied()
        .unwrap_or(DEFAULT_LOCALE)
}

/// 翻译消息（指定语言）
///
/// API 层按配置的语言取文案,不依赖全局 locale
pub fn t_in(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = normalize_locale(locale)).to_string()
}

/// 翻译消息（指定语言 + 参数）
///
/// # 示例
/// ```no_run
/// use algae_farm_ops::i18n::t_in_with_args;
/// let msg = t_in_with_args("es", "dashboard.period_title", &[("days", "30")]);
/// ```
pub fn t_in_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    fill_args(t_in(locale, key), args)
}

fn fill_args(template: String, args: &[(&str, &str)]) -> String {
    let mut result = template;
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_simple() {
        assert_eq!(t_in("es", "common.success"), "Operación exitosa");
        assert_eq!(t_in("en", "common.success"), "Operation successful");
    }

    #[test]
    fn test_translate_explicit_locale() {
        assert_eq!(t_in("zh-CN", "common.success"), "操作成功");
        assert_eq!(t_in("es", "export.flock.total_label"), "TOTALES:");
        // 未知语言回落到西班牙语
        assert_eq!(t_in("fr", "common.method_not_allowed"), "Método no permitido");
    }

    #[test]
    fn test_translate_with_args() {
        let msg = t_in_with_args("es", "dashboard.period_title", &[("days", "30")]);
        assert_eq!(msg, "Últimos 30 días");

        let msg = t_in_with_args("en", "ingest.sync_summary", &[("ok", "2"), ("total", "3")]);
        assert_eq!(msg, "2 of 3 records synced");
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("EN"), "en");
        assert_eq!(normalize_locale(" zh-cn "), "zh-CN");
        assert_eq!(normalize_locale(""), "es");
    }
}
