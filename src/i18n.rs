// ==========================================
// 考勤表客户端 - 界面文案
// ==========================================
// 基于 rust-i18n，词条位于 locales/*.yml
// 支持 en（默认）与 zh-CN；词条缺失时回退到 en
// ==========================================

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "zh-CN"];

/// 默认语言
pub const DEFAULT_LOCALE: &str = "en";

/// 当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 规范化语言代码
///
/// "zh" / "zh_CN" / "zh-cn" 归为 "zh-CN"，"en-US" 等归为 "en"；
/// 其它值返回 None
pub fn normalize_locale(raw: &str) -> Option<&'static str> {
    let lowered = raw.trim().to_ascii_lowercase().replace('_', "-");
    let primary = lowered.split('-').next().unwrap_or_default();
    match primary {
        "zh" => Some("zh-CN"),
        "en" => Some("en"),
        _ => None,
    }
}

/// 切换语言，返回实际生效的语言
///
/// 不支持的代码回退到默认语言
pub fn set_locale(locale: &str) -> &'static str {
    let resolved = normalize_locale(locale).unwrap_or_else(|| {
        tracing::warn!(locale, "不支持的语言，使用默认语言");
        DEFAULT_LOCALE
    });
    rust_i18n::set_locale(resolved);
    resolved
}

/// 取词条
///
/// ```no_run
/// use attendance_sheets::i18n::t;
/// let banner = t("sync.offline");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 取词条并替换 `%{name}` 占位符
///
/// ```no_run
/// use attendance_sheets::i18n::t_with_args;
/// let msg = t_with_args("validation.password_too_short", &[("min", "6")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter()
        .fold(t(key), |text, (name, value)| {
            text.replace(&format!("%{{{}}}", name), value)
        })
}
