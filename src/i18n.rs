// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持西班牙语（默认）和英语
// 范围: 应用层状态提示；台账表头、状态标签、哨兵值属于数据，不翻译
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::config::SUPPORTED_LOCALES;
use tracing::warn;

/// 默认语言
pub const DEFAULT_LOCALE: &str = "es";

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言，返回实际生效的语言代码
///
/// 不支持的语言回退到 DEFAULT_LOCALE
pub fn set_locale(locale: &str) -> &'static str {
    let effective = SUPPORTED_LOCALES
        .iter()
        .copied()
        .find(|supported| supported.eq_ignore_ascii_case(locale.trim()))
        .unwrap_or_else(|| {
            warn!(locale, fallback = DEFAULT_LOCALE, "不支持的语言");
            DEFAULT_LOCALE
        });
    rust_i18n::set_locale(effective);
    effective
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use medication_redistribution::i18n::t;
/// let msg = t("error.no_valid_months");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息并替换 %{name} 占位符
///
/// ```no_run
/// use medication_redistribution::i18n::t_with_args;
/// let msg = t_with_args("status.exported", &[("path", "/tmp/ledger.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(t(key), |message, (name, value)| {
        message.replace(&format!("%{{{}}}", name), value)
    })
}

// rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
// 涉及 locale 的测试需持有此锁。
#[cfg(test)]
pub(crate) static LOCALE_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
