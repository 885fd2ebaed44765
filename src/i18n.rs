// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 渲染路径只使用 t_for / t_for_args（显式语言,不修改全局状态）
// ==========================================

/// 已提供翻译文件的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "zh-CN"];

pub fn is_supported_locale(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"en" 或 "zh-CN"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（全局语言,无参数）
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（全局语言,带参数）
///
/// # 示例
/// ```no_run
/// use stock_operations::i18n::t_with_args;
/// let msg = t_with_args("notifications.action_success", &[("action", "Complete")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    fill_args(rust_i18n::t!(key).to_string(), args)
}

/// 按指定语言翻译
pub fn t_for(key: &str, locale: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 按指定语言翻译（带参数）
pub fn t_for_args(key: &str, locale: &str, args: &[(&str, &str)]) -> String {
    fill_args(rust_i18n::t!(key, locale = locale).to_string(), args)
}

fn fill_args(mut result: String, args: &[(&str, &str)]) -> String {
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 修改全局语言的测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");

        set_locale("en");
        assert_eq!(current_locale(), "en");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(t("actions.complete"), "完成");

        set_locale("en");
        assert_eq!(t("actions.complete"), "Complete");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let msg = t_with_args("notifications.action_success", &[("action", "Complete")]);
        assert!(msg.contains("Complete"));
        assert!(!msg.contains("%{action}"));
    }

    #[test]
    fn test_explicit_locale_ignores_global() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(t_for("view.refresh", "zh-CN"), "刷新");
        assert_eq!(t_for("view.refresh", "en"), "Refresh");
        assert_eq!(current_locale(), "en");

        let msg = t_for_args("notifications.action_failed", "zh-CN", &[("action", "完成")]);
        assert!(msg.contains("完成"));
    }

    #[test]
    fn test_supported_locales() {
        assert!(is_supported_locale("en"));
        assert!(is_supported_locale("zh-CN"));
        assert!(!is_supported_locale("fr"));
    }
}
