// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 日志统一写 stderr，stdout 保留给运行报告
// 级别: RUST_LOG 优先，否则取调用方给定的默认级别
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 终端文本
    #[default]
    Text,
    /// 每行一个 JSON 事件（批处理采集）
    Json,
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// 按格式安装全局订阅器
///
/// 已安装过订阅器时静默返回
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=medication_redistribution::engine=trace
pub fn init_with(format: LogFormat) {
    let filter = env_filter("info");
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Text => builder.with_line_number(true).try_init(),
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
    };
}

/// 文本日志
///
/// # 示例
/// ```no_run
/// use medication_redistribution::logging;
/// logging::init();
/// ```
pub fn init() {
    init_with(LogFormat::Text);
}

/// 测试用: debug 级别，输出交给测试框架捕获
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(env_filter("debug"))
        .with_test_writer()
        .try_init();
}
