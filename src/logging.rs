// ==========================================
// 考勤表客户端 - 日志初始化
// ==========================================
// tracing + tracing-subscriber，级别由 RUST_LOG 覆盖
// 命令行结果写 stdout，日志统一写 stderr
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 未设置 RUST_LOG 时的过滤规则：本库 info，依赖库 warn
pub const DEFAULT_FILTER: &str = "warn,attendance_sheets=info";

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// 初始化文本日志
///
/// ```no_run
/// // RUST_LOG=attendance_sheets=debug attendance-sheets classes
/// attendance_sheets::logging::init();
/// ```
pub fn init() {
    let _ = fmt()
        .with_env_filter(env_filter(DEFAULT_FILTER))
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 以 JSON 行输出日志（--json-logs）
pub fn init_json() {
    let _ = fmt()
        .json()
        .with_env_filter(env_filter(DEFAULT_FILTER))
        .with_writer(std::io::stderr)
        .try_init();
}

/// 测试日志：debug 级，输出交给测试框架捕获
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(env_filter("debug"))
        .with_test_writer()
        .try_init();
}
