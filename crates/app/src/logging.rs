use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// # Summary
/// 初始化全局日志。
///
/// # Logic
/// 1. 优先使用 `RUST_LOG`，否则使用配置中的级别。
/// 2. 日志经非阻塞写入器输出到 stderr，stdout 留给视图渲染。
///
/// # Returns
/// 写入器守卫，必须存活到进程退出以保证日志刷新。
pub fn init(level: &str) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .init();

    guard
}
