use thiserror::Error;

/// # Summary
/// 图表渲染域错误枚举。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChartError {
    // 无法获取画布或其绘图上下文
    #[error("Canvas unavailable: {0}")]
    CanvasUnavailable(String),
    // 句柄对应的实例不存在或已销毁
    #[error("Unknown chart instance")]
    UnknownChart,
    #[error("Render error: {0}")]
    Render(String),
}
