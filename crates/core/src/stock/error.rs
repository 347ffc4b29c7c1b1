use thiserror::Error;

/// # Summary
/// 行情查询域错误枚举，覆盖传输与解析失败。
///
/// # Invariants
/// - 后端在载荷中返回的 `error` 不属于此枚举，它是正常的 `StockReply::Error`。
#[derive(Error, Debug)]
pub enum FeedError {
    // 网络层错误，包含底层 HTTP 客户端错误信息
    #[error("Network error: {0}")]
    Network(String),
    // 非成功状态码且响应体不是错误载荷
    #[error("HTTP status {0}")]
    Status(u16),
    // JSON 解析失败或结构不符
    #[error("Parse error: {0}")]
    Parse(String),
}
