use crate::stock::entity::StockReply;
use crate::stock::error::FeedError;
use async_trait::async_trait;

/// # Summary
/// 股票数据来源接口。
///
/// # Invariants
/// - 每次调用最多发出一个请求，不做重试。
#[async_trait]
pub trait StockSource: Send + Sync {
    /// # Summary
    /// 按公司名称查询股票数据。
    ///
    /// # Logic
    /// 1. 构建携带 `company_name` 参数的请求。
    /// 2. 等待响应体并解码为 `StockReply`。
    ///
    /// # Arguments
    /// * `query`: 用户输入的公司名称。
    ///
    /// # Returns
    /// 成功返回 `StockReply`（可能是后端错误），传输或解析失败返回 `FeedError`。
    async fn fetch(&self, query: &str) -> Result<StockReply, FeedError>;
}
