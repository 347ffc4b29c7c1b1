use crate::chart::error::ChartError;
use crate::stock::error::FeedError;
use thiserror::Error;

/// 查询为空时的提示
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a company name.";
/// 历史价格为空时的提示
pub const NO_DATA_MESSAGE: &str = "No historical data available for this company.";
/// 传输或解析失败时的通用提示
pub const FETCH_FAILED_MESSAGE: &str = "Error fetching stock data. Please try again.";
/// 图表无法绘制时的提示
pub const CHART_FAILED_MESSAGE: &str = "Unable to draw the price chart.";

/// # Summary
/// 单次查询的终止性错误。
///
/// # Invariants
/// - 所有变体对本次查询都是终止的，不自动重试。
/// - 返回给调用方之前，对应的提示已写入视图的错误区域。
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("empty query")]
    EmptyQuery,
    // 后端在载荷中报告的错误，原样展示
    #[error("backend error: {0}")]
    Backend(String),
    #[error("no historical prices")]
    NoData,
    #[error("fetch failed: {0}")]
    Transport(#[from] FeedError),
    #[error("chart failed: {0}")]
    Chart(#[from] ChartError),
}

impl LookupError {
    /// # Summary
    /// 展示给用户的提示文本。
    ///
    /// # Returns
    /// 后端错误返回原始消息，其余返回固定文案。
    pub fn user_message(&self) -> &str {
        match self {
            LookupError::EmptyQuery => EMPTY_QUERY_MESSAGE,
            LookupError::Backend(msg) => msg,
            LookupError::NoData => NO_DATA_MESSAGE,
            LookupError::Transport(_) => FETCH_FAILED_MESSAGE,
            LookupError::Chart(_) => CHART_FAILED_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        assert_eq!(LookupError::Backend("X".into()).user_message(), "X");
        assert_eq!(LookupError::NoData.user_message(), NO_DATA_MESSAGE);
        assert_eq!(
            LookupError::Transport(FeedError::Status(502)).user_message(),
            FETCH_FAILED_MESSAGE
        );
        assert_eq!(
            LookupError::Chart(ChartError::UnknownChart).user_message(),
            CHART_FAILED_MESSAGE
        );
    }
}
