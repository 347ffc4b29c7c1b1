use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// 图表可切换展示的价格序列。
///
/// # Invariants
/// - 每个序列对应一个固定的线条颜色，见 [`PriceSeries::color`]。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum PriceSeries {
    // 开盘价
    Open,
    // 最高价
    High,
    // 最低价
    Low,
    // 收盘价 (默认展示)
    #[default]
    Close,
}

impl PriceSeries {
    /// # Summary
    /// 获取序列对应的线条颜色。
    ///
    /// # Returns
    /// CSS 颜色名称。
    pub fn color(&self) -> &'static str {
        match self {
            PriceSeries::Close => "blue",
            PriceSeries::Open => "green",
            PriceSeries::High => "red",
            PriceSeries::Low => "black",
        }
    }

    /// 切换序列后数据集使用的标签，例如 `High Price`。
    pub fn dataset_label(&self) -> String {
        format!("{} Price", self)
    }
}

impl FromStr for PriceSeries {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(PriceSeries::Open),
            "high" => Ok(PriceSeries::High),
            "low" => Ok(PriceSeries::Low),
            "close" => Ok(PriceSeries::Close),
            _ => Err(format!("Unknown PriceSeries: {}", s)),
        }
    }
}

impl std::fmt::Display for PriceSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceSeries::Open => write!(f, "Open"),
            PriceSeries::High => write!(f, "High"),
            PriceSeries::Low => write!(f, "Low"),
            PriceSeries::Close => write!(f, "Close"),
        }
    }
}
