use serde::{Deserialize, Serialize};

/// # Summary
/// 单日行情数据点。
///
/// # Invariants
/// - 缺失或非数值的价格字段在解码时已归零。
/// - 序列顺序即后端返回顺序，渲染时必须保持。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    // 交易日期，原样保留后端给出的字符串
    pub date: String,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
}

impl PricePoint {
    /// 按序列取值。
    pub fn value(&self, series: crate::common::PriceSeries) -> f64 {
        use crate::common::PriceSeries;
        match series {
            PriceSeries::Open => self.open,
            PriceSeries::High => self.high,
            PriceSeries::Low => self.low,
            PriceSeries::Close => self.close,
        }
    }
}

/// # Summary
/// 基本面表格中的单个数值。
///
/// # Invariants
/// - 后端可能返回数字、字符串 (例如 "N/A") 或直接缺失。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Figure {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl std::fmt::Display for Figure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Figure::Number(n) => write!(f, "{}", n),
            Figure::Text(t) => write!(f, "{}", t),
            Figure::Missing => write!(f, "N/A"),
        }
    }
}

/// # Summary
/// 公司基本面数据。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FundamentalDetails {
    #[serde(rename = "Revenue", default)]
    pub revenue: Figure,
    #[serde(rename = "NetIncome", default)]
    pub net_income: Figure,
    #[serde(rename = "EPS", default)]
    pub eps: Figure,
    #[serde(rename = "MarketCap", default)]
    pub market_cap: Figure,
    #[serde(rename = "P/E Ratio", default)]
    pub pe_ratio: Figure,
}

impl FundamentalDetails {
    /// 按页面表格顺序给出 (标题, 数值)。
    pub fn rows(&self) -> [(&'static str, &Figure); 5] {
        [
            ("Revenue (Billion $)", &self.revenue),
            ("Net Income (Billion $)", &self.net_income),
            ("EPS", &self.eps),
            ("Market Cap (Billion $)", &self.market_cap),
            ("P/E Ratio", &self.pe_ratio),
        ]
    }
}

/// # Summary
/// 公司概况信息。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct CompanyInfo {
    pub name: String,
    pub sector: String,
    pub industry: String,
    pub description: String,
}

/// # Summary
/// 一次成功查询的完整结果。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StockReport {
    // 后端解析出的证券代码
    pub ticker: String,
    pub fundamentals: FundamentalDetails,
    pub company: CompanyInfo,
    // 历史价格，按后端顺序
    pub prices: Vec<PricePoint>,
}

/// # Summary
/// `/get_stock` 接口的解码结果。
///
/// # Invariants
/// - 只要载荷包含 `error` 字段即视为后端错误，忽略其余内容。
#[derive(Debug, Clone, PartialEq)]
pub enum StockReply {
    Error(String),
    Report(StockReport),
}
