use crate::common::PriceSeries;
use crate::stock::entity::PricePoint;
use serde::{Deserialize, Serialize};

/// # Summary
/// 历史价格表格的一行，数值列已格式化为两位小数。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
}

impl From<&PricePoint> for TableRow {
    fn from(point: &PricePoint) -> Self {
        Self {
            date: point.date.clone(),
            open: format!("{:.2}", point.open),
            high: format!("{:.2}", point.high),
            low: format!("{:.2}", point.low),
            close: format!("{:.2}", point.close),
        }
    }
}

/// # Summary
/// 一次查询结束后的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    // 渲染完成
    Rendered {
        ticker: String,
        rows: usize,
    },
    // 已有查询在进行中，本次被拒绝且未触碰视图
    Busy,
}

/// # Summary
/// 切换价格序列的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesOutcome {
    // 已原地更新现有图表
    Updated(PriceSeries),
    // 当前没有图表，未做任何事
    NoChart,
}
