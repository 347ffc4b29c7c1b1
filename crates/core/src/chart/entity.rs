use crate::common::PriceSeries;
use crate::stock::entity::PricePoint;
use serde::{Deserialize, Serialize};

/// # Summary
/// 渲染器分配的图表实例句柄。
///
/// # Invariants
/// - 句柄在实例销毁后不得再次使用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartHandle(pub u64);

/// # Summary
/// 折线图的单个数据集。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    // 图例标签
    pub label: String,
    // 线条颜色
    pub border_color: String,
    pub data: Vec<f64>,
    // 是否填充线下区域
    pub fill: bool,
}

impl Dataset {
    /// # Summary
    /// 根据价格序列构造数据集。
    ///
    /// # Logic
    /// 1. 按输入顺序抽取该序列的数值。
    /// 2. 颜色取自序列的固定颜色表，不填充。
    ///
    /// # Arguments
    /// * `points`: 历史价格。
    /// * `series`: 目标序列。
    /// * `label`: 图例标签。
    ///
    /// # Returns
    /// 新的数据集。
    pub fn from_points(points: &[PricePoint], series: PriceSeries, label: String) -> Self {
        Self {
            label,
            border_color: series.color().to_string(),
            data: points.iter().map(|p| p.value(series)).collect(),
            fill: false,
        }
    }
}

/// # Summary
/// 创建单序列折线图所需的完整描述。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    // 挂载画布标识
    pub canvas_id: String,
    // 横轴标签 (日期)
    pub labels: Vec<String>,
    pub dataset: Dataset,
    pub responsive: bool,
}
