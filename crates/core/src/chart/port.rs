use crate::chart::entity::{ChartHandle, ChartSpec, Dataset};
use crate::chart::error::ChartError;

/// # Summary
/// 图表渲染器接口，对应页面上的图表库。
///
/// # Invariants
/// - 实现者必须是 `Send` 和 `Sync`，内部状态自行使用内部可变性。
/// - 同一个画布上的旧实例由调用方负责先销毁再创建。
pub trait ChartRenderer: Send + Sync {
    /// # Summary
    /// 在画布上创建新的折线图并完成首次绘制。
    ///
    /// # Arguments
    /// * `spec`: 图表描述。
    ///
    /// # Returns
    /// 成功返回实例句柄，画布不可用返回 `ChartError::CanvasUnavailable`。
    fn create(&self, spec: &ChartSpec) -> Result<ChartHandle, ChartError>;

    /// # Summary
    /// 替换实例的唯一数据集并重绘，横轴标签保持不变。
    ///
    /// # Arguments
    /// * `handle`: 实例句柄。
    /// * `dataset`: 新数据集。
    ///
    /// # Returns
    /// 句柄无效返回 `ChartError::UnknownChart`。
    fn update(&self, handle: ChartHandle, dataset: &Dataset) -> Result<(), ChartError>;

    /// # Summary
    /// 销毁实例并释放其渲染资源。未知句柄直接忽略。
    fn destroy(&self, handle: ChartHandle);
}
