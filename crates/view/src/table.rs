use stockview_core::stock::entity::PricePoint;
use stockview_core::view::entity::TableRow;

/// # Summary
/// 把历史价格转换为表格行。
///
/// # Invariants
/// - 输出行数与输入点数相同，顺序一致，任何点都不会被跳过。
/// - 数值列固定保留两位小数。
pub fn render_rows(points: &[PricePoint]) -> Vec<TableRow> {
    points.iter().map(TableRow::from).collect()
}
