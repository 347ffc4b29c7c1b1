//! # stockview-view
//!
//! `StockView` 控制器及其表格、图表辅助逻辑。

pub mod chart;
pub mod stock_view;
pub mod table;

pub use stock_view::StockView;
