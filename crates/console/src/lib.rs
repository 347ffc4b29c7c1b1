//! # stockview-console
//!
//! 终端版的页面绑定与图表渲染器。

pub mod chart;
pub mod output;
pub mod view;
