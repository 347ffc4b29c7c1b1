//! # stockview-core
//!
//! 股票视图的领域模型：实体、错误枚举、端口接口与配置。
//! 具体实现位于 `feed`（数据来源）、`view`（控制器）与 `console`（渲染适配）。

pub mod chart;
pub mod common;
pub mod config;
pub mod stock;
pub mod view;

#[cfg(feature = "test-utils")]
pub mod testing;
