use crate::stock::entity::{CompanyInfo, FundamentalDetails};
use crate::view::entity::TableRow;

/// # Summary
/// 页面绑定接口，把控制器与具体的渲染环境隔离开。
///
/// # Invariants
/// - 实现者必须是 `Send` 和 `Sync`，所有方法只做展示，不得回调控制器。
/// - `mount_table` 整体替换已有表格内容，不做增量更新。
pub trait ViewBinding: Send + Sync {
    /// 显示或隐藏加载指示器。
    fn set_loading(&self, visible: bool);

    /// 启用或禁用触发查询的控件。
    fn set_trigger_enabled(&self, enabled: bool);

    /// 在错误区域展示消息。
    fn show_error(&self, message: &str);

    /// 清除错误区域。
    fn clear_error(&self);

    /// # Summary
    /// 渲染公司概况。
    ///
    /// # Arguments
    /// * `ticker`: 证券代码。
    /// * `info`: 名称、行业与简介。
    fn show_company(&self, ticker: &str, info: &CompanyInfo);

    /// 渲染基本面表格。
    fn show_fundamentals(&self, details: &FundamentalDetails);

    /// # Summary
    /// 挂载历史价格表格。
    ///
    /// # Arguments
    /// * `rows`: 已格式化的全部行，按展示顺序排列。
    fn mount_table(&self, rows: &[TableRow]);
}
