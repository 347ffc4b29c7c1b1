use crate::output::Output;
use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};
use stockview_core::stock::entity::{CompanyInfo, FundamentalDetails};
use stockview_core::view::entity::TableRow;
use stockview_core::view::port::ViewBinding;
use tracing::debug;

/// # Summary
/// 把页面绑定映射到终端输出的视图实现。
///
/// # Invariants
/// - 加载指示器只在状态切换时输出，重复设置不会重复打印。
/// - 触发控件没有终端对应物，只记录状态，可通过 `trigger_enabled` 查询。
pub struct ConsoleView {
    out: Output,
    loading: AtomicBool,
    trigger_enabled: AtomicBool,
}

impl ConsoleView {
    pub fn new(out: Output) -> Self {
        Self {
            out,
            loading: AtomicBool::new(false),
            trigger_enabled: AtomicBool::new(true),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Output::stdout())
    }

    /// 当前是否允许发起新的查询。
    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled.load(Ordering::SeqCst)
    }

    /// 当前加载指示器是否可见。
    pub fn loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }
}

impl ViewBinding for ConsoleView {
    fn set_loading(&self, visible: bool) {
        let was = self.loading.swap(visible, Ordering::SeqCst);
        if visible && !was {
            self.out.line("Loading...".dimmed());
        }
    }

    fn set_trigger_enabled(&self, enabled: bool) {
        self.trigger_enabled.store(enabled, Ordering::SeqCst);
        debug!("lookup trigger enabled = {}", enabled);
    }

    fn show_error(&self, message: &str) {
        self.out.line(message.red().bold());
    }

    // 终端输出无法撤回，错误消息留在滚动历史中
    fn clear_error(&self) {}

    fn show_company(&self, ticker: &str, info: &CompanyInfo) {
        self.out.line("");
        self.out
            .line(format!("{} ({})", info.name, ticker).bold().underline());
        self.out.line(format!("{} {}", "Sector:".bold(), info.sector));
        self.out.line(format!("{} {}", "Industry:".bold(), info.industry));
        if !info.description.is_empty() {
            self.out.line(&info.description);
        }
    }

    fn show_fundamentals(&self, details: &FundamentalDetails) {
        self.out.line("");
        self.out.line("Fundamental Financials".bold());
        for (title, figure) in details.rows() {
            self.out.line(format!("  {:<24} {}", title, figure));
        }
    }

    fn mount_table(&self, rows: &[TableRow]) {
        self.out.line("");
        self.out.line("Historical Prices".bold());
        self.out.line(
            format!(
                "  {:<12} {:>10} {:>10} {:>10} {:>10}",
                "Date", "Open", "High", "Low", "Close"
            )
            .bold(),
        );
        for row in rows {
            self.out.line(format!(
                "  {:<12} {:>10} {:>10} {:>10} {:>10}",
                row.date, row.open, row.high, row.low, row.close
            ));
        }
    }
}
