use crate::chart::{ChartSlot, initial_spec, series_dataset};
use crate::table::render_rows;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use stockview_core::chart::entity::ChartHandle;
use stockview_core::chart::error::ChartError;
use stockview_core::chart::port::ChartRenderer;
use stockview_core::common::PriceSeries;
use stockview_core::config::ChartConfig;
use stockview_core::stock::entity::{PricePoint, StockReply};
use stockview_core::stock::port::StockSource;
use stockview_core::view::entity::{LookupOutcome, SeriesOutcome};
use stockview_core::view::error::LookupError;
use stockview_core::view::port::ViewBinding;
use tracing::{debug, info, warn};

/// # Summary
/// 控制器内部的可变状态。
///
/// # Invariants
/// - `prices` 与 `chart` 中的实例始终来自同一次成功查询。
#[derive(Default)]
struct ViewState {
    // 当前图表实例
    chart: ChartSlot,
    // 最近一次成功查询的历史价格，用于切换序列
    prices: Vec<PricePoint>,
    // 当前展示的序列
    series: PriceSeries,
}

/// # Summary
/// 股票视图控制器：查询、渲染表格、维护图表生命周期、切换序列。
///
/// # Invariants
/// - 同一时刻最多只有一个查询在进行，重叠的查询被拒绝。
/// - 图表实例由控制器独占，新查询成功后先销毁旧实例再创建。
/// - 状态锁从不跨越 `.await` 持有。
pub struct StockView {
    source: Arc<dyn StockSource>,
    view: Arc<dyn ViewBinding>,
    renderer: Arc<dyn ChartRenderer>,
    canvas_id: String,
    responsive: bool,
    in_flight: AtomicBool,
    state: Mutex<ViewState>,
}

/// 查询期间持有，离开作用域时复位进行中标记并重新启用触发控件。
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    view: &'a dyn ViewBinding,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
        self.view.set_trigger_enabled(true);
    }
}

impl StockView {
    /// # Summary
    /// 创建控制器。
    ///
    /// # Arguments
    /// * `source`: 股票数据来源。
    /// * `view`: 页面绑定。
    /// * `renderer`: 图表渲染器。
    /// * `chart`: 画布标识与自适应配置。
    pub fn new(
        source: Arc<dyn StockSource>,
        view: Arc<dyn ViewBinding>,
        renderer: Arc<dyn ChartRenderer>,
        chart: &ChartConfig,
    ) -> Self {
        Self {
            source,
            view,
            renderer,
            canvas_id: chart.canvas_id.clone(),
            responsive: chart.responsive,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(ViewState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 是否有查询正在进行。
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// 当前存活的图表实例。
    pub fn chart_handle(&self) -> Option<ChartHandle> {
        self.state().chart.handle()
    }

    /// 当前展示的价格序列。
    pub fn selected_series(&self) -> PriceSeries {
        self.state().series
    }

    /// # Summary
    /// 执行一次查询并渲染结果。
    ///
    /// # Logic
    /// 1. 若已有查询在进行，直接返回 `Busy`，不触碰视图。
    /// 2. 禁用触发控件；空查询展示提示后结束，不发请求。
    /// 3. 显示加载指示器，请求数据源，结束后隐藏加载指示器。
    /// 4. 后端错误、无历史数据、传输失败分别展示对应提示并结束。
    /// 5. 成功时清除错误，渲染公司信息、基本面、价格表格，最后重建图表。
    ///
    /// # Arguments
    /// * `query`: 用户输入的公司名称。
    ///
    /// # Returns
    /// 成功返回 `LookupOutcome`；失败返回 `LookupError`，此时提示已写入错误区域。
    pub async fn lookup(&self, query: &str) -> Result<LookupOutcome, LookupError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Lookup for '{}' refused, another lookup is in flight", query);
            return Ok(LookupOutcome::Busy);
        }
        let _guard = InFlightGuard {
            flag: &self.in_flight,
            view: self.view.as_ref(),
        };
        self.view.set_trigger_enabled(false);

        let query = query.trim();
        if query.is_empty() {
            return Err(self.fail(LookupError::EmptyQuery));
        }

        info!("Looking up '{}'", query);
        self.view.set_loading(true);
        let reply = self.source.fetch(query).await;
        self.view.set_loading(false);

        let report = match reply {
            Ok(StockReply::Report(report)) => report,
            Ok(StockReply::Error(message)) => return Err(self.fail(LookupError::Backend(message))),
            Err(e) => return Err(self.fail(LookupError::Transport(e))),
        };

        if report.prices.is_empty() {
            return Err(self.fail(LookupError::NoData));
        }

        self.view.clear_error();
        self.view.show_company(&report.ticker, &report.company);
        self.view.show_fundamentals(&report.fundamentals);
        let rows = render_rows(&report.prices);
        self.view.mount_table(&rows);

        let spec = initial_spec(&self.canvas_id, self.responsive, &report.prices);
        let created = {
            let mut state = self.state();
            state.series = PriceSeries::Close;
            state.prices = report.prices;
            state.chart.replace(self.renderer.as_ref(), &spec)
        };

        match created {
            Ok(handle) => {
                info!(
                    "Rendered {} rows for {} (chart {:?})",
                    rows.len(),
                    report.ticker,
                    handle
                );
                Ok(LookupOutcome::Rendered {
                    ticker: report.ticker,
                    rows: rows.len(),
                })
            }
            Err(e) => Err(self.fail(LookupError::Chart(e))),
        }
    }

    /// # Summary
    /// 切换图表展示的价格序列。
    ///
    /// # Logic
    /// 1. 没有存活图表时不做任何事，返回 `NoChart`。
    /// 2. 按序列重建数据集（标签、颜色、数值），原地更新现有实例并重绘。
    /// 3. 横轴标签与实例身份保持不变。
    ///
    /// # Returns
    /// 渲染器更新失败返回 `ChartError`。
    pub fn select_series(&self, series: PriceSeries) -> Result<SeriesOutcome, ChartError> {
        let mut state = self.state();
        let dataset = series_dataset(&state.prices, series);

        match state.chart.update(self.renderer.as_ref(), &dataset)? {
            Some(_) => {
                state.series = series;
                debug!("Chart switched to {} series", series);
                Ok(SeriesOutcome::Updated(series))
            }
            None => Ok(SeriesOutcome::NoChart),
        }
    }

    /// 销毁当前图表实例。
    pub fn dispose(&self) {
        self.state().chart.dispose(self.renderer.as_ref());
    }

    fn fail(&self, err: LookupError) -> LookupError {
        warn!("Lookup failed: {}", err);
        self.view.show_error(err.user_message());
        err
    }
}

impl Drop for StockView {
    fn drop(&mut self) {
        self.dispose();
    }
}
