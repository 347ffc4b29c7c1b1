//! # 测试替身
//!
//! 供各 crate 测试使用的内存版端口实现，只在 `test-utils` 特性下编译。

use crate::chart::entity::{ChartHandle, ChartSpec, Dataset};
use crate::chart::error::ChartError;
use crate::chart::port::ChartRenderer;
use crate::stock::entity::{CompanyInfo, FundamentalDetails, PricePoint, StockReply, StockReport};
use crate::stock::error::FeedError;
use crate::stock::port::StockSource;
use crate::view::entity::TableRow;
use crate::view::port::ViewBinding;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::Notify;

/// 构造一个价格点。
pub fn point(date: &str, open: f64, high: f64, low: f64, close: f64) -> PricePoint {
    PricePoint {
        date: date.to_string(),
        open,
        high,
        low,
        close,
    }
}

/// 构造一个带给定价格的成功结果。
pub fn report(ticker: &str, prices: Vec<PricePoint>) -> StockReply {
    StockReply::Report(StockReport {
        ticker: ticker.to_string(),
        fundamentals: FundamentalDetails::default(),
        company: CompanyInfo {
            name: format!("{} Inc.", ticker),
            ..CompanyInfo::default()
        },
        prices,
    })
}

/// # Summary
/// 视图上发生的一次写入。
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Loading(bool),
    Trigger(bool),
    Error(String),
    ClearError,
    Company(String),
    Fundamentals,
    Table(Vec<TableRow>),
}

/// # Summary
/// 记录所有写入的视图实现。
#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: ViewEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }

    /// 全部事件的快照。
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// 最近一次展示的错误消息。
    pub fn last_error(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::Error(msg) => Some(msg),
            _ => None,
        })
    }

    /// 最近一次挂载的表格。
    pub fn last_table(&self) -> Option<Vec<TableRow>> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::Table(rows) => Some(rows),
            _ => None,
        })
    }

    /// 最近一次加载指示器的状态，从未设置时为 false。
    pub fn loading(&self) -> bool {
        self.events()
            .into_iter()
            .rev()
            .find_map(|e| match e {
                ViewEvent::Loading(v) => Some(v),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// 最近一次触发控件的状态，从未设置时为 true。
    pub fn trigger_enabled(&self) -> bool {
        self.events()
            .into_iter()
            .rev()
            .find_map(|e| match e {
                ViewEvent::Trigger(v) => Some(v),
                _ => None,
            })
            .unwrap_or(true)
    }
}

impl ViewBinding for RecordingView {
    fn set_loading(&self, visible: bool) {
        self.push(ViewEvent::Loading(visible));
    }

    fn set_trigger_enabled(&self, enabled: bool) {
        self.push(ViewEvent::Trigger(enabled));
    }

    fn show_error(&self, message: &str) {
        self.push(ViewEvent::Error(message.to_string()));
    }

    fn clear_error(&self) {
        self.push(ViewEvent::ClearError);
    }

    fn show_company(&self, ticker: &str, _info: &CompanyInfo) {
        self.push(ViewEvent::Company(ticker.to_string()));
    }

    fn show_fundamentals(&self, _details: &FundamentalDetails) {
        self.push(ViewEvent::Fundamentals);
    }

    fn mount_table(&self, rows: &[TableRow]) {
        self.push(ViewEvent::Table(rows.to_vec()));
    }
}

/// # Summary
/// 渲染器上发生的一次操作。
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    Created(ChartHandle),
    Updated(ChartHandle),
    Destroyed(ChartHandle),
}

/// # Summary
/// 内存版图表渲染器，记录实例的创建、更新与销毁。
///
/// # Invariants
/// - `live` 中只保存尚未销毁的实例。
#[derive(Default)]
pub struct MemoryChart {
    next_id: AtomicU64,
    canvas_missing: AtomicBool,
    live: Mutex<HashMap<ChartHandle, ChartSpec>>,
    events: Mutex<Vec<ChartEvent>>,
}

impl MemoryChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟画布无法获取。
    pub fn set_canvas_missing(&self, missing: bool) {
        self.canvas_missing.store(missing, Ordering::SeqCst);
    }

    /// 当前存活的实例数量。
    pub fn live_count(&self) -> usize {
        self.live.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// 获取某个存活实例的当前描述。
    pub fn spec(&self, handle: ChartHandle) -> Option<ChartSpec> {
        self.live
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&handle)
            .cloned()
    }

    pub fn events(&self) -> Vec<ChartEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn push(&self, event: ChartEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

impl ChartRenderer for MemoryChart {
    fn create(&self, spec: &ChartSpec) -> Result<ChartHandle, ChartError> {
        if self.canvas_missing.load(Ordering::SeqCst) {
            return Err(ChartError::CanvasUnavailable(spec.canvas_id.clone()));
        }
        let handle = ChartHandle(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.live
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(handle, spec.clone());
        self.push(ChartEvent::Created(handle));
        Ok(handle)
    }

    fn update(&self, handle: ChartHandle, dataset: &Dataset) -> Result<(), ChartError> {
        {
            let mut live = self.live.lock().unwrap_or_else(|e| e.into_inner());
            let spec = live.get_mut(&handle).ok_or(ChartError::UnknownChart)?;
            spec.dataset = dataset.clone();
        }
        self.push(ChartEvent::Updated(handle));
        Ok(())
    }

    fn destroy(&self, handle: ChartHandle) {
        let removed = self
            .live
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&handle);
        if removed.is_some() {
            self.push(ChartEvent::Destroyed(handle));
        }
    }
}

/// # Summary
/// 预置应答的数据源。
///
/// # Invariants
/// - 应答按入队顺序逐个消费，耗尽后返回解析错误。
/// - 设置闸门后，`fetch` 会等待闸门 `Notify` 放行。
#[derive(Default)]
pub struct ScriptedSource {
    replies: Mutex<VecDeque<Result<StockReply, FeedError>>>,
    queries: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建一个需要手动放行的数据源，返回放行用的 `Notify`。
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let source = Self {
            gate: Some(gate.clone()),
            ..Self::default()
        };
        (source, gate)
    }

    pub fn push(&self, reply: Result<StockReply, FeedError>) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
    }

    /// 已收到的查询。
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl StockSource for ScriptedSource {
    async fn fetch(&self, query: &str) -> Result<StockReply, FeedError> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(query.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(FeedError::Parse("no scripted reply".into())))
    }
}
