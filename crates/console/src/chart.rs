use crate::output::Output;
use colored::Colorize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use stockview_core::chart::entity::{ChartHandle, ChartSpec, Dataset};
use stockview_core::chart::error::ChartError;
use stockview_core::chart::port::ChartRenderer;
use tracing::debug;

const POINT: char = '●';
const STEM: char = '│';
const VOID: char = ' ';

/// # Summary
/// 终端文本折线图渲染器。
///
/// # Invariants
/// - 只认自己绑定的画布标识，其他画布视为不可用。
/// - `charts` 中只保存尚未销毁的实例。
pub struct ConsoleChart {
    out: Output,
    canvas_id: String,
    height: u16,
    width: u16,
    next_id: AtomicU64,
    charts: Mutex<HashMap<ChartHandle, ChartSpec>>,
}

impl ConsoleChart {
    /// # Summary
    /// 创建渲染器。
    ///
    /// # Arguments
    /// * `out`: 输出端。
    /// * `canvas_id`: 绑定的画布标识。
    /// * `height`: 绘图区行数，至少 2。
    /// * `width`: 绘图区最大列数，至少 2。
    pub fn new(out: Output, canvas_id: impl Into<String>, height: u16, width: u16) -> Self {
        Self {
            out,
            canvas_id: canvas_id.into(),
            height: height.max(2),
            width: width.max(2),
            next_id: AtomicU64::new(1),
            charts: Mutex::new(HashMap::new()),
        }
    }

    /// 存活实例数量。
    pub fn live_count(&self) -> usize {
        self.charts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn draw(&self, spec: &ChartSpec) {
        let color = spec.dataset.border_color.as_str();
        self.out.line("");
        self.out
            .line(format!("Stock Price Trend: {}", spec.dataset.label).bold());
        for (axis, body) in plot(&spec.dataset, self.height, self.width) {
            self.out.line(format!("{} {}", axis, body.color(color)));
        }
        if let (Some(first), Some(last)) = (spec.labels.first(), spec.labels.last()) {
            self.out.line(format!("{:>10}  {} .. {}", "", first, last));
        }
    }
}

impl ChartRenderer for ConsoleChart {
    fn create(&self, spec: &ChartSpec) -> Result<ChartHandle, ChartError> {
        if spec.canvas_id != self.canvas_id {
            return Err(ChartError::CanvasUnavailable(spec.canvas_id.clone()));
        }
        let handle = ChartHandle(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.charts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(handle, spec.clone());
        debug!("Created console chart {:?} on {}", handle, spec.canvas_id);
        self.draw(spec);
        Ok(handle)
    }

    fn update(&self, handle: ChartHandle, dataset: &Dataset) -> Result<(), ChartError> {
        let spec = {
            let mut charts = self.charts.lock().unwrap_or_else(|e| e.into_inner());
            let spec = charts.get_mut(&handle).ok_or(ChartError::UnknownChart)?;
            spec.dataset = dataset.clone();
            spec.clone()
        };
        self.draw(&spec);
        Ok(())
    }

    fn destroy(&self, handle: ChartHandle) {
        if self
            .charts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&handle)
            .is_some()
        {
            debug!("Destroyed console chart {:?}", handle);
        }
    }
}

/// # Summary
/// 把数据集绘制为若干行文本。
///
/// # Logic
/// 1. 点数不超过列宽时每点一列，否则按列均匀抽样。
/// 2. 每个值映射到最接近的行，最高价在顶行；所有值相同时居中。
/// 3. 相邻两列之间用竖线补齐，使折线连续。
/// 4. 顶行与底行左侧标注最大值与最小值。
///
/// # Returns
/// 每行一个 (纵轴标注, 绘图区) 二元组；数据为空时返回单行提示。
pub fn plot(dataset: &Dataset, height: u16, width: u16) -> Vec<(String, String)> {
    let data = &dataset.data;
    if data.is_empty() {
        return vec![(format!("{:>10}", ""), "(no data)".to_string())];
    }

    let height = height.max(2);
    let columns = sample(data, usize::from(width.max(2)));
    let max = columns.iter().copied().fold(f64::MIN, f64::max);
    let min = columns.iter().copied().fold(f64::MAX, f64::min);
    let rows: Vec<u16> = columns
        .iter()
        .map(|v| nearest_row(*v, min, max, height))
        .collect();

    let mut grid = vec![vec![VOID; columns.len()]; usize::from(height)];
    for (col, &row) in rows.iter().enumerate() {
        if col > 0 {
            let prev = rows[col - 1];
            let (top, bottom) = if prev < row { (prev, row) } else { (row, prev) };
            for r in top.saturating_add(1)..bottom {
                grid[usize::from(r)][col] = STEM;
            }
        }
        grid[usize::from(row)][col] = POINT;
    }

    grid.into_iter()
        .enumerate()
        .map(|(r, cells)| {
            let axis = if r == 0 {
                format!("{:>10.2}", max)
            } else if r + 1 == usize::from(height) {
                format!("{:>10.2}", min)
            } else {
                format!("{:>10}", "")
            };
            (axis, cells.into_iter().collect())
        })
        .collect()
}

// 点数多于列数时按列等距取样，首尾两点总会保留
fn sample(data: &[f64], width: usize) -> Vec<f64> {
    if data.len() <= width {
        return data.to_vec();
    }
    let last = data.len() - 1;
    (0..width)
        .map(|col| data[col * last / (width - 1)])
        .collect()
}

fn nearest_row(value: f64, min: f64, max: f64, height: u16) -> u16 {
    let span = max - min;
    let steps = f64::from(height - 1);
    if span <= f64::EPSILON {
        return (height - 1) / 2;
    }
    (0..height)
        .min_by(|a, b| {
            let la = max - span * f64::from(*a) / steps;
            let lb = max - span * f64::from(*b) / steps;
            (la - value).abs().total_cmp(&(lb - value).abs())
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::SharedBuffer;

    fn dataset(data: Vec<f64>) -> Dataset {
        Dataset {
            label: "Closing Price".into(),
            border_color: "blue".into(),
            data,
            fill: false,
        }
    }

    fn spec(canvas: &str, data: Vec<f64>) -> ChartSpec {
        ChartSpec {
            canvas_id: canvas.into(),
            labels: (0..data.len()).map(|i| format!("d{}", i)).collect(),
            dataset: dataset(data),
            responsive: true,
        }
    }

    #[test]
    fn test_plot_extremes_on_edges() {
        let lines = plot(&dataset(vec![1.0, 3.0, 2.0]), 3, 10);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].1, " ● ");
        assert_eq!(lines[1].1, " │●");
        assert_eq!(lines[2].1, "●  ");
        assert_eq!(lines[0].0.trim(), "3.00");
        assert_eq!(lines[2].0.trim(), "1.00");
    }

    #[test]
    fn test_plot_connects_gaps() {
        let lines = plot(&dataset(vec![0.0, 4.0]), 5, 10);
        let col: Vec<char> = lines.iter().map(|(_, b)| b.chars().nth(0).unwrap()).collect();
        assert_eq!(col, vec![' ', ' ', ' ', ' ', '●']);
        let col: Vec<char> = lines.iter().map(|(_, b)| b.chars().nth(1).unwrap()).collect();
        assert_eq!(col, vec!['●', '│', '│', '│', ' ']);
    }

    #[test]
    fn test_plot_flat_series_is_centered() {
        let lines = plot(&dataset(vec![5.0, 5.0]), 5, 10);
        assert_eq!(lines[2].1, "●●");
    }

    #[test]
    fn test_plot_samples_wide_series() {
        let data: Vec<f64> = (0..100).map(f64::from).collect();
        let lines = plot(&dataset(data), 4, 20);
        assert!(lines.iter().all(|(_, body)| body.chars().count() == 20));
        assert_eq!(lines[0].0.trim(), "99.00");
    }

    #[test]
    fn test_plot_empty() {
        let lines = plot(&dataset(vec![]), 4, 20);
        assert_eq!(lines[0].1, "(no data)");
    }

    #[test]
    fn test_renderer_lifecycle() {
        colored::control::set_override(false);
        let buf = SharedBuffer::new();
        let chart = ConsoleChart::new(Output::new(buf.clone()), "stockChart", 4, 20);

        let handle = chart.create(&spec("stockChart", vec![1.0, 2.0])).unwrap();
        assert_eq!(chart.live_count(), 1);
        assert!(buf.contents().contains("Stock Price Trend: Closing Price"));

        let mut high = dataset(vec![3.0, 4.0]);
        high.label = "High Price".into();
        high.border_color = "red".into();
        chart.update(handle, &high).unwrap();
        assert!(buf.contents().contains("Stock Price Trend: High Price"));

        chart.destroy(handle);
        assert_eq!(chart.live_count(), 0);
        assert_eq!(chart.update(handle, &high), Err(ChartError::UnknownChart));
    }

    #[test]
    fn test_foreign_canvas_is_unavailable() {
        let chart = ConsoleChart::new(Output::new(SharedBuffer::new()), "stockChart", 4, 20);
        let err = chart.create(&spec("otherCanvas", vec![1.0])).unwrap_err();
        assert_eq!(err, ChartError::CanvasUnavailable("otherCanvas".into()));
        assert_eq!(chart.live_count(), 0);
    }
}
