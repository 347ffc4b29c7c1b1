use stockview_core::chart::entity::{ChartHandle, ChartSpec, Dataset};
use stockview_core::chart::error::ChartError;
use stockview_core::chart::port::ChartRenderer;
use stockview_core::common::PriceSeries;
use stockview_core::stock::entity::PricePoint;
use tracing::debug;

/// 首次绘制时收盘价数据集的标签
pub const INITIAL_LABEL: &str = "Closing Price";

/// # Summary
/// 构造查询成功后首次绘制的图表描述。
///
/// # Logic
/// 1. 横轴标签取所有点的日期，保持输入顺序。
/// 2. 数据集固定为收盘价，蓝色，不填充。
pub fn initial_spec(canvas_id: &str, responsive: bool, points: &[PricePoint]) -> ChartSpec {
    ChartSpec {
        canvas_id: canvas_id.to_string(),
        labels: points.iter().map(|p| p.date.clone()).collect(),
        dataset: Dataset::from_points(points, PriceSeries::Close, INITIAL_LABEL.to_string()),
        responsive,
    }
}

/// 切换序列时使用的数据集。
pub fn series_dataset(points: &[PricePoint], series: PriceSeries) -> Dataset {
    Dataset::from_points(points, series, series.dataset_label())
}

/// # Summary
/// 控制器独占的图表实例槽位。
///
/// # Invariants
/// - 任意时刻最多持有一个存活实例。
/// - 创建新实例前必须先销毁旧实例。
#[derive(Debug, Default)]
pub struct ChartSlot {
    handle: Option<ChartHandle>,
}

impl ChartSlot {
    pub fn handle(&self) -> Option<ChartHandle> {
        self.handle
    }

    /// # Summary
    /// 销毁旧实例后创建新实例。
    ///
    /// # Logic
    /// 1. 若槽位中已有实例，先调用 `destroy` 并清空槽位。
    /// 2. 调用 `create` 创建新实例；失败时槽位保持为空。
    ///
    /// # Returns
    /// 成功返回新实例句柄。
    pub fn replace(
        &mut self,
        renderer: &dyn ChartRenderer,
        spec: &ChartSpec,
    ) -> Result<ChartHandle, ChartError> {
        self.dispose(renderer);
        let handle = renderer.create(spec)?;
        self.handle = Some(handle);
        Ok(handle)
    }

    /// # Summary
    /// 原地替换现有实例的数据集。
    ///
    /// # Logic
    /// 1. 槽位为空时不做任何事，返回 `Ok(None)`。
    /// 2. 渲染器报告实例不存在时清空槽位，避免后续继续使用失效句柄。
    ///
    /// # Returns
    /// 成功返回被更新的实例句柄。
    pub fn update(
        &mut self,
        renderer: &dyn ChartRenderer,
        dataset: &Dataset,
    ) -> Result<Option<ChartHandle>, ChartError> {
        let Some(handle) = self.handle else {
            debug!("No live chart, skipping dataset update");
            return Ok(None);
        };

        match renderer.update(handle, dataset) {
            Ok(()) => Ok(Some(handle)),
            Err(ChartError::UnknownChart) => {
                self.handle = None;
                Err(ChartError::UnknownChart)
            }
            Err(e) => Err(e),
        }
    }

    /// 销毁并清空当前实例，槽位为空时无操作。
    pub fn dispose(&mut self, renderer: &dyn ChartRenderer) {
        if let Some(old) = self.handle.take() {
            debug!("Destroying chart {:?}", old);
            renderer.destroy(old);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockview_core::testing::{ChartEvent, MemoryChart, point};

    fn points() -> Vec<PricePoint> {
        vec![
            point("2024-03-01", 1.0, 3.0, 0.5, 2.0),
            point("2024-03-04", 2.0, 4.0, 1.5, 3.0),
        ]
    }

    #[test]
    fn test_initial_spec() {
        let spec = initial_spec("stockChart", true, &points());
        assert_eq!(spec.labels, vec!["2024-03-01", "2024-03-04"]);
        assert_eq!(spec.dataset.label, "Closing Price");
        assert_eq!(spec.dataset.border_color, "blue");
        assert_eq!(spec.dataset.data, vec![2.0, 3.0]);
        assert!(!spec.dataset.fill);
        assert!(spec.responsive);
    }

    #[test]
    fn test_replace_destroys_before_create() {
        let renderer = MemoryChart::new();
        let mut slot = ChartSlot::default();
        let spec = initial_spec("c", true, &points());

        let first = slot.replace(&renderer, &spec).unwrap();
        let second = slot.replace(&renderer, &spec).unwrap();

        assert_ne!(first, second);
        assert_eq!(renderer.live_count(), 1);
        assert_eq!(
            renderer.events(),
            vec![
                ChartEvent::Created(first),
                ChartEvent::Destroyed(first),
                ChartEvent::Created(second),
            ]
        );
    }

    #[test]
    fn test_failed_create_leaves_slot_empty() {
        let renderer = MemoryChart::new();
        let mut slot = ChartSlot::default();
        let spec = initial_spec("c", true, &points());
        slot.replace(&renderer, &spec).unwrap();

        renderer.set_canvas_missing(true);
        let err = slot.replace(&renderer, &spec).unwrap_err();

        assert!(matches!(err, ChartError::CanvasUnavailable(_)));
        assert_eq!(slot.handle(), None);
        assert_eq!(renderer.live_count(), 0);
    }

    #[test]
    fn test_update_without_chart_is_noop() {
        let renderer = MemoryChart::new();
        let mut slot = ChartSlot::default();
        let dataset = series_dataset(&points(), PriceSeries::High);

        assert_eq!(slot.update(&renderer, &dataset), Ok(None));
        assert!(renderer.events().is_empty());
    }

    #[test]
    fn test_stale_handle_is_forgotten() {
        let renderer = MemoryChart::new();
        let mut slot = ChartSlot::default();
        let handle = slot
            .replace(&renderer, &initial_spec("c", true, &points()))
            .unwrap();
        // 渲染环境自行回收了实例
        renderer.destroy(handle);

        let dataset = series_dataset(&points(), PriceSeries::Low);
        assert_eq!(slot.update(&renderer, &dataset), Err(ChartError::UnknownChart));
        assert_eq!(slot.handle(), None);
    }
}
