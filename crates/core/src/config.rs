use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub fields: FieldMapping,
    pub chart: ChartConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    // 后端服务根地址，`/get_stock` 会拼接在其后
    pub base_url: String,
    pub timeout_secs: u64,
}

/// # Summary
/// 历史价格条目的字段映射，决定每个数值由 JSON 中哪个键提供。
///
/// # Invariants
/// - 不同后端对收盘价的命名不同 (`Close` 或 `close_price`)，通过 `close` 配置。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FieldMapping {
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
}

impl FieldMapping {
    /// 仅替换收盘价字段键，其余保持默认。
    pub fn with_close_key(close: impl Into<String>) -> Self {
        Self {
            close: close.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    // 图表挂载的画布标识
    pub canvas_id: String,
    pub responsive: bool,
    // 控制台图表的行数与列数
    pub height: u16,
    pub width: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            date: "date".to_string(),
            open: "Open".to_string(),
            high: "High".to_string(),
            low: "Low".to_string(),
            close: "Close".to_string(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            canvas_id: "stockChart".to_string(),
            responsive: true,
            height: 12,
            width: 60,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
