use crate::payload::decode_reply;
use async_trait::async_trait;
use reqwest::Client;
use rustls::crypto::CryptoProvider;
use std::time::Duration;
use stockview_core::config::{BackendConfig, FieldMapping};
use stockview_core::stock::entity::StockReply;
use stockview_core::stock::error::FeedError;
use stockview_core::stock::port::StockSource;
use tracing::{debug, info};

/// # Summary
/// 通过后端 `/get_stock` 接口获取股票数据的数据源实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯。
/// - 每次 `fetch` 只发出一个请求，不重试。
#[derive(Clone)]
pub struct HttpStockSource {
    /// 内部使用的 HTTP 客户端
    client: Client,
    // 完整的接口地址，例如 http://127.0.0.1:5000/get_stock
    endpoint: String,
    mapping: FieldMapping,
}

impl HttpStockSource {
    /// # Summary
    /// 创建一个新的 HttpStockSource 实例。
    ///
    /// # Logic
    /// 1. 确认进程内已安装 rustls 加密后端（由调用方负责安装）。
    /// 2. 按配置设置请求超时并初始化 reqwest 客户端。
    /// 3. 规范化根地址并拼接 `/get_stock`。
    ///
    /// # Arguments
    /// * `backend`: 后端地址与超时配置。
    /// * `mapping`: 历史价格字段映射。
    ///
    /// # Returns
    /// 未安装加密后端或客户端构建失败返回 `FeedError::Network`。
    pub fn new(backend: &BackendConfig, mapping: FieldMapping) -> Result<Self, FeedError> {
        if CryptoProvider::get_default().is_none() {
            return Err(FeedError::Network(
                "no rustls crypto provider installed".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(backend.timeout_secs))
            .build()
            .map_err(|e| FeedError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint_for(&backend.base_url),
            mapping,
        })
    }

    /// 请求发往的接口地址。
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn endpoint_for(base_url: &str) -> String {
    format!("{}/get_stock", base_url.trim_end_matches('/'))
}

#[async_trait]
impl StockSource for HttpStockSource {
    /// # Summary
    /// 向后端查询公司股票数据。
    ///
    /// # Logic
    /// 1. 发起 `GET /get_stock?company_name=<query>`。
    /// 2. 读取完整响应体。
    /// 3. 成功状态码直接解码。
    /// 4. 非成功状态码若携带错误载荷则按后端错误返回，否则视为传输失败。
    async fn fetch(&self, query: &str) -> Result<StockReply, FeedError> {
        debug!("GET {} company_name={}", self.endpoint, query);

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("company_name", query)])
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        if status.is_success() {
            let reply = decode_reply(&body, &self.mapping)?;
            info!("Fetched stock data for '{}' (HTTP {})", query, status.as_u16());
            return Ok(reply);
        }

        match decode_reply(&body, &self.mapping) {
            Ok(reply @ StockReply::Error(_)) => {
                info!("Backend rejected '{}' (HTTP {})", query, status.as_u16());
                Ok(reply)
            }
            _ => Err(FeedError::Status(status.as_u16())),
        }
    }
}
