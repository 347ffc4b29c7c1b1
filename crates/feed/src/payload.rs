//! # `/get_stock` 载荷解码
//!
//! 把后端返回的 JSON 转换为 `StockReply`。历史价格条目按 `FieldMapping`
//! 取值，缺失、非数值或非有限的价格字段归零，任何条目都不会被丢弃。

use serde_json::{Map, Value};
use stockview_core::config::FieldMapping;
use stockview_core::stock::entity::{
    CompanyInfo, FundamentalDetails, PricePoint, StockReply, StockReport,
};
use stockview_core::stock::error::FeedError;
use tracing::warn;

/// # Summary
/// 从原始字节解码响应体。
///
/// # Arguments
/// * `body`: 响应体。
/// * `mapping`: 历史价格字段映射。
///
/// # Returns
/// 成功返回 `StockReply`，JSON 不合法返回 `FeedError::Parse`。
pub fn decode_reply(body: &[u8], mapping: &FieldMapping) -> Result<StockReply, FeedError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| FeedError::Parse(e.to_string()))?;
    decode_value(value, mapping)
}

/// # Summary
/// 从已解析的 JSON 值解码响应。
///
/// # Logic
/// 1. 顶层必须是对象。
/// 2. 存在非空的 `error` 字段时直接返回后端错误。
/// 3. 依次解码代码、基本面、公司信息与历史价格；前三者缺失或形状不符时取默认值。
/// 4. `historical_prices` 缺失视为空序列，存在但不是数组视为解析错误。
pub fn decode_value(value: Value, mapping: &FieldMapping) -> Result<StockReply, FeedError> {
    let Value::Object(mut obj) = value else {
        return Err(FeedError::Parse("response body is not a JSON object".into()));
    };

    if let Some(message) = backend_error(obj.get("error")) {
        return Ok(StockReply::Error(message));
    }

    let ticker = obj
        .get("ticker")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let fundamentals = section::<FundamentalDetails>(&mut obj, "fundamental_details");
    let company = section::<CompanyInfo>(&mut obj, "company_info");

    let prices = match obj.remove("historical_prices") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(|item| decode_point(item, mapping)).collect(),
        Some(other) => {
            return Err(FeedError::Parse(format!(
                "historical_prices is not an array: {}",
                other
            )));
        }
    };

    Ok(StockReply::Report(StockReport {
        ticker,
        fundamentals,
        company,
        prices,
    }))
}

/// 解码单个历史价格条目。非对象条目整体取默认值。
pub fn decode_point(item: &Value, mapping: &FieldMapping) -> PricePoint {
    let Some(obj) = item.as_object() else {
        warn!("historical price entry is not an object: {}", item);
        return PricePoint {
            date: String::new(),
            open: 0.0,
            high: 0.0,
            low: 0.0,
            close: 0.0,
        };
    };

    PricePoint {
        date: text(obj, &mapping.date),
        open: number(obj, &mapping.open),
        high: number(obj, &mapping.high),
        low: number(obj, &mapping.low),
        close: number(obj, &mapping.close),
    }
}

// 与页面脚本的真值判断保持一致：null、false、空字符串都不算错误
fn backend_error(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn section<T>(obj: &mut Map<String, Value>, key: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    match obj.remove(key) {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("malformed {} section, using defaults: {}", key, e);
            T::default()
        }),
    }
}

fn number(obj: &Map<String, Value>, key: &str) -> f64 {
    match obj.get(key) {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or_default(),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or_default(),
        _ => 0.0,
    }
}

fn text(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stockview_core::stock::entity::Figure;
    use stockview_core::view::entity::TableRow;

    fn report(value: Value, mapping: &FieldMapping) -> StockReport {
        match decode_value(value, mapping).unwrap() {
            StockReply::Report(r) => r,
            StockReply::Error(e) => panic!("unexpected backend error: {}", e),
        }
    }

    #[test]
    fn test_backend_error_wins() {
        let reply = decode_value(
            json!({"error": "Could not determine the stock ticker. Try again.", "ticker": "X"}),
            &FieldMapping::default(),
        )
        .unwrap();
        assert_eq!(
            reply,
            StockReply::Error("Could not determine the stock ticker. Try again.".into())
        );
    }

    #[test]
    fn test_falsy_error_is_ignored() {
        let r = report(
            json!({"error": "", "ticker": "AAPL", "historical_prices": []}),
            &FieldMapping::default(),
        );
        assert_eq!(r.ticker, "AAPL");
        assert!(r.prices.is_empty());
    }

    #[test]
    fn test_full_payload() {
        let r = report(
            json!({
                "ticker": "AAPL",
                "fundamental_details": {
                    "Revenue": 383.29, "NetIncome": 96.99, "EPS": 6.13,
                    "MarketCap": 2950.0, "P/E Ratio": "N/A"
                },
                "company_info": {
                    "Name": "Apple Inc.", "Sector": "Technology",
                    "Industry": "Consumer Electronics", "Description": "Makes phones."
                },
                "historical_prices": [
                    {"date": "2024-03-01", "Open": 179.55, "High": 180.53, "Low": 177.38, "Close": 179.66, "Volume": 73488000},
                    {"date": "2024-03-04", "Open": 176.15, "High": 176.90, "Low": 173.79, "Close": 175.10}
                ]
            }),
            &FieldMapping::default(),
        );
        assert_eq!(r.company.name, "Apple Inc.");
        assert_eq!(r.fundamentals.eps, Figure::Number(6.13));
        assert_eq!(r.fundamentals.pe_ratio, Figure::Text("N/A".into()));
        assert_eq!(r.prices.len(), 2);
        assert_eq!(r.prices[0].date, "2024-03-01");
        assert_eq!(r.prices[1].close, 175.10);
    }

    #[test]
    fn test_close_price_mapping() {
        let mapping = FieldMapping::with_close_key("close_price");
        let r = report(
            json!({"historical_prices": [{"date": "d1", "Open": 1.0, "close_price": 2.5, "Close": 9.0}]}),
            &mapping,
        );
        assert_eq!(r.prices[0].close, 2.5);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let r = report(
            json!({"historical_prices": [{"date": "d1", "Close": 3.0}, {"Open": "4.5", "High": null}]}),
            &FieldMapping::default(),
        );
        assert_eq!(r.prices.len(), 2);
        assert_eq!((r.prices[0].open, r.prices[0].high, r.prices[0].low), (0.0, 0.0, 0.0));
        assert_eq!(r.prices[0].close, 3.0);
        assert_eq!(r.prices[1].date, "");
        assert_eq!(r.prices[1].open, 4.5);
    }

    #[test]
    fn test_non_finite_strings_default_to_zero() {
        let point = decode_point(
            &json!({"date": "d1", "Open": "NaN", "High": "inf", "Low": "-infinity", "Close": 1.0}),
            &FieldMapping::default(),
        );
        assert_eq!((point.open, point.high, point.low), (0.0, 0.0, 0.0));

        let row = TableRow::from(&point);
        assert_eq!(row.open, "0.00");
        assert_eq!(row.high, "0.00");
        assert_eq!(row.low, "0.00");
        assert_eq!(row.close, "1.00");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let r = report(json!({"ticker": "MSFT"}), &FieldMapping::default());
        assert_eq!(r.company, CompanyInfo::default());
        assert_eq!(r.fundamentals.revenue, Figure::Missing);
        assert!(r.prices.is_empty());
    }

    #[test]
    fn test_invalid_shapes_are_parse_errors() {
        assert!(matches!(
            decode_value(json!([1, 2]), &FieldMapping::default()),
            Err(FeedError::Parse(_))
        ));
        assert!(matches!(
            decode_value(json!({"historical_prices": "none"}), &FieldMapping::default()),
            Err(FeedError::Parse(_))
        ));
        assert!(matches!(
            decode_reply(b"<html>", &FieldMapping::default()),
            Err(FeedError::Parse(_))
        ));
    }
}
