use serde::Deserialize;

/// Deserialize a Binance string-encoded price, tolerating missing, null or
/// malformed values by yielding `0.0`.
pub fn string_or_number_to_f64_default<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = match v {
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        _ => None,
    };
    Ok(parsed.filter(|p| p.is_finite()).unwrap_or(0.0))
}

/// Symbol price ticker item (GET /api/v3/ticker/price).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BinanceTickerPrice {
    pub symbol: String,
    #[serde(default, deserialize_with = "string_or_number_to_f64_default")]
    pub price: f64,
}

/// Binance API error response.
#[derive(Debug, Deserialize)]
pub struct BinanceApiErrorResponse {
    pub code: i64,
    pub msg: String,
}
