use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::error::AppError;
use crate::poller::PriceSource;

use super::types::{BinanceApiErrorResponse, BinanceTickerPrice};

pub const TICKER_PRICE_PATH: &str = "/api/v3/ticker/price";

pub struct BinanceRestClient {
    http: reqwest::Client,
    base_url: String,
}

impl BinanceRestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Batch price query URL: `...?symbols=[%22A%22,%22B%22]`.
    pub fn ticker_price_url(&self, symbols: &[String]) -> String {
        let quoted = symbols
            .iter()
            .map(|s| {
                let encoded: String = url::form_urlencoded::byte_serialize(s.as_bytes()).collect();
                format!("%22{}%22", encoded)
            })
            .collect::<Vec<_>>()
            .join(",");
        format!("{}{}?symbols=[{}]", self.base_url, TICKER_PRICE_PATH, quoted)
    }

    /// Current prices for all `symbols` in a single request.
    pub async fn ticker_prices(&self, symbols: &[String]) -> Result<Vec<BinanceTickerPrice>> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.ticker_price_url(symbols);
        tracing::debug!(count = symbols.len(), url = %url, "Fetching ticker prices");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(AppError::from)
            .context("ticker_prices HTTP failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            if let Ok(err) = serde_json::from_str::<BinanceApiErrorResponse>(&body) {
                return Err(AppError::BinanceApi {
                    code: err.code,
                    msg: err.msg,
                }
                .into());
            }
            return Err(anyhow::anyhow!(
                "Ticker price request failed ({}): {}",
                status,
                body
            ));
        }

        let body = resp
            .text()
            .await
            .map_err(AppError::from)
            .context("ticker_prices body read failed")?;
        let prices: Vec<BinanceTickerPrice> =
            serde_json::from_str(&body).map_err(AppError::from)?;
        tracing::debug!(count = prices.len(), "Ticker prices received");
        Ok(prices)
    }
}

#[async_trait]
impl PriceSource for BinanceRestClient {
    async fn fetch_prices(&self, symbols: &[String]) -> Result<Vec<BinanceTickerPrice>> {
        self.ticker_prices(symbols).await
    }
}
