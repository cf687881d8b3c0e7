use crate::errors::{CondorError, CondorResult};
use crate::feeds::MarketDataSource;
use crate::state::MarketSnapshot;
use crate::strategy::round2;
use rand::Rng;
use reqwest::Client;

/// First retry delay; doubles per attempt
const BASE_BACKOFF_MS: u64 = 500;

/// Cap on any single retry delay
const MAX_BACKOFF_MS: u64 = 8_000;

/// Yahoo Finance chart API client. Reads the latest daily close of the index
/// and of its volatility index over a 5-day window.
pub struct YahooSource {
    client: Client,
    base_url: String,
    index_symbol: String,
    vol_symbol: String,
    max_attempts: u32,
}

impl YahooSource {
    pub fn new(
        base_url: &str,
        index_symbol: &str,
        vol_symbol: &str,
        timeout_secs: u64,
        max_attempts: u32,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .user_agent(concat!("condor_strikes/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            index_symbol: index_symbol.to_string(),
            vol_symbol: vol_symbol.to_string(),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Retry transient failures with capped exponential backoff plus jitter.
    async fn last_close_with_retry(&self, symbol: &str) -> CondorResult<f64> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.last_close(symbol).await {
                Ok(price) => return Ok(price),
                Err(e) if attempt < self.max_attempts => {
                    let delay = backoff_ms(attempt);
                    tracing::warn!(
                        symbol,
                        error = %e,
                        attempt,
                        delay_ms = delay,
                        "quote fetch failed, retrying"
                    );
                    tokio::time::sleep(tokio::time::Duration::from_millis(delay)).await;
                }
                Err(e) => {
                    tracing::error!(symbol, error = %e, attempts = attempt, "quote fetch gave up");
                    return Err(CondorError::DataUnavailable(format!("{symbol}: {e}")));
                }
            }
        }
    }

    async fn last_close(&self, symbol: &str) -> CondorResult<f64> {
        let url = format!(
            "{}/v8/finance/chart/{}?range=5d&interval=1d",
            self.base_url,
            encode_symbol(symbol)
        );

        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CondorError::Network(format!("HTTP {status}: {body}")));
        }

        let chart: ChartResponse = resp
            .json()
            .await
            .map_err(|e| CondorError::Parse(format!("{symbol}: {e}")))?;

        parse_last_close(chart, symbol)
    }
}

#[async_trait::async_trait]
impl MarketDataSource for YahooSource {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn snapshot(&self) -> CondorResult<MarketSnapshot> {
        let (reference_price, volatility_percent) = tokio::try_join!(
            self.last_close_with_retry(&self.index_symbol),
            self.last_close_with_retry(&self.vol_symbol),
        )?;

        tracing::info!(
            symbol = %self.index_symbol,
            reference_price,
            volatility_percent,
            "live quote received"
        );

        Ok(MarketSnapshot {
            symbol: self.index_symbol.clone(),
            reference_price,
            volatility_percent,
            as_of: chrono::Utc::now(),
            source: "yahoo".to_string(),
        })
    }
}

fn backoff_ms(attempt: u32) -> u64 {
    let base = BASE_BACKOFF_MS
        .saturating_mul(1u64 << attempt.saturating_sub(1).min(16))
        .min(MAX_BACKOFF_MS);
    let jitter = rand::rng().random_range(0..=base / 2);
    (base + jitter).min(MAX_BACKOFF_MS)
}

fn encode_symbol(symbol: &str) -> String {
    symbol.replace('^', "%5E")
}

// Chart API response (fields we read):
// {
//   "chart": {
//     "result": [{
//       "meta": { "symbol": "^GSPC", "regularMarketPrice": 5648.4 },
//       "timestamp": [1727271000, ...],
//       "indicators": { "quote": [{ "close": [5722.26, null, 5648.4] }] }
//     }],
//     "error": null
//   }
// }

#[derive(serde::Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(serde::Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(serde::Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(serde::Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    indicators: Option<Indicators>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
}

#[derive(serde::Deserialize)]
struct Indicators {
    quote: Option<Vec<QuoteSeries>>,
}

#[derive(serde::Deserialize)]
struct QuoteSeries {
    close: Option<Vec<Option<f64>>>,
}

/// Last non-null close, falling back to the live market price. Rounded to cents.
fn parse_last_close(resp: ChartResponse, symbol: &str) -> CondorResult<f64> {
    if let Some(err) = resp.chart.error {
        return Err(CondorError::DataUnavailable(format!(
            "{symbol}: {} {}",
            err.code.unwrap_or_default(),
            err.description.unwrap_or_default()
        )));
    }

    let result = resp
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| CondorError::DataUnavailable(format!("{symbol}: empty chart result")))?;

    let last_close = result
        .indicators
        .and_then(|i| i.quote)
        .and_then(|q| q.into_iter().next())
        .and_then(|q| q.close)
        .and_then(|closes| closes.into_iter().rev().flatten().next());

    let price = last_close
        .or_else(|| result.meta.and_then(|m| m.regular_market_price))
        .ok_or_else(|| CondorError::DataUnavailable(format!("{symbol}: no close in window")))?;

    if !price.is_finite() || price <= 0.0 {
        return Err(CondorError::DataUnavailable(format!("{symbol}: invalid price {price}")));
    }

    Ok(round2(price))
}
