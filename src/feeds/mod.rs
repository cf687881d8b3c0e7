pub mod fixed;
pub mod simulated;
pub mod yahoo;

use crate::config::{AppConfig, DataSourceKind};
use crate::errors::{CondorError, CondorResult};
use crate::state::MarketSnapshot;
use std::sync::Arc;

/// Every market data collaborator implements this trait.
/// The calculation core never retries: any retry or backoff policy lives
/// inside the implementation, and a final failure surfaces as `DataUnavailable`.
/// Send + Sync required for sharing behind `Arc` across tokio tasks.
#[async_trait::async_trait]
pub trait MarketDataSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Latest reference price and volatility percent for the configured underlying.
    async fn snapshot(&self) -> CondorResult<MarketSnapshot>;
}

/// Build the collaborator selected by `DATA_SOURCE`.
pub fn from_config(cfg: &AppConfig) -> CondorResult<Arc<dyn MarketDataSource>> {
    let source: Arc<dyn MarketDataSource> = match cfg.data_source {
        DataSourceKind::Live => Arc::new(yahoo::YahooSource::new(
            &cfg.quote_base_url,
            &cfg.index_symbol,
            &cfg.vol_symbol,
            cfg.fetch_timeout_secs,
            cfg.fetch_max_attempts,
        )),
        DataSourceKind::Simulated => Arc::new(simulated::SimulatedSource::new(
            &cfg.index_symbol,
            cfg.sim_base_price,
            cfg.sim_base_vol,
            cfg.sim_seed,
        )),
        DataSourceKind::Fixed => {
            let (price, vol) = cfg.fixed_price.zip(cfg.fixed_vol).ok_or_else(|| {
                CondorError::Config("fixed source needs FIXED_PRICE and FIXED_VOL".into())
            })?;
            Arc::new(fixed::FixedSource::new(&cfg.index_symbol, price, vol))
        }
    };

    tracing::info!(source = source.name(), "market data source ready");
    Ok(source)
}
