use crate::errors::CondorResult;
use crate::feeds::MarketDataSource;
use crate::state::MarketSnapshot;
use chrono::Utc;

/// Returns the same caller-supplied quote on every call.
/// Used for manual entry and for deterministic tests.
pub struct FixedSource {
    snapshot: MarketSnapshot,
}

impl FixedSource {
    pub fn new(symbol: &str, reference_price: f64, volatility_percent: f64) -> Self {
        Self::from_snapshot(MarketSnapshot {
            symbol: symbol.to_string(),
            reference_price,
            volatility_percent,
            as_of: Utc::now(),
            source: "fixed".to_string(),
        })
    }

    pub fn from_snapshot(snapshot: MarketSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait::async_trait]
impl MarketDataSource for FixedSource {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn snapshot(&self) -> CondorResult<MarketSnapshot> {
        Ok(self.snapshot.clone())
    }
}
