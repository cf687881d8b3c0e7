use crate::config::{AppConfig, StrategyConfig};
use crate::feeds::MarketDataSource;
use crate::strategy::horizon::Horizon;
use chrono::{DateTime, NaiveDate, Utc};
use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ── Market data (produced by a collaborator, consumed once) ──

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MarketSnapshot {
    /// Underlying label, e.g. "^GSPC"
    pub symbol: String,
    pub reference_price: f64,
    /// Annualized volatility in percent (18.5 = 18.5%)
    pub volatility_percent: f64,
    pub as_of: DateTime<Utc>,
    /// Which collaborator produced it
    pub source: String,
}

// ── Request types ──

/// Raw inbound request, as received from the CLI environment or a query string.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CalculationRequest {
    pub wing_width: i64,
    pub horizon: Option<String>,
    pub buffer_points: Option<f64>,
    pub target_date: Option<String>,
}

/// Inbound request for a side-by-side run over every allowed wing width.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ComparisonRequest {
    pub horizon: Option<String>,
    pub buffer_points: Option<f64>,
}

/// Wing width drawn from the allowed set. Only the validator constructs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct WingWidth(pub(crate) u32);

impl WingWidth {
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Request after validation; every field is known-good.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ValidatedRequest {
    pub wing_width: WingWidth,
    pub horizon: Horizon,
    pub buffer_points: f64,
    pub target_date: Option<NaiveDate>,
}

// ── Derived results (fresh per calculation, never retained) ──

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct VolatilityResult {
    pub final_points: f64,
    pub annual_points: f64,
    pub period_points: f64,
    pub horizon_used: Horizon,
    pub horizon_factor: u32,
    pub buffer_applied: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct StrikeSet {
    pub sell_put: i64,
    pub buy_put: i64,
    pub sell_call: i64,
    pub buy_call: i64,
    pub wing_width: u32,
    pub profit_range_width: i64,
    pub volatility_points_used: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StrategySummary {
    pub strategy: &'static str,
    pub underlying: String,
    pub reference_price: f64,
    pub put_spread: String,
    pub call_spread: String,
    pub profit_range: String,
    pub profit_range_width: i64,
    pub distance_to_sell_put: f64,
    pub distance_to_sell_call: f64,
    pub symmetry: f64,
}

/// Composed output of one calculation.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CondorCalculation {
    pub market: MarketSnapshot,
    pub request: ValidatedRequest,
    pub volatility: VolatilityResult,
    pub strikes: StrikeSet,
    pub summary: StrategySummary,
}

/// One row of a side-by-side comparison across wing widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct WingComparison {
    pub wing_width: u32,
    pub buy_put: i64,
    pub sell_put: i64,
    pub sell_call: i64,
    pub buy_call: i64,
    pub profit_range_width: i64,
}

impl From<&StrikeSet> for WingComparison {
    fn from(s: &StrikeSet) -> Self {
        Self {
            wing_width: s.wing_width,
            buy_put: s.buy_put,
            sell_put: s.sell_put,
            sell_call: s.sell_call,
            buy_call: s.buy_call,
            profit_range_width: s.profit_range_width,
        }
    }
}

// ── Request Counters (lock-free) ──

pub struct RequestCounters {
    pub calculations_ok: AtomicU64,
    pub validation_errors: AtomicU64,
    pub data_errors: AtomicU64,
    pub comparisons: AtomicU64,
}

impl RequestCounters {
    pub fn new() -> Self {
        Self {
            calculations_ok: AtomicU64::new(0),
            validation_errors: AtomicU64::new(0),
            data_errors: AtomicU64::new(0),
            comparisons: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_error(&self, e: &crate::errors::CondorError) {
        if e.is_validation() {
            self.validation_errors.fetch_add(1, Ordering::Relaxed);
        } else {
            self.data_errors.fetch_add(1, Ordering::Relaxed);
        }
    }
}

// ── HTTP server shared state (immutable config + counters, no locks) ──

pub struct AppState {
    pub config: AppConfig,
    pub strategy: StrategyConfig,
    pub source: Arc<dyn MarketDataSource>,
    pub counters: RequestCounters,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        strategy: StrategyConfig,
        source: Arc<dyn MarketDataSource>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            strategy,
            source,
            counters: RequestCounters::new(),
        })
    }
}
