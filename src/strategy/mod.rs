pub mod horizon;
pub mod strikes;
pub mod summary;
pub mod validate;
pub mod volatility;

use crate::config::StrategyConfig;
use crate::errors::{CondorError, CondorResult};
use crate::feeds::MarketDataSource;
use crate::state::{
    CalculationRequest, ComparisonRequest, CondorCalculation, MarketSnapshot, ValidatedRequest,
    WingComparison, WingWidth,
};
use crate::strategy::horizon::Horizon;
use chrono::NaiveDate;
use smallvec::SmallVec;

/// Round to cents (2 decimals), the reporting precision of every volatility figure.
#[inline]
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Today's calendar date in UTC, the reference day for the target-date window.
#[inline]
pub fn today_utc() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Snapshot values must be usable numbers before any arithmetic runs.
/// A bad quote is the source's fault, not the caller's.
fn check_snapshot(snapshot: &MarketSnapshot) -> CondorResult<()> {
    if !snapshot.reference_price.is_finite() || snapshot.reference_price <= 0.0 {
        return Err(CondorError::DataUnavailable(format!(
            "snapshot reference price {} is not a positive number",
            snapshot.reference_price
        )));
    }
    if !snapshot.volatility_percent.is_finite() || snapshot.volatility_percent < 0.0 {
        return Err(CondorError::DataUnavailable(format!(
            "snapshot volatility {} is not a non-negative number",
            snapshot.volatility_percent
        )));
    }
    Ok(())
}

/// Pure pipeline: translate volatility, place strikes, summarize.
/// Deterministic: identical inputs give identical output.
pub fn calculate(
    snapshot: &MarketSnapshot,
    request: &ValidatedRequest,
    cfg: &StrategyConfig,
) -> CondorResult<CondorCalculation> {
    check_snapshot(snapshot)?;

    let volatility = volatility::translate(
        snapshot.reference_price,
        snapshot.volatility_percent,
        request.horizon,
        request.buffer_points,
        cfg,
    )?;

    let strikes = strikes::compute_strikes(
        snapshot.reference_price,
        volatility.final_points,
        request.wing_width,
        cfg,
    )?;

    let summary = summary::summarize(&snapshot.symbol, snapshot.reference_price, &strikes);

    Ok(CondorCalculation {
        market: snapshot.clone(),
        request: *request,
        volatility,
        strikes,
        summary,
    })
}

/// Strike sets for every allowed wing width against one snapshot.
pub fn compare_wings(
    snapshot: &MarketSnapshot,
    horizon: Horizon,
    buffer_points: f64,
    cfg: &StrategyConfig,
) -> CondorResult<SmallVec<[WingComparison; 4]>> {
    check_snapshot(snapshot)?;

    // The move does not depend on the wing, translate once.
    let vol = volatility::translate(
        snapshot.reference_price,
        snapshot.volatility_percent,
        horizon,
        buffer_points,
        cfg,
    )?;

    cfg.allowed_wings
        .iter()
        .map(|&w| {
            strikes::compute_strikes(snapshot.reference_price, vol.final_points, WingWidth(w), cfg)
                .map(|s| WingComparison::from(&s))
        })
        .collect()
}

/// Validate, then fetch, then compute. A validation failure never reaches
/// the data source; a data failure never reaches the calculator.
pub async fn calculate_from_source(
    source: &dyn MarketDataSource,
    request: &CalculationRequest,
    cfg: &StrategyConfig,
    today: NaiveDate,
) -> CondorResult<CondorCalculation> {
    let validated = validate::validate(request, cfg, today)?;
    let snapshot = source.snapshot().await?;
    let result = calculate(&snapshot, &validated, cfg)?;

    tracing::info!(
        source = source.name(),
        reference_price = snapshot.reference_price,
        volatility_percent = snapshot.volatility_percent,
        wing = validated.wing_width.get(),
        horizon = %validated.horizon,
        sell_put = result.strikes.sell_put,
        sell_call = result.strikes.sell_call,
        "iron condor calculated"
    );

    Ok(result)
}

/// One fetch, one comparison row per allowed wing width.
pub async fn compare_from_source(
    source: &dyn MarketDataSource,
    request: &ComparisonRequest,
    cfg: &StrategyConfig,
) -> CondorResult<(MarketSnapshot, SmallVec<[WingComparison; 4]>)> {
    let horizon = validate::validate_horizon(request.horizon.as_deref(), cfg)?;
    let buffer = request.buffer_points.unwrap_or(cfg.default_buffer);
    let buffer = validate::validate_buffer(buffer, cfg)?;

    let snapshot = source.snapshot().await?;
    let rows = compare_wings(&snapshot, horizon, buffer, cfg)?;
    Ok((snapshot, rows))
}
