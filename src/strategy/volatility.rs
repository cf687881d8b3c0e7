use crate::config::StrategyConfig;
use crate::errors::{CondorError, CondorResult};
use crate::state::VolatilityResult;
use crate::strategy::horizon::Horizon;
use crate::strategy::round2;

/// Convert an annualized volatility percentage into a point move for the horizon.
///
/// annual_points = S * vol% / 100
/// period_points = annual_points / sqrt(periods_per_year)
/// final_points  = period_points + buffer
///
/// Every reported field is rounded to 2 decimals, and the rounded `final_points`
/// is the value that feeds the strike calculator.
pub fn translate(
    reference_price: f64,
    volatility_percent: f64,
    horizon: Horizon,
    buffer_points: f64,
    cfg: &StrategyConfig,
) -> CondorResult<VolatilityResult> {
    if !reference_price.is_finite() || reference_price <= 0.0 {
        return Err(CondorError::InvalidInput(format!(
            "reference price must be positive and finite, got {reference_price}"
        )));
    }
    if !volatility_percent.is_finite() || volatility_percent < 0.0 {
        return Err(CondorError::InvalidInput(format!(
            "volatility percent must be non-negative and finite, got {volatility_percent}"
        )));
    }
    if !buffer_points.is_finite() {
        return Err(CondorError::InvalidInput(format!(
            "buffer must be finite, got {buffer_points}"
        )));
    }

    // Re-checked here: the table is configuration, not the enum.
    let factor = cfg
        .horizons
        .factor(horizon)
        .ok_or_else(|| CondorError::InvalidHorizon(horizon.to_string()))?;

    let decimal_vol = volatility_percent / 100.0;
    let annual_points = reference_price * decimal_vol;
    let period_points = annual_points / f64::from(factor).sqrt();
    let final_points = period_points + buffer_points;

    tracing::debug!(
        reference_price,
        volatility_percent,
        horizon = %horizon,
        factor,
        final_points,
        "volatility translated"
    );

    Ok(VolatilityResult {
        final_points: round2(final_points),
        annual_points: round2(annual_points),
        period_points: round2(period_points),
        horizon_used: horizon,
        horizon_factor: factor,
        buffer_applied: buffer_points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_example_daily() {
        let cfg = StrategyConfig::default();
        let r = translate(5650.0, 18.5, Horizon::Daily, 10.0, &cfg).unwrap();
        assert_eq!(r.annual_points, 1045.25);
        assert_eq!(r.period_points, 65.84);
        assert_eq!(r.final_points, 75.84);
        assert_eq!(r.horizon_factor, 252);
        assert_eq!(r.horizon_used, Horizon::Daily);
        assert_eq!(r.buffer_applied, 10.0);
    }

    #[test]
    fn test_yearly_equals_annual() {
        let cfg = StrategyConfig::default();
        let r = translate(4800.0, 22.0, Horizon::Yearly, 0.0, &cfg).unwrap();
        assert_eq!(r.period_points, r.annual_points);
        assert_eq!(r.final_points, r.annual_points);
    }

    #[test]
    fn test_sqrt_time_scaling() {
        let cfg = StrategyConfig::default();
        for h in Horizon::ALL {
            let r = translate(5000.0, 20.0, h, 0.0, &cfg).unwrap();
            let expected = round2(1000.0 / f64::from(h.periods_per_year()).sqrt());
            assert_eq!(r.period_points, expected, "horizon {h}");
        }
    }

    #[test]
    fn test_longer_horizon_moves_more() {
        let cfg = StrategyConfig::default();
        let daily = translate(5650.0, 18.5, Horizon::Daily, 10.0, &cfg).unwrap();
        let weekly = translate(5650.0, 18.5, Horizon::Weekly, 10.0, &cfg).unwrap();
        let monthly = translate(5650.0, 18.5, Horizon::Monthly, 10.0, &cfg).unwrap();
        assert!(daily.final_points < weekly.final_points);
        assert!(weekly.final_points < monthly.final_points);
    }

    #[test]
    fn test_zero_vol_leaves_buffer() {
        let cfg = StrategyConfig::default();
        let r = translate(5650.0, 0.0, Horizon::Daily, 10.0, &cfg).unwrap();
        assert_eq!(r.final_points, 10.0);
    }

    #[test]
    fn test_non_finite_inputs_rejected() {
        let cfg = StrategyConfig::default();
        assert!(matches!(
            translate(f64::NAN, 18.5, Horizon::Daily, 10.0, &cfg),
            Err(CondorError::InvalidInput(_))
        ));
        assert!(matches!(
            translate(5650.0, f64::INFINITY, Horizon::Daily, 10.0, &cfg),
            Err(CondorError::InvalidInput(_))
        ));
        assert!(matches!(
            translate(-1.0, 18.5, Horizon::Daily, 10.0, &cfg),
            Err(CondorError::InvalidInput(_))
        ));
        assert!(matches!(
            translate(5650.0, -0.5, Horizon::Daily, 10.0, &cfg),
            Err(CondorError::InvalidInput(_))
        ));
    }
}
