use crate::config::StrategyConfig;
use crate::errors::{CondorError, CondorResult};
use crate::state::{StrikeSet, WingWidth};

/// Round up to the next strike level (puts).
#[inline]
pub fn ceil_to_increment(x: f64, increment: u32) -> i64 {
    let step = f64::from(increment);
    ((x / step).ceil() * step) as i64
}

/// Round down to the previous strike level (calls).
#[inline]
pub fn floor_to_increment(x: f64, increment: u32) -> i64 {
    let step = f64::from(increment);
    ((x / step).floor() * step) as i64
}

/// Place the four legs of the iron condor around `reference_price`.
///
/// Short put rounds up and short call rounds down, never to nearest. Both
/// short strikes therefore sit at most `volatility_points` from the reference.
/// Long legs sit exactly one wing width further out.
///
/// A move smaller than one strike increment can round both short strikes past
/// the reference, so it is rejected.
pub fn compute_strikes(
    reference_price: f64,
    volatility_points: f64,
    wing_width: WingWidth,
    cfg: &StrategyConfig,
) -> CondorResult<StrikeSet> {
    if !reference_price.is_finite() || !volatility_points.is_finite() {
        return Err(CondorError::InvalidInput(format!(
            "strike inputs must be finite (price={reference_price}, points={volatility_points})"
        )));
    }

    if volatility_points < f64::from(cfg.strike_increment) {
        return Err(CondorError::InvalidInput(format!(
            "expected move of {volatility_points} points is below one strike increment ({})",
            cfg.strike_increment
        )));
    }

    let wing = i64::from(wing_width.get());

    let sell_put = ceil_to_increment(reference_price - volatility_points, cfg.strike_increment);
    let buy_put = sell_put - wing;

    let sell_call = floor_to_increment(reference_price + volatility_points, cfg.strike_increment);
    let buy_call = sell_call + wing;

    Ok(StrikeSet {
        sell_put,
        buy_put,
        sell_call,
        buy_call,
        wing_width: wing_width.get(),
        profit_range_width: sell_call - sell_put,
        volatility_points_used: volatility_points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn wing(w: u32) -> WingWidth {
        WingWidth(w)
    }

    #[test]
    fn test_reference_example() {
        let cfg = StrategyConfig::default();
        let s = compute_strikes(5650.0, 75.84, wing(25), &cfg).unwrap();
        assert_eq!(s.sell_put, 5575);
        assert_eq!(s.buy_put, 5550);
        assert_eq!(s.sell_call, 5725);
        assert_eq!(s.buy_call, 5750);
        assert_eq!(s.profit_range_width, 150);
        assert_eq!(s.wing_width, 25);
        assert_eq!(s.volatility_points_used, 75.84);
    }

    #[test]
    fn test_directional_not_nearest() {
        let cfg = StrategyConfig::default();
        let s = compute_strikes(5650.0, 71.0, wing(10), &cfg).unwrap();
        // raw put 5579 -> 5580, raw call 5721 -> 5720
        assert_eq!(s.sell_put, 5580);
        assert_eq!(s.sell_call, 5720);

        let s = compute_strikes(5650.0, 73.0, wing(10), &cfg).unwrap();
        // raw put 5577 -> 5580 (nearest 5575); raw call 5723 -> 5720 (nearest 5725)
        assert_eq!(s.sell_put, 5580);
        assert_eq!(s.sell_call, 5720);
    }

    #[test]
    fn test_exact_multiples_unchanged() {
        let cfg = StrategyConfig::default();
        let s = compute_strikes(5650.0, 50.0, wing(15), &cfg).unwrap();
        assert_eq!(s.sell_put, 5600);
        assert_eq!(s.sell_call, 5700);
        assert_eq!(s.buy_put, 5585);
        assert_eq!(s.buy_call, 5715);
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(ceil_to_increment(5574.15, 5), 5575);
        assert_eq!(ceil_to_increment(5575.0, 5), 5575);
        assert_eq!(floor_to_increment(5725.85, 5), 5725);
        assert_eq!(floor_to_increment(5725.0, 5), 5725);
        assert_eq!(ceil_to_increment(-2.0, 5), 0);
        assert_eq!(floor_to_increment(-2.0, 5), -5);
    }

    #[test]
    fn test_non_finite_rejected() {
        let cfg = StrategyConfig::default();
        assert!(matches!(
            compute_strikes(f64::NAN, 10.0, wing(10), &cfg),
            Err(CondorError::InvalidInput(_))
        ));
        assert!(matches!(
            compute_strikes(5650.0, f64::INFINITY, wing(10), &cfg),
            Err(CondorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_move_below_increment_rejected() {
        let cfg = StrategyConfig::default();
        // 5652 -/+ 1 would give sell_put 5655 above sell_call 5650
        assert!(matches!(
            compute_strikes(5652.0, 1.0, wing(25), &cfg),
            Err(CondorError::InvalidInput(_))
        ));
        assert!(matches!(
            compute_strikes(5650.0, 4.99, wing(10), &cfg),
            Err(CondorError::InvalidInput(_))
        ));
        let s = compute_strikes(5652.0, 5.0, wing(25), &cfg).unwrap();
        assert_eq!((s.sell_put, s.sell_call), (5650, 5655));
        assert!(s.profit_range_width > 0);
    }

    proptest! {
        #[test]
        fn strikes_are_multiples_and_wings_exact(
            price in 1000.0_f64..10000.0,
            points in 5.0_f64..500.0,
            w in prop::sample::select(vec![10_u32, 15, 20, 25]),
        ) {
            let cfg = StrategyConfig::default();
            let s = compute_strikes(price, points, wing(w), &cfg).unwrap();
            prop_assert_eq!(s.sell_put % 5, 0);
            prop_assert_eq!(s.sell_call % 5, 0);
            prop_assert_eq!(s.buy_put % 5, 0);
            prop_assert_eq!(s.buy_call % 5, 0);
            prop_assert_eq!(s.buy_put, s.sell_put - i64::from(w));
            prop_assert_eq!(s.buy_call, s.sell_call + i64::from(w));
            prop_assert!((s.sell_put as f64) < price);
            prop_assert!((s.sell_call as f64) > price);
            prop_assert_eq!(s.profit_range_width, s.sell_call - s.sell_put);
        }

        #[test]
        fn small_move_never_returns_crossed_strikes(
            price in 1000.0_f64..10000.0,
            points in 0.0_f64..5.0,
        ) {
            let cfg = StrategyConfig::default();
            let r = compute_strikes(price, points, wing(25), &cfg);
            prop_assert!(matches!(r, Err(CondorError::InvalidInput(_))));
        }

        #[test]
        fn wider_move_never_narrows_range(
            price in 1000.0_f64..10000.0,
            points in 5.0_f64..400.0,
            extra in 0.0_f64..100.0,
        ) {
            let cfg = StrategyConfig::default();
            let narrow = compute_strikes(price, points, wing(25), &cfg).unwrap();
            let wide = compute_strikes(price, points + extra, wing(25), &cfg).unwrap();
            prop_assert!(wide.sell_put <= narrow.sell_put);
            prop_assert!(wide.sell_call >= narrow.sell_call);
        }
    }
}
