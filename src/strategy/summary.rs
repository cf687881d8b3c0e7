use crate::state::{StrategySummary, StrikeSet};
use crate::strategy::round2;

pub const STRATEGY_NAME: &str = "Iron Condor";

/// Distances from the reference price to each short strike. Pure function.
pub fn summarize(underlying: &str, reference_price: f64, strikes: &StrikeSet) -> StrategySummary {
    let distance_to_sell_put = round2(reference_price - strikes.sell_put as f64);
    let distance_to_sell_call = round2(strikes.sell_call as f64 - reference_price);

    StrategySummary {
        strategy: STRATEGY_NAME,
        underlying: underlying.to_string(),
        reference_price,
        put_spread: format!("{}/{}", strikes.buy_put, strikes.sell_put),
        call_spread: format!("{}/{}", strikes.sell_call, strikes.buy_call),
        profit_range: format!("{} - {}", strikes.sell_put, strikes.sell_call),
        profit_range_width: strikes.profit_range_width,
        distance_to_sell_put,
        distance_to_sell_call,
        symmetry: round2((distance_to_sell_put - distance_to_sell_call).abs()),
    }
}
