//! Console presentation. Pure functions: results in, text out.
//! Volatility figures at 2 decimals, strikes as integers.
use crate::config::{AppConfig, StrategyConfig};
use crate::state::{CondorCalculation, MarketSnapshot, WingComparison};
use std::fmt::Write;

const RULE_WIDTH: usize = 72;

pub fn render_calculation(calc: &CondorCalculation) -> String {
    let mut out = String::with_capacity(1536);
    let m = &calc.market;
    let v = &calc.volatility;
    let s = &calc.strikes;
    let sum = &calc.summary;

    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "{} {} -- STRIKE CALCULATION", sum.strategy.to_uppercase(), sum.underlying);
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    let _ = writeln!(out, "\nMARKET DATA ({})", m.source);
    let _ = writeln!(out, "  Reference price:   {}", money(m.reference_price));
    let _ = writeln!(out, "  Volatility:        {:.2}%", m.volatility_percent);
    let _ = writeln!(out, "  As of:             {}", m.as_of.format("%Y-%m-%d %H:%M:%S UTC"));
    let target = calc
        .request
        .target_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "current".to_string());
    let _ = writeln!(out, "  Target date:       {target}");

    let _ = writeln!(out, "\nPARAMETERS");
    let _ = writeln!(out, "  Wing width:        {} points", s.wing_width);
    let _ = writeln!(out, "  Horizon:           {} (factor sqrt({}))", v.horizon_used, v.horizon_factor);
    let _ = writeln!(out, "  Annualized move:   {:.2} points", v.annual_points);
    let _ = writeln!(out, "  Horizon move:      {:.2} points", v.period_points);
    let _ = writeln!(out, "  Buffer:            +{:.2} points", v.buffer_applied);
    let _ = writeln!(out, "  Move used:         {:.2} points", v.final_points);

    let _ = writeln!(out, "\nSTRIKES");
    let _ = writeln!(out, "  Buy put:           {}", int(s.buy_put));
    let _ = writeln!(out, "  Sell put:          {}", int(s.sell_put));
    let _ = writeln!(out, "  Sell call:         {}", int(s.sell_call));
    let _ = writeln!(out, "  Buy call:          {}", int(s.buy_call));

    let _ = writeln!(out, "\nSTRATEGY");
    let _ = writeln!(out, "  Put spread:        {}", sum.put_spread);
    let _ = writeln!(out, "  Call spread:       {}", sum.call_spread);
    let _ = writeln!(out, "  Profit range:      {}", sum.profit_range);
    let _ = writeln!(out, "  Range width:       {} points", sum.profit_range_width);
    let _ = writeln!(out, "  To sell put:       {:.1} points", sum.distance_to_sell_put);
    let _ = writeln!(out, "  To sell call:      {:.1} points", sum.distance_to_sell_call);
    let _ = writeln!(out, "  Symmetry:          {:.1} points", sum.symmetry);
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    out
}

pub fn render_comparison(snapshot: &MarketSnapshot, rows: &[WingComparison]) -> String {
    let mut out = String::with_capacity(1024);

    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "WING WIDTH COMPARISON");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "{} {}  vol {:.2}%  ({})\n",
        snapshot.symbol,
        money(snapshot.reference_price),
        snapshot.volatility_percent,
        snapshot.source
    );
    let _ = writeln!(
        out,
        "{:<6}{:>10}{:>10}{:>11}{:>10}{:>8}",
        "Wing", "Buy Put", "Sell Put", "Sell Call", "Buy Call", "Range"
    );
    let _ = writeln!(out, "{}", "-".repeat(55));
    for r in rows {
        let _ = writeln!(
            out,
            "{:<6}{:>10}{:>10}{:>11}{:>10}{:>8}",
            r.wing_width, r.buy_put, r.sell_put, r.sell_call, r.buy_call, r.profit_range_width
        );
    }

    out
}

pub fn render_system_info(strategy: &StrategyConfig, app: &AppConfig) -> String {
    let mut out = String::with_capacity(768);

    let _ = writeln!(out, "SYSTEM INFORMATION");
    let _ = writeln!(out, "{}", "-".repeat(40));
    let _ = writeln!(out, "Data source:       {:?}", app.data_source);
    let _ = writeln!(out, "Underlying:        {} (vol: {})", app.index_symbol, app.vol_symbol);
    let wings: Vec<String> = strategy.allowed_wings.iter().map(|w| w.to_string()).collect();
    let _ = writeln!(out, "Wing widths:       {}", wings.join(", "));
    let _ = writeln!(out, "Horizons:");
    for (h, f) in strategy.horizons.iter() {
        let marker = if *h == strategy.default_horizon { " (default)" } else { "" };
        let _ = writeln!(out, "  {:<9} sqrt({f}){marker}", h.label());
    }
    let _ = writeln!(
        out,
        "Default buffer:    {:.0} points (max {:.0})",
        strategy.default_buffer, strategy.max_buffer
    );
    let _ = writeln!(out, "Strike increment:  {}", strategy.strike_increment);
    let _ = writeln!(out, "Target date:       today .. today+{} days (UTC)", strategy.max_days_ahead);

    out
}

/// 1234567 -> "1,234,567"
fn int(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// 5650.5 -> "$5,650.50"
fn money(x: f64) -> String {
    let cents = (x * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{sign}${}.{:02}", int(cents / 100), cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{StrategySummary, StrikeSet, ValidatedRequest, VolatilityResult, WingWidth};
    use crate::strategy::horizon::Horizon;
    use chrono::TimeZone;

    fn sample() -> CondorCalculation {
        CondorCalculation {
            market: MarketSnapshot {
                symbol: "^GSPC".into(),
                reference_price: 5650.0,
                volatility_percent: 18.5,
                as_of: chrono::Utc.with_ymd_and_hms(2025, 9, 28, 15, 30, 0).unwrap(),
                source: "fixed".into(),
            },
            request: ValidatedRequest {
                wing_width: WingWidth(25),
                horizon: Horizon::Daily,
                buffer_points: 10.0,
                target_date: None,
            },
            volatility: VolatilityResult {
                final_points: 75.84,
                annual_points: 1045.25,
                period_points: 65.84,
                horizon_used: Horizon::Daily,
                horizon_factor: 252,
                buffer_applied: 10.0,
            },
            strikes: StrikeSet {
                sell_put: 5575,
                buy_put: 5550,
                sell_call: 5725,
                buy_call: 5750,
                wing_width: 25,
                profit_range_width: 150,
                volatility_points_used: 75.84,
            },
            summary: StrategySummary {
                strategy: "Iron Condor",
                underlying: "^GSPC".into(),
                reference_price: 5650.0,
                put_spread: "5550/5575".into(),
                call_spread: "5725/5750".into(),
                profit_range: "5575 - 5725".into(),
                profit_range_width: 150,
                distance_to_sell_put: 75.0,
                distance_to_sell_call: 75.0,
                symmetry: 0.0,
            },
        }
    }

    #[test]
    fn test_calculation_report_contents() {
        let text = render_calculation(&sample());
        assert!(text.contains("$5,650.00"));
        assert!(text.contains("18.50%"));
        assert!(text.contains("Move used:         75.84 points"));
        assert!(text.contains("Sell put:          5,575"));
        assert!(text.contains("Buy call:          5,750"));
        assert!(text.contains("Profit range:      5575 - 5725"));
        assert!(text.contains("Target date:       current"));
    }

    #[test]
    fn test_comparison_table_rows() {
        let calc = sample();
        let rows = [WingComparison::from(&calc.strikes)];
        let text = render_comparison(&calc.market, &rows);
        let line = text.lines().find(|l| l.starts_with("25")).unwrap();
        assert!(line.contains("5550") && line.contains("5750") && line.ends_with("150"));
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(int(5575), "5,575");
        assert_eq!(int(-1234567), "-1,234,567");
        assert_eq!(int(999), "999");
        assert_eq!(money(5650.0), "$5,650.00");
        assert_eq!(money(0.5), "$0.50");
    }
}
