use crate::config::StrategyConfig;
use crate::errors::{CondorError, CondorResult};
use crate::state::{CalculationRequest, ValidatedRequest, WingWidth};
use crate::strategy::horizon::Horizon;
use chrono::NaiveDate;

/// Target dates are calendar dates, no time of day.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Check every request parameter before any market data is touched.
/// Pure function: `today` is supplied by the caller (UTC calendar date).
pub fn validate(
    req: &CalculationRequest,
    cfg: &StrategyConfig,
    today: NaiveDate,
) -> CondorResult<ValidatedRequest> {
    let wing_width = validate_wing_width(req.wing_width, cfg)?;

    let horizon = validate_horizon(req.horizon.as_deref(), cfg)?;

    let buffer_points = validate_buffer(req.buffer_points.unwrap_or(cfg.default_buffer), cfg)?;

    let target_date = req
        .target_date
        .as_deref()
        .map(|s| validate_target_date(s, today, cfg))
        .transpose()?;

    Ok(ValidatedRequest {
        wing_width,
        horizon,
        buffer_points,
        target_date,
    })
}

/// Membership in the closed set only. No clamping to the nearest width.
pub fn validate_wing_width(width: i64, cfg: &StrategyConfig) -> CondorResult<WingWidth> {
    cfg.allowed_wings
        .iter()
        .find(|&&w| i64::from(w) == width)
        .map(|&w| WingWidth(w))
        .ok_or_else(|| CondorError::InvalidWingWidth {
            width,
            allowed: cfg.allowed_wings.to_vec(),
        })
}

/// Missing label means the configured default horizon.
pub fn validate_horizon(label: Option<&str>, cfg: &StrategyConfig) -> CondorResult<Horizon> {
    match label {
        Some(label) => label.parse::<Horizon>(),
        None => Ok(cfg.default_horizon),
    }
}

pub fn validate_buffer(buffer: f64, cfg: &StrategyConfig) -> CondorResult<f64> {
    if !buffer.is_finite() || buffer < 0.0 || buffer > cfg.max_buffer {
        return Err(CondorError::InvalidInput(format!(
            "buffer {buffer} must be within [0, {}]",
            cfg.max_buffer
        )));
    }
    Ok(buffer)
}

/// Accepts `today ..= today + max_days_ahead`, counted in whole calendar days.
pub fn validate_target_date(
    raw: &str,
    today: NaiveDate,
    cfg: &StrategyConfig,
) -> CondorResult<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| CondorError::InvalidDateWindow(format!("'{raw}' is not YYYY-MM-DD: {e}")))?;

    let days_ahead = (date - today).num_days();
    if !(0..=cfg.max_days_ahead).contains(&days_ahead) {
        return Err(CondorError::InvalidDateWindow(format!(
            "{date} is {days_ahead} days from {today}; must be between 0 and {}",
            cfg.max_days_ahead
        )));
    }

    Ok(date)
}
