use crate::errors::{CondorError, CondorResult};
use crate::strategy::horizon::{Horizon, HorizonTable};
use smallvec::SmallVec;

/// Which market data collaborator to build at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    Live,
    Simulated,
    Fixed,
}

impl std::str::FromStr for DataSourceKind {
    type Err = CondorError;

    fn from_str(s: &str) -> CondorResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(Self::Live),
            "simulated" | "sim" => Ok(Self::Simulated),
            "fixed" => Ok(Self::Fixed),
            other => Err(CondorError::Config(format!("DATA_SOURCE: unknown source '{other}'"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_source: DataSourceKind,
    pub quote_base_url: String,
    pub index_symbol: String,
    pub vol_symbol: String,
    pub fetch_timeout_secs: u64,
    pub fetch_max_attempts: u32,
    pub sim_base_price: f64,
    pub sim_base_vol: f64,
    pub sim_seed: Option<u64>,
    pub fixed_price: Option<f64>,
    pub fixed_vol: Option<f64>,
    pub wing_width: i64,
    pub horizon: String,
    pub buffer_points: f64,
    pub target_date: Option<String>,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> CondorResult<Self> {
        dotenvy::dotenv().ok();

        let data_source = env_var_or("DATA_SOURCE", "live").parse::<DataSourceKind>()?;

        let fetch_timeout_secs = env_var_or("FETCH_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| CondorError::Config(format!("FETCH_TIMEOUT_SECS: {e}")))?;

        let fetch_max_attempts = env_var_or("FETCH_MAX_ATTEMPTS", "3")
            .parse::<u32>()
            .map_err(|e| CondorError::Config(format!("FETCH_MAX_ATTEMPTS: {e}")))?
            .max(1);

        let sim_base_price = env_var_or("SIM_BASE_PRICE", "5650.0")
            .parse::<f64>()
            .map_err(|e| CondorError::Config(format!("SIM_BASE_PRICE: {e}")))?;

        let sim_base_vol = env_var_or("SIM_BASE_VOL", "18.5")
            .parse::<f64>()
            .map_err(|e| CondorError::Config(format!("SIM_BASE_VOL: {e}")))?;

        let sim_seed = env_var_opt("SIM_SEED")
            .map(|s| s.parse::<u64>())
            .transpose()
            .map_err(|e| CondorError::Config(format!("SIM_SEED: {e}")))?;

        let fixed_price = env_var_opt("FIXED_PRICE")
            .map(|s| s.parse::<f64>())
            .transpose()
            .map_err(|e| CondorError::Config(format!("FIXED_PRICE: {e}")))?;

        let fixed_vol = env_var_opt("FIXED_VOL")
            .map(|s| s.parse::<f64>())
            .transpose()
            .map_err(|e| CondorError::Config(format!("FIXED_VOL: {e}")))?;

        if data_source == DataSourceKind::Fixed && (fixed_price.is_none() || fixed_vol.is_none()) {
            return Err(CondorError::Config(
                "DATA_SOURCE=fixed requires FIXED_PRICE and FIXED_VOL".into(),
            ));
        }

        let wing_width = env_var_or("WING_WIDTH", "25")
            .parse::<i64>()
            .map_err(|e| CondorError::Config(format!("WING_WIDTH: {e}")))?;

        let buffer_points = env_var_or("BUFFER_POINTS", "10")
            .parse::<f64>()
            .map_err(|e| CondorError::Config(format!("BUFFER_POINTS: {e}")))?;

        let server_port = env_var_or("SERVER_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| CondorError::Config(format!("SERVER_PORT: {e}")))?;

        Ok(Self {
            data_source,
            quote_base_url: env_var_or("QUOTE_BASE_URL", "https://query1.finance.yahoo.com"),
            index_symbol: env_var_or("INDEX_SYMBOL", "^GSPC"),
            vol_symbol: env_var_or("VOL_SYMBOL", "^VIX"),
            fetch_timeout_secs,
            fetch_max_attempts,
            sim_base_price,
            sim_base_vol,
            sim_seed,
            fixed_price,
            fixed_vol,
            wing_width,
            horizon: env_var_or("HORIZON", "daily"),
            buffer_points,
            target_date: env_var_opt("TARGET_DATE"),
            server_port,
        })
    }
}

/// Immutable strategy constants. Built once, shared by reference across
/// every calculation (no interior mutability, safe to use from any task).
#[derive(Debug, Clone, serde::Serialize)]
pub struct StrategyConfig {
    pub allowed_wings: SmallVec<[u32; 4]>,
    pub horizons: HorizonTable,
    pub default_horizon: Horizon,
    pub default_buffer: f64,
    pub max_buffer: f64,
    pub strike_increment: u32,
    pub max_days_ahead: i64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            allowed_wings: SmallVec::from_buf([10, 15, 20, 25]),
            horizons: HorizonTable::default(),
            default_horizon: Horizon::Daily,
            default_buffer: 10.0,
            max_buffer: 50.0,
            strike_increment: 5,
            max_days_ahead: 7,
        }
    }
}

fn env_var_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_defaults() {
        let cfg = StrategyConfig::default();
        assert_eq!(cfg.allowed_wings.as_slice(), &[10, 15, 20, 25]);
        assert_eq!(cfg.default_horizon, Horizon::Daily);
        assert_eq!(cfg.default_buffer, 10.0);
        assert_eq!(cfg.strike_increment, 5);
        assert_eq!(cfg.horizons.factor(Horizon::Daily), Some(252));
    }

    #[test]
    fn test_data_source_kind_parse() {
        assert_eq!("live".parse::<DataSourceKind>().unwrap(), DataSourceKind::Live);
        assert_eq!("SIM".parse::<DataSourceKind>().unwrap(), DataSourceKind::Simulated);
        assert_eq!("fixed".parse::<DataSourceKind>().unwrap(), DataSourceKind::Fixed);
        assert!("cached".parse::<DataSourceKind>().is_err());
    }
}
