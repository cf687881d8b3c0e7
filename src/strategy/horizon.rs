use crate::errors::{CondorError, CondorResult};
use std::str::FromStr;

/// Holding horizon over which the expected move is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Horizon {
    pub const ALL: [Horizon; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly];

    /// Number of such periods in one year.
    #[inline]
    pub const fn periods_per_year(self) -> u32 {
        match self {
            Self::Daily => 252,
            Self::Weekly => 52,
            Self::Monthly => 12,
            Self::Yearly => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Horizon {
    type Err = CondorError;

    fn from_str(s: &str) -> CondorResult<Self> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(CondorError::InvalidHorizon(s.to_string())),
        }
    }
}

/// Horizon -> variance-scaling divisor. Every factor is > 0.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct HorizonTable {
    entries: [(Horizon, u32); 4],
}

impl HorizonTable {
    #[inline]
    pub fn factor(&self, horizon: Horizon) -> Option<u32> {
        self.entries
            .iter()
            .find(|(h, _)| *h == horizon)
            .map(|&(_, f)| f)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Horizon, u32)> {
        self.entries.iter()
    }
}

impl Default for HorizonTable {
    fn default() -> Self {
        Self {
            entries: Horizon::ALL.map(|h| (h, h.periods_per_year())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!("daily".parse::<Horizon>().unwrap(), Horizon::Daily);
        assert_eq!("weekly".parse::<Horizon>().unwrap(), Horizon::Weekly);
        assert_eq!("monthly".parse::<Horizon>().unwrap(), Horizon::Monthly);
        assert_eq!("yearly".parse::<Horizon>().unwrap(), Horizon::Yearly);
    }

    #[test]
    fn test_unknown_label_rejected() {
        let err = "hourly".parse::<Horizon>().unwrap_err();
        assert!(matches!(err, CondorError::InvalidHorizon(ref l) if l == "hourly"));
    }

    #[test]
    fn test_labels_match_exactly() {
        for label in ["MONTHLY ", "Daily", " weekly", "YEARLY"] {
            let err = label.parse::<Horizon>().unwrap_err();
            assert!(matches!(err, CondorError::InvalidHorizon(ref l) if l == label));
        }
    }

    #[test]
    fn test_default_table_factors() {
        let table = HorizonTable::default();
        assert_eq!(table.factor(Horizon::Daily), Some(252));
        assert_eq!(table.factor(Horizon::Weekly), Some(52));
        assert_eq!(table.factor(Horizon::Monthly), Some(12));
        assert_eq!(table.factor(Horizon::Yearly), Some(1));
    }
}
