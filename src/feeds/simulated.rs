use crate::errors::CondorResult;
use crate::feeds::MarketDataSource;
use crate::state::MarketSnapshot;
use crate::strategy::round2;
use portable_atomic::{AtomicU64, Ordering};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Max relative jitter applied to the base price (±1%)
const PRICE_JITTER: f64 = 0.01;

/// Max relative jitter applied to the base volatility (±5%)
const VOL_JITTER: f64 = 0.05;

/// Offline quote generator: a base level with uniform relative jitter.
/// With a seed, the n-th draw is reproducible across runs.
pub struct SimulatedSource {
    symbol: String,
    base_price: f64,
    base_vol: f64,
    seed: Option<u64>,
    draws: AtomicU64,
}

impl SimulatedSource {
    pub fn new(symbol: &str, base_price: f64, base_vol: f64, seed: Option<u64>) -> Self {
        Self {
            symbol: symbol.to_string(),
            base_price,
            base_vol,
            seed,
            draws: AtomicU64::new(0),
        }
    }

    fn draw(&self) -> (f64, f64) {
        let n = self.draws.fetch_add(1, Ordering::Relaxed);
        match self.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(n));
                jitter(&mut rng, self.base_price, self.base_vol)
            }
            None => jitter(&mut rand::rng(), self.base_price, self.base_vol),
        }
    }
}

fn jitter<R: Rng>(rng: &mut R, base_price: f64, base_vol: f64) -> (f64, f64) {
    let price = base_price * (1.0 + rng.random_range(-PRICE_JITTER..=PRICE_JITTER));
    let vol = base_vol * (1.0 + rng.random_range(-VOL_JITTER..=VOL_JITTER));
    (round2(price), round2(vol))
}

#[async_trait::async_trait]
impl MarketDataSource for SimulatedSource {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn snapshot(&self) -> CondorResult<MarketSnapshot> {
        let (reference_price, volatility_percent) = self.draw();
        tracing::debug!(reference_price, volatility_percent, "simulated quote drawn");

        Ok(MarketSnapshot {
            symbol: self.symbol.clone(),
            reference_price,
            volatility_percent,
            as_of: chrono::Utc::now(),
            source: "simulated".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_within_jitter_bounds() {
        let src = SimulatedSource::new("^GSPC", 5650.0, 18.5, None);
        for _ in 0..200 {
            let s = src.snapshot().await.unwrap();
            assert!(s.reference_price >= 5593.5 && s.reference_price <= 5706.5, "{}", s.reference_price);
            assert!(s.volatility_percent >= 17.57 && s.volatility_percent <= 19.43, "{}", s.volatility_percent);
        }
    }

    #[tokio::test]
    async fn test_seeded_sequence_reproducible() {
        let a = SimulatedSource::new("^GSPC", 5650.0, 18.5, Some(42));
        let b = SimulatedSource::new("^GSPC", 5650.0, 18.5, Some(42));
        for _ in 0..5 {
            let (x, y) = (a.snapshot().await.unwrap(), b.snapshot().await.unwrap());
            assert_eq!(x.reference_price, y.reference_price);
            assert_eq!(x.volatility_percent, y.volatility_percent);
        }
    }

    #[test]
    fn test_values_rounded_to_cents() {
        let src = SimulatedSource::new("^GSPC", 5650.0, 18.5, Some(7));
        let (p, v) = src.draw();
        assert_eq!(round2(p), p);
        assert_eq!(round2(v), v);
    }
}
