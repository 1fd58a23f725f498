//! Reply latency model.

use rand::Rng;
use std::ops::Range;
use std::time::Duration;

/// Artificial "thinking" latency: a fixed base plus bounded random jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseDelay {
    pub base: Duration,
    pub jitter: Duration,
}

impl ResponseDelay {
    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    /// No delay at all; replies are appended as soon as they are known.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// The half-open range every sampled delay falls into.
    pub fn bounds(&self) -> Range<Duration> {
        self.base..self.base + self.jitter + Duration::from_millis(1)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.base;
        }
        self.base + Duration::from_millis(rng.gen_range(0..=jitter_ms))
    }
}

impl Default for ResponseDelay {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000), Duration::from_millis(2000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zero_jitter_returns_base() {
        let delay = ResponseDelay::new(Duration::from_millis(250), Duration::ZERO);
        assert_eq!(delay.sample(&mut StdRng::seed_from_u64(1)), Duration::from_millis(250));
    }

    #[test]
    fn immediate_never_waits() {
        let delay = ResponseDelay::immediate();
        assert_eq!(delay.sample(&mut StdRng::seed_from_u64(9)), Duration::ZERO);
        assert_eq!(delay.bounds(), Duration::ZERO..Duration::from_millis(1));
    }

    #[test]
    fn default_matches_one_to_three_seconds() {
        let bounds = ResponseDelay::default().bounds();
        assert_eq!(bounds.start, Duration::from_millis(1000));
        assert_eq!(bounds.end, Duration::from_millis(3001));
    }

    proptest! {
        #[test]
        fn sampled_delay_stays_in_bounds(seed in any::<u64>(), base in 0u64..5000, jitter in 0u64..5000) {
            let delay = ResponseDelay::new(Duration::from_millis(base), Duration::from_millis(jitter));
            let sampled = delay.sample(&mut StdRng::seed_from_u64(seed));
            prop_assert!(delay.bounds().contains(&sampled));
        }
    }
}
