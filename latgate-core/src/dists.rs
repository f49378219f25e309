//! Interval generators for arrival, dispatch, and service processes.
//!
//! Every stage of the pipeline is driven by a [`StochasticProcess`]: a
//! generator answering one question, "how long until the next event?". The
//! four shapes are selected by name at configuration time via
//! [`ProcessKind`] and all construct from a single mean period.
//!
//! Each randomized process owns its own `StdRng` so that the producer,
//! dispatcher, and consumer never share a random stream; jitter in one stage
//! must not reshuffle the draws of another. Generators are entropy-seeded by
//! default and take an explicit seed for reproducible runs.

use crate::error::ConfigError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Exp, Exp1, Uniform};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default jitter ceiling for [`ProcessKind::CapDelay`].
pub const DEFAULT_CAP_FACTOR: f64 = 3.0;

/// Interval-generation policy, selected by name at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessKind {
    /// Constant interval equal to the configured period.
    Uniform,
    /// Exponentially distributed interval with rate `1/period`.
    Poisson,
    /// Fixed floor plus exponential excess: `period * (1 + Exp(1))`.
    ExpDelay,
    /// Fixed floor scaled by bounded jitter: `period * U(1, cap_factor)`.
    CapDelay,
}

impl ProcessKind {
    /// The configuration-time name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessKind::Uniform => "uniform",
            ProcessKind::Poisson => "poisson",
            ProcessKind::ExpDelay => "expdelay",
            ProcessKind::CapDelay => "capdelay",
        }
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(ProcessKind::Uniform),
            "poisson" => Ok(ProcessKind::Poisson),
            "expdelay" => Ok(ProcessKind::ExpDelay),
            "capdelay" => Ok(ProcessKind::CapDelay),
            other => Err(ConfigError::UnknownProcessKind(other.to_string())),
        }
    }
}

/// A generator of the time gap until the next event.
///
/// One variant per [`ProcessKind`]; the randomized variants carry their own
/// generator state so instances stay independent. [`sample`] never returns a
/// negative or non-finite interval, and the jittered shapes never return
/// less than the configured period.
///
/// [`sample`]: StochasticProcess::sample
#[derive(Debug, Clone)]
pub enum StochasticProcess {
    Uniform {
        period: Duration,
    },
    Poisson {
        exp: Exp<f64>,
        rng: StdRng,
    },
    ExpDelay {
        period: Duration,
        rng: StdRng,
    },
    CapDelay {
        period: Duration,
        jitter: Uniform<f64>,
        rng: StdRng,
    },
}

impl StochasticProcess {
    /// Build a process with an entropy-seeded generator.
    ///
    /// `cap_factor` is only consulted for [`ProcessKind::CapDelay`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the period is zero or, for the capped
    /// shape, when the cap factor is not a finite value above 1.0.
    pub fn new(
        kind: ProcessKind,
        period: Duration,
        cap_factor: f64,
    ) -> Result<Self, ConfigError> {
        Self::build(kind, period, cap_factor, StdRng::from_entropy())
    }

    /// Build a process whose draws are reproducible for the given seed.
    pub fn with_seed(
        kind: ProcessKind,
        period: Duration,
        cap_factor: f64,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::build(kind, period, cap_factor, StdRng::seed_from_u64(seed))
    }

    fn build(
        kind: ProcessKind,
        period: Duration,
        cap_factor: f64,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        if period.is_zero() {
            return Err(ConfigError::InvalidPeriod(period));
        }

        match kind {
            ProcessKind::Uniform => Ok(StochasticProcess::Uniform { period }),
            ProcessKind::Poisson => {
                let rate = 1.0 / period.as_secs_f64();
                let exp =
                    Exp::new(rate).map_err(|_| ConfigError::InvalidPeriod(period))?;
                Ok(StochasticProcess::Poisson { exp, rng })
            }
            ProcessKind::ExpDelay => Ok(StochasticProcess::ExpDelay { period, rng }),
            ProcessKind::CapDelay => {
                if !cap_factor.is_finite() || cap_factor <= 1.0 {
                    return Err(ConfigError::InvalidCapFactor(cap_factor));
                }
                Ok(StochasticProcess::CapDelay {
                    period,
                    jitter: Uniform::new(1.0, cap_factor),
                    rng,
                })
            }
        }
    }

    /// The kind this process was built from.
    pub fn kind(&self) -> ProcessKind {
        match self {
            StochasticProcess::Uniform { .. } => ProcessKind::Uniform,
            StochasticProcess::Poisson { .. } => ProcessKind::Poisson,
            StochasticProcess::ExpDelay { .. } => ProcessKind::ExpDelay,
            StochasticProcess::CapDelay { .. } => ProcessKind::CapDelay,
        }
    }

    /// Draw the interval until the next event.
    pub fn sample(&mut self) -> Duration {
        match self {
            StochasticProcess::Uniform { period } => *period,
            StochasticProcess::Poisson { exp, rng } => {
                Duration::from_secs_f64(rng.sample(*exp))
            }
            StochasticProcess::ExpDelay { period, rng } => {
                let excess: f64 = rng.sample(Exp1);
                period.mul_f64(1.0 + excess)
            }
            StochasticProcess::CapDelay {
                period,
                jitter,
                rng,
            } => period.mul_f64(rng.sample(*jitter)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(1);

    fn seeded(kind: ProcessKind) -> StochasticProcess {
        StochasticProcess::with_seed(kind, PERIOD, DEFAULT_CAP_FACTOR, 7)
            .expect("valid configuration")
    }

    #[test]
    fn uniform_returns_exactly_the_period() {
        let mut process = seeded(ProcessKind::Uniform);
        for _ in 0..100 {
            assert_eq!(process.sample(), PERIOD);
        }
    }

    #[test]
    fn all_kinds_produce_finite_non_negative_intervals() {
        for kind in [
            ProcessKind::Uniform,
            ProcessKind::Poisson,
            ProcessKind::ExpDelay,
            ProcessKind::CapDelay,
        ] {
            let mut process = seeded(kind);
            for _ in 0..1_000 {
                let gap = process.sample();
                // Duration is non-negative by construction; the f64 paths
                // must not have produced a NaN/inf that panicked above.
                assert!(gap.as_secs_f64().is_finite(), "{kind}: non-finite sample");
            }
        }
    }

    #[test]
    fn poisson_sample_mean_converges_to_period() {
        let mut process = seeded(ProcessKind::Poisson);
        let n = 20_000;
        let sum: f64 = (0..n).map(|_| process.sample().as_secs_f64()).sum();
        let mean = sum / n as f64;
        let expected = PERIOD.as_secs_f64();
        assert!(
            (mean - expected).abs() / expected < 0.05,
            "sample mean {mean} too far from {expected}"
        );
    }

    #[test]
    fn expdelay_floors_at_period_and_means_twice_it() {
        let mut process = seeded(ProcessKind::ExpDelay);
        let n = 20_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let gap = process.sample();
            assert!(gap >= PERIOD, "sample {gap:?} below the floor");
            sum += gap.as_secs_f64();
        }
        // period * (1 + Exp(1)) has mean 2 * period.
        let mean = sum / n as f64;
        let expected = 2.0 * PERIOD.as_secs_f64();
        assert!(
            (mean - expected).abs() / expected < 0.05,
            "sample mean {mean} too far from {expected}"
        );
    }

    #[test]
    fn capdelay_stays_within_the_cap() {
        let cap_factor = 2.5;
        let mut process =
            StochasticProcess::with_seed(ProcessKind::CapDelay, PERIOD, cap_factor, 7)
                .expect("valid configuration");
        for _ in 0..10_000 {
            let gap = process.sample();
            assert!(gap >= PERIOD);
            assert!(gap <= PERIOD.mul_f64(cap_factor));
        }
    }

    #[test]
    fn seeded_processes_reproduce_their_draws() {
        let mut a = seeded(ProcessKind::Poisson);
        let mut b = seeded(ProcessKind::Poisson);
        for _ in 0..100 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn distinct_seeds_decorrelate() {
        let mut a = seeded(ProcessKind::Poisson);
        let mut b = StochasticProcess::with_seed(
            ProcessKind::Poisson,
            PERIOD,
            DEFAULT_CAP_FACTOR,
            8,
        )
        .expect("valid configuration");
        let identical = (0..100).filter(|_| a.sample() == b.sample()).count();
        assert!(identical < 100);
    }

    #[test]
    fn kind_parses_by_name() {
        assert_eq!("uniform".parse::<ProcessKind>().unwrap(), ProcessKind::Uniform);
        assert_eq!("poisson".parse::<ProcessKind>().unwrap(), ProcessKind::Poisson);
        assert_eq!("expdelay".parse::<ProcessKind>().unwrap(), ProcessKind::ExpDelay);
        assert_eq!("capdelay".parse::<ProcessKind>().unwrap(), ProcessKind::CapDelay);
        assert!(matches!(
            "gaussian".parse::<ProcessKind>(),
            Err(ConfigError::UnknownProcessKind(_))
        ));
    }

    #[test]
    fn zero_period_is_rejected() {
        let result = StochasticProcess::new(
            ProcessKind::Poisson,
            Duration::ZERO,
            DEFAULT_CAP_FACTOR,
        );
        assert!(matches!(result, Err(ConfigError::InvalidPeriod(_))));
    }

    #[test]
    fn cap_factor_must_exceed_one() {
        for bad in [1.0, 0.5, f64::NAN, f64::INFINITY] {
            let result = StochasticProcess::new(ProcessKind::CapDelay, PERIOD, bad);
            assert!(matches!(result, Err(ConfigError::InvalidCapFactor(_))));
        }
    }
}
