use crate::decay::{DecayError, NeutronBetaDecay};
use crate::monte_carlo::{IntegrationError, Method, MonteCarloIntegrator};
use rand::Rng;
use thiserror::Error;
use tracing::info;

/// Sample counts swept when none are given.
pub const DEFAULT_SAMPLE_COUNTS: [usize; 6] = [1_000, 5_000, 10_000, 50_000, 100_000, 500_000];

/// Sub-intervals used by the stratified runs.
pub const DEFAULT_PARTITIONS: usize = 10;

/// Lower end of the integration interval in MeV, just above the electron mass.
pub const DEFAULT_LOWER: f64 = 0.511;

/// Upper end of the integration interval in MeV, just below the spectrum endpoint.
pub const DEFAULT_UPPER: f64 = 1.29;

/// Grid intervals used to check the rejection bound before sweeping.
pub const BOUND_CHECK_RESOLUTION: usize = 100_000;

/// Parameters of a lifetime sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    /// Total samples per estimate, one sweep position each.
    pub sample_counts: Vec<usize>,
    /// Sub-intervals for the partitioned estimates.
    pub partitions: usize,
    /// Integration interval start.
    pub lower: f64,
    /// Integration interval end.
    pub upper: f64,
    /// Rejection bound; the model's bound when `None`.
    pub upper_bound: Option<f64>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            sample_counts: DEFAULT_SAMPLE_COUNTS.to_vec(),
            partitions: DEFAULT_PARTITIONS,
            lower: DEFAULT_LOWER,
            upper: DEFAULT_UPPER,
            upper_bound: None,
        }
    }
}

impl SweepConfig {
    /// Check the parameters that do not depend on the integrand.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::EmptySampleCounts`] when there is nothing to sweep, or the
    /// corresponding [`IntegrationError`] for a zero count, an invalid interval, or a budget that
    /// cannot be split over the partitions.
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.sample_counts.is_empty() {
            return Err(SweepError::EmptySampleCounts);
        }
        if !(self.lower.is_finite()
            && self.upper.is_finite()
            && self.lower < self.upper
            && (self.upper - self.lower).is_finite())
        {
            return Err(IntegrationError::InvalidInterval {
                a: self.lower,
                b: self.upper,
            }
            .into());
        }
        if self.partitions == 0 {
            return Err(IntegrationError::ZeroPartitions.into());
        }
        for &samples in &self.sample_counts {
            if samples == 0 {
                return Err(IntegrationError::ZeroSamples.into());
            }
            if samples < self.partitions {
                return Err(IntegrationError::TooFewSamplesPerPartition {
                    samples,
                    partitions: self.partitions,
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Lifetimes obtained at one sweep position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepRecord {
    /// Total samples per estimate.
    pub samples: usize,
    /// Mean-value estimate over the whole interval.
    pub mean_value: f64,
    /// Rejection estimate over the whole interval.
    pub rejection: f64,
    /// Mean-value estimate summed over the partitions.
    pub mean_value_partitioned: f64,
    /// Rejection estimate summed over the partitions.
    pub rejection_partitioned: f64,
}

/// Lifetime estimates indexed by sweep position, plus the closed-form reference line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sweep {
    /// Sample count at each position.
    pub sample_counts: Vec<usize>,
    /// Whole-interval mean-value lifetimes.
    pub mean_value: Vec<f64>,
    /// Whole-interval rejection lifetimes.
    pub rejection: Vec<f64>,
    /// Partitioned mean-value lifetimes.
    pub mean_value_partitioned: Vec<f64>,
    /// Partitioned rejection lifetimes.
    pub rejection_partitioned: Vec<f64>,
    /// Reference lifetime repeated at each position.
    pub reference: Vec<f64>,
    /// Reference lifetime.
    pub reference_lifetime: f64,
}

impl Sweep {
    fn new(reference_lifetime: f64) -> Self {
        Self {
            reference_lifetime,
            ..Self::default()
        }
    }

    fn push(&mut self, record: SweepRecord) {
        self.sample_counts.push(record.samples);
        self.mean_value.push(record.mean_value);
        self.rejection.push(record.rejection);
        self.mean_value_partitioned.push(record.mean_value_partitioned);
        self.rejection_partitioned.push(record.rejection_partitioned);
        self.reference.push(self.reference_lifetime);
    }

    /// Number of sweep positions.
    pub fn len(&self) -> usize {
        self.sample_counts.len()
    }

    /// Whether the sweep holds no positions.
    pub fn is_empty(&self) -> bool {
        self.sample_counts.is_empty()
    }

    /// Row view of the sweep.
    pub fn records(&self) -> impl Iterator<Item = SweepRecord> + '_ {
        (0..self.len()).map(move |i| SweepRecord {
            samples: self.sample_counts[i],
            mean_value: self.mean_value[i],
            rejection: self.rejection[i],
            mean_value_partitioned: self.mean_value_partitioned[i],
            rejection_partitioned: self.rejection_partitioned[i],
        })
    }
}

/// Convert a decay rate in s⁻¹ into a lifetime in seconds.
///
/// # Errors
///
/// Returns [`SweepError::ZeroRate`] when `rate` is zero or not finite.
///
/// ```
/// use betadecay::lifetime;
///
/// assert_eq!(lifetime(0.5, "example").unwrap(), 2.0);
/// assert!(lifetime(0.0, "example").is_err());
/// ```
pub fn lifetime(rate: f64, method: &'static str) -> Result<f64, SweepError> {
    if rate == 0.0 || !rate.is_finite() {
        return Err(SweepError::ZeroRate { method, rate });
    }
    Ok(1.0 / rate)
}

/// Run both estimators, whole-interval and partitioned, at every sample count.
///
/// The rejection bound is checked against a grid scan of the density before any sampling.
///
/// # Errors
///
/// Returns [`SweepError`] when the configuration is invalid, the bound does not dominate the
/// density, an estimator rejects its inputs, or an estimate is zero.
pub fn run_sweep<R: Rng>(
    decay: &NeutronBetaDecay,
    integrator: &mut MonteCarloIntegrator<R>,
    config: &SweepConfig,
) -> Result<Sweep, SweepError> {
    config.validate()?;
    let decay = match config.upper_bound {
        Some(bound) => decay.clone().with_upper_bound(bound),
        None => decay.clone(),
    };
    let peak = decay.verify_upper_bound(BOUND_CHECK_RESOLUTION)?;
    info!(upper_bound = decay.upper_bound(), peak, "rejection bound verified");

    let rejection = Method::Rejection {
        upper_bound: decay.upper_bound(),
    };
    let (a, b) = (config.lower, config.upper);
    let mut sweep = Sweep::new(lifetime(decay.reference_integral(), "reference")?);

    for &samples in &config.sample_counts {
        let whole_mean = integrator.mean_value(&decay, a, b, samples)?;
        let whole_rejection = integrator.integrate(rejection, &decay, a, b, samples)?;
        let split_mean =
            integrator.partitioned(Method::MeanValue, &decay, a, b, samples, config.partitions)?;
        let split_rejection =
            integrator.partitioned(rejection, &decay, a, b, samples, config.partitions)?;

        let record = SweepRecord {
            samples,
            mean_value: lifetime(whole_mean.value, "mean-value")?,
            rejection: lifetime(whole_rejection.value, "rejection")?,
            mean_value_partitioned: lifetime(split_mean.value, "partitioned mean-value")?,
            rejection_partitioned: lifetime(split_rejection.value, "partitioned rejection")?,
        };
        info!(
            samples,
            mean_value = record.mean_value,
            rejection = record.rejection,
            mean_value_partitioned = record.mean_value_partitioned,
            rejection_partitioned = record.rejection_partitioned,
            "sweep position"
        );
        sweep.push(record);
    }
    Ok(sweep)
}

/// Errors raised while running a sweep.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SweepError {
    /// No sample counts were configured.
    #[error("at least one sample count is required")]
    EmptySampleCounts,
    /// An estimate of zero has no finite lifetime.
    #[error("{method} rate {rate} has no finite lifetime")]
    ZeroRate {
        /// Estimate that produced the rate.
        method: &'static str,
        /// Offending rate.
        rate: f64,
    },
    /// The decay model rejected its inputs.
    #[error(transparent)]
    Decay(#[from] DecayError),
    /// An estimator rejected its inputs.
    #[error(transparent)]
    Integration(#[from] IntegrationError),
}
