use crate::integrand::Integrand;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, warn};

/// Sampling strategy used to estimate an integral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    /// Average of the integrand at uniform abscissae times the interval width.
    MeanValue,
    /// Hit-or-miss sampling inside the box `[a, b] × [0, upper_bound]`.
    Rejection {
        /// Value the integrand must never exceed on the interval.
        upper_bound: f64,
    },
}

impl Method {
    /// Short label used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Method::MeanValue => "mean-value",
            Method::Rejection { .. } => "rejection",
        }
    }
}

/// Monte Carlo estimate of a definite integral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Estimated integral.
    pub value: f64,
    /// Standard error of `value`.
    pub std_error: f64,
    /// Number of integrand evaluations.
    pub samples: usize,
    /// Largest integrand value seen while sampling.
    pub max_density: f64,
}

impl Estimate {
    /// Whether any sampled integrand value was above `upper_bound`.
    ///
    /// For a rejection estimate this means the bound was invalid and `value` is biased low.
    pub fn exceeds(&self, upper_bound: f64) -> bool {
        self.max_density > upper_bound
    }

    fn combine(self, other: Estimate) -> Estimate {
        Estimate {
            value: self.value + other.value,
            std_error: self.std_error.hypot(other.std_error),
            samples: self.samples + other.samples,
            max_density: self.max_density.max(other.max_density),
        }
    }
}

/// Monte Carlo integrator owning its random number generator.
///
/// Any [`rand::Rng`] works; seed a [`StdRng`] through [`MonteCarloIntegrator::seeded`] to get
/// bit-identical estimates across runs.
///
/// # Examples
///
/// ```
/// use betadecay::MonteCarloIntegrator;
///
/// let mut mc = MonteCarloIntegrator::seeded(7);
/// let estimate = mc.mean_value(&|x: f64| x, 0.0, 1.0, 100_000).unwrap();
/// assert!((estimate.value - 0.5).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct MonteCarloIntegrator<R = StdRng> {
    rng: R,
}

impl MonteCarloIntegrator<StdRng> {
    /// Integrator backed by a [`StdRng`] seeded with `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Integrator backed by a [`StdRng`] seeded from operating system entropy.
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> MonteCarloIntegrator<R> {
    /// Wrap an existing generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Give the generator back.
    pub fn into_inner(self) -> R {
        self.rng
    }

    /// Estimate `∫ f` over `[a, b]` with the chosen method.
    ///
    /// # Errors
    ///
    /// See [`MonteCarloIntegrator::mean_value`] and [`MonteCarloIntegrator::rejection`].
    pub fn integrate<F>(
        &mut self,
        method: Method,
        f: &F,
        a: f64,
        b: f64,
        n: usize,
    ) -> Result<Estimate, IntegrationError>
    where
        F: Integrand + ?Sized,
    {
        match method {
            Method::MeanValue => self.mean_value(f, a, b, n),
            Method::Rejection { upper_bound } => self.rejection(f, a, b, upper_bound, n),
        }
    }

    /// Mean-value estimator: `(b - a) · mean(f(x_i))` with `x_i` uniform on `[a, b)`.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError`] when the interval is inverted or not finite, when `n` is
    /// zero, or when `[a, b]` leaves the integrand's declared domain.
    pub fn mean_value<F>(&mut self, f: &F, a: f64, b: f64, n: usize) -> Result<Estimate, IntegrationError>
    where
        F: Integrand + ?Sized,
    {
        check_interval(f, a, b)?;
        check_samples(n)?;

        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        let mut max_density = f64::NEG_INFINITY;
        for _ in 0..n {
            let x = self.rng.random_range(a..b);
            let y = f.density(x);
            sum += y;
            sum_sq += y * y;
            max_density = max_density.max(y);
        }

        let count = n as f64;
        let mean = sum / count;
        let variance = if n > 1 {
            ((sum_sq - count * mean * mean) / (count - 1.0)).max(0.0)
        } else {
            0.0
        };
        let width = b - a;
        let estimate = Estimate {
            value: mean * width,
            std_error: width * (variance / count).sqrt(),
            samples: n,
            max_density,
        };
        debug!(a, b, n, value = estimate.value, "mean-value estimate");
        Ok(estimate)
    }

    /// Rejection estimator: fraction of points `(x, y)` under the curve times the box area.
    ///
    /// `upper_bound` must dominate `f` on `[a, b]`. A bound below the true maximum silently
    /// biases the estimate low; this is logged and reported through [`Estimate::exceeds`] but is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError`] for the same interval and sample violations as
    /// [`MonteCarloIntegrator::mean_value`], for a non-positive or non-finite bound, and when the
    /// sampling box has no finite area.
    pub fn rejection<F>(
        &mut self,
        f: &F,
        a: f64,
        b: f64,
        upper_bound: f64,
        n: usize,
    ) -> Result<Estimate, IntegrationError>
    where
        F: Integrand + ?Sized,
    {
        check_interval(f, a, b)?;
        check_samples(n)?;
        if !(upper_bound.is_finite() && upper_bound > 0.0) {
            return Err(IntegrationError::InvalidUpperBound { upper_bound });
        }

        let area = (b - a) * upper_bound;
        if !area.is_finite() {
            return Err(IntegrationError::UnboundedArea {
                width: b - a,
                upper_bound,
            });
        }

        let mut hits = 0_usize;
        let mut max_density = f64::NEG_INFINITY;
        for _ in 0..n {
            let x = self.rng.random_range(a..b);
            let y = upper_bound * self.rng.random_range(0.0_f64..=1.0);
            let density = f.density(x);
            max_density = max_density.max(density);
            if y <= density {
                hits += 1;
            }
        }

        let fraction = hits as f64 / n as f64;
        let estimate = Estimate {
            value: fraction * area,
            std_error: area * (fraction * (1.0 - fraction) / n as f64).sqrt(),
            samples: n,
            max_density,
        };
        if estimate.exceeds(upper_bound) {
            warn!(
                upper_bound,
                max_density, "integrand exceeded the rejection bound; estimate is biased low"
            );
        }
        debug!(a, b, n, hits, value = estimate.value, "rejection estimate");
        Ok(estimate)
    }

    /// Stratified estimate: apply `method` on `partitions` equal sub-intervals of `[a, b]` with
    /// `n / partitions` samples each and sum the partial results.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::ZeroPartitions`] or
    /// [`IntegrationError::TooFewSamplesPerPartition`] when the budget cannot be split,
    /// [`IntegrationError::PartitionTooNarrow`] when a sub-interval collapses to a point, plus any
    /// error of the underlying method.
    ///
    /// # Examples
    ///
    /// ```
    /// use betadecay::{Method, MonteCarloIntegrator};
    ///
    /// let mut mc = MonteCarloIntegrator::seeded(11);
    /// let estimate = mc
    ///     .partitioned(Method::MeanValue, &|x: f64| x * x, 0.0, 3.0, 60_000, 10)
    ///     .unwrap();
    /// assert_eq!(estimate.samples, 60_000);
    /// assert!((estimate.value - 9.0).abs() < 0.05);
    /// ```
    pub fn partitioned<F>(
        &mut self,
        method: Method,
        f: &F,
        a: f64,
        b: f64,
        n: usize,
        partitions: usize,
    ) -> Result<Estimate, IntegrationError>
    where
        F: Integrand + ?Sized,
    {
        check_interval(f, a, b)?;
        check_samples(n)?;
        if partitions == 0 {
            return Err(IntegrationError::ZeroPartitions);
        }
        let per_partition = n / partitions;
        if per_partition == 0 {
            return Err(IntegrationError::TooFewSamplesPerPartition {
                samples: n,
                partitions,
            });
        }

        let width = (b - a) / partitions as f64;
        let mut total: Option<Estimate> = None;
        for i in 0..partitions {
            let lower = a + width * i as f64;
            let upper = if i + 1 == partitions {
                b
            } else {
                a + width * (i + 1) as f64
            };
            if !(lower < upper) {
                return Err(IntegrationError::PartitionTooNarrow { a, b, partitions });
            }
            let part = self.integrate(method, f, lower, upper, per_partition)?;
            total = Some(match total {
                Some(sum) => sum.combine(part),
                None => part,
            });
        }
        let estimate = total.ok_or(IntegrationError::ZeroPartitions)?;
        debug!(
            method = method.label(),
            partitions,
            value = estimate.value,
            "partitioned estimate"
        );
        Ok(estimate)
    }
}

fn check_interval<F>(f: &F, a: f64, b: f64) -> Result<(), IntegrationError>
where
    F: Integrand + ?Sized,
{
    if !(a.is_finite() && b.is_finite() && a < b && (b - a).is_finite()) {
        return Err(IntegrationError::InvalidInterval { a, b });
    }
    if let Some((lower, upper)) = f.domain() {
        if a < lower || b > upper {
            return Err(IntegrationError::OutsideDomain {
                a,
                b,
                lower,
                upper,
            });
        }
    }
    Ok(())
}

fn check_samples(n: usize) -> Result<(), IntegrationError> {
    if n == 0 {
        return Err(IntegrationError::ZeroSamples);
    }
    Ok(())
}

/// Precondition violations reported by [`MonteCarloIntegrator`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    /// Bounds or width are not finite, or `a >= b`.
    #[error("interval [{a}, {b}] must be finite with a < b and a finite width")]
    InvalidInterval {
        /// Lower bound.
        a: f64,
        /// Upper bound.
        b: f64,
    },
    /// The interval is not contained in the integrand's domain.
    #[error("interval [{a}, {b}] is outside the integrand domain [{lower}, {upper}]")]
    OutsideDomain {
        /// Lower bound.
        a: f64,
        /// Upper bound.
        b: f64,
        /// Domain start.
        lower: f64,
        /// Domain end.
        upper: f64,
    },
    /// No samples were requested.
    #[error("sample count must be at least 1")]
    ZeroSamples,
    /// Rejection bound is not a positive finite number.
    #[error("rejection upper bound {upper_bound} must be positive and finite")]
    InvalidUpperBound {
        /// Offending bound.
        upper_bound: f64,
    },
    /// The sampling box `(b - a) · upper_bound` overflows.
    #[error("rejection box of width {width} and height {upper_bound} has no finite area")]
    UnboundedArea {
        /// Interval width.
        width: f64,
        /// Rejection bound.
        upper_bound: f64,
    },
    /// Sub-intervals are too narrow to be represented.
    #[error("interval [{a}, {b}] is too narrow to split into {partitions} partitions")]
    PartitionTooNarrow {
        /// Lower bound.
        a: f64,
        /// Upper bound.
        b: f64,
        /// Requested sub-intervals.
        partitions: usize,
    },
    /// No sub-intervals were requested.
    #[error("partition count must be at least 1")]
    ZeroPartitions,
    /// The sample budget leaves a sub-interval without samples.
    #[error("{samples} samples cannot be split over {partitions} partitions")]
    TooFewSamplesPerPartition {
        /// Total sample budget.
        samples: usize,
        /// Requested sub-intervals.
        partitions: usize,
    },
}
