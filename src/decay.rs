use crate::integrand::Integrand;
use std::f64::consts::PI;
use thiserror::Error;

/// Conservative upper bound on the electron energy density used for rejection sampling.
///
/// The density peaks at roughly `1.6223e-3` near `E ≈ 0.758 MeV` for the current constants.
pub const DEFAULT_UPPER_BOUND: f64 = 0.0017;

/// Value of the bracketed endpoint term in the closed-form solution of the energy integral,
/// expressed in units of the electron mass.
const ENDPOINT_TERM: f64 = 6.54438;

/// Largest number of points [`NeutronBetaDecay::density_curve`] will produce.
pub const MAX_CURVE_POINTS: usize = 10_000_000;

/// Masses (MeV), coupling, and reduced Planck constant (MeV·s) entering the decay rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    /// Electron rest mass.
    pub electron_mass: f64,
    /// Proton rest mass.
    pub proton_mass: f64,
    /// Neutron rest mass.
    pub neutron_mass: f64,
    /// Weak coupling constant.
    pub weak_coupling: f64,
    /// W boson mass.
    pub w_mass: f64,
    /// Reduced Planck constant.
    pub hbar: f64,
}

impl PhysicalConstants {
    /// Current particle data group values.
    pub const fn current() -> Self {
        Self {
            electron_mass: 0.510998950,
            proton_mass: 938.272088,
            neutron_mass: 939.565420,
            weak_coupling: 0.653,
            w_mass: 80_379.0,
            hbar: 6.582119514e-22,
        }
    }

    /// Rounded textbook values used in Griffiths' worked solution.
    pub const fn griffiths() -> Self {
        Self {
            electron_mass: 0.5109989,
            w_mass: 80_423.0,
            hbar: 6.58212e-22,
            ..Self::current()
        }
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::current()
    }
}

/// Differential decay rate `dΓ/dE` of the electron emitted in neutron beta decay.
///
/// The mass difference and amplitude factor are derived once in [`NeutronBetaDecay::new`].
///
/// # Examples
///
/// ```
/// use betadecay::NeutronBetaDecay;
///
/// let decay = NeutronBetaDecay::default();
/// let (lower, upper) = decay.domain();
/// assert_eq!(decay.evaluate(lower).unwrap(), 0.0);
/// assert!(decay.evaluate(0.75).unwrap() < decay.upper_bound());
/// assert!(decay.evaluate(upper + 0.01).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct NeutronBetaDecay {
    constants: PhysicalConstants,
    mass_difference: f64,
    amplitude: f64,
    upper_bound: f64,
}

impl NeutronBetaDecay {
    /// Build the decay model from a set of constants.
    pub fn new(constants: PhysicalConstants) -> Self {
        let mass_difference = constants.neutron_mass - constants.proton_mass;
        let amplitude = (1.0 / (PI.powi(3) * constants.hbar))
            * (constants.weak_coupling / (2.0 * constants.w_mass)).powi(4);
        Self {
            constants,
            mass_difference,
            amplitude,
            upper_bound: DEFAULT_UPPER_BOUND,
        }
    }

    /// Replace the rejection-sampling bound.
    ///
    /// The bound is trusted as given; use [`NeutronBetaDecay::verify_upper_bound`] after changing
    /// it or the constants.
    pub fn with_upper_bound(mut self, upper_bound: f64) -> Self {
        self.upper_bound = upper_bound;
        self
    }

    /// Constants the model was built from.
    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    /// Neutron minus proton mass, the spectrum endpoint.
    pub fn mass_difference(&self) -> f64 {
        self.mass_difference
    }

    /// Multiplier combining coupling, W mass, and ħ.
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Physically valid energies `[m_e, m_n - m_p]`.
    pub fn domain(&self) -> (f64, f64) {
        (self.constants.electron_mass, self.mass_difference)
    }

    /// Evaluate `dΓ/dE` at `energy`.
    ///
    /// # Errors
    ///
    /// Returns [`DecayError::EnergyOutOfDomain`] when `energy` is NaN or outside
    /// [`NeutronBetaDecay::domain`].
    pub fn evaluate(&self, energy: f64) -> Result<f64, DecayError> {
        let (lower, upper) = self.domain();
        if !(energy >= lower && energy <= upper) {
            return Err(DecayError::EnergyOutOfDomain {
                energy,
                lower,
                upper,
            });
        }
        Ok(self.density_unchecked(energy))
    }

    /// Evaluate `dΓ/dE` element-wise.
    ///
    /// # Errors
    ///
    /// Returns [`DecayError::EnergyOutOfDomainAt`] for the first energy outside the domain.
    pub fn evaluate_many(&self, energies: &[f64]) -> Result<Vec<f64>, DecayError> {
        energies
            .iter()
            .enumerate()
            .map(|(index, &energy)| {
                self.evaluate(energy)
                    .map_err(|_| DecayError::EnergyOutOfDomainAt { index, energy })
            })
            .collect()
    }

    fn density_unchecked(&self, energy: f64) -> f64 {
        let electron_mass = self.constants.electron_mass;
        let momentum = (energy * energy - electron_mass * electron_mass).sqrt();
        let neutrino = self.mass_difference - energy;
        self.amplitude * energy * momentum * neutrino * neutrino
    }

    /// Closed-form decay rate over the whole spectrum, in s⁻¹.
    ///
    /// ```
    /// use betadecay::NeutronBetaDecay;
    ///
    /// let rate = NeutronBetaDecay::default().reference_integral();
    /// assert!((1.0 / rate - 1315.06).abs() < 0.01);
    /// ```
    pub fn reference_integral(&self) -> f64 {
        closed_form_rate(&self.constants)
    }

    /// Closed-form decay rate evaluated with the textbook constants.
    pub fn griffiths_reference_integral(&self) -> f64 {
        closed_form_rate(&PhysicalConstants::griffiths())
    }

    /// Bound handed to the rejection estimator.
    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// Largest density found on an evenly spaced grid of `resolution` intervals over the domain.
    ///
    /// # Errors
    ///
    /// Returns [`DecayError::InvalidResolution`] when `resolution` is zero.
    pub fn peak_density(&self, resolution: usize) -> Result<f64, DecayError> {
        if resolution == 0 {
            return Err(DecayError::InvalidResolution);
        }
        let (lower, upper) = self.domain();
        let step = (upper - lower) / resolution as f64;
        let peak = (0..=resolution)
            .map(|i| {
                let energy = if i == resolution {
                    upper
                } else {
                    lower + step * i as f64
                };
                self.density_unchecked(energy)
            })
            .fold(0.0_f64, f64::max);
        Ok(peak)
    }

    /// Check that [`NeutronBetaDecay::upper_bound`] dominates the density on a grid.
    ///
    /// # Errors
    ///
    /// Returns [`DecayError::UpperBoundTooSmall`] when the grid maximum exceeds the bound.
    pub fn verify_upper_bound(&self, resolution: usize) -> Result<f64, DecayError> {
        let peak = self.peak_density(resolution)?;
        if peak > self.upper_bound {
            return Err(DecayError::UpperBoundTooSmall {
                bound: self.upper_bound,
                peak,
            });
        }
        Ok(peak)
    }

    /// Sample the spectrum at `start, start + step, ...` strictly below `end`.
    ///
    /// # Errors
    ///
    /// Returns [`DecayError::InvalidStep`] for a non-positive or non-finite step or one too small
    /// to advance past `start`, [`DecayError::EmptyRange`] when `start >= end`,
    /// [`DecayError::TooManyPoints`] above [`MAX_CURVE_POINTS`], and a domain error when the range
    /// leaves the physical spectrum.
    ///
    /// # Examples
    ///
    /// ```
    /// use betadecay::NeutronBetaDecay;
    ///
    /// let curve = NeutronBetaDecay::default().density_curve(0.511, 1.29, 0.01).unwrap();
    /// assert_eq!(curve.energies.len(), curve.densities.len());
    /// assert_eq!(curve.energies.len(), 78);
    /// ```
    pub fn density_curve(&self, start: f64, end: f64, step: f64) -> Result<DensityCurve, DecayError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(DecayError::InvalidStep { step });
        }
        if !(start < end) {
            return Err(DecayError::EmptyRange { start, end });
        }
        if start + step == start {
            return Err(DecayError::InvalidStep { step });
        }
        let points = ((end - start) / step).ceil();
        if !(points <= MAX_CURVE_POINTS as f64) {
            return Err(DecayError::TooManyPoints {
                start,
                end,
                step,
                limit: MAX_CURVE_POINTS,
            });
        }
        let count = points as usize;
        let energies: Vec<f64> = (0..count)
            .map(|i| start + step * i as f64)
            .take_while(|&energy| energy < end)
            .collect();
        let densities = self.evaluate_many(&energies)?;
        Ok(DensityCurve {
            energies,
            densities,
        })
    }
}

impl Default for NeutronBetaDecay {
    fn default() -> Self {
        Self::new(PhysicalConstants::current())
    }
}

impl Integrand for NeutronBetaDecay {
    fn density(&self, x: f64) -> f64 {
        self.density_unchecked(x)
    }

    fn domain(&self) -> Option<(f64, f64)> {
        Some(NeutronBetaDecay::domain(self))
    }
}

fn closed_form_rate(constants: &PhysicalConstants) -> f64 {
    (1.0 / (4.0 * PI.powi(3) * constants.hbar))
        * (constants.weak_coupling / (2.0 * constants.w_mass)).powi(4)
        * constants.electron_mass.powi(5)
        * ENDPOINT_TERM
}

/// Energy grid and matching densities for plotting the spectrum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DensityCurve {
    /// Electron energies in MeV.
    pub energies: Vec<f64>,
    /// `dΓ/dE` at each energy.
    pub densities: Vec<f64>,
}

/// Errors raised by [`NeutronBetaDecay`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecayError {
    /// Energy outside the physical spectrum, where the momentum term is not real.
    #[error("energy {energy} MeV lies outside the physical domain [{lower}, {upper}]")]
    EnergyOutOfDomain {
        /// Offending energy.
        energy: f64,
        /// Electron rest mass.
        lower: f64,
        /// Spectrum endpoint.
        upper: f64,
    },
    /// Element of a batch outside the physical spectrum.
    #[error("energy {energy} MeV at index {index} lies outside the physical domain")]
    EnergyOutOfDomainAt {
        /// Position in the batch.
        index: usize,
        /// Offending energy.
        energy: f64,
    },
    /// The rejection bound is below the observed peak.
    #[error("upper bound {bound} is below the peak density {peak}")]
    UpperBoundTooSmall {
        /// Configured bound.
        bound: f64,
        /// Grid maximum of the density.
        peak: f64,
    },
    /// Grid scan requested with zero intervals.
    #[error("grid resolution must be at least 1")]
    InvalidResolution,
    /// Curve step is not a positive finite number.
    #[error("curve step {step} must be positive and finite")]
    InvalidStep {
        /// Offending step.
        step: f64,
    },
    /// Curve would hold more than the allowed number of points.
    #[error("curve over [{start}, {end}) with step {step} exceeds {limit} points")]
    TooManyPoints {
        /// Range start.
        start: f64,
        /// Range end.
        end: f64,
        /// Requested step.
        step: f64,
        /// Point limit.
        limit: usize,
    },
    /// Curve range is empty or inverted.
    #[error("curve range [{start}, {end}) is empty")]
    EmptyRange {
        /// Range start.
        start: f64,
        /// Range end.
        end: f64,
    },
}
