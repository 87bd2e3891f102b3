// Uniform time grids and the input waveforms that drive the plant
// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use core::f64::consts::PI;

use crate::error::{Error, Result};

/// Relative tolerance on the spacing of a [`TimeGrid`], as a fraction of the nominal step.
pub const DEFAULT_UNIFORMITY_TOLERANCE: f64 = 1e-9;

/// A finite, strictly increasing, uniformly spaced sequence of sample times starting at or after
/// `t = 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
    step: f64,
}

impl TimeGrid {
    /// `n` evenly spaced samples over `[start, stop]`, endpoints included.
    ///
    /// # Errors
    /// - `InvalidParameter` if `n < 2`, `start < 0`, `stop <= start`, or either bound is not
    ///   finite.
    pub fn linspace(start: f64, stop: f64, n: usize) -> Result<Self> {
        if n < 2 {
            return Err(Error::invalid("time grid needs at least two samples"));
        }
        if !start.is_finite() || !stop.is_finite() {
            return Err(Error::invalid("time grid bounds must be finite"));
        }
        if start < 0.0 {
            return Err(Error::invalid("time grid must start at or after t = 0"));
        }
        if stop <= start {
            return Err(Error::invalid("time grid must be strictly increasing"));
        }

        let span = stop - start;
        let last = (n - 1) as f64;
        let mut times: Vec<f64> = (0..n).map(|i| start + span * (i as f64 / last)).collect();
        times[n - 1] = stop;

        Ok(Self {
            times,
            step: span / last,
        })
    }

    /// `n` samples covering `[0, duration]`.
    pub fn from_duration(duration: f64, n: usize) -> Result<Self> {
        Self::linspace(0.0, duration, n)
    }

    /// Validates caller-supplied sample times with [`DEFAULT_UNIFORMITY_TOLERANCE`].
    pub fn from_samples(times: Vec<f64>) -> Result<Self> {
        Self::from_samples_with_tolerance(times, DEFAULT_UNIFORMITY_TOLERANCE)
    }

    /// Validates caller-supplied sample times.
    ///
    /// # Arguments
    /// - `times`: Sample times in seconds.
    /// - `tolerance`: Largest accepted deviation of any interval from the nominal step, as a
    ///   fraction of that step.
    ///
    /// # Errors
    /// - `InvalidParameter` if the grid is empty or has a single sample, contains non-finite
    ///   values, starts before `t = 0`, is not strictly increasing, or is not uniform.
    pub fn from_samples_with_tolerance(times: Vec<f64>, tolerance: f64) -> Result<Self> {
        if tolerance < 0.0 || !tolerance.is_finite() {
            return Err(Error::invalid(
                "grid tolerance must be non-negative and finite",
            ));
        }
        if times.len() < 2 {
            return Err(Error::invalid("time grid needs at least two samples"));
        }
        if times.iter().any(|t| !t.is_finite()) {
            return Err(Error::invalid("time grid contains non-finite samples"));
        }
        if times[0] < 0.0 {
            return Err(Error::invalid("time grid must start at or after t = 0"));
        }
        if times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::invalid("time grid must be strictly increasing"));
        }

        let step = (times[times.len() - 1] - times[0]) / (times.len() - 1) as f64;
        if times
            .windows(2)
            .any(|w| ((w[1] - w[0]) - step).abs() > tolerance * step)
        {
            return Err(Error::invalid("time grid must be uniformly spaced"));
        }

        Ok(Self { times, step })
    }

    /// Sample times in seconds.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Nominal sample spacing Δt.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// First sample time.
    pub fn start(&self) -> f64 {
        self.times[0]
    }

    /// Last sample time.
    pub fn end(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false; a validated grid holds at least two samples.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Index of the sample nearest to `t`.
    pub fn nearest_index(&self, t: f64) -> usize {
        let idx = ((t - self.start()) / self.step).round();
        if idx <= 0.0 {
            0
        } else {
            (idx as usize).min(self.len() - 1)
        }
    }
}

/// A sampled forcing function `u(t)`, one amplitude per grid point.
#[derive(Clone, Debug, PartialEq)]
pub struct InputSignal {
    grid: TimeGrid,
    values: Vec<f64>,
}

impl InputSignal {
    /// # Errors
    /// - `DimensionMismatch` if `values` and `grid` differ in length.
    /// - `InvalidParameter` if any value is not finite.
    pub fn new(grid: TimeGrid, values: Vec<f64>) -> Result<Self> {
        if values.len() != grid.len() {
            return Err(Error::DimensionMismatch {
                expected: grid.len(),
                actual: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::invalid("input signal contains non-finite samples"));
        }
        Ok(Self { grid, values })
    }

    /// Samples `f` at every grid point.
    pub fn from_fn(grid: TimeGrid, f: impl Fn(f64) -> f64) -> Result<Self> {
        let values = grid.times().iter().map(|&t| f(t)).collect();
        Self::new(grid, values)
    }

    /// The grid the signal is sampled on.
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// One amplitude per grid point.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Splits the signal into its grid and amplitudes.
    pub fn into_parts(self) -> (TimeGrid, Vec<f64>) {
        (self.grid, self.values)
    }
}

/// The deterministic input shapes applied to the reactor inlet.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum WaveForm {
    /// `amplitude` for `t >= 0`.
    Step {
        /// Height of the step.
        amplitude: f64,
    },
    /// `slope · t` for `t >= 0`.
    Ramp {
        /// Rate of change per second.
        slope: f64,
    },
    /// `amplitude` on the closed interval `[start, end]`, zero elsewhere.
    RectangularPulse {
        /// Time the pulse switches on.
        start: f64,
        /// Time the pulse switches off; must be after `start`.
        end: f64,
        /// Height of the pulse.
        amplitude: f64,
    },
    /// `amplitude · sin(2π · frequency · t)` for `t >= 0`.
    Sine {
        /// Frequency in Hz; must be positive.
        frequency: f64,
        /// Peak amplitude.
        amplitude: f64,
    },
}

impl WaveForm {
    /// # Errors
    /// - `InvalidParameter` if any parameter is non-finite, if a pulse does not end strictly after
    ///   it starts, or if a sine frequency is not positive.
    pub fn validate(&self) -> Result<()> {
        match *self {
            WaveForm::Step { amplitude } if !amplitude.is_finite() => {
                Err(Error::invalid("step amplitude must be finite"))
            }
            WaveForm::Ramp { slope } if !slope.is_finite() => {
                Err(Error::invalid("ramp slope must be finite"))
            }
            WaveForm::RectangularPulse {
                start,
                end,
                amplitude,
            } => {
                if !start.is_finite() || !end.is_finite() || !amplitude.is_finite() {
                    Err(Error::invalid("pulse parameters must be finite"))
                } else if end <= start {
                    Err(Error::invalid("pulse end must be after pulse start"))
                } else {
                    Ok(())
                }
            }
            WaveForm::Sine {
                frequency,
                amplitude,
            } => {
                if !amplitude.is_finite() || !frequency.is_finite() {
                    Err(Error::invalid("sine parameters must be finite"))
                } else if frequency <= 0.0 {
                    Err(Error::invalid("sine frequency must be positive"))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// Evaluates the waveform at time `t` since its origin.
    pub fn value_at(&self, t: f64) -> f64 {
        match *self {
            WaveForm::Step { amplitude } => {
                if t >= 0.0 {
                    amplitude
                } else {
                    0.0
                }
            }
            WaveForm::Ramp { slope } => slope * t.max(0.0),
            WaveForm::RectangularPulse {
                start,
                end,
                amplitude,
            } => {
                if t >= start && t <= end {
                    amplitude
                } else {
                    0.0
                }
            }
            WaveForm::Sine {
                frequency,
                amplitude,
            } => {
                if t >= 0.0 {
                    amplitude * (2.0 * PI * frequency * t).sin()
                } else {
                    0.0
                }
            }
        }
    }
}

/// Evaluates a [`WaveForm`] relative to an origin and adds a constant offset.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SignalGenerator {
    waveform: WaveForm,
    initial_time: f64,
    offset: f64,
}

impl SignalGenerator {
    /// # Errors
    /// - `InvalidParameter` if the waveform is invalid or `initial_time`/`offset` is non-finite.
    pub fn new(waveform: WaveForm, initial_time: f64, offset: f64) -> Result<Self> {
        waveform.validate()?;
        if !initial_time.is_finite() || !offset.is_finite() {
            return Err(Error::invalid(
                "signal origin and offset must be finite",
            ));
        }
        Ok(Self {
            waveform,
            initial_time,
            offset,
        })
    }

    /// Returns the generated waveform.
    pub fn waveform(&self) -> &WaveForm {
        &self.waveform
    }

    /// Value of the signal at absolute time `time`.
    pub fn generate(&self, time: f64) -> f64 {
        self.waveform.value_at(time - self.initial_time) + self.offset
    }

    /// Samples the generator on every point of `grid`.
    pub fn sample(&self, grid: &TimeGrid) -> Result<InputSignal> {
        InputSignal::from_fn(grid.clone(), |t| self.generate(t))
    }
}

/// Samples `waveform` on `grid` with its origin at `t = 0` and no offset.
pub fn sample_waveform(waveform: WaveForm, grid: &TimeGrid) -> Result<InputSignal> {
    SignalGenerator::new(waveform, 0.0, 0.0)?.sample(grid)
}

/// Draws independent normal samples `N(mean, std_dev²)`, one per grid point.
///
/// Reproducibility comes from the caller's generator: pass a seeded
/// [`rand::rngs::StdRng`] to get the same sequence on every run.
///
/// # Errors
/// - `InvalidParameter` if `mean` is non-finite or `std_dev` is negative or non-finite.
#[cfg(feature = "noise")]
pub fn gaussian_noise<R>(
    grid: &TimeGrid,
    mean: f64,
    std_dev: f64,
    rng: &mut R,
) -> Result<InputSignal>
where
    R: rand::Rng + ?Sized,
{
    use rand_distr::{Distribution, Normal};

    if !mean.is_finite() {
        return Err(Error::invalid("noise mean must be finite"));
    }
    if std_dev < 0.0 || !std_dev.is_finite() {
        return Err(Error::invalid(
            "noise standard deviation must be non-negative and finite",
        ));
    }
    let normal = Normal::new(mean, std_dev)
        .map_err(|_| Error::invalid("noise distribution could not be built"))?;

    let values = (0..grid.len()).map(|_| normal.sample(&mut *rng)).collect();
    InputSignal::new(grid.clone(), values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_matches_numpy_semantics() {
        let grid = TimeGrid::linspace(0.0, 100.0, 1000).unwrap();
        assert_eq!(grid.len(), 1000);
        assert_eq!(grid.start(), 0.0);
        assert_eq!(grid.end(), 100.0);
        assert!((grid.step() - 100.0 / 999.0).abs() < 1e-15);

        let from_zero = TimeGrid::from_duration(100.0, 1000).unwrap();
        assert_eq!(from_zero, grid);
        assert!(TimeGrid::from_duration(0.0, 1000).is_err());
    }

    #[test]
    fn test_grid_validation() {
        assert!(TimeGrid::linspace(0.0, 1.0, 1).is_err());
        assert!(TimeGrid::linspace(-1.0, 1.0, 10).is_err());
        assert!(TimeGrid::linspace(1.0, 1.0, 10).is_err());
        assert!(TimeGrid::from_samples(vec![]).is_err());
        assert!(TimeGrid::from_samples(vec![0.0, 1.0, 1.0]).is_err());
        assert!(TimeGrid::from_samples(vec![0.0, 2.0, 1.0]).is_err());
        assert!(TimeGrid::from_samples(vec![0.0, 1.0, 3.0]).is_err());
        assert!(TimeGrid::from_samples(vec![0.0, f64::NAN]).is_err());
        assert!(TimeGrid::from_samples(vec![0.5, 1.0, 1.5]).is_ok());
    }

    #[test]
    fn test_nearest_index_saturates() {
        let grid = TimeGrid::linspace(0.0, 10.0, 11).unwrap();
        assert_eq!(grid.nearest_index(-3.0), 0);
        assert_eq!(grid.nearest_index(4.4), 4);
        assert_eq!(grid.nearest_index(4.6), 5);
        assert_eq!(grid.nearest_index(42.0), 10);
    }

    #[test]
    fn test_pulse_is_inclusive_on_both_edges() {
        let pulse = WaveForm::RectangularPulse {
            start: 20.0,
            end: 40.0,
            amplitude: 1.0,
        };
        assert_eq!(pulse.value_at(19.999), 0.0);
        assert_eq!(pulse.value_at(20.0), 1.0);
        assert_eq!(pulse.value_at(40.0), 1.0);
        assert_eq!(pulse.value_at(40.001), 0.0);
    }

    #[test]
    fn test_invalid_waveforms_are_rejected() {
        let reversed = WaveForm::RectangularPulse {
            start: 40.0,
            end: 20.0,
            amplitude: 1.0,
        };
        assert!(reversed.validate().is_err());

        let still = WaveForm::Sine {
            frequency: 0.0,
            amplitude: 1.0,
        };
        assert!(still.validate().is_err());
        assert!(SignalGenerator::new(still, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_generator_applies_origin_and_offset() {
        let ramp = SignalGenerator::new(WaveForm::Ramp { slope: 2.0 }, 1.0, 0.5).unwrap();
        assert_eq!(*ramp.waveform(), WaveForm::Ramp { slope: 2.0 });
        assert_eq!(ramp.generate(0.0), 0.5);
        assert_eq!(ramp.generate(3.0), 4.5);
    }
}
