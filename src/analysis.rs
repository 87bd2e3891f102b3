// Scalar annotations extracted from simulated responses
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

use core::f64::consts::{E, PI};
use core::ops::Range;

use crate::error::{Error, Result};
use crate::sim::SimulationResult;
use crate::tf::TransferFunction;

/// A single `(time, value)` sample of a response.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point {
    /// Sample time in seconds.
    pub time: f64,
    /// Response value at `time`.
    pub value: f64,
}

impl Point {
    fn at(result: &SimulationResult, index: usize) -> Self {
        Point {
            time: result.time()[index],
            value: result.output()[index],
        }
    }
}

/// The largest sample of the response. Ties resolve to the earliest sample.
pub fn peak(result: &SimulationResult) -> Option<Point> {
    peak_index(result).map(|i| Point::at(result, i))
}

fn peak_index(result: &SimulationResult) -> Option<usize> {
    let output = result.output();
    let mut best: Option<usize> = None;
    for (i, &y) in output.iter().enumerate() {
        match best {
            Some(b) if output[b] >= y => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Sample inside `window` whose value is nearest to `target`. Ties resolve to the earliest sample.
///
/// Returns `None` if the window is empty or falls outside the response.
pub fn nearest_crossing(
    result: &SimulationResult,
    target: f64,
    window: Range<usize>,
) -> Option<Point> {
    let output = result.output().get(window.clone())?;
    let mut best: Option<(usize, f64)> = None;
    for (i, &y) in output.iter().enumerate() {
        let distance = (y - target).abs();
        match best {
            Some((_, d)) if d <= distance => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| Point::at(result, window.start + i))
}

/// First sample at or after the peak nearest to `peak / e`.
///
/// For a first-order impulse response this sits one time constant after the peak.
pub fn decay_time(result: &SimulationResult) -> Option<Point> {
    let start = peak_index(result)?;
    let target = result.output()[start] / E;
    nearest_crossing(result, target, start..result.len())
}

/// Sample nearest to `gain · (1 − 1/e)`, the 63.2 % rise of a first-order step response.
pub fn time_constant_point(result: &SimulationResult, gain: f64) -> Option<Point> {
    nearest_crossing(result, gain * (1.0 - 1.0 / E), 0..result.len())
}

/// `reference − y` at the last sample.
pub fn steady_state_error(result: &SimulationResult, reference: f64) -> Option<f64> {
    result.last().map(|(_, y)| reference - y)
}

/// `reference − y(t)` at every sample.
pub fn tracking_error(result: &SimulationResult, reference: f64) -> Vec<f64> {
    result.output().iter().map(|y| reference - y).collect()
}

/// How far a ramp response trails the ideal output `gain · slope · (t − t₀)`, expressed as a time
/// shift measured at the last sample.
///
/// A first-order lag driven by a ramp from `t₀` settles into a constant lag equal to its time
/// constant.
///
/// # Errors
/// - `InvalidParameter` if `gain · slope` is zero or not finite.
pub fn ramp_lag(result: &SimulationResult, gain: f64, slope: f64) -> Result<f64> {
    let rate = gain * slope;
    if rate == 0.0 || !rate.is_finite() {
        return Err(Error::invalid("ramp rate must be non-zero and finite"));
    }
    let (t_end, y_end) = result
        .last()
        .ok_or_else(|| Error::invalid("response must not be empty"))?;
    let t0 = result.time()[0];
    Ok(t_end - t0 - y_end / rate)
}

/// Time from which the response stays inside `final_value ± tolerance · |final_value|` until the
/// end of the horizon.
///
/// Returns `None` if the last sample is outside the band or `final_value` is zero.
pub fn settling_time(result: &SimulationResult, final_value: f64, tolerance: f64) -> Option<f64> {
    if final_value == 0.0 {
        return None;
    }
    let band = tolerance * final_value.abs();
    let output = result.output();
    let first_settled = match output
        .iter()
        .rposition(|y| (y - final_value).abs() > band)
    {
        Some(last_outside) => last_outside + 1,
        None => 0,
    };
    result.time().get(first_settled).copied()
}

/// Steady-state sinusoidal gain and phase of a transfer function at one frequency.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrequencyResponse {
    /// Angular frequency `ω = 2πf` in rad/s.
    pub omega: f64,
    /// `|H(jω)|`.
    pub amplitude_ratio: f64,
    /// Unwrapped `∠H(jω)` in degrees.
    pub phase_deg: f64,
}

impl FrequencyResponse {
    /// Amplitude ratio in decibels, as read off a Bode magnitude plot.
    pub fn magnitude_db(&self) -> f64 {
        20.0 * self.amplitude_ratio.log10()
    }

    /// Delay of the output sinusoid behind the input, in seconds.
    pub fn time_lag(&self) -> f64 {
        -self.phase_deg.to_radians() / self.omega
    }
}

/// Evaluates `H(j 2π f)`.
///
/// # Errors
/// - `InvalidParameter` if `frequency` (in Hz) is not positive and finite.
pub fn frequency_response(
    tf: &TransferFunction<f64>,
    frequency: f64,
) -> Result<FrequencyResponse> {
    if frequency <= 0.0 || !frequency.is_finite() {
        return Err(Error::invalid("frequency must be positive and finite"));
    }
    let omega = 2.0 * PI * frequency;
    Ok(FrequencyResponse {
        omega,
        amplitude_ratio: tf.frequency_response(omega).norm(),
        phase_deg: tf.phase(omega).to_degrees(),
    })
}

/// Mean and population standard deviation of a sequence.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SignalStats {
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation (divides by `n`).
    pub std_dev: f64,
}

/// Returns `None` for an empty slice.
pub fn stats(values: &[f64]) -> Option<SignalStats> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(SignalStats {
        mean,
        std_dev: variance.sqrt(),
    })
}

/// Box-filter moving average over every full window, i.e. `len − window + 1` outputs.
///
/// Output `i` averages `values[i..i + window]` and is aligned with sample `i + window − 1`.
///
/// # Errors
/// - `InvalidParameter` if `window` is zero or longer than `values`.
pub fn moving_average(values: &[f64], window: usize) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(Error::invalid("moving average window must be non-zero"));
    }
    if window > values.len() {
        return Err(Error::invalid(
            "moving average window must not exceed the sequence length",
        ));
    }
    let n = window as f64;
    Ok(values
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / n)
        .collect())
}
