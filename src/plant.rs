// First-order CSTR plant derived from physical parameters
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

use crate::error::{Error, Result};
use crate::polynomial::Polynomial;
use crate::sim::SimulationResult;
use crate::tf::TransferFunction;

/// The concentration dynamics of an isothermal CSTR with a first-order reaction `A → B`.
///
/// A tank of volume `V` fed at flow rate `F`, reacting at rate constant `k`, responds to its
/// inlet concentration as the first-order lag
///
/// ```text
///   τ dy/dt + y = K u(t),     τ = V / (F + Vk),     K = 1 / (1 + Vk/F)
/// ```
///
/// The model is validated once at construction and is immutable afterwards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlantModel {
    volume: f64,
    flow_rate: f64,
    rate_constant: f64,
    tau: f64,
    gain: f64,
}

impl PlantModel {
    /// Derives the time constant and gain of the CSTR.
    ///
    /// # Arguments
    /// - `volume`: Reactor volume `V`, must be positive.
    /// - `flow_rate`: Volumetric flow rate `F`, must be positive.
    /// - `rate_constant`: Reaction rate constant `k`, must be non-negative.
    ///
    /// # Errors
    /// - `InvalidParameter` if any argument is non-finite or out of range. In particular `F = 0`
    ///   is rejected rather than dividing by zero.
    pub fn new(volume: f64, flow_rate: f64, rate_constant: f64) -> Result<Self> {
        if volume <= 0.0 || !volume.is_finite() {
            return Err(Error::invalid("volume must be positive and finite"));
        }
        if flow_rate <= 0.0 || !flow_rate.is_finite() {
            return Err(Error::invalid("flow rate must be positive and finite"));
        }
        if rate_constant < 0.0 || !rate_constant.is_finite() {
            return Err(Error::invalid(
                "rate constant must be non-negative and finite",
            ));
        }

        let tau = volume / (flow_rate + volume * rate_constant);
        let gain = 1.0 / (1.0 + volume * rate_constant / flow_rate);

        Ok(Self {
            volume,
            flow_rate,
            rate_constant,
            tau,
            gain,
        })
    }

    /// Reactor volume `V`.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Volumetric flow rate `F`.
    pub fn flow_rate(&self) -> f64 {
        self.flow_rate
    }

    /// First-order rate constant `k`.
    pub fn rate_constant(&self) -> f64 {
        self.rate_constant
    }

    /// Time constant `τ` in seconds.
    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Steady-state gain `K`, in `(0, 1]`.
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// `K / (τs + 1)`, i.e. numerator `[K]` and denominator `[τ, 1]`.
    pub fn transfer_function(&self) -> TransferFunction<f64> {
        // τ > 0 by construction
        TransferFunction::from_parts(
            Polynomial::constant(self.gain),
            Polynomial::new(vec![self.tau, 1.0]),
        )
    }

    /// Closed-form unit impulse response `(K/τ) e^(−t/τ)`; zero before `t = 0`.
    pub fn impulse_response_at(&self, t: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        self.gain / self.tau * (-t / self.tau).exp()
    }

    /// Closed-form unit step response `K (1 − e^(−t/τ))`; zero before `t = 0`.
    pub fn step_response_at(&self, t: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        -self.gain * (-t / self.tau).exp_m1()
    }

    /// Closed-form response to the ramp `u = slope · t` starting at `t = 0`:
    /// `K · slope · (t − τ(1 − e^(−t/τ)))`.
    ///
    /// For large `t` the output trails `K · slope · t` by exactly `K · slope · τ`.
    pub fn ramp_response_at(&self, t: f64, slope: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        self.gain * slope * (t + self.tau * (-t / self.tau).exp_m1())
    }
}

/// Shorthand for [`PlantModel::new`].
pub fn make_plant(volume: f64, flow_rate: f64, rate_constant: f64) -> Result<PlantModel> {
    PlantModel::new(volume, flow_rate, rate_constant)
}

/// Outlet concentrations of both species, normalized by the inlet concentration of `A`.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesProfile {
    /// Sample times.
    pub time: Vec<f64>,
    /// Reactant `C_A / C_A0`.
    pub reactant: Vec<f64>,
    /// Product `C_B / C_A0 = 1 − C_A / C_A0`.
    pub product: Vec<f64>,
}

/// Splits a normalized inlet-step response into reactant and product concentrations.
///
/// The response is taken to be `C_A / C_A0`; mass balance for `A → B` gives the product as the
/// complement.
pub fn species_split(response: &SimulationResult) -> SpeciesProfile {
    SpeciesProfile {
        time: response.time().to_vec(),
        reactant: response.output().to_vec(),
        product: response.output().iter().map(|c_a| 1.0 - c_a).collect(),
    }
}
