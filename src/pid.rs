// PID gains, Ziegler-Nichols tuning, and unity-feedback composition with the plant
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

use log::{debug, info};

use crate::analysis;
use crate::error::{Error, Result};
use crate::plant::PlantModel;
use crate::polynomial::Polynomial;
use crate::signal::TimeGrid;
use crate::sim::{Excitation, SimulationResult, Simulator};
use crate::tf::TransferFunction;

/// Gains of an ideal parallel PID controller `C(s) = Kp + Ki/s + Kd·s`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidGains {
    /// Proportional gain coefficient.
    /// Defaults to 1.0.
    kp: f64,

    /// Integral gain coefficient.
    /// Defaults to 0.0.
    ki: f64,

    /// Derivative gain coefficient.
    /// Defaults to 0.0.
    kd: f64,
}

impl Default for PidGains {
    fn default() -> Self {
        PidGains {
            kp: 1.0,
            ki: 0.0,
            kd: 0.0,
        }
    }
}

impl PidGains {
    /// Validated construction, equivalent to going through [`PidGainsBuilder`].
    pub fn new(kp: f64, ki: f64, kd: f64) -> Result<Self> {
        PidGainsBuilder::default().kp(kp).ki(ki).kd(kd).build()
    }

    /// Returns the proportional gain.
    pub fn kp(&self) -> f64 {
        self.kp
    }

    /// Returns the integral gain.
    pub fn ki(&self) -> f64 {
        self.ki
    }

    /// Returns the derivative gain.
    pub fn kd(&self) -> f64 {
        self.kd
    }

    /// Convenience method that returns the proportional, integral, and derivative gains together as a tuple.
    pub fn gains(&self) -> (f64, f64, f64) {
        (self.kp, self.ki, self.kd)
    }

    /// Sets the proportional gain.
    ///
    /// The proportional gain must be greater than zero.
    ///
    /// # Errors
    /// - `InvalidParameter` if the gain is less than or equal to zero or not finite. The gain is
    ///   left unchanged.
    pub fn set_kp(&mut self, kp: f64) -> Result<()> {
        if kp <= 0.0 || !kp.is_finite() {
            return Err(Error::invalid(
                "proportional gain must be positive and finite",
            ));
        }
        self.kp = kp;
        Ok(())
    }

    /// Sets the integral gain.
    ///
    /// # Errors
    /// - `InvalidParameter` if the gain is less than zero or not finite.
    pub fn set_ki(&mut self, ki: f64) -> Result<()> {
        if ki < 0.0 || !ki.is_finite() {
            return Err(Error::invalid(
                "integral gain must be non-negative and finite",
            ));
        }
        self.ki = ki;
        Ok(())
    }

    /// Sets the derivative gain.
    ///
    /// # Errors
    /// - `InvalidParameter` if the gain is less than zero or not finite.
    pub fn set_kd(&mut self, kd: f64) -> Result<()> {
        if kd < 0.0 || !kd.is_finite() {
            return Err(Error::invalid(
                "derivative gain must be non-negative and finite",
            ));
        }
        self.kd = kd;
        Ok(())
    }

    /// Convenience method to set the proportional, integral, and derivative gains together.
    ///
    /// All three are validated before any is written, so a failure leaves the gains untouched.
    pub fn set_gains(&mut self, kp: f64, ki: f64, kd: f64) -> Result<()> {
        let mut staged = *self;
        staged.set_kp(kp)?;
        staged.set_ki(ki)?;
        staged.set_kd(kd)?;
        *self = staged;
        Ok(())
    }

    /// `(Kd·s² + Kp·s + Ki) / s`.
    ///
    /// Without integral action this is `Kd·s + Kp` over `1`; the factor `s` is dropped so that a
    /// PD loop does not carry a cancelled pole at the origin into the stability test.
    pub fn transfer_function(&self) -> TransferFunction<f64> {
        if self.ki == 0.0 {
            return TransferFunction::from_parts(
                Polynomial::new(vec![self.kd, self.kp]),
                Polynomial::constant(1.0),
            );
        }
        TransferFunction::from_parts(
            Polynomial::new(vec![self.kd, self.kp, self.ki]),
            Polynomial::s(),
        )
    }
}

/// Builds validated [`PidGains`].
#[derive(Copy, Clone, Debug, Default)]
pub struct PidGainsBuilder {
    kp: Option<f64>,
    ki: Option<f64>,
    kd: Option<f64>,
}

impl PidGainsBuilder {
    /// Sets the proportional gain.
    pub fn kp(mut self, kp: f64) -> Self {
        self.kp = Some(kp);
        self
    }

    /// Sets the integral gain.
    pub fn ki(mut self, ki: f64) -> Self {
        self.ki = Some(ki);
        self
    }

    /// Sets the derivative gain.
    pub fn kd(mut self, kd: f64) -> Self {
        self.kd = Some(kd);
        self
    }

    /// # Errors
    /// - `InvalidParameter` if any gain is rejected by its setter.
    pub fn build(self) -> Result<PidGains> {
        let mut gains = PidGains::default();
        if let Some(kp) = self.kp {
            gains.set_kp(kp)?;
        }
        if let Some(ki) = self.ki {
            gains.set_ki(ki)?;
        }
        if let Some(kd) = self.kd {
            gains.set_kd(kd)?;
        }
        Ok(gains)
    }
}

/// Classic Ziegler–Nichols PID tuning from the ultimate gain and period.
///
/// `Kp = 0.6·Ku`, `Ki = 1.2·Ku/Tu`, `Kd = 3·Ku·Tu/40`, i.e. `Ti = Tu/2` and `Td = Tu/8`.
///
/// # Errors
/// - `InvalidParameter` if either argument is non-positive or non-finite.
pub fn ziegler_nichols(ultimate_gain: f64, ultimate_period: f64) -> Result<PidGains> {
    if ultimate_gain <= 0.0 || !ultimate_gain.is_finite() {
        return Err(Error::invalid("ultimate gain must be positive and finite"));
    }
    if ultimate_period <= 0.0 || !ultimate_period.is_finite() {
        return Err(Error::invalid(
            "ultimate period must be positive and finite",
        ));
    }

    let kp = 0.6 * ultimate_gain;
    let ki = 1.2 * ultimate_gain / ultimate_period;
    let kd = 3.0 * ultimate_gain * ultimate_period / 40.0;

    info!(
        "Ziegler-Nichols (Ku = {}, Tu = {}): Kp = {:.6}, Ki = {:.6}, Kd = {:.6}",
        ultimate_gain, ultimate_period, kp, ki, kd
    );

    PidGains::new(kp, ki, kd)
}

/// Closes a unity negative feedback loop around `C(s)·G(s)`.
///
/// The series product and the reduction `CG / (1 + CG)` are carried out by polynomial
/// multiplication and addition only: with `CG = N/D` the result is `N / (D + N)`.
///
/// # Errors
/// - `InvalidParameter` if the loop reduces to a zero denominator.
pub fn close_loop(plant: &PlantModel, gains: &PidGains) -> Result<TransferFunction<f64>> {
    let open_loop = gains.transfer_function().series(&plant.transfer_function());
    let closed = open_loop.feedback()?;
    debug!("closed loop: {}", closed);
    Ok(closed)
}

/// A PID-controlled CSTR under unity feedback.
#[derive(Clone, Debug, PartialEq)]
pub struct ClosedLoopSystem {
    plant: PlantModel,
    gains: PidGains,
    transfer_function: TransferFunction<f64>,
}

impl ClosedLoopSystem {
    /// # Errors
    /// - See [`close_loop`].
    pub fn new(plant: PlantModel, gains: PidGains) -> Result<Self> {
        let transfer_function = close_loop(&plant, &gains)?;
        Ok(Self {
            plant,
            gains,
            transfer_function,
        })
    }

    /// Tunes the controller with [`ziegler_nichols`] and closes the loop.
    pub fn tuned(plant: PlantModel, ultimate_gain: f64, ultimate_period: f64) -> Result<Self> {
        Self::new(plant, ziegler_nichols(ultimate_gain, ultimate_period)?)
    }

    /// Returns the controlled plant.
    pub fn plant(&self) -> &PlantModel {
        &self.plant
    }

    /// Returns the controller gains.
    pub fn gains(&self) -> &PidGains {
        &self.gains
    }

    /// Reference-to-output transfer function.
    pub fn transfer_function(&self) -> &TransferFunction<f64> {
        &self.transfer_function
    }

    /// Response to a setpoint step of height `setpoint` applied at the first grid point.
    pub fn step_response(&self, setpoint: f64, grid: &TimeGrid) -> Result<SimulationResult> {
        self.step_response_with(&Simulator::default(), setpoint, grid)
    }

    /// Like [`ClosedLoopSystem::step_response`] with a configured simulator.
    pub fn step_response_with(
        &self,
        simulator: &Simulator,
        setpoint: f64,
        grid: &TimeGrid,
    ) -> Result<SimulationResult> {
        simulator.simulate(
            &self.transfer_function,
            &Excitation::Step {
                amplitude: setpoint,
            },
            grid,
        )
    }

    /// Control error `setpoint − y(t)` at every sample.
    pub fn tracking_error(&self, response: &SimulationResult, setpoint: f64) -> Vec<f64> {
        analysis::tracking_error(response, setpoint)
    }
}
