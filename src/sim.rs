// Continuous-time LTI response simulation
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

use log::{debug, warn};
use nalgebra as na;

use crate::error::{Error, Result};
use crate::signal::{InputSignal, TimeGrid};
use crate::tf::{StateSpace, TransferFunction};

/// The forcing applied to a transfer function.
#[derive(Clone, Debug, PartialEq)]
pub enum Excitation {
    /// A unit Dirac impulse at the first grid point.
    Impulse,
    /// A step of the given height applied at the first grid point.
    Step {
        /// Height of the step.
        amplitude: f64,
    },
    /// One input sample per grid point.
    Arbitrary(Vec<f64>),
}

impl Excitation {
    /// A step of height one.
    pub fn unit_step() -> Self {
        Excitation::Step { amplitude: 1.0 }
    }

    fn validate(&self, grid: &TimeGrid) -> Result<()> {
        match self {
            Excitation::Impulse => Ok(()),
            Excitation::Step { amplitude } => {
                if amplitude.is_finite() {
                    Ok(())
                } else {
                    Err(Error::invalid("step amplitude must be finite"))
                }
            }
            Excitation::Arbitrary(samples) => {
                if samples.len() != grid.len() {
                    return Err(Error::DimensionMismatch {
                        expected: grid.len(),
                        actual: samples.len(),
                    });
                }
                if samples.iter().any(|u| !u.is_finite()) {
                    return Err(Error::invalid("excitation contains non-finite samples"));
                }
                Ok(())
            }
        }
    }
}

impl From<InputSignal> for Excitation {
    fn from(signal: InputSignal) -> Self {
        Excitation::Arbitrary(signal.into_parts().1)
    }
}

/// How the input is assumed to evolve between two samples.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputHold {
    /// Piecewise constant, equal to the earlier sample.
    ZeroOrder,
    /// Linear interpolation between neighboring samples.
    FirstOrder,
}

/// How the state is advanced across one grid interval.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Discretization {
    /// Exact propagation through the matrix exponential of an augmented system. No
    /// discretization error for inputs that match the hold assumption.
    MatrixExponential,
    /// Classical fourth-order Runge–Kutta with a fixed number of sub-steps per interval.
    RungeKutta4 {
        /// Integration steps per grid interval; must be non-zero.
        substeps: usize,
    },
}

/// Options of a [`Simulator`], validated on every write.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Inter-sample input assumption.
    /// Defaults to first-order hold.
    hold: InputHold,

    /// State propagation scheme.
    /// Defaults to the matrix exponential.
    discretization: Discretization,

    /// Whether to reject systems with a pole in the closed right half plane before simulating.
    /// Defaults to true.
    check_stability: bool,

    /// Whether first-order lags driven by an impulse or a step are evaluated analytically.
    /// Defaults to true.
    use_closed_form: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            hold: InputHold::FirstOrder,
            discretization: Discretization::MatrixExponential,
            check_stability: true,
            use_closed_form: true,
        }
    }
}

impl SimulationConfig {
    /// Returns the inter-sample input assumption.
    pub fn hold(&self) -> InputHold {
        self.hold
    }

    /// Returns the propagation scheme.
    pub fn discretization(&self) -> Discretization {
        self.discretization
    }

    /// Returns whether unstable systems are rejected up front.
    pub fn check_stability(&self) -> bool {
        self.check_stability
    }

    /// Returns whether first-order impulse and step responses are evaluated analytically.
    pub fn use_closed_form(&self) -> bool {
        self.use_closed_form
    }

    /// Sets the inter-sample input assumption.
    pub fn set_hold(&mut self, hold: InputHold) {
        self.hold = hold;
    }

    /// Sets the propagation scheme.
    ///
    /// # Errors
    /// - `InvalidParameter` if a Runge–Kutta scheme asks for zero sub-steps. The configuration is
    ///   left unchanged.
    pub fn set_discretization(&mut self, discretization: Discretization) -> Result<()> {
        if let Discretization::RungeKutta4 { substeps: 0 } = discretization {
            return Err(Error::invalid(
                "Runge-Kutta integration needs at least one sub-step",
            ));
        }
        self.discretization = discretization;
        Ok(())
    }

    /// Enables or disables the up-front stability check.
    pub fn set_check_stability(&mut self, check_stability: bool) {
        self.check_stability = check_stability;
    }

    /// Enables or disables the first-order closed forms.
    pub fn set_use_closed_form(&mut self, use_closed_form: bool) {
        self.use_closed_form = use_closed_form;
    }
}

/// Builds a validated [`SimulationConfig`], starting from the defaults.
#[derive(Copy, Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    hold: Option<InputHold>,
    discretization: Option<Discretization>,
    check_stability: Option<bool>,
    use_closed_form: Option<bool>,
}

impl SimulationConfigBuilder {
    /// Sets the inter-sample input assumption.
    pub fn hold(mut self, hold: InputHold) -> Self {
        self.hold = Some(hold);
        self
    }

    /// Sets the propagation scheme.
    pub fn discretization(mut self, discretization: Discretization) -> Self {
        self.discretization = Some(discretization);
        self
    }

    /// Enables or disables the up-front stability check.
    pub fn check_stability(mut self, check_stability: bool) -> Self {
        self.check_stability = Some(check_stability);
        self
    }

    /// Enables or disables the first-order closed forms.
    pub fn use_closed_form(mut self, use_closed_form: bool) -> Self {
        self.use_closed_form = Some(use_closed_form);
        self
    }

    /// # Errors
    /// - `InvalidParameter` if any requested setting is rejected by its setter.
    pub fn build(self) -> Result<SimulationConfig> {
        let mut config = SimulationConfig::default();
        if let Some(hold) = self.hold {
            config.set_hold(hold);
        }
        if let Some(discretization) = self.discretization {
            config.set_discretization(discretization)?;
        }
        if let Some(check_stability) = self.check_stability {
            config.set_check_stability(check_stability);
        }
        if let Some(use_closed_form) = self.use_closed_form {
            config.set_use_closed_form(use_closed_form);
        }
        Ok(config)
    }
}

/// Output samples aligned with the time grid they were computed on.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationResult {
    time: Vec<f64>,
    output: Vec<f64>,
}

impl SimulationResult {
    /// Sample times.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Output at each sample time.
    pub fn output(&self) -> &[f64] {
        &self.output
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True iff the result holds no samples.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// `(time, output)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.output.iter().copied())
    }

    /// The final `(time, output)` pair.
    pub fn last(&self) -> Option<(f64, f64)> {
        self.time.last().copied().zip(self.output.last().copied())
    }

    /// A copy with every output multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            time: self.time.clone(),
            output: self.output.iter().map(|y| y * factor).collect(),
        }
    }

    /// Splits the result into time and output vectors.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.time, self.output)
    }
}

/// Simulates transfer functions under a fixed [`SimulationConfig`].
///
/// The simulator holds no state between calls; every call is a pure function of its arguments.
#[derive(Copy, Clone, Debug, Default)]
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    /// Creates a simulator with the given configuration.
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns the configuration for in-place changes.
    pub fn config_mut(&mut self) -> &mut SimulationConfig {
        &mut self.config
    }

    /// Computes the response of `tf` to `excitation` on `grid`.
    ///
    /// A first-order lag `K / (τs + 1)` driven by an impulse or a step is evaluated in closed
    /// form (unless disabled in the config). Everything else is realized in controllable
    /// canonical form and propagated across the grid.
    ///
    /// The impulse response of a biproper system omits the Dirac component `D·δ(t)`, which has no
    /// sampled representation.
    ///
    /// # Errors
    /// - `DimensionMismatch` if an arbitrary excitation does not match the grid length.
    /// - `InvalidParameter` if the excitation or transfer function is non-finite, or the transfer
    ///   function is improper.
    /// - `UnstableSystem` if the stability check is enabled and a pole has non-negative real
    ///   part, or if the response becomes non-finite.
    pub fn simulate(
        &self,
        tf: &TransferFunction<f64>,
        excitation: &Excitation,
        grid: &TimeGrid,
    ) -> Result<SimulationResult> {
        excitation.validate(grid)?;
        if !tf.is_finite() {
            return Err(Error::invalid(
                "transfer function has non-finite coefficients",
            ));
        }
        if !tf.is_proper() {
            return Err(Error::invalid("transfer function is improper"));
        }
        if self.config.check_stability && !tf.is_stable() {
            return Err(Error::UnstableSystem {
                what: "a pole has non-negative real part",
            });
        }

        debug!(
            "simulating {} over {} samples (dt = {})",
            tf,
            grid.len(),
            grid.step()
        );

        let lag = tf.first_order_lag();
        if let Some((tau, _)) = lag {
            if grid.step() > tau.abs() {
                warn!(
                    "grid step {} exceeds the time constant {}; the response is coarsely sampled",
                    grid.step(),
                    tau
                );
            }
        }

        let output = match (excitation, lag) {
            (Excitation::Impulse, Some((tau, gain))) if self.config.use_closed_form => {
                first_order_impulse(tau, gain, grid)
            }
            (Excitation::Step { amplitude }, Some((tau, gain))) if self.config.use_closed_form => {
                first_order_step(tau, gain * amplitude, grid)
            }
            _ => self.propagate(tf, excitation, grid)?,
        };

        if output.iter().any(|y| !y.is_finite()) {
            return Err(Error::UnstableSystem {
                what: "response diverged to a non-finite value",
            });
        }

        Ok(SimulationResult {
            time: grid.times().to_vec(),
            output,
        })
    }

    /// Computes the response of `tf` to a sampled input.
    pub fn simulate_input(
        &self,
        tf: &TransferFunction<f64>,
        input: &InputSignal,
    ) -> Result<SimulationResult> {
        self.simulate(
            tf,
            &Excitation::Arbitrary(input.values().to_vec()),
            input.grid(),
        )
    }

    fn propagate(
        &self,
        tf: &TransferFunction<f64>,
        excitation: &Excitation,
        grid: &TimeGrid,
    ) -> Result<Vec<f64>> {
        let ss = tf.state_space()?;
        let n = ss.order();
        let len = grid.len();

        let (x0, inputs) = match excitation {
            // An impulse at t0 moves the state to B instantly and leaves no input afterwards
            Excitation::Impulse => (ss.b.clone(), vec![0.0; len]),
            Excitation::Step { amplitude } => (na::DVector::zeros(n), vec![*amplitude; len]),
            Excitation::Arbitrary(samples) => (na::DVector::zeros(n), samples.clone()),
        };

        if n == 0 {
            return Ok(inputs.iter().map(|u| ss.d * u).collect());
        }

        let propagator = Propagator::new(&ss, grid.step(), &self.config);

        let mut x = x0;
        let mut output = Vec::with_capacity(len);
        output.push(ss.output(&x, inputs[0]));
        for k in 1..len {
            x = propagator.advance(&ss, &x, inputs[k - 1], inputs[k]);
            output.push(ss.output(&x, inputs[k]));
        }
        Ok(output)
    }
}

/// Simulates with the default [`SimulationConfig`].
pub fn simulate(
    tf: &TransferFunction<f64>,
    excitation: &Excitation,
    grid: &TimeGrid,
) -> Result<SimulationResult> {
    Simulator::default().simulate(tf, excitation, grid)
}

fn first_order_impulse(tau: f64, gain: f64, grid: &TimeGrid) -> Vec<f64> {
    let t0 = grid.start();
    grid.times()
        .iter()
        .map(|t| gain / tau * (-(t - t0) / tau).exp())
        .collect()
}

fn first_order_step(tau: f64, gain: f64, grid: &TimeGrid) -> Vec<f64> {
    let t0 = grid.start();
    grid.times()
        .iter()
        .map(|t| -gain * (-(t - t0) / tau).exp_m1())
        .collect()
}

/// Advances the state of a realization across one grid interval.
enum Propagator {
    /// `x⁺ = Φx + Γ₀u_k + Γ₁u_{k+1}`
    Exact {
        phi: na::DMatrix<f64>,
        gamma_current: na::DVector<f64>,
        gamma_next: na::DVector<f64>,
    },
    RungeKutta4 {
        step: f64,
        substeps: usize,
        hold: InputHold,
    },
}

impl Propagator {
    fn new(ss: &StateSpace, step: f64, config: &SimulationConfig) -> Self {
        match config.discretization {
            Discretization::MatrixExponential => {
                let (phi, gamma_current, gamma_next) = discretize(ss, step, config.hold);
                Propagator::Exact {
                    phi,
                    gamma_current,
                    gamma_next,
                }
            }
            Discretization::RungeKutta4 { substeps } => Propagator::RungeKutta4 {
                step,
                substeps: substeps.max(1),
                hold: config.hold,
            },
        }
    }

    fn advance(
        &self,
        ss: &StateSpace,
        x: &na::DVector<f64>,
        u_current: f64,
        u_next: f64,
    ) -> na::DVector<f64> {
        match self {
            Propagator::Exact {
                phi,
                gamma_current,
                gamma_next,
            } => phi * x + gamma_current * u_current + gamma_next * u_next,
            Propagator::RungeKutta4 {
                step,
                substeps,
                hold,
            } => {
                let h = step / *substeps as f64;
                let input = |s: f64| match hold {
                    InputHold::ZeroOrder => u_current,
                    InputHold::FirstOrder => u_current + (u_next - u_current) * (s / step),
                };
                let mut x = x.clone();
                for i in 0..*substeps {
                    let s = i as f64 * h;
                    x = rk4_step(|s, x| ss.f(x, input(s)), &x, s, h);
                }
                x
            }
        }
    }
}

/// Zero- or first-order-hold discretization of `(A, B)` over one interval `h`.
///
/// Returns `(Φ, Γ₀, Γ₁)` such that `x_{k+1} = Φ x_k + Γ₀ u_k + Γ₁ u_{k+1}`. Both holds come from a
/// single matrix exponential of an augmented system:
///
/// ```text
///         ┌              ┐                 ┌                   ┐
///         │ Ah   Bh      │                 │ Ah   Bh   0       │
///   ZOH:  │  0    0      │          FOH:   │  0    0   1       │
///         └              ┘                 │  0    0   0       │
///                                          └                   ┘
/// ```
fn discretize(
    ss: &StateSpace,
    h: f64,
    hold: InputHold,
) -> (na::DMatrix<f64>, na::DVector<f64>, na::DVector<f64>) {
    let n = ss.order();
    let size = match hold {
        InputHold::ZeroOrder => n + 1,
        InputHold::FirstOrder => n + 2,
    };

    let mut augmented = na::DMatrix::<f64>::zeros(size, size);
    augmented
        .view_mut((0, 0), (n, n))
        .copy_from(&(&ss.a * h));
    augmented.view_mut((0, n), (n, 1)).copy_from(&(&ss.b * h));
    if hold == InputHold::FirstOrder {
        augmented[(n, n + 1)] = 1.0;
    }

    debug!("discretizing order-{} realization with h = {}", n, h);
    let expm = augmented.exp();

    let phi = expm.view((0, 0), (n, n)).into_owned();
    let gamma: na::DVector<f64> = expm.column(n).rows(0, n).into_owned();
    match hold {
        InputHold::ZeroOrder => (phi, gamma, na::DVector::zeros(n)),
        InputHold::FirstOrder => {
            let gamma_next: na::DVector<f64> = expm.column(n + 1).rows(0, n).into_owned();
            (phi, gamma - &gamma_next, gamma_next)
        }
    }
}

/// One classical fourth-order Runge–Kutta step of `x' = f(t, x)` from `t` to `t + h`.
pub fn rk4_step<F>(f: F, x: &na::DVector<f64>, t: f64, h: f64) -> na::DVector<f64>
where
    F: Fn(f64, &na::DVector<f64>) -> na::DVector<f64>,
{
    let k1 = f(t, x);
    let k2 = f(t + 0.5 * h, &(x + &k1 * (0.5 * h)));
    let k3 = f(t + 0.5 * h, &(x + &k2 * (0.5 * h)));
    let k4 = f(t + h, &(x + &k3 * h));
    x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0)
}
