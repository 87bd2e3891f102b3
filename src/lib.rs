#![warn(missing_docs)]

//! # CSTR Dynamics
//!
//! This library computes the dynamic response of an isothermal continuous stirred-tank reactor
//! (CSTR) with a first-order reaction `A → B`, modelled as the first-order lag
//! `H(s) = K / (τs + 1)`, and of that reactor under Ziegler–Nichols PID control.
//!
//! ## Features
//!
//! - Physically grounded plant model:
//!   - The time constant `τ = V / (F + Vk)` and gain `K = 1 / (1 + Vk/F)` are derived from the
//!     reactor volume, flow rate and rate constant, and validated once at construction.
//!   - Closed-form impulse, step and ramp responses for cross-checking.
//!
//! - A self-contained LTI simulator:
//!   - Impulse, step and arbitrary sampled inputs on a uniform time grid.
//!   - Exact discretization through the matrix exponential with first- or zero-order hold;
//!     RK4 propagation is available as an alternative.
//!   - Routh–Hurwitz stability screening before any sample is computed.
//!
//! - PID feedback composition:
//!   - Ziegler–Nichols tuning from the ultimate gain and period.
//!   - Unity negative feedback reduced by exact polynomial arithmetic.
//!
//! - Response analysis: peak, `1/e` decay, 63.2 % rise, steady-state and ramp lag, settling
//!   time, frequency response, statistics and moving averages.
//!
//! ## Usage
//!
//! ### Open-loop step response
//!
//! ```rust
//! use cstr_dynamics::plant::make_plant;
//! use cstr_dynamics::signal::TimeGrid;
//! use cstr_dynamics::sim::{simulate, Excitation};
//!
//! let plant = make_plant(1.0, 0.5, 0.1).expect("Invalid CSTR parameters");
//! let grid = TimeGrid::linspace(0.0, 10.0 * plant.tau(), 500).unwrap();
//!
//! let response = simulate(&plant.transfer_function(), &Excitation::unit_step(), &grid).unwrap();
//!
//! let (_, y_end) = response.last().unwrap();
//! assert!((y_end - plant.gain()).abs() < 0.01 * plant.gain());
//! ```
//!
//! ### Arbitrary inputs
//!
//! Sampled inputs are propagated through an exact discretization of the plant. The waveforms of
//! [`signal::WaveForm`] cover the usual test signals.
//!
//! ```rust
//! use cstr_dynamics::plant::PlantModel;
//! use cstr_dynamics::signal::{sample_waveform, TimeGrid, WaveForm};
//! use cstr_dynamics::sim::Simulator;
//!
//! let plant = PlantModel::new(1.0, 0.5, 0.1).unwrap();
//! let grid = TimeGrid::linspace(0.0, 100.0, 1000).unwrap();
//! let pulse = WaveForm::RectangularPulse {
//!     start: 20.0,
//!     end: 40.0,
//!     amplitude: 1.0,
//! };
//! let input = sample_waveform(pulse, &grid).unwrap();
//!
//! let simulator = Simulator::default();
//! let response = simulator
//!     .simulate_input(&plant.transfer_function(), &input)
//!     .unwrap();
//! assert_eq!(response.len(), grid.len());
//! ```
//!
//! ### PID closed loop
//!
//! ```rust
//! use cstr_dynamics::analysis::settling_time;
//! use cstr_dynamics::pid::ClosedLoopSystem;
//! use cstr_dynamics::plant::make_plant;
//! use cstr_dynamics::signal::TimeGrid;
//!
//! let plant = make_plant(1.0, 0.5, 0.1).unwrap();
//! let system = ClosedLoopSystem::tuned(plant, 2.0, 10.0).unwrap();
//! assert_eq!(system.gains().gains().0, 1.2);
//!
//! let grid = TimeGrid::linspace(0.0, 100.0, 2001).unwrap();
//! let response = system.step_response(0.8, &grid).unwrap();
//! assert!(settling_time(&response, 0.8, 0.02).is_some());
//! ```
//!
//! ## Logging
//!
//! The crate emits diagnostics through the [`log`] facade and installs no logger of its own.

/// Error type shared by every fallible operation.
pub mod error;

/// Coefficient polynomials with exact arithmetic and a Routh–Hurwitz test.
pub mod polynomial;

/// Rational transfer functions and their state-space realization.
pub mod tf;

/// The first-order CSTR plant.
pub mod plant;

/// Time grids and input signals.
pub mod signal;

/// The LTI response simulator.
pub mod sim;

/// Ziegler–Nichols PID tuning and unity-feedback composition.
pub mod pid;

/// Scalar annotations extracted from simulated responses.
pub mod analysis;

pub use error::{Error, Result};
pub use pid::{close_loop, ziegler_nichols, ClosedLoopSystem, PidGains, PidGainsBuilder};
pub use plant::{make_plant, PlantModel};
pub use signal::{InputSignal, TimeGrid, WaveForm};
pub use sim::{simulate, Excitation, SimulationConfig, SimulationResult, Simulator};
pub use tf::TransferFunction;

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
