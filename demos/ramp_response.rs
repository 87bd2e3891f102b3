//! Response of the CSTR to a slow ramp in inlet concentration and its steady lag
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

use cstr_dynamics::analysis::{ramp_lag, steady_state_error};
use cstr_dynamics::plant::make_plant;
use cstr_dynamics::signal::{sample_waveform, TimeGrid, WaveForm};
use cstr_dynamics::sim::Simulator;

fn main() -> Result<(), cstr_dynamics::Error> {
    env_logger::init();

    let plant = make_plant(1.0, 0.5, 0.1)?;
    let grid = TimeGrid::linspace(0.0, 100.0, 1000)?;
    let slope = 1.0 / 100.0;
    let input = sample_waveform(WaveForm::Ramp { slope }, &grid)?;

    let response = Simulator::default().simulate_input(&plant.transfer_function(), &input)?;

    let u_end = input.values()[input.values().len() - 1];
    println!(
        "Analytical steady-state error τ·u(t_end) = {:.3}",
        plant.tau() * u_end
    );
    if let Some(error) = steady_state_error(&response, u_end) {
        println!("Simulated u(t_end) - y(t_end) = {:.3}", error);
    }
    println!(
        "Response lags the scaled ramp by {:.3} s (τ = {:.3} s)",
        ramp_lag(&response, plant.gain(), slope)?,
        plant.tau()
    );

    println!("{:>8}  {:>10}  {:>10}", "t [s]", "u", "C_A");
    for ((t, y), u) in response.iter().zip(input.values()).step_by(100) {
        println!("{:>8.3}  {:>10.6}  {:>10.6}", t, u, y);
    }
    Ok(())
}
