//! Response of the CSTR to a rectangular inlet pulse
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

use cstr_dynamics::analysis::nearest_crossing;
use cstr_dynamics::plant::make_plant;
use cstr_dynamics::signal::{sample_waveform, TimeGrid, WaveForm};
use cstr_dynamics::sim::Simulator;

const PULSE_START: f64 = 20.0;
const PULSE_END: f64 = 40.0;

fn main() -> Result<(), cstr_dynamics::Error> {
    env_logger::init();

    let plant = make_plant(1.0, 0.5, 0.1)?;
    let grid = TimeGrid::linspace(0.0, 100.0, 1000)?;
    let pulse = WaveForm::RectangularPulse {
        start: PULSE_START,
        end: PULSE_END,
        amplitude: 1.0,
    };
    let input = sample_waveform(pulse, &grid)?;

    let response = Simulator::default().simulate_input(&plant.transfer_function(), &input)?;

    let rising = grid.nearest_index(PULSE_START);
    let falling = grid.nearest_index(PULSE_END);
    // 63.2 % of the plateau, searched while the pulse is on
    if let Some(rise) = nearest_crossing(&response, 0.632 * plant.gain(), rising..falling) {
        println!(
            "63.2 % rise at t = {:.2} s, {:.2} s after the pulse starts (τ = {:.2} s)",
            rise.time,
            rise.time - PULSE_START,
            plant.tau()
        );
    }

    println!("{:>8}  {:>6}  {:>10}", "t [s]", "u", "C_A");
    for ((t, y), u) in response.iter().zip(input.values()).step_by(25) {
        println!("{:>8.3}  {:>6.1}  {:>10.6}", t, u, y);
    }
    Ok(())
}
