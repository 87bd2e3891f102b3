//! Impulse response of the CSTR: peak, 1/e decay and the analytical curve
//! Run with `RUST_LOG=debug` to see the simulator's diagnostics.
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

use cstr_dynamics::analysis::{decay_time, peak};
use cstr_dynamics::plant::make_plant;
use cstr_dynamics::signal::TimeGrid;
use cstr_dynamics::sim::{simulate, Excitation};

fn main() -> Result<(), cstr_dynamics::Error> {
    env_logger::init();

    let plant = make_plant(1.0, 0.5, 0.1)?;
    let grid = TimeGrid::linspace(0.0, 10.0 * plant.tau(), 200)?;
    let response = simulate(&plant.transfer_function(), &Excitation::Impulse, &grid)?;

    println!(
        "V = 1.0 m³, F = 0.5 m³/s, k = 0.1 1/s: τ = {:.2} s, K = {:.2}",
        plant.tau(),
        plant.gain()
    );

    if let Some(top) = peak(&response) {
        println!("Peak: {:.4} at t = {:.2} s", top.value, top.time);
    }
    if let Some(decay) = decay_time(&response) {
        println!(
            "Decayed to 1/e of peak ({:.4}) at t = {:.2} s",
            decay.value, decay.time
        );
    }

    println!("{:>8}  {:>10}  {:>12}", "t [s]", "C_A", "(K/τ)e^(-t/τ)");
    for (t, y) in response.iter().step_by(20) {
        println!("{:>8.3}  {:>10.6}  {:>12.6}", t, y, plant.impulse_response_at(t));
    }
    Ok(())
}
