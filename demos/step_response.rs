//! Step response of the CSTR to an inlet concentration change, split into both species
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

use cstr_dynamics::analysis::time_constant_point;
use cstr_dynamics::plant::{make_plant, species_split};
use cstr_dynamics::signal::TimeGrid;
use cstr_dynamics::sim::{simulate, Excitation};

fn main() -> Result<(), cstr_dynamics::Error> {
    env_logger::init();

    let plant = make_plant(1.0, 0.5, 0.1)?;
    let grid = TimeGrid::linspace(0.0, 10.0 * plant.tau(), 200)?;
    let response = simulate(&plant.transfer_function(), &Excitation::unit_step(), &grid)?;
    let profile = species_split(&response);

    println!("Steady state C_A/C_A0 = {:.2}", plant.gain());
    println!("Steady state C_B/C_A0 = {:.2}", 1.0 - plant.gain());
    if let Some(point) = time_constant_point(&response, plant.gain()) {
        println!(
            "63.2 % of the final change reached at t = {:.2} s (τ = {:.2} s)",
            point.time,
            plant.tau()
        );
    }

    println!("{:>8}  {:>10}  {:>10}", "t [s]", "C_A/C_A0", "C_B/C_A0");
    for i in (0..profile.time.len()).step_by(20) {
        println!(
            "{:>8.3}  {:>10.6}  {:>10.6}",
            profile.time[i], profile.reactant[i], profile.product[i]
        );
    }
    Ok(())
}
