//! Seeded Gaussian fluctuations of the inlet concentration and the filtered reactor response
//! This example requires the `noise` feature (enabled by default).
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

use rand::rngs::StdRng;
use rand::SeedableRng;

use cstr_dynamics::analysis::{moving_average, stats};
use cstr_dynamics::plant::make_plant;
use cstr_dynamics::signal::{gaussian_noise, TimeGrid};
use cstr_dynamics::sim::Simulator;

const NOISE_MEAN: f64 = 0.0;
const NOISE_STD: f64 = 1.0;
const WINDOW: usize = 50;

fn main() -> Result<(), cstr_dynamics::Error> {
    env_logger::init();

    let plant = make_plant(1.0, 0.5, 0.1)?;
    let grid = TimeGrid::linspace(0.0, 100.0, 1000)?;
    let mut rng = StdRng::seed_from_u64(0);
    let input = gaussian_noise(&grid, NOISE_MEAN, NOISE_STD, &mut rng)?;

    let response = Simulator::default().simulate_input(&plant.transfer_function(), &input)?;
    let averaged = moving_average(response.output(), WINDOW)?;
    let averaged_time = &grid.times()[WINDOW - 1..];

    if let (Some(u), Some(y)) = (stats(input.values()), stats(response.output())) {
        println!("Input Statistics:  Mean = {:.4}, Std Dev = {:.4}", u.mean, u.std_dev);
        println!("Output Statistics: Mean = {:.4}, Std Dev = {:.4}", y.mean, y.std_dev);
        println!("Response/Input Std Ratio = {:.4}", y.std_dev / u.std_dev);
    }

    println!("Moving average (window = {}):", WINDOW);
    println!("{:>8}  {:>10}", "t [s]", "C_A (avg)");
    for (t, y) in averaged_time.iter().zip(&averaged).step_by(100) {
        println!("{:>8.3}  {:>10.6}", t, y);
    }
    Ok(())
}
