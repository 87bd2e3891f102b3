//! Ziegler-Nichols PID control of the CSTR outlet concentration
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

use cstr_dynamics::analysis::{settling_time, steady_state_error};
use cstr_dynamics::pid::ClosedLoopSystem;
use cstr_dynamics::plant::make_plant;
use cstr_dynamics::signal::TimeGrid;

const ULTIMATE_GAIN: f64 = 2.0;
const ULTIMATE_PERIOD: f64 = 10.0;
const SETPOINT: f64 = 0.8;

fn main() -> Result<(), cstr_dynamics::Error> {
    env_logger::init();

    let plant = make_plant(1.0, 0.5, 0.1)?;
    let system = ClosedLoopSystem::tuned(plant, ULTIMATE_GAIN, ULTIMATE_PERIOD)?;
    let grid = TimeGrid::linspace(0.0, 100.0, 1001)?;
    let response = system.step_response(SETPOINT, &grid)?;
    let error = system.tracking_error(&response, SETPOINT);

    let (kp, ki, kd) = system.gains().gains();
    println!("Plant: τ = {:.2} s, K = {:.2}", plant.tau(), plant.gain());
    println!("Controller (Z-N): Kp = {:.2}, Ki = {:.2}, Kd = {:.2}", kp, ki, kd);
    println!("Closed loop: {}", system.transfer_function());

    match settling_time(&response, SETPOINT, 0.02) {
        Some(t) => println!("Settled within 2 % of the setpoint after {:.2} s", t),
        None => println!("Did not settle within 2 % of the setpoint"),
    }
    if let Some(e) = steady_state_error(&response, SETPOINT) {
        println!("Final tracking error = {:.6}", e);
    }

    println!("{:>8}  {:>10}  {:>10}", "t [s]", "C_B", "error");
    for ((t, y), e) in response.iter().zip(&error).step_by(50) {
        println!("{:>8.3}  {:>10.6}  {:>10.6}", t, y, e);
    }
    Ok(())
}
