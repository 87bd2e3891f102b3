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

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cstr_dynamics::pid::ClosedLoopSystem;
use cstr_dynamics::plant::{make_plant, PlantModel};
use cstr_dynamics::signal::{sample_waveform, TimeGrid, WaveForm};
use cstr_dynamics::sim::{Discretization, Excitation, SimulationConfigBuilder, Simulator};

fn make_reactor() -> PlantModel {
    make_plant(1.0, 0.5, 0.1).unwrap()
}

fn make_grid() -> TimeGrid {
    TimeGrid::linspace(0.0, 100.0, 1000).unwrap()
}

/// The closed form should be close to the cost of filling a vector with exponentials.
fn bench_closed_form_step(c: &mut Criterion) {
    let tf = make_reactor().transfer_function();
    let grid = make_grid();
    let simulator = Simulator::default();

    c.bench_function("closed-form step", |b| {
        b.iter(|| {
            let response = simulator
                .simulate(black_box(&tf), &Excitation::unit_step(), &grid)
                .unwrap();
            black_box(response);
        });
    });
}

/// One matrix exponential up front, then a scalar recurrence per sample.
fn bench_exact_sinusoid(c: &mut Criterion) {
    let tf = make_reactor().transfer_function();
    let grid = make_grid();
    let input = sample_waveform(
        WaveForm::Sine {
            frequency: 0.05,
            amplitude: 1.0,
        },
        &grid,
    )
    .unwrap();
    let simulator = Simulator::default();

    c.bench_function("exact FOH sinusoid", |b| {
        b.iter(|| {
            let response = simulator
                .simulate_input(black_box(&tf), black_box(&input))
                .unwrap();
            black_box(response);
        });
    });
}

// RK4 evaluates the dynamics four times per sub-step and allocates a state vector for each, so
// it should trail the exact propagation by well over an order of magnitude.
fn bench_rk4_sinusoid(c: &mut Criterion) {
    let tf = make_reactor().transfer_function();
    let grid = make_grid();
    let input = sample_waveform(
        WaveForm::Sine {
            frequency: 0.05,
            amplitude: 1.0,
        },
        &grid,
    )
    .unwrap();
    let simulator = Simulator::new(
        SimulationConfigBuilder::default()
            .discretization(Discretization::RungeKutta4 { substeps: 4 })
            .build()
            .unwrap(),
    );

    c.bench_function("RK4 sinusoid", |b| {
        b.iter(|| {
            let response = simulator
                .simulate_input(black_box(&tf), black_box(&input))
                .unwrap();
            black_box(response);
        });
    });
}

fn bench_closed_loop_step(c: &mut Criterion) {
    let grid = TimeGrid::linspace(0.0, 100.0, 2001).unwrap();

    c.bench_function("tune, close and step PID loop", |b| {
        b.iter(|| {
            let system = ClosedLoopSystem::tuned(make_reactor(), black_box(2.0), 10.0).unwrap();
            black_box(system.step_response(0.8, &grid).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_closed_form_step,
    bench_exact_sinusoid,
    bench_rk4_sinusoid,
    bench_closed_loop_step,
);
criterion_main!(benches);
