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

use fixtures::test_cstr;

use approx::{assert_abs_diff_eq, assert_relative_eq};

use cstr_dynamics::analysis;
use cstr_dynamics::error::Error;
use cstr_dynamics::signal::{sample_waveform, InputSignal, TimeGrid, WaveForm};
use cstr_dynamics::sim::{
    simulate, Discretization, Excitation, InputHold, SimulationConfigBuilder, Simulator,
};
use cstr_dynamics::tf::TransferFunction;

fn general_path() -> Simulator {
    Simulator::new(
        SimulationConfigBuilder::default()
            .use_closed_form(false)
            .build()
            .unwrap(),
    )
}

mod test_first_order_responses {

    use super::test_cstr::{make_non_reacting_plant, make_plant, make_plant_grid};
    use super::*;

    #[test]
    fn test_impulse_matches_closed_form() {
        let plant = make_plant();
        let grid = make_plant_grid(&plant, 5.0, 500);
        let tf = plant.transfer_function();

        let fast = simulate(&tf, &Excitation::Impulse, &grid).unwrap();
        let general = general_path()
            .simulate(&tf, &Excitation::Impulse, &grid)
            .unwrap();

        assert_eq!(fast.time(), grid.times());
        for ((t, y_fast), y_general) in fast.iter().zip(general.output()) {
            let expected = plant.impulse_response_at(t);
            assert_relative_eq!(y_fast, expected, epsilon = 1e-12);
            assert_relative_eq!(*y_general, expected, epsilon = 1e-9, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_step_matches_closed_form() {
        let plant = make_plant();
        let grid = make_plant_grid(&plant, 10.0, 500);
        let tf = plant.transfer_function();

        let fast = simulate(&tf, &Excitation::unit_step(), &grid).unwrap();
        let general = general_path()
            .simulate(&tf, &Excitation::unit_step(), &grid)
            .unwrap();

        for ((t, y_fast), y_general) in fast.iter().zip(general.output()) {
            let expected = plant.step_response_at(t);
            assert_abs_diff_eq!(y_fast, expected, epsilon = 1e-12);
            assert_abs_diff_eq!(*y_general, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_step_settles_at_gain_after_ten_time_constants() {
        let plant = make_plant();
        let grid = make_plant_grid(&plant, 10.0, 200);
        let response =
            simulate(&plant.transfer_function(), &Excitation::unit_step(), &grid).unwrap();

        assert!(!response.is_empty());
        assert_eq!(response.len(), grid.len());
        let (t_end, y_end) = response.last().unwrap();
        assert_relative_eq!(t_end, 10.0 * plant.tau(), epsilon = 1e-12);
        assert!((y_end - plant.gain()).abs() <= 0.01 * plant.gain());
    }

    #[test]
    fn test_step_is_linear_in_amplitude() {
        let plant = make_plant();
        let grid = make_plant_grid(&plant, 8.0, 300);
        let tf = plant.transfer_function();

        for simulator in [Simulator::default(), general_path()] {
            let unit = simulator
                .simulate(&tf, &Excitation::unit_step(), &grid)
                .unwrap();
            for amplitude in [-2.0, 0.0, 0.8, 3.5] {
                let scaled = simulator
                    .simulate(&tf, &Excitation::Step { amplitude }, &grid)
                    .unwrap();
                let expected = unit.scaled(amplitude);
                for (y, y_expected) in scaled.output().iter().zip(expected.output()) {
                    assert_abs_diff_eq!(*y, *y_expected, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_step_is_timed_from_first_sample() {
        let plant = make_plant();
        let grid = TimeGrid::linspace(5.0, 5.0 + 6.0 * plant.tau(), 100).unwrap();
        let response =
            simulate(&plant.transfer_function(), &Excitation::unit_step(), &grid).unwrap();

        assert_eq!(response.output()[0], 0.0);
        for (t, y) in response.iter() {
            assert_abs_diff_eq!(y, plant.step_response_at(t - 5.0), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_impulse_annotations() {
        let plant = make_plant();
        let grid = make_plant_grid(&plant, 5.0, 1000);
        let response =
            simulate(&plant.transfer_function(), &Excitation::Impulse, &grid).unwrap();

        let top = analysis::peak(&response).unwrap();
        assert_eq!(top.time, 0.0);
        assert_relative_eq!(top.value, plant.gain() / plant.tau(), epsilon = 1e-12);

        let decay = analysis::decay_time(&response).unwrap();
        assert!((decay.time - plant.tau()).abs() <= grid.step());
    }

    #[test]
    fn test_step_time_constant_point() {
        let plant = make_plant();
        let grid = make_plant_grid(&plant, 5.0, 1000);
        let response =
            simulate(&plant.transfer_function(), &Excitation::unit_step(), &grid).unwrap();

        let point = analysis::time_constant_point(&response, plant.gain()).unwrap();
        assert!((point.time - plant.tau()).abs() <= grid.step());
    }

    #[test]
    fn test_unit_ramp_lags_by_time_constant() {
        // K = 1, so the tracking error u - y settles at τ
        let plant = make_non_reacting_plant();
        let grid = test_cstr::make_grid();
        let input = sample_waveform(WaveForm::Ramp { slope: 1.0 }, &grid).unwrap();

        let response = Simulator::default()
            .simulate_input(&plant.transfer_function(), &input)
            .unwrap();

        let lag = analysis::ramp_lag(&response, plant.gain(), 1.0).unwrap();
        assert_relative_eq!(lag, plant.tau(), max_relative = 0.01);

        let (_, y_end) = response.last().unwrap();
        let u_end = input.values()[input.values().len() - 1];
        assert_relative_eq!(u_end - y_end, plant.tau(), max_relative = 0.01);
    }

    #[test]
    fn test_ramp_matches_closed_form() {
        let plant = make_plant();
        let grid = test_cstr::make_grid();
        let slope = 0.01;
        let input = sample_waveform(WaveForm::Ramp { slope }, &grid).unwrap();

        let response = Simulator::default()
            .simulate_input(&plant.transfer_function(), &input)
            .unwrap();

        // Exact under first-order hold
        for (t, y) in response.iter() {
            assert_abs_diff_eq!(y, plant.ramp_response_at(t, slope), epsilon = 1e-9);
        }
        let lag = analysis::ramp_lag(&response, plant.gain(), slope).unwrap();
        assert_relative_eq!(lag, plant.tau(), max_relative = 0.01);
    }

    #[test]
    fn test_sinusoid_steady_state_matches_frequency_response() {
        let plant = make_plant();
        let grid = test_cstr::make_grid();
        let (frequency, amplitude) = (0.05, 1.0);
        let input = sample_waveform(
            WaveForm::Sine {
                frequency,
                amplitude,
            },
            &grid,
        )
        .unwrap();

        let tf = plant.transfer_function();
        let response = Simulator::default().simulate_input(&tf, &input).unwrap();
        let fr = analysis::frequency_response(&tf, frequency).unwrap();

        let omega_tau = fr.omega * plant.tau();
        assert_relative_eq!(
            fr.amplitude_ratio,
            plant.gain() / (1.0 + omega_tau * omega_tau).sqrt(),
            epsilon = 1e-12
        );
        assert_relative_eq!(fr.phase_deg, -omega_tau.atan().to_degrees(), epsilon = 1e-9);

        let phase = fr.phase_deg.to_radians();
        for (t, y) in response.iter().filter(|(t, _)| *t > 30.0) {
            let expected = amplitude * fr.amplitude_ratio * (fr.omega * t + phase).sin();
            assert_abs_diff_eq!(y, expected, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_rectangular_pulse_rise_and_washout() {
        let plant = make_plant();
        let grid = test_cstr::make_grid();
        let (start, end) = (20.0, 40.0);
        let input = sample_waveform(
            WaveForm::RectangularPulse {
                start,
                end,
                amplitude: 1.0,
            },
            &grid,
        )
        .unwrap();

        let response = Simulator::default()
            .simulate_input(&plant.transfer_function(), &input)
            .unwrap();

        // Nothing happens before the pulse
        for (t, y) in response.iter().filter(|(t, _)| *t < start - grid.step()) {
            assert_eq!(y, 0.0, "non-zero response at t = {t}");
        }

        let rising = grid.nearest_index(start);
        let falling = grid.nearest_index(end);
        let target = plant.gain() * (1.0 - (-1.0f64).exp());
        let rise = analysis::nearest_crossing(&response, target, rising..falling).unwrap();
        assert_abs_diff_eq!(rise.time, start + plant.tau(), epsilon = 2.0 * grid.step());

        // Plateau just before the pulse ends
        assert_abs_diff_eq!(
            response.output()[falling - 1],
            plant.gain(),
            epsilon = 1e-4
        );
        // Washed out long after
        let (_, y_end) = response.last().unwrap();
        assert!(y_end.abs() < 1e-9);
    }
}

mod test_general_path {

    use super::*;

    /// `1 / ((s + 1)(s + 2))`
    fn second_order() -> TransferFunction<f64> {
        TransferFunction::new([1.0], [1.0, 3.0, 2.0]).unwrap()
    }

    fn second_order_step(t: f64) -> f64 {
        0.5 - (-t).exp() + 0.5 * (-2.0 * t).exp()
    }

    fn second_order_impulse(t: f64) -> f64 {
        (-t).exp() - (-2.0 * t).exp()
    }

    #[test]
    fn test_second_order_step_and_impulse() {
        let grid = TimeGrid::linspace(0.0, 8.0, 400).unwrap();
        let tf = second_order();

        let step = simulate(&tf, &Excitation::unit_step(), &grid).unwrap();
        for (t, y) in step.iter() {
            assert_abs_diff_eq!(y, second_order_step(t), epsilon = 1e-10);
        }

        let impulse = simulate(&tf, &Excitation::Impulse, &grid).unwrap();
        for (t, y) in impulse.iter() {
            assert_abs_diff_eq!(y, second_order_impulse(t), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_zero_and_first_order_hold_agree_on_steps() {
        let grid = TimeGrid::linspace(0.0, 8.0, 100).unwrap();
        let tf = second_order();
        let zoh = Simulator::new(
            SimulationConfigBuilder::default()
                .hold(InputHold::ZeroOrder)
                .build()
                .unwrap(),
        );

        let y_zoh = zoh.simulate(&tf, &Excitation::unit_step(), &grid).unwrap();
        let y_foh = simulate(&tf, &Excitation::unit_step(), &grid).unwrap();
        for (a, b) in y_zoh.output().iter().zip(y_foh.output()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_runge_kutta_agrees_with_exact_discretization() {
        let grid = TimeGrid::linspace(0.0, 8.0, 200).unwrap();
        let tf = second_order();
        let rk4 = Simulator::new(
            SimulationConfigBuilder::default()
                .discretization(Discretization::RungeKutta4 { substeps: 4 })
                .build()
                .unwrap(),
        );

        let input = sample_waveform(
            WaveForm::Sine {
                frequency: 0.2,
                amplitude: 1.0,
            },
            &grid,
        )
        .unwrap();

        let exact = simulate(&tf, &Excitation::from(input.clone()), &grid).unwrap();
        let stepped = rk4.simulate_input(&tf, &input).unwrap();
        for (a, b) in exact.output().iter().zip(stepped.output()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_zero_order_hold_on_sinusoid() {
        let grid = TimeGrid::linspace(0.0, 8.0, 81).unwrap();
        let tf = second_order();
        let input = sample_waveform(
            WaveForm::Sine {
                frequency: 0.1,
                amplitude: 1.0,
            },
            &grid,
        )
        .unwrap();

        let zoh = |discretization| {
            Simulator::new(
                SimulationConfigBuilder::default()
                    .hold(InputHold::ZeroOrder)
                    .discretization(discretization)
                    .build()
                    .unwrap(),
            )
        };
        let exact = zoh(Discretization::MatrixExponential)
            .simulate_input(&tf, &input)
            .unwrap();
        let stepped = zoh(Discretization::RungeKutta4 { substeps: 10 })
            .simulate_input(&tf, &input)
            .unwrap();
        for (a, b) in exact.output().iter().zip(stepped.output()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-7);
        }

        // Holding the input flat over each step delays it by about half a step
        let foh = simulate(&tf, &Excitation::from(input.clone()), &grid).unwrap();
        let largest_gap = exact
            .output()
            .iter()
            .zip(foh.output())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        assert!(largest_gap > 1e-3);
    }

    #[test]
    fn test_phase_lag_past_half_turn() {
        // (s + 1)^-3 at ω = 2 rad/s lags by 3·atan(2) ≈ 190.3°
        let tf = TransferFunction::new([1.0], [1.0, 3.0, 3.0, 1.0]).unwrap();
        let omega: f64 = 2.0;
        let fr = analysis::frequency_response(&tf, omega / (2.0 * std::f64::consts::PI)).unwrap();

        assert_relative_eq!(fr.omega, omega, epsilon = 1e-12);
        assert_relative_eq!(fr.phase_deg, -3.0 * omega.atan().to_degrees(), epsilon = 1e-6);
        assert_abs_diff_eq!(fr.phase_deg, -190.3048, epsilon = 1e-3);
        assert_relative_eq!(fr.amplitude_ratio, 5.0f64.powf(-1.5), epsilon = 1e-12);
        // The output trails the input
        assert_abs_diff_eq!(fr.time_lag(), 1.5 * omega.atan(), epsilon = 1e-9);
        assert!(fr.time_lag() > 0.0);
    }

    #[test]
    fn test_biproper_system_passes_input_through() {
        // (s + 3) / (s + 1) = 1 + 2 / (s + 1)
        let tf = TransferFunction::new([1.0, 3.0], [1.0, 1.0]).unwrap();
        let grid = TimeGrid::linspace(0.0, 5.0, 101).unwrap();

        let step = simulate(&tf, &Excitation::unit_step(), &grid).unwrap();
        for (t, y) in step.iter() {
            assert_abs_diff_eq!(y, 3.0 - 2.0 * (-t).exp(), epsilon = 1e-10);
        }

        // The Dirac component is dropped from the impulse response
        let impulse = simulate(&tf, &Excitation::Impulse, &grid).unwrap();
        for (t, y) in impulse.iter() {
            assert_abs_diff_eq!(y, 2.0 * (-t).exp(), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_static_gain_scales_input() {
        let tf = TransferFunction::new([3.0], [2.0]).unwrap();
        let grid = TimeGrid::linspace(0.0, 1.0, 5).unwrap();
        let input = vec![0.0, 1.0, -1.0, 2.0, 4.0];

        let response = simulate(&tf, &Excitation::Arbitrary(input), &grid).unwrap();
        assert_eq!(response.output(), &[0.0, 1.5, -1.5, 3.0, 6.0]);
    }
}

mod test_rejections {

    use super::*;

    #[test]
    fn test_excitation_length_must_match_grid() {
        let tf = TransferFunction::new([1.0], [1.0, 1.0]).unwrap();
        let grid = TimeGrid::linspace(0.0, 1.0, 10).unwrap();

        assert_eq!(
            simulate(&tf, &Excitation::Arbitrary(vec![0.0; 9]), &grid),
            Err(Error::DimensionMismatch {
                expected: 10,
                actual: 9
            })
        );
    }

    #[test]
    fn test_input_signal_length_must_match_grid() {
        let grid = TimeGrid::linspace(0.0, 1.0, 10).unwrap();
        assert_eq!(
            InputSignal::new(grid, vec![0.0; 11]).map(|_| ()),
            Err(Error::DimensionMismatch {
                expected: 10,
                actual: 11
            })
        );
    }

    #[test]
    fn test_non_finite_samples_are_rejected() {
        let tf = TransferFunction::new([1.0], [1.0, 1.0]).unwrap();
        let grid = TimeGrid::linspace(0.0, 1.0, 3).unwrap();

        assert!(matches!(
            simulate(&tf, &Excitation::Arbitrary(vec![0.0, f64::NAN, 1.0]), &grid),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(matches!(
            simulate(
                &tf,
                &Excitation::Step {
                    amplitude: f64::INFINITY
                },
                &grid
            ),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_improper_transfer_function_is_rejected() {
        let tf = TransferFunction::new([1.0, 0.0, 0.0], [1.0, 1.0]).unwrap();
        let grid = TimeGrid::linspace(0.0, 1.0, 10).unwrap();
        assert!(matches!(
            simulate(&tf, &Excitation::unit_step(), &grid),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_zero_denominator_is_rejected() {
        assert!(matches!(
            TransferFunction::new([1.0], [0.0, 0.0]),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_unstable_and_marginal_systems_are_rejected() {
        let grid = TimeGrid::linspace(0.0, 1.0, 10).unwrap();
        let unstable = [
            // Pole at +1
            TransferFunction::new([1.0], [1.0, -1.0]).unwrap(),
            // Integrator
            TransferFunction::new([1.0], [1.0, 0.0]).unwrap(),
            // Undamped oscillator
            TransferFunction::new([1.0], [1.0, 0.0, 4.0]).unwrap(),
            // s³ + s² + 2s + 8 has a right half plane pair
            TransferFunction::new([1.0], [1.0, 1.0, 2.0, 8.0]).unwrap(),
        ];
        for tf in &unstable {
            for excitation in [Excitation::Impulse, Excitation::unit_step()] {
                assert!(matches!(
                    simulate(tf, &excitation, &grid),
                    Err(Error::UnstableSystem { .. })
                ));
            }
        }
    }

    #[test]
    fn test_stability_check_can_be_disabled() {
        let simulator = Simulator::new(
            SimulationConfigBuilder::default()
                .check_stability(false)
                .build()
                .unwrap(),
        );
        let tf = TransferFunction::new([1.0], [1.0, -1.0]).unwrap();
        let grid = TimeGrid::linspace(0.0, 2.0, 50).unwrap();

        let response = simulator.simulate(&tf, &Excitation::unit_step(), &grid).unwrap();
        for (t, y) in response.iter() {
            assert_relative_eq!(y, t.exp() - 1.0, epsilon = 1e-9, max_relative = 1e-9);
        }

        // Growth that overflows is still refused
        let long_grid = TimeGrid::linspace(0.0, 1000.0, 50).unwrap();
        assert!(matches!(
            simulator.simulate(&tf, &Excitation::unit_step(), &long_grid),
            Err(Error::UnstableSystem { .. })
        ));
    }
}
