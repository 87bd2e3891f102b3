// Rational transfer functions and their state-space realization
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

use core::fmt;
use core::ops::Mul;

use nalgebra as na;
use nalgebra::Complex;
use num_traits::{Float, Num};

use crate::error::{Error, Result};
use crate::polynomial::Polynomial;

/// Lowest sweep frequency of [`TransferFunction::phase`], relative to the target frequency.
const PHASE_SWEEP_SPAN: f64 = 1e-6;
/// Steps of the log-spaced phase sweep, about 330 per decade.
const PHASE_SWEEP_POINTS: usize = 2000;

/// A single-input single-output transfer function `H(s) = N(s) / D(s)`.
///
/// The coefficient type defaults to `f64`. Composition ([`TransferFunction::series`],
/// [`TransferFunction::feedback`]) only multiplies and adds coefficients, so over an exact
/// coefficient type the reduced closed loop carries no rounding at all.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferFunction<T = f64> {
    num: Polynomial<T>,
    den: Polynomial<T>,
}

impl<T: Num + Copy> TransferFunction<T> {
    /// Creates a transfer function from numerator and denominator coefficients, highest power
    /// first.
    ///
    /// # Errors
    /// - `InvalidParameter` if the denominator is the zero polynomial.
    pub fn new(num: impl Into<Vec<T>>, den: impl Into<Vec<T>>) -> Result<Self> {
        Self::from_polynomials(Polynomial::new(num), Polynomial::new(den))
    }

    /// Creates a transfer function from already-built polynomials.
    ///
    /// # Errors
    /// - `InvalidParameter` if the denominator is the zero polynomial.
    pub fn from_polynomials(num: Polynomial<T>, den: Polynomial<T>) -> Result<Self> {
        if den.is_zero() {
            return Err(Error::invalid("transfer function denominator is zero"));
        }
        Ok(Self { num, den })
    }

    /// Caller guarantees a non-zero denominator.
    pub(crate) fn from_parts(num: Polynomial<T>, den: Polynomial<T>) -> Self {
        debug_assert!(!den.is_zero());
        Self { num, den }
    }

    /// Numerator polynomial.
    pub fn numerator(&self) -> &Polynomial<T> {
        &self.num
    }

    /// Denominator polynomial.
    pub fn denominator(&self) -> &Polynomial<T> {
        &self.den
    }

    /// Number of poles, i.e. the denominator degree.
    pub fn order(&self) -> usize {
        self.den.degree()
    }

    /// A proper transfer function is physically realizable: `deg N <= deg D`.
    pub fn is_proper(&self) -> bool {
        self.num.degree() <= self.den.degree()
    }

    /// `deg N < deg D`, i.e. no direct feedthrough.
    pub fn is_strictly_proper(&self) -> bool {
        self.num.is_zero() || self.num.degree() < self.den.degree()
    }

    /// Series connection `self · other`.
    pub fn series(&self, other: &Self) -> Self {
        Self {
            num: &self.num * &other.num,
            den: &self.den * &other.den,
        }
    }

    /// Unity negative feedback around `self`: `G / (1 + G) = N / (D + N)`.
    ///
    /// # Errors
    /// - `InvalidParameter` if `D + N` vanishes identically, i.e. `G = -1`.
    pub fn feedback(&self) -> Result<Self> {
        let den = &self.den + &self.num;
        if den.is_zero() {
            return Err(Error::invalid("closed-loop denominator vanishes (G = -1)"));
        }
        Ok(Self {
            num: self.num.clone(),
            den,
        })
    }
}

impl<T: Num + Copy> Mul for &TransferFunction<T> {
    type Output = TransferFunction<T>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.series(rhs)
    }
}

impl<T: Float> TransferFunction<T> {
    /// Steady-state gain `H(0)`, or `None` when `H` has a pole at the origin.
    pub fn dc_gain(&self) -> Option<T> {
        let d0 = self.den.constant_term();
        if d0.is_zero() {
            None
        } else {
            Some(self.num.constant_term() / d0)
        }
    }

    /// Evaluates `H(jω)`. Its `arg()` is the principal value; see
    /// [`TransferFunction::phase`] for the continuous phase.
    pub fn frequency_response(&self, omega: T) -> Complex<T> {
        let s = Complex::new(T::zero(), omega);
        self.num.eval_complex(s) / self.den.eval_complex(s)
    }

    /// True iff every pole lies in the open left half plane.
    pub fn is_stable(&self) -> bool {
        self.den.is_hurwitz()
    }

    /// True iff every coefficient of both polynomials is finite.
    pub fn is_finite(&self) -> bool {
        self.num.is_finite() && self.den.is_finite()
    }
}

impl TransferFunction<f64> {
    /// Time constant and gain when `H(s) = K / (τs + 1)`, i.e. a first-order lag with no zero
    /// and a non-zero constant denominator term.
    pub fn first_order_lag(&self) -> Option<(f64, f64)> {
        if self.den.degree() != 1 || self.num.degree() != 0 {
            return None;
        }
        let a0 = self.den.constant_term();
        if a0 == 0.0 {
            return None;
        }
        Some((self.den.leading() / a0, self.num.constant_term() / a0))
    }

    /// Continuous phase of `H(jω)` in radians, as drawn on a Bode phase plot.
    ///
    /// The phase is unwrapped from its low-frequency limit by accumulating the angle of
    /// `H(jωₖ₊₁) / H(jωₖ)` over a log-spaced sweep ending at `omega`, so lags beyond -180° are
    /// reported as such rather than folded back into (-180°, 180°].
    pub fn phase(&self, omega: f64) -> f64 {
        let omega = omega.abs();
        if omega == 0.0 {
            return self.frequency_response(0.0).arg();
        }
        let start = omega * PHASE_SWEEP_SPAN;
        let mut previous = self.frequency_response(start);
        let mut phase = previous.arg();
        let ratio = (omega / start).powf(1.0 / PHASE_SWEEP_POINTS as f64);
        let mut w = start;
        for k in 1..=PHASE_SWEEP_POINTS {
            w = if k == PHASE_SWEEP_POINTS { omega } else { w * ratio };
            let current = self.frequency_response(w);
            let step = (current / previous).arg();
            // A zero on the imaginary axis has no defined phase
            if step.is_finite() {
                phase += step;
            }
            previous = current;
        }
        phase
    }

    /// Realizes the transfer function in controllable canonical form.
    ///
    /// With the denominator normalized to `s^n + a₁s^(n-1) + … + aₙ` and the numerator split as
    /// `D·den(s) + r(s)`:
    ///
    /// ```text
    ///     ┌                    ┐       ┌   ┐
    ///     │  0    1   …    0   │       │ 0 │
    /// A = │  ⋮         ⋱   ⋮   │   B = │ ⋮ │   C = [ r₀  r₁  …  rₙ₋₁ ]
    ///     │  0    0   …    1   │       │ 0 │
    ///     │ -aₙ  -aₙ₋₁ … -a₁   │       │ 1 │
    ///     └                    ┘       └   ┘
    /// ```
    ///
    /// where `rᵢ` is the coefficient of `s^i` in the remainder `r(s)`.
    ///
    /// # Errors
    /// - `InvalidParameter` if the transfer function is improper or has non-finite coefficients.
    pub fn state_space(&self) -> Result<StateSpace> {
        if !self.is_proper() {
            return Err(Error::invalid("transfer function is improper"));
        }
        if !self.is_finite() {
            return Err(Error::invalid("transfer function has non-finite coefficients"));
        }

        let n = self.den.degree();
        let lead = self.den.leading();
        let a: Vec<f64> = self.den.coefficients().iter().map(|c| c / lead).collect();
        // Numerator padded to n + 1 coefficients, highest power first
        let b: Vec<f64> = (0..=n)
            .rev()
            .map(|power| self.num.coefficient(power) / lead)
            .collect();

        let d = b[0];

        let mut mat_a = na::DMatrix::<f64>::zeros(n, n);
        for i in 0..n.saturating_sub(1) {
            mat_a[(i, i + 1)] = 1.0;
        }
        for j in 0..n {
            mat_a[(n - 1, j)] = -a[n - j];
        }

        let mut vec_b = na::DVector::<f64>::zeros(n);
        if n > 0 {
            vec_b[n - 1] = 1.0;
        }

        let vec_c = na::DVector::<f64>::from_fn(n, |j, _| b[n - j] - d * a[n - j]);

        Ok(StateSpace {
            a: mat_a,
            b: vec_b,
            c: vec_c,
            d,
        })
    }
}

impl<T: Num + Copy + PartialOrd + fmt::Display> fmt::Display for TransferFunction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) / ({})", self.num, self.den)
    }
}

/// A continuous-time SISO state-space model `x' = Ax + Bu`, `y = Cx + Du`.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSpace {
    /// State matrix, `n × n`.
    pub a: na::DMatrix<f64>,
    /// Input vector, length `n`.
    pub b: na::DVector<f64>,
    /// Output row, stored as a column vector of length `n`.
    pub c: na::DVector<f64>,
    /// Direct feedthrough.
    pub d: f64,
}

impl StateSpace {
    /// Number of states.
    pub fn order(&self) -> usize {
        self.a.nrows()
    }

    /// Output equation `y = Cx + Du`.
    pub fn output(&self, x: &na::DVector<f64>, u: f64) -> f64 {
        self.c.dot(x) + self.d * u
    }

    /// State derivative `x' = Ax + Bu`.
    pub fn f(&self, x: &na::DVector<f64>, u: f64) -> na::DVector<f64> {
        &self.a * x + &self.b * u
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_zero_denominator() {
        assert_eq!(
            TransferFunction::new(vec![1.0], vec![0.0, 0.0]),
            Err(Error::InvalidParameter {
                what: "transfer function denominator is zero"
            })
        );
    }

    #[test]
    fn test_properness() {
        let lag = TransferFunction::new(vec![1.0], vec![1.0, 1.0]).unwrap();
        assert!(lag.is_proper() && lag.is_strictly_proper());

        let lead = TransferFunction::new(vec![1.0, 3.0], vec![1.0, 1.0]).unwrap();
        assert!(lead.is_proper() && !lead.is_strictly_proper());
    }

    #[test]
    fn test_phase_is_unwrapped() {
        // (s + 1)^-3 lags by 3·atan(ω), past -180° once ω > √3
        let tf = TransferFunction::new(vec![1.0], vec![1.0, 3.0, 3.0, 1.0]).unwrap();
        for omega in [0.5f64, 2.0, 10.0] {
            assert_relative_eq!(tf.phase(omega), -3.0 * omega.atan(), epsilon = 1e-9);
        }
        assert!(tf.frequency_response(2.0).arg() > 0.0);

        // Pure integrator starts at -90°
        let integrator = TransferFunction::new(vec![1.0], vec![1.0, 0.0]).unwrap();
        assert_relative_eq!(
            integrator.phase(3.0),
            -core::f64::consts::FRAC_PI_2,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_first_order_realization() {
        let tf = TransferFunction::new(vec![0.5], vec![2.0, 1.0]).unwrap();
        let ss = tf.state_space().unwrap();
        assert_eq!(ss.order(), 1);
        assert_relative_eq!(ss.a[(0, 0)], -0.5);
        assert_relative_eq!(ss.b[0], 1.0);
        assert_relative_eq!(ss.c[0], 0.25);
        assert_eq!(ss.d, 0.0);
        assert_eq!(tf.first_order_lag(), Some((2.0, 0.5)));
    }

    #[test]
    fn test_biproper_realization_extracts_feedthrough() {
        // (s + 1) / (s + 2) = 1 - 1 / (s + 2)
        let tf = TransferFunction::new(vec![1.0, 1.0], vec![1.0, 2.0]).unwrap();
        let ss = tf.state_space().unwrap();
        assert_relative_eq!(ss.d, 1.0);
        assert_relative_eq!(ss.a[(0, 0)], -2.0);
        assert_relative_eq!(ss.c[0], -1.0);
    }

    #[test]
    fn test_second_order_realization_reproduces_dc_gain() {
        // 3 / (s^2 + 3s + 2): DC gain 1.5 = -C A^-1 B + D
        let tf = TransferFunction::new(vec![3.0], vec![1.0, 3.0, 2.0]).unwrap();
        let ss = tf.state_space().unwrap();
        let a_inv = ss.a.clone().try_inverse().unwrap();
        let dc = -(ss.c.transpose() * a_inv * &ss.b)[(0, 0)] + ss.d;
        assert_relative_eq!(dc, 1.5, epsilon = 1e-12);
        assert_relative_eq!(tf.dc_gain().unwrap(), 1.5);
    }

    #[test]
    fn test_improper_is_rejected() {
        let tf = TransferFunction::new(vec![1.0, 0.0, 0.0], vec![1.0, 1.0]).unwrap();
        assert!(!tf.is_proper());
        assert!(tf.state_space().is_err());
    }

    #[test]
    fn test_frequency_response_of_first_order_lag() {
        let tf = TransferFunction::new(vec![1.0], vec![1.0, 1.0]).unwrap();
        let h = tf.frequency_response(1.0);
        assert_relative_eq!(h.norm(), 1.0 / 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(h.arg().to_degrees(), -45.0, epsilon = 1e-12);
    }

    #[test]
    fn test_feedback_of_integer_loop_is_exact() {
        // Controller (s^2 + 2s + 1) / s with plant 1 / (s + 1)
        let c = TransferFunction::new(vec![1i64, 2, 1], vec![1i64, 0]).unwrap();
        let g = TransferFunction::new(vec![1i64], vec![1i64, 1]).unwrap();
        let cl = (&c * &g).feedback().unwrap();
        assert_eq!(cl.numerator().coefficients(), &[1, 2, 1]);
        assert_eq!(cl.denominator().coefficients(), &[2, 3, 1]);
    }

    #[test]
    fn test_feedback_rejects_minus_one() {
        let g = TransferFunction::new(vec![-1.0], vec![1.0]).unwrap();
        assert!(g.feedback().is_err());
    }
}
