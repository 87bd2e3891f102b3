// Coefficient polynomials in the Laplace variable
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
use core::ops::{Add, Mul, Sub};

use nalgebra::Complex;
use num_traits::{Float, Num};

/// A polynomial in `s` with coefficients stored highest power first.
///
/// Arithmetic only needs `Num + Copy`, so composing transfer functions over an exact coefficient
/// type (integers, rationals) never rounds. Leading zeros are stripped on construction, which
/// keeps [`Polynomial::degree`] unambiguous; the zero polynomial is stored as `[0]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial<T> {
    coeffs: Vec<T>,
}

impl<T: Num + Copy> Polynomial<T> {
    /// Creates a polynomial from coefficients in descending powers of `s`.
    pub fn new(coeffs: impl Into<Vec<T>>) -> Self {
        let mut coeffs = coeffs.into();
        match coeffs.iter().position(|c| !c.is_zero()) {
            Some(first) => {
                coeffs.drain(..first);
            }
            None => coeffs = vec![T::zero()],
        }
        Self { coeffs }
    }

    /// The constant polynomial `c`.
    pub fn constant(c: T) -> Self {
        Self::new(vec![c])
    }

    /// The polynomial `s`.
    pub fn s() -> Self {
        Self::new(vec![T::one(), T::zero()])
    }

    /// Coefficients, highest power first.
    pub fn coefficients(&self) -> &[T] {
        &self.coeffs
    }

    /// Degree; zero for constants, including the zero polynomial.
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// True for the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0].is_zero()
    }

    /// Coefficient of the highest power.
    pub fn leading(&self) -> T {
        self.coeffs[0]
    }

    /// Coefficient of `s^0`, i.e. the value at `s = 0`.
    pub fn constant_term(&self) -> T {
        self.coeffs[self.coeffs.len() - 1]
    }

    /// Coefficient of `s^power`, zero beyond the degree.
    pub fn coefficient(&self, power: usize) -> T {
        if power > self.degree() {
            T::zero()
        } else {
            self.coeffs[self.degree() - power]
        }
    }

    /// Evaluates the polynomial with Horner's scheme.
    pub fn eval(&self, x: T) -> T {
        self.coeffs
            .iter()
            .fold(T::zero(), |acc, &c| acc * x + c)
    }

    /// Multiplies every coefficient by `k`.
    pub fn scale(&self, k: T) -> Self {
        Self::new(self.coeffs.iter().map(|&c| c * k).collect::<Vec<_>>())
    }

    fn add_impl(&self, rhs: &Self, negate_rhs: bool) -> Self {
        let len = self.coeffs.len().max(rhs.coeffs.len());
        let coeffs = (0..len)
            .rev()
            .map(|power| {
                let b = rhs.coefficient(power);
                if negate_rhs {
                    self.coefficient(power) - b
                } else {
                    self.coefficient(power) + b
                }
            })
            .collect::<Vec<_>>();
        Self::new(coeffs)
    }

    fn mul_impl(&self, rhs: &Self) -> Self {
        let mut coeffs = vec![T::zero(); self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] = coeffs[i + j] + a * b;
            }
        }
        Self::new(coeffs)
    }
}

impl<T: Float> Polynomial<T> {
    /// Evaluates the polynomial at a complex point, typically `s = jω`.
    pub fn eval_complex(&self, s: Complex<T>) -> Complex<T> {
        self.coeffs
            .iter()
            .fold(Complex::new(T::zero(), T::zero()), |acc, &c| {
                acc * s + Complex::new(c, T::zero())
            })
    }

    /// Whether every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_finite())
    }

    /// Routh–Hurwitz test: true iff every root lies strictly in the open left half plane.
    ///
    /// A constant polynomial has no roots and passes. Roots on the imaginary axis, including a
    /// root at the origin, fail the test.
    pub fn is_hurwitz(&self) -> bool {
        let n = self.degree();
        if n == 0 {
            return !self.is_zero();
        }

        // Necessary condition: all coefficients present and of one sign
        let sign = self.leading().signum();
        if self
            .coeffs
            .iter()
            .any(|c| c.is_zero() || c.signum() != sign)
        {
            return false;
        }

        let width = n / 2 + 1;
        let pick = |offset: usize| -> Vec<T> {
            (0..width)
                .map(|j| self.coeffs.get(2 * j + offset).copied().unwrap_or_else(T::zero))
                .collect()
        };
        let mut prev = pick(0);
        let mut curr = pick(1);

        for _ in 1..n {
            let pivot = curr[0];
            if pivot.is_zero() || pivot.signum() != sign {
                return false;
            }
            let next = (0..width)
                .map(|j| {
                    let a = prev.get(j + 1).copied().unwrap_or_else(T::zero);
                    let b = curr.get(j + 1).copied().unwrap_or_else(T::zero);
                    (pivot * a - prev[0] * b) / pivot
                })
                .collect();
            prev = curr;
            curr = next;
        }

        !curr[0].is_zero() && curr[0].signum() == sign
    }
}

impl<T: Num + Copy> Add for &Polynomial<T> {
    type Output = Polynomial<T>;

    fn add(self, rhs: Self) -> Self::Output {
        self.add_impl(rhs, false)
    }
}

impl<T: Num + Copy> Add for Polynomial<T> {
    type Output = Polynomial<T>;

    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl<T: Num + Copy> Sub for &Polynomial<T> {
    type Output = Polynomial<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.add_impl(rhs, true)
    }
}

impl<T: Num + Copy> Sub for Polynomial<T> {
    type Output = Polynomial<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        &self - &rhs
    }
}

impl<T: Num + Copy> Mul for &Polynomial<T> {
    type Output = Polynomial<T>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.mul_impl(rhs)
    }
}

impl<T: Num + Copy> Mul for Polynomial<T> {
    type Output = Polynomial<T>;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}

impl<T: Num + Copy + PartialOrd + fmt::Display> fmt::Display for Polynomial<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.degree();
        let mut first = true;
        for (i, &coeff) in self.coeffs.iter().enumerate() {
            if coeff.is_zero() && n > 0 {
                continue;
            }
            let negative = coeff < T::zero();
            match (first, negative) {
                (true, true) => write!(f, "-")?,
                (true, false) => {}
                (false, true) => write!(f, " - ")?,
                (false, false) => write!(f, " + ")?,
            }
            first = false;
            let c = if negative { T::zero() - coeff } else { coeff };
            match n - i {
                0 => write!(f, "{c}")?,
                1 => write!(f, "{c}s")?,
                p => write!(f, "{c}s^{p}")?,
            }
        }
        Ok(())
    }
}
