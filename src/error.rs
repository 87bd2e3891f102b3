// Error taxonomy shared by every stage of the simulation pipeline
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

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by plant construction, tuning, and simulation.
///
/// Every failure is reported synchronously and no partial result accompanies it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A physical parameter, controller parameter, time grid, or transfer function is malformed.
    #[error("Invalid parameter: {what}")]
    InvalidParameter {
        /// Which parameter was rejected and why.
        what: &'static str,
    },

    /// The system has a pole with non-negative real part, so its response diverges.
    #[error("Unstable system: {what}")]
    UnstableSystem {
        /// Where the instability was detected.
        what: &'static str,
    },

    /// An arbitrary excitation does not carry one sample per grid point.
    #[error("Dimension mismatch: expected {expected} samples, got {actual}")]
    DimensionMismatch {
        /// Number of points on the time grid.
        expected: usize,
        /// Number of excitation samples supplied.
        actual: usize,
    },
}

impl Error {
    pub(crate) fn invalid(what: &'static str) -> Self {
        Error::InvalidParameter { what }
    }
}
