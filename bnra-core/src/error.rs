//! Error types for the statistics engine
//!
//! Every fallible function in this crate returns [`Result`]. Sparse input
//! (unanswered fields, empty expert lists) is never an error; only input
//! that a caller could not have produced correctly is.

/// Errors raised by the statistics engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A scale value does not have the `<letters><number>` shape.
    #[error("malformed scale value: {value:?}")]
    MalformedScaleValue { value: String },

    /// A weights slice was supplied whose length differs from the values.
    #[error("length mismatch: {values} values but {weights} weights")]
    LengthMismatch { values: usize, weights: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
