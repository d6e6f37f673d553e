//! Driver error type.

/// Errors that can occur during ozone sensor operations
#[derive(Debug, thiserror_no_std::Error)]
pub enum Error<E: core::fmt::Debug> {
    /// I2C communication error
    #[error("I2C bus error: {0:?}")]
    I2c(E),
    /// Averaging window outside `1..=100`
    #[error("averaging window {0} outside 1..=100")]
    InvalidWindow(i32),
}

impl<E: core::fmt::Debug> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Self::I2c(e)
    }
}
