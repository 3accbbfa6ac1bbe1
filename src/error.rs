use derive_more::{Display, Error, From};

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors reported by the scroll renderer.
#[derive(Debug, Display, Error, From, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A setter or override was given a value outside its domain.
    #[display("invalid argument: {_0}")]
    #[from]
    InvalidArgument(InvalidArgument),
    /// The text to scroll could not be interpreted as a string.
    #[display("could not interpret text: bytes are not valid UTF-8")]
    TypeMismatch,
    /// The pixel sink failed to transmit a frame.
    #[display("pixel sink failed to write")]
    SinkWrite,
}

/// The specific reason an argument was rejected.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidArgument {
    /// Frame delays must be `>= 0` ms.
    #[display("delay must be >= 0 ms")]
    NegativeDelay,
    /// A color cycle needs at least one color.
    #[display("color list must not be empty")]
    EmptyColorList,
    /// Boundary codes are 0 (char) or 1 (word).
    #[display("boundary must be 0 (char) or 1 (word), got {code}")]
    UnknownBoundary {
        /// The rejected code.
        code: u8,
    },
}
