//! Text accepted by a write: strings, numbers, or UTF-8 bytes.

use core::fmt::Write as _;
use core::ops::Deref;

use heapless::String;

use crate::{Error, Result};

// Longest rendering: "-2.2250738585072014e-308" (24 bytes).
const NUMBER_CAPACITY: usize = 32;

/// Something that can be scrolled.
///
/// Strings pass through unchanged, numbers are formatted, and bytes are decoded as UTF-8.
///
/// ```rust
/// use lolrgb::scroll::Text;
///
/// assert_eq!(&*Text::from(42).resolve()?, "42");
/// assert_eq!(&*Text::from(1.5).resolve()?, "1.5");
/// assert_eq!(&*Text::from(b"hi").resolve()?, "hi");
/// assert!(Text::from(&[0xff_u8][..]).resolve().is_err());
/// # Ok::<(), lolrgb::Error>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Text<'a> {
    /// A string, used as is.
    Str(&'a str),
    /// Bytes that must be valid UTF-8.
    Bytes(&'a [u8]),
    /// A signed integer, formatted in decimal.
    Integer(i64),
    /// An unsigned integer, formatted in decimal.
    Unsigned(u64),
    /// A float, formatted in its shortest round-trip form.
    ///
    /// This is Rust's `Debug` rendering, which is not Python's `str()`: large and tiny
    /// magnitudes drop the exponent sign and padding (`1e20`, `1e-5` rather than `1e+20`,
    /// `1e-05`) and non-finite values read `NaN`, `inf` and `-inf`.
    Float(f64),
    /// A single-precision float, formatted like [`Text::Float`].
    Float32(f32),
}

impl<'a> Text<'a> {
    /// Interpret as a string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if bytes are not valid UTF-8.
    pub fn resolve(self) -> Result<TextBuf<'a>> {
        match self {
            Self::Str(text) => Ok(TextBuf::Borrowed(text)),
            Self::Bytes(bytes) => core::str::from_utf8(bytes)
                .map(TextBuf::Borrowed)
                .map_err(|_| Error::TypeMismatch),
            Self::Integer(value) => format_number(format_args!("{value}")),
            Self::Unsigned(value) => format_number(format_args!("{value}")),
            Self::Float(value) => format_number(format_args!("{value:?}")),
            Self::Float32(value) => format_number(format_args!("{value:?}")),
        }
    }
}

fn format_number(args: core::fmt::Arguments<'_>) -> Result<TextBuf<'static>> {
    let mut formatted = String::new();
    formatted
        .write_fmt(args)
        .map_err(|_| Error::TypeMismatch)?;
    Ok(TextBuf::Formatted(formatted))
}

/// A resolved [`Text`]: borrowed from the caller or formatted in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextBuf<'a> {
    /// Caller's string.
    Borrowed(&'a str),
    /// Formatted number.
    Formatted(String<NUMBER_CAPACITY>),
}

impl Deref for TextBuf<'_> {
    type Target = str;

    fn deref(&self) -> &str {
        match self {
            Self::Borrowed(text) => text,
            Self::Formatted(text) => text,
        }
    }
}

impl<'a> From<&'a str> for Text<'a> {
    fn from(text: &'a str) -> Self {
        Self::Str(text)
    }
}

#[cfg(feature = "host")]
impl<'a> From<&'a std::string::String> for Text<'a> {
    fn from(text: &'a std::string::String) -> Self {
        Self::Str(text)
    }
}

impl<'a, const N: usize> From<&'a String<N>> for Text<'a> {
    fn from(text: &'a String<N>) -> Self {
        Self::Str(text)
    }
}

impl<'a> From<&'a [u8]> for Text<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Text<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self::Bytes(bytes)
    }
}

macro_rules! text_from_number {
    ($variant:ident($wide:ty): $($number:ty),+) => {
        $(
            impl From<$number> for Text<'_> {
                fn from(value: $number) -> Self {
                    Self::$variant(<$wide>::from(value))
                }
            }
        )+
    };
}

text_from_number!(Integer(i64): i8, i16, i32, i64);
text_from_number!(Unsigned(u64): u8, u16, u32, u64);

impl From<f64> for Text<'_> {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for Text<'_> {
    fn from(value: f32) -> Self {
        Self::Float32(value)
    }
}
