//! Persistent render configuration and per-call overrides.
//!
//! [`ScrollConfig`] holds the defaults a renderer uses for every write. [`WriteOptions`]
//! overrides any of them for a single write without touching the defaults; the two are
//! merged once per write by [`ScrollConfig::resolve`].

use smart_leds::RGB8;

use crate::error::InvalidArgument;
use crate::panel::colors;
use crate::Result;

/// No pause between frames.
pub const NO_PAUSE: u32 = 0;
/// 20 ms between frames.
pub const SHORT_PAUSE: u32 = 20;
/// 50 ms between frames. The default.
pub const MEDIUM_PAUSE: u32 = 50;
/// 100 ms between frames.
pub const LONG_PAUSE: u32 = 100;

/// When a multi-color cycle advances to its next color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Boundary {
    /// Each non-space character gets the next color.
    #[default]
    Char = 0,
    /// Each space-delimited word gets the next color.
    Word = 1,
}

impl TryFrom<u8> for Boundary {
    type Error = InvalidArgument;

    fn try_from(code: u8) -> core::result::Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Char),
            1 => Ok(Self::Word),
            _ => Err(InvalidArgument::UnknownBoundary { code }),
        }
    }
}

/// One color, or a cycle of colors applied per character or per word.
///
/// Build a spec from a slice with [`TryFrom`]: a one-element slice becomes
/// [`Single`](Self::Single). A cycle borrows the caller's slice, so it may be any length.
///
/// ```rust
/// use lolrgb::RGB8;
/// use lolrgb::panel::colors;
/// use lolrgb::scroll::ColorSpec;
///
/// let single = ColorSpec::try_from(&[colors::RED]).expect("one color is valid");
/// assert_eq!(single, ColorSpec::Single(colors::RED));
///
/// let rainbow = ColorSpec::try_from(&colors::RAINBOW).expect("six colors are valid");
/// assert_eq!(rainbow.colors(), &colors::RAINBOW[..]);
///
/// let empty: &[RGB8] = &[];
/// assert!(ColorSpec::try_from(empty).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSpec<'a> {
    /// Every lit pixel uses this color.
    Single(RGB8),
    /// Two or more colors, cycled according to the [`Boundary`].
    Cycle(&'a [RGB8]),
}

impl ColorSpec<'_> {
    /// The colors in cycle order. A single color is a cycle of one.
    #[must_use]
    pub const fn colors(&self) -> &[RGB8] {
        match self {
            Self::Single(color) => core::slice::from_ref(color),
            Self::Cycle(colors) => colors,
        }
    }

    /// Color for the character at `char_index`, given how many spaces precede it.
    ///
    /// Under [`Boundary::Char`] the cycle advances once per non-space character; under
    /// [`Boundary::Word`] it advances once per space seen, so consecutive spaces each count.
    #[must_use]
    pub fn color_for(&self, char_index: usize, spaces_before: usize, boundary: Boundary) -> RGB8 {
        let cycle = self.colors();
        let step = match boundary {
            Boundary::Char => char_index.saturating_sub(spaces_before),
            Boundary::Word => spaces_before,
        };
        step.checked_rem(cycle.len())
            .and_then(|index| cycle.get(index))
            .copied()
            .unwrap_or(colors::BLACK)
    }
}

impl Default for ColorSpec<'_> {
    fn default() -> Self {
        Self::Single(colors::RED)
    }
}

impl From<RGB8> for ColorSpec<'_> {
    fn from(color: RGB8) -> Self {
        Self::Single(color)
    }
}

impl<'a> TryFrom<&'a [RGB8]> for ColorSpec<'a> {
    type Error = InvalidArgument;

    fn try_from(colors: &'a [RGB8]) -> core::result::Result<Self, Self::Error> {
        match colors {
            [] => Err(InvalidArgument::EmptyColorList),
            [color] => Ok(Self::Single(*color)),
            _ => Ok(Self::Cycle(colors)),
        }
    }
}

impl<'a, const N: usize> TryFrom<&'a [RGB8; N]> for ColorSpec<'a> {
    type Error = InvalidArgument;

    fn try_from(colors: &'a [RGB8; N]) -> core::result::Result<Self, Self::Error> {
        Self::try_from(colors.as_slice())
    }
}

/// The renderer's persistent settings.
///
/// A color cycle is borrowed for `'a`, typically `'static` palette constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollConfig<'a> {
    color: ColorSpec<'a>,
    delay_ms: u32,
    boundary: Boundary,
}

impl<'a> ScrollConfig<'a> {
    /// Red text, [`MEDIUM_PAUSE`] between frames, color changes per character.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            color: ColorSpec::Single(colors::RED),
            delay_ms: MEDIUM_PAUSE,
            boundary: Boundary::Char,
        }
    }

    /// Validate a frame delay without storing it.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::NegativeDelay`] if `delay_ms < 0`.
    pub fn check_delay_ms(delay_ms: i32) -> Result<u32> {
        Ok(u32::try_from(delay_ms).map_err(|_| InvalidArgument::NegativeDelay)?)
    }

    /// Milliseconds paused after each frame.
    #[must_use]
    pub const fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Color or color cycle for lit pixels.
    #[must_use]
    pub const fn color(&self) -> ColorSpec<'a> {
        self.color
    }

    /// When a color cycle advances.
    #[must_use]
    pub const fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Set the pause after each frame.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::NegativeDelay`] if `delay_ms < 0`; the stored delay is
    /// left unchanged.
    pub fn set_delay_ms(&mut self, delay_ms: i32) -> Result<()> {
        self.delay_ms = Self::check_delay_ms(delay_ms)?;
        Ok(())
    }

    /// Set the color (one entry) or color cycle (several entries).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::EmptyColorList`] for an empty list; the stored color is
    /// left unchanged.
    pub fn set_color(&mut self, colors: &'a [RGB8]) -> Result<()> {
        self.color = ColorSpec::try_from(colors)?;
        Ok(())
    }

    /// Set an already validated color spec.
    pub fn set_color_spec(&mut self, color: impl Into<ColorSpec<'a>>) {
        self.color = color.into();
    }

    /// Set when a color cycle advances.
    pub const fn set_boundary(&mut self, boundary: Boundary) {
        self.boundary = boundary;
    }

    /// Set the boundary from its numeric code: 0 (char) or 1 (word).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::UnknownBoundary`] for any other code.
    pub fn set_boundary_code(&mut self, code: u8) -> Result<()> {
        self.boundary = Boundary::try_from(code)?;
        Ok(())
    }

    /// Merge per-call overrides over these settings.
    #[must_use]
    pub fn resolve<'r>(&self, options: &WriteOptions<'r>) -> Resolved<'r>
    where
        'a: 'r,
    {
        Resolved {
            color: options.color.unwrap_or(self.color),
            delay_ms: options.delay_ms.unwrap_or(self.delay_ms),
            boundary: options.boundary.unwrap_or(self.boundary),
        }
    }
}

impl Default for ScrollConfig<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Overrides for a single write. Unset fields fall back to the [`ScrollConfig`].
///
/// ```rust
/// use lolrgb::panel::colors;
/// use lolrgb::scroll::{Boundary, ScrollConfig, WriteOptions};
///
/// let options = WriteOptions::new()
///     .color(&colors::RGB)?
///     .delay_ms(0)?
///     .boundary(Boundary::Word);
///
/// let config = ScrollConfig::new();
/// let resolved = config.resolve(&options);
/// assert_eq!(resolved.delay_ms, 0);
/// assert_eq!(resolved.boundary, Boundary::Word);
/// // The persistent settings are untouched.
/// assert_eq!(config.boundary(), Boundary::Char);
/// # Ok::<(), lolrgb::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions<'a> {
    /// Color override.
    pub color: Option<ColorSpec<'a>>,
    /// Frame delay override, in milliseconds.
    pub delay_ms: Option<u32>,
    /// Boundary override.
    pub boundary: Option<Boundary>,
}

impl<'a> WriteOptions<'a> {
    /// No overrides.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            color: None,
            delay_ms: None,
            boundary: None,
        }
    }

    /// Override the color for this write.
    ///
    /// # Errors
    ///
    /// Fails like [`ScrollConfig::set_color`].
    pub fn color(mut self, colors: &'a [RGB8]) -> Result<Self> {
        self.color = Some(ColorSpec::try_from(colors)?);
        Ok(self)
    }

    /// Override the color for this write with an already validated spec.
    #[must_use]
    pub fn color_spec(mut self, color: impl Into<ColorSpec<'a>>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Override the frame delay for this write.
    ///
    /// # Errors
    ///
    /// Fails like [`ScrollConfig::set_delay_ms`].
    pub fn delay_ms(mut self, delay_ms: i32) -> Result<Self> {
        self.delay_ms = Some(ScrollConfig::check_delay_ms(delay_ms)?);
        Ok(self)
    }

    /// Override the boundary for this write.
    #[must_use]
    pub const fn boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = Some(boundary);
        self
    }

    /// Override the boundary for this write from its numeric code.
    ///
    /// # Errors
    ///
    /// Fails like [`ScrollConfig::set_boundary_code`].
    pub fn boundary_code(self, code: u8) -> Result<Self> {
        Ok(self.boundary(Boundary::try_from(code)?))
    }
}

/// The effective settings of one write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolved<'a> {
    /// Color or color cycle.
    pub color: ColorSpec<'a>,
    /// Milliseconds paused after each frame.
    pub delay_ms: u32,
    /// When the color cycle advances.
    pub boundary: Boundary,
}
