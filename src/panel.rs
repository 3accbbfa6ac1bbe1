//! The 14×5 RGB pixel surface of the LOL RGB shield and the sinks that display it.
//!
//! Pixels are addressed either as `(column, row)` through [`Frame2d`] or by the linear
//! index `column + WIDTH * row`, which is also the order the shield's LEDs are chained in.
//!
//! A [`PixelSink`] is anything that accepts a frame: [`StripSink`] wraps a
//! [`smart_leds::SmartLedsWrite`] driver, and [`Frame2d`] itself records the pixels
//! in memory.
//!
//! # Example: Compose a frame with embedded-graphics
//!
//! ```rust
//! use embedded_graphics::{
//!     pixelcolor::Rgb888,
//!     prelude::*,
//!     primitives::{PrimitiveStyle, Rectangle},
//! };
//! use lolrgb::panel::{Frame, colors};
//!
//! let mut frame = Frame::new();
//! Rectangle::new(Frame::TOP_LEFT, Frame::SIZE)
//!     .into_styled(PrimitiveStyle::with_stroke(Rgb888::new(0, 0, 1), 1))
//!     .draw(&mut frame)
//!     .expect("drawing into a frame cannot fail");
//!
//! assert_eq!(frame[(0, 0)], colors::BLUE);
//! assert_eq!(frame[(1, 1)], colors::BLACK);
//! ```

use core::{
    convert::Infallible,
    ops::{Index, IndexMut},
};

use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use smart_leds::{RGB8, SmartLedsWrite};

/// Columns on the shield.
pub const WIDTH: usize = 14;
/// Rows on the shield.
pub const HEIGHT: usize = 5;
/// Total number of LEDs (WIDTH × HEIGHT).
pub const LEN: usize = WIDTH * HEIGHT;

/// A frame sized for the shield.
pub type Frame = Frame2d<WIDTH, HEIGHT>;

/// Very dim colors; these pixels are bright even at channel value 1.
pub mod colors {
    use smart_leds::RGB8;

    /// All channels off.
    pub const BLACK: RGB8 = RGB8::new(0, 0, 0);
    /// Dim red.
    pub const RED: RGB8 = RGB8::new(1, 0, 0);
    /// Dim yellow.
    pub const YELLOW: RGB8 = RGB8::new(1, 1, 0);
    /// Dim green.
    pub const GREEN: RGB8 = RGB8::new(0, 1, 0);
    /// Dim cyan.
    pub const CYAN: RGB8 = RGB8::new(0, 1, 1);
    /// Dim blue.
    pub const BLUE: RGB8 = RGB8::new(0, 0, 1);
    /// Dim magenta.
    pub const MAGENTA: RGB8 = RGB8::new(1, 0, 1);

    /// Red, green, blue cycle.
    pub const RGB: [RGB8; 3] = [RED, GREEN, BLUE];
    /// Six-color rainbow cycle.
    pub const RAINBOW: [RGB8; 6] = [RED, YELLOW, GREEN, CYAN, BLUE, MAGENTA];
}

/// Destination for rendered pixels, addressed by linear index `column + WIDTH * row`.
///
/// The renderer calls [`fill`](Self::fill) once per frame, [`set_pixel`](Self::set_pixel) for
/// every lit cell, then [`flush`](Self::flush) once.
pub trait PixelSink {
    /// Error reported when the buffered pixels cannot be transmitted.
    type Error;

    /// Set one buffered pixel. Indices past the surface are ignored.
    fn set_pixel(&mut self, index: usize, color: RGB8);

    /// Set every buffered pixel to `color`.
    fn fill(&mut self, color: RGB8);

    /// Transmit the buffered pixels.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if the transmission fails.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

impl<T: PixelSink + ?Sized> PixelSink for &mut T {
    type Error = T::Error;

    fn set_pixel(&mut self, index: usize, color: RGB8) {
        (**self).set_pixel(index, color);
    }

    fn fill(&mut self, color: RGB8) {
        (**self).fill(color);
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}

/// A 2D array of RGB pixels representing a single display frame.
///
/// Frames are stored in row-major order where `frame[(col, row)]` is the pixel at display
/// coordinates (col, row), so flattening the rows gives the shield's linear LED order.
///
/// # Associated Constants
///
/// - `WIDTH`: Frame2d width in pixels (columns)
/// - `HEIGHT`: Frame2d height in pixels (rows)
/// - `LEN`: Total pixel count (WIDTH × HEIGHT)
///
///  *For [`embedded-graphics`](https://docs.rs/embedded-graphics) drawing operations:*
/// - `SIZE`: [`Size`] frame dimensions
/// - `TOP_LEFT`, `BOTTOM_RIGHT`: Corner [`Point`] coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame2d<const W: usize, const H: usize>(pub [[RGB8; W]; H]);

impl<const W: usize, const H: usize> Frame2d<W, H> {
    /// Frame2d width in pixels (columns).
    pub const WIDTH: usize = W;
    /// Frame2d height in pixels (rows).
    pub const HEIGHT: usize = H;
    /// Total number of pixels (WIDTH × HEIGHT).
    pub const LEN: usize = W * H;
    /// Frame dimensions as a [`Size`].
    #[allow(clippy::cast_possible_truncation, reason = "panel dimensions are tiny")]
    pub const SIZE: Size = Size::new(W as u32, H as u32);
    /// Top-left corner coordinate as a [`Point`].
    pub const TOP_LEFT: Point = Point::new(0, 0);
    /// Bottom-right corner coordinate as a [`Point`].
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        reason = "panel dimensions are tiny"
    )]
    pub const BOTTOM_RIGHT: Point = Point::new((W - 1) as i32, (H - 1) as i32);

    /// Create a new blank (all black) frame.
    #[must_use]
    pub const fn new() -> Self {
        Self([[RGB8::new(0, 0, 0); W]; H])
    }

    /// Create a frame filled with a single color.
    #[must_use]
    pub const fn filled(color: RGB8) -> Self {
        Self([[color; W]; H])
    }

    /// Pixels in linear index order (`column + W * row`).
    pub fn pixels(&self) -> impl Iterator<Item = RGB8> + '_ {
        self.0.iter().flatten().copied()
    }

    /// Whether every pixel is black.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixels().all(|pixel| pixel == RGB8::default())
    }
}

impl<const W: usize, const H: usize> Index<(usize, usize)> for Frame2d<W, H> {
    type Output = RGB8;

    fn index(&self, (x_index, y_index): (usize, usize)) -> &Self::Output {
        assert!(x_index < W, "x_index must be within width");
        assert!(y_index < H, "y_index must be within height");
        &self.0[y_index][x_index]
    }
}

impl<const W: usize, const H: usize> IndexMut<(usize, usize)> for Frame2d<W, H> {
    fn index_mut(&mut self, (x_index, y_index): (usize, usize)) -> &mut Self::Output {
        assert!(x_index < W, "x_index must be within width");
        assert!(y_index < H, "y_index must be within height");
        &mut self.0[y_index][x_index]
    }
}

impl<const W: usize, const H: usize> From<[[RGB8; W]; H]> for Frame2d<W, H> {
    fn from(array: [[RGB8; W]; H]) -> Self {
        Self(array)
    }
}

impl<const W: usize, const H: usize> Default for Frame2d<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> PixelSink for Frame2d<W, H> {
    type Error = Infallible;

    fn set_pixel(&mut self, index: usize, color: RGB8) {
        if let Some(pixel) = self.0.get_mut(index / W).and_then(|row| row.get_mut(index % W)) {
            *pixel = color;
        }
    }

    fn fill(&mut self, color: RGB8) {
        *self = Self::filled(color);
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<const W: usize, const H: usize> OriginDimensions for Frame2d<W, H> {
    fn size(&self) -> Size {
        Self::SIZE
    }
}

impl<const W: usize, const H: usize> DrawTarget for Frame2d<W, H> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let (Ok(x_index), Ok(y_index)) = (usize::try_from(coord.x), usize::try_from(coord.y))
            else {
                continue;
            };
            if x_index < W && y_index < H {
                self.0[y_index][x_index] = RGB8::new(color.r(), color.g(), color.b());
            }
        }
        Ok(())
    }
}

/// A [`PixelSink`] that buffers one shield frame and transmits it through a
/// [`SmartLedsWrite`] strip driver (WS2812 over PIO, SPI, bit-banged GPIO, ...).
pub struct StripSink<L> {
    strip: L,
    frame: Frame,
}

impl<L> StripSink<L>
where
    L: SmartLedsWrite<Color = RGB8>,
{
    /// Wrap a strip driver. The buffer starts black; nothing is sent until the first flush.
    #[must_use]
    pub const fn new(strip: L) -> Self {
        Self {
            strip,
            frame: Frame::new(),
        }
    }

    /// The buffered frame, as it will be (or last was) transmitted.
    #[must_use]
    pub const fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Give back the strip driver.
    pub fn into_inner(self) -> L {
        self.strip
    }
}

impl<L> PixelSink for StripSink<L>
where
    L: SmartLedsWrite<Color = RGB8>,
{
    type Error = L::Error;

    fn set_pixel(&mut self, index: usize, color: RGB8) {
        self.frame.set_pixel(index, color);
    }

    fn fill(&mut self, color: RGB8) {
        self.frame.fill(color);
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.strip.write(self.frame.pixels())
    }
}
