//! Scrolling text across the 14×5 panel.
//!
//! Text enters fully off-screen on the right and scrolls one column per frame until it has
//! left on the left. Each character takes a 4-column cell: 3 glyph columns and 1 blank.
//! A text of `n` characters therefore takes `WIDTH + 4 * n` frames.
//!
//! [`LolRgb`] owns the pixel sink, the delay provider and the persistent
//! [`ScrollConfig`]. [`Scroll`] is the pure frame generator underneath it, usable on its own
//! to precompute frames or render previews.
//!
//! # Example
//!
//! ```rust
//! use lolrgb::cancel::CancelToken;
//! use lolrgb::panel::{Frame, colors};
//! use lolrgb::scroll::{Boundary, LolRgb, WriteOptions, WriteOutcome};
//! # struct NoDelay;
//! # impl embedded_hal::delay::DelayNs for NoDelay {
//! #     fn delay_ns(&mut self, _ns: u32) {}
//! # }
//!
//! static STOP: CancelToken = CancelToken::new();
//!
//! // Any `PixelSink` works; a `Frame` just keeps the last frame in memory.
//! let mut lolrgb = LolRgb::new(Frame::new(), NoDelay, &STOP);
//!
//! // Persistent settings.
//! lolrgb.set_color(&colors::RAINBOW)?;
//! lolrgb.set_boundary(Boundary::Word);
//! assert_eq!(lolrgb.write("Hello World")?, WriteOutcome::Completed);
//!
//! // One-off overrides leave the persistent settings alone.
//! let options = WriteOptions::new().color(&[colors::CYAN])?.delay_ms(0)?;
//! lolrgb.write_with(2024, &options)?;
//! assert_eq!(lolrgb.config().boundary(), Boundary::Word);
//! # Ok::<(), lolrgb::Error>(())
//! ```

pub mod config;
pub mod text;

pub use config::{
    Boundary, ColorSpec, LONG_PAUSE, MEDIUM_PAUSE, NO_PAUSE, Resolved, SHORT_PAUSE,
    ScrollConfig, WriteOptions,
};
pub use text::{Text, TextBuf};

use embassy_futures::select::{Either, select};
use embedded_hal::delay::DelayNs;
use embedded_hal_async::delay::DelayNs as AsyncDelayNs;
use smart_leds::RGB8;

use crate::cancel::CancelToken;
use crate::font::{CELL_WIDTH, GLYPH_HEIGHT, GLYPH_WIDTH, SPACE_CODE, glyph_code, glyph_column};
use crate::panel::{Frame, PixelSink, WIDTH, colors};
use crate::{Error, Result};

/// How a write ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum WriteOutcome {
    /// Every frame was shown.
    Completed,
    /// The [`CancelToken`] stopped the animation; the display was cleared.
    Cancelled,
}

/// Frame generator for one text with one set of colors.
///
/// Frame `i` places the text's first column at display column `cursor = WIDTH - i`.
#[derive(Clone, Copy, Debug)]
pub struct Scroll<'a> {
    text: &'a str,
    pixel_width: usize,
    color: ColorSpec<'a>,
    boundary: Boundary,
}

impl<'a> Scroll<'a> {
    /// Prepare to scroll `text`.
    #[must_use]
    pub fn new(text: &'a str, color: ColorSpec<'a>, boundary: Boundary) -> Self {
        Self {
            text,
            pixel_width: text.chars().count().saturating_mul(CELL_WIDTH),
            color,
            boundary,
        }
    }

    /// Prepare to scroll `text` with resolved settings.
    #[must_use]
    pub fn with_settings(text: &'a str, settings: &Resolved<'a>) -> Self {
        Self::new(text, settings.color, settings.boundary)
    }

    /// Width of the text in pixel columns, spacing included.
    #[must_use]
    pub const fn pixel_width(&self) -> usize {
        self.pixel_width
    }

    /// Number of frames from fully off-screen right to fully off-screen left.
    #[must_use]
    pub const fn frame_count(&self) -> usize {
        WIDTH.saturating_add(self.pixel_width)
    }

    /// Clear `sink` and draw frame `frame_index` into it. Does not flush.
    pub fn render<S: PixelSink + ?Sized>(&self, frame_index: usize, sink: &mut S) {
        sink.fill(colors::BLACK);

        // Visible columns are max(cursor, 0)..min(WIDTH, cursor + pixel_width).
        let first_column = WIDTH.saturating_sub(frame_index);
        let end_column = WIDTH
            .saturating_add(self.pixel_width)
            .saturating_sub(frame_index)
            .min(WIDTH);

        for column in first_column..end_column {
            let str_column = column + frame_index - WIDTH;
            let char_index = str_column / CELL_WIDTH;
            let column_in_char = str_column % CELL_WIDTH;
            if column_in_char >= GLYPH_WIDTH {
                continue;
            }
            let Some(character) = self.text.chars().nth(char_index) else {
                continue;
            };
            let code = glyph_code(character);
            if code == SPACE_CODE {
                continue;
            }

            let color = self.color_at(char_index);
            let lit_rows = glyph_column(u32::from(code), column_in_char);
            for row in (0..GLYPH_HEIGHT).filter(|row| lit_rows & (1_u8 << row) != 0) {
                sink.set_pixel(column + WIDTH * row, color);
            }
        }
    }

    fn color_at(&self, char_index: usize) -> RGB8 {
        match self.color {
            ColorSpec::Single(color) => color,
            ColorSpec::Cycle(_) => {
                let spaces_before = self
                    .text
                    .chars()
                    .take(char_index)
                    .filter(|character| *character == ' ')
                    .count();
                self.color.color_for(char_index, spaces_before, self.boundary)
            }
        }
    }

    /// Render one frame into a fresh [`Frame`].
    #[must_use]
    pub fn frame(&self, frame_index: usize) -> Frame {
        let mut frame = Frame::new();
        self.render(frame_index, &mut frame);
        frame
    }

    /// Iterate over every frame in order.
    #[must_use]
    pub const fn frames(&self) -> ScrollFrames<'a> {
        ScrollFrames {
            scroll: *self,
            next_index: 0,
        }
    }
}

/// Iterator over the frames of a [`Scroll`].
#[derive(Clone, Debug)]
pub struct ScrollFrames<'a> {
    scroll: Scroll<'a>,
    next_index: usize,
}

impl Iterator for ScrollFrames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.scroll.frame_count() {
            return None;
        }
        let frame = self.scroll.frame(self.next_index);
        self.next_index += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.scroll.frame_count().saturating_sub(self.next_index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ScrollFrames<'_> {}

/// Clears and flushes the sink when dropped unless disarmed, so every early exit from a
/// write (cancellation, sink error, a dropped future) leaves the display dark.
struct BlankOnExit<'s, S: PixelSink> {
    sink: &'s mut S,
    armed: bool,
}

impl<'s, S: PixelSink> BlankOnExit<'s, S> {
    const fn new(sink: &'s mut S) -> Self {
        Self { sink, armed: true }
    }

    fn sink(&mut self) -> &mut S {
        &mut *self.sink
    }

    const fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<S: PixelSink> Drop for BlankOnExit<'_, S> {
    fn drop(&mut self) {
        if self.armed {
            self.sink.fill(colors::BLACK);
            if self.sink.flush().is_err() {
                warn!("scroll: failed to clear display on exit");
            }
        }
    }
}

fn flush_frame<S: PixelSink>(sink: &mut S, frame_index: usize) -> Result<()> {
    sink.flush().map_err(|_| {
        warn!("scroll: sink failed on frame {}", frame_index);
        Error::SinkWrite
    })
}

/// A device abstraction for the LOL RGB shield: scrolling text with persistent settings.
///
/// `S` receives the pixels and `D` paces the frames. `D` must implement
/// [`embedded_hal::delay::DelayNs`] for [`write`](Self::write) and
/// [`embedded_hal_async::delay::DelayNs`] for [`write_async`](Self::write_async).
///
/// See the [module documentation](mod@crate::scroll) for an example.
pub struct LolRgb<'a, S, D> {
    sink: S,
    delay: D,
    cancel: &'a CancelToken,
    config: ScrollConfig<'a>,
}

impl<'a, S: PixelSink, D> LolRgb<'a, S, D> {
    /// Create the renderer with default settings: red, [`MEDIUM_PAUSE`], [`Boundary::Char`].
    pub const fn new(sink: S, delay: D, cancel: &'a CancelToken) -> Self {
        Self {
            sink,
            delay,
            cancel,
            config: ScrollConfig::new(),
        }
    }

    /// The persistent settings.
    pub const fn config(&self) -> &ScrollConfig<'a> {
        &self.config
    }

    /// Set the pause after each frame, in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `delay_ms < 0`; the setting is unchanged.
    pub fn set_delay_ms(&mut self, delay_ms: i32) -> Result<()> {
        self.config.set_delay_ms(delay_ms)
    }

    /// Set one color (a one-element slice) or a color cycle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `colors` is empty; the setting is unchanged.
    pub fn set_color(&mut self, colors: &'a [RGB8]) -> Result<()> {
        self.config.set_color(colors)
    }

    /// Set an already validated color spec.
    pub fn set_color_spec(&mut self, color: impl Into<ColorSpec<'a>>) {
        self.config.set_color_spec(color);
    }

    /// Set when a color cycle advances.
    pub const fn set_boundary(&mut self, boundary: Boundary) {
        self.config.set_boundary(boundary);
    }

    /// Set the boundary from its numeric code: 0 (char) or 1 (word).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for any other code; the setting is unchanged.
    pub fn set_boundary_code(&mut self, code: u8) -> Result<()> {
        self.config.set_boundary_code(code)
    }

    /// Turn every pixel off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SinkWrite`] if the sink fails.
    pub fn clear(&mut self) -> Result<()> {
        self.sink.fill(colors::BLACK);
        flush_frame(&mut self.sink, 0)
    }

    /// Display a precomposed frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SinkWrite`] if the sink fails.
    pub fn show_frame(&mut self, frame: &Frame) -> Result<()> {
        for (index, pixel) in frame.pixels().enumerate() {
            self.sink.set_pixel(index, pixel);
        }
        flush_frame(&mut self.sink, 0)
    }

    /// Give back the sink and the delay provider.
    pub fn release(self) -> (S, D) {
        (self.sink, self.delay)
    }
}

impl<S: PixelSink, D: DelayNs> LolRgb<'_, S, D> {
    /// Scroll `text` once with the persistent settings, blocking until done.
    ///
    /// # Errors
    ///
    /// See [`write_with`](Self::write_with).
    pub fn write<'t>(&mut self, text: impl Into<Text<'t>>) -> Result<WriteOutcome> {
        self.write_with(text, &WriteOptions::new())
    }

    /// Scroll `text` once, with `options` overriding the persistent settings for this call.
    ///
    /// A cancellation requested through the [`CancelToken`] while the text scrolls stops the
    /// animation before the next frame, clears the display and returns
    /// [`WriteOutcome::Cancelled`]. Requests made before the call are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `text` is bytes that are not UTF-8, or
    /// [`Error::SinkWrite`] if the sink fails (the display is then cleared on a best-effort
    /// basis).
    pub fn write_with<'t>(
        &mut self,
        text: impl Into<Text<'t>>,
        options: &WriteOptions<'_>,
    ) -> Result<WriteOutcome> {
        let text = text.into().resolve()?;
        let Self {
            sink,
            delay,
            cancel,
            config,
        } = self;
        let settings = config.resolve(options);
        let scroll = Scroll::with_settings(&text, &settings);
        info!(
            "scroll: writing {} frames, {} ms apart",
            scroll.frame_count(),
            settings.delay_ms
        );

        cancel.reset();
        let mut guard = BlankOnExit::new(sink);
        for frame_index in 0..scroll.frame_count() {
            if cancel.is_cancelled() {
                info!("scroll: cancelled before frame {}", frame_index);
                return Ok(WriteOutcome::Cancelled);
            }
            scroll.render(frame_index, guard.sink());
            flush_frame(guard.sink(), frame_index)?;
            trace!("scroll: frame {} shown", frame_index);
            if settings.delay_ms > 0 {
                DelayNs::delay_ms(delay, settings.delay_ms);
            }
        }
        guard.disarm();
        debug!("scroll: completed");
        Ok(WriteOutcome::Completed)
    }
}

impl<S: PixelSink, D: AsyncDelayNs> LolRgb<'_, S, D> {
    /// Async version of [`write`](Self::write).
    ///
    /// # Errors
    ///
    /// See [`write_async_with`](Self::write_async_with).
    pub async fn write_async<'t>(&mut self, text: impl Into<Text<'t>>) -> Result<WriteOutcome> {
        self.write_async_with(text, &WriteOptions::new()).await
    }

    /// Async version of [`write_with`](Self::write_with).
    ///
    /// The pause after each frame races the [`CancelToken`], so a cancellation during a long
    /// pause takes effect without waiting for the pause to end. Dropping the future also
    /// clears the display.
    ///
    /// # Errors
    ///
    /// Same as [`write_with`](Self::write_with).
    pub async fn write_async_with<'t>(
        &mut self,
        text: impl Into<Text<'t>>,
        options: &WriteOptions<'_>,
    ) -> Result<WriteOutcome> {
        let text = text.into().resolve()?;
        let Self {
            sink,
            delay,
            cancel,
            config,
        } = self;
        let settings = config.resolve(options);
        let scroll = Scroll::with_settings(&text, &settings);
        info!(
            "scroll: writing {} frames async, {} ms apart",
            scroll.frame_count(),
            settings.delay_ms
        );

        cancel.reset();
        let mut guard = BlankOnExit::new(sink);
        for frame_index in 0..scroll.frame_count() {
            if cancel.is_cancelled() {
                info!("scroll: cancelled before frame {}", frame_index);
                return Ok(WriteOutcome::Cancelled);
            }
            scroll.render(frame_index, guard.sink());
            flush_frame(guard.sink(), frame_index)?;
            trace!("scroll: frame {} shown", frame_index);
            if settings.delay_ms > 0 {
                let pause = AsyncDelayNs::delay_ms(delay, settings.delay_ms);
                if let Either::First(()) = select(cancel.wait(), pause).await {
                    info!("scroll: cancelled during pause after frame {}", frame_index);
                    return Ok(WriteOutcome::Cancelled);
                }
            }
        }
        guard.disarm();
        debug!("scroll: completed");
        Ok(WriteOutcome::Completed)
    }
}
