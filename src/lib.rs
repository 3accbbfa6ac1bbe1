//! Scrolling text for the 14×5 "LOL RGB" LED shield.
//!
//! Text scrolls right to left in a 3×5 pixel font, one column per frame, in a single color
//! or a color cycle that advances per character or per word.
//!
//! # Glossary
//!
//! - **Frame:** one complete 14×5 state of the display, written to the sink in one flush.
//! - **Cell:** the 4 columns a character occupies: 3 glyph columns and 1 blank.
//! - **Boundary:** when a color cycle advances, at each [`Char`](scroll::Boundary::Char) or
//!   each [`Word`](scroll::Boundary::Word).
//!
//! # Crate layout
//!
//! - [`font`]: the packed 3×5 glyph table.
//! - [`panel`]: the frame buffer, the [`PixelSink`](panel::PixelSink) trait and the palette.
//! - [`scroll`]: [`LolRgb`], the frame generator and the settings.
//! - [`cancel`]: stopping a scroll from an interrupt handler or another task.
//! - `to_png` (feature `host`): PNG and APNG previews.
//!
//! # Example
//!
//! ```rust
//! use lolrgb::cancel::CancelToken;
//! use lolrgb::panel::{Frame, colors};
//! use lolrgb::{LolRgb, WriteOutcome};
//! # struct NoDelay;
//! # impl embedded_hal::delay::DelayNs for NoDelay {
//! #     fn delay_ns(&mut self, _ns: u32) {}
//! # }
//!
//! static STOP: CancelToken = CancelToken::new();
//!
//! let mut lolrgb = LolRgb::new(Frame::new(), NoDelay, &STOP);
//! lolrgb.set_color(&[colors::GREEN])?;
//! lolrgb.set_delay_ms(20)?;
//! assert_eq!(lolrgb.write("Hi!")?, WriteOutcome::Completed);
//!
//! // A completed write leaves the text fully scrolled off.
//! let (frame, _delay) = lolrgb.release();
//! assert!(frame.is_blank());
//! # Ok::<(), lolrgb::Error>(())
//! ```
#![cfg_attr(not(feature = "host"), no_std)]

// Must come first so the logging macros are visible to every module below.
#[macro_use]
mod fmt;

pub mod cancel;
mod error;
pub mod font;
pub mod panel;
pub mod scroll;
#[cfg(feature = "host")]
pub mod to_png;

pub use crate::error::{Error, InvalidArgument, Result};
pub use crate::scroll::{LolRgb, WriteOutcome};
pub use smart_leds::RGB8;
