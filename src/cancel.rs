//! Cooperative cancellation for running animations.
//!
//! A [`CancelToken`] is usually a `static` so an interrupt handler (a button press, a
//! serial break) or another task can stop a scroll in progress:
//!
//! ```rust
//! use lolrgb::cancel::CancelToken;
//!
//! static STOP: CancelToken = CancelToken::new();
//!
//! // From an interrupt handler or another task:
//! STOP.cancel();
//! assert!(STOP.is_cancelled());
//! ```
//!
//! The renderer polls the token between frames, never mid-frame, and clears the display
//! before returning.

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};

/// Request to stop the animation currently being written.
pub struct CancelToken {
    signal: Signal<CriticalSectionRawMutex, ()>,
}

impl CancelToken {
    /// Create a token with no cancellation pending.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    /// Ask the running write to stop after its current frame.
    pub fn cancel(&self) {
        self.signal.signal(());
    }

    /// Whether a cancellation is pending.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.signal.signaled()
    }

    /// Drop any pending cancellation.
    pub fn reset(&self) {
        self.signal.reset();
    }

    /// Wait until a cancellation is requested. The request stays pending.
    pub async fn wait(&self) {
        self.signal.wait().await;
        self.signal.signal(());
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
