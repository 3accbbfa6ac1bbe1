#![allow(missing_docs, reason = "integration tests")]
//! Host-level tests for scrolling text through a recording sink.

use core::pin::Pin;
use core::task::{Context, Poll};

use lolrgb::cancel::CancelToken;
use lolrgb::panel::{Frame, HEIGHT, PixelSink, WIDTH, colors};
use lolrgb::scroll::{Boundary, ColorSpec, MEDIUM_PAUSE, Scroll, WriteOptions};
use lolrgb::{Error, InvalidArgument, LolRgb, RGB8, WriteOutcome};

/// Captures every flushed frame. Flushes fail once `fail_at` frames have been sent.
#[derive(Default)]
struct RecordingSink {
    buffer: Frame,
    flushed: Vec<Frame>,
    fail_at: Option<usize>,
}

impl PixelSink for RecordingSink {
    type Error = ();

    fn set_pixel(&mut self, index: usize, color: RGB8) {
        self.buffer.set_pixel(index, color);
    }

    fn fill(&mut self, color: RGB8) {
        self.buffer.fill(color);
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.fail_at.is_some_and(|fail_at| self.flushed.len() >= fail_at) {
            return Err(());
        }
        self.flushed.push(self.buffer);
        Ok(())
    }
}

/// Records each pause. Optionally requests cancellation on the `n`th pause.
struct RecordingDelay<'a> {
    pauses_ms: Vec<u32>,
    cancel_on: Option<(usize, &'a CancelToken)>,
}

impl<'a> RecordingDelay<'a> {
    fn new() -> Self {
        Self {
            pauses_ms: Vec::new(),
            cancel_on: None,
        }
    }

    fn cancelling(pause_number: usize, token: &'a CancelToken) -> Self {
        Self {
            pauses_ms: Vec::new(),
            cancel_on: Some((pause_number, token)),
        }
    }

    fn record(&mut self, ms: u32) {
        self.pauses_ms.push(ms);
        if let Some((pause_number, token)) = self.cancel_on
            && self.pauses_ms.len() == pause_number
        {
            token.cancel();
        }
    }
}

impl embedded_hal::delay::DelayNs for RecordingDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.record(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.record(ms);
    }
}

impl embedded_hal_async::delay::DelayNs for RecordingDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.record(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.record(ms);
    }
}

/// Requests cancellation as each pause starts, then stays pending for one poll.
struct CancelMidPause<'a> {
    token: &'a CancelToken,
    started: usize,
    finished: usize,
}

impl<'a> CancelMidPause<'a> {
    const fn new(token: &'a CancelToken) -> Self {
        Self {
            token,
            started: 0,
            finished: 0,
        }
    }
}

/// Returns `Pending` on the first poll and `Ready` after.
#[derive(Default)]
struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        context.waker().wake_by_ref();
        Poll::Pending
    }
}

impl embedded_hal_async::delay::DelayNs for CancelMidPause<'_> {
    async fn delay_ns(&mut self, _ns: u32) {
        self.started += 1;
        self.token.cancel();
        YieldOnce::default().await;
        self.finished += 1;
    }
}

fn lit_colors(frame: &Frame, columns: core::ops::Range<usize>) -> Vec<RGB8> {
    let mut found = Vec::new();
    for column in columns {
        for row in 0..HEIGHT {
            let pixel = frame[(column, row)];
            if pixel != colors::BLACK && !found.contains(&pixel) {
                found.push(pixel);
            }
        }
    }
    found
}

fn lit_columns(frame: &Frame) -> Vec<usize> {
    (0..WIDTH)
        .filter(|&column| !lit_colors(frame, column..column + 1).is_empty())
        .collect()
}

#[test]
fn empty_text_shows_blank_frames() {
    let token = CancelToken::new();
    let mut lolrgb = LolRgb::new(RecordingSink::default(), RecordingDelay::new(), &token);

    assert_eq!(lolrgb.write(""), Ok(WriteOutcome::Completed));

    let (sink, delay) = lolrgb.release();
    assert_eq!(sink.flushed.len(), WIDTH);
    assert!(sink.flushed.iter().all(Frame::is_blank));
    assert_eq!(delay.pauses_ms, vec![MEDIUM_PAUSE; WIDTH]);
}

#[test]
fn single_character_scrolls_through() {
    let token = CancelToken::new();
    let mut lolrgb = LolRgb::new(RecordingSink::default(), RecordingDelay::new(), &token);

    assert_eq!(lolrgb.write("A"), Ok(WriteOutcome::Completed));

    let (sink, _) = lolrgb.release();
    assert_eq!(sink.flushed.len(), WIDTH + 4);
    for frame in &sink.flushed {
        let lit = lit_columns(frame);
        assert!(lit.len() <= 3);
        // One glyph on screen lights a single run of columns.
        if let (Some(first), Some(last)) = (lit.first(), lit.last()) {
            assert_eq!(last - first + 1, lit.len(), "gap in lit columns {lit:?}");
        }
        for color in lit_colors(frame, 0..WIDTH) {
            assert_eq!(color, colors::RED);
        }
    }
    assert!(sink.flushed.first().is_some_and(Frame::is_blank));
    assert!(sink.flushed.last().is_some_and(Frame::is_blank));
    let expected = Scroll::new("A", ColorSpec::default(), Boundary::Char).frame(WIDTH);
    assert_eq!(sink.flushed[WIDTH], expected);
}

#[test]
fn char_boundary_cycles_per_character() {
    let color = ColorSpec::try_from(&[colors::RED, colors::GREEN]).expect("two colors are valid");
    let scroll = Scroll::new("AB CD", color, Boundary::Char);

    // With the text's first column at column 0: A 0..3, B 4..7, space 8..11, C 12..14.
    let frame = scroll.frame(WIDTH);
    assert_eq!(lit_colors(&frame, 0..3), vec![colors::RED]);
    assert_eq!(lit_colors(&frame, 4..7), vec![colors::GREEN]);
    assert!(lit_colors(&frame, 8..12).is_empty());
    // The space does not consume a color.
    assert_eq!(lit_colors(&frame, 12..WIDTH), vec![colors::RED]);
}

#[test]
fn word_boundary_cycles_per_word() {
    let color = ColorSpec::try_from(&[colors::RED, colors::GREEN]).expect("two colors are valid");
    let scroll = Scroll::new("AB CD", color, Boundary::Word);

    // Four columns further: B 0..3, space 4..7, C 8..11, D 12..14.
    let frame = scroll.frame(WIDTH + 4);
    assert_eq!(lit_colors(&frame, 0..3), vec![colors::RED]);
    assert_eq!(lit_colors(&frame, 8..WIDTH), vec![colors::GREEN]);
}

#[test]
fn word_cycle_wraps_around() {
    let color = ColorSpec::try_from(&colors::RGB).expect("three colors are valid");
    let scroll = Scroll::new("a b c d", color, Boundary::Word);
    let expected = [colors::RED, colors::GREEN, colors::BLUE, colors::RED];

    for (word, expected) in expected.iter().enumerate() {
        // Put word `word` (at char index 2 * word) on display columns 0..3.
        let frame = scroll.frame(WIDTH + word * 8);
        assert_eq!(lit_colors(&frame, 0..3), vec![*expected]);
    }
}

#[test]
fn negative_delay_is_rejected() {
    let token = CancelToken::new();
    let mut lolrgb = LolRgb::new(RecordingSink::default(), RecordingDelay::new(), &token);

    assert_eq!(
        lolrgb.set_delay_ms(-1),
        Err(Error::InvalidArgument(InvalidArgument::NegativeDelay))
    );
    assert_eq!(lolrgb.config().delay_ms(), MEDIUM_PAUSE);

    lolrgb.set_delay_ms(0).expect("zero delay is valid");
    assert_eq!(lolrgb.write("x"), Ok(WriteOutcome::Completed));
    let (_, delay) = lolrgb.release();
    assert!(delay.pauses_ms.is_empty());
}

#[test]
fn one_color_list_is_a_single_color() {
    let token = CancelToken::new();
    let mut lolrgb = LolRgb::new(RecordingSink::default(), RecordingDelay::new(), &token);

    lolrgb.set_color(&[colors::CYAN]).expect("one color is valid");
    assert_eq!(lolrgb.config().color(), ColorSpec::Single(colors::CYAN));

    assert_eq!(
        lolrgb.set_color(&[]),
        Err(Error::InvalidArgument(InvalidArgument::EmptyColorList))
    );
    assert_eq!(
        lolrgb.set_boundary_code(2),
        Err(Error::InvalidArgument(InvalidArgument::UnknownBoundary { code: 2 }))
    );
    assert_eq!(lolrgb.config().color(), ColorSpec::Single(colors::CYAN));
    assert_eq!(lolrgb.config().boundary(), Boundary::Char);
}

#[test]
fn long_color_lists_cycle_through_every_color() {
    const LONG: [RGB8; 17] = {
        let mut list = [colors::RED; 17];
        list[16] = colors::BLUE;
        list
    };
    let token = CancelToken::new();
    let mut lolrgb = LolRgb::new(RecordingSink::default(), RecordingDelay::new(), &token);

    lolrgb.set_color(&LONG).expect("seventeen colors are valid");
    assert_eq!(lolrgb.config().color().colors().len(), 17);

    // Characters 16 and 17 of "AAAA..." take the last color, then wrap to the first.
    let scroll = Scroll::new("AAAAAAAAAAAAAAAAAA", lolrgb.config().color(), Boundary::Char);
    let frame = scroll.frame(WIDTH + 16 * 4);
    assert_eq!(lit_colors(&frame, 0..3), vec![colors::BLUE]);
    assert_eq!(lit_colors(&frame, 4..7), vec![colors::RED]);
}

#[test]
fn overrides_apply_to_one_write_only() {
    let token = CancelToken::new();
    let mut lolrgb = LolRgb::new(RecordingSink::default(), RecordingDelay::new(), &token);
    let options = WriteOptions::new()
        .color(&[colors::GREEN])
        .and_then(|options| options.delay_ms(0))
        .expect("valid overrides");

    assert_eq!(lolrgb.write_with("Hi", &options), Ok(WriteOutcome::Completed));
    assert_eq!(lolrgb.config().color(), ColorSpec::Single(colors::RED));
    assert_eq!(lolrgb.config().delay_ms(), MEDIUM_PAUSE);

    let (sink, delay) = lolrgb.release();
    assert!(delay.pauses_ms.is_empty());
    for frame in &sink.flushed {
        for color in lit_colors(frame, 0..WIDTH) {
            assert_eq!(color, colors::GREEN);
        }
    }
}

#[test]
fn repeated_writes_show_identical_frames() {
    let token = CancelToken::new();
    let mut lolrgb = LolRgb::new(RecordingSink::default(), RecordingDelay::new(), &token);
    lolrgb.set_color(&colors::RAINBOW).expect("six colors are valid");

    assert_eq!(lolrgb.write("Hello World"), Ok(WriteOutcome::Completed));
    assert_eq!(lolrgb.write("Hello World"), Ok(WriteOutcome::Completed));

    let (sink, _) = lolrgb.release();
    let (first, second) = sink.flushed.split_at(sink.flushed.len() / 2);
    assert_eq!(first, second);
    assert_eq!(first.len(), WIDTH + 11 * 4);
}

#[test]
fn numbers_scroll_as_decimal_text() {
    let token = CancelToken::new();
    let mut lolrgb = LolRgb::new(RecordingSink::default(), RecordingDelay::new(), &token);

    assert_eq!(lolrgb.write(-42), Ok(WriteOutcome::Completed));
    assert_eq!(lolrgb.write(2.5), Ok(WriteOutcome::Completed));

    let (sink, _) = lolrgb.release();
    let expected: Vec<Frame> = Scroll::new("-42", ColorSpec::default(), Boundary::Char)
        .frames()
        .chain(Scroll::new("2.5", ColorSpec::default(), Boundary::Char).frames())
        .collect();
    assert_eq!(sink.flushed, expected);
}

#[test]
fn invalid_utf8_is_rejected_before_drawing() {
    let token = CancelToken::new();
    let mut lolrgb = LolRgb::new(RecordingSink::default(), RecordingDelay::new(), &token);

    assert_eq!(lolrgb.write(&[b'o', b'k', 0xff]), Err(Error::TypeMismatch));
    assert_eq!(lolrgb.write(b"ok"), Ok(WriteOutcome::Completed));

    let (sink, _) = lolrgb.release();
    assert_eq!(sink.flushed.len(), WIDTH + 8);
}

#[test]
fn cancel_stops_and_clears() {
    let token = CancelToken::new();
    let delay = RecordingDelay::cancelling(3, &token);
    let mut lolrgb = LolRgb::new(RecordingSink::default(), delay, &token);
    lolrgb.set_color(&[colors::YELLOW]).expect("one color is valid");

    assert_eq!(lolrgb.write("WWWWWW"), Ok(WriteOutcome::Cancelled));

    let (sink, delay) = lolrgb.release();
    assert_eq!(delay.pauses_ms.len(), 3);
    // Three frames, then the clearing flush.
    assert_eq!(sink.flushed.len(), 4);
    assert!(!sink.flushed[2].is_blank());
    assert!(sink.flushed[3].is_blank());
}

#[test]
fn stale_cancel_is_discarded() {
    let token = CancelToken::new();
    token.cancel();
    let mut lolrgb = LolRgb::new(RecordingSink::default(), RecordingDelay::new(), &token);

    assert_eq!(lolrgb.write("ok"), Ok(WriteOutcome::Completed));
}

#[test]
fn sink_failure_is_reported() {
    let token = CancelToken::new();
    let sink = RecordingSink {
        fail_at: Some(WIDTH + 1),
        ..RecordingSink::default()
    };
    let mut lolrgb = LolRgb::new(sink, RecordingDelay::new(), &token);

    assert_eq!(lolrgb.write("Hi"), Err(Error::SinkWrite));

    let (sink, delay) = lolrgb.release();
    assert_eq!(sink.flushed.len(), WIDTH + 1);
    assert_eq!(delay.pauses_ms.len(), WIDTH + 1);
    // The clearing flush failed too, but the buffer was blanked.
    assert!(sink.buffer.is_blank());
}

#[test]
fn show_frame_and_clear() {
    let token = CancelToken::new();
    let mut lolrgb = LolRgb::new(RecordingSink::default(), RecordingDelay::new(), &token);
    let frame = Frame::filled(colors::MAGENTA);

    lolrgb.show_frame(&frame).expect("recording sink accepts frames");
    lolrgb.clear().expect("recording sink accepts frames");

    let (sink, _) = lolrgb.release();
    assert_eq!(sink.flushed, vec![frame, Frame::new()]);
}

#[test]
fn show_frame_from_rows() {
    let token = CancelToken::new();
    let mut lolrgb = LolRgb::new(RecordingSink::default(), RecordingDelay::new(), &token);
    let mut rows = [[colors::BLACK; WIDTH]; HEIGHT];
    rows[0][0] = colors::RED;
    rows[HEIGHT - 1][WIDTH - 1] = colors::BLUE;

    lolrgb.show_frame(&Frame::from(rows)).expect("recording sink accepts frames");

    let (sink, _) = lolrgb.release();
    assert_eq!(sink.flushed.len(), 1);
    assert_eq!(sink.flushed[0][(0, 0)], colors::RED);
    assert_eq!(sink.flushed[0][(WIDTH - 1, HEIGHT - 1)], colors::BLUE);
    assert_eq!(sink.flushed[0].pixels().filter(|pixel| *pixel != colors::BLACK).count(), 2);
}

#[test]
fn async_write_matches_blocking_write() {
    let token = CancelToken::new();
    let mut blocking = LolRgb::new(RecordingSink::default(), RecordingDelay::new(), &token);
    blocking.set_boundary(Boundary::Word);
    blocking.set_color(&colors::RGB).expect("three colors are valid");
    assert_eq!(blocking.write("Hi there"), Ok(WriteOutcome::Completed));

    let mut lolrgb = LolRgb::new(RecordingSink::default(), RecordingDelay::new(), &token);
    lolrgb.set_boundary(Boundary::Word);
    lolrgb.set_color(&colors::RGB).expect("three colors are valid");
    let outcome = embassy_futures::block_on(lolrgb.write_async("Hi there"));
    assert_eq!(outcome, Ok(WriteOutcome::Completed));

    let (blocking_sink, blocking_delay) = blocking.release();
    let (sink, delay) = lolrgb.release();
    assert_eq!(sink.flushed, blocking_sink.flushed);
    assert_eq!(delay.pauses_ms, blocking_delay.pauses_ms);
}

#[test]
fn async_cancel_stops_and_clears() {
    let token = CancelToken::new();
    let delay = RecordingDelay::cancelling(2, &token);
    let mut lolrgb = LolRgb::new(RecordingSink::default(), delay, &token);

    let outcome = embassy_futures::block_on(lolrgb.write_async("Cancel me"));
    assert_eq!(outcome, Ok(WriteOutcome::Cancelled));

    let (sink, delay) = lolrgb.release();
    assert_eq!(delay.pauses_ms.len(), 2);
    assert_eq!(sink.flushed.len(), 3);
    assert!(sink.flushed.last().is_some_and(Frame::is_blank));
}

#[test]
fn async_cancel_during_pause_wins_the_race() {
    let token = CancelToken::new();
    let mut lolrgb = LolRgb::new(RecordingSink::default(), CancelMidPause::new(&token), &token);

    let outcome = embassy_futures::block_on(lolrgb.write_async("WW"));
    assert_eq!(outcome, Ok(WriteOutcome::Cancelled));

    let (sink, delay) = lolrgb.release();
    // The pause started but was abandoned once the token fired.
    assert_eq!(delay.started, 1);
    assert_eq!(delay.finished, 0);
    // Frame 0, then the clearing flush.
    assert_eq!(sink.flushed.len(), 2);
    assert!(sink.flushed.last().is_some_and(Frame::is_blank));
}
