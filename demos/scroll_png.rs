#![cfg(feature = "host")]

// Host-only preview: writes a scroll and a composed still frame as PNG files.
//
//   cargo run --example scroll_png -- "Hello World" hello.png

use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};
use lolrgb::panel::{Frame, colors};
use lolrgb::scroll::{Boundary, SHORT_PAUSE, ScrollConfig};
use lolrgb::to_png::{write_frame_png, write_scroll_apng};
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let text = args.next().unwrap_or_else(|| "Hello World".to_owned());
    let output_path = args.next().map_or_else(|| PathBuf::from("scroll.png"), PathBuf::from);

    let mut config = ScrollConfig::new();
    config.set_color(&colors::RAINBOW)?;
    config.set_boundary(Boundary::Word);
    config.set_delay_ms(i32::try_from(SHORT_PAUSE)?)?;
    write_scroll_apng(text.as_str(), &config, &output_path, 600)?;
    println!("wrote APNG to {}", output_path.display());

    let border_path = output_path.with_file_name("border.png");
    write_frame_png(&build_border(), &border_path, 600)?;
    println!("wrote PNG to {}", border_path.display());
    Ok(())
}

fn build_border() -> Frame {
    let mut frame = Frame::new();
    Rectangle::new(Frame::TOP_LEFT, Frame::SIZE)
        .into_styled(PrimitiveStyle::with_stroke(Rgb888::new(0, 1, 1), 1))
        .draw(&mut frame)
        .expect("drawing into a frame cannot fail");
    frame[(0, 0)] = colors::MAGENTA;
    frame
}
