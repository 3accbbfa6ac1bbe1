//! PNG and APNG previews of panel frames (host only).
//!
//! Each LED is drawn as a round cell with a soft edge. The shield's palette uses channel
//! values of 0 and 1, far too dim to see in an image, so every channel is multiplied by a
//! preview scale (255 by default) before encoding.
#![cfg(feature = "host")]

use crate::panel::Frame2d;
use crate::scroll::{Scroll, ScrollConfig, Text};
use png::{BitDepth, ColorType, Encoder, ScaledFloat};
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Default multiplier applied to each channel before encoding.
pub const PREVIEW_SCALE: u16 = 255;

/// Render a `Frame2d` into a PNG file sized to the requested maximum dimension.
///
/// # Errors
///
/// Returns any I/O or encoding error.
pub fn write_frame_png<const W: usize, const H: usize>(
    frame: &Frame2d<W, H>,
    output_path: impl AsRef<Path>,
    target_max_dimension: u32,
) -> Result<(), Box<dyn Error>> {
    write_frame_png_with_scale(frame, output_path, target_max_dimension, PREVIEW_SCALE)
}

/// Render a `Frame2d` into a PNG file with a custom preview scale.
///
/// # Errors
///
/// Returns any I/O or encoding error.
pub fn write_frame_png_with_scale<const W: usize, const H: usize>(
    frame: &Frame2d<W, H>,
    output_path: impl AsRef<Path>,
    target_max_dimension: u32,
    preview_scale: u16,
) -> Result<(), Box<dyn Error>> {
    let output_path = output_path.as_ref();
    let cell_size = select_cell_size(W as u32, H as u32, target_max_dimension);
    let (width, height, pixels) = panel_pixels(frame, cell_size, preview_scale);

    let mut encoder = Encoder::new(create_output(output_path)?, width, height);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Sixteen);
    encoder.set_source_gamma(ScaledFloat::new(1.0));
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&pixels)?;
    writer.finish()?;
    Ok(())
}

/// Render multiple `Frame2d` values into a looping APNG file.
///
/// A `frame_delay_ms` of 0 is shown as fast as the viewer allows.
///
/// # Errors
///
/// Returns an error if `frames` is empty, if `frame_delay_ms` exceeds `u16::MAX`, or on any
/// I/O or encoding error.
pub fn write_frames_apng<const W: usize, const H: usize>(
    frames: &[Frame2d<W, H>],
    output_path: impl AsRef<Path>,
    target_max_dimension: u32,
    frame_delay_ms: u32,
) -> Result<(), Box<dyn Error>> {
    if frames.is_empty() {
        return Err("frames must not be empty".into());
    }
    let output_path = output_path.as_ref();
    let cell_size = select_cell_size(W as u32, H as u32, target_max_dimension);
    let frame_count = u32::try_from(frames.len())?;
    let delay_num = u16::try_from(frame_delay_ms)?;

    let mut encoded = frames
        .iter()
        .map(|frame| panel_pixels(frame, cell_size, PREVIEW_SCALE));
    let Some((width, height, first_pixels)) = encoded.next() else {
        return Err("frames must not be empty".into());
    };

    let mut encoder = Encoder::new(create_output(output_path)?, width, height);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Sixteen);
    encoder.set_source_gamma(ScaledFloat::new(1.0));
    encoder.set_animated(frame_count, 0)?;
    let mut writer = encoder.write_header()?;
    writer.set_frame_delay(delay_num, 1000)?;
    writer.write_image_data(&first_pixels)?;
    for (_, _, frame_pixels) in encoded {
        writer.set_frame_delay(delay_num, 1000)?;
        writer.write_image_data(&frame_pixels)?;
    }
    writer.finish()?;
    Ok(())
}

/// Render a whole scroll of `text` with `config`'s color, boundary and delay into a looping
/// APNG file.
///
/// # Errors
///
/// Returns [`crate::Error::TypeMismatch`] for bytes that are not UTF-8, or any error from
/// [`write_frames_apng`].
pub fn write_scroll_apng<'t>(
    text: impl Into<Text<'t>>,
    config: &ScrollConfig<'_>,
    output_path: impl AsRef<Path>,
    target_max_dimension: u32,
) -> Result<(), Box<dyn Error>> {
    let text = text.into().resolve()?;
    let scroll = Scroll::new(&text, config.color(), config.boundary());
    let frames: Vec<_> = scroll.frames().collect();
    write_frames_apng(&frames, output_path, target_max_dimension, config.delay_ms())
}

fn create_output(output_path: &Path) -> Result<BufWriter<File>, Box<dyn Error>> {
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(output_path)?))
}

// Largest cell whose image, including a border of one LED radius, fits the target.
fn select_cell_size(panel_width: u32, panel_height: u32, target_max_dimension: u32) -> u32 {
    let mut cell_size = target_max_dimension.max(4);
    while cell_size > 4 {
        let led_radius = led_radius(cell_size);
        let output_width = panel_width * cell_size + led_radius * 2;
        let output_height = panel_height * cell_size + led_radius * 2;
        if output_width.max(output_height) <= target_max_dimension {
            break;
        }
        cell_size -= 1;
    }
    cell_size
}

fn led_radius(cell_size: u32) -> u32 {
    let led_margin = (cell_size / 8).max(1);
    ((cell_size - led_margin * 2) / 2).max(1)
}

fn panel_pixels<const W: usize, const H: usize>(
    frame: &Frame2d<W, H>,
    cell_size: u32,
    preview_scale: u16,
) -> (u32, u32, Vec<u8>) {
    let led_radius = led_radius(cell_size);
    let fade_width = (led_radius / 3).max(1);
    let border = led_radius;
    let width = (W as u32) * cell_size + border * 2;
    let height = (H as u32) * cell_size + border * 2;
    let mut bytes = vec![0u8; (width * height * 3 * 2) as usize];
    let center = (cell_size - 1) as i32 / 2;
    let led_radius_f = led_radius as f32;
    let inner_radius_f = led_radius.saturating_sub(fade_width) as f32;
    let radius_sq = (led_radius as i32) * (led_radius as i32);

    for (row_index, row) in frame.0.iter().enumerate() {
        for (column_index, pixel) in row.iter().enumerate() {
            let channels = [pixel.r, pixel.g, pixel.b].map(|channel| scaled(channel, preview_scale));
            let cell_origin_x = (column_index as u32) * cell_size;
            let cell_origin_y = (row_index as u32) * cell_size;

            for local_y in 0..cell_size {
                let delta_y = local_y as i32 - center;
                for local_x in 0..cell_size {
                    let delta_x = local_x as i32 - center;
                    let distance_sq = delta_x * delta_x + delta_y * delta_y;
                    if distance_sq > radius_sq {
                        continue;
                    }
                    let distance = (distance_sq as f32).sqrt();
                    let intensity = if distance <= inner_radius_f {
                        1.0
                    } else {
                        let fade_span = led_radius_f - inner_radius_f;
                        (1.0 - (distance - inner_radius_f) / fade_span).max(0.0)
                    };
                    let x = border + cell_origin_x + local_x;
                    let y = border + cell_origin_y + local_y;
                    let pixel_index = ((y * width + x) * 3 * 2) as usize;
                    for (offset, channel) in channels.iter().enumerate() {
                        let value = linear_to_u16(channel * intensity).to_be_bytes();
                        bytes[pixel_index + offset * 2..pixel_index + offset * 2 + 2]
                            .copy_from_slice(&value);
                    }
                }
            }
        }
    }

    (width, height, bytes)
}

fn scaled(channel: u8, preview_scale: u16) -> f32 {
    let boosted = u32::from(channel) * u32::from(preview_scale);
    (boosted.min(255) as f32) / 255.0
}

fn linear_to_u16(value: f32) -> u16 {
    let clamped = value.clamp(0.0, 1.0);
    (clamped * 65535.0).round() as u16
}
