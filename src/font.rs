//! Packed 3×5 "Tom Thumb" font for ASCII 32-127.
//!
//! Glyphs are stored 16 to a page. Each page holds 5 font rows, and each font row packs
//! the 3-bit columns of all 16 glyphs MSB-first into 6 bytes (16 × 3 bits = 48 bits).
//! A page is therefore 30 bytes and the 96 glyphs take 180 bytes.
//!
//! ```rust
//! use lolrgb::font::{glyph_bit, glyph_code};
//!
//! // Top row of 'A' is `.#.`
//! assert!(!glyph_bit(u32::from(b'A'), 0, 0));
//! assert!(glyph_bit(u32::from(b'A'), 1, 0));
//!
//! // Control characters fall back to the hollow '0' rectangle.
//! assert_eq!(glyph_code('\n'), b'0');
//! ```

/// Width of a glyph in pixel columns.
pub const GLYPH_WIDTH: usize = 3;
/// Height of a glyph in pixel rows.
pub const GLYPH_HEIGHT: usize = 5;
/// Blank columns drawn after each glyph.
pub const GLYPH_SPACING: usize = 1;
/// Columns a character occupies when scrolled: the glyph plus its spacing.
pub const CELL_WIDTH: usize = GLYPH_WIDTH + GLYPH_SPACING;

/// Code of the space character. It occupies a cell but draws nothing.
pub const SPACE_CODE: u8 = 32;
/// Replacement for codes below [`SPACE_CODE`]: '0', drawn as a hollow rectangle.
pub const ZERO_CODE: u8 = 48;
/// Highest code in the font and the replacement for anything above it: a filled rectangle.
pub const DEL_CODE: u8 = 127;

const GLYPHS_PER_ROW: usize = 16;
const BYTES_PER_ROW: usize = 6;

#[rustfmt::skip]
const TOM_THUMB: [u8; 180] = [
    // 32-47
    0x0A, 0xD7, 0x12, 0x32, 0x80, 0x00,
    0x0A, 0xFC, 0x6A, 0x49, 0x20, 0x01,
    0x08, 0x56, 0x90, 0x4B, 0xF1, 0xC2,
    0x00, 0x7D, 0x28, 0x49, 0x24, 0x14,
    0x08, 0x54, 0x58, 0x32, 0x88, 0x10,
    // 48-63
    0xEB, 0xFB, 0xFF, 0xFC, 0x02, 0x27,
    0xA8, 0x9B, 0x21, 0xB5, 0x25, 0xD1,
    0xAB, 0xBF, 0xF9, 0xFC, 0x08, 0x0A,
    0xAA, 0x12, 0x69, 0xA5, 0x25, 0xD0,
    0xEB, 0xF3, 0xF9, 0xFC, 0x42, 0x22,
    // 64-79
    0x4B, 0x3D, 0xFB, 0xBC, 0xD9, 0x6A,
    0xB6, 0xCB, 0x24, 0xA8, 0xD9, 0xFD,
    0xFF, 0x4B, 0xFF, 0xE8, 0xE9, 0xFD,
    0x96, 0xCB, 0x25, 0xAA, 0xD9, 0x7D,
    0x77, 0x3D, 0xE3, 0xBD, 0x5F, 0x6A,
    // 80-95
    0xCB, 0x3F, 0x6D, 0xB7, 0xF1, 0xD0,
    0xB6, 0xC5, 0x6D, 0xB4, 0xC8, 0x68,
    0xD7, 0xA5, 0x6F, 0x49, 0x44, 0x40,
    0x9F, 0x15, 0x57, 0xAA, 0x42, 0x40,
    0x8E, 0xE4, 0xD5, 0xAB, 0xF1, 0xC7,
    // 96-111
    0x82, 0x02, 0x08, 0x88, 0x8C, 0x00,
    0x42, 0x02, 0xD3, 0x80, 0x44, 0x00,
    0x0F, 0x37, 0x7F, 0xC8, 0xD5, 0xF2,
    0x16, 0xCB, 0x91, 0xA8, 0xE5, 0xED,
    0x1F, 0x36, 0xD6, 0xAB, 0x5F, 0x6A,
    // 112-127
    0x00, 0x04, 0x00, 0x00, 0x35, 0x9F,
    0x4A, 0x3E, 0x00, 0x17, 0xA4, 0xB7,
    0xB7, 0xE5, 0x6D, 0xAD, 0xC0, 0x47,
    0xCE, 0x35, 0x7F, 0x47, 0x24, 0x87,
    0x86, 0x64, 0xD7, 0xBB, 0xB5, 0x87,
];

/// Clamp a code point into the font's range.
///
/// Codes below 32 become '0' (hollow rectangle); codes above 127 become DEL (filled rectangle).
#[must_use]
pub const fn clamp_code(code_point: u32) -> u8 {
    if code_point < SPACE_CODE as u32 {
        ZERO_CODE
    } else if code_point > DEL_CODE as u32 {
        DEL_CODE
    } else {
        code_point as u8
    }
}

/// The font code used to draw `character`.
#[must_use]
pub const fn glyph_code(character: char) -> u8 {
    clamp_code(character as u32)
}

/// Whether the pixel at (`column`, `row`) of the glyph for `ascii_code` is lit.
///
/// Out-of-range codes are clamped with [`clamp_code`]. Columns past [`GLYPH_WIDTH`] and rows
/// past [`GLYPH_HEIGHT`] are never lit.
#[must_use]
pub const fn glyph_bit(ascii_code: u32, column: usize, row: usize) -> bool {
    if column >= GLYPH_WIDTH || row >= GLYPH_HEIGHT {
        return false;
    }
    let font_position = (clamp_code(ascii_code) - SPACE_CODE) as usize;
    let font_col = font_position * GLYPH_WIDTH + column;
    // font_col already walks 6 bytes per page, the rest of the page is the 4 rows below it.
    let font_page = font_position / GLYPHS_PER_ROW;
    let byte_index = font_col / 8 + font_page * 4 * BYTES_PER_ROW + BYTES_PER_ROW * row;
    let shift = 7 - font_col % 8;
    (TOM_THUMB[byte_index] >> shift) & 1 == 1
}

/// One glyph column as a row mask: bit `row` is set when that pixel is lit.
#[must_use]
pub const fn glyph_column(ascii_code: u32, column: usize) -> u8 {
    let mut mask = 0_u8;
    let mut row = 0;
    while row < GLYPH_HEIGHT {
        if glyph_bit(ascii_code, column, row) {
            mask |= 1_u8 << row;
        }
        row += 1;
    }
    mask
}
