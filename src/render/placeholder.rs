//! Placeholder boards: a label rendered in a bitmap font on a translucent
//! dark card.
//!
//! Output depends only on `(label, accent)`. The glyphs come from the
//! built-in 8x8 table, so there is no ambient font state.

use font8x8::legacy::BASIC_LEGACY;

use crate::color::Rgba;
use crate::net::image::ImageData;

/// Glyph cell, in font pixels
const GLYPH: u32 = 8;
/// Each font pixel becomes a SCALE x SCALE block
const SCALE: u32 = 5;
/// Horizontal padding on each side
const PAD: u32 = 20;
/// Labels longer than this are cut and end in "..."
pub const MAX_LABEL_CHARS: usize = 40;

const BACKGROUND: [u8; 4] = [0, 0, 0, 166];

fn glyph_for_char(ch: char) -> [u8; 8] {
    let index = ch as usize;
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    }
}

fn visible_text(label: &str) -> Vec<char> {
    let label = label.trim();
    let chars: Vec<char> = if label.is_empty() {
        vec!['?']
    } else {
        label.chars().collect()
    };
    if chars.len() <= MAX_LABEL_CHARS {
        return chars;
    }
    let mut cut: Vec<char> = chars[..MAX_LABEL_CHARS - 3].to_vec();
    cut.extend("...".chars());
    cut
}

/// Image size for a label of `chars` characters.
pub fn label_size(chars: usize) -> (u32, u32) {
    let text_h = GLYPH * SCALE;
    let width = PAD * 2 + chars as u32 * GLYPH * SCALE;
    // Card is 1.8x the text height, as in a canvas label with a 48px font
    let height = (text_h as f32 * 1.8).ceil() as u32;
    (width, height)
}

/// Render `label` in `accent` on the card background.
pub fn synthesize(label: &str, accent: Rgba) -> ImageData {
    let text = visible_text(label);
    let (width, height) = label_size(text.len());
    let mut rgba: Vec<u8> = BACKGROUND
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();

    let fg = accent.to_array();
    let top = (height - GLYPH * SCALE) / 2;

    for (col, ch) in text.iter().enumerate() {
        let glyph = glyph_for_char(*ch);
        let left = PAD + col as u32 * GLYPH * SCALE;
        for (y_offset, bits) in glyph.iter().enumerate() {
            for x_bit in 0..GLYPH {
                if (bits >> x_bit) & 0x01 == 0 {
                    continue;
                }
                let x0 = left + x_bit * SCALE;
                let y0 = top + y_offset as u32 * SCALE;
                for y in y0..y0 + SCALE {
                    for x in x0..x0 + SCALE {
                        let idx = ((y * width + x) * 4) as usize;
                        rgba[idx..idx + 4].copy_from_slice(&fg);
                    }
                }
            }
        }
    }

    ImageData {
        width,
        height,
        rgba,
    }
}
