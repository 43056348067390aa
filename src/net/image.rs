//! Image decoding into RGBA pixel buffers.
//!
//! Logos arrive as arbitrary encoded bytes; the scene only deals in
//! straight RGBA8 buffers, capped to a sane size for a sign board.

/// Decoded image data (RGBA).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Logos wider than this are downscaled on decode.
pub const MAX_LOGO_WIDTH: u32 = 512;

impl ImageData {
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            rgba: img.into_raw(),
        }
    }

    /// Pixel at (x, y), clamped to the edges.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        let i = ((y * self.width + x) * 4) as usize;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }

    /// Nearest-neighbour sample at normalized (u, v), v = 0 at the top.
    pub fn sample(&self, u: f32, v: f32) -> [u8; 4] {
        if self.width == 0 || self.height == 0 {
            return [0, 0, 0, 0];
        }
        let x = (u.clamp(0.0, 1.0) * (self.width - 1) as f32).round() as u32;
        let y = (v.clamp(0.0, 1.0) * (self.height - 1) as f32).round() as u32;
        self.pixel(x, y)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Decode encoded image bytes (png / jpeg / gif / webp).
pub fn decode_image(bytes: &[u8]) -> Result<ImageData, image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();

    // Cap to reasonable size for a sign board
    if w > MAX_LOGO_WIDTH {
        let ratio = MAX_LOGO_WIDTH as f32 / w as f32;
        let new_h = ((h as f32 * ratio) as u32).max(1);
        let resized = image::imageops::resize(
            &rgba,
            MAX_LOGO_WIDTH,
            new_h,
            image::imageops::FilterType::Triangle,
        );
        return Ok(ImageData::from_rgba_image(resized));
    }

    Ok(ImageData::from_rgba_image(rgba))
}

/// Encode as PNG. Handy for fixtures and for dumping frames.
pub fn encode_png(data: &ImageData) -> Result<Vec<u8>, image::ImageError> {
    let mut out = std::io::Cursor::new(Vec::new());
    image::write_buffer_with_format(
        &mut out,
        &data.rgba,
        data.width,
        data.height,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )?;
    Ok(out.into_inner())
}
