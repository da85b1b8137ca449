use std::path::Path;

use crate::foundation::core::Canvas;
use crate::foundation::error::{InkError, InkResult};
use crate::foundation::math::mul_div255_u8;

/// A rendered frame as RGBA8 pixels.
///
/// Reveal frames are **premultiplied alpha**. The `premultiplied` flag keeps this explicit at
/// API boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA of the pixel at `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data
            .get(i..i + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// Number of pixels with non-zero alpha.
    pub fn covered_pixels(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] != 0).count()
    }
}

/// The fully rendered glyph that the reveal mask uncovers, as premultiplied RGBA8.
///
/// Rendering the glyph itself (font rasterization) happens elsewhere; this only holds pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl GlyphImage {
    /// Wrap straight-alpha RGBA8 pixels, premultiplying them.
    pub fn from_straight_rgba(width: u32, height: u32, mut data: Vec<u8>) -> InkResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if width == 0 || height == 0 || data.len() != expected {
            return Err(InkError::playback(format!(
                "glyph image {width}x{height} expects {expected} bytes, got {}",
                data.len()
            )));
        }
        premultiply_rgba8_in_place(&mut data);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Take pixels from a decoded image.
    pub fn from_image(img: &image::RgbaImage) -> InkResult<Self> {
        Self::from_straight_rgba(img.width(), img.height(), img.as_raw().clone())
    }

    /// Decode an image file (PNG) into a glyph image.
    #[tracing::instrument]
    pub fn open(path: &Path) -> InkResult<Self> {
        let img = image::open(path)
            .map_err(|e| InkError::io(format!("failed to decode '{}': {e}", path.display())))?;
        Self::from_image(&img.to_rgba8())
    }

    /// A canvas-sized image of one straight-alpha color.
    pub fn solid(canvas: Canvas, rgba: [u8; 4]) -> Self {
        let [r, g, b, a] = rgba;
        let a16 = u16::from(a);
        let px = [
            mul_div255_u8(u16::from(r), a16),
            mul_div255_u8(u16::from(g), a16),
            mul_div255_u8(u16::from(b), a16),
            a,
        ];
        let n = (canvas.width as usize) * (canvas.height as usize);
        Self {
            width: canvas.width,
            height: canvas.height,
            data: px.repeat(n),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether the image matches `canvas` exactly.
    pub fn fits(&self, canvas: Canvas) -> bool {
        self.width == canvas.width && self.height == canvas.height
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        px[0] = mul_div255_u8(u16::from(px[0]), a);
        px[1] = mul_div255_u8(u16::from(px[1]), a);
        px[2] = mul_div255_u8(u16::from(px[2]), a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
