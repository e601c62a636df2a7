//! # Frame Decoder
//!
//! Decodes the onboard camera's packed 16-bit bitstream into a fixed
//! 320×240 image with three bytes per pixel in blue, green, red order.
//!
//! ## Pixel Unpacking
//!
//! Each source pixel is two bytes, low byte first:
//!
//! ```text
//! hi: RRRRRGGG   lo: GGGBBBBB
//!
//! red   = hi & 0xF8                          (5 bits, left in bits 3-7)
//! green = (hi & 0x07) * 32 + (lo & 0xE0) / 8
//! blue  = (lo & 0x1F) * 8
//! ```
//!
//! The green channel keeps the vehicle's own bit placement rather than a
//! textbook RGB565 expansion. Output must match byte for byte, so do not
//! "fix" it.
//!
//! ## Smaller Frames
//!
//! Frames narrower than 320 pixels are placed 58 rows down and 78 columns in,
//! leaving the border black. Source rows keep the 320-pixel pitch.

use crate::error::{PilotError, Result};

/// Output frame width in pixels
pub const FRAME_WIDTH: usize = 320;

/// Output frame height in pixels
pub const FRAME_HEIGHT: usize = 240;

/// Bytes per output pixel
pub const FRAME_CHANNELS: usize = 3;

/// Output buffer size in bytes
pub const FRAME_SIZE: usize = FRAME_WIDTH * FRAME_HEIGHT * FRAME_CHANNELS;

/// Rows between the top of the output and a smaller frame
pub const ROW_OFFSET: usize = 58;

/// Columns between the left of the output and a smaller frame
pub const COLUMN_OFFSET: usize = 78;

/// Bytes per packed source pixel
const SOURCE_BYTES_PER_PIXEL: usize = 2;

/// Decoded 320×240 BGR image
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pixels: Vec<u8>,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &FRAME_WIDTH)
            .field("height", &FRAME_HEIGHT)
            .finish_non_exhaustive()
    }
}

impl DecodedImage {
    fn black() -> Self {
        Self {
            pixels: vec![0; FRAME_SIZE],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        FRAME_WIDTH
    }

    #[must_use]
    pub fn height(&self) -> usize {
        FRAME_HEIGHT
    }

    /// Pixel at column `x`, row `y` as `[blue, green, red]`.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= FRAME_WIDTH || y >= FRAME_HEIGHT {
            return None;
        }
        let i = (y * FRAME_WIDTH + x) * FRAME_CHANNELS;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Row-major BGR bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }
}

/// Decode a raw camera frame
///
/// # Arguments
///
/// * `data` - Packed source bytes
/// * `width` - Reported frame width in pixels
/// * `height` - Reported frame height in pixels
///
/// # Returns
///
/// * `Result<DecodedImage>` - Newly allocated 320×240 BGR image
///
/// # Errors
///
/// Returns `Decode` if:
/// - Width is 320 but height is not 240
/// - A smaller frame would not fit at the centering offset
/// - The buffer is shorter than the pixels the placement reads
///
/// # Examples
///
/// ```
/// use ardrone_pilot::camera::decode;
///
/// let raw = vec![0xFFu8; 320 * 240 * 2];
/// let image = decode(&raw, 320, 240).unwrap();
/// assert_eq!(image.pixel(0, 0), Some([0xF8, 0xFC, 0xF8]));
/// ```
pub fn decode(data: &[u8], width: usize, height: usize) -> Result<DecodedImage> {
    let mut image = DecodedImage::black();

    if width == FRAME_WIDTH {
        if height != FRAME_HEIGHT {
            return Err(PilotError::Decode(format!(
                "full-width frame must be {}x{}, got {}x{}",
                FRAME_WIDTH, FRAME_HEIGHT, width, height
            )));
        }

        let needed = FRAME_WIDTH * FRAME_HEIGHT * SOURCE_BYTES_PER_PIXEL;
        check_length(data, needed)?;

        for (src, dst) in data[..needed]
            .chunks_exact(SOURCE_BYTES_PER_PIXEL)
            .zip(image.pixels.chunks_exact_mut(FRAME_CHANNELS))
        {
            dst.copy_from_slice(&unpack_bgr(src[0], src[1]));
        }

        return Ok(image);
    }

    if width > FRAME_WIDTH - COLUMN_OFFSET || height > FRAME_HEIGHT - ROW_OFFSET {
        return Err(PilotError::Decode(format!(
            "{}x{} frame does not fit at offset ({}, {}) in a {}x{} image",
            width, height, COLUMN_OFFSET, ROW_OFFSET, FRAME_WIDTH, FRAME_HEIGHT
        )));
    }

    if width == 0 || height == 0 {
        return Ok(image);
    }

    let needed = ((height - 1) * FRAME_WIDTH + width) * SOURCE_BYTES_PER_PIXEL;
    check_length(data, needed)?;

    for row in 0..height {
        for col in 0..width {
            let src = (row * FRAME_WIDTH + col) * SOURCE_BYTES_PER_PIXEL;
            let dst = ((row + ROW_OFFSET) * FRAME_WIDTH + col + COLUMN_OFFSET) * FRAME_CHANNELS;
            image.pixels[dst..dst + FRAME_CHANNELS]
                .copy_from_slice(&unpack_bgr(data[src], data[src + 1]));
        }
    }

    Ok(image)
}

/// Unpack one source pixel to `[blue, green, red]`.
#[inline]
fn unpack_bgr(lo: u8, hi: u8) -> [u8; 3] {
    let red = hi & 0xF8;
    let green = ((hi & 0x07) << 5) + ((lo & 0xE0) >> 3);
    let blue = (lo & 0x1F) << 3;
    [blue, green, red]
}

fn check_length(data: &[u8], needed: usize) -> Result<()> {
    if data.len() < needed {
        return Err(PilotError::Decode(format!(
            "frame buffer too short: expected at least {} bytes, got {}",
            needed,
            data.len()
        )));
    }
    Ok(())
}
