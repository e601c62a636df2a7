//! # Camera Module
//!
//! Onboard camera selection and single-frame decoding.
//!
//! This module handles:
//! - The two fixed camera positions (horizontal and vertical)
//! - Raw frames as delivered by the video downlink
//! - Decoding the packed 16-bit bitstream into a 320×240 BGR image

pub mod decoder;

pub use decoder::{decode, DecodedImage, FRAME_CHANNELS, FRAME_HEIGHT, FRAME_WIDTH};

use bytes::Bytes;

/// Onboard cameras. The discriminant is the value sent to the vehicle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Camera {
    /// Front-facing camera (default).
    #[default]
    Horizontal = 0,
    /// Downward-facing camera.
    Vertical = 1,
}

impl Camera {
    /// The other camera.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Camera::Horizontal => Camera::Vertical,
            Camera::Vertical => Camera::Horizontal,
        }
    }

    #[must_use]
    pub fn id(self) -> u8 {
        self as u8
    }
}

/// Raw frame from the downlink, tagged with the size it was captured at.
///
/// Two bytes per pixel, low byte first. Rows are laid out with the
/// canonical 320-pixel pitch even when `width` is smaller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub data: Bytes,
    pub width: usize,
    pub height: usize,
}

impl RawFrame {
    pub fn new(data: impl Into<Bytes>, width: usize, height: usize) -> Self {
        Self {
            data: data.into(),
            width,
            height,
        }
    }

    /// Decode into a full-size image.
    pub fn decode(&self) -> crate::error::Result<DecodedImage> {
        decode(&self.data, self.width, self.height)
    }
}
