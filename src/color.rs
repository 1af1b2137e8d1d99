//! Resolution of color modes and bit depths to PNG pixel layouts.

use crate::{
    chunks::ihdr::ColorType,
    error::{Error, Result},
};

/// The pixel layouts accepted by the encoder.
///
/// `Rgba` is the default when a caller does not name a mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    Rgb,
    #[default]
    Rgba,
    Gray,
    /// One byte per input pixel, zero for black and anything else for white.
    /// Written as 1-bit grayscale.
    BlackWhite,
}

impl ColorMode {
    pub fn default_depth(self) -> u8 {
        match self {
            Self::Rgb | Self::Rgba | Self::Gray => 8,
            Self::BlackWhite => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub mode: ColorMode,
    pub bit_depth: u8,
    pub color_type: ColorType,
    pub channel_count: u8,
    pub bytes_per_pixel: usize,
}

impl PixelFormat {
    /// Lookback distance for the scanline filters, in bytes of the packed row.
    pub fn filter_stride(&self) -> usize {
        let sample_width = u8::max(self.bit_depth / 8, 1);
        (self.channel_count * sample_width) as usize
    }

    /// Packed scanline length without the leading filter byte.
    pub fn scanline_len(&self, width: u32) -> usize {
        let bits = width as usize * self.channel_count as usize * self.bit_depth as usize;
        bits.div_ceil(8)
    }

    /// Bytes a caller must supply for a `width` x `height` image, or `None`
    /// when that does not fit in `usize`.
    pub fn buffer_len(&self, width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(self.bytes_per_pixel)
    }
}

pub fn resolve(mode: ColorMode, depth: u8) -> Result<PixelFormat> {
    let (color_type, channel_count, bytes_per_pixel) = match (mode, depth) {
        (ColorMode::Rgb, 8) => (ColorType::Truecolor, 3, 3),
        (ColorMode::Rgba, 8) => (ColorType::TruecolorWithAlpha, 4, 4),
        (ColorMode::Gray, 8) => (ColorType::Greyscale, 1, 1),
        (ColorMode::Gray, 16) => (ColorType::Greyscale, 1, 2),
        (ColorMode::BlackWhite, 1) => (ColorType::Greyscale, 1, 1),
        _ => return Err(Error::UnsupportedMode { mode, depth }),
    };
    Ok(PixelFormat {
        mode,
        bit_depth: depth,
        color_type,
        channel_count,
        bytes_per_pixel,
    })
}

/// PNG allows 1 to 2^31 - 1 pixels on each axis.
pub fn check_dimensions(width: u32, height: u32) -> Result<()> {
    let valid = 1..=i32::MAX as u32;
    if !valid.contains(&width) || !valid.contains(&height) {
        return Err(Error::InvalidDimensions {
            width: width.into(),
            height: height.into(),
        });
    }
    Ok(())
}

pub(crate) fn required_len(format: &PixelFormat, width: u32, height: u32) -> Result<usize> {
    format
        .buffer_len(width, height)
        .ok_or(Error::InvalidDimensions {
            width: width.into(),
            height: height.into(),
        })
}

pub fn validate(
    buffer: &[u8],
    width: u32,
    height: u32,
    mode: ColorMode,
    depth: u8,
) -> Result<PixelFormat> {
    let format = resolve(mode, depth)?;
    let expected = required_len(&format, width, height)?;
    if buffer.len() != expected {
        return Err(Error::BufferSizeMismatch {
            expected,
            actual: buffer.len(),
        });
    }
    Ok(format)
}
