use std::borrow::Cow;

use super::WritableChunk;
use crate::color::PixelFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IHDRChunk {
    pub width: u32,
    pub height: u32,
    pub(crate) bit_depth: u8,
    pub(crate) color_type: ColorType,
    pub(crate) compression_method: u8,
    pub(crate) filter_method: u8,
    pub(crate) interlace_method: Interlacing,
}
impl IHDRChunk {
    pub(crate) fn new(width: u32, height: u32, format: &PixelFormat) -> Self {
        Self {
            width,
            height,
            bit_depth: format.bit_depth,
            color_type: format.color_type,
            compression_method: 0,
            filter_method: 0,
            interlace_method: Interlacing::None,
        }
    }
}
impl WritableChunk for IHDRChunk {
    const HEADER: &'static [u8; 4] = b"IHDR";

    fn payload(&self) -> Cow<'_, [u8]> {
        let mut bytes = Vec::with_capacity(13);
        bytes.extend(self.width.to_be_bytes());
        bytes.extend(self.height.to_be_bytes());
        bytes.extend([
            self.bit_depth,
            self.color_type as u8,
            self.compression_method,
            self.filter_method,
            self.interlace_method as u8,
        ]);
        Cow::Owned(bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorType {
    Greyscale = 0,
    Truecolor = 2,
    TruecolorWithAlpha = 6,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interlacing {
    #[default]
    None = 0,
}
