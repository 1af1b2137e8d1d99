use std::borrow::Cow;

use crate::color::{ColorMode, PixelFormat};

/// Walks a validated pixel buffer top to bottom, yielding each row in the
/// packed layout PNG stores (without the filter byte).
///
/// Rows that are already byte aligned are borrowed straight from the buffer;
/// black/white rows are packed eight pixels to a byte.
pub(crate) struct Scanlines<'a> {
    rows: std::slice::ChunksExact<'a, u8>,
    mode: ColorMode,
}
impl<'a> Scanlines<'a> {
    /// `image_data` must hold `height` rows of `width` non-zero pixels.
    pub(crate) fn new(image_data: &'a [u8], width: u32, format: &PixelFormat) -> Self {
        Self {
            rows: image_data.chunks_exact(width as usize * format.bytes_per_pixel),
            mode: format.mode,
        }
    }
}
impl<'a> Iterator for Scanlines<'a> {
    type Item = Cow<'a, [u8]>;
    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        Some(match self.mode {
            ColorMode::BlackWhite => Cow::Owned(pack_bits(row)),
            ColorMode::Rgb | ColorMode::Rgba | ColorMode::Gray => Cow::Borrowed(row),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

/// Most significant bit first; the tail of the last byte stays zero.
fn pack_bits(row: &[u8]) -> Vec<u8> {
    let mut packed = vec![0; row.len().div_ceil(8)];
    for (i, &pixel) in row.iter().enumerate() {
        if pixel != 0 {
            packed[i / 8] |= 0x80 >> (i % 8);
        }
    }
    packed
}
