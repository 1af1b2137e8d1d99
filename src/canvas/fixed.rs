use log::trace;

use crate::{
    color::{self, ColorMode, PixelFormat},
    encoder::{EncodeSession, Encoder, EncoderOptions},
    error::{Error, Result},
};

/// A zero-filled image of fixed size that sub-images are copied into.
///
/// Regions no push has covered stay zero. Pushes overwrite whatever was there
/// before; nothing is blended.
#[derive(Debug, Clone)]
pub struct FixedCanvas {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
    options: EncoderOptions,
}

impl FixedCanvas {
    pub fn new(width: u32, height: u32, mode: ColorMode) -> Result<Self> {
        Self::with_depth(width, height, mode, mode.default_depth())
    }

    pub fn with_depth(width: u32, height: u32, mode: ColorMode, depth: u8) -> Result<Self> {
        color::check_dimensions(width, height)?;
        let format = color::resolve(mode, depth)?;
        let len = color::required_len(&format, width, height)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::AllocationFailure { bytes: len })?;
        data.resize(len, 0);
        Ok(Self {
            width,
            height,
            format,
            data,
            options: EncoderOptions::default(),
        })
    }

    pub fn with_options(mut self, options: EncoderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> &PixelFormat {
        &self.format
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Copies a `w` x `h` sub-image into the canvas with its top-left corner
    /// at (`x`, `y`). A rejected push leaves the canvas untouched.
    pub fn push(&mut self, buffer: &[u8], x: u32, y: u32, w: u32, h: u32) -> Result<()> {
        let fits = |start: u32, len: u32, limit: u32| {
            start.checked_add(len).is_some_and(|end| end <= limit)
        };
        if !fits(x, w, self.width) || !fits(y, h, self.height) {
            return Err(Error::BoundsError {
                x,
                y,
                w,
                h,
                width: self.width,
                height: self.height,
            });
        }
        let expected = color::required_len(&self.format, w, h)?;
        if buffer.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: buffer.len(),
            });
        }
        if expected == 0 {
            return Ok(());
        }

        let bpp = self.format.bytes_per_pixel;
        let src_stride = w as usize * bpp;
        let dst_stride = self.width as usize * bpp;
        for (i, row) in buffer.chunks_exact(src_stride).enumerate() {
            let start = (y as usize + i) * dst_stride + x as usize * bpp;
            self.data[start..start + src_stride].copy_from_slice(row);
        }
        trace!("pushed {w}x{h} at ({x}, {y})");
        Ok(())
    }

    pub fn encoder(&self) -> Encoder<'_> {
        Encoder::new(
            &self.data,
            self.width,
            self.height,
            self.format.mode,
            self.format.bit_depth,
        )
        .with_options(self.options)
    }

    pub fn stream(&self) -> EncodeSession<'_> {
        self.encoder().stream()
    }

    pub fn encode_blocking(&self) -> Result<Vec<u8>> {
        self.encoder().encode_blocking()
    }

    pub fn encode_streaming<C, D, E>(&self, on_chunk: C, on_done: D, on_error: E)
    where
        C: FnMut(&[u8]),
        D: FnOnce(),
        E: FnOnce(Error),
    {
        self.encoder().encode_streaming(on_chunk, on_done, on_error)
    }
}
