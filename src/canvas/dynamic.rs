use log::debug;

use crate::{
    canvas::FixedCanvas,
    color::{self, ColorMode, PixelFormat},
    encoder::EncoderOptions,
    error::{Error, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    fn right(&self) -> i64 {
        self.x as i64 + self.w as i64
    }

    fn bottom(&self) -> i64 {
        self.y as i64 + self.h as i64
    }
}

struct Layer {
    data: Vec<u8>,
    rect: Rect,
}

/// A canvas without fixed bounds: pushes may land anywhere, including at
/// negative coordinates, and the encoded image is the smallest rectangle
/// covering all of them.
pub struct DynamicCanvas {
    format: PixelFormat,
    layers: Vec<Layer>,
    options: EncoderOptions,
}

impl DynamicCanvas {
    pub fn new(mode: ColorMode) -> Result<Self> {
        Self::with_depth(mode, mode.default_depth())
    }

    pub fn with_depth(mode: ColorMode, depth: u8) -> Result<Self> {
        Ok(Self {
            format: color::resolve(mode, depth)?,
            layers: vec![],
            options: EncoderOptions::default(),
        })
    }

    pub fn with_options(mut self, options: EncoderOptions) -> Self {
        self.options = options;
        self
    }

    /// Stores a copy of a `w` x `h` sub-image placed at (`x`, `y`).
    pub fn push(&mut self, buffer: &[u8], x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        let rect = Rect { x, y, w, h };
        let max = i32::MAX as i64;
        if w == 0 || h == 0 || rect.right() > max || rect.bottom() > max {
            return Err(Error::InvalidDimensions {
                width: w.into(),
                height: h.into(),
            });
        }
        let expected = color::required_len(&self.format, w, h)?;
        if buffer.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: buffer.len(),
            });
        }
        self.layers.push(Layer {
            data: buffer.to_vec(),
            rect,
        });
        Ok(())
    }

    pub fn dimensions(&self) -> Option<Rect> {
        let first = self.layers.first()?.rect;
        let (mut left, mut top) = (first.x, first.y);
        let (mut right, mut bottom) = (first.right(), first.bottom());
        for layer in &self.layers[1..] {
            left = left.min(layer.rect.x);
            top = top.min(layer.rect.y);
            right = right.max(layer.rect.right());
            bottom = bottom.max(layer.rect.bottom());
        }
        Some(Rect {
            x: left,
            y: top,
            w: (right - left as i64) as u32,
            h: (bottom - top as i64) as u32,
        })
    }

    /// Replays every push, in order, onto a fixed canvas the size of
    /// [`dimensions`](Self::dimensions).
    pub fn compose(&self) -> Result<FixedCanvas> {
        let bounds = self
            .dimensions()
            .ok_or(Error::InvalidDimensions { width: 0, height: 0 })?;
        debug!(
            "composing {} layers into {}x{} at ({}, {})",
            self.layers.len(),
            bounds.w,
            bounds.h,
            bounds.x,
            bounds.y
        );
        let mut canvas =
            FixedCanvas::with_depth(bounds.w, bounds.h, self.format.mode, self.format.bit_depth)?
                .with_options(self.options);
        for layer in &self.layers {
            let Rect { x, y, w, h } = layer.rect;
            let offset_x = (x as i64 - bounds.x as i64) as u32;
            let offset_y = (y as i64 - bounds.y as i64) as u32;
            canvas.push(&layer.data, offset_x, offset_y, w, h)?;
        }
        Ok(canvas)
    }

    pub fn encode_blocking(&self) -> Result<Vec<u8>> {
        self.compose()?.encode_blocking()
    }

    pub fn encode_streaming<C, D, E>(&self, on_chunk: C, on_done: D, on_error: E)
    where
        C: FnMut(&[u8]),
        D: FnOnce(),
        E: FnOnce(Error),
    {
        match self.compose() {
            Ok(canvas) => canvas.encode_streaming(on_chunk, on_done, on_error),
            Err(e) => on_error(e),
        }
    }
}
