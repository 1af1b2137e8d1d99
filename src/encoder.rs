//! The encode pipeline: validate, pack and filter rows, compress, frame.
//!
//! [`EncodeSession`] is the state machine; the blocking, callback and
//! iterator APIs on [`Encoder`] all drive one of these, so they produce the
//! same bytes.

use std::{borrow::Cow, mem};

use log::{debug, trace};

use crate::{
    chunks::{idat::IDATChunk, iend::IENDChunk, ihdr::IHDRChunk, WritableChunk, SIGNATURE},
    color::{self, ColorMode},
    compress::{self, StreamCompressor},
    error::{Error, Result},
    filters::{FilterPolicy, ScanlineFilter},
    scanlines::Scanlines,
};

pub const DEFAULT_MAX_IDAT_SIZE: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderOptions {
    /// 0 (stored) to 10 (slowest, smallest).
    pub compression_level: u8,
    pub filter_policy: FilterPolicy,
    /// Largest IDAT payload emitted; bigger streams are split.
    pub max_idat_size: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            compression_level: compress::DEFAULT_LEVEL,
            filter_policy: FilterPolicy::default(),
            max_idat_size: DEFAULT_MAX_IDAT_SIZE,
        }
    }
}

impl EncoderOptions {
    pub fn compression_level(mut self, level: u8) -> Self {
        self.compression_level = level;
        self
    }

    pub fn filter_policy(mut self, policy: FilterPolicy) -> Self {
        self.filter_policy = policy;
        self
    }

    pub fn max_idat_size(mut self, size: usize) -> Self {
        self.max_idat_size = size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        compress::check_level(self.compression_level)?;
        if self.max_idat_size == 0 || self.max_idat_size > i32::MAX as usize {
            return Err(Error::InvalidOptions(
                "max IDAT size must be between 1 and 2^31 - 1",
            ));
        }
        Ok(())
    }
}

/// A borrowed pixel buffer plus everything needed to encode it.
///
/// Nothing is checked until an encode starts.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
    buffer: &'a [u8],
    width: u32,
    height: u32,
    mode: ColorMode,
    depth: u8,
    options: EncoderOptions,
}

impl<'a> Encoder<'a> {
    pub fn new(buffer: &'a [u8], width: u32, height: u32, mode: ColorMode, depth: u8) -> Self {
        Self {
            buffer,
            width,
            height,
            mode,
            depth,
            options: EncoderOptions::default(),
        }
    }

    /// 8-bit RGBA, the layout used when no mode is specified.
    pub fn rgba(buffer: &'a [u8], width: u32, height: u32) -> Self {
        let mode = ColorMode::default();
        Self::new(buffer, width, height, mode, mode.default_depth())
    }

    pub fn with_options(mut self, options: EncoderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Starts an encode whose output is pulled block by block. Dropping the
    /// session abandons the encode.
    pub fn stream(&self) -> EncodeSession<'a> {
        EncodeSession {
            encoder: *self,
            stage: Stage::Idle,
            emitted: 0,
        }
    }

    pub fn encode_blocking(&self) -> Result<Vec<u8>> {
        let mut png = vec![];
        for block in self.stream() {
            png.extend(block?);
        }
        Ok(png)
    }

    /// Hands each output block to `on_chunk` as soon as it is produced, then
    /// calls exactly one of `on_done` or `on_error`.
    pub fn encode_streaming<C, D, E>(&self, mut on_chunk: C, on_done: D, on_error: E)
    where
        C: FnMut(&[u8]),
        D: FnOnce(),
        E: FnOnce(Error),
    {
        for block in self.stream() {
            match block {
                Ok(bytes) => on_chunk(&bytes),
                Err(e) => return on_error(e),
            }
        }
        on_done()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// Reached through [`EncodeSession::validate`]; pulling the first block
    /// validates and moves on in one go.
    Validating,
    Compressing,
    Emitting,
    Done,
    Failed,
}

enum Stage<'a> {
    Idle,
    Validating(Box<Pipeline<'a>>, Vec<u8>),
    Compressing(Box<Pipeline<'a>>),
    Emitting(Box<Pipeline<'a>>),
    Done,
    Failed,
}

struct Pipeline<'a> {
    rows: Scanlines<'a>,
    prev: Cow<'a, [u8]>,
    filter: ScanlineFilter,
    compressor: StreamCompressor,
}

impl<'a> Pipeline<'a> {
    fn start(encoder: &Encoder<'a>) -> Result<(Self, Vec<u8>)> {
        encoder.options.validate()?;
        color::check_dimensions(encoder.width, encoder.height)?;
        let format = color::validate(
            encoder.buffer,
            encoder.width,
            encoder.height,
            encoder.mode,
            encoder.depth,
        )?;
        debug!(
            "encoding {}x{} {:?}/{} with {:?}",
            encoder.width, encoder.height, encoder.mode, encoder.depth, encoder.options
        );

        let mut block = SIGNATURE.to_vec();
        IHDRChunk::new(encoder.width, encoder.height, &format).write_to(&mut block);

        let row_len = format.scanline_len(encoder.width);
        let pipeline = Self {
            rows: Scanlines::new(encoder.buffer, encoder.width, &format),
            prev: Cow::Owned(vec![0; row_len]),
            filter: ScanlineFilter::new(
                encoder.options.filter_policy,
                format.filter_stride(),
                row_len,
            ),
            compressor: StreamCompressor::new(encoder.options.compression_level)?,
        };
        Ok((pipeline, block))
    }

    fn compress_next_row(&mut self) -> Result<bool> {
        let Some(row) = self.rows.next() else {
            return Ok(false);
        };
        let filtered = self.filter.apply(&row, &self.prev);
        self.compressor.write(filtered)?;
        self.prev = row;
        Ok(true)
    }
}

fn idat_block(data: &[u8]) -> Vec<u8> {
    trace!("emitting IDAT with {} bytes", data.len());
    IDATChunk { data }.to_bytes()
}

/// One in-flight encode. Each item is a block of PNG bytes; concatenated in
/// order they form the whole file. An error is yielded at most once, after
/// which the session is finished.
pub struct EncodeSession<'a> {
    encoder: Encoder<'a>,
    stage: Stage<'a>,
    emitted: usize,
}

impl EncodeSession<'_> {
    pub fn state(&self) -> SessionState {
        match self.stage {
            Stage::Idle => SessionState::Idle,
            Stage::Validating(..) => SessionState::Validating,
            Stage::Compressing(_) => SessionState::Compressing,
            Stage::Emitting(_) => SessionState::Emitting,
            Stage::Done => SessionState::Done,
            Stage::Failed => SessionState::Failed,
        }
    }

    pub fn bytes_emitted(&self) -> usize {
        self.emitted
    }

    /// Checks the input without emitting anything. On success the session
    /// sits in [`SessionState::Validating`] until the first block is pulled;
    /// on failure it is finished and yields nothing more. Does nothing once
    /// the session has left `Idle`.
    pub fn validate(&mut self) -> Result<()> {
        if !matches!(self.stage, Stage::Idle) {
            return Ok(());
        }
        match Pipeline::start(&self.encoder) {
            Ok((pipeline, header)) => {
                self.stage = Stage::Validating(Box::new(pipeline), header);
                Ok(())
            }
            Err(e) => {
                debug!("encode rejected: {e}");
                self.stage = Stage::Failed;
                Err(e)
            }
        }
    }

    fn step(&mut self) -> Result<Option<Vec<u8>>> {
        let max_idat_size = self.encoder.options.max_idat_size;
        loop {
            match &mut self.stage {
                Stage::Idle => self.validate()?,
                Stage::Validating(..) => {
                    if let Stage::Validating(pipeline, header) =
                        mem::replace(&mut self.stage, Stage::Failed)
                    {
                        self.stage = Stage::Compressing(pipeline);
                        return Ok(Some(header));
                    }
                }
                Stage::Compressing(pipeline) => {
                    if let Some(burst) = pipeline.compressor.take_burst(max_idat_size) {
                        return Ok(Some(idat_block(&burst)));
                    }
                    if !pipeline.compress_next_row()? {
                        pipeline.compressor.finish()?;
                        pipeline.filter.log_stats();
                        self.stage = match mem::replace(&mut self.stage, Stage::Failed) {
                            Stage::Compressing(pipeline) => Stage::Emitting(pipeline),
                            other => other,
                        };
                    }
                }
                Stage::Emitting(pipeline) => {
                    if let Some(burst) = pipeline.compressor.take_remaining(max_idat_size) {
                        return Ok(Some(idat_block(&burst)));
                    }
                    self.stage = Stage::Done;
                    return Ok(Some(IENDChunk.to_bytes()));
                }
                Stage::Done | Stage::Failed => return Ok(None),
            }
        }
    }
}

impl Iterator for EncodeSession<'_> {
    type Item = Result<Vec<u8>>;
    fn next(&mut self) -> Option<Self::Item> {
        let block = self.step().transpose()?;
        match &block {
            Ok(bytes) => {
                self.emitted += bytes.len();
                if matches!(self.stage, Stage::Done) {
                    debug!("encode finished after {} bytes", self.emitted);
                }
            }
            Err(e) => {
                debug!("encode failed after {} bytes: {e}", self.emitted);
                self.stage = Stage::Failed;
            }
        }
        Some(block)
    }
}
