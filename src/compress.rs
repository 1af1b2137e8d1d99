//! Zlib-framed deflate over the filtered scanline stream.

use miniz_oxide::{
    deflate::{
        compress_to_vec_zlib,
        core::{create_comp_flags_from_zip_params, CompressorOxide},
        stream::deflate,
    },
    MZFlush, MZStatus,
};

use crate::error::{Error, Result};

pub const DEFAULT_LEVEL: u8 = 6;
pub const MAX_LEVEL: u8 = 10;

const OUTPUT_BUFFER_SIZE: usize = 16 * 1024;
const ZLIB_WINDOW_BITS: i32 = 15;

pub(crate) fn check_level(level: u8) -> Result<()> {
    if level > MAX_LEVEL {
        return Err(Error::InvalidOptions("compression level must be 0..=10"));
    }
    Ok(())
}

pub fn compress(data: &[u8], level: u8) -> Result<Vec<u8>> {
    check_level(level)?;
    Ok(compress_to_vec_zlib(data, level))
}

/// Incremental compressor. Output accumulates until the caller takes it in
/// bursts.
pub struct StreamCompressor {
    inner: Box<CompressorOxide>,
    buffer: Vec<u8>,
    pending: Vec<u8>,
    finished: bool,
}

impl StreamCompressor {
    pub fn new(level: u8) -> Result<Self> {
        check_level(level)?;
        let flags = create_comp_flags_from_zip_params(level.into(), ZLIB_WINDOW_BITS, 0);
        Ok(Self {
            inner: Box::new(CompressorOxide::new(flags)),
            buffer: vec![0; OUTPUT_BUFFER_SIZE],
            pending: vec![],
            finished: false,
        })
    }

    pub fn write(&mut self, mut input: &[u8]) -> Result<()> {
        if self.finished {
            return Err(Error::CompressionFailure(
                "write after the stream was finished".into(),
            ));
        }
        while !input.is_empty() {
            let result = deflate(&mut self.inner, input, &mut self.buffer, MZFlush::None);
            result
                .status
                .map_err(|e| Error::CompressionFailure(format!("{e:?}")))?;
            if result.bytes_consumed == 0 && result.bytes_written == 0 {
                return Err(Error::CompressionFailure("compressor stalled".into()));
            }
            self.pending
                .extend_from_slice(&self.buffer[..result.bytes_written]);
            input = &input[result.bytes_consumed..];
        }
        Ok(())
    }

    /// Flushes everything and writes the zlib trailer. Further writes fail.
    pub fn finish(&mut self) -> Result<()> {
        while !self.finished {
            let result = deflate(&mut self.inner, &[], &mut self.buffer, MZFlush::Finish);
            let status = result
                .status
                .map_err(|e| Error::CompressionFailure(format!("{e:?}")))?;
            self.pending
                .extend_from_slice(&self.buffer[..result.bytes_written]);
            if status == MZStatus::StreamEnd {
                self.finished = true;
            } else if result.bytes_written == 0 {
                return Err(Error::CompressionFailure("compressor stalled".into()));
            }
        }
        Ok(())
    }

    /// Takes exactly `max` bytes once that many are pending.
    pub fn take_burst(&mut self, max: usize) -> Option<Vec<u8>> {
        (self.pending.len() >= max).then(|| self.pending.drain(..max).collect())
    }

    /// Takes up to `max` of whatever is pending, after [`finish`](Self::finish).
    pub fn take_remaining(&mut self, max: usize) -> Option<Vec<u8>> {
        if !self.finished || self.pending.is_empty() {
            return None;
        }
        let len = usize::min(max, self.pending.len());
        Some(self.pending.drain(..len).collect())
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
