//! PNG chunk framing.
//!
//! Every chunk on the wire is `length (u32 BE) | type | payload | CRC-32`,
//! where the CRC covers the type and the payload.

use std::borrow::Cow;

use crate::crc::Crc;

pub mod idat;
pub mod iend;
pub mod ihdr;

pub const SIGNATURE: [u8; 8] = *b"\x89PNG\x0d\x0a\x1a\x0a";

/// A chunk type and its payload. The length and CRC are derived whenever the
/// chunk is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub kind: [u8; 4],
    pub payload: &'a [u8],
}

impl<'a> Chunk<'a> {
    pub fn new(kind: [u8; 4], payload: &'a [u8]) -> Self {
        Self { kind, payload }
    }

    pub fn crc(&self) -> u32 {
        Crc::new().update(&self.kind).update(self.payload).finish()
    }

    pub fn encoded_len(&self) -> usize {
        self.payload.len() + 12
    }

    /// Appends the framed chunk to `out`.
    ///
    /// # Panics
    ///
    /// If the payload is longer than the 2^31 - 1 bytes PNG allows in one
    /// chunk.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        assert!(
            self.payload.len() <= i32::MAX as usize,
            "chunk payload too large"
        );
        out.reserve(self.encoded_len());
        out.extend((self.payload.len() as u32).to_be_bytes());
        out.extend(self.kind);
        out.extend(self.payload);
        out.extend(self.crc().to_be_bytes());
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut bytes);
        bytes
    }
}

pub fn write_chunk(kind: &[u8; 4], payload: &[u8], out: &mut Vec<u8>) {
    Chunk::new(*kind, payload).write_to(out);
}

pub(crate) trait WritableChunk {
    const HEADER: &'static [u8; 4];

    fn payload(&self) -> Cow<'_, [u8]>;

    fn write_to(&self, out: &mut Vec<u8>) {
        write_chunk(Self::HEADER, &self.payload(), out);
    }

    fn to_bytes(&self) -> Vec<u8> {
        Chunk::new(*Self::HEADER, &self.payload()).to_bytes()
    }
}
