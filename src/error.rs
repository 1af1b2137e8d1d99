use crate::color::ColorMode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("buffer holds {actual} bytes but the image needs {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("{mode:?} at bit depth {depth} is not supported")]
    UnsupportedMode { mode: ColorMode, depth: u8 },

    #[error("rectangle {w}x{h} at ({x}, {y}) exceeds the {width}x{height} canvas")]
    BoundsError {
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        width: u32,
        height: u32,
    },

    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u64, height: u64 },

    #[error("could not allocate {bytes} bytes of pixel data")]
    AllocationFailure { bytes: usize },

    #[error("invalid encoder options: {0}")]
    InvalidOptions(&'static str),

    #[error("deflate stream failed: {0}")]
    CompressionFailure(String),
}
