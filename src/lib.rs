//! A baseline PNG encoder with streaming output and canvas compositing.
//!
//! ```
//! use simple_png_encoder::{ColorMode, Encoder, FixedCanvas};
//!
//! # fn main() -> simple_png_encoder::Result<()> {
//! let red = [255, 0, 0, 255].repeat(4);
//! let png = Encoder::new(&red, 2, 2, ColorMode::Rgba, 8).encode_blocking()?;
//! assert!(png.starts_with(b"\x89PNG"));
//!
//! let mut canvas = FixedCanvas::new(4, 4, ColorMode::Rgba)?;
//! canvas.push(&red, 1, 1, 2, 2)?;
//! let mut streamed = vec![];
//! canvas.encode_streaming(|bytes| streamed.extend_from_slice(bytes), || (), |e| panic!("{e}"));
//! assert!(streamed.ends_with(&[0xae, 0x42, 0x60, 0x82]));
//! # Ok(())
//! # }
//! ```

mod canvas;
pub mod chunks;
mod color;
pub mod compress;
mod crc;
mod encoder;
mod error;
mod filters;
mod scanlines;

pub use canvas::{DynamicCanvas, FixedCanvas, Rect};
pub use color::{check_dimensions, resolve, validate, ColorMode, PixelFormat};
pub use encoder::{EncodeSession, Encoder, EncoderOptions, SessionState, DEFAULT_MAX_IDAT_SIZE};
pub use error::{Error, Result};
pub use filters::{FilterPolicy, FilterType};
