//! Compositing several rectangular pixel pushes into one image before a
//! single encode.

mod dynamic;
mod fixed;

pub use dynamic::{DynamicCanvas, Rect};
pub use fixed::FixedCanvas;
