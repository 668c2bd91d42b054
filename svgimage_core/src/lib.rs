//! Decoding of SVG `<image>` resources into premultiplied BGRA pixel buffers.
//!
//! ```no_run
//! use svgimage_core::{FileResolver, ImageResourceResolver, DecodeConfig};
//!
//! let resolver = ImageResourceResolver::new(FileResolver::with_base_dir("assets"), DecodeConfig::default());
//! let pixels = resolver.decode("logo.png").unwrap();
//! println!("{}x{}", pixels.width(), pixels.height());
//! ```

pub mod base64;
mod config;
mod error;
mod format;
mod node;
mod pixel;
mod resolve;

pub use config::DecodeConfig;
pub use error::{ImageError, Status};
pub use format::{FormatDispatcher, ImageFormat, PNG_SIGNATURE, START_OF_IMAGE};
pub use node::*;
pub use pixel::{BYTES_PER_PIXEL, PixelBuffer};
pub use resolve::*;

#[cfg(test)]
mod fixtures;
