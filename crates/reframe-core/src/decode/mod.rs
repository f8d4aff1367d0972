//! Image decoding for uploaded source images.
//!
//! This module provides functionality for:
//! - Sniffing and decoding JPEG, PNG and GIF uploads
//! - Applying EXIF orientation so pixel coordinates match what the user saw
//! - Reading display dimensions cheaply for client-side crop validation
//!
//! # Examples
//!
//! ```ignore
//! use reframe_core::decode::{decode_image, DecodedImage};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod types;

pub use reader::{decode_image, read_dimensions};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
