//! Image encoding for pipeline output.
//!
//! The processing service always answers with PNG: it is lossless, so the
//! dimensions and pixels the pipeline produced are exactly what the client
//! previews.

mod png;

pub use png::{encode_png, encode_png_from_image, EncodeError, PNG_CONTENT_TYPE};
