//! Image crop pipeline for Tessera.
//!
//! Given the bytes of a stored image and a set of [`StyleSpec`]s, the
//! [`CropPipeline`] produces one encoded rendition per active style. Each
//! style crops (if a rectangle is configured) and then resizes to fill its
//! target size with Lanczos3 resampling. Renditions keep the container
//! format of the source, which is derived from the URL extension.
//!
//! Animated GIFs are processed frame by frame, keeping the frame delays.
//!
//! The `original` style is rendered first. When it produces a rendition,
//! every other style is derived from that cropped original.
//!
//! [`StyleSpec`]: tessera_core::StyleSpec

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod animated;
mod codec;
mod pipeline;
mod still;

pub use codec::{codec_format, dimensions};
pub use pipeline::{CropOutcome, CropPipeline, Rendition};
