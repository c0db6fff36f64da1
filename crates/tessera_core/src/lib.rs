//! Core value types for the Tessera media asset engine.
//!
//! This crate provides the types shared by every Tessera component: image
//! geometry, style specifications, the record identity used for URL
//! templating, per-field options parsed from declarative tags, upload
//! constraints and the file format helpers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod constraints;
mod formats;
mod geometry;
mod options;
mod record;
mod style;
mod url;

pub use constraints::{Constraints, ConstraintsBuilder};
pub use formats::{ImageFormat, extension_of, is_image_format, is_svg_format, is_video_format};
pub use geometry::{Rectangle, Size};
pub use options::FieldOptions;
pub use record::{RecordContext, RecordContextBuilder};
pub use style::{ORIGINAL_STYLE, StyleSpec};
pub use url::{media_url, style_url};
