//! Named rendition specifications.

use crate::{Rectangle, Size};

/// Style name every image carries. Its rendition, when cropped, is the
/// source for all other styles.
pub const ORIGINAL_STYLE: &str = "original";

/// A named rendition: an optional crop followed by an optional resize.
///
/// # Examples
///
/// ```
/// use tessera_core::{Rectangle, Size, StyleSpec};
///
/// let thumb = StyleSpec::new("thumb").with_size(Size::new(50, 50));
/// assert!(thumb.is_active());
///
/// let inert = StyleSpec::new("medium");
/// assert!(!inert.is_active());
///
/// let original = StyleSpec::new("original").with_crop(Rectangle::new(0, 0, 100, 100));
/// assert!(original.is_original());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_", strip_option)]
pub struct StyleSpec {
    /// Style name, spliced into the URL as `name.<style>.ext`
    #[setters(skip)]
    name: String,
    /// Target size
    size: Option<Size>,
    /// Crop region in source pixels
    crop: Option<Rectangle>,
}

impl StyleSpec {
    /// Create an inert style with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            crop: None,
        }
    }

    /// A style produces a rendition only when it crops or resizes.
    pub fn is_active(&self) -> bool {
        self.size.is_some() || self.crop.is_some()
    }

    /// Whether this is the system `original` style.
    pub fn is_original(&self) -> bool {
        self.name == ORIGINAL_STYLE
    }
}
