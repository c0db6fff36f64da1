//! Pixel geometry shared by styles and the crop pipeline.

use serde::{Deserialize, Serialize};
use tessera_error::{ValidationError, ValidationErrorKind};

/// Target dimensions of a rendition.
///
/// # Examples
///
/// ```
/// use tessera_core::Size;
///
/// let thumb = Size::new(50, 50);
/// assert!(!thumb.is_zero());
/// assert_eq!(thumb.to_string(), "50x50");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("{}x{}", width, height)]
#[serde(rename_all = "PascalCase")]
pub struct Size {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Size {
    /// Create a size from width and height.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero.
    pub fn is_zero(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A crop region in original-image pixel coordinates.
///
/// # Examples
///
/// ```
/// use tessera_core::Rectangle;
///
/// let rect = Rectangle::new(10, 10, 100, 80);
/// assert!(rect.validate_within("thumb", 200, 200).is_ok());
/// assert!(rect.validate_within("thumb", 100, 100).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rectangle {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width of the region
    pub width: u32,
    /// Height of the region
    pub height: u32,
}

impl Rectangle {
    /// Create a rectangle.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Dimensions of the region.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check that the rectangle is non-degenerate and lies inside a
    /// `width` x `height` image.
    ///
    /// # Errors
    ///
    /// `InvalidRectangle` for a zero dimension, `CropOutOfBounds` when any
    /// edge falls outside the image.
    #[track_caller]
    pub fn validate_within(
        &self,
        style: &str,
        width: u32,
        height: u32,
    ) -> Result<(), ValidationError> {
        if self.width == 0 || self.height == 0 {
            return Err(ValidationError::new(ValidationErrorKind::InvalidRectangle {
                style: style.to_string(),
                reason: format!("{}x{} has a zero dimension", self.width, self.height),
            }));
        }

        let right = u64::from(self.x) + u64::from(self.width);
        let bottom = u64::from(self.y) + u64::from(self.height);
        if right > u64::from(width) || bottom > u64::from(height) {
            return Err(ValidationError::new(ValidationErrorKind::CropOutOfBounds {
                style: style.to_string(),
                width,
                height,
            }));
        }

        Ok(())
    }
}
