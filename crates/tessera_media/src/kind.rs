//! Kinds of media fields.

use tessera_core::Constraints;

const IMAGE_MAX_SIZE: u64 = 1024 * 1024;

/// What a media field holds. Each kind declares its upload constraints once.
///
/// # Examples
///
/// ```
/// use tessera_media::AssetKind;
///
/// assert!(AssetKind::File.constraints().is_empty());
/// assert_eq!(*AssetKind::Image.constraints().max_size(), Some(1024 * 1024));
/// assert!(AssetKind::Image.is_croppable());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum AssetKind {
    /// Any file, no constraints
    #[default]
    #[display("file")]
    File,
    /// Raster image with styles
    #[display("image")]
    Image,
    /// Video reference
    #[display("video")]
    Video,
}

impl AssetKind {
    /// Default upload constraints of this kind.
    pub fn constraints(&self) -> Constraints {
        match self {
            Self::File => Constraints::none(),
            Self::Image => Constraints::new(
                Some(IMAGE_MAX_SIZE),
                Some(to_strings(&["image/jpeg", "image/png"])),
                Some(to_strings(&["jpg", "png"])),
            ),
            Self::Video => Constraints::new(
                None,
                None,
                Some(to_strings(&[
                    "mp4", "m4p", "m4v", "mov", "mpeg", "webm", "avi", "ogg", "ogv",
                ])),
            ),
        }
    }

    /// Whether styles and crop options apply.
    pub fn is_croppable(&self) -> bool {
        matches!(self, Self::Image)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
