//! File format detection by name or URL.

const VIDEO_EXTENSIONS: [&str; 9] = [
    "mp4", "m4p", "m4v", "mov", "mpeg", "webm", "avi", "ogg", "ogv",
];
const SVG_EXTENSIONS: [&str; 2] = ["svg", "svgz"];

/// Raster containers the crop pipeline can decode and re-encode.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum ImageFormat {
    /// JPEG (`.jpg`, `.jpeg`)
    #[display("jpeg")]
    Jpeg,
    /// PNG
    #[display("png")]
    Png,
    /// TIFF (`.tif`, `.tiff`)
    #[display("tiff")]
    Tiff,
    /// Windows bitmap
    #[display("bmp")]
    Bmp,
    /// GIF, possibly animated
    #[display("gif")]
    Gif,
}

impl ImageFormat {
    /// Map a lowercase extension (without dot) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "tif" | "tiff" => Some(Self::Tiff),
            "bmp" => Some(Self::Bmp),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Detect the format of a file name or URL from its extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_core::ImageFormat;
    ///
    /// assert_eq!(ImageFormat::from_name("a/b.JPG?v=2"), Some(ImageFormat::Jpeg));
    /// assert_eq!(ImageFormat::from_name("a/b.webp"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        Self::from_extension(&extension_of(name))
    }

    /// Whether the container can hold several frames.
    pub fn is_animated(&self) -> bool {
        matches!(self, Self::Gif)
    }
}

/// Lowercase extension of a file name or URL, without the dot. A query
/// string is ignored.
///
/// # Examples
///
/// ```
/// use tessera_core::extension_of;
///
/// assert_eq!(extension_of("/system/a/photo.PNG?_=123"), "png");
/// assert_eq!(extension_of("README"), "");
/// ```
pub fn extension_of(name: &str) -> String {
    let path = name.split('?').next().unwrap_or_default();
    let file = path.rsplit('/').next().unwrap_or_default();
    match file.rfind('.') {
        Some(dot) => file[dot + 1..].to_lowercase(),
        None => String::new(),
    }
}

/// Whether the name refers to a raster image the pipeline supports.
pub fn is_image_format(name: &str) -> bool {
    ImageFormat::from_name(name).is_some()
}

/// Whether the name refers to a video container.
pub fn is_video_format(name: &str) -> bool {
    VIDEO_EXTENSIONS.contains(&extension_of(name).as_str())
}

/// Whether the name refers to an SVG document.
pub fn is_svg_format(name: &str) -> bool {
    SVG_EXTENSIONS.contains(&extension_of(name).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_format_round_trips_through_its_display_name() {
        for format in ImageFormat::iter() {
            assert_eq!(ImageFormat::from_extension(&format.to_string()), Some(format));
        }
    }

    #[test]
    fn dot_in_directory_is_not_an_extension() {
        assert_eq!(extension_of("/v1.2/file"), "");
    }

    #[test]
    fn video_and_svg_predicates() {
        assert!(is_video_format("clip.MOV"));
        assert!(!is_video_format("clip.png"));
        assert!(is_svg_format("logo.svgz?x=1"));
        assert!(!is_image_format("logo.svg"));
    }
}
