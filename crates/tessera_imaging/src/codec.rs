//! Container detection, decoding and encoding.

use std::io::Cursor;
use tessera_core::{ImageFormat, Size, extension_of};
use tessera_error::{DecodeError, DecodeErrorKind, TesseraResult};

/// Container format of the image stored at `url`.
///
/// # Errors
///
/// `UnsupportedFormat` when the extension is not a supported raster format.
///
/// # Examples
///
/// ```
/// use tessera_core::ImageFormat;
/// use tessera_imaging::codec_format;
///
/// assert_eq!(codec_format("img/1.JPG").unwrap(), ImageFormat::Jpeg);
/// assert!(codec_format("img/1.webp").is_err());
/// ```
pub fn codec_format(url: &str) -> Result<ImageFormat, DecodeError> {
    ImageFormat::from_name(url).ok_or_else(|| {
        DecodeError::new(DecodeErrorKind::UnsupportedFormat(format!(
            "'{}' in {}",
            extension_of(url),
            url
        )))
    })
}

/// Dimensions of an encoded image, reading only its header.
///
/// # Errors
///
/// Returns an error if the format is unsupported or the header is corrupt.
pub fn dimensions(url: &str, source: &[u8]) -> TesseraResult<Size> {
    let format = codec_format(url)?;
    let reader = image::ImageReader::with_format(Cursor::new(source), library_format(format));
    let (width, height) = reader.into_dimensions().map_err(corrupt)?;
    Ok(Size::new(width, height))
}

pub(crate) fn library_format(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Tiff => image::ImageFormat::Tiff,
        ImageFormat::Bmp => image::ImageFormat::Bmp,
        ImageFormat::Gif => image::ImageFormat::Gif,
    }
}

pub(crate) fn corrupt(err: image::ImageError) -> DecodeError {
    DecodeError::new(DecodeErrorKind::Corrupt(err.to_string()))
}

pub(crate) fn encode_failed(err: image::ImageError) -> DecodeError {
    DecodeError::new(DecodeErrorKind::Encode(err.to_string()))
}
