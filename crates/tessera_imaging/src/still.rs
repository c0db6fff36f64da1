//! Single-frame renditions.

use crate::codec::{corrupt, encode_failed, library_format};
use image::DynamicImage;
use image::imageops::FilterType;
use std::io::Cursor;
use tessera_core::{ImageFormat, Size, StyleSpec};
use tessera_error::TesseraResult;

pub(crate) fn decode(format: ImageFormat, source: &[u8]) -> TesseraResult<DynamicImage> {
    Ok(image::load_from_memory_with_format(source, library_format(format)).map_err(corrupt)?)
}

/// Crop then resize one image. Resizing only happens when the target
/// differs from the current dimensions.
pub(crate) fn transform(
    image: &DynamicImage,
    spec: &StyleSpec,
    filter: FilterType,
) -> TesseraResult<DynamicImage> {
    let mut image = match spec.crop() {
        Some(rect) => {
            rect.validate_within(spec.name(), image.width(), image.height())?;
            image.crop_imm(rect.x, rect.y, rect.width, rect.height)
        }
        None => image.clone(),
    };

    if let Some(size) = spec.size() {
        if needs_resize(image.width(), image.height(), *size) {
            image = image.resize_to_fill(size.width, size.height, filter);
        }
    }
    Ok(image)
}

pub(crate) fn needs_resize(width: u32, height: u32, target: Size) -> bool {
    !target.is_zero() && (width, height) != (target.width, target.height)
}

pub(crate) fn encode(format: ImageFormat, image: &DynamicImage) -> TesseraResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    let image = match format {
        // JPEG and BMP carry no alpha channel
        ImageFormat::Jpeg | ImageFormat::Bmp if image.color().has_alpha() => {
            DynamicImage::ImageRgb8(image.to_rgb8())
        }
        _ => image.clone(),
    };
    image
        .write_to(&mut buffer, library_format(format))
        .map_err(encode_failed)?;
    Ok(buffer.into_inner())
}

/// Render one style of a still image.
pub(crate) fn render(
    format: ImageFormat,
    source: &DynamicImage,
    spec: &StyleSpec,
    filter: FilterType,
) -> TesseraResult<(Vec<u8>, Size)> {
    let image = transform(source, spec, filter)?;
    let size = Size::new(image.width(), image.height());
    Ok((encode(format, &image)?, size))
}
