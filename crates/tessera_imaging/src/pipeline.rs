//! The crop pipeline.

use crate::codec::{codec_format, dimensions};
use crate::{animated, still};
use image::imageops::FilterType;
use image::{DynamicImage, Frame};
use tessera_core::{ImageFormat, Size, StyleSpec};
use tessera_error::TesseraResult;

/// One encoded rendition.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct Rendition {
    /// Style the rendition belongs to
    style: String,
    /// Encoded bytes, same container as the source
    data: Vec<u8>,
    /// Pixel dimensions
    size: Size,
}

impl Rendition {
    /// Consume the rendition, keeping the encoded bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Result of rendering a set of styles.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct CropOutcome {
    /// Renditions in processing order, `original` first when rendered
    renditions: Vec<Rendition>,
    /// Dimensions of the original the other styles were derived from
    original_size: Size,
    /// Whether an `original` rendition was produced
    original_rendered: bool,
}

impl CropOutcome {
    /// Consume the outcome, keeping the renditions.
    pub fn into_renditions(self) -> Vec<Rendition> {
        self.renditions
    }
}

enum Decoded {
    Still(DynamicImage),
    Animated(Vec<Frame>),
}

impl Decoded {
    fn decode(format: ImageFormat, source: &[u8]) -> TesseraResult<Self> {
        if format.is_animated() {
            Ok(Self::Animated(animated::decode(source)?))
        } else {
            Ok(Self::Still(still::decode(format, source)?))
        }
    }

    fn size(&self) -> Size {
        match self {
            Self::Still(image) => Size::new(image.width(), image.height()),
            Self::Animated(frames) => animated::canvas_size(frames),
        }
    }

    fn render(
        &self,
        format: ImageFormat,
        spec: &StyleSpec,
        filter: FilterType,
    ) -> TesseraResult<(Vec<u8>, Size)> {
        match self {
            Self::Still(image) => still::render(format, image, spec, filter),
            Self::Animated(frames) => animated::render(frames, spec, filter),
        }
    }
}

/// Renders image styles.
///
/// # Examples
///
/// ```
/// use tessera_core::{Rectangle, Size, StyleSpec};
/// use tessera_imaging::CropPipeline;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut png = std::io::Cursor::new(Vec::new());
/// image::RgbImage::new(200, 200).write_to(&mut png, image::ImageFormat::Png)?;
///
/// let styles = [
///     StyleSpec::new("original").with_crop(Rectangle::new(0, 0, 100, 100)),
///     StyleSpec::new("thumb").with_size(Size::new(50, 50)),
/// ];
/// let outcome = CropPipeline::new().crop_styles("img/1.png", png.get_ref(), &styles)?;
///
/// assert_eq!(*outcome.original_size(), Size::new(100, 100));
/// assert_eq!(outcome.renditions().len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CropPipeline {
    filter: FilterType,
}

impl CropPipeline {
    /// Pipeline resampling with Lanczos3.
    pub fn new() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }

    /// Use a different resampling filter.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Render every active style of the image stored at `url`.
    ///
    /// The `original` style is rendered first; if it is active, the
    /// remaining styles are derived from its rendition instead of
    /// `source`. Inert styles produce nothing.
    ///
    /// # Errors
    ///
    /// `DecodeError` for an unsupported extension or corrupt bytes,
    /// `ValidationError` for a crop rectangle outside the image.
    #[tracing::instrument(skip(self, source, styles), fields(bytes = source.len(), styles = styles.len()))]
    pub fn crop_styles(
        &self,
        url: &str,
        source: &[u8],
        styles: &[StyleSpec],
    ) -> TesseraResult<CropOutcome> {
        let format = codec_format(url)?;
        let mut decoded = Decoded::decode(format, source)?;
        let mut renditions = Vec::new();
        let mut original_rendered = false;

        if let Some(spec) = styles.iter().find(|s| s.is_original() && s.is_active()) {
            let (data, size) = decoded.render(format, spec, self.filter)?;
            tracing::debug!(style = %spec.name(), %size, "Rendered original");
            decoded = Decoded::decode(format, &data)?;
            renditions.push(Rendition {
                style: spec.name().clone(),
                data,
                size,
            });
            original_rendered = true;
        }

        let original_size = decoded.size();
        for spec in styles.iter().filter(|s| !s.is_original() && s.is_active()) {
            let (data, size) = decoded.render(format, spec, self.filter)?;
            tracing::debug!(style = %spec.name(), %size, "Rendered style");
            renditions.push(Rendition {
                style: spec.name().clone(),
                data,
                size,
            });
        }

        Ok(CropOutcome {
            renditions,
            original_size,
            original_rendered,
        })
    }

    /// Check every crop rectangle against the image stored at `url` without
    /// decoding pixels, and return the size the original will have.
    ///
    /// Rectangles of the `original` style are checked against the source;
    /// the others against the original as rendered.
    ///
    /// # Errors
    ///
    /// `DecodeError` for an unsupported extension or an unreadable header,
    /// `ValidationError` for a degenerate or out-of-bounds rectangle.
    #[tracing::instrument(skip(self, source, styles), fields(bytes = source.len(), styles = styles.len()))]
    pub fn check_styles(
        &self,
        url: &str,
        source: &[u8],
        styles: &[StyleSpec],
    ) -> TesseraResult<Size> {
        let mut working = dimensions(url, source)?;
        if let Some(spec) = styles.iter().find(|s| s.is_original() && s.is_active()) {
            working = planned_size(spec, working)?;
        }
        for spec in styles.iter().filter(|s| !s.is_original() && s.is_active()) {
            planned_size(spec, working)?;
        }
        Ok(working)
    }

    /// Render a single style from `source`, or `None` for an inert style.
    ///
    /// # Errors
    ///
    /// Same as [`crop_styles`](Self::crop_styles).
    pub fn render_style(
        &self,
        url: &str,
        source: &[u8],
        spec: &StyleSpec,
    ) -> TesseraResult<Option<Rendition>> {
        if !spec.is_active() {
            return Ok(None);
        }
        let format = codec_format(url)?;
        let (data, size) = Decoded::decode(format, source)?.render(format, spec, self.filter)?;
        Ok(Some(Rendition {
            style: spec.name().clone(),
            data,
            size,
        }))
    }
}

/// Dimensions `spec` renders to from an `input` sized image.
fn planned_size(spec: &StyleSpec, input: Size) -> TesseraResult<Size> {
    let cropped = match spec.crop() {
        Some(rect) => {
            rect.validate_within(spec.name(), input.width, input.height)?;
            rect.size()
        }
        None => input,
    };
    Ok(match spec.size() {
        Some(size) if !size.is_zero() => *size,
        _ => cropped,
    })
}

impl Default for CropPipeline {
    fn default() -> Self {
        Self::new()
    }
}
