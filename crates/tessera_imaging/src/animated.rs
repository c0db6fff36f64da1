//! Frame-by-frame renditions of animated GIFs.
//!
//! Each rendered frame keeps the colours of its source frame: resampled
//! pixels are snapped to the nearest source colour and written with that
//! palette as the frame's local colour table. A source frame with more
//! than 256 colours (possible after compositing) is quantized instead.

use crate::codec::corrupt;
use crate::still::needs_resize;
use image::codecs::gif::GifDecoder;
use image::imageops::FilterType;
use image::{AnimationDecoder, DynamicImage, Frame, Rgba, RgbaImage};
use std::collections::HashMap;
use std::io::Cursor;
use tessera_core::{Size, StyleSpec};
use tessera_error::{DecodeError, DecodeErrorKind, TesseraResult};

/// Pixels below this alpha are written as the transparent index.
const ALPHA_THRESHOLD: u8 = 128;

/// Decoded frames, each a full canvas.
pub(crate) fn decode(source: &[u8]) -> TesseraResult<Vec<Frame>> {
    let decoder = GifDecoder::new(Cursor::new(source)).map_err(corrupt)?;
    Ok(decoder.into_frames().collect_frames().map_err(corrupt)?)
}

/// Canvas size, taken from the first frame.
pub(crate) fn canvas_size(frames: &[Frame]) -> Size {
    frames
        .first()
        .map(|f| Size::new(f.buffer().width(), f.buffer().height()))
        .unwrap_or_default()
}

fn transform_frame(buffer: &RgbaImage, spec: &StyleSpec, filter: FilterType) -> TesseraResult<RgbaImage> {
    let mut buffer = match spec.crop() {
        Some(rect) => {
            rect.validate_within(spec.name(), buffer.width(), buffer.height())?;
            image::imageops::crop_imm(buffer, rect.x, rect.y, rect.width, rect.height).to_image()
        }
        None => buffer.clone(),
    };

    if let Some(size) = spec.size() {
        if needs_resize(buffer.width(), buffer.height(), *size) {
            buffer = DynamicImage::ImageRgba8(buffer)
                .resize_to_fill(size.width, size.height, filter)
                .into_rgba8();
        }
    }
    Ok(buffer)
}

/// Colour table of one source frame.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Palette {
    /// Opaque colours in first-seen order
    colors: Vec<[u8; 3]>,
    /// Whether the frame has transparent pixels
    transparent: bool,
}

impl Palette {
    /// Colours of `buffer`, or `None` when they do not fit one table.
    fn of(buffer: &RgbaImage) -> Option<Self> {
        let mut colors = Vec::new();
        let mut seen = HashMap::new();
        let mut transparent = false;
        for Rgba([r, g, b, a]) in buffer.pixels() {
            if *a < ALPHA_THRESHOLD {
                transparent = true;
                continue;
            }
            let rgb = [*r, *g, *b];
            if seen.insert(rgb, ()).is_none() {
                colors.push(rgb);
            }
            if colors.len() + usize::from(transparent) > 256 {
                return None;
            }
        }
        Some(Self {
            colors,
            transparent,
        })
    }

    /// Index of the transparent entry, placed after the colours.
    fn transparent_index(&self) -> Option<u8> {
        self.transparent
            .then(|| u8::try_from(self.colors.len()).ok())
            .flatten()
    }

    /// Flat `[r, g, b, ...]` table including the transparent entry.
    fn table(&self) -> Vec<u8> {
        let mut table: Vec<u8> = self.colors.iter().flatten().copied().collect();
        if self.transparent {
            table.extend([0, 0, 0]);
        }
        table
    }

    fn nearest(&self, rgb: [u8; 3]) -> u8 {
        let distance = |c: &[u8; 3]| -> u32 {
            c.iter()
                .zip(rgb)
                .map(|(a, b)| u32::from(a.abs_diff(b)).pow(2))
                .sum()
        };
        self.colors
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| distance(c))
            .and_then(|(i, _)| u8::try_from(i).ok())
            .unwrap_or(0)
    }

    /// Map every pixel of `buffer` to an index into this palette.
    fn index(&self, buffer: &RgbaImage) -> Vec<u8> {
        let transparent = self.transparent_index();
        let mut cache: HashMap<[u8; 3], u8> = HashMap::new();
        buffer
            .pixels()
            .map(|Rgba([r, g, b, a])| match transparent {
                Some(index) if *a < ALPHA_THRESHOLD || self.colors.is_empty() => index,
                _ => *cache
                    .entry([*r, *g, *b])
                    .or_insert_with(|| self.nearest([*r, *g, *b])),
            })
            .collect()
    }
}

fn gif_failed(err: gif::EncodingError) -> DecodeError {
    DecodeError::new(DecodeErrorKind::Encode(err.to_string()))
}

fn gif_dimension(value: u32) -> Result<u16, DecodeError> {
    u16::try_from(value).map_err(|_| {
        DecodeError::new(DecodeErrorKind::Encode(format!(
            "{} pixels exceeds the GIF dimension limit",
            value
        )))
    })
}

/// Delay in the hundredths of a second GIF stores.
fn centiseconds(frame: &Frame) -> u16 {
    let (numer, denom) = frame.delay().numer_denom_ms();
    let centis = u64::from(numer) / (u64::from(denom.max(1)) * 10);
    u16::try_from(centis).unwrap_or(u16::MAX)
}

fn encode_frame(
    source: &RgbaImage,
    rendered: &RgbaImage,
    width: u16,
    height: u16,
) -> gif::Frame<'static> {
    match Palette::of(source) {
        Some(palette) => gif::Frame::from_palette_pixels(
            width,
            height,
            palette.index(rendered),
            palette.table(),
            palette.transparent_index(),
        ),
        None => {
            let mut rgba = rendered.as_raw().clone();
            gif::Frame::from_rgba_speed(width, height, &mut rgba, 10)
        }
    }
}

/// Apply one style to every frame and re-encode, looping forever with
/// the original delays and each frame's own colours.
pub(crate) fn render(
    frames: &[Frame],
    spec: &StyleSpec,
    filter: FilterType,
) -> TesseraResult<(Vec<u8>, Size)> {
    let mut rendered = Vec::with_capacity(frames.len());
    for frame in frames {
        rendered.push(transform_frame(frame.buffer(), spec, filter)?);
    }
    let size = rendered
        .first()
        .map(|b| Size::new(b.width(), b.height()))
        .unwrap_or_default();
    let (width, height) = (gif_dimension(size.width)?, gif_dimension(size.height)?);

    let mut encoder = gif::Encoder::new(Vec::new(), width, height, &[]).map_err(gif_failed)?;
    encoder
        .set_repeat(gif::Repeat::Infinite)
        .map_err(gif_failed)?;
    for (frame, buffer) in frames.iter().zip(&rendered) {
        let mut out = encode_frame(frame.buffer(), buffer, width, height);
        out.delay = centiseconds(frame);
        out.dispose = gif::DisposalMethod::Background;
        encoder.write_frame(&out).map_err(gif_failed)?;
    }
    let data = encoder.into_inner().map_err(gif_failed)?;

    tracing::trace!(frames = frames.len(), %size, "Encoded animated rendition");
    Ok((data, size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_keeps_first_seen_order_and_transparency() {
        let mut buffer = RgbaImage::from_pixel(3, 1, Rgba([0, 0, 255, 255]));
        buffer.put_pixel(1, 0, Rgba([255, 0, 0, 255]));
        buffer.put_pixel(2, 0, Rgba([9, 9, 9, 0]));

        let palette = Palette::of(&buffer).unwrap();
        assert_eq!(palette.colors, vec![[0, 0, 255], [255, 0, 0]]);
        assert_eq!(palette.transparent_index(), Some(2));
        assert_eq!(palette.table(), vec![0, 0, 255, 255, 0, 0, 0, 0, 0]);
        assert_eq!(palette.index(&buffer), vec![0, 1, 2]);
    }

    #[test]
    fn blended_pixels_snap_to_nearest_colour() {
        let palette = Palette {
            colors: vec![[255, 0, 0], [0, 0, 255]],
            transparent: false,
        };
        assert_eq!(palette.nearest([200, 0, 60]), 0);
        assert_eq!(palette.nearest([92, 0, 163]), 1);
    }

    #[test]
    fn too_many_colours_have_no_palette() {
        let buffer = RgbaImage::from_fn(20, 20, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        assert!(Palette::of(&buffer).is_none());
    }
}
