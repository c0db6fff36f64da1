//! Tests for the crop pipeline over synthesised images.

use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::{AnimationDecoder, Delay, Frame, Rgba, RgbaImage};
use std::io::Cursor;
use tessera_core::{Rectangle, Size, StyleSpec};
use tessera_error::{TesseraErrorKind, ValidationErrorKind};
use tessera_imaging::{CropPipeline, dimensions};

fn gradient(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

fn animated_gif(width: u32, height: u32, frames: usize) -> Vec<u8> {
    let mut data = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut data);
        encoder.set_repeat(Repeat::Infinite).unwrap();
        let frames = (0..frames).map(|i| {
            let shade = (i as u8).wrapping_mul(80);
            let buffer = RgbaImage::from_pixel(width, height, Rgba([shade, 0, 255 - shade, 255]));
            Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(100, 1))
        });
        encoder.encode_frames(frames).unwrap();
    }
    data
}

const RED: [u8; 3] = [255, 0, 0];
const BLUE: [u8; 3] = [0, 0, 255];

/// Two-colour checkerboard GIF whose second frame swaps the colours.
fn checkerboard_gif(side: u16, cell: u16) -> Vec<u8> {
    let palette = [RED, BLUE].concat();
    let mut data = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut data, side, side, &palette).unwrap();
        encoder.set_repeat(gif::Repeat::Infinite).unwrap();
        for swap in [0u8, 1] {
            let pixels: Vec<u8> = (0..side)
                .flat_map(|y| (0..side).map(move |x| (((x / cell + y / cell) % 2) as u8) ^ swap))
                .collect();
            let mut frame = gif::Frame::from_indexed_pixels(side, side, pixels, None);
            frame.delay = 20;
            encoder.write_frame(&frame).unwrap();
        }
    }
    data
}

fn scenario_styles() -> Vec<StyleSpec> {
    vec![
        StyleSpec::new("original").with_crop(Rectangle::new(0, 0, 100, 100)),
        StyleSpec::new("thumb").with_size(Size::new(50, 50)),
    ]
}

#[test]
fn test_cropped_original_feeds_other_styles() {
    let source = gradient(200, 200, image::ImageFormat::Jpeg);
    let outcome = CropPipeline::new()
        .crop_styles("img/1.jpg", &source, &scenario_styles())
        .unwrap();

    assert!(*outcome.original_rendered());
    assert_eq!(*outcome.original_size(), Size::new(100, 100));

    let renditions = outcome.renditions();
    assert_eq!(renditions.len(), 2);
    assert_eq!(renditions[0].style(), "original");
    assert_eq!(*renditions[0].size(), Size::new(100, 100));
    assert_eq!(renditions[1].style(), "thumb");
    assert_eq!(*renditions[1].size(), Size::new(50, 50));

    assert_eq!(
        dimensions("img/1.thumb.jpg", renditions[1].data()).unwrap(),
        Size::new(50, 50)
    );
    assert_eq!(
        image::guess_format(renditions[1].data()).unwrap(),
        image::ImageFormat::Jpeg
    );
}

#[test]
fn test_output_is_deterministic() {
    let source = gradient(200, 200, image::ImageFormat::Png);
    let pipeline = CropPipeline::new();
    let styles = vec![
        StyleSpec::new("thumb")
            .with_crop(Rectangle::new(20, 30, 120, 90))
            .with_size(Size::new(60, 45)),
    ];

    let first = pipeline.crop_styles("a/b.png", &source, &styles).unwrap();
    let second = pipeline.crop_styles("a/b.png", &source, &styles).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_without_original_styles_use_source() {
    let source = gradient(120, 80, image::ImageFormat::Png);
    let styles = vec![
        StyleSpec::new("original"),
        StyleSpec::new("medium"),
        StyleSpec::new("small").with_size(Size::new(30, 20)),
    ];

    let outcome = CropPipeline::new()
        .crop_styles("pic.png", &source, &styles)
        .unwrap();

    assert!(!*outcome.original_rendered());
    assert_eq!(*outcome.original_size(), Size::new(120, 80));
    let styles: Vec<&str> = outcome.renditions().iter().map(|r| r.style().as_str()).collect();
    assert_eq!(styles, vec!["small"]);
}

#[test]
fn test_matching_size_is_not_resampled() {
    let source = gradient(50, 50, image::ImageFormat::Png);
    let spec = StyleSpec::new("thumb").with_size(Size::new(50, 50));

    let rendition = CropPipeline::new()
        .render_style("pic.png", &source, &spec)
        .unwrap()
        .unwrap();
    let decoded = image::load_from_memory(rendition.data()).unwrap().to_rgb8();
    let original = image::load_from_memory(&source).unwrap().to_rgb8();
    assert_eq!(decoded, original);
}

#[test]
fn test_inert_style_renders_nothing() {
    let source = gradient(10, 10, image::ImageFormat::Png);
    let rendition = CropPipeline::new()
        .render_style("pic.png", &source, &StyleSpec::new("medium"))
        .unwrap();
    assert!(rendition.is_none());
}

#[test]
fn test_out_of_bounds_crop_is_rejected() {
    let source = gradient(200, 200, image::ImageFormat::Png);
    let styles = vec![StyleSpec::new("original").with_crop(Rectangle::new(150, 150, 100, 100))];

    let err = CropPipeline::new()
        .crop_styles("img/1.png", &source, &styles)
        .unwrap_err();
    match err.kind() {
        TesseraErrorKind::Validation(e) => assert!(matches!(
            e.kind,
            ValidationErrorKind::CropOutOfBounds {
                width: 200,
                height: 200,
                ..
            }
        )),
        other => panic!("expected a validation error, got {}", other),
    }
}

#[test]
fn test_unsupported_extension_is_a_decode_error() {
    let source = gradient(10, 10, image::ImageFormat::Png);
    let err = CropPipeline::new()
        .crop_styles("img/1.webp", &source, &scenario_styles())
        .unwrap_err();
    assert!(matches!(err.kind(), TesseraErrorKind::Decode(_)));
    assert!(err.to_string().contains("webp"));
}

#[test]
fn test_corrupt_bytes_are_a_decode_error() {
    let err = CropPipeline::new()
        .crop_styles("img/1.png", b"definitely not a png", &scenario_styles())
        .unwrap_err();
    assert!(matches!(err.kind(), TesseraErrorKind::Decode(_)));
}

#[test]
fn test_animated_gif_keeps_every_frame() {
    let source = animated_gif(40, 40, 3);
    let styles = vec![
        StyleSpec::new("original").with_crop(Rectangle::new(10, 10, 20, 20)),
        StyleSpec::new("thumb").with_size(Size::new(10, 10)),
    ];

    let outcome = CropPipeline::new()
        .crop_styles("anim.gif", &source, &styles)
        .unwrap();
    assert_eq!(*outcome.original_size(), Size::new(20, 20));

    let thumb = &outcome.renditions()[1];
    let frames = GifDecoder::new(Cursor::new(thumb.data()))
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap();
    assert_eq!(frames.len(), 3);
    for frame in &frames {
        assert_eq!(frame.buffer().dimensions(), (10, 10));
        assert_eq!(frame.delay(), Delay::from_numer_denom_ms(100, 1));
    }
}

#[test]
fn test_animated_gif_keeps_source_palette() {
    let source = checkerboard_gif(30, 2);
    let styles = vec![StyleSpec::new("thumb").with_size(Size::new(15, 15))];

    let outcome = CropPipeline::new()
        .crop_styles("anim.gif", &source, &styles)
        .unwrap();
    let thumb = &outcome.renditions()[0];
    assert_eq!(*thumb.size(), Size::new(15, 15));

    let frames = GifDecoder::new(Cursor::new(thumb.data()))
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap();
    assert_eq!(frames.len(), 2);
    for frame in &frames {
        assert_eq!(frame.delay(), Delay::from_numer_denom_ms(200, 1));
        for Rgba([r, g, b, a]) in frame.buffer().pixels() {
            assert_eq!(*a, 255);
            let rgb = [*r, *g, *b];
            assert!(rgb == RED || rgb == BLUE, "unexpected colour {:?}", rgb);
        }
    }
}

#[test]
fn test_check_styles_plans_without_rendering() {
    let source = gradient(200, 200, image::ImageFormat::Png);
    let size = CropPipeline::new()
        .check_styles("img/1.png", &source, &scenario_styles())
        .unwrap();
    assert_eq!(size, Size::new(100, 100));

    let size = CropPipeline::new()
        .check_styles("img/1.png", &source, &[StyleSpec::new("original")])
        .unwrap();
    assert_eq!(size, Size::new(200, 200));
}

#[test]
fn test_check_styles_rejects_crop_outside_cropped_original() {
    let source = gradient(200, 200, image::ImageFormat::Png);
    let styles = vec![
        StyleSpec::new("original").with_crop(Rectangle::new(0, 0, 100, 100)),
        StyleSpec::new("thumb").with_crop(Rectangle::new(80, 80, 40, 40)),
    ];

    let err = CropPipeline::new()
        .check_styles("img/1.png", &source, &styles)
        .unwrap_err();
    match err.kind() {
        TesseraErrorKind::Validation(e) => assert!(matches!(
            e.kind,
            ValidationErrorKind::CropOutOfBounds {
                width: 100,
                height: 100,
                ..
            }
        )),
        other => panic!("expected a validation error, got {}", other),
    }
}
