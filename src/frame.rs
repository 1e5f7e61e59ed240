// SPDX-License-Identifier: GPL-3.0-only

//! Frame ingestion
//!
//! Incoming frames are normalised to RGB8 before they reach the preview.

use crate::constants::frame::PLACEHOLDER_SIZE;
use crate::errors::DecodeError;
use crate::messages::{Encoding, ImageFrame};
use image::{ImageFormat, RgbImage};

/// Black frame shown until the first camera frame arrives
pub fn placeholder() -> RgbImage {
    RgbImage::new(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE)
}

/// Decode a wire frame into RGB8
pub fn decode_frame(frame: &ImageFrame) -> Result<RgbImage, DecodeError> {
    match &frame.encoding {
        Encoding::Rgb8 => raw_image(frame, 3, |px| [px[0], px[1], px[2]]),
        Encoding::Bgr8 => raw_image(frame, 3, |px| [px[2], px[1], px[0]]),
        Encoding::Mono8 => raw_image(frame, 1, |px| [px[0], px[0], px[0]]),
        Encoding::Png => compressed_image(frame, ImageFormat::Png),
        Encoding::Jpeg => compressed_image(frame, ImageFormat::Jpeg),
        Encoding::Other(name) => Err(DecodeError::UnsupportedEncoding(name.clone())),
    }
}

/// RGBA bytes for the preview surface
pub fn to_rgba(image: &RgbImage) -> Vec<u8> {
    image
        .pixels()
        .flat_map(|px| [px[0], px[1], px[2], u8::MAX])
        .collect()
}

fn raw_image(
    frame: &ImageFrame,
    channels: usize,
    to_rgb: impl Fn(&[u8]) -> [u8; 3],
) -> Result<RgbImage, DecodeError> {
    let expected = usize::try_from(frame.width)
        .ok()
        .zip(usize::try_from(frame.height).ok())
        .and_then(|(width, height)| width.checked_mul(height))
        .and_then(|pixels| pixels.checked_mul(channels))
        .ok_or(DecodeError::TooLarge {
            width: frame.width,
            height: frame.height,
        })?;
    if frame.data.len() != expected {
        return Err(DecodeError::SizeMismatch {
            expected,
            actual: frame.data.len(),
        });
    }

    let rgb: Vec<u8> = frame.data.chunks_exact(channels).flat_map(to_rgb).collect();

    RgbImage::from_raw(frame.width, frame.height, rgb).ok_or(DecodeError::SizeMismatch {
        expected,
        actual: frame.data.len(),
    })
}

fn compressed_image(frame: &ImageFrame, format: ImageFormat) -> Result<RgbImage, DecodeError> {
    image::load_from_memory_with_format(&frame.data, format)
        .map(|img| img.to_rgb8())
        .map_err(|e| DecodeError::Corrupt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(encoding: Encoding, width: u32, height: u32, data: Vec<u8>) -> ImageFrame {
        ImageFrame {
            width,
            height,
            encoding,
            data,
        }
    }

    #[test]
    fn test_bgr_is_swapped() {
        let img = decode_frame(&frame(Encoding::Bgr8, 1, 1, vec![1, 2, 3])).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [3, 2, 1]);
    }

    #[test]
    fn test_mono_is_expanded() {
        let img = decode_frame(&frame(Encoding::Mono8, 2, 1, vec![7, 9])).unwrap();
        assert_eq!(img.get_pixel(1, 0).0, [9, 9, 9]);
    }

    #[test]
    fn test_size_mismatch() {
        assert_eq!(
            decode_frame(&frame(Encoding::Rgb8, 2, 2, vec![0; 5])),
            Err(DecodeError::SizeMismatch {
                expected: 12,
                actual: 5
            })
        );
    }

    #[test]
    fn test_oversized_geometry_is_rejected() {
        assert_eq!(
            decode_frame(&frame(Encoding::Rgb8, u32::MAX, u32::MAX, vec![0; 3])),
            Err(DecodeError::TooLarge {
                width: u32::MAX,
                height: u32::MAX
            })
        );
    }

    #[test]
    fn test_unsupported_encoding() {
        assert_eq!(
            decode_frame(&frame(Encoding::Other("yuv422".into()), 1, 1, vec![0, 0])),
            Err(DecodeError::UnsupportedEncoding("yuv422".into()))
        );
    }

    #[test]
    fn test_png_round_trip() {
        let mut source = RgbImage::new(3, 2);
        source.put_pixel(2, 1, image::Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        source
            .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let img = decode_frame(&frame(Encoding::Png, 3, 2, bytes)).unwrap();
        assert_eq!(img, source);
    }

    #[test]
    fn test_corrupt_jpeg() {
        assert!(matches!(
            decode_frame(&frame(Encoding::Jpeg, 1, 1, vec![1, 2, 3])),
            Err(DecodeError::Corrupt(_))
        ));
    }

    #[test]
    fn test_placeholder_is_black() {
        let img = placeholder();
        assert_eq!(img.dimensions(), (PLACEHOLDER_SIZE, PLACEHOLDER_SIZE));
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_rgba_is_opaque() {
        let mut img = RgbImage::new(1, 1);
        img.put_pixel(0, 0, image::Rgb([1, 2, 3]));
        assert_eq!(to_rgba(&img), vec![1, 2, 3, 255]);
    }
}
