// SPDX-License-Identifier: GPL-3.0-only

//! Geometry overlay drawn on the raw feed in draw mode

use crate::messages::{ImageConfig, MirrorConfig};
use image::{Rgb, RgbImage};

/// Crosshair color
const CROSS_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
/// Distance ring color
const RING_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

/// Draw the robot center marker
///
/// A crosshair through `(center_x, center_y)` rotated by `tilt` degrees, and one
/// ring per mirror table entry at its pixel distance.
pub fn draw_center(image: &mut RgbImage, geometry: &ImageConfig, mirror: &MirrorConfig) {
    let cx = geometry.center_x as f32;
    let cy = geometry.center_y as f32;

    for &radius in &mirror.pixel_distances {
        draw_ring(image, cx, cy, f32::from(radius), RING_COLOR);
    }

    let reach = image.width().max(image.height()) as f32 * 1.5;
    let angle = (geometry.tilt as f32).to_radians();
    let (sin, cos) = angle.sin_cos();
    // Horizontal arm follows the tilt, vertical arm stays perpendicular to it
    draw_line(image, cx, cy, cos, sin, reach, CROSS_COLOR);
    draw_line(image, cx, cy, -sin, cos, reach, CROSS_COLOR);
}

fn put(image: &mut RgbImage, x: f32, y: f32, color: Rgb<u8>) {
    let (x, y) = (x.round(), y.round());
    if x < 0.0 || y < 0.0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x < image.width() && y < image.height() {
        image.put_pixel(x, y, color);
    }
}

fn draw_line(image: &mut RgbImage, cx: f32, cy: f32, dx: f32, dy: f32, reach: f32, color: Rgb<u8>) {
    let steps = reach.ceil() as i32;
    for t in -steps..=steps {
        let t = t as f32;
        put(image, cx + dx * t, cy + dy * t, color);
    }
}

fn draw_ring(image: &mut RgbImage, cx: f32, cy: f32, radius: f32, color: Rgb<u8>) {
    if radius <= 0.0 {
        return;
    }
    // One sample per pixel of circumference
    let samples = (std::f32::consts::TAU * radius).ceil().max(8.0) as u32;
    for i in 0..samples {
        let theta = std::f32::consts::TAU * i as f32 / samples as f32;
        put(image, cx + radius * theta.cos(), cy + radius * theta.sin(), color);
    }
}
