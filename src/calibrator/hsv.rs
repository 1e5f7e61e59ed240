// SPDX-License-Identifier: GPL-3.0-only

//! RGB to HSV conversion on a shared 0-255 scale

/// Convert one RGB pixel to HSV with every channel scaled to 0-255
///
/// Hue wraps at 255 instead of 360 degrees so that all three sliders share one range.
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = f32::from(max - min);

    let v = max;
    if max == 0 || delta == 0.0 {
        return [0, 0, v];
    }

    let s = (delta * 255.0 / f32::from(max)).round() as u8;

    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    let sector = if max == r {
        (gf - bf) / delta
    } else if max == g {
        2.0 + (bf - rf) / delta
    } else {
        4.0 + (rf - gf) / delta
    };
    let hue = (sector * 60.0).rem_euclid(360.0);
    let h = (hue * 255.0 / 360.0).round().min(255.0) as u8;

    [h, s, v]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primaries() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [85, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [170, 255, 255]);
    }

    #[test]
    fn test_greys_have_no_hue() {
        assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
        assert_eq!(rgb_to_hsv([128, 128, 128]), [0, 0, 128]);
        assert_eq!(rgb_to_hsv([255, 255, 255]), [0, 0, 255]);
    }

    #[test]
    fn test_magenta_wraps_near_top() {
        let [h, s, v] = rgb_to_hsv([255, 0, 255]);
        assert_eq!(h, 213);
        assert_eq!(s, 255);
        assert_eq!(v, 255);
    }
}
