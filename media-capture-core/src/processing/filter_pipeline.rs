use image::{imageops, RgbaImage};

use crate::models::adjustment::{AdjustmentState, FilterOp};

/// Render `frame` through the adjustment chain.
///
/// Used for both the live preview and the photo render pass.
pub fn apply(adjustment: &AdjustmentState, frame: &RgbaImage) -> RgbaImage {
    apply_operations(&adjustment.operations(), frame)
}

/// Run an explicit operation chain over `frame`.
///
/// Consecutive color operations are fused into one per-pixel pass (values
/// are clamped to [0, 1] after each operation, as CSS does). Blur is spatial
/// and splits the chain.
pub fn apply_operations(ops: &[FilterOp], frame: &RgbaImage) -> RgbaImage {
    let mut output = frame.clone();
    let mut pending: Vec<FilterOp> = Vec::new();

    for op in ops {
        match *op {
            FilterOp::Blur(radius) => {
                color_pass(&mut output, &pending);
                pending.clear();
                if radius > 0.0 {
                    output = imageops::blur(&output, radius);
                }
            }
            color_op => pending.push(color_op),
        }
    }
    color_pass(&mut output, &pending);
    output
}

fn color_pass(image: &mut RgbaImage, ops: &[FilterOp]) {
    if ops.is_empty() {
        return;
    }
    for pixel in image.pixels_mut() {
        let rgb = [
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        ];
        let [r, g, b] = transform_rgb(ops, rgb);
        pixel[0] = to_u8(r);
        pixel[1] = to_u8(g);
        pixel[2] = to_u8(b);
    }
}

/// Apply color operations to one normalized RGB triple. Blur is ignored.
pub fn transform_rgb(ops: &[FilterOp], rgb: [f32; 3]) -> [f32; 3] {
    ops.iter().fold(rgb, |c, op| {
        let out = match *op {
            FilterOp::Brightness(a) => [c[0] * a, c[1] * a, c[2] * a],
            FilterOp::Contrast(a) => [
                (c[0] - 0.5) * a + 0.5,
                (c[1] - 0.5) * a + 0.5,
                (c[2] - 0.5) * a + 0.5,
            ],
            FilterOp::Saturate(s) => mul(&saturate_matrix(s), c),
            FilterOp::Grayscale(a) => mul(&grayscale_matrix(a), c),
            FilterOp::Sepia(a) => mul(&sepia_matrix(a), c),
            FilterOp::Invert(a) => [
                a + c[0] * (1.0 - 2.0 * a),
                a + c[1] * (1.0 - 2.0 * a),
                a + c[2] * (1.0 - 2.0 * a),
            ],
            FilterOp::HueRotate(deg) => mul(&hue_rotate_matrix(deg), c),
            FilterOp::Blur(_) => c,
        };
        [clamp01(out[0]), clamp01(out[1]), clamp01(out[2])]
    })
}

type Matrix = [[f32; 3]; 3];

fn mul(m: &Matrix, c: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * c[0] + m[0][1] * c[1] + m[0][2] * c[2],
        m[1][0] * c[0] + m[1][1] * c[1] + m[1][2] * c[2],
        m[2][0] * c[0] + m[2][1] * c[1] + m[2][2] * c[2],
    ]
}

fn saturate_matrix(s: f32) -> Matrix {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn grayscale_matrix(amount: f32) -> Matrix {
    let s = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.2126 + 0.7874 * s, 0.7152 - 0.7152 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 + 0.2848 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 - 0.7152 * s, 0.0722 + 0.9278 * s],
    ]
}

fn sepia_matrix(amount: f32) -> Matrix {
    let s = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
        [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
        [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
    ]
}

fn hue_rotate_matrix(degrees: f32) -> Matrix {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

fn to_u8(v: f32) -> u8 {
    (clamp01(v) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::adjustment::StyleFilter;
    use approx::assert_relative_eq;
    use image::Rgba;

    fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(rgba))
    }

    #[test]
    fn neutral_adjustment_is_identity() {
        let frame = RgbaImage::from_fn(4, 3, |x, y| Rgba([(x * 40) as u8, (y * 70) as u8, 90, 255]));
        let out = apply(&AdjustmentState::default(), &frame);
        assert_eq!(out, frame);
    }

    #[test]
    fn brightness_scales_channels() {
        let out = transform_rgb(&[FilterOp::Brightness(0.5)], [0.8, 0.4, 0.2]);
        assert_relative_eq!(out[0], 0.4, epsilon = 1e-6);
        assert_relative_eq!(out[1], 0.2, epsilon = 1e-6);
        assert_relative_eq!(out[2], 0.1, epsilon = 1e-6);
    }

    #[test]
    fn brightness_clamps_to_white() {
        let out = transform_rgb(&[FilterOp::Brightness(2.0)], [0.8, 0.5, 0.1]);
        assert_relative_eq!(out[0], 1.0);
        assert_relative_eq!(out[1], 1.0);
        assert_relative_eq!(out[2], 0.2, epsilon = 1e-6);
    }

    #[test]
    fn zero_contrast_is_mid_gray() {
        let out = transform_rgb(&[FilterOp::Contrast(0.0)], [0.9, 0.1, 0.3]);
        for c in out {
            assert_relative_eq!(c, 0.5);
        }
    }

    #[test]
    fn zero_saturation_matches_luma() {
        let out = transform_rgb(&[FilterOp::Saturate(0.0)], [1.0, 0.0, 0.0]);
        for c in out {
            assert_relative_eq!(c, 0.213, epsilon = 1e-6);
        }
    }

    #[test]
    fn full_saturation_is_identity() {
        let input = [0.3, 0.6, 0.9];
        let out = transform_rgb(&[FilterOp::Saturate(1.0)], input);
        for i in 0..3 {
            assert_relative_eq!(out[i], input[i], epsilon = 1e-5);
        }
    }

    #[test]
    fn grayscale_of_red() {
        let out = transform_rgb(&[FilterOp::Grayscale(1.0)], [1.0, 0.0, 0.0]);
        for c in out {
            assert_relative_eq!(c, 0.2126, epsilon = 1e-6);
        }
    }

    #[test]
    fn sepia_of_white_is_warm() {
        let out = transform_rgb(&[FilterOp::Sepia(1.0)], [1.0, 1.0, 1.0]);
        assert_relative_eq!(out[0], 1.0);
        assert_relative_eq!(out[1], 1.0);
        assert_relative_eq!(out[2], 0.937, epsilon = 1e-5);
    }

    #[test]
    fn invert_flips_channels() {
        let out = transform_rgb(&[FilterOp::Invert(1.0)], [0.0, 0.25, 1.0]);
        assert_relative_eq!(out[0], 1.0);
        assert_relative_eq!(out[1], 0.75);
        assert_relative_eq!(out[2], 0.0);
    }

    #[test]
    fn full_hue_turn_is_identity() {
        let input = [0.2, 0.5, 0.7];
        let out = transform_rgb(&[FilterOp::HueRotate(360.0)], input);
        for i in 0..3 {
            assert_relative_eq!(out[i], input[i], epsilon = 1e-4);
        }
    }

    #[test]
    fn half_hue_turn_moves_red_toward_cyan() {
        let out = transform_rgb(&[FilterOp::HueRotate(180.0)], [1.0, 0.0, 0.0]);
        assert!(out[0] < out[1]);
        assert!(out[0] < out[2]);
    }

    #[test]
    fn alpha_is_preserved() {
        let frame = solid(2, 2, [10, 20, 30, 77]);
        let mut state = AdjustmentState::default();
        state.set_filter(StyleFilter::Invert);
        let out = apply(&state, &frame);
        assert_eq!(out.get_pixel(1, 1), &Rgba([245, 235, 225, 77]));
    }

    #[test]
    fn blur_spreads_a_single_bright_pixel() {
        let mut frame = solid(9, 9, [0, 0, 0, 255]);
        frame.put_pixel(4, 4, Rgba([255, 255, 255, 255]));

        let out = apply_operations(&[FilterOp::Blur(1.5)], &frame);
        assert!(out.get_pixel(4, 4)[0] < 255);
        assert!(out.get_pixel(5, 4)[0] > 0);
        assert_eq!(out.dimensions(), (9, 9));
    }

    #[test]
    fn vintage_dims_sepia() {
        let frame = solid(1, 1, [255, 255, 255, 255]);
        let mut state = AdjustmentState::default();
        state.set_filter(StyleFilter::Vintage);
        let out = apply(&state, &frame);
        // sepia white (1.0, 1.0, 0.937) at 75% brightness
        assert_eq!(out.get_pixel(0, 0), &Rgba([191, 191, 179, 255]));
    }

    #[test]
    fn order_of_operations_matters() {
        let a = transform_rgb(&[FilterOp::Brightness(2.0), FilterOp::Contrast(0.5)], [0.8, 0.8, 0.8]);
        let b = transform_rgb(&[FilterOp::Contrast(0.5), FilterOp::Brightness(2.0)], [0.8, 0.8, 0.8]);
        assert_relative_eq!(a[0], 0.75);
        assert_relative_eq!(b[0], 1.0);
    }
}
