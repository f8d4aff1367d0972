//! Clockwise rotation about the image centre.
//!
//! Quarter turns (90, 180, 270) are exact pixel permutations. Any other
//! angle uses inverse mapping with bilinear interpolation onto a canvas
//! expanded to the rotated bounding box, so no corner is clipped. Canvas
//! area not covered by the source is filled with [`BACKGROUND`] (or the
//! colour passed by the caller).
//!
//! For a clockwise rotation by θ in image coordinates (y pointing down) the
//! inverse transform from destination to source is:
//! ```text
//! src_x =  (dst_x - dst_cx) * cos(θ) + (dst_y - dst_cy) * sin(θ) + src_cx
//! src_y = -(dst_x - dst_cx) * sin(θ) + (dst_y - dst_cy) * cos(θ) + src_cy
//! ```
//! evaluated at pixel centres.

use crate::decode::DecodedImage;

/// Fill colour for canvas area exposed by non-quarter-turn rotations.
pub const BACKGROUND: [u8; 3] = [255, 255, 255];

/// Normalize an angle in degrees into `[0, 360)`.
///
/// `360` maps to `0` and negative angles wrap, so `-90` becomes `270`.
pub fn normalize_degrees(degrees: i32) -> u32 {
    degrees.rem_euclid(360) as u32
}

/// Compute the canvas size needed to hold an image rotated by `degrees`.
///
/// Quarter turns are exact. Other angles use the rotated bounding box
/// `w·|cos| + h·|sin|` by `w·|sin| + h·|cos|`, rounded up so the rotated
/// corners always fit.
///
/// # Example
///
/// ```
/// use reframe_core::transform::compute_rotated_bounds;
///
/// assert_eq!(compute_rotated_bounds(800, 600, 90), (600, 800));
/// assert_eq!(compute_rotated_bounds(800, 600, 360), (800, 600));
/// ```
pub fn compute_rotated_bounds(width: u32, height: u32, degrees: i32) -> (u32, u32) {
    match normalize_degrees(degrees) {
        0 | 180 => (width, height),
        90 | 270 => (height, width),
        angle => {
            let angle_rad = (angle as f64).to_radians();
            let cos = angle_rad.cos().abs();
            let sin = angle_rad.sin().abs();

            let w = width as f64;
            let h = height as f64;

            // Shave a rounding epsilon so exact integers are not bumped up
            let new_w = (w * cos + h * sin - 1e-9).ceil() as u32;
            let new_h = (w * sin + h * cos - 1e-9).ceil() as u32;

            (new_w.max(1), new_h.max(1))
        }
    }
}

/// Rotate `image` clockwise by `degrees` (any integer; normalized first).
///
/// # Example
///
/// ```ignore
/// use reframe_core::transform::{rotate_clockwise, BACKGROUND};
///
/// let rotated = rotate_clockwise(&image, 30, BACKGROUND);
/// ```
pub fn rotate_clockwise(image: &DecodedImage, degrees: i32, background: [u8; 3]) -> DecodedImage {
    match normalize_degrees(degrees) {
        0 => image.clone(),
        90 => rotate_quarter(image, QuarterTurn::Cw90),
        180 => rotate_quarter(image, QuarterTurn::Half),
        270 => rotate_quarter(image, QuarterTurn::Cw270),
        angle => rotate_arbitrary(image, angle, background),
    }
}

#[derive(Clone, Copy)]
enum QuarterTurn {
    Cw90,
    Half,
    Cw270,
}

fn rotate_quarter(image: &DecodedImage, turn: QuarterTurn) -> DecodedImage {
    let (w, h) = (image.width, image.height);
    let (dst_w, dst_h) = match turn {
        QuarterTurn::Half => (w, h),
        QuarterTurn::Cw90 | QuarterTurn::Cw270 => (h, w),
    };

    let mut output = Vec::with_capacity(image.pixels.len());
    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let (src_x, src_y) = match turn {
                QuarterTurn::Cw90 => (dst_y, h - 1 - dst_x),
                QuarterTurn::Half => (w - 1 - dst_x, h - 1 - dst_y),
                QuarterTurn::Cw270 => (w - 1 - dst_y, dst_x),
            };
            output.extend_from_slice(&image.pixel(src_x, src_y));
        }
    }

    DecodedImage::new(dst_w, dst_h, output)
}

fn rotate_arbitrary(image: &DecodedImage, angle: u32, background: [u8; 3]) -> DecodedImage {
    let (dst_w, dst_h) = compute_rotated_bounds(image.width, image.height, angle as i32);

    let angle_rad = (angle as f64).to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = image.width as f64 / 2.0;
    let src_cy = image.height as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = Vec::with_capacity(dst_w as usize * dst_h as usize * 3);

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            // Back to index space of the source (pixel centres at .0)
            let src_x = dx * cos + dy * sin + src_cx - 0.5;
            let src_y = -dx * sin + dy * cos + src_cy - 0.5;

            output.extend_from_slice(&sample_bilinear(image, src_x, src_y, background));
        }
    }

    DecodedImage::new(dst_w, dst_h, output)
}

/// Read a pixel as f64, substituting `background` outside the image.
#[inline]
fn texel(image: &DecodedImage, x: i64, y: i64, background: [u8; 3]) -> [f64; 3] {
    let rgb = if x < 0 || y < 0 || x >= image.width as i64 || y >= image.height as i64 {
        background
    } else {
        image.pixel(x as u32, y as u32)
    };
    [rgb[0] as f64, rgb[1] as f64, rgb[2] as f64]
}

/// Sample a pixel using bilinear interpolation.
///
/// Neighbours that fall outside the source contribute the background colour,
/// which anti-aliases the rotated edges against the fill.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64, background: [u8; 3]) -> [u8; 3] {
    let w = image.width as f64;
    let h = image.height as f64;

    if x <= -1.0 || y <= -1.0 || x >= w || y >= h {
        return background;
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = texel(image, x0, y0, background);
    let p10 = texel(image, x0 + 1, y0, background);
    let p01 = texel(image, x0, y0 + 1, background);
    let p11 = texel(image, x0 + 1, y0 + 1, background);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}
