//! Mirror operations.

use crate::decode::DecodedImage;
use crate::settings::Flip;

/// Mirror `image` according to `flip`.
///
/// `Horizontal` mirrors across the vertical axis (left/right swap),
/// `Vertical` across the horizontal axis (top/bottom swap), and `Both`
/// applies horizontal then vertical, which is a 180 degree turn.
pub fn apply_flip(image: &DecodedImage, flip: Flip) -> DecodedImage {
    let mut output = image.clone();
    if flip.mirrors_horizontally() {
        mirror_rows(&mut output);
    }
    if flip.mirrors_vertically() {
        reverse_rows(&mut output);
    }
    output
}

fn mirror_rows(image: &mut DecodedImage) {
    let stride = image.width as usize * 3;
    if stride == 0 {
        return;
    }
    for row in image.pixels.chunks_exact_mut(stride) {
        let width = row.len() / 3;
        for x in 0..width / 2 {
            let mirror = width - 1 - x;
            for c in 0..3 {
                row.swap(x * 3 + c, mirror * 3 + c);
            }
        }
    }
}

fn reverse_rows(image: &mut DecodedImage) {
    let stride = image.width as usize * 3;
    let height = image.height as usize;
    for y in 0..height / 2 {
        let (top, bottom) = image.pixels.split_at_mut((height - 1 - y) * stride);
        top[y * stride..(y + 1) * stride].swap_with_slice(&mut bottom[..stride]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(x as u8);
                pixels.push(y as u8);
                pixels.push(99);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_flip_none_is_identity() {
        let img = test_image(5, 4);
        assert_eq!(apply_flip(&img, Flip::None), img);
    }

    #[test]
    fn test_flip_horizontal() {
        let img = test_image(5, 4);
        let result = apply_flip(&img, Flip::Horizontal);
        assert_eq!(result.dimensions(), (5, 4));
        assert_eq!(result.pixel(0, 0), img.pixel(4, 0));
        assert_eq!(result.pixel(4, 3), img.pixel(0, 3));
        // Middle column stays put for odd widths
        assert_eq!(result.pixel(2, 1), img.pixel(2, 1));
    }

    #[test]
    fn test_flip_vertical() {
        let img = test_image(5, 4);
        let result = apply_flip(&img, Flip::Vertical);
        assert_eq!(result.pixel(0, 0), img.pixel(0, 3));
        assert_eq!(result.pixel(3, 2), img.pixel(3, 1));
    }

    #[test]
    fn test_flip_both_is_horizontal_then_vertical() {
        let img = test_image(6, 3);
        let both = apply_flip(&img, Flip::Both);
        let sequential = apply_flip(&apply_flip(&img, Flip::Horizontal), Flip::Vertical);
        assert_eq!(both, sequential);
    }

    #[test]
    fn test_flip_both_matches_half_turn() {
        let img = test_image(6, 3);
        let both = apply_flip(&img, Flip::Both);
        let turned = crate::transform::rotate_clockwise(&img, 180, crate::transform::BACKGROUND);
        assert_eq!(both, turned);
    }

    #[test]
    fn test_flip_single_pixel() {
        let img = DecodedImage::new(1, 1, vec![1, 2, 3]);
        assert_eq!(apply_flip(&img, Flip::Both), img);
    }
}
