//! Normalize pass: bake rotation and flips into a new raster.
//!
//! Rotation is restricted to quarter turns, so every destination pixel maps
//! to exactly one source pixel and no interpolation is needed.
//!
//! # Algorithm
//!
//! The pass uses inverse mapping: for each pixel of the intermediate raster,
//! undo the flips (they live in the rotated frame) and then undo the rotation
//! to find the source pixel to copy. For a clockwise quarter turn of a
//! `w x h` source:
//!
//! ```text
//! src_x = rot_y
//! src_y = h - 1 - rot_x
//! ```

use crate::decode::{DecodedImage, CHANNELS};
use crate::geometry::{transformed_dimensions, Rotation};

/// Produce the intermediate raster: `image` rotated clockwise by `rotation`,
/// then mirrored in the rotated frame.
///
/// The source is never modified; the output is a freshly allocated raster of
/// `transformed_dimensions(image.width, image.height, rotation)`.
pub fn apply_orientation(
    image: &DecodedImage,
    rotation: Rotation,
    flip_horizontal: bool,
    flip_vertical: bool,
) -> DecodedImage {
    // Fast path: identity transform
    if rotation == Rotation::Deg0 && !flip_horizontal && !flip_vertical {
        return image.clone();
    }

    let (src_w, src_h) = (image.width as usize, image.height as usize);
    let (dst_w, dst_h) = transformed_dimensions(image.width, image.height, rotation);
    let (dst_w_us, dst_h_us) = (dst_w as usize, dst_h as usize);

    let mut output = vec![0u8; dst_w_us * dst_h_us * CHANNELS];

    for dst_y in 0..dst_h_us {
        for dst_x in 0..dst_w_us {
            // Undo the flips, which are applied in the rotated frame
            let rot_x = if flip_horizontal { dst_w_us - 1 - dst_x } else { dst_x };
            let rot_y = if flip_vertical { dst_h_us - 1 - dst_y } else { dst_y };

            let (src_x, src_y) = match rotation {
                Rotation::Deg0 => (rot_x, rot_y),
                Rotation::Deg90 => (rot_y, src_h - 1 - rot_x),
                Rotation::Deg180 => (src_w - 1 - rot_x, src_h - 1 - rot_y),
                Rotation::Deg270 => (src_w - 1 - rot_y, rot_x),
            };

            let src_idx = (src_y * src_w + src_x) * CHANNELS;
            let dst_idx = (dst_y * dst_w_us + dst_x) * CHANNELS;
            if let Some(px) = image.pixels.get(src_idx..src_idx + CHANNELS) {
                output[dst_idx..dst_idx + CHANNELS].copy_from_slice(px);
            }
        }
    }

    DecodedImage {
        width: dst_w,
        height: dst_h,
        pixels: output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: [u8; 4] = [255, 0, 0, 255];
    const G: [u8; 4] = [0, 255, 0, 255];
    const B: [u8; 4] = [0, 0, 255, 255];
    const Y: [u8; 4] = [255, 255, 0, 255];

    /// 2x2 image:
    /// ```text
    /// R G
    /// B Y
    /// ```
    fn quad() -> DecodedImage {
        DecodedImage::new(2, 2, [R, G, B, Y].concat())
    }

    fn row(img: &DecodedImage, y: u32) -> Vec<[u8; 4]> {
        (0..img.width).map(|x| img.pixel(x, y).unwrap()).collect()
    }

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_identity() {
        let img = quad();
        assert_eq!(apply_orientation(&img, Rotation::Deg0, false, false), img);
    }

    #[test]
    fn test_rotate_90_clockwise() {
        let out = apply_orientation(&quad(), Rotation::Deg90, false, false);
        // B R
        // Y G
        assert_eq!(row(&out, 0), vec![B, R]);
        assert_eq!(row(&out, 1), vec![Y, G]);
    }

    #[test]
    fn test_rotate_180() {
        let out = apply_orientation(&quad(), Rotation::Deg180, false, false);
        assert_eq!(row(&out, 0), vec![Y, B]);
        assert_eq!(row(&out, 1), vec![G, R]);
    }

    #[test]
    fn test_rotate_270() {
        let out = apply_orientation(&quad(), Rotation::Deg270, false, false);
        // G Y
        // R B
        assert_eq!(row(&out, 0), vec![G, Y]);
        assert_eq!(row(&out, 1), vec![R, B]);
    }

    #[test]
    fn test_flips() {
        let h = apply_orientation(&quad(), Rotation::Deg0, true, false);
        assert_eq!(row(&h, 0), vec![G, R]);

        let v = apply_orientation(&quad(), Rotation::Deg0, false, true);
        assert_eq!(row(&v, 0), vec![B, Y]);

        let both = apply_orientation(&quad(), Rotation::Deg0, true, true);
        assert_eq!(both, apply_orientation(&quad(), Rotation::Deg180, false, false));
    }

    #[test]
    fn test_flip_happens_in_rotated_frame() {
        // Rotate 90 gives [B R / Y G]; a horizontal flip then mirrors that view.
        let out = apply_orientation(&quad(), Rotation::Deg90, true, false);
        assert_eq!(row(&out, 0), vec![R, B]);
        assert_eq!(row(&out, 1), vec![G, Y]);
    }

    #[test]
    fn test_rectangular_dimensions() {
        let img = test_image(8, 6);
        for (rotation, dims) in [
            (Rotation::Deg0, (8, 6)),
            (Rotation::Deg90, (6, 8)),
            (Rotation::Deg180, (8, 6)),
            (Rotation::Deg270, (6, 8)),
        ] {
            let out = apply_orientation(&img, rotation, true, false);
            assert_eq!(out.dimensions(), dims, "rotation {:?}", rotation);
            assert_eq!(out.pixels.len(), (dims.0 * dims.1 * 4) as usize);
        }
    }

    #[test]
    fn test_rectangular_rotate_90_pixels() {
        // 3x1 [a b c] rotated clockwise becomes a 1x3 column a/b/c
        let img = test_image(3, 1);
        let out = apply_orientation(&img, Rotation::Deg90, false, false);
        assert_eq!(out.dimensions(), (1, 3));
        assert_eq!(out.pixel(0, 0), img.pixel(0, 0));
        assert_eq!(out.pixel(0, 2), img.pixel(2, 0));
    }

    #[test]
    fn test_four_quarter_turns_restore_pixels() {
        let img = test_image(7, 3);
        let mut out = img.clone();
        for _ in 0..4 {
            out = apply_orientation(&out, Rotation::Deg90, false, false);
        }
        assert_eq!(out, img);
    }

    #[test]
    fn test_source_is_untouched() {
        let img = quad();
        let before = img.clone();
        let _ = apply_orientation(&img, Rotation::Deg270, true, true);
        assert_eq!(img, before);
    }

    #[test]
    fn test_matches_image_crate_rotation() {
        let img = test_image(5, 3);
        let rgba = img.to_rgba_image().unwrap();
        let expected = DecodedImage::from_rgba_image(image::imageops::rotate90(&rgba));
        assert_eq!(apply_orientation(&img, Rotation::Deg90, false, false), expected);

        let expected = DecodedImage::from_rgba_image(image::imageops::rotate270(&rgba));
        assert_eq!(apply_orientation(&img, Rotation::Deg270, false, false), expected);
    }
}
