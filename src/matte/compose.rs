//! Edge softening and compositing for matted images

use std::path::Path;

use image::{imageops, GrayImage, Luma, Rgba, RgbaImage};

use crate::error::Result;

/// Soften the subject's outline by Gaussian-blurring the alpha channel
pub fn refine_edges(image: &mut RgbaImage, sigma: f32) {
    let (width, height) = image.dimensions();

    let mut alpha = GrayImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        alpha.put_pixel(x, y, Luma([pixel[3]]));
    }
    let alpha = imageops::blur(&alpha, sigma);

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        pixel[3] = alpha.get_pixel(x, y)[0];
    }
}

/// Composite the image onto an opaque black background
pub fn onto_black(image: &RgbaImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let mut composed = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
    imageops::overlay(&mut composed, image, 0, 0);
    composed
}

/// Post-process the matting output in place
///
/// Reads the cut-out PNG at `path`, refines its edges, composites it onto
/// black and overwrites `path` with the result.
pub fn compose_output(path: &Path, sigma: f32) -> Result<()> {
    let mut image = image::open(path)?.to_rgba8();
    refine_edges(&mut image, sigma);
    let composed = onto_black(&image);
    composed.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 8x8: left half opaque red, right half fully transparent
    fn half_and_half() -> RgbaImage {
        RgbaImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([255, 0, 0, 0])
            }
        })
    }

    #[test]
    fn test_refine_edges_softens_hard_boundary() {
        let mut image = half_and_half();
        refine_edges(&mut image, 2.0);

        assert_eq!(image.dimensions(), (8, 8));
        // The step edge turns into a gradient: the transparent side of the
        // boundary picks up coverage, the opaque side loses some.
        assert!(image.get_pixel(4, 4)[3] > 0);
        assert!(image.get_pixel(3, 4)[3] < 255);
        // Far from the edge the image stays mostly opaque / mostly clear.
        assert!(image.get_pixel(0, 4)[3] > image.get_pixel(7, 4)[3]);
    }

    #[test]
    fn test_onto_black_is_fully_opaque() {
        let composed = onto_black(&half_and_half());

        assert_eq!(composed.dimensions(), (8, 8));
        for pixel in composed.pixels() {
            assert_eq!(pixel[3], 255);
        }
        // Opaque subject pixels survive, transparent ones become black.
        assert_eq!(*composed.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*composed.get_pixel(7, 7), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_compose_output_overwrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cutout.png");
        half_and_half().save(&path).unwrap();

        compose_output(&path, 2.0).unwrap();

        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (8, 8));
        for pixel in reloaded.pixels() {
            assert_eq!(pixel[3], 255);
        }
    }

    #[test]
    fn test_compose_output_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.png");

        assert!(compose_output(&path, 2.0).is_err());
    }
}
