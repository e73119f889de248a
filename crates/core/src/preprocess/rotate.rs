//! In-frame image rotation and 8-bit conversion.

use image::{Rgb, Rgb32FImage, RgbImage};

/// Rotates an image about its centre by `degrees`, keeping the frame size.
///
/// Positive angles rotate counter-clockwise as displayed (row 0 at the top).
/// Output pixels that map outside the source are zero.
pub fn rotate_image(image: &Rgb32FImage, degrees: f64) -> Rgb32FImage {
    let (width, height) = image.dimensions();
    let cx = (width as f64 - 1.0) / 2.0;
    let cy = (height as f64 - 1.0) / 2.0;

    let (sin_a, cos_a) = degrees.to_radians().sin_cos();

    Rgb32FImage::from_fn(width, height, |x, y| {
        // Output to source coordinates.
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        let sx = dx * cos_a - dy * sin_a + cx;
        let sy = dx * sin_a + dy * cos_a + cy;

        bilinear_sample(image, sx, sy)
    })
}

fn bilinear_sample(image: &Rgb32FImage, x: f64, y: f64) -> Rgb<f32> {
    let (width, height) = image.dimensions();
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let fx = (x - x0 as f64) as f32;
    let fy = (y - y0 as f64) as f32;

    let get_pixel = |px: i64, py: i64| -> [f32; 3] {
        if px >= 0 && px < width as i64 && py >= 0 && py < height as i64 {
            image.get_pixel(px as u32, py as u32).0
        } else {
            [0.0; 3]
        }
    };

    let p00 = get_pixel(x0, y0);
    let p10 = get_pixel(x0 + 1, y0);
    let p01 = get_pixel(x0, y0 + 1);
    let p11 = get_pixel(x0 + 1, y0 + 1);

    let mut out = [0.0f32; 3];
    for c in 0..3 {
        let top = p00[c] + fx * (p10[c] - p00[c]);
        let bottom = p01[c] + fx * (p11[c] - p01[c]);
        out[c] = top + fy * (bottom - top);
    }
    Rgb(out)
}

/// Clips to `[0, 1]`, scales by 255 and truncates to 8 bits.
pub fn to_u8(image: &Rgb32FImage) -> RgbImage {
    let (width, height) = image.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let Rgb(px) = *image.get_pixel(x, y);
        Rgb(px.map(|v| (255.0 * v.clamp(0.0, 1.0)) as u8))
    })
}
