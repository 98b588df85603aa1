// imgpress/src/processors/enhancer.rs
use image::DynamicImage;
use imageproc::stats::histogram;

/// Per-channel auto-contrast: remaps each channel so its darkest value
/// becomes 0 and its brightest 255, optionally ignoring a fraction of
/// outlier pixels at each end.
pub struct Enhancer {
    cutoff: f32,
}

impl Enhancer {
    pub fn new() -> Self {
        Self { cutoff: 0.0 }
    }

    pub fn with_cutoff(mut self, cutoff: f32) -> Self {
        self.cutoff = cutoff.clamp(0.0, 0.49);
        self
    }

    pub fn auto_contrast(&self, image: &DynamicImage) -> DynamicImage {
        let mut rgb = image.to_rgb8();
        let total = u64::from(rgb.width()) * u64::from(rgb.height());
        if total == 0 {
            return DynamicImage::ImageRgb8(rgb);
        }

        let hist = histogram(&rgb);
        let cut = (total as f64 * f64::from(self.cutoff)) as u64;
        let mut luts = [[0u8; 256]; 3];
        for (lut, bins) in luts.iter_mut().zip(hist.channels.iter()) {
            *lut = stretch_lut(bins, cut);
        }

        for pixel in rgb.pixels_mut() {
            for c in 0..3 {
                pixel[c] = luts[c][pixel[c] as usize];
            }
        }
        DynamicImage::ImageRgb8(rgb)
    }
}

impl Default for Enhancer {
    fn default() -> Self {
        Self::new()
    }
}

fn stretch_lut(bins: &[u32; 256], cut: u64) -> [u8; 256] {
    let mut lo = 0usize;
    let mut seen = 0u64;
    for (i, &count) in bins.iter().enumerate() {
        seen += u64::from(count);
        if seen > cut {
            lo = i;
            break;
        }
    }

    let mut hi = 255usize;
    seen = 0;
    for (i, &count) in bins.iter().enumerate().rev() {
        seen += u64::from(count);
        if seen > cut {
            hi = i;
            break;
        }
    }

    let mut lut = [0u8; 256];
    if hi <= lo {
        // flat channel, nothing to stretch
        for (i, v) in lut.iter_mut().enumerate() {
            *v = i as u8;
        }
        return lut;
    }

    let scale = 255.0 / (hi - lo) as f64;
    for (i, v) in lut.iter_mut().enumerate() {
        *v = ((i as f64 - lo as f64) * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn stretches_narrow_range_to_full_range() {
        let img = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([100, 100, 100])
            } else {
                Rgb([150, 150, 150])
            }
        });
        let out = Enhancer::new().auto_contrast(&DynamicImage::ImageRgb8(img));
        let rgb = out.to_rgb8();
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(rgb.get_pixel(1, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn flat_image_is_unchanged() {
        let img = RgbImage::from_pixel(3, 3, Rgb([42, 42, 42]));
        let out = Enhancer::new().auto_contrast(&DynamicImage::ImageRgb8(img.clone()));
        assert_eq!(out.to_rgb8(), img);
    }

    #[test]
    fn full_range_image_is_unchanged() {
        let img = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let out = Enhancer::new().auto_contrast(&DynamicImage::ImageRgb8(img.clone()));
        assert_eq!(out.to_rgb8(), img);
    }

    #[test]
    fn channels_are_stretched_independently() {
        let img = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([100, 0, 50])
            } else {
                Rgb([150, 255, 50])
            }
        });
        let out = Enhancer::new().auto_contrast(&DynamicImage::ImageRgb8(img));
        let rgb = out.to_rgb8();
        // red stretched, green already full range, blue flat
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([0, 0, 50]));
        assert_eq!(rgb.get_pixel(1, 0), &Rgb([255, 255, 50]));
    }
}
