// imgpress/src/processors/resizer.rs
use crate::core::{GeometryOp, ResizeAlgorithm};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage, RgbImage};

pub struct Resizer {
    algorithm: ResizeAlgorithm,
}

impl Resizer {
    pub fn new(algorithm: ResizeAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Apply a plan's geometry operations in order.
    pub fn apply(&self, image: &DynamicImage, ops: &[GeometryOp]) -> DynamicImage {
        let mut current = image.clone();
        for op in ops {
            current = match *op {
                GeometryOp::CenterCrop { x, y, width, height } => {
                    self.center_crop(&current, x, y, width, height)
                }
                GeometryOp::PadToCanvas { border_x, border_y } => {
                    self.pad_to_canvas(&current, border_x, border_y)
                }
                GeometryOp::Resize { width, height } => self.resize_exact(&current, width, height),
            };
        }
        current
    }

    fn center_crop(&self, image: &DynamicImage, x: u32, y: u32, width: u32, height: u32) -> DynamicImage {
        if (width, height) == image.dimensions() {
            return image.clone();
        }
        log::debug!("cropping to {}x{} at ({}, {})", width, height, x, y);
        image.crop_imm(x, y, width, height)
    }

    /// Expand the canvas by the given borders on each side, black fill.
    fn pad_to_canvas(&self, image: &DynamicImage, border_x: u32, border_y: u32) -> DynamicImage {
        if border_x == 0 && border_y == 0 {
            return image.clone();
        }
        let (width, height) = image.dimensions();
        let canvas_w = width + 2 * border_x;
        let canvas_h = height + 2 * border_y;
        log::debug!("padding {}x{} onto a {}x{} canvas", width, height, canvas_w, canvas_h);

        let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, Rgba([0, 0, 0, 255]));
        image::imageops::overlay(&mut canvas, &image.to_rgba8(), i64::from(border_x), i64::from(border_y));
        DynamicImage::ImageRgba8(canvas)
    }

    pub fn resize_exact(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        if (width, height) == image.dimensions() {
            log::debug!("image dimensions unchanged, skipping resample");
            return image.clone();
        }

        log::debug!(
            "resizing image from {}x{} to {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );
        image.resize_exact(width, height, self.filter())
    }

    /// Flatten a transparent image to RGB over the given fill color.
    /// Opaque images pass through untouched.
    pub fn flatten_alpha(&self, image: DynamicImage, fill: [u8; 3]) -> DynamicImage {
        if !image.color().has_alpha() {
            return image;
        }

        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut flat = RgbImage::new(width, height);
        for (out, src) in flat.pixels_mut().zip(rgba.pixels()) {
            let alpha = u16::from(src[3]);
            for c in 0..3 {
                out[c] = ((u16::from(src[c]) * alpha + u16::from(fill[c]) * (255 - alpha)) / 255) as u8;
            }
        }
        DynamicImage::ImageRgb8(flat)
    }

    fn filter(&self) -> FilterType {
        match self.algorithm {
            ResizeAlgorithm::Nearest => FilterType::Nearest,
            ResizeAlgorithm::Bilinear => FilterType::Triangle,
            ResizeAlgorithm::Bicubic => FilterType::CatmullRom,
            ResizeAlgorithm::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
