// imgpress/src/processors/compressor.rs
use crate::core::{Result, ServiceError};
use base64::{engine::general_purpose, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use oxipng::{optimize_from_memory, Options};
use std::io::Cursor;
use std::path::Path;

pub struct Compressor {
    quality: u8,
    optimize_png: bool,
}

impl Compressor {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            optimize_png: true,
        }
    }

    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }

    /// Output format inferred from the stored filename's extension.
    pub fn format_for(&self, filename: &str) -> ImageFormat {
        match Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("jpg") | Some("jpeg") => ImageFormat::Jpeg,
            Some("png") => ImageFormat::Png,
            Some("gif") => ImageFormat::Gif,
            Some("tiff") | Some("tif") => ImageFormat::Tiff,
            _ => ImageFormat::Jpeg,
        }
    }

    pub fn save(&self, image: &DynamicImage, path: &Path, format: ImageFormat) -> Result<()> {
        self.save_with_quality(image, path, format, self.quality)
    }

    pub fn save_with_quality(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: ImageFormat,
        quality: u8,
    ) -> Result<()> {
        let bytes = self.encode(image, format, quality)?;
        std::fs::write(path, &bytes)?;
        log::info!("saved image: {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    pub fn encode(&self, image: &DynamicImage, format: ImageFormat, quality: u8) -> Result<Vec<u8>> {
        log::debug!("encoding as {:?}, quality {}", format, quality);
        match format {
            ImageFormat::Jpeg => self.encode_jpeg(image, quality),
            ImageFormat::Png => {
                let mut buffer = Cursor::new(Vec::new());
                image.write_to(&mut buffer, ImageFormat::Png)?;
                if self.optimize_png {
                    optimize_from_memory(&buffer.into_inner(), &Options::default()).map_err(|e| {
                        ServiceError::ProcessingError(format!("PNG optimization failed: {e}"))
                    })
                } else {
                    Ok(buffer.into_inner())
                }
            }
            _ => {
                let mut buffer = Cursor::new(Vec::new());
                image.write_to(&mut buffer, format)?;
                Ok(buffer.into_inner())
            }
        }
    }

    fn encode_jpeg(&self, image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        encoder.encode_image(&image.to_rgb8())?;
        Ok(buffer.into_inner())
    }

    /// JPEG preview of an image as a base64 data URL, suitable for inline
    /// display in the JSON response.
    pub fn preview_data_url(&self, image: &DynamicImage) -> Result<String> {
        let bytes = self.encode_jpeg(image, self.quality)?;
        Ok(format!(
            "data:image/jpeg;base64,{}",
            general_purpose::STANDARD.encode(&bytes)
        ))
    }
}
