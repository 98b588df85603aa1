// imgpress/src/core/processor.rs
use super::planner;
use super::{ImageRecord, ProcessOptions, Result, ServiceConfig, ServiceError, UploadedFile};
use crate::processors::{Compressor, Enhancer, Loader, MetadataReader, Resizer};
use crate::utils;
use image::GenericImageView;
use std::path::Path;

/// Executes transform plans for a batch of uploads and assembles the
/// per-file response records.
pub struct ImageProcessor {
    config: ServiceConfig,
    loader: Loader,
    resizer: Resizer,
    compressor: Compressor,
    enhancer: Enhancer,
    metadata: MetadataReader,
}

impl ImageProcessor {
    pub fn new(config: ServiceConfig) -> Self {
        let resizer = Resizer::new(config.algorithm);
        let compressor = Compressor::new(config.default_quality);

        Self {
            config,
            loader: Loader::new(),
            resizer,
            compressor,
            enhancer: Enhancer::new(),
            metadata: MetadataReader::new(),
        }
    }

    /// Process a batch sequentially, in input order. All-or-nothing: file
    /// extensions are validated up front so a rejected batch writes no
    /// output, and the first per-file failure aborts the rest.
    pub fn process_batch(
        &self,
        files: &[UploadedFile],
        options: &ProcessOptions,
    ) -> Result<Vec<ImageRecord>> {
        for file in files {
            if !utils::is_accepted_upload(&file.filename) {
                return Err(ServiceError::UnsupportedFormat(file.filename.clone()));
            }
        }

        let mut records = Vec::with_capacity(files.len());
        for file in files {
            records.push(self.process_file(file, options)?);
        }

        let (before, after) = records
            .iter()
            .fold((0u64, 0u64), |(b, a), r| (b + r.original_size, a + r.optimized_size));
        log::info!(
            "processed {} images ({} -> {})",
            records.len(),
            utils::format_file_size(before),
            utils::format_file_size(after)
        );

        Ok(records)
    }

    fn process_file(&self, file: &UploadedFile, options: &ProcessOptions) -> Result<ImageRecord> {
        let filename = utils::sanitize_filename(&file.filename);
        log::debug!("processing file: {}", filename);

        let input_path = self.config.input_dir.join(&filename);
        std::fs::write(&input_path, &file.bytes)?;

        let record = self.transform(&input_path, &filename, file.bytes.len() as u64, options);

        // input copies are transient; removal failure is not fatal
        if let Err(e) = std::fs::remove_file(&input_path) {
            log::warn!("failed to remove input copy {}: {}", input_path.display(), e);
        }

        record
    }

    fn transform(
        &self,
        input_path: &Path,
        filename: &str,
        original_size: u64,
        options: &ProcessOptions,
    ) -> Result<ImageRecord> {
        let original = self.loader.load(input_path)?;
        let (original_width, original_height) = original.dimensions();

        let plan = planner::plan(
            original_width,
            original_height,
            options.width,
            options.height,
            options.aspect_ratio,
            options.mode,
        )?;

        let mut image = self.resizer.apply(&original, &plan.ops);
        image = self.resizer.flatten_alpha(image, self.config.flatten_fill);

        let format = self.compressor.format_for(filename);
        let output_path = self.config.output_dir.join(filename);

        if options.optimize {
            // attempt the EXIF parse; absence or a malformed block both
            // silently mean there is nothing to carry, and re-encoding
            // writes no metadata either way
            match self.metadata.read(input_path) {
                Ok(Some(exif)) => {
                    log::debug!("stripping {} EXIF fields from {}", exif.fields().count(), filename)
                }
                Ok(None) => {}
                Err(e) => log::debug!("unreadable EXIF in {}: {}", filename, e),
            }

            image = self.enhancer.auto_contrast(&image);
            let quality = options.quality.unwrap_or(self.config.default_quality);
            self.compressor.save_with_quality(&image, &output_path, format, quality)?;
        } else {
            self.compressor.save(&image, &output_path, format)?;
        }

        let optimized_size = std::fs::metadata(&output_path)?.len();

        let original_image_data = self.compressor.preview_data_url(&original)?;
        let resized_image_data = if options.optimize {
            String::new()
        } else {
            self.compressor.preview_data_url(&image)?
        };

        Ok(ImageRecord {
            filename: filename.to_string(),
            original_size,
            original_width,
            original_height,
            new_width: plan.new_width,
            new_height: plan.new_height,
            optimized_size,
            optimized_image_url: format!(
                "{}/output/{}",
                self.config.public_url.trim_end_matches('/'),
                filename
            ),
            original_image_data,
            resized_image_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CropOrPadding;
    use assert_fs::TempDir;
    use bytes::Bytes;
    use std::io::Cursor;

    fn test_processor(temp_dir: &TempDir) -> ImageProcessor {
        let config = ServiceConfig {
            input_dir: temp_dir.path().join("input"),
            output_dir: temp_dir.path().join("output"),
            ..Default::default()
        };
        config.ensure_dirs().unwrap();
        ImageProcessor::new(config)
    }

    fn jpeg_file(name: &str, width: u32, height: u32) -> UploadedFile {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 100])
        });
        let mut buffer = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, image::ImageFormat::Jpeg)
            .unwrap();
        UploadedFile {
            filename: name.to_string(),
            bytes: Bytes::from(buffer.into_inner()),
        }
    }

    #[test]
    fn batch_preserves_input_order() {
        let temp_dir = TempDir::new().unwrap();
        let processor = test_processor(&temp_dir);
        let files = vec![jpeg_file("b.jpg", 40, 20), jpeg_file("a.jpg", 20, 40)];

        let records = processor.process_batch(&files, &ProcessOptions::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].filename, "b.jpg");
        assert_eq!(records[1].filename, "a.jpg");
    }

    #[test]
    fn invalid_extension_rejects_batch_before_any_output() {
        let temp_dir = TempDir::new().unwrap();
        let processor = test_processor(&temp_dir);
        let files = vec![
            jpeg_file("ok.jpg", 10, 10),
            UploadedFile {
                filename: "bad.bmp".to_string(),
                bytes: Bytes::from_static(b"BM"),
            },
        ];

        let err = processor.process_batch(&files, &ProcessOptions::default()).unwrap_err();
        assert!(matches!(err, ServiceError::UnsupportedFormat(_)));
        let outputs: Vec<_> = std::fs::read_dir(temp_dir.path().join("output"))
            .unwrap()
            .collect();
        assert!(outputs.is_empty());
    }

    #[test]
    fn no_dimensions_keeps_original_dimensions() {
        let temp_dir = TempDir::new().unwrap();
        let processor = test_processor(&temp_dir);
        let files = vec![jpeg_file("same.jpg", 30, 20)];

        let records = processor.process_batch(&files, &ProcessOptions::default()).unwrap();
        assert_eq!((records[0].new_width, records[0].new_height), (30, 20));
        assert_eq!((records[0].original_width, records[0].original_height), (30, 20));
        assert!(records[0].optimized_image_url.ends_with("/output/same.jpg"));
        assert!(records[0].original_image_data.starts_with("data:image/jpeg;base64,"));
        assert!(records[0].resized_image_data.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn resize_writes_output_with_target_dimensions() {
        let temp_dir = TempDir::new().unwrap();
        let processor = test_processor(&temp_dir);
        let files = vec![jpeg_file("shrink.jpg", 100, 50)];
        let options = ProcessOptions {
            width: 40,
            ..Default::default()
        };

        let records = processor.process_batch(&files, &options).unwrap();
        assert_eq!((records[0].new_width, records[0].new_height), (40, 20));

        let written = image::open(temp_dir.path().join("output/shrink.jpg")).unwrap();
        assert_eq!(written.dimensions(), (40, 20));
    }

    #[test]
    fn padding_mode_reaches_target_through_black_borders() {
        let temp_dir = TempDir::new().unwrap();
        let processor = test_processor(&temp_dir);
        let files = vec![jpeg_file("pad.jpg", 40, 40)];
        let options = ProcessOptions {
            width: 80,
            height: 40,
            mode: CropOrPadding::Padding,
            ..Default::default()
        };

        let records = processor.process_batch(&files, &options).unwrap();
        assert_eq!((records[0].new_width, records[0].new_height), (80, 40));
        let written = image::open(temp_dir.path().join("output/pad.jpg")).unwrap();
        assert_eq!(written.dimensions(), (80, 40));
    }

    #[test]
    fn optimize_leaves_resized_preview_empty() {
        let temp_dir = TempDir::new().unwrap();
        let processor = test_processor(&temp_dir);
        let files = vec![jpeg_file("opt.jpg", 20, 20)];
        let options = ProcessOptions {
            optimize: true,
            quality: Some(50),
            ..Default::default()
        };

        let records = processor.process_batch(&files, &options).unwrap();
        assert!(records[0].resized_image_data.is_empty());
        assert!(!records[0].original_image_data.is_empty());
        assert!(records[0].optimized_size > 0);
    }

    #[test]
    fn input_copy_is_removed_after_processing() {
        let temp_dir = TempDir::new().unwrap();
        let processor = test_processor(&temp_dir);
        let files = vec![jpeg_file("gone.jpg", 10, 10)];

        processor.process_batch(&files, &ProcessOptions::default()).unwrap();
        assert!(!temp_dir.path().join("input/gone.jpg").exists());
        assert!(temp_dir.path().join("output/gone.jpg").exists());
    }

    #[test]
    fn traversal_filenames_are_confined_to_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let processor = test_processor(&temp_dir);
        let mut file = jpeg_file("x.jpg", 10, 10);
        file.filename = "../escape.jpg".to_string();

        let records = processor.process_batch(&[file], &ProcessOptions::default()).unwrap();
        assert_eq!(records[0].filename, ".._escape.jpg");
        assert!(temp_dir.path().join("output/.._escape.jpg").exists());
        assert!(!temp_dir.path().join("escape.jpg").exists());
    }
}
