// imgpress/src/core/mod.rs
pub mod planner;
pub mod processor;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub use planner::{plan, GeometryOp, TransformPlan};
pub use processor::ImageProcessor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAlgorithm {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

/// Whether reaching a target size removes border content (crop) or adds
/// black border content (padding) before the final resample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropOrPadding {
    #[default]
    None,
    Crop,
    Padding,
}

impl FromStr for CropOrPadding {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(CropOrPadding::None),
            "crop" => Ok(CropOrPadding::Crop),
            "padding" => Ok(CropOrPadding::Padding),
            other => Err(ServiceError::InvalidParameter(format!(
                "invalid cropOrPadding value: {other:?} (expected none, crop or padding)"
            ))),
        }
    }
}

/// One uploaded file, in multipart arrival order.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// Transform parameters shared by every file in a batch. Width and height
/// use the `0 = unset` convention.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: Option<(u32, u32)>,
    pub mode: CropOrPadding,
    pub optimize: bool,
    pub quality: Option<u8>,
}

/// Per-file result record returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub filename: String,
    pub original_size: u64,
    pub original_width: u32,
    pub original_height: u32,
    pub new_width: u32,
    pub new_height: u32,
    pub optimized_size: u64,
    pub optimized_image_url: String,
    pub original_image_data: String,
    /// Empty string when the optimize path was taken.
    pub resized_image_data: String,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Scratch directory for transient input copies.
    pub input_dir: PathBuf,
    /// Directory the processed files are written to and served from.
    pub output_dir: PathBuf,
    /// External base URL used to build `optimized_image_url` locators.
    pub public_url: String,
    /// Origin allowed by CORS.
    pub cors_origin: String,
    /// Fill color used when flattening transparent images to RGB.
    pub flatten_fill: [u8; 3],
    /// Encode quality used outside the optimize path, and for previews.
    pub default_quality: u8,
    pub algorithm: ResizeAlgorithm,
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./input"),
            output_dir: PathBuf::from("./output"),
            public_url: "http://127.0.0.1:5000".to_string(),
            cors_origin: "http://localhost:3000".to_string(),
            flatten_fill: [0, 0, 0],
            default_quality: 85,
            algorithm: ResizeAlgorithm::Lanczos3,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

impl ServiceConfig {
    /// Create the scratch directories if they are absent.
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.input_dir)?;
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Processing error: {0}")]
    ProcessingError(String),

    #[error("Multipart error: {0}")]
    Multipart(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Every batch failure surfaces to the caller as a client error,
            // including per-file decode and I/O failures.
            ServiceError::Io(_)
            | ServiceError::Image(_)
            | ServiceError::InvalidParameter(_)
            | ServiceError::UnsupportedFormat(_)
            | ServiceError::ProcessingError(_)
            | ServiceError::Multipart(_) => StatusCode::BAD_REQUEST,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match &self {
            ServiceError::Internal(_) => log::error!("internal error: {self}"),
            _ => log::debug!("client error: {self}"),
        }
        (self.status_code(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_or_padding_literals() {
        assert_eq!("none".parse::<CropOrPadding>().unwrap(), CropOrPadding::None);
        assert_eq!("crop".parse::<CropOrPadding>().unwrap(), CropOrPadding::Crop);
        assert_eq!("padding".parse::<CropOrPadding>().unwrap(), CropOrPadding::Padding);
        assert!("Crop".parse::<CropOrPadding>().is_err());
        assert!("".parse::<CropOrPadding>().is_err());
    }

    #[test]
    fn client_errors_map_to_400() {
        let err = ServiceError::UnsupportedFormat("x.bmp".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let err = ServiceError::ProcessingError("decode failed".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let err = ServiceError::Internal("join".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
