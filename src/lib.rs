// imgpress/src/lib.rs
mod cli;
pub mod core;
pub mod processors;
pub mod server;
pub mod utils;

pub use cli::Cli;
pub use core::{
    plan, CropOrPadding, GeometryOp, ImageProcessor, ImageRecord, ProcessOptions, ResizeAlgorithm,
    Result, ServiceConfig, ServiceError, TransformPlan, UploadedFile,
};
pub use processors::{Compressor, Enhancer, Loader, MetadataReader, Resizer};
pub use server::{build_router, AppState};

pub mod prelude {
    pub use crate::{
        build_router, AppState, CropOrPadding, ImageProcessor, ProcessOptions, ServiceConfig,
    };
}

// Re-export commonly used types
pub use image::DynamicImage;
