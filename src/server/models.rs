// imgpress/src/server/models.rs
use crate::core::{ProcessOptions, Result, ServiceError, UploadedFile};
use crate::utils;
use axum::extract::multipart::Field;
use axum::extract::Multipart;

/// A parsed `/upload` request: the files plus the transform parameters
/// shared by the whole batch.
#[derive(Debug)]
pub struct UploadRequest {
    pub files: Vec<UploadedFile>,
    pub options: ProcessOptions,
}

impl UploadRequest {
    /// Collect multipart fields in arrival order. Unknown fields are
    /// ignored; known fields with out-of-set literals are client errors.
    pub async fn from_multipart(multipart: &mut Multipart) -> Result<Self> {
        let mut files = Vec::new();
        let mut options = ProcessOptions::default();
        let mut quality_raw: Option<String> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ServiceError::Multipart(format!("failed to parse multipart data: {e}")))?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "file[]" => {
                    let filename = field.file_name().unwrap_or("").to_string();
                    let bytes = field.bytes().await.map_err(|e| {
                        ServiceError::Multipart(format!("failed to read file {filename}: {e}"))
                    })?;
                    files.push(UploadedFile { filename, bytes });
                }
                "width" => options.width = utils::parse_dimension("width", &text(field).await?)?,
                "height" => options.height = utils::parse_dimension("height", &text(field).await?)?,
                "aspectRatio" => {
                    let value = text(field).await?;
                    if !value.trim().is_empty() {
                        options.aspect_ratio = Some(utils::parse_aspect_ratio(&value)?);
                    }
                }
                "cropOrPadding" => options.mode = text(field).await?.trim().parse()?,
                "optimize" => options.optimize = utils::parse_flag(text(field).await?.trim())?,
                "quality" => quality_raw = Some(text(field).await?),
                other => log::debug!("ignoring unknown form field: {}", other),
            }
        }

        if files.is_empty() {
            return Err(ServiceError::InvalidParameter("no files uploaded".to_string()));
        }

        options.quality = validate_quality(options.optimize, quality_raw.as_deref())?;

        Ok(Self { files, options })
    }
}

/// Quality is required and must be 0-100 when optimize is set; without
/// optimize it is ignored.
fn validate_quality(optimize: bool, raw: Option<&str>) -> Result<Option<u8>> {
    if !optimize {
        return Ok(None);
    }
    let raw = raw.ok_or_else(|| {
        ServiceError::InvalidParameter("quality is required when optimize is set".to_string())
    })?;
    let quality: u8 = raw.trim().parse().map_err(|_| {
        ServiceError::InvalidParameter(format!("invalid quality value: {:?}", raw.trim()))
    })?;
    if quality > 100 {
        return Err(ServiceError::InvalidParameter(format!(
            "quality must be between 0 and 100, got {quality}"
        )));
    }
    Ok(Some(quality))
}

async fn text(field: Field<'_>) -> Result<String> {
    let name = field.name().unwrap_or("").to_string();
    field
        .text()
        .await
        .map_err(|e| ServiceError::Multipart(format!("failed to read field {name}: {e}")))
}
