// imgpress/src/utils/mod.rs
use crate::core::{Result, ServiceError};
use std::path::Path;

/// Extensions accepted for upload. Anything else rejects the whole batch.
pub const ACCEPTED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "tiff", "tif"];

pub fn is_accepted_upload(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn sanitize_filename(filename: &str) -> String {
    let invalid_chars = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
    filename
        .chars()
        .map(|c| if invalid_chars.contains(&c) { '_' } else { c })
        .collect()
}

/// Normalized boolean parser for form fields. Exactly `true`/`True` and
/// `false`/`False` are accepted; anything else is invalid input rather than
/// silently false.
pub fn parse_flag(value: &str) -> Result<bool> {
    match value {
        "true" | "True" => Ok(true),
        "false" | "False" => Ok(false),
        other => Err(ServiceError::InvalidParameter(format!(
            "invalid boolean literal: {other:?} (expected true or false)"
        ))),
    }
}

/// Parse a requested dimension. An empty field and `0` both mean unset.
pub fn parse_dimension(name: &str, value: &str) -> Result<u32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse()
        .map_err(|_| ServiceError::InvalidParameter(format!("invalid {name} value: {trimmed:?}")))
}

/// Parse a `"W:H"` aspect ratio pair, e.g. `16:9`.
pub fn parse_aspect_ratio(value: &str) -> Result<(u32, u32)> {
    let invalid =
        || ServiceError::InvalidParameter(format!("invalid aspectRatio value: {value:?} (expected W:H)"));

    let (w, h) = value.trim().split_once(':').ok_or_else(invalid)?;
    let ratio_w: u32 = w.trim().parse().map_err(|_| invalid())?;
    let ratio_h: u32 = h.trim().parse().map_err(|_| invalid())?;
    if ratio_w == 0 || ratio_h == 0 {
        return Err(invalid());
    }
    Ok((ratio_w, ratio_h))
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = (bytes_f64.log10() / base.log10()).floor() as i32;
    let size = bytes_f64 / base.powi(exponent);

    format!("{:.2} {}", size, UNITS[exponent as usize])
}
