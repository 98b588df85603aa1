// imgpress/src/core/planner.rs
use super::{CropOrPadding, Result, ServiceError};

/// Geometric operations to apply in order. A crop or pad always precedes
/// the final resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryOp {
    CenterCrop { x: u32, y: u32, width: u32, height: u32 },
    PadToCanvas { border_x: u32, border_y: u32 },
    Resize { width: u32, height: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformPlan {
    pub new_width: u32,
    pub new_height: u32,
    pub ops: Vec<GeometryOp>,
}

/// Compute the target dimensions and operation sequence for one image.
///
/// `req_width` and `req_height` use the `0 = unset` convention. With only
/// one dimension requested, the other is derived from the supplied aspect
/// ratio pair when present, otherwise from the original aspect ratio.
pub fn plan(
    orig_width: u32,
    orig_height: u32,
    req_width: u32,
    req_height: u32,
    aspect_ratio: Option<(u32, u32)>,
    mode: CropOrPadding,
) -> Result<TransformPlan> {
    if orig_width == 0 || orig_height == 0 {
        return Err(ServiceError::ProcessingError(format!(
            "image has a zero dimension: {orig_width}x{orig_height}"
        )));
    }

    if let Some((ratio_w, ratio_h)) = aspect_ratio {
        if ratio_w == 0 || ratio_h == 0 {
            return Err(ServiceError::InvalidParameter(format!(
                "aspect ratio components must be non-zero: {ratio_w}:{ratio_h}"
            )));
        }
    }

    if req_width == 0 && req_height == 0 {
        return Ok(TransformPlan {
            new_width: orig_width,
            new_height: orig_height,
            ops: Vec::new(),
        });
    }

    let (new_width, new_height) = match (req_width, req_height) {
        (width, 0) => {
            let height = match aspect_ratio {
                Some((ratio_w, ratio_h)) => {
                    (width as f64 * ratio_h as f64 / ratio_w as f64).round() as u32
                }
                None => (orig_height as f64 * width as f64 / orig_width as f64).round() as u32,
            };
            (width, height.max(1))
        }
        (0, height) => {
            let width = match aspect_ratio {
                Some((ratio_w, ratio_h)) => {
                    (height as f64 * ratio_w as f64 / ratio_h as f64).round() as u32
                }
                None => (orig_width as f64 * height as f64 / orig_height as f64).round() as u32,
            };
            (width.max(1), height)
        }
        (width, height) => (width, height),
    };

    let mut ops = Vec::new();
    match mode {
        CropOrPadding::Crop => {
            // Crop window saturates to the original extent per axis; the
            // final resize still reaches the target.
            let crop_w = new_width.min(orig_width);
            let crop_h = new_height.min(orig_height);
            ops.push(GeometryOp::CenterCrop {
                x: (orig_width - crop_w) / 2,
                y: (orig_height - crop_h) / 2,
                width: crop_w,
                height: crop_h,
            });
        }
        CropOrPadding::Padding => {
            ops.push(GeometryOp::PadToCanvas {
                border_x: new_width.saturating_sub(orig_width) / 2,
                border_y: new_height.saturating_sub(orig_height) / 2,
            });
        }
        CropOrPadding::None => {}
    }
    ops.push(GeometryOp::Resize {
        width: new_width,
        height: new_height,
    });

    Ok(TransformPlan {
        new_width,
        new_height,
        ops,
    })
}
