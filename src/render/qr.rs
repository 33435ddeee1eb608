//! QR code drawing.
//!
//! Encodes a record's deep-link URL and blits the module grid into a
//! square region of a label surface. The module (cell) size is the largest
//! integer that fits the target square, so QR codes stay sharp at any
//! raster resolution.

use image::GrayImage;
use qrcode::{Color, EcLevel, QrCode};

use crate::error::LabelError;

/// Error-correction level for label QR codes: ~15% recovery, the usual
/// compromise between density and scuff tolerance on printed labels.
pub const ERROR_CORRECTION: EcLevel = EcLevel::M;

/// Draw a QR code for `data` centered in the square of side `side` whose
/// top-left corner is `(x, y)`.
pub fn draw(
    surface: &mut GrayImage,
    data: &str,
    x: u32,
    y: u32,
    side: u32,
) -> Result<(), LabelError> {
    let code = QrCode::with_error_correction_level(data, ERROR_CORRECTION)
        .map_err(|e| LabelError::Render(format!("QR code generation failed: {e}")))?;

    let modules = code.width() as u32;
    let cell = (side / modules).max(1);
    let pixel_size = modules * cell;

    // Center the grid inside the target square.
    let offset_x = x + side.saturating_sub(pixel_size) / 2;
    let offset_y = y + side.saturating_sub(pixel_size) / 2;

    for qy in 0..modules {
        for qx in 0..modules {
            if code[(qx as usize, qy as usize)] != Color::Dark {
                continue;
            }
            for cy in 0..cell {
                for cx in 0..cell {
                    let px = offset_x + qx * cell + cx;
                    let py = offset_y + qy * cell + cy;
                    if px < surface.width() && py < surface.height() {
                        surface.put_pixel(px, py, image::Luma([0]));
                    }
                }
            }
        }
    }

    Ok(())
}
