//! Perspective rectification
//!
//! Warps the region bounded by the selected registration frame into an
//! upright rectangle sized to the frame's longest opposing edges.

use anyhow::{anyhow, Result};
use image::{GrayImage, Luma};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use tracing::debug;

use super::geometry::Quad;

/// Warp the source image so the given quadrilateral (TL, TR, BR, BL) fills
/// an upright rectangle. Destination width is the longer of the top/bottom
/// edges, height the longer of the left/right edges.
pub fn warp_to_rect(src: &GrayImage, corners: &Quad) -> Result<GrayImage> {
    let [tl, tr, br, bl] = *corners;

    let width_top = tl.distance(&tr);
    let width_bottom = bl.distance(&br);
    let dst_w = width_top.max(width_bottom).round() as u32;

    let height_left = tl.distance(&bl);
    let height_right = tr.distance(&br);
    let dst_h = height_left.max(height_right).round() as u32;

    if dst_w == 0 || dst_h == 0 {
        return Err(anyhow!("Registration frame collapses to an empty rectangle"));
    }

    let from = [
        (tl.x as f32, tl.y as f32),
        (tr.x as f32, tr.y as f32),
        (br.x as f32, br.y as f32),
        (bl.x as f32, bl.y as f32),
    ];
    let to = [
        (0.0, 0.0),
        (dst_w as f32, 0.0),
        (dst_w as f32, dst_h as f32),
        (0.0, dst_h as f32),
    ];

    let projection = Projection::from_control_points(from, to)
        .ok_or_else(|| anyhow!("Degenerate registration frame: no perspective transform exists"))?;

    let mut dst = GrayImage::new(dst_w, dst_h);
    warp_into(src, &projection, Interpolation::Bilinear, Luma([255u8]), &mut dst);

    debug!("Rectified frame to {}x{}", dst_w, dst_h);
    Ok(dst)
}
