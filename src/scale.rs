/*
 * // Copyright (c) the yuvpipe authors. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */
use crate::images::{YuvPlanarImage, YuvPlanarImageMut};
use crate::planes::copy_plane;
use crate::yuv_error::MismatchedSize;
use crate::YuvError;

/// Declares the resampling filter used when scaling.
///
/// Quality and cost grow from top to bottom. `Box` degrades to `Bilinear` on
/// an upscaling axis, where area averaging has no source area to average.
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum FilterMode {
    /// Nearest neighbour point sampling.
    None = 0,
    /// Linear interpolation along rows, point sampling between rows.
    Linear = 1,
    /// Linear interpolation along both axes.
    Bilinear = 2,
    /// Area averaging, best for downscaling.
    Box = 3,
}

impl FilterMode {
    /// Maps a wire value to a filter mode.
    pub const fn from_value(value: u32) -> Option<FilterMode> {
        match value {
            0 => Some(FilterMode::None),
            1 => Some(FilterMode::Linear),
            2 => Some(FilterMode::Bilinear),
            3 => Some(FilterMode::Box),
            _ => None,
        }
    }
}

const FRACTION_BITS: i64 = 16;
const FRACTION_ONE: i64 = 1 << FRACTION_BITS;
const FRACTION_HALF: i64 = FRACTION_ONE >> 1;

#[inline]
fn axis_step(src: usize, dst: usize) -> i64 {
    ((src as i64) << FRACTION_BITS) / dst as i64
}

/// Samples one row at a Q16.16 position with linear weighting.
#[inline]
fn sample_row_linear(row: &[u8], fx: i64, max_x: usize) -> u32 {
    let fx = fx.max(0);
    let ix = ((fx >> FRACTION_BITS) as usize).min(max_x);
    let frac = (fx & (FRACTION_ONE - 1)) as u32;
    let cur = row[ix] as u32;
    let next = row[(ix + 1).min(max_x)] as u32;
    (cur * (65536 - frac) + next * frac + 32768) >> 16
}

#[inline]
fn row_of(plane: &[u8], stride: usize, y: usize, width: usize) -> &[u8] {
    &plane[y * stride..y * stride + width]
}

fn scale_nearest(
    src: &[u8],
    src_stride: usize,
    src_width: usize,
    src_height: usize,
    dst: &mut [u8],
    dst_stride: usize,
    dst_width: usize,
    dst_height: usize,
) {
    let x_step = axis_step(src_width, dst_width);
    let y_step = axis_step(src_height, dst_height);
    for (y, dst_row) in dst.chunks_mut(dst_stride).take(dst_height).enumerate() {
        let sy = (((y as i64 * y_step) >> FRACTION_BITS) as usize).min(src_height - 1);
        let src_row = row_of(src, src_stride, sy, src_width);
        for (x, dst_px) in dst_row[..dst_width].iter_mut().enumerate() {
            let sx = (((x as i64 * x_step) >> FRACTION_BITS) as usize).min(src_width - 1);
            *dst_px = src_row[sx];
        }
    }
}

fn scale_linear_rows(
    src: &[u8],
    src_stride: usize,
    src_width: usize,
    src_height: usize,
    dst: &mut [u8],
    dst_stride: usize,
    dst_width: usize,
    dst_height: usize,
    vertical_linear: bool,
) {
    let x_step = axis_step(src_width, dst_width);
    let y_step = axis_step(src_height, dst_height);
    let max_x = src_width - 1;
    let max_y = src_height - 1;
    for (y, dst_row) in dst.chunks_mut(dst_stride).take(dst_height).enumerate() {
        // Pixel centers, so each axis is offset by half a step.
        let fy = y as i64 * y_step + (y_step >> 1) - FRACTION_HALF;
        let (row0, row1, y_frac) = if vertical_linear {
            let fy = fy.max(0);
            let iy = ((fy >> FRACTION_BITS) as usize).min(max_y);
            (
                row_of(src, src_stride, iy, src_width),
                row_of(src, src_stride, (iy + 1).min(max_y), src_width),
                (fy & (FRACTION_ONE - 1)) as u32,
            )
        } else {
            let iy = (((y as i64 * y_step) >> FRACTION_BITS) as usize).min(max_y);
            let row = row_of(src, src_stride, iy, src_width);
            (row, row, 0u32)
        };
        for (x, dst_px) in dst_row[..dst_width].iter_mut().enumerate() {
            let fx = x as i64 * x_step + (x_step >> 1) - FRACTION_HALF;
            let v0 = sample_row_linear(row0, fx, max_x);
            let v1 = sample_row_linear(row1, fx, max_x);
            *dst_px = ((v0 * (65536 - y_frac) + v1 * y_frac + 32768) >> 16) as u8;
        }
    }
}

fn scale_box(
    src: &[u8],
    src_stride: usize,
    src_width: usize,
    src_height: usize,
    dst: &mut [u8],
    dst_stride: usize,
    dst_width: usize,
    dst_height: usize,
) {
    for (y, dst_row) in dst.chunks_mut(dst_stride).take(dst_height).enumerate() {
        let y0 = y * src_height / dst_height;
        let y1 = (((y + 1) * src_height) / dst_height).max(y0 + 1);
        for (x, dst_px) in dst_row[..dst_width].iter_mut().enumerate() {
            let x0 = x * src_width / dst_width;
            let x1 = (((x + 1) * src_width) / dst_width).max(x0 + 1);
            let mut sum = 0u32;
            for sy in y0..y1 {
                let src_row = row_of(src, src_stride, sy, src_width);
                for &px in &src_row[x0..x1] {
                    sum += px as u32;
                }
            }
            let area = ((y1 - y0) * (x1 - x0)) as u32;
            *dst_px = ((sum + area / 2) / area) as u8;
        }
    }
}

/// Resamples a planar 8-bit image to new dimensions.
///
/// Equal source and destination dimensions degrade to a plain row copy
/// regardless of the filter.
///
/// # Arguments
///
/// * `src`: Source image
/// * `src_stride`: Source image stride
/// * `src_width`: Source image width
/// * `src_height`: Source image height
/// * `dst`: Destination image
/// * `dst_stride`: Destination image stride
/// * `dst_width`: Destination image width
/// * `dst_height`: Destination image height
/// * `filter`: Refer to [FilterMode] for filter info
///
/// returns: Result<(), [YuvError]>
///
#[allow(clippy::too_many_arguments)]
pub fn scale_plane(
    src: &[u8],
    src_stride: usize,
    src_width: usize,
    src_height: usize,
    dst: &mut [u8],
    dst_stride: usize,
    dst_width: usize,
    dst_height: usize,
    filter: FilterMode,
) -> Result<(), YuvError> {
    if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
        return Err(YuvError::ZeroBaseSize);
    }
    let src_required = (src_height - 1) * src_stride + src_width;
    if src.len() < src_required {
        return Err(YuvError::MinimumSourceSizeMismatch(MismatchedSize {
            expected: src_required,
            received: src.len(),
        }));
    }
    let dst_required = (dst_height - 1) * dst_stride + dst_width;
    if dst.len() < dst_required {
        return Err(YuvError::MinimumDestinationSizeMismatch(MismatchedSize {
            expected: dst_required,
            received: dst.len(),
        }));
    }
    if src_width == dst_width && src_height == dst_height {
        return copy_plane(src, src_stride, dst, dst_stride, src_width, src_height);
    }

    let upscaling = dst_width > src_width || dst_height > src_height;
    let filter = if filter == FilterMode::Box && upscaling {
        FilterMode::Bilinear
    } else {
        filter
    };

    match filter {
        FilterMode::None => scale_nearest(
            src, src_stride, src_width, src_height, dst, dst_stride, dst_width, dst_height,
        ),
        FilterMode::Linear => scale_linear_rows(
            src, src_stride, src_width, src_height, dst, dst_stride, dst_width, dst_height, false,
        ),
        FilterMode::Bilinear => scale_linear_rows(
            src, src_stride, src_width, src_height, dst, dst_stride, dst_width, dst_height, true,
        ),
        FilterMode::Box => scale_box(
            src, src_stride, src_width, src_height, dst, dst_stride, dst_width, dst_height,
        ),
    }
    Ok(())
}

/// Resamples a tightly packed I420 frame to new dimensions.
///
/// All three planes are resampled with the same filter; chroma planes scale
/// between their own half resolutions.
///
/// # Arguments
///
/// * `src`: Source I420 buffer for a `width`x`height` frame
/// * `width`: Source image width
/// * `height`: Source image height
/// * `dst`: Destination I420 buffer for a `dst_width`x`dst_height` frame
/// * `dst_width`: Destination image width
/// * `dst_height`: Destination image height
/// * `filter`: Refer to [FilterMode] for filter info
///
/// returns: Result<(), [YuvError]>
///
pub fn i420_scale(
    src: &[u8],
    width: u32,
    height: u32,
    dst: &mut [u8],
    dst_width: u32,
    dst_height: u32,
    filter: FilterMode,
) -> Result<(), YuvError> {
    let src_view = YuvPlanarImage::from_i420(src, width, height)?;
    let mut dst_view = YuvPlanarImageMut::from_i420(dst, dst_width, dst_height)?;

    let src_cw = width.div_ceil(2) as usize;
    let src_ch = height.div_ceil(2) as usize;
    let dst_cw = dst_width.div_ceil(2) as usize;
    let dst_ch = dst_height.div_ceil(2) as usize;

    scale_plane(
        src_view.y_plane,
        src_view.y_stride as usize,
        width as usize,
        height as usize,
        dst_view.y_plane.borrow_mut(),
        dst_view.y_stride as usize,
        dst_width as usize,
        dst_height as usize,
        filter,
    )?;
    scale_plane(
        src_view.u_plane,
        src_view.u_stride as usize,
        src_cw,
        src_ch,
        dst_view.u_plane.borrow_mut(),
        dst_view.u_stride as usize,
        dst_cw,
        dst_ch,
        filter,
    )?;
    scale_plane(
        src_view.v_plane,
        src_view.v_stride as usize,
        src_cw,
        src_ch,
        dst_view.v_plane.borrow_mut(),
        dst_view.v_stride as usize,
        dst_cw,
        dst_ch,
        filter,
    )?;
    Ok(())
}
