/*
 * // Copyright (c) the yuvpipe authors. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */
use crate::images::{YuvPlanarImage, YuvPlanarImageMut};
use crate::planes::{chroma_stride, copy_plane, rotated_luma_stride};
use crate::YuvError;
use fast_transpose::{rotate180_plane, transpose_plane, FlipMode, FlopMode, TransposeError};

/// Declares rotation in clockwise degrees: 0, 90, 180 or 270.
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum RotationMode {
    Rotate0,
    /// Quarter turn clockwise.
    Rotate90,
    Rotate180,
    /// Quarter turn counterclockwise.
    Rotate270,
}

impl RotationMode {
    /// Maps clockwise degrees to a rotation mode.
    pub const fn from_degrees(degrees: u32) -> Option<RotationMode> {
        match degrees {
            0 => Some(RotationMode::Rotate0),
            90 => Some(RotationMode::Rotate90),
            180 => Some(RotationMode::Rotate180),
            270 => Some(RotationMode::Rotate270),
            _ => None,
        }
    }

    /// Quarter turns swap the roles of width and height in the destination.
    pub const fn swaps_dimensions(self) -> bool {
        matches!(self, RotationMode::Rotate90 | RotationMode::Rotate270)
    }
}

#[inline]
pub(crate) fn map_ft_result(result: Result<(), TransposeError>) -> Result<(), YuvError> {
    match result {
        Ok(_) => Ok(()),
        Err(err) => match err {
            TransposeError::MismatchDimensions => Err(YuvError::ImageDimensionsNotMatch),
            _ => Err(YuvError::ImagesSizesNotMatch),
        },
    }
}

/// Rotates a planar 8-bit image clockwise.
///
/// For 90 and 270 degrees the destination holds a `height`x`width` image, so
/// `dst_stride` must be at least `height`.
///
/// # Arguments
///
/// * `src`: Source image
/// * `src_stride`: Source image stride
/// * `dst`: Destination image
/// * `dst_stride`: Destination image stride
/// * `width`: Image width
/// * `height`: Image Height
/// * `mode`: Refer to [RotationMode] for mode info
///
/// returns: Result<(), [YuvError]>
///
pub fn rotate_plane(
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    width: usize,
    height: usize,
    mode: RotationMode,
) -> Result<(), YuvError> {
    let rs = match mode {
        RotationMode::Rotate0 => {
            return copy_plane(src, src_stride, dst, dst_stride, width, height)
        }
        RotationMode::Rotate90 => transpose_plane(
            src,
            src_stride,
            dst,
            dst_stride,
            width,
            height,
            FlipMode::Flip,
            FlopMode::Flop,
        ),
        RotationMode::Rotate180 => rotate180_plane(src, src_stride, dst, dst_stride, width, height),
        RotationMode::Rotate270 => transpose_plane(
            src,
            src_stride,
            dst,
            dst_stride,
            width,
            height,
            FlipMode::NoFlip,
            FlopMode::NoFlop,
        ),
    };
    map_ft_result(rs)
}

/// Rotates a tightly packed I420 frame by 0, 90, 180 or 270 degrees
/// clockwise.
///
/// A pure geometric permutation, no resampling. For quarter turns the
/// destination describes a `height`x`width` frame and the destination luma
/// stride equals the source height; chroma strides derive from the swapped
/// luma stride.
///
/// # Arguments
///
/// * `src`: Source I420 buffer, at least [`i420_buffer_size`](crate::i420_buffer_size) bytes
/// * `width`: Source image width
/// * `height`: Source image height
/// * `dst`: Destination I420 buffer, same byte size as the source frame
/// * `mode`: Refer to [RotationMode] for mode info
///
/// returns: Result<(), [YuvError]>
///
pub fn i420_rotate(
    src: &[u8],
    width: u32,
    height: u32,
    dst: &mut [u8],
    mode: RotationMode,
) -> Result<(), YuvError> {
    let src_view = YuvPlanarImage::from_i420(src, width, height)?;
    // Plane byte counts are symmetric under the dimension swap.
    let mut dst_view = YuvPlanarImageMut::from_i420(dst, width, height)?;

    let dst_luma_stride = rotated_luma_stride(width, height, mode);
    let dst_chroma_stride = chroma_stride(dst_luma_stride);

    let chroma_width = width.div_ceil(2);
    let chroma_height = height.div_ceil(2);

    rotate_plane(
        src_view.y_plane,
        src_view.y_stride as usize,
        dst_view.y_plane.borrow_mut(),
        dst_luma_stride as usize,
        width as usize,
        height as usize,
        mode,
    )?;
    rotate_plane(
        src_view.u_plane,
        src_view.u_stride as usize,
        dst_view.u_plane.borrow_mut(),
        dst_chroma_stride as usize,
        chroma_width as usize,
        chroma_height as usize,
        mode,
    )?;
    rotate_plane(
        src_view.v_plane,
        src_view.v_stride as usize,
        dst_view.v_plane.borrow_mut(),
        dst_chroma_stride as usize,
        chroma_width as usize,
        chroma_height as usize,
        mode,
    )?;
    Ok(())
}
