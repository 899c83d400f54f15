/*
 * // Copyright (c) the yuvpipe authors. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */
use crate::yuv_error::{check_overflow_v2, MismatchedSize};
use crate::{RotationMode, YuvError};

/// Size in bytes of the luma plane for a frame of the given dimensions.
#[inline]
pub const fn luma_plane_size(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// Size in bytes of a single 4:2:0 chroma plane. Odd dimensions round up.
#[inline]
pub const fn chroma_plane_size(width: u32, height: u32) -> usize {
    width.div_ceil(2) as usize * height.div_ceil(2) as usize
}

/// Chroma plane stride derived from the luma stride.
#[inline]
pub const fn chroma_stride(luma_stride: u32) -> u32 {
    luma_stride.div_ceil(2)
}

/// Total byte size of a tightly packed I420 buffer: Y plane followed by U
/// and V planes at half resolution in both axes.
#[inline]
pub const fn i420_buffer_size(width: u32, height: u32) -> usize {
    luma_plane_size(width, height) + 2 * chroma_plane_size(width, height)
}

/// Destination luma stride after rotation. 90 and 270 degrees swap the roles
/// of width and height, so the rotated luma stride equals the source height.
#[inline]
pub const fn rotated_luma_stride(width: u32, height: u32, rotation: RotationMode) -> u32 {
    match rotation {
        RotationMode::Rotate90 | RotationMode::Rotate270 => height,
        RotationMode::Rotate0 | RotationMode::Rotate180 => width,
    }
}

/// Axis-aligned sub-rectangle of a source frame.
///
/// Must lie strictly within the source bounds. For chroma-subsampled sources
/// `x` and `y` are rounded down to even so the crop origin lands on a chroma
/// sample.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> CropRect {
        CropRect {
            x,
            y,
            width,
            height,
        }
    }

    /// Full-frame crop.
    pub const fn full(width: u32, height: u32) -> CropRect {
        CropRect {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    pub const fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
        self.x.checked_add(self.width).is_some()
            && self.y.checked_add(self.height).is_some()
            && self.x + self.width <= image_width
            && self.y + self.height <= image_height
    }
}

pub(crate) fn check_i420_source(buf: &[u8], width: u32, height: u32) -> Result<(), YuvError> {
    if width == 0 || height == 0 {
        return Err(YuvError::ZeroBaseSize);
    }
    check_overflow_v2(width as usize, height as usize)?;
    let required = i420_buffer_size(width, height);
    if buf.len() < required {
        return Err(YuvError::MinimumSourceSizeMismatch(MismatchedSize {
            expected: required,
            received: buf.len(),
        }));
    }
    Ok(())
}

pub(crate) fn check_i420_destination(buf: &[u8], width: u32, height: u32) -> Result<(), YuvError> {
    if width == 0 || height == 0 {
        return Err(YuvError::ZeroBaseSize);
    }
    check_overflow_v2(width as usize, height as usize)?;
    let required = i420_buffer_size(width, height);
    if buf.len() < required {
        return Err(YuvError::MinimumDestinationSizeMismatch(MismatchedSize {
            expected: required,
            received: buf.len(),
        }));
    }
    Ok(())
}

/// Splits a contiguous I420 buffer into its three plane views.
///
/// The caller must have validated the buffer length against
/// [`i420_buffer_size`] beforehand.
#[inline]
pub(crate) fn split_i420(buf: &[u8], width: u32, height: u32) -> (&[u8], &[u8], &[u8]) {
    let y_size = luma_plane_size(width, height);
    let chroma_size = chroma_plane_size(width, height);
    let (y, chroma) = buf.split_at(y_size);
    let (u, rest) = chroma.split_at(chroma_size);
    let v = &rest[..chroma_size];
    (y, u, v)
}

#[inline]
pub(crate) fn split_i420_mut(
    buf: &mut [u8],
    width: u32,
    height: u32,
) -> (&mut [u8], &mut [u8], &mut [u8]) {
    let y_size = luma_plane_size(width, height);
    let chroma_size = chroma_plane_size(width, height);
    let (y, chroma) = buf.split_at_mut(y_size);
    let (u, rest) = chroma.split_at_mut(chroma_size);
    let v = &mut rest[..chroma_size];
    (y, u, v)
}

/// Copies a plane row by row, honoring independent source and destination
/// strides.
pub fn copy_plane(
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    width: usize,
    height: usize,
) -> Result<(), YuvError> {
    if width == 0 || height == 0 {
        return Err(YuvError::ZeroBaseSize);
    }
    if src_stride < width || dst_stride < width {
        return Err(YuvError::ImageDimensionsNotMatch);
    }
    if src.len() < src_stride * (height - 1) + width || dst.len() < dst_stride * (height - 1) + width
    {
        return Err(YuvError::ImagesSizesNotMatch);
    }
    for (src_row, dst_row) in src.chunks(src_stride).zip(dst.chunks_mut(dst_stride)) {
        dst_row[..width].copy_from_slice(&src_row[..width]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_sizes_even_dimensions() {
        assert_eq!(luma_plane_size(4, 2), 8);
        assert_eq!(chroma_plane_size(4, 2), 2);
        assert_eq!(i420_buffer_size(4, 2), 12);
        assert_eq!(i420_buffer_size(640, 480), 640 * 480 * 3 / 2);
    }

    #[test]
    fn plane_sizes_odd_dimensions_round_up() {
        assert_eq!(chroma_plane_size(5, 3), 3 * 2);
        assert_eq!(i420_buffer_size(5, 3), 15 + 2 * 6);
        assert_eq!(chroma_plane_size(1, 1), 1);
        assert_eq!(i420_buffer_size(1, 1), 3);
    }

    #[test]
    fn chroma_stride_rounds_up() {
        assert_eq!(chroma_stride(640), 320);
        assert_eq!(chroma_stride(641), 321);
    }

    #[test]
    fn rotated_stride_swaps_on_quarter_turns() {
        assert_eq!(rotated_luma_stride(4, 2, RotationMode::Rotate0), 4);
        assert_eq!(rotated_luma_stride(4, 2, RotationMode::Rotate90), 2);
        assert_eq!(rotated_luma_stride(4, 2, RotationMode::Rotate180), 4);
        assert_eq!(rotated_luma_stride(4, 2, RotationMode::Rotate270), 2);
    }

    #[test]
    fn crop_bounds() {
        assert!(CropRect::new(0, 0, 4, 2).fits_within(4, 2));
        assert!(CropRect::new(2, 0, 2, 2).fits_within(4, 2));
        assert!(!CropRect::new(2, 0, 4, 2).fits_within(4, 2));
        assert!(!CropRect::new(0, 2, 2, 2).fits_within(4, 2));
    }

    #[test]
    fn copy_plane_respects_strides() {
        let src = [1u8, 2, 0, 3, 4, 0];
        let mut dst = [0u8; 4];
        copy_plane(&src, 3, &mut dst, 2, 2, 2).unwrap();
        assert_eq!(dst, [1, 2, 3, 4]);
    }
}
