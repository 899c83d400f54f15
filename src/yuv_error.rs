/*
 * // Copyright (c) the yuvpipe authors. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct MismatchedSize {
    pub expected: usize,
    pub received: usize,
}

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct CropViolation {
    pub crop_x: u32,
    pub crop_y: u32,
    pub crop_width: u32,
    pub crop_height: u32,
    pub image_width: u32,
    pub image_height: u32,
}

#[derive(Debug)]
pub enum YuvError {
    /// The format tag is recognized but no conversion exists for it.
    UnsupportedFourCc(u32),
    /// The crop rectangle does not lie inside the source image bounds.
    CropOutOfBounds(CropViolation),
    ZeroBaseSize,
    PointerOverflow,
    ImageDimensionsNotMatch,
    ImagesSizesNotMatch,
    LumaPlaneSizeMismatch(MismatchedSize),
    LumaPlaneMinimumSizeMismatch(MismatchedSize),
    ChromaPlaneMinimumSizeMismatch(MismatchedSize),
    MinimumSourceSizeMismatch(MismatchedSize),
    DestinationSizeMismatch(MismatchedSize),
    MinimumDestinationSizeMismatch(MismatchedSize),
}

impl Display for YuvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            YuvError::UnsupportedFourCc(code) => {
                let bytes = code.to_le_bytes();
                f.write_fmt(format_args!(
                    "No conversion is available for FOURCC '{}{}{}{}' (0x{:08x})",
                    bytes[0] as char, bytes[1] as char, bytes[2] as char, bytes[3] as char, code
                ))
            }
            YuvError::CropOutOfBounds(c) => f.write_fmt(format_args!(
                "Crop rectangle {}x{} at ({}, {}) exceeds source bounds {}x{}",
                c.crop_width, c.crop_height, c.crop_x, c.crop_y, c.image_width, c.image_height
            )),
            YuvError::ZeroBaseSize => f.write_str("Zero sized images are not supported"),
            YuvError::PointerOverflow => f.write_str("Image size overflows pointer capabilities"),
            YuvError::ImageDimensionsNotMatch => {
                f.write_str("Source and destination dimensions do not match")
            }
            YuvError::ImagesSizesNotMatch => {
                f.write_str("Source and destination sizes do not match")
            }
            YuvError::LumaPlaneSizeMismatch(size) => f.write_fmt(format_args!(
                "Luma plane has invalid size, it must be {} but it was {}",
                size.expected, size.received
            )),
            YuvError::LumaPlaneMinimumSizeMismatch(size) => f.write_fmt(format_args!(
                "Luma plane has invalid size, it must be at least {} but it was {}",
                size.expected, size.received
            )),
            YuvError::ChromaPlaneMinimumSizeMismatch(size) => f.write_fmt(format_args!(
                "Chroma plane has invalid size, it must be at least {} but it was {}",
                size.expected, size.received
            )),
            YuvError::MinimumSourceSizeMismatch(size) => f.write_fmt(format_args!(
                "Source must have size at least {} but it is {}",
                size.expected, size.received
            )),
            YuvError::DestinationSizeMismatch(size) => f.write_fmt(format_args!(
                "Destination size mismatch: expected={}, received={}",
                size.expected, size.received
            )),
            YuvError::MinimumDestinationSizeMismatch(size) => f.write_fmt(format_args!(
                "Destination must have size at least {} but it is {}",
                size.expected, size.received
            )),
        }
    }
}

impl Error for YuvError {}

#[inline]
pub(crate) fn check_overflow_v2(v0: usize, v1: usize) -> Result<(), YuvError> {
    let (_, overflow) = v0.overflowing_mul(v1);
    if overflow {
        return Err(YuvError::PointerOverflow);
    }
    Ok(())
}

#[inline]
pub(crate) fn check_y8_channel(
    data: &[u8],
    stride: u32,
    width: u32,
    height: u32,
) -> Result<(), YuvError> {
    check_overflow_v2(stride as usize, height as usize)?;
    check_overflow_v2(width as usize, height as usize)?;
    if stride < width {
        return Err(YuvError::LumaPlaneMinimumSizeMismatch(MismatchedSize {
            expected: width as usize * height as usize,
            received: stride as usize * height as usize,
        }));
    }
    // The final row only needs to reach its last pixel, not a full stride.
    let required = stride as usize * (height as usize).saturating_sub(1) + width as usize;
    if data.len() < required {
        return Err(YuvError::LumaPlaneSizeMismatch(MismatchedSize {
            expected: required,
            received: data.len(),
        }));
    }
    Ok(())
}

#[inline]
pub(crate) fn check_chroma_channel(
    data: &[u8],
    stride: u32,
    image_width: u32,
    image_height: u32,
) -> Result<(), YuvError> {
    let chroma_width = image_width.div_ceil(2);
    let chroma_height = image_height.div_ceil(2);
    check_overflow_v2(stride as usize, chroma_height as usize)?;
    if stride < chroma_width {
        return Err(YuvError::ChromaPlaneMinimumSizeMismatch(MismatchedSize {
            expected: chroma_width as usize * chroma_height as usize,
            received: stride as usize * chroma_height as usize,
        }));
    }
    let required =
        stride as usize * (chroma_height as usize).saturating_sub(1) + chroma_width as usize;
    if data.len() < required {
        return Err(YuvError::ChromaPlaneMinimumSizeMismatch(MismatchedSize {
            expected: required,
            received: data.len(),
        }));
    }
    Ok(())
}

/// Validates an interleaved or strided camera chroma plane where samples sit
/// `pixel_stride` bytes apart within each row.
#[inline]
pub(crate) fn check_camera_chroma_channel(
    data: &[u8],
    stride: u32,
    pixel_stride: u32,
    image_width: u32,
    image_height: u32,
) -> Result<(), YuvError> {
    if pixel_stride == 0 || image_width == 0 || image_height == 0 {
        return Err(YuvError::ZeroBaseSize);
    }
    let chroma_width = image_width.div_ceil(2) as usize;
    let chroma_height = image_height.div_ceil(2) as usize;
    check_overflow_v2(stride as usize, chroma_height)?;
    let row_span = (chroma_width - 1) * pixel_stride as usize + 1;
    if (stride as usize) < row_span {
        return Err(YuvError::ChromaPlaneMinimumSizeMismatch(MismatchedSize {
            expected: row_span,
            received: stride as usize,
        }));
    }
    let required = stride as usize * chroma_height.saturating_sub(1) + row_span;
    if data.len() < required {
        return Err(YuvError::ChromaPlaneMinimumSizeMismatch(MismatchedSize {
            expected: required,
            received: data.len(),
        }));
    }
    Ok(())
}
