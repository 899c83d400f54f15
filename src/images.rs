/*
 * // Copyright (c) the yuvpipe authors. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */
use crate::planes::{
    check_i420_destination, check_i420_source, chroma_plane_size, chroma_stride, luma_plane_size,
    split_i420, split_i420_mut,
};
use crate::yuv_error::{
    check_camera_chroma_channel, check_chroma_channel, check_y8_channel,
};
use crate::YuvError;
use std::fmt::Debug;

#[derive(Debug)]
pub enum BufferStoreMut<'a, T: Copy + Debug> {
    Borrowed(&'a mut [T]),
    Owned(Vec<T>),
}

impl<T: Copy + Debug> BufferStoreMut<'_, T> {
    pub fn borrow(&self) -> &[T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }

    pub fn borrow_mut(&mut self) -> &mut [T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }
}

#[derive(Debug, Clone)]
/// Non-mutable representation of a planar 4:2:0 YUV image.
pub struct YuvPlanarImage<'a> {
    pub y_plane: &'a [u8],
    /// Stride here always means bytes per row.
    pub y_stride: u32,
    pub u_plane: &'a [u8],
    /// Stride here always means bytes per row.
    pub u_stride: u32,
    pub v_plane: &'a [u8],
    /// Stride here always means bytes per row.
    pub v_stride: u32,
    pub width: u32,
    pub height: u32,
}

impl<'a> YuvPlanarImage<'a> {
    /// Borrows the three plane views of a tightly packed I420 buffer.
    pub fn from_i420(buf: &'a [u8], width: u32, height: u32) -> Result<Self, YuvError> {
        check_i420_source(buf, width, height)?;
        let (y_plane, u_plane, v_plane) = split_i420(buf, width, height);
        Ok(Self {
            y_plane,
            y_stride: width,
            u_plane,
            u_stride: chroma_stride(width),
            v_plane,
            v_stride: chroma_stride(width),
            width,
            height,
        })
    }

    pub fn check_constraints(&self) -> Result<(), YuvError> {
        if self.width == 0 || self.height == 0 {
            return Err(YuvError::ZeroBaseSize);
        }
        check_y8_channel(self.y_plane, self.y_stride, self.width, self.height)?;
        check_chroma_channel(self.u_plane, self.u_stride, self.width, self.height)?;
        check_chroma_channel(self.v_plane, self.v_stride, self.width, self.height)?;
        Ok(())
    }
}

#[derive(Debug)]
/// Mutable representation of a planar 4:2:0 YUV image.
pub struct YuvPlanarImageMut<'a> {
    pub y_plane: BufferStoreMut<'a, u8>,
    /// Stride here always means bytes per row.
    pub y_stride: u32,
    pub u_plane: BufferStoreMut<'a, u8>,
    /// Stride here always means bytes per row.
    pub u_stride: u32,
    pub v_plane: BufferStoreMut<'a, u8>,
    /// Stride here always means bytes per row.
    pub v_stride: u32,
    pub width: u32,
    pub height: u32,
}

impl<'a> YuvPlanarImageMut<'a> {
    /// Allocates a tightly packed mutable target image.
    pub fn alloc(width: u32, height: u32) -> Self {
        let y_target = vec![0u8; luma_plane_size(width, height)];
        let u_target = vec![0u8; chroma_plane_size(width, height)];
        let v_target = vec![0u8; chroma_plane_size(width, height)];
        Self {
            y_plane: BufferStoreMut::Owned(y_target),
            y_stride: width,
            u_plane: BufferStoreMut::Owned(u_target),
            u_stride: chroma_stride(width),
            v_plane: BufferStoreMut::Owned(v_target),
            v_stride: chroma_stride(width),
            width,
            height,
        }
    }

    /// Borrows the three plane views of a tightly packed mutable I420 buffer.
    pub fn from_i420(buf: &'a mut [u8], width: u32, height: u32) -> Result<Self, YuvError> {
        check_i420_destination(buf, width, height)?;
        let (y_plane, u_plane, v_plane) = split_i420_mut(buf, width, height);
        Ok(Self {
            y_plane: BufferStoreMut::Borrowed(y_plane),
            y_stride: width,
            u_plane: BufferStoreMut::Borrowed(u_plane),
            u_stride: chroma_stride(width),
            v_plane: BufferStoreMut::Borrowed(v_plane),
            v_stride: chroma_stride(width),
            width,
            height,
        })
    }

    pub fn to_fixed(&'a self) -> YuvPlanarImage<'a> {
        YuvPlanarImage {
            y_plane: self.y_plane.borrow(),
            y_stride: self.y_stride,
            u_plane: self.u_plane.borrow(),
            u_stride: self.u_stride,
            v_plane: self.v_plane.borrow(),
            v_stride: self.v_stride,
            width: self.width,
            height: self.height,
        }
    }

    pub fn check_constraints(&self) -> Result<(), YuvError> {
        self.to_fixed().check_constraints()
    }
}

#[derive(Debug, Clone)]
/// Camera-native 4:2:0 source with three independent plane pointers.
///
/// Models the capture layout camera HALs hand out (Android `YUV_420_888`
/// style): each plane carries its own row stride, and the chroma planes share
/// a pixel stride. `uv_pixel_stride == 1` means fully planar chroma;
/// `uv_pixel_stride == 2` means U and V samples interleave within one chroma
/// region, with `u_plane` and `v_plane` overlapping views shifted by one
/// byte.
pub struct Camera420Image<'a> {
    pub y_plane: &'a [u8],
    /// Bytes per luma row.
    pub y_stride: u32,
    pub u_plane: &'a [u8],
    /// Bytes per chroma row.
    pub u_stride: u32,
    pub v_plane: &'a [u8],
    /// Bytes per chroma row.
    pub v_stride: u32,
    /// Byte distance between consecutive chroma samples within a row.
    pub uv_pixel_stride: u32,
    pub width: u32,
    pub height: u32,
}

impl Camera420Image<'_> {
    pub fn check_constraints(&self) -> Result<(), YuvError> {
        if self.width == 0 || self.height == 0 {
            return Err(YuvError::ZeroBaseSize);
        }
        check_y8_channel(self.y_plane, self.y_stride, self.width, self.height)?;
        check_camera_chroma_channel(
            self.u_plane,
            self.u_stride,
            self.uv_pixel_stride,
            self.width,
            self.height,
        )?;
        check_camera_chroma_channel(
            self.v_plane,
            self.v_stride,
            self.uv_pixel_stride,
            self.width,
            self.height,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i420_buffer_size;

    #[test]
    fn i420_views_carry_tight_strides() {
        let buf = vec![0u8; i420_buffer_size(6, 4)];
        let image = YuvPlanarImage::from_i420(&buf, 6, 4).unwrap();
        assert_eq!(image.y_stride, 6);
        assert_eq!(image.u_stride, 3);
        assert_eq!(image.y_plane.len(), 24);
        assert_eq!(image.u_plane.len(), 6);
        assert!(image.check_constraints().is_ok());
    }

    #[test]
    fn undersized_buffer_is_rejected() {
        let buf = vec![0u8; i420_buffer_size(6, 4) - 1];
        assert!(YuvPlanarImage::from_i420(&buf, 6, 4).is_err());
    }

    #[test]
    fn alloc_produces_valid_target() {
        let mut target = YuvPlanarImageMut::alloc(5, 3);
        assert!(target.check_constraints().is_ok());
        assert_eq!(target.y_plane.borrow().len(), 15);
        assert_eq!(target.u_plane.borrow().len(), 6);
        target.y_plane.borrow_mut()[0] = 42;
        assert_eq!(target.to_fixed().y_plane[0], 42);
    }

    #[test]
    fn camera_image_rejects_short_chroma() {
        // Two chroma rows of stride 4, last row trimmed at its final sample.
        let y = [0u8; 16];
        let uv = [0u8; 7];
        let image = Camera420Image {
            y_plane: &y,
            y_stride: 4,
            u_plane: &uv,
            u_stride: 4,
            v_plane: &uv,
            v_stride: 4,
            uv_pixel_stride: 2,
            width: 4,
            height: 4,
        };
        assert!(image.check_constraints().is_ok());
        let short = &uv[..6];
        let bad = Camera420Image {
            u_plane: short,
            ..image.clone()
        };
        assert!(bad.check_constraints().is_err());
    }
}
