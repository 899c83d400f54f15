/*
 * // Copyright (c) the yuvpipe authors. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */
//! Planar pixel buffer transforms around a tightly packed I420 hub format.
//!
//! The crate converts camera-native and tagged pixel layouts into I420 and
//! back, and transforms I420 frames geometrically:
//!
//! - [camera420_to_i420] ingests three-plane camera captures, planar or
//!   semi-planar, with an optional fused rotation
//! - [nv21_to_i420], [nv12_to_i420], [i420_to_nv21], [i420_to_nv12] re-layout
//!   semi-planar chroma
//! - [convert_from_i420] and [convert_to_i420] translate between I420 and
//!   the layouts named by a [FourCc] tag, the latter with cropping and
//!   rotation fused in
//! - [i420_rotate], [i420_mirror], [i420_scale] and [i420_crop] transform
//!   whole frames as standalone pipeline stages
//!
//! All operations are single threaded, allocate at most call-local scratch
//! and report failures through [YuvError]. RGB conversions use the fixed
//! BT.601 limited-range matrix.
#![forbid(unsafe_code)]

mod camera420;
mod convert_from;
mod convert_to;
mod fourcc;
mod geometry;
mod images;
mod mirroring;
mod numerics;
mod nv_convert;
mod planes;
mod scale;
mod yuv_error;
mod yuv_support;

pub use camera420::camera420_to_i420;
pub use convert_from::convert_from_i420;
pub use convert_to::{convert_to_i420, i420_crop};
pub use fourcc::FourCc;
pub use geometry::{i420_rotate, rotate_plane, RotationMode};
pub use images::{BufferStoreMut, Camera420Image, YuvPlanarImage, YuvPlanarImageMut};
pub use mirroring::{i420_mirror, mirror_plane, MirrorMode};
pub use nv_convert::{i420_to_nv12, i420_to_nv21, nv12_to_i420, nv21_to_i420};
pub use planes::{
    chroma_plane_size, chroma_stride, copy_plane, i420_buffer_size, luma_plane_size,
    rotated_luma_stride, CropRect,
};
pub use scale::{i420_scale, scale_plane, FilterMode};
pub use yuv_error::{CropViolation, MismatchedSize, YuvError};
pub use yuv_support::{YuvRange, YuvStandardMatrix};
