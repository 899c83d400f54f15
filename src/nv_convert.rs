/*
 * // Copyright (c) the yuvpipe authors. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */
use crate::planes::{check_i420_destination, check_i420_source, luma_plane_size};
use crate::yuv_support::YuvNVOrder;
use crate::YuvError;

fn nv_to_i420_impl<const NV_ORDER: u8>(
    src: &[u8],
    width: u32,
    height: u32,
    dst: &mut [u8],
) -> Result<(), YuvError> {
    let order: YuvNVOrder = NV_ORDER.into();
    check_i420_source(src, width, height)?;
    check_i420_destination(dst, width, height)?;

    let luma_size = luma_plane_size(width, height);
    let chroma_width = width.div_ceil(2) as usize;
    let uv_stride = 2 * chroma_width;

    let chroma_size = crate::planes::chroma_plane_size(width, height);
    let (src_y, src_uv) = src.split_at(luma_size);
    let (dst_y, dst_chroma) = dst.split_at_mut(luma_size);
    dst_y.copy_from_slice(&src_y[..luma_size]);
    let (dst_u, rest) = dst_chroma.split_at_mut(chroma_size);
    let dst_v = &mut rest[..chroma_size];

    for (uv_row, (u_row, v_row)) in src_uv
        .chunks_exact(uv_stride)
        .zip(dst_u.chunks_exact_mut(chroma_width).zip(dst_v.chunks_exact_mut(chroma_width)))
    {
        for ((uv, u), v) in uv_row
            .chunks_exact(2)
            .zip(u_row.iter_mut())
            .zip(v_row.iter_mut())
        {
            *u = uv[order.get_u_position()];
            *v = uv[order.get_v_position()];
        }
    }
    Ok(())
}

fn i420_to_nv_impl<const NV_ORDER: u8>(
    src: &[u8],
    width: u32,
    height: u32,
    dst: &mut [u8],
) -> Result<(), YuvError> {
    let order: YuvNVOrder = NV_ORDER.into();
    check_i420_source(src, width, height)?;
    check_i420_destination(dst, width, height)?;

    let luma_size = luma_plane_size(width, height);
    let chroma_width = width.div_ceil(2) as usize;
    let uv_stride = 2 * chroma_width;

    let chroma_size = crate::planes::chroma_plane_size(width, height);
    let (src_y, src_chroma) = src.split_at(luma_size);
    let (src_u, rest) = src_chroma.split_at(chroma_size);
    let src_v = &rest[..chroma_size];
    let (dst_y, dst_uv) = dst.split_at_mut(luma_size);
    dst_y.copy_from_slice(&src_y[..luma_size]);

    for (uv_row, (u_row, v_row)) in dst_uv
        .chunks_exact_mut(uv_stride)
        .zip(src_u.chunks_exact(chroma_width).zip(src_v.chunks_exact(chroma_width)))
    {
        for ((uv, u), v) in uv_row.chunks_exact_mut(2).zip(u_row.iter()).zip(v_row.iter()) {
            uv[order.get_u_position()] = *u;
            uv[order.get_v_position()] = *v;
        }
    }
    Ok(())
}

/// Converts an NV21 frame (Y plane followed by interleaved VU chroma) to
/// tightly packed I420.
///
/// A pure memory re-layout, no resampling and no data loss.
///
/// # Arguments
///
/// * `src`: Source NV21 buffer
/// * `width`: Image width
/// * `height`: Image height
/// * `dst`: Destination I420 buffer, same byte size as the source
///
/// returns: Result<(), [YuvError]>
///
pub fn nv21_to_i420(src: &[u8], width: u32, height: u32, dst: &mut [u8]) -> Result<(), YuvError> {
    nv_to_i420_impl::<{ YuvNVOrder::VU as u8 }>(src, width, height, dst)
}

/// Converts an NV12 frame (Y plane followed by interleaved UV chroma) to
/// tightly packed I420.
pub fn nv12_to_i420(src: &[u8], width: u32, height: u32, dst: &mut [u8]) -> Result<(), YuvError> {
    nv_to_i420_impl::<{ YuvNVOrder::UV as u8 }>(src, width, height, dst)
}

/// Converts a tightly packed I420 frame to NV21 (Y plane followed by
/// interleaved VU chroma).
///
/// The exact inverse of [`nv21_to_i420`].
///
/// # Arguments
///
/// * `src`: Source I420 buffer
/// * `width`: Image width
/// * `height`: Image height
/// * `dst`: Destination NV21 buffer, same byte size as the source
///
/// returns: Result<(), [YuvError]>
///
pub fn i420_to_nv21(src: &[u8], width: u32, height: u32, dst: &mut [u8]) -> Result<(), YuvError> {
    i420_to_nv_impl::<{ YuvNVOrder::VU as u8 }>(src, width, height, dst)
}

/// Converts a tightly packed I420 frame to NV12 (Y plane followed by
/// interleaved UV chroma).
pub fn i420_to_nv12(src: &[u8], width: u32, height: u32, dst: &mut [u8]) -> Result<(), YuvError> {
    i420_to_nv_impl::<{ YuvNVOrder::UV as u8 }>(src, width, height, dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i420_buffer_size;
    use rand::Rng;

    #[test]
    fn nv21_deinterleaves_vu() {
        // 4x2: Y is 8 bytes, interleaved chroma row is V,U,V,U.
        let src = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let mut dst = [0u8; 12];
        nv21_to_i420(&src, 4, 2, &mut dst).unwrap();
        assert_eq!(&dst[..8], &src[..8]);
        assert_eq!(&dst[8..10], &[10, 12], "U plane");
        assert_eq!(&dst[10..12], &[9, 11], "V plane");

        let mut back = [0u8; 12];
        i420_to_nv21(&dst, 4, 2, &mut back).unwrap();
        assert_eq!(back, src);
    }

    #[test]
    fn nv12_deinterleaves_uv() {
        let src = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let mut dst = [0u8; 12];
        nv12_to_i420(&src, 4, 2, &mut dst).unwrap();
        assert_eq!(&dst[8..10], &[9, 11], "U plane");
        assert_eq!(&dst[10..12], &[10, 12], "V plane");
    }

    #[test]
    fn round_trip_is_lossless() {
        let (w, h) = (64u32, 48u32);
        let mut rng = rand::rng();
        let src: Vec<u8> = (0..i420_buffer_size(w, h))
            .map(|_| rng.random_range(0..=255u8))
            .collect();
        let mut planar = vec![0u8; src.len()];
        let mut back = vec![0u8; src.len()];
        nv21_to_i420(&src, w, h, &mut planar).unwrap();
        i420_to_nv21(&planar, w, h, &mut back).unwrap();
        assert_eq!(src, back);

        i420_to_nv12(&src, w, h, &mut planar).unwrap();
        nv12_to_i420(&planar, w, h, &mut back).unwrap();
        assert_eq!(src, back);
    }

    #[test]
    fn undersized_destination_is_rejected() {
        let src = [0u8; 12];
        let mut dst = [0u8; 11];
        assert!(nv21_to_i420(&src, 4, 2, &mut dst).is_err());
    }
}
