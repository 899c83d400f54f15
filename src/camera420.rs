/*
 * // Copyright (c) the yuvpipe authors. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */
use crate::geometry::rotate_plane;
use crate::images::Camera420Image;
use crate::planes::{
    check_i420_destination, chroma_plane_size, chroma_stride, rotated_luma_stride, split_i420_mut,
};
use crate::{RotationMode, YuvError};

/// Gathers one strided chroma plane into a tightly packed destination.
fn gather_chroma_plane(
    src: &[u8],
    src_stride: usize,
    pixel_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    width: usize,
) {
    for (src_row, dst_row) in src.chunks(src_stride).zip(dst.chunks_mut(dst_stride)) {
        for (dst_px, src_px) in dst_row[..width]
            .iter_mut()
            .zip(src_row.iter().step_by(pixel_stride))
        {
            *dst_px = *src_px;
        }
    }
}

/// Converts a camera-native 4:2:0 capture to tightly packed I420, applying an
/// optional rotation in the same pass.
///
/// Handles both fully planar chroma (`uv_pixel_stride == 1`) and interleaved
/// semi-planar chroma (`uv_pixel_stride == 2`, Android `YUV_420_888` style)
/// transparently. For 90 and 270 degree rotations the destination describes a
/// `height`x`width` frame; its luma stride equals the source height and the
/// chroma strides derive from that swapped stride.
///
/// # Arguments
///
/// * `src`: Camera capture planes, see [Camera420Image]
/// * `dst`: Destination I420 buffer of [`i420_buffer_size`](crate::i420_buffer_size) bytes
/// * `rotation`: Refer to [RotationMode] for mode info
///
/// returns: Result<(), [YuvError]>
///
pub fn camera420_to_i420(
    src: &Camera420Image,
    dst: &mut [u8],
    rotation: RotationMode,
) -> Result<(), YuvError> {
    src.check_constraints()?;
    check_i420_destination(dst, src.width, src.height)?;

    let width = src.width;
    let height = src.height;
    let dst_luma_stride = rotated_luma_stride(width, height, rotation);
    let dst_chroma_stride = chroma_stride(dst_luma_stride) as usize;

    let chroma_width = width.div_ceil(2) as usize;
    let chroma_height = height.div_ceil(2) as usize;

    let (dst_y, dst_u, dst_v) = split_i420_mut(dst, width, height);

    rotate_plane(
        src.y_plane,
        src.y_stride as usize,
        dst_y,
        dst_luma_stride as usize,
        width as usize,
        height as usize,
        rotation,
    )?;

    if src.uv_pixel_stride == 1 {
        rotate_plane(
            src.u_plane,
            src.u_stride as usize,
            dst_u,
            dst_chroma_stride,
            chroma_width,
            chroma_height,
            rotation,
        )?;
        rotate_plane(
            src.v_plane,
            src.v_stride as usize,
            dst_v,
            dst_chroma_stride,
            chroma_width,
            chroma_height,
            rotation,
        )?;
    } else if rotation == RotationMode::Rotate0 {
        gather_chroma_plane(
            src.u_plane,
            src.u_stride as usize,
            src.uv_pixel_stride as usize,
            dst_u,
            dst_chroma_stride,
            chroma_width,
        );
        gather_chroma_plane(
            src.v_plane,
            src.v_stride as usize,
            src.uv_pixel_stride as usize,
            dst_v,
            dst_chroma_stride,
            chroma_width,
        );
    } else {
        // Interleaved chroma cannot be rotated in place; deinterleave into a
        // call-local scratch first, then rotate into the caller's planes.
        let chroma_size = chroma_plane_size(width, height);
        let mut scratch = vec![0u8; 2 * chroma_size];
        let (tmp_u, tmp_v) = scratch.split_at_mut(chroma_size);
        gather_chroma_plane(
            src.u_plane,
            src.u_stride as usize,
            src.uv_pixel_stride as usize,
            tmp_u,
            chroma_width,
            chroma_width,
        );
        gather_chroma_plane(
            src.v_plane,
            src.v_stride as usize,
            src.uv_pixel_stride as usize,
            tmp_v,
            chroma_width,
            chroma_width,
        );
        rotate_plane(
            tmp_u,
            chroma_width,
            dst_u,
            dst_chroma_stride,
            chroma_width,
            chroma_height,
            rotation,
        )?;
        rotate_plane(
            tmp_v,
            chroma_width,
            dst_v,
            dst_chroma_stride,
            chroma_width,
            chroma_height,
            rotation,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{i420_buffer_size, i420_rotate, nv21_to_i420};
    use rand::Rng;

    fn random_nv21(width: u32, height: u32) -> Vec<u8> {
        let mut rng = rand::rng();
        (0..i420_buffer_size(width, height))
            .map(|_| rng.random_range(0..=255u8))
            .collect()
    }

    fn camera_view_of_nv21(nv21: &[u8], width: u32, height: u32) -> Camera420Image<'_> {
        let luma = (width * height) as usize;
        Camera420Image {
            y_plane: &nv21[..luma],
            y_stride: width,
            // NV21 chroma order is V then U.
            u_plane: &nv21[luma + 1..],
            u_stride: 2 * width.div_ceil(2),
            v_plane: &nv21[luma..],
            v_stride: 2 * width.div_ceil(2),
            uv_pixel_stride: 2,
            width,
            height,
        }
    }

    #[test]
    fn interleaved_chroma_matches_nv21_path() {
        let (w, h) = (8u32, 6u32);
        let nv21 = random_nv21(w, h);
        let camera = camera_view_of_nv21(&nv21, w, h);

        let mut via_camera = vec![0u8; nv21.len()];
        let mut via_nv = vec![0u8; nv21.len()];
        camera420_to_i420(&camera, &mut via_camera, RotationMode::Rotate0).unwrap();
        nv21_to_i420(&nv21, w, h, &mut via_nv).unwrap();
        assert_eq!(via_camera, via_nv);
    }

    #[test]
    fn planar_chroma_is_copied() {
        let (w, h) = (4u32, 4u32);
        let mut rng = rand::rng();
        let i420: Vec<u8> = (0..i420_buffer_size(w, h))
            .map(|_| rng.random_range(0..=255u8))
            .collect();
        let luma = (w * h) as usize;
        let chroma = i420_buffer_size(w, h) - luma;
        let camera = Camera420Image {
            y_plane: &i420[..luma],
            y_stride: w,
            u_plane: &i420[luma..luma + chroma / 2],
            u_stride: w.div_ceil(2),
            v_plane: &i420[luma + chroma / 2..],
            v_stride: w.div_ceil(2),
            uv_pixel_stride: 1,
            width: w,
            height: h,
        };
        let mut dst = vec![0u8; i420.len()];
        camera420_to_i420(&camera, &mut dst, RotationMode::Rotate0).unwrap();
        assert_eq!(dst, i420);
    }

    #[test]
    fn fused_rotation_matches_separate_rotation() {
        let (w, h) = (8u32, 6u32);
        let nv21 = random_nv21(w, h);
        let camera = camera_view_of_nv21(&nv21, w, h);

        for rotation in [
            RotationMode::Rotate90,
            RotationMode::Rotate180,
            RotationMode::Rotate270,
        ] {
            let mut fused = vec![0u8; nv21.len()];
            camera420_to_i420(&camera, &mut fused, rotation).unwrap();

            let mut planar = vec![0u8; nv21.len()];
            let mut rotated = vec![0u8; nv21.len()];
            nv21_to_i420(&nv21, w, h, &mut planar).unwrap();
            i420_rotate(&planar, w, h, &mut rotated, rotation).unwrap();
            assert_eq!(fused, rotated, "{rotation:?}");
        }
    }

    #[test]
    fn padded_luma_stride_is_honored() {
        let (w, h) = (4u32, 2u32);
        // Luma rows padded to 6 bytes.
        let y = [1u8, 2, 3, 4, 0, 0, 5, 6, 7, 8, 0, 0];
        let u = [20u8, 21];
        let v = [30u8, 31];
        let camera = Camera420Image {
            y_plane: &y,
            y_stride: 6,
            u_plane: &u,
            u_stride: 2,
            v_plane: &v,
            v_stride: 2,
            uv_pixel_stride: 1,
            width: w,
            height: h,
        };
        let mut dst = vec![0u8; i420_buffer_size(w, h)];
        camera420_to_i420(&camera, &mut dst, RotationMode::Rotate0).unwrap();
        assert_eq!(dst, [1, 2, 3, 4, 5, 6, 7, 8, 20, 21, 30, 31]);
    }
}
