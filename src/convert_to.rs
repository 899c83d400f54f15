/*
 * // Copyright (c) the yuvpipe authors. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */
use crate::fourcc::FourCc;
use crate::geometry::{i420_rotate, RotationMode};
use crate::numerics::{avg2, avg4, qrshr};
use crate::planes::{
    chroma_plane_size, copy_plane, i420_buffer_size, luma_plane_size, split_i420_mut, CropRect,
};
use crate::yuv_error::{CropViolation, MismatchedSize};
use crate::yuv_support::{
    get_forward_transform, get_yuv_range, CbCrForwardTransform, YuvRange, YuvSourceChannels,
    YuvStandardMatrix, Yuy2Description,
};
use crate::YuvError;

const PRECISION: i32 = 13;

fn bt601_tv_forward() -> (CbCrForwardTransform<i32>, i32, i32) {
    let range = get_yuv_range(8, YuvRange::TV);
    let kr_kb = YuvStandardMatrix::Bt601.get_kr_kb();
    let transform = get_forward_transform(255, range.range_y, range.range_uv, kr_kb.kr, kr_kb.kb)
        .to_integers(PRECISION as u32);
    (
        transform,
        (range.bias_y as i32) << PRECISION,
        (range.bias_uv as i32) << PRECISION,
    )
}

/// Crops aligned sub-views out of a planar 4:2:0 source.
#[allow(clippy::too_many_arguments)]
fn crop_planar(
    src: &[u8],
    src_width: u32,
    src_height: u32,
    crop_x: u32,
    crop_y: u32,
    width: u32,
    height: u32,
    dst: &mut [u8],
    swap_uv: bool,
) -> Result<(), YuvError> {
    let sw = src_width as usize;
    let scw = src_width.div_ceil(2) as usize;
    let luma = luma_plane_size(src_width, src_height);
    let chroma = chroma_plane_size(src_width, src_height);

    let src_y = &src[..luma];
    let src_first = &src[luma..luma + chroma];
    let src_second = &src[luma + chroma..luma + 2 * chroma];
    let (src_u, src_v) = if swap_uv {
        (src_second, src_first)
    } else {
        (src_first, src_second)
    };

    let (dst_y, dst_u, dst_v) = split_i420_mut(dst, width, height);

    let cw = width.div_ceil(2) as usize;
    let chh = height.div_ceil(2) as usize;
    let chroma_offset = (crop_y / 2) as usize * scw + (crop_x / 2) as usize;

    copy_plane(
        &src_y[crop_y as usize * sw + crop_x as usize..],
        sw,
        dst_y,
        width as usize,
        width as usize,
        height as usize,
    )?;
    copy_plane(&src_u[chroma_offset..], scw, dst_u, cw, cw, chh)?;
    copy_plane(&src_v[chroma_offset..], scw, dst_v, cw, cw, chh)?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn crop_semiplanar(
    src: &[u8],
    src_width: u32,
    src_height: u32,
    crop_x: u32,
    crop_y: u32,
    width: u32,
    height: u32,
    dst: &mut [u8],
    u_position: usize,
) -> Result<(), YuvError> {
    let sw = src_width as usize;
    let scw = src_width.div_ceil(2) as usize;
    let uv_stride = 2 * scw;
    let luma = luma_plane_size(src_width, src_height);
    let src_y = &src[..luma];
    let src_uv = &src[luma..luma + 2 * chroma_plane_size(src_width, src_height)];

    let (dst_y, dst_u, dst_v) = split_i420_mut(dst, width, height);
    let cw = width.div_ceil(2) as usize;
    let chh = height.div_ceil(2) as usize;

    copy_plane(
        &src_y[crop_y as usize * sw + crop_x as usize..],
        sw,
        dst_y,
        width as usize,
        width as usize,
        height as usize,
    )?;

    let first_row = (crop_y / 2) as usize;
    let col_offset = 2 * (crop_x / 2) as usize;
    for r in 0..chh {
        let uv_row = &src_uv[(first_row + r) * uv_stride + col_offset..][..2 * cw];
        let u_row = &mut dst_u[r * cw..r * cw + cw];
        let v_row = &mut dst_v[r * cw..r * cw + cw];
        for ((uv, u), v) in uv_row.chunks_exact(2).zip(u_row.iter_mut()).zip(v_row.iter_mut()) {
            *u = uv[u_position];
            *v = uv[1 - u_position];
        }
    }
    Ok(())
}

/// Unpacks 4:2:2 macropixels into 4:2:0 planes, averaging chroma over row
/// pairs.
#[allow(clippy::too_many_arguments)]
fn crop_yuy2_impl<const PACKING: usize>(
    src: &[u8],
    src_width: u32,
    src_height: u32,
    crop_x: u32,
    crop_y: u32,
    width: u32,
    height: u32,
    dst: &mut [u8],
) {
    let packing: Yuy2Description = PACKING.into();
    let stride = 4 * src_width.div_ceil(2) as usize;
    let (dst_y, dst_u, dst_v) = split_i420_mut(dst, width, height);

    let w = width as usize;
    for y in 0..height as usize {
        let src_row = &src[(crop_y as usize + y) * stride..][..stride];
        let dst_row = &mut dst_y[y * w..y * w + w];
        for (x, dst_px) in dst_row.iter_mut().enumerate() {
            let g = crop_x as usize + x;
            let position = if g % 2 == 0 {
                packing.get_first_y_position()
            } else {
                packing.get_second_y_position()
            };
            *dst_px = src_row[4 * (g / 2) + position];
        }
    }

    let cw = width.div_ceil(2) as usize;
    let chh = height.div_ceil(2) as usize;
    let last_row = src_height as usize - 1;
    let macro_offset = (crop_x / 2) as usize;
    for cy in 0..chh {
        let top = crop_y as usize + 2 * cy;
        let bottom = (top + 1).min(last_row);
        let row0 = &src[top * stride..][..stride];
        let row1 = &src[bottom * stride..][..stride];
        for cx in 0..cw {
            let m = 4 * (macro_offset + cx);
            dst_u[cy * cw + cx] = avg2(
                row0[m + packing.get_u_position()],
                row1[m + packing.get_u_position()],
            );
            dst_v[cy * cw + cx] = avg2(
                row0[m + packing.get_v_position()],
                row1[m + packing.get_v_position()],
            );
        }
    }
}

/// Shared RGB-family front end: `at` fetches one source pixel by global
/// coordinates. Chroma is sited on 2x2 blocks with edge replication for odd
/// crop dimensions.
#[allow(clippy::too_many_arguments)]
fn rgb_like_to_i420(
    at: impl Fn(usize, usize) -> (u8, u8, u8),
    crop_x: u32,
    crop_y: u32,
    width: u32,
    height: u32,
    dst: &mut [u8],
) {
    let (transform, bias_y, bias_uv) = bt601_tv_forward();
    let (dst_y, dst_u, dst_v) = split_i420_mut(dst, width, height);

    let w = width as usize;
    let h = height as usize;
    let x0 = crop_x as usize;
    let y0 = crop_y as usize;

    for y in 0..h {
        let dst_row = &mut dst_y[y * w..y * w + w];
        for (x, dst_px) in dst_row.iter_mut().enumerate() {
            let (r, g, b) = at(x0 + x, y0 + y);
            let (r, g, b) = (r as i32, g as i32, b as i32);
            *dst_px = qrshr::<PRECISION, 8>(
                transform.yr * r + transform.yg * g + transform.yb * b + bias_y,
            ) as u8;
        }
    }

    let cw = width.div_ceil(2) as usize;
    let chh = height.div_ceil(2) as usize;
    for cy in 0..chh {
        for cx in 0..cw {
            let px0 = 2 * cx;
            let px1 = (2 * cx + 1).min(w - 1);
            let py0 = 2 * cy;
            let py1 = (2 * cy + 1).min(h - 1);
            let (r00, g00, b00) = at(x0 + px0, y0 + py0);
            let (r10, g10, b10) = at(x0 + px1, y0 + py0);
            let (r01, g01, b01) = at(x0 + px0, y0 + py1);
            let (r11, g11, b11) = at(x0 + px1, y0 + py1);
            let r = avg4(r00, r10, r01, r11);
            let g = avg4(g00, g10, g01, g11);
            let b = avg4(b00, b10, b01, b11);
            dst_u[cy * cw + cx] = qrshr::<PRECISION, 8>(
                transform.cb_r * r + transform.cb_g * g + transform.cb_b * b + bias_uv,
            ) as u8;
            dst_v[cy * cw + cx] = qrshr::<PRECISION, 8>(
                transform.cr_r * r + transform.cr_g * g + transform.cr_b * b + bias_uv,
            ) as u8;
        }
    }
}

#[inline]
fn expand5(v: u16) -> u8 {
    ((v << 3) | (v >> 2)) as u8
}

#[inline]
fn expand6(v: u16) -> u8 {
    ((v << 2) | (v >> 4)) as u8
}

#[allow(clippy::too_many_arguments)]
fn extract_cropped_i420(
    src: &[u8],
    src_width: u32,
    src_height: u32,
    crop_x: u32,
    crop_y: u32,
    width: u32,
    height: u32,
    dst: &mut [u8],
    fourcc: FourCc,
) -> Result<(), YuvError> {
    match fourcc {
        FourCc::I420 => crop_planar(
            src, src_width, src_height, crop_x, crop_y, width, height, dst, false,
        ),
        FourCc::Yv12 => crop_planar(
            src, src_width, src_height, crop_x, crop_y, width, height, dst, true,
        ),
        FourCc::Nv12 => crop_semiplanar(
            src, src_width, src_height, crop_x, crop_y, width, height, dst, 0,
        ),
        FourCc::Nv21 => crop_semiplanar(
            src, src_width, src_height, crop_x, crop_y, width, height, dst, 1,
        ),
        FourCc::I400 => {
            let sw = src_width as usize;
            let (dst_y, dst_u, dst_v) = split_i420_mut(dst, width, height);
            copy_plane(
                &src[crop_y as usize * sw + crop_x as usize..],
                sw,
                dst_y,
                width as usize,
                width as usize,
                height as usize,
            )?;
            dst_u.fill(0x80);
            dst_v.fill(0x80);
            Ok(())
        }
        FourCc::Yuy2 => {
            crop_yuy2_impl::<{ Yuy2Description::YUYV as usize }>(
                src, src_width, src_height, crop_x, crop_y, width, height, dst,
            );
            Ok(())
        }
        FourCc::Uyvy => {
            crop_yuy2_impl::<{ Yuy2Description::UYVY as usize }>(
                src, src_width, src_height, crop_x, crop_y, width, height, dst,
            );
            Ok(())
        }
        FourCc::Rgb24 | FourCc::Raw => {
            let chans = if fourcc == FourCc::Rgb24 {
                YuvSourceChannels::Bgr
            } else {
                YuvSourceChannels::Rgb
            };
            let stride = 3 * src_width as usize;
            let (ro, go, bo) = (
                chans.get_r_channel_offset(),
                chans.get_g_channel_offset(),
                chans.get_b_channel_offset(),
            );
            rgb_like_to_i420(
                |x, y| {
                    let px = &src[y * stride + 3 * x..y * stride + 3 * x + 3];
                    (px[ro], px[go], px[bo])
                },
                crop_x,
                crop_y,
                width,
                height,
                dst,
            );
            Ok(())
        }
        FourCc::Argb | FourCc::Bgra | FourCc::Abgr | FourCc::Rgba => {
            let chans = match fourcc {
                FourCc::Argb => YuvSourceChannels::Argb,
                FourCc::Bgra => YuvSourceChannels::Bgra,
                FourCc::Abgr => YuvSourceChannels::Abgr,
                _ => YuvSourceChannels::Rgba,
            };
            let stride = 4 * src_width as usize;
            let (ro, go, bo) = (
                chans.get_r_channel_offset(),
                chans.get_g_channel_offset(),
                chans.get_b_channel_offset(),
            );
            rgb_like_to_i420(
                |x, y| {
                    let px = &src[y * stride + 4 * x..y * stride + 4 * x + 4];
                    (px[ro], px[go], px[bo])
                },
                crop_x,
                crop_y,
                width,
                height,
                dst,
            );
            Ok(())
        }
        FourCc::Rgb565 => {
            let stride = 2 * src_width as usize;
            rgb_like_to_i420(
                |x, y| {
                    let lo = src[y * stride + 2 * x];
                    let hi = src[y * stride + 2 * x + 1];
                    let v = u16::from_le_bytes([lo, hi]);
                    (
                        expand5((v >> 11) & 0x1F),
                        expand6((v >> 5) & 0x3F),
                        expand5(v & 0x1F),
                    )
                },
                crop_x,
                crop_y,
                width,
                height,
                dst,
            );
            Ok(())
        }
        _ => Err(YuvError::UnsupportedFourCc(fourcc.code())),
    }
}

/// Converts a region of a tagged source buffer into a tightly packed I420
/// frame, with an optional rotation fused into the same call.
///
/// The crop rectangle is given in source coordinates before rotation; its
/// origin is aligned down to even coordinates so chroma blocks stay intact.
/// The destination holds a `crop.width`x`crop.height` frame, dimensions
/// swapped for quarter turns in the usual way. RGB family sources go through
/// the fixed BT.601 limited-range matrix with 2x2 chroma averaging; packed
/// 4:2:2 sources average chroma over row pairs.
///
/// # Arguments
///
/// * `src`: Source buffer in the layout of `fourcc`
/// * `src_width`: Source image width
/// * `src_height`: Source image height
/// * `dst`: Destination I420 buffer for the cropped frame
/// * `crop`: Source-space region to extract, see [CropRect]
/// * `rotation`: Refer to [RotationMode] for mode info
/// * `fourcc`: Source layout tag
///
/// returns: Result<(), [YuvError]>
///
pub fn convert_to_i420(
    src: &[u8],
    src_width: u32,
    src_height: u32,
    dst: &mut [u8],
    crop: CropRect,
    rotation: RotationMode,
    fourcc: FourCc,
) -> Result<(), YuvError> {
    if src_width == 0 || src_height == 0 || crop.width == 0 || crop.height == 0 {
        return Err(YuvError::ZeroBaseSize);
    }
    let crop_x = crop.x & !1;
    let crop_y = crop.y & !1;
    if crop_x.checked_add(crop.width).map_or(true, |x| x > src_width)
        || crop_y.checked_add(crop.height).map_or(true, |y| y > src_height)
    {
        return Err(YuvError::CropOutOfBounds(CropViolation {
            crop_x: crop.x,
            crop_y: crop.y,
            crop_width: crop.width,
            crop_height: crop.height,
            image_width: src_width,
            image_height: src_height,
        }));
    }
    let src_required = fourcc.buffer_size(src_width, src_height);
    if src.len() < src_required {
        return Err(YuvError::MinimumSourceSizeMismatch(MismatchedSize {
            expected: src_required,
            received: src.len(),
        }));
    }
    let dst_required = i420_buffer_size(crop.width, crop.height);
    if dst.len() < dst_required {
        return Err(YuvError::MinimumDestinationSizeMismatch(MismatchedSize {
            expected: dst_required,
            received: dst.len(),
        }));
    }

    if rotation == RotationMode::Rotate0 {
        return extract_cropped_i420(
            src, src_width, src_height, crop_x, crop_y, crop.width, crop.height, dst, fourcc,
        );
    }

    // Packed and interleaved sources cannot be rotated plane-wise, so the
    // cropped frame is assembled first and rotated in a second pass.
    let mut staged = vec![0u8; i420_buffer_size(crop.width, crop.height)];
    extract_cropped_i420(
        src,
        src_width,
        src_height,
        crop_x,
        crop_y,
        crop.width,
        crop.height,
        &mut staged,
        fourcc,
    )?;
    i420_rotate(&staged, crop.width, crop.height, dst, rotation)
}

/// Crops a tightly packed I420 frame.
///
/// Equivalent to [convert_to_i420] with an I420 source and no rotation; the
/// crop origin is aligned down to even coordinates.
///
/// # Arguments
///
/// * `src`: Source I420 buffer
/// * `width`: Source image width
/// * `height`: Source image height
/// * `dst`: Destination I420 buffer for the cropped frame
/// * `crop`: Source-space region to extract, see [CropRect]
///
/// returns: Result<(), [YuvError]>
///
pub fn i420_crop(
    src: &[u8],
    width: u32,
    height: u32,
    dst: &mut [u8],
    crop: CropRect,
) -> Result<(), YuvError> {
    convert_to_i420(
        src,
        width,
        height,
        dst,
        crop,
        RotationMode::Rotate0,
        FourCc::I420,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{convert_from_i420, nv21_to_i420};
    use rand::Rng;

    fn random_bytes(len: usize) -> Vec<u8> {
        let mut rng = rand::rng();
        (0..len).map(|_| rng.random_range(0..=255u8)).collect()
    }

    #[test]
    fn full_frame_i420_is_identity() {
        let (w, h) = (6u32, 4u32);
        let src = random_bytes(i420_buffer_size(w, h));
        let mut dst = vec![0u8; src.len()];
        i420_crop(&src, w, h, &mut dst, CropRect::full(w, h)).unwrap();
        assert_eq!(src, dst);
    }

    #[test]
    fn crop_picks_the_right_window() {
        // 4x4 frame, luma 0..16, chroma planes 2x2.
        #[rustfmt::skip]
        let src = [
            0u8, 1, 2, 3,
            4, 5, 6, 7,
            8, 9, 10, 11,
            12, 13, 14, 15,
            20, 21, 22, 23,
            30, 31, 32, 33,
        ];
        let mut dst = [0u8; 6];
        i420_crop(&src, 4, 4, &mut dst, CropRect::new(2, 2, 2, 2)).unwrap();
        assert_eq!(dst, [10, 11, 14, 15, 23, 33]);
    }

    #[test]
    fn odd_crop_origin_aligns_down() {
        #[rustfmt::skip]
        let src = [
            0u8, 1, 2, 3,
            4, 5, 6, 7,
            8, 9, 10, 11,
            12, 13, 14, 15,
            20, 21, 22, 23,
            30, 31, 32, 33,
        ];
        let mut odd = [0u8; 6];
        let mut even = [0u8; 6];
        i420_crop(&src, 4, 4, &mut odd, CropRect::new(1, 1, 2, 2)).unwrap();
        i420_crop(&src, 4, 4, &mut even, CropRect::new(0, 0, 2, 2)).unwrap();
        assert_eq!(odd, even);
        assert_eq!(even, [0, 1, 4, 5, 20, 30]);
    }

    #[test]
    fn out_of_bounds_crop_is_descriptive() {
        let (w, h) = (4u32, 4u32);
        let src = random_bytes(i420_buffer_size(w, h));
        let mut dst = [0u8; 6];
        let err = i420_crop(&src, w, h, &mut dst, CropRect::new(4, 0, 2, 2)).unwrap_err();
        match err {
            YuvError::CropOutOfBounds(v) => {
                assert_eq!(v.crop_x, 4);
                assert_eq!(v.crop_width, 2);
                assert_eq!(v.image_width, 4);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn nv21_full_frame_matches_dedicated_path() {
        let (w, h) = (8u32, 6u32);
        let src = random_bytes(FourCc::Nv21.buffer_size(w, h));
        let mut via_tag = vec![0u8; src.len()];
        let mut via_fn = vec![0u8; src.len()];
        convert_to_i420(
            &src,
            w,
            h,
            &mut via_tag,
            CropRect::full(w, h),
            RotationMode::Rotate0,
            FourCc::Nv21,
        )
        .unwrap();
        nv21_to_i420(&src, w, h, &mut via_fn).unwrap();
        assert_eq!(via_tag, via_fn);
    }

    #[test]
    fn fused_rotation_matches_crop_then_rotate() {
        let (w, h) = (8u32, 6u32);
        let src = random_bytes(FourCc::Nv12.buffer_size(w, h));
        let crop = CropRect::new(2, 2, 4, 2);

        for rotation in [
            RotationMode::Rotate90,
            RotationMode::Rotate180,
            RotationMode::Rotate270,
        ] {
            let mut fused = vec![0u8; i420_buffer_size(crop.width, crop.height)];
            convert_to_i420(&src, w, h, &mut fused, crop, rotation, FourCc::Nv12).unwrap();

            let mut cropped = vec![0u8; fused.len()];
            let mut rotated = vec![0u8; fused.len()];
            convert_to_i420(
                &src,
                w,
                h,
                &mut cropped,
                crop,
                RotationMode::Rotate0,
                FourCc::Nv12,
            )
            .unwrap();
            crate::i420_rotate(&cropped, crop.width, crop.height, &mut rotated, rotation).unwrap();
            assert_eq!(fused, rotated, "{rotation:?}");
        }
    }

    #[test]
    fn i400_fills_neutral_chroma() {
        let (w, h) = (4u32, 2u32);
        let src = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let mut dst = [0u8; 12];
        convert_to_i420(
            &src,
            w,
            h,
            &mut dst,
            CropRect::full(w, h),
            RotationMode::Rotate0,
            FourCc::I400,
        )
        .unwrap();
        assert_eq!(&dst[..8], &src);
        assert!(dst[8..].iter().all(|&px| px == 0x80));
    }

    #[test]
    fn yuy2_uniform_frame_unpacks_uniformly() {
        let (w, h) = (4u32, 4u32);
        let src: Vec<u8> = std::iter::repeat([90u8, 54, 90, 34])
            .take((w.div_ceil(2) * h) as usize)
            .flatten()
            .collect();
        let mut dst = vec![0u8; i420_buffer_size(w, h)];
        convert_to_i420(
            &src,
            w,
            h,
            &mut dst,
            CropRect::full(w, h),
            RotationMode::Rotate0,
            FourCc::Yuy2,
        )
        .unwrap();
        let luma = luma_plane_size(w, h);
        let chroma = chroma_plane_size(w, h);
        assert!(dst[..luma].iter().all(|&px| px == 90));
        assert!(dst[luma..luma + chroma].iter().all(|&px| px == 54));
        assert!(dst[luma + chroma..].iter().all(|&px| px == 34));
    }

    #[test]
    fn argb_uniform_round_trip_is_close() {
        let (w, h) = (4u32, 4u32);
        let color = [255u8, 200, 50, 100];
        let src: Vec<u8> = std::iter::repeat(color)
            .take((w * h) as usize)
            .flatten()
            .collect();
        let mut planar = vec![0u8; i420_buffer_size(w, h)];
        convert_to_i420(
            &src,
            w,
            h,
            &mut planar,
            CropRect::full(w, h),
            RotationMode::Rotate0,
            FourCc::Argb,
        )
        .unwrap();
        let mut back = vec![0u8; src.len()];
        convert_from_i420(&planar, w, h, &mut back, 0, FourCc::Argb).unwrap();
        for px in back.chunks_exact(4) {
            assert_eq!(px[0], 255, "alpha stays opaque");
            for c in 1..4 {
                let diff = (px[c] as i32 - color[c] as i32).abs();
                assert!(diff <= 8, "channel {c} off by {diff}");
            }
        }
    }

    #[test]
    fn undersized_source_is_rejected() {
        let (w, h) = (4u32, 4u32);
        let src = [0u8; 10];
        let mut dst = [0u8; 24];
        assert!(matches!(
            convert_to_i420(
                &src,
                w,
                h,
                &mut dst,
                CropRect::full(w, h),
                RotationMode::Rotate0,
                FourCc::I420
            ),
            Err(YuvError::MinimumSourceSizeMismatch(_))
        ));
    }

    #[test]
    fn unsupported_tags_are_rejected() {
        let (w, h) = (4u32, 2u32);
        let src = random_bytes(FourCc::Ar30.buffer_size(w, h));
        let mut dst = vec![0u8; i420_buffer_size(w, h)];
        assert!(matches!(
            convert_to_i420(
                &src,
                w,
                h,
                &mut dst,
                CropRect::full(w, h),
                RotationMode::Rotate0,
                FourCc::Ar30
            ),
            Err(YuvError::UnsupportedFourCc(_))
        ));
    }
}
