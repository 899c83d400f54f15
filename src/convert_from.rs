/*
 * // Copyright (c) the yuvpipe authors. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */
use crate::fourcc::FourCc;
use crate::numerics::qrshr;
use crate::planes::{
    check_i420_source, chroma_stride, copy_plane, split_i420,
};
use crate::yuv_error::MismatchedSize;
use crate::yuv_support::{
    get_inverse_transform, get_yuv_range, YuvRange, YuvSourceChannels, YuvStandardMatrix,
    Yuy2Description,
};
use crate::YuvError;

const PRECISION: i32 = 13;

/// Fixed-point BT.601 limited-range YUV to RGB coefficients.
struct InverseCoeffs {
    y_coef: i32,
    cr_coef: i32,
    cb_coef: i32,
    g_coeff_1: i32,
    g_coeff_2: i32,
    bias_y: i32,
    bias_uv: i32,
}

fn bt601_tv_inverse() -> InverseCoeffs {
    let range = get_yuv_range(8, YuvRange::TV);
    let kr_kb = YuvStandardMatrix::Bt601.get_kr_kb();
    let transform = get_inverse_transform(255, range.range_y, range.range_uv, kr_kb.kr, kr_kb.kb)
        .to_integers(PRECISION as u32);
    InverseCoeffs {
        y_coef: transform.y_coef,
        cr_coef: transform.cr_coef,
        cb_coef: transform.cb_coef,
        g_coeff_1: transform.g_coeff_1,
        g_coeff_2: transform.g_coeff_2,
        bias_y: range.bias_y as i32,
        bias_uv: range.bias_uv as i32,
    }
}

#[inline]
fn ensure_dst_len(dst: &[u8], required: usize) -> Result<(), YuvError> {
    if dst.len() < required {
        return Err(YuvError::MinimumDestinationSizeMismatch(MismatchedSize {
            expected: required,
            received: dst.len(),
        }));
    }
    Ok(())
}

fn i420_to_planar(
    src_y: &[u8],
    src_u: &[u8],
    src_v: &[u8],
    width: u32,
    height: u32,
    dst: &mut [u8],
    luma_stride: usize,
    swap_uv: bool,
) -> Result<(), YuvError> {
    let cw = width.div_ceil(2) as usize;
    let ch = height.div_ceil(2) as usize;
    let cs = chroma_stride(luma_stride as u32) as usize;
    let luma_region = luma_stride * height as usize;
    let chroma_region = cs * ch;
    ensure_dst_len(dst, luma_region + chroma_region + cs * (ch - 1) + cw)?;

    let (dst_y, dst_chroma) = dst.split_at_mut(luma_region);
    let (dst_first, dst_second) = dst_chroma.split_at_mut(chroma_region);
    let (chroma_a, chroma_b) = if swap_uv { (src_v, src_u) } else { (src_u, src_v) };

    copy_plane(
        src_y,
        width as usize,
        dst_y,
        luma_stride,
        width as usize,
        height as usize,
    )?;
    copy_plane(chroma_a, cw, dst_first, cs, cw, ch)?;
    copy_plane(chroma_b, cw, dst_second, cs, cw, ch)?;
    Ok(())
}

fn i420_to_semiplanar(
    src_y: &[u8],
    src_u: &[u8],
    src_v: &[u8],
    width: u32,
    height: u32,
    dst: &mut [u8],
    luma_stride: usize,
    u_position: usize,
) -> Result<(), YuvError> {
    let cw = width.div_ceil(2) as usize;
    let ch = height.div_ceil(2) as usize;
    let uv_stride = 2 * chroma_stride(luma_stride as u32) as usize;
    let luma_region = luma_stride * height as usize;
    ensure_dst_len(dst, luma_region + uv_stride * (ch - 1) + 2 * cw)?;

    let (dst_y, dst_uv) = dst.split_at_mut(luma_region);
    copy_plane(
        src_y,
        width as usize,
        dst_y,
        luma_stride,
        width as usize,
        height as usize,
    )?;
    for (uv_row, (u_row, v_row)) in dst_uv
        .chunks_mut(uv_stride)
        .take(ch)
        .zip(src_u.chunks(cw).zip(src_v.chunks(cw)))
    {
        for ((uv, u), v) in uv_row[..2 * cw]
            .chunks_exact_mut(2)
            .zip(u_row.iter())
            .zip(v_row.iter())
        {
            uv[u_position] = *u;
            uv[1 - u_position] = *v;
        }
    }
    Ok(())
}

/// Packs 4:2:0 planes into packed 4:2:2 rows, duplicating each chroma row.
fn i420_to_yuy2_impl<const PACKING: usize>(
    src_y: &[u8],
    src_u: &[u8],
    src_v: &[u8],
    width: u32,
    height: u32,
    dst: &mut [u8],
    dst_stride: usize,
) -> Result<(), YuvError> {
    let packing: Yuy2Description = PACKING.into();
    let cw = width.div_ceil(2) as usize;
    let row_bytes = 4 * cw;
    ensure_dst_len(dst, dst_stride * (height as usize - 1) + row_bytes)?;

    let w = width as usize;
    for (y, dst_row) in dst.chunks_mut(dst_stride).take(height as usize).enumerate() {
        let y_row = &src_y[y * w..y * w + w];
        let u_row = &src_u[(y / 2) * cw..(y / 2) * cw + cw];
        let v_row = &src_v[(y / 2) * cw..(y / 2) * cw + cw];
        for (x, out) in dst_row[..row_bytes].chunks_exact_mut(4).enumerate() {
            let first = y_row[2 * x];
            let second = y_row[(2 * x + 1).min(w - 1)];
            out[packing.get_first_y_position()] = first;
            out[packing.get_second_y_position()] = second;
            out[packing.get_u_position()] = u_row[x];
            out[packing.get_v_position()] = v_row[x];
        }
    }
    Ok(())
}

fn i420_to_rgbx_impl<const DESTINATION_CHANNELS: u8>(
    src_y: &[u8],
    src_u: &[u8],
    src_v: &[u8],
    width: u32,
    height: u32,
    dst: &mut [u8],
    dst_stride: usize,
) -> Result<(), YuvError> {
    let dst_chans: YuvSourceChannels = DESTINATION_CHANNELS.into();
    let channels = dst_chans.get_channels_count();
    let row_bytes = channels * width as usize;
    ensure_dst_len(dst, dst_stride * (height as usize - 1) + row_bytes)?;

    let c = bt601_tv_inverse();
    let w = width as usize;
    let cw = width.div_ceil(2) as usize;

    for (y, dst_row) in dst.chunks_mut(dst_stride).take(height as usize).enumerate() {
        let y_row = &src_y[y * w..y * w + w];
        let u_row = &src_u[(y / 2) * cw..(y / 2) * cw + cw];
        let v_row = &src_v[(y / 2) * cw..(y / 2) * cw + cw];
        for (x, px) in dst_row[..row_bytes].chunks_exact_mut(channels).enumerate() {
            let y_value = (y_row[x] as i32 - c.bias_y) * c.y_coef;
            let cb = u_row[x / 2] as i32 - c.bias_uv;
            let cr = v_row[x / 2] as i32 - c.bias_uv;
            let r = qrshr::<PRECISION, 8>(y_value + c.cr_coef * cr);
            let b = qrshr::<PRECISION, 8>(y_value + c.cb_coef * cb);
            let g = qrshr::<PRECISION, 8>(y_value - c.g_coeff_1 * cr - c.g_coeff_2 * cb);
            px[dst_chans.get_r_channel_offset()] = r as u8;
            px[dst_chans.get_g_channel_offset()] = g as u8;
            px[dst_chans.get_b_channel_offset()] = b as u8;
            if dst_chans.has_alpha() {
                px[dst_chans.get_a_channel_offset()] = 255;
            }
        }
    }
    Ok(())
}

fn i420_to_rgb565(
    src_y: &[u8],
    src_u: &[u8],
    src_v: &[u8],
    width: u32,
    height: u32,
    dst: &mut [u8],
    dst_stride: usize,
) -> Result<(), YuvError> {
    let row_bytes = 2 * width as usize;
    ensure_dst_len(dst, dst_stride * (height as usize - 1) + row_bytes)?;

    let c = bt601_tv_inverse();
    let w = width as usize;
    let cw = width.div_ceil(2) as usize;

    for (y, dst_row) in dst.chunks_mut(dst_stride).take(height as usize).enumerate() {
        let y_row = &src_y[y * w..y * w + w];
        let u_row = &src_u[(y / 2) * cw..(y / 2) * cw + cw];
        let v_row = &src_v[(y / 2) * cw..(y / 2) * cw + cw];
        for (x, px) in dst_row[..row_bytes].chunks_exact_mut(2).enumerate() {
            let y_value = (y_row[x] as i32 - c.bias_y) * c.y_coef;
            let cb = u_row[x / 2] as i32 - c.bias_uv;
            let cr = v_row[x / 2] as i32 - c.bias_uv;
            let r = qrshr::<PRECISION, 8>(y_value + c.cr_coef * cr) as u16;
            let b = qrshr::<PRECISION, 8>(y_value + c.cb_coef * cb) as u16;
            let g = qrshr::<PRECISION, 8>(y_value - c.g_coeff_1 * cr - c.g_coeff_2 * cb) as u16;
            let packed = ((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3);
            px.copy_from_slice(&packed.to_le_bytes());
        }
    }
    Ok(())
}

/// Natural bytes per row of the primary plane of a tag.
const fn natural_primary_stride(fourcc: FourCc, width: u32) -> usize {
    match fourcc {
        FourCc::Yuy2 | FourCc::Uyvy => 4 * width.div_ceil(2) as usize,
        FourCc::Rgb24 | FourCc::Raw => 3 * width as usize,
        FourCc::Argb | FourCc::Bgra | FourCc::Abgr | FourCc::Rgba => 4 * width as usize,
        FourCc::Rgb565 => 2 * width as usize,
        _ => width as usize,
    }
}

/// Converts a tightly packed I420 frame into the memory layout named by
/// `fourcc`.
///
/// `dst_stride` is the byte stride of the destination's primary plane; zero
/// selects the natural tight stride. For planar and semi-planar targets the
/// chroma strides derive from the primary stride the usual halved way. RGB
/// family targets are produced with the fixed BT.601 limited-range matrix;
/// alpha channels are set fully opaque.
///
/// Tags the engine recognizes but cannot produce return
/// [YuvError::UnsupportedFourCc] and leave `dst` untouched.
///
/// # Arguments
///
/// * `src`: Source I420 buffer
/// * `width`: Image width
/// * `height`: Image height
/// * `dst`: Destination buffer in the layout of `fourcc`
/// * `dst_stride`: Destination primary plane stride, 0 for tight rows
/// * `fourcc`: Destination layout tag
///
/// returns: Result<(), [YuvError]>
///
pub fn convert_from_i420(
    src: &[u8],
    width: u32,
    height: u32,
    dst: &mut [u8],
    dst_stride: u32,
    fourcc: FourCc,
) -> Result<(), YuvError> {
    check_i420_source(src, width, height)?;
    let natural = natural_primary_stride(fourcc, width);
    let stride = if dst_stride == 0 {
        natural
    } else {
        dst_stride as usize
    };
    if stride < natural {
        return Err(YuvError::ImageDimensionsNotMatch);
    }

    let (src_y, src_u, src_v) = split_i420(src, width, height);

    match fourcc {
        FourCc::I420 => i420_to_planar(src_y, src_u, src_v, width, height, dst, stride, false),
        FourCc::Yv12 => i420_to_planar(src_y, src_u, src_v, width, height, dst, stride, true),
        FourCc::Nv12 => i420_to_semiplanar(src_y, src_u, src_v, width, height, dst, stride, 0),
        FourCc::Nv21 => i420_to_semiplanar(src_y, src_u, src_v, width, height, dst, stride, 1),
        FourCc::I400 => {
            ensure_dst_len(dst, stride * (height as usize - 1) + width as usize)?;
            copy_plane(
                src_y,
                width as usize,
                dst,
                stride,
                width as usize,
                height as usize,
            )
        }
        FourCc::Yuy2 => i420_to_yuy2_impl::<{ Yuy2Description::YUYV as usize }>(
            src_y, src_u, src_v, width, height, dst, stride,
        ),
        FourCc::Uyvy => i420_to_yuy2_impl::<{ Yuy2Description::UYVY as usize }>(
            src_y, src_u, src_v, width, height, dst, stride,
        ),
        FourCc::Rgb24 => i420_to_rgbx_impl::<{ YuvSourceChannels::Bgr as u8 }>(
            src_y, src_u, src_v, width, height, dst, stride,
        ),
        FourCc::Raw => i420_to_rgbx_impl::<{ YuvSourceChannels::Rgb as u8 }>(
            src_y, src_u, src_v, width, height, dst, stride,
        ),
        FourCc::Argb => i420_to_rgbx_impl::<{ YuvSourceChannels::Argb as u8 }>(
            src_y, src_u, src_v, width, height, dst, stride,
        ),
        FourCc::Bgra => i420_to_rgbx_impl::<{ YuvSourceChannels::Bgra as u8 }>(
            src_y, src_u, src_v, width, height, dst, stride,
        ),
        FourCc::Abgr => i420_to_rgbx_impl::<{ YuvSourceChannels::Abgr as u8 }>(
            src_y, src_u, src_v, width, height, dst, stride,
        ),
        FourCc::Rgba => i420_to_rgbx_impl::<{ YuvSourceChannels::Rgba as u8 }>(
            src_y, src_u, src_v, width, height, dst, stride,
        ),
        FourCc::Rgb565 => i420_to_rgb565(src_y, src_u, src_v, width, height, dst, stride),
        _ => Err(YuvError::UnsupportedFourCc(fourcc.code())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{i420_buffer_size, i420_to_nv12};
    use rand::Rng;

    fn random_i420(width: u32, height: u32) -> Vec<u8> {
        let mut rng = rand::rng();
        (0..i420_buffer_size(width, height))
            .map(|_| rng.random_range(0..=255u8))
            .collect()
    }

    #[test]
    fn i420_target_copies_exactly() {
        let (w, h) = (6u32, 4u32);
        let src = random_i420(w, h);
        let mut dst = vec![0u8; src.len()];
        convert_from_i420(&src, w, h, &mut dst, 0, FourCc::I420).unwrap();
        assert_eq!(src, dst);
    }

    #[test]
    fn yv12_swaps_chroma_planes() {
        let (w, h) = (4u32, 2u32);
        let src = [1u8, 2, 3, 4, 5, 6, 7, 8, 10, 11, 20, 21];
        let mut dst = [0u8; 12];
        convert_from_i420(&src, w, h, &mut dst, 0, FourCc::Yv12).unwrap();
        assert_eq!(&dst[..8], &src[..8]);
        assert_eq!(&dst[8..10], &[20, 21], "V first");
        assert_eq!(&dst[10..12], &[10, 11]);
    }

    #[test]
    fn nv12_target_matches_dedicated_path() {
        let (w, h) = (8u32, 6u32);
        let src = random_i420(w, h);
        let mut via_tag = vec![0u8; src.len()];
        let mut via_fn = vec![0u8; src.len()];
        convert_from_i420(&src, w, h, &mut via_tag, 0, FourCc::Nv12).unwrap();
        i420_to_nv12(&src, w, h, &mut via_fn).unwrap();
        assert_eq!(via_tag, via_fn);
    }

    #[test]
    fn i400_extracts_luma() {
        let (w, h) = (4u32, 2u32);
        let src = random_i420(w, h);
        let mut dst = [0u8; 8];
        convert_from_i420(&src, w, h, &mut dst, 0, FourCc::I400).unwrap();
        assert_eq!(&dst, &src[..8]);
    }

    #[test]
    fn yuy2_packs_macropixels() {
        // 2x2 frame, uniform luma with a single chroma sample.
        let src = [90u8, 91, 92, 93, 54, 34];
        let mut dst = [0u8; 8];
        convert_from_i420(&src, 2, 2, &mut dst, 0, FourCc::Yuy2).unwrap();
        assert_eq!(dst, [90, 54, 91, 34, 92, 54, 93, 34]);

        let mut uyvy = [0u8; 8];
        convert_from_i420(&src, 2, 2, &mut uyvy, 0, FourCc::Uyvy).unwrap();
        assert_eq!(uyvy, [54, 90, 34, 91, 54, 92, 34, 93]);
    }

    #[test]
    fn argb_black_and_white_points() {
        // Limited range: Y=16 is black, Y=235 is white, neutral chroma.
        let src = [16u8, 235, 16, 235, 128, 128];
        let mut dst = [0u8; 16];
        convert_from_i420(&src, 2, 2, &mut dst, 0, FourCc::Argb).unwrap();
        assert_eq!(&dst[0..4], &[255, 0, 0, 0], "black, opaque alpha");
        assert_eq!(&dst[4..8], &[255, 255, 255, 255], "white");
    }

    #[test]
    fn rgb24_and_raw_mirror_byte_order() {
        let (w, h) = (2u32, 2u32);
        let src = [100u8, 110, 120, 130, 90, 160];
        let mut bgr = [0u8; 12];
        let mut rgb = [0u8; 12];
        convert_from_i420(&src, w, h, &mut bgr, 0, FourCc::Rgb24).unwrap();
        convert_from_i420(&src, w, h, &mut rgb, 0, FourCc::Raw).unwrap();
        for (a, b) in bgr.chunks_exact(3).zip(rgb.chunks_exact(3)) {
            assert_eq!(a[0], b[2]);
            assert_eq!(a[1], b[1]);
            assert_eq!(a[2], b[0]);
        }
    }

    #[test]
    fn rgb565_packs_expected_bits() {
        // Neutral chroma grey, every channel carries the same value.
        let src = [126u8, 126, 126, 126, 128, 128];
        let mut rgba = [0u8; 16];
        let mut r565 = [0u8; 8];
        convert_from_i420(&src, 2, 2, &mut rgba, 0, FourCc::Rgba).unwrap();
        convert_from_i420(&src, 2, 2, &mut r565, 0, FourCc::Rgb565).unwrap();
        let (r, g, b) = (rgba[0] as u16, rgba[1] as u16, rgba[2] as u16);
        let expected = ((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3);
        assert_eq!(u16::from_le_bytes([r565[0], r565[1]]), expected);
    }

    #[test]
    fn padded_stride_leaves_padding_untouched() {
        let (w, h) = (2u32, 2u32);
        let src = random_i420(w, h);
        let mut dst = vec![0xAAu8; 6 * 2];
        convert_from_i420(&src, w, h, &mut dst, 6, FourCc::I400).unwrap();
        assert_eq!(&dst[..2], &src[..2]);
        assert_eq!(&dst[2..6], &[0xAA; 4]);
        assert_eq!(&dst[6..8], &src[2..4]);
    }

    #[test]
    fn unsupported_tags_are_rejected() {
        let (w, h) = (4u32, 2u32);
        let src = random_i420(w, h);
        for tag in [FourCc::Ar30, FourCc::I422, FourCc::I444, FourCc::Argb1555] {
            let mut dst = vec![0u8; tag.buffer_size(w, h)];
            assert!(matches!(
                convert_from_i420(&src, w, h, &mut dst, 0, tag),
                Err(YuvError::UnsupportedFourCc(code)) if code == tag.code()
            ));
        }
    }

    #[test]
    fn undersized_destination_is_rejected() {
        let (w, h) = (4u32, 2u32);
        let src = random_i420(w, h);
        let mut dst = [0u8; 15];
        assert!(matches!(
            convert_from_i420(&src, w, h, &mut dst, 0, FourCc::Yuy2),
            Err(YuvError::MinimumDestinationSizeMismatch(_))
        ));
    }
}
