/*
 * // Copyright (c) the yuvpipe authors. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */
use crate::geometry::map_ft_result;
use crate::images::{YuvPlanarImage, YuvPlanarImageMut};
use crate::YuvError;
use fast_transpose::{flip_plane, flop_plane};

/// Declares mirroring mode: vertical or horizontal
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum MirrorMode {
    /// Mirror around the vertical axis: every row is reversed left to right.
    Vertical,
    /// Mirror around the horizontal axis: rows swap top to bottom.
    Horizontal,
}

/// Mirrors a planar 8 bit image.
///
/// # Arguments
///
/// * `src`: Source image
/// * `src_stride`: Source image stride
/// * `dst`: Destination image
/// * `dst_stride`: Destination image stride
/// * `width`: Image width
/// * `height`: Image Height
/// * `mode`: Refer to [MirrorMode] for mode info
///
/// returns: Result<(), [YuvError]>
///
pub fn mirror_plane(
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    width: usize,
    height: usize,
    mode: MirrorMode,
) -> Result<(), YuvError> {
    let rs = match mode {
        MirrorMode::Vertical => flip_plane(src, src_stride, dst, dst_stride, width, height),
        MirrorMode::Horizontal => flop_plane(src, src_stride, dst, dst_stride, width, height),
    };
    map_ft_result(rs)
}

/// Mirrors a tightly packed I420 frame left-right.
///
/// Every plane is flipped independently row by row; chroma planes mirror at
/// half resolution. A pure permutation, no resampling.
pub fn i420_mirror(
    src: &[u8],
    width: u32,
    height: u32,
    dst: &mut [u8],
) -> Result<(), YuvError> {
    let src_view = YuvPlanarImage::from_i420(src, width, height)?;
    let mut dst_view = YuvPlanarImageMut::from_i420(dst, width, height)?;

    let chroma_width = width.div_ceil(2) as usize;
    let chroma_height = height.div_ceil(2) as usize;

    mirror_plane(
        src_view.y_plane,
        src_view.y_stride as usize,
        dst_view.y_plane.borrow_mut(),
        dst_view.y_stride as usize,
        width as usize,
        height as usize,
        MirrorMode::Vertical,
    )?;
    mirror_plane(
        src_view.u_plane,
        src_view.u_stride as usize,
        dst_view.u_plane.borrow_mut(),
        dst_view.u_stride as usize,
        chroma_width,
        chroma_height,
        MirrorMode::Vertical,
    )?;
    mirror_plane(
        src_view.v_plane,
        src_view.v_stride as usize,
        dst_view.v_plane.borrow_mut(),
        dst_view.v_stride as usize,
        chroma_width,
        chroma_height,
        MirrorMode::Vertical,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i420_buffer_size;
    use rand::Rng;

    #[test]
    fn mirror_is_an_involution() {
        let (w, h) = (6u32, 4u32);
        let mut rng = rand::rng();
        let src: Vec<u8> = (0..i420_buffer_size(w, h))
            .map(|_| rng.random_range(0..=255u8))
            .collect();
        let mut once = vec![0u8; src.len()];
        let mut twice = vec![0u8; src.len()];
        i420_mirror(&src, w, h, &mut once).unwrap();
        i420_mirror(&once, w, h, &mut twice).unwrap();
        assert_eq!(src, twice);
        assert_ne!(src, once);
    }

    #[test]
    fn mirror_reverses_rows() {
        // 4x2 luma, 2x1 chroma planes.
        #[rustfmt::skip]
        let src = [
            1u8, 2, 3, 4,
            5, 6, 7, 8,
            10, 11,
            12, 13,
        ];
        let mut dst = [0u8; 12];
        i420_mirror(&src, 4, 2, &mut dst).unwrap();
        #[rustfmt::skip]
        let expected = [
            4u8, 3, 2, 1,
            8, 7, 6, 5,
            11, 10,
            13, 12,
        ];
        assert_eq!(dst, expected);
    }

    #[test]
    fn horizontal_mode_swaps_rows() {
        let src = [1u8, 2, 3, 4];
        let mut dst = [0u8; 4];
        mirror_plane(&src, 2, &mut dst, 2, 2, 2, MirrorMode::Horizontal).unwrap();
        assert_eq!(dst, [3, 4, 1, 2]);
    }
}
