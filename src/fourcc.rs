/*
 * // Copyright (c) the yuvpipe authors. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */
use crate::planes::{chroma_plane_size, luma_plane_size};
use std::fmt::{Display, Formatter};

/// Four-character code identifying a concrete pixel buffer memory layout.
///
/// A tag fully determines plane count, plane sizes and plane order from
/// `(width, height)` alone. The set is closed so converter dispatch stays
/// exhaustive; tags without a conversion routine surface
/// [`YuvError::UnsupportedFourCc`](crate::YuvError::UnsupportedFourCc)
/// instead of producing garbage output.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum FourCc {
    /// Planar 4:2:0, order Y, U, V.
    I420,
    /// Planar 4:2:0, order Y, V, U.
    Yv12,
    /// Semi-planar 4:2:0, Y plane then interleaved UV.
    Nv12,
    /// Semi-planar 4:2:0, Y plane then interleaved VU.
    Nv21,
    /// Luma only.
    I400,
    /// Packed 4:2:2, byte order Y0 U Y1 V.
    Yuy2,
    /// Packed 4:2:2, byte order U Y0 V Y1.
    Uyvy,
    /// 24-bit RGB, little-endian byte order B, G, R.
    Rgb24,
    /// 24-bit RGB, byte order R, G, B.
    Raw,
    /// 32-bit, byte order A, R, G, B.
    Argb,
    /// 32-bit, byte order B, G, R, A.
    Bgra,
    /// 32-bit, byte order A, B, G, R.
    Abgr,
    /// 32-bit, byte order R, G, B, A.
    Rgba,
    /// 16-bit RGB 5:6:5, little-endian.
    Rgb565,
    /// 16-bit ARGB 1:5:5:5, little-endian. Recognized, no conversion.
    Argb1555,
    /// 16-bit ARGB 4:4:4:4, little-endian. Recognized, no conversion.
    Argb4444,
    /// 10-bit ABGR. Recognized, no conversion (8-bit engine).
    Ar30,
    /// Planar 4:2:2. Recognized, no conversion.
    I422,
    /// Planar 4:2:2, order Y, V, U. Recognized, no conversion.
    Yv16,
    /// Planar 4:4:4. Recognized, no conversion.
    I444,
    /// Planar 4:4:4, order Y, V, U. Recognized, no conversion.
    Yv24,
}

#[inline]
const fn pack(tag: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*tag)
}

impl FourCc {
    pub const ALL: [FourCc; 21] = [
        FourCc::I420,
        FourCc::Yv12,
        FourCc::Nv12,
        FourCc::Nv21,
        FourCc::I400,
        FourCc::Yuy2,
        FourCc::Uyvy,
        FourCc::Rgb24,
        FourCc::Raw,
        FourCc::Argb,
        FourCc::Bgra,
        FourCc::Abgr,
        FourCc::Rgba,
        FourCc::Rgb565,
        FourCc::Argb1555,
        FourCc::Argb4444,
        FourCc::Ar30,
        FourCc::I422,
        FourCc::Yv16,
        FourCc::I444,
        FourCc::Yv24,
    ];

    /// The 32-bit little-endian four-character code for this tag.
    pub const fn code(self) -> u32 {
        match self {
            FourCc::I420 => pack(b"I420"),
            FourCc::Yv12 => pack(b"YV12"),
            FourCc::Nv12 => pack(b"NV12"),
            FourCc::Nv21 => pack(b"NV21"),
            FourCc::I400 => pack(b"I400"),
            FourCc::Yuy2 => pack(b"YUY2"),
            FourCc::Uyvy => pack(b"UYVY"),
            FourCc::Rgb24 => pack(b"24BG"),
            FourCc::Raw => pack(b"RAW "),
            FourCc::Argb => pack(b"ARGB"),
            FourCc::Bgra => pack(b"BGRA"),
            FourCc::Abgr => pack(b"ABGR"),
            FourCc::Rgba => pack(b"RGBA"),
            FourCc::Rgb565 => pack(b"RGBP"),
            FourCc::Argb1555 => pack(b"RGBO"),
            FourCc::Argb4444 => pack(b"R444"),
            FourCc::Ar30 => pack(b"AR30"),
            FourCc::I422 => pack(b"I422"),
            FourCc::Yv16 => pack(b"YV16"),
            FourCc::I444 => pack(b"I444"),
            FourCc::Yv24 => pack(b"YV24"),
        }
    }

    /// Looks up a tag from its numeric four-character code.
    pub fn from_code(code: u32) -> Option<FourCc> {
        FourCc::ALL.iter().find(|f| f.code() == code).copied()
    }

    /// Total byte size of a tightly packed buffer of this format.
    ///
    /// 4:2:0 chroma planes round odd dimensions up; packed 4:2:2 rows round
    /// odd widths up to a whole macropixel.
    pub const fn buffer_size(self, width: u32, height: u32) -> usize {
        match self {
            FourCc::I420 | FourCc::Yv12 | FourCc::Nv12 | FourCc::Nv21 => {
                luma_plane_size(width, height) + 2 * chroma_plane_size(width, height)
            }
            FourCc::I400 => luma_plane_size(width, height),
            FourCc::Yuy2 | FourCc::Uyvy => {
                4 * width.div_ceil(2) as usize * height as usize
            }
            FourCc::Rgb24 | FourCc::Raw => 3 * luma_plane_size(width, height),
            FourCc::Argb | FourCc::Bgra | FourCc::Abgr | FourCc::Rgba | FourCc::Ar30 => {
                4 * luma_plane_size(width, height)
            }
            FourCc::Rgb565 | FourCc::Argb1555 | FourCc::Argb4444 => {
                2 * luma_plane_size(width, height)
            }
            FourCc::I422 | FourCc::Yv16 => {
                luma_plane_size(width, height)
                    + 2 * width.div_ceil(2) as usize * height as usize
            }
            FourCc::I444 | FourCc::Yv24 => 3 * luma_plane_size(width, height),
        }
    }
}

impl Display for FourCc {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let bytes = self.code().to_le_bytes();
        for b in bytes {
            std::fmt::Write::write_char(f, b as char)?;
        }
        Ok(())
    }
}
