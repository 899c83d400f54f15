/*
 * // Copyright (c) the yuvpipe authors. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */

#[inline(always)]
/// Saturating rounding shift right against bit depth
pub(crate) fn qrshr<const PRECISION: i32, const BIT_DEPTH: usize>(val: i32) -> i32 {
    let rounding: i32 = 1 << (PRECISION - 1);
    let max_value: i32 = (1 << BIT_DEPTH) - 1;
    ((val + rounding) >> PRECISION).min(max_value).max(0)
}

#[inline(always)]
/// Rounding average of four samples, used for 2x2 chroma siting.
pub(crate) fn avg4(a: u8, b: u8, c: u8, d: u8) -> i32 {
    (a as i32 + b as i32 + c as i32 + d as i32 + 2) >> 2
}

#[inline(always)]
/// Rounding average of two samples.
pub(crate) fn avg2(a: u8, b: u8) -> u8 {
    ((a as u16 + b as u16 + 1) >> 1) as u8
}
