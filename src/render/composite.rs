use rayon::prelude::*;

use crate::foundation::error::{DtiError, DtiResult};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Porter-Duff "over" of `src` onto `dst`, both premultiplied.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Composite a whole `src` buffer over `dst`, splitting rows across the rayon pool.
///
/// Both buffers are premultiplied RGBA8 rows of `row_bytes` bytes.
pub fn over_in_place(dst: &mut [u8], src: &[u8], row_bytes: usize) -> DtiResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(DtiError::decode_or_compose(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    if row_bytes == 0 || !row_bytes.is_multiple_of(4) || !dst.len().is_multiple_of(row_bytes) {
        return Err(DtiError::decode_or_compose(format!(
            "row stride {row_bytes} does not tile a {}-byte rgba8 buffer",
            dst.len()
        )));
    }

    dst.par_chunks_mut(row_bytes)
        .zip(src.par_chunks(row_bytes))
        .for_each(|(drow, srow)| {
            for (d, s) in drow.chunks_exact_mut(4).zip(srow.chunks_exact(4)) {
                let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
                d.copy_from_slice(&out);
            }
        });
    Ok(())
}

/// Convert straight-alpha RGBA8 to premultiplied, in place.
pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255(u16::from(px[0]), a);
        px[1] = mul_div255(u16::from(px[1]), a);
        px[2] = mul_div255(u16::from(px[2]), a);
    }
}

/// Convert premultiplied RGBA8 back to straight alpha, in place.
pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
