use anyhow::Context;
use image::imageops::FilterType;

use crate::foundation::error::DtiResult;
use crate::render::composite::premultiply_rgba8_in_place;

/// A decoded layer normalized to the canvas size.
#[derive(Clone, Debug)]
pub struct PreparedLayer {
    /// Edge length in pixels.
    pub size: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Vec<u8>,
}

/// Decode `bytes`, force RGBA8, resize to `size x size` when needed, and premultiply.
pub fn decode_layer(bytes: &[u8], size: u32) -> DtiResult<PreparedLayer> {
    let dyn_img = image::load_from_memory(bytes).context("decode layer image from memory")?;
    let mut rgba = dyn_img.to_rgba8();
    if rgba.dimensions() != (size, size) {
        tracing::trace!(
            from = ?rgba.dimensions(),
            to = size,
            "resizing layer to canvas size"
        );
        rgba = image::imageops::resize(&rgba, size, size, FilterType::CatmullRom);
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedLayer { size, rgba8_premul })
}

#[cfg(test)]
#[path = "../../tests/unit/render/decode.rs"]
mod tests;
