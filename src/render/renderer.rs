use std::fmt;
use std::io::{Cursor, Write};

use anyhow::Context;

use crate::foundation::error::{DtiError, DtiResult};
use crate::model::{AppearanceLayer, LayerImageSize, PetAppearance};
use crate::render::composite::{over_in_place, unpremultiply_rgba8_in_place};
use crate::render::decode::decode_layer;
use crate::render::fetch::LayerFetcher;

/// Labels that identify a render in error messages and logs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderContext {
    /// Species name.
    pub species: String,
    /// Color name.
    pub color: String,
}

impl RenderContext {
    /// Build a context from explicit labels.
    pub fn new(species: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            color: color.into(),
        }
    }

    /// Label a render of `pet`.
    pub fn for_appearance(pet: &PetAppearance) -> Self {
        Self::new(pet.species.name.clone(), pet.color.name.clone())
    }
}

impl fmt::Display for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.species)
    }
}

/// Render options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOpts {
    /// Output edge length.
    pub size: LayerImageSize,
    /// Rayon worker count for compositing. `None` uses the global pool.
    pub threads: Option<usize>,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            size: LayerImageSize::Size600,
            threads: None,
        }
    }
}

/// Composite already-fetched layers, bottom to top, into a PNG.
///
/// Every layer is decoded, normalized to `size` and drawn "over" a transparent canvas. The first
/// layer that fails aborts the render with [`DtiError::DecodeOrCompose`] naming the pet and layer;
/// no partial image is produced.
pub fn compose_png(
    ctx: &RenderContext,
    layers: &[(AppearanceLayer, Vec<u8>)],
    size: LayerImageSize,
) -> DtiResult<Vec<u8>> {
    let px = size.pixels();
    let row_bytes = px as usize * 4;
    let mut canvas = vec![0u8; row_bytes * px as usize];

    for (layer, bytes) in layers {
        let broken = |e: &dyn fmt::Display| {
            DtiError::decode_or_compose(format!("{ctx}: {}: {e}", layer.describe()))
        };
        let prepared = decode_layer(bytes, px).map_err(|e| broken(&e))?;
        over_in_place(&mut canvas, &prepared.rgba8_premul, row_bytes).map_err(|e| broken(&e))?;
    }

    unpremultiply_rgba8_in_place(&mut canvas);
    let img = image::RgbaImage::from_raw(px, px, canvas).ok_or_else(|| {
        DtiError::decode_or_compose(format!("{ctx}: canvas does not match {size}"))
    })?;

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .context("encode composited png")?;
    Ok(png)
}

/// Fetch every layer concurrently, then composite them into a PNG off the async runtime.
///
/// All fetches must succeed. A layer without an image URL fails up front with
/// [`DtiError::NullAssetImage`].
#[tracing::instrument(skip_all, fields(pet = %ctx, layers = layers.len(), size = %opts.size))]
pub async fn render(
    layers: &[AppearanceLayer],
    ctx: &RenderContext,
    opts: &RenderOpts,
    fetcher: &dyn LayerFetcher,
) -> DtiResult<Vec<u8>> {
    let urls = image_urls(layers)?;

    let fetched = futures::future::try_join_all(urls.iter().zip(layers).map(
        |(url, layer)| async move {
            fetcher.fetch(url).await.inspect_err(|e| {
                tracing::warn!(layer = %layer.describe(), url = %url, error = %e, "layer fetch failed");
            })
        },
    ))
    .await?;
    tracing::debug!(fetched = fetched.len(), "fetched layer images");

    let pairs: Vec<(AppearanceLayer, Vec<u8>)> = layers.iter().cloned().zip(fetched).collect();
    let ctx = ctx.clone();
    let opts = opts.clone();
    let png = tokio::task::spawn_blocking(move || compose_with_opts(&ctx, &pairs, &opts))
        .await
        .context("compositing worker panicked")??;

    tracing::debug!(bytes = png.len(), "rendered png");
    Ok(png)
}

/// [`render`], then write the PNG to `sink`.
pub async fn render_to(
    layers: &[AppearanceLayer],
    ctx: &RenderContext,
    opts: &RenderOpts,
    fetcher: &dyn LayerFetcher,
    mut sink: impl Write,
) -> DtiResult<()> {
    let png = render(layers, ctx, opts, fetcher).await?;
    sink.write_all(&png).context("write rendered png")?;
    sink.flush().context("flush rendered png")?;
    Ok(())
}

fn image_urls(layers: &[AppearanceLayer]) -> DtiResult<Vec<&str>> {
    let missing: Vec<String> = layers
        .iter()
        .filter(|l| l.image_url.is_none())
        .map(AppearanceLayer::describe)
        .collect();
    if !missing.is_empty() {
        return Err(DtiError::NullAssetImage { layers: missing });
    }
    Ok(layers.iter().filter_map(|l| l.image_url.as_deref()).collect())
}

fn compose_with_opts(
    ctx: &RenderContext,
    pairs: &[(AppearanceLayer, Vec<u8>)],
    opts: &RenderOpts,
) -> DtiResult<Vec<u8>> {
    match opts.threads {
        None => compose_png(ctx, pairs, opts.size),
        Some(n) => {
            let pool = build_thread_pool(n)?;
            pool.install(|| compose_png(ctx, pairs, opts.size))
        }
    }
}

fn build_thread_pool(threads: usize) -> DtiResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(DtiError::invalid_argument(
            "render option 'threads' must be >= 1 when set",
        ));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("build rayon thread pool")
        .map_err(DtiError::from)
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
