use std::collections::BTreeSet;

use super::*;
use crate::model::{LayerKind, Zone};
use crate::render::fetch::MemoryFetcher;

fn solid_png(size: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(size, size, image::Rgba(rgba));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn layer(id: u32, url: Option<&str>) -> AppearanceLayer {
    AppearanceLayer {
        id,
        zone: Zone::new(id, id as i32, format!("zone {id}")),
        image_url: url.map(str::to_owned),
        asset_remote_id: id,
        body_id: 0,
        kind: LayerKind::Object,
        known_glitches: BTreeSet::new(),
    }
}

fn decode(png: &[u8]) -> image::RgbaImage {
    image::load_from_memory(png).unwrap().to_rgba8()
}

fn ctx() -> RenderContext {
    RenderContext::new("Bruce", "Blue")
}

#[test]
fn empty_stack_is_transparent() {
    let png = compose_png(&ctx(), &[], LayerImageSize::Size150).unwrap();
    let img = decode(&png);
    assert_eq!(img.dimensions(), (150, 150));
    assert!(img.pixels().all(|p| p.0[3] == 0));
}

#[test]
fn later_layers_draw_on_top() {
    let layers = vec![
        (layer(1, Some("a")), solid_png(150, [255, 0, 0, 255])),
        (layer(2, Some("b")), solid_png(150, [0, 0, 255, 255])),
    ];
    let img = decode(&compose_png(&ctx(), &layers, LayerImageSize::Size150).unwrap());
    assert_eq!(img.get_pixel(10, 10).0, [0, 0, 255, 255]);
}

#[test]
fn transparent_layer_leaves_canvas_alone() {
    let layers = vec![
        (layer(1, Some("a")), solid_png(150, [255, 0, 0, 255])),
        (layer(2, Some("b")), solid_png(150, [0, 255, 0, 0])),
    ];
    let img = decode(&compose_png(&ctx(), &layers, LayerImageSize::Size150).unwrap());
    assert_eq!(img.get_pixel(75, 75).0, [255, 0, 0, 255]);
}

#[test]
fn smaller_layers_are_scaled_to_canvas() {
    let layers = vec![(layer(1, Some("a")), solid_png(30, [0, 255, 0, 255]))];
    let img = decode(&compose_png(&ctx(), &layers, LayerImageSize::Size300).unwrap());
    assert_eq!(img.dimensions(), (300, 300));
    assert_eq!(img.get_pixel(150, 150).0, [0, 255, 0, 255]);
}

#[test]
fn broken_layer_names_pet_and_layer() {
    let layers = vec![
        (layer(1, Some("a")), solid_png(150, [255, 0, 0, 255])),
        (layer(7, Some("b")), b"definitely not a png".to_vec()),
    ];
    let err = compose_png(&ctx(), &layers, LayerImageSize::Size150).unwrap_err();
    let DtiError::DecodeOrCompose(msg) = err else {
        panic!("unexpected error: {err:?}");
    };
    assert!(msg.contains("Bruce"), "{msg}");
    assert!(msg.contains("Blue"), "{msg}");
    assert!(msg.contains("layer 7 (zone 7)"), "{msg}");
}

#[tokio::test]
async fn render_fetches_and_composites() {
    let fetcher = MemoryFetcher::new()
        .with("https://x.test/1.png", solid_png(150, [255, 0, 0, 255]))
        .with("https://x.test/2.png", solid_png(150, [0, 0, 0, 0]));
    let layers = vec![
        layer(1, Some("https://x.test/1.png")),
        layer(2, Some("https://x.test/2.png")),
    ];
    let opts = RenderOpts {
        size: LayerImageSize::Size150,
        threads: Some(2),
    };

    let mut out = Vec::new();
    render_to(&layers, &ctx(), &opts, &fetcher, &mut out)
        .await
        .unwrap();
    let img = decode(&out);
    assert_eq!(img.dimensions(), (150, 150));
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
}

#[tokio::test]
async fn render_fails_when_any_fetch_fails() {
    let fetcher = MemoryFetcher::new().with("https://x.test/1.png", solid_png(150, [1, 2, 3, 255]));
    let layers = vec![
        layer(1, Some("https://x.test/1.png")),
        layer(2, Some("https://x.test/missing.png")),
    ];
    let err = render(&layers, &ctx(), &RenderOpts::default(), &fetcher)
        .await
        .unwrap_err();
    assert!(matches!(err, DtiError::Fetch(_)));
}

#[tokio::test]
async fn render_rejects_null_image_urls() {
    let layers = vec![layer(1, Some("https://x.test/1.png")), layer(3, None)];
    let err = render(&layers, &ctx(), &RenderOpts::default(), &MemoryFetcher::new())
        .await
        .unwrap_err();
    match err {
        DtiError::NullAssetImage { layers } => assert_eq!(layers, vec!["layer 3 (zone 3)"]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn zero_threads_is_rejected() {
    let opts = RenderOpts {
        size: LayerImageSize::Size150,
        threads: Some(0),
    };
    let err = render(&[], &ctx(), &opts, &MemoryFetcher::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DtiError::InvalidArgument(_)));
}
