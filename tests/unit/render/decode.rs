use std::io::Cursor;

use super::*;

fn png(img: image::DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_premultiplies() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100, 50, 200, 128]).unwrap();
    let prepared = decode_layer(&png(image::DynamicImage::ImageRgba8(img)), 1).unwrap();
    assert_eq!(prepared.size, 1);
    assert_eq!(
        prepared.rgba8_premul,
        vec![
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}

#[test]
fn rgb_input_gains_opaque_alpha() {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30]));
    let prepared = decode_layer(&png(image::DynamicImage::ImageRgb8(img)), 2).unwrap();
    assert_eq!(prepared.rgba8_premul.len(), 16);
    assert!(prepared.rgba8_premul.chunks_exact(4).all(|px| px == [10, 20, 30, 255]));
}

#[test]
fn mismatched_size_is_resized() {
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 255, 0, 255]));
    let prepared = decode_layer(&png(image::DynamicImage::ImageRgba8(img)), 2).unwrap();
    assert_eq!(prepared.size, 2);
    assert_eq!(prepared.rgba8_premul.len(), 2 * 2 * 4);
    assert!(prepared.rgba8_premul.chunks_exact(4).all(|px| px[1] == 255 && px[3] == 255));
}

#[test]
fn garbage_bytes_fail() {
    assert!(decode_layer(b"not a png", 2).is_err());
}
