use super::*;

#[test]
fn sizes_map_to_pixels() {
    assert_eq!(LayerImageSize::Size150.pixels(), 150);
    assert_eq!(LayerImageSize::Size300.pixels(), 300);
    assert_eq!(LayerImageSize::default().pixels(), 600);
}

#[test]
fn parse_accepts_pixels_and_api_names() {
    assert_eq!(
        "300".parse::<LayerImageSize>().unwrap(),
        LayerImageSize::Size300
    );
    assert_eq!(
        "size_150".parse::<LayerImageSize>().unwrap(),
        LayerImageSize::Size150
    );
    assert_eq!(LayerImageSize::Size600.to_string(), "SIZE_600");
}

#[test]
fn arbitrary_scaling_is_rejected() {
    assert!(LayerImageSize::from_pixels(512).is_err());
    assert!("SIZE_512".parse::<LayerImageSize>().is_err());
}
