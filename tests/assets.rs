use affirmation_adventures::assets::SpriteImage;
use affirmation_adventures::error::AssetError;

#[test]
fn test_load_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("player.png");
    let img = image::RgbaImage::from_fn(3, 2, |x, y| image::Rgba([x as u8 * 10, y as u8 * 10, 0, 255]));
    img.save(&path).unwrap();

    let sprite = SpriteImage::load(&path).unwrap();
    assert_eq!((sprite.width, sprite.height), (3, 2));
    assert_eq!(sprite.rgba.len(), 3 * 2 * 4);
    // Second pixel of the second row.
    assert_eq!(&sprite.rgba[(3 + 1) * 4..(3 + 2) * 4], &[10, 10, 0, 255]);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(SpriteImage::load(dir.path().join("nope.png")), Err(AssetError::Io { .. })));
}

#[test]
fn test_garbage_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"definitely not a png").unwrap();
    assert!(matches!(SpriteImage::load(&path), Err(AssetError::Decode { .. })));
}

#[test]
fn test_solid_fill() {
    let sprite = SpriteImage::solid(2, 2, [1, 2, 3, 4]);
    assert_eq!(sprite.rgba, vec![1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4]);
}
