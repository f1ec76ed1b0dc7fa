use image::{Rgb, RgbImage};

use super::*;

fn write_source(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_fn(w, h, |x, y| Rgb([(x * 7) as u8, (y * 11) as u8, 90]))
        .save(&path)
        .unwrap();
    path
}

#[test]
fn second_call_is_a_cache_hit_with_identical_pixels() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(dir.path(), "slide.png", 20, 10);
    let cache = ImageCache::new();
    let target = Resolution::new(32, 32);

    let a = cache.fitted_canvas(&src, target).unwrap();
    let b = cache.fitted_canvas(&src, target).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.dimensions(), (32, 32));
    assert_eq!(
        cache.stats(),
        CacheStats {
            decodes: 1,
            fits: 1,
            hits: 1
        }
    );
}

#[test]
fn mutating_a_copy_does_not_touch_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(dir.path(), "slide.png", 16, 16);
    let cache = ImageCache::new();
    let target = Resolution::new(16, 16);

    let pristine = cache.fitted_canvas(&src, target).unwrap();
    let mut scribbled = cache.fitted_canvas(&src, target).unwrap();
    for px in scribbled.pixels_mut() {
        *px = Rgb([1, 2, 3]);
    }
    assert_eq!(cache.fitted_canvas(&src, target).unwrap(), pristine);
}

#[test]
fn resolutions_are_cached_separately_but_decode_once() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(dir.path(), "slide.png", 16, 9);
    let cache = ImageCache::new();

    let small = cache.fitted_canvas(&src, Resolution::new(32, 18)).unwrap();
    let large = cache.fitted_canvas(&src, Resolution::new(64, 36)).unwrap();
    assert_eq!(small.dimensions(), (32, 18));
    assert_eq!(large.dimensions(), (64, 36));

    let stats = cache.stats();
    assert_eq!(stats.decodes, 1);
    assert_eq!(stats.fits, 2);
    assert_eq!(stats.hits, 0);
}

#[test]
fn missing_file_is_an_error() {
    let cache = ImageCache::new();
    let err = cache
        .fitted_canvas(Path::new("does/not/exist.png"), Resolution::new(8, 8))
        .unwrap_err();
    assert!(err.is_frame_soft());
}

#[test]
fn clear_forces_recompute() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(dir.path(), "slide.png", 8, 8);
    let cache = ImageCache::new();
    cache.fitted_canvas(&src, Resolution::new(8, 8)).unwrap();
    cache.clear().unwrap();
    cache.fitted_canvas(&src, Resolution::new(8, 8)).unwrap();
    assert_eq!(cache.stats().decodes, 2);
}
