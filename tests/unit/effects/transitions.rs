use image::Rgb;

use super::*;

fn solid(w: u32, h: u32, c: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(w, h, Rgb(c))
}

fn write_frame(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let p = dir.join(name);
    img.save(&p).unwrap();
    p
}

#[test]
fn positions_cover_zero_to_one_and_single_frame_arrives() {
    assert_eq!(transition_position(0, 1), 1.0);
    assert_eq!(transition_position(0, 30), 0.0);
    assert_eq!(transition_position(29, 30), 1.0);
}

#[test]
fn fade_endpoints_match_anchors() {
    let a = solid(4, 2, [10, 20, 30]);
    let b = solid(4, 2, [200, 100, 0]);
    assert_eq!(render_transition_frame(&a, &b, TransitionKind::Fade, 0.0).unwrap(), a);
    assert_eq!(render_transition_frame(&a, &b, TransitionKind::Fade, 1.0).unwrap(), b);
    let mid = render_transition_frame(&a, &b, TransitionKind::Fade, 0.5).unwrap();
    assert_eq!(mid.get_pixel(0, 0).0, [105, 60, 15]);
}

#[test]
fn slide_moves_outgoing_left_and_incoming_from_right() {
    let a = RgbImage::from_fn(10, 1, |x, _| Rgb([x as u8, 0, 0]));
    let b = RgbImage::from_fn(10, 1, |x, _| Rgb([100 + x as u8, 0, 0]));

    let start = render_transition_frame(&a, &b, TransitionKind::Slide, 0.0).unwrap();
    assert_eq!(start, a);

    let mid = render_transition_frame(&a, &b, TransitionKind::Slide, 0.5).unwrap();
    let reds = mid.pixels().map(|p| p.0[0]).collect::<Vec<_>>();
    assert_eq!(reds, vec![5, 6, 7, 8, 9, 100, 101, 102, 103, 104]);

    let end = render_transition_frame(&a, &b, TransitionKind::Slide, 1.0).unwrap();
    assert_eq!(end, b);
}

#[test]
fn slide_truncates_positions_toward_zero() {
    let a = solid(3, 1, [1, 1, 1]);
    let b = solid(3, 1, [9, 9, 9]);
    // from_x = trunc(-0.9) = 0 so the outgoing frame stays put, incoming at trunc(2.1) = 2.
    let f = render_transition_frame(&a, &b, TransitionKind::Slide, 0.3).unwrap();
    let reds = f.pixels().map(|p| p.0[0]).collect::<Vec<_>>();
    assert_eq!(reds, vec![1, 1, 9]);
}

#[test]
fn mismatched_anchor_sizes_are_rejected() {
    let err = render_transition_frame(
        &solid(2, 2, [0, 0, 0]),
        &solid(3, 2, [0, 0, 0]),
        TransitionKind::Fade,
        0.5,
    )
    .unwrap_err();
    assert!(matches!(err, SlidecastError::Geometry(_)));
}

#[test]
fn synthesize_writes_round_duration_times_fps_frames() {
    let dir = tempfile::tempdir().unwrap();
    let from = write_frame(dir.path(), "a.png", &solid(8, 6, [0, 0, 0]));
    let to = write_frame(dir.path(), "b.png", &solid(8, 6, [255, 255, 255]));

    let out = dir.path().join("t");
    let frames = synthesize(
        &[from],
        &[to],
        TransitionKind::Fade,
        1.0,
        Fps::integer(30).unwrap(),
        Resolution::new(8, 6),
        &out,
    )
    .unwrap();
    assert_eq!(frames.len(), 30);
    assert!(frames.iter().all(|p| p.is_file()));
    assert_eq!(frames[0], out.join("frame_00000.png"));

    let first = open_frame(&frames[0]).unwrap();
    let last = open_frame(&frames[29]).unwrap();
    assert!(first.pixels().all(|p| p.0 == [0, 0, 0]));
    assert!(last.pixels().all(|p| p.0 == [255, 255, 255]));
}

#[test]
fn single_frame_fade_is_the_destination() {
    let dir = tempfile::tempdir().unwrap();
    let from = write_frame(dir.path(), "a.png", &solid(4, 4, [0, 0, 0]));
    let to = write_frame(dir.path(), "b.png", &solid(4, 4, [30, 60, 90]));

    let frames = synthesize(
        &[from],
        &[to],
        TransitionKind::Fade,
        0.0,
        Fps::integer(30).unwrap(),
        Resolution::new(4, 4),
        &dir.path().join("t"),
    )
    .unwrap();
    assert_eq!(frames.len(), 1);
    let only = open_frame(&frames[0]).unwrap();
    assert!(only.pixels().all(|p| p.0 == [30, 60, 90]));
}

#[test]
fn missing_sides_use_blank_canvas_and_foreign_sizes_are_letterboxed() {
    let dir = tempfile::tempdir().unwrap();
    let to = write_frame(dir.path(), "b.png", &solid(4, 2, [0, 0, 0]));

    let frames = synthesize(
        &[],
        &[to],
        TransitionKind::Fade,
        0.1,
        Fps::integer(10).unwrap(),
        Resolution::new(4, 4),
        &dir.path().join("t"),
    )
    .unwrap();
    assert_eq!(frames.len(), 1);
    let only = open_frame(&frames[0]).unwrap();
    assert_eq!(only.dimensions(), (4, 4));
    assert_eq!(only.get_pixel(0, 0).0, [255, 255, 255]);
    assert_eq!(only.get_pixel(0, 1).0, [0, 0, 0]);
}
