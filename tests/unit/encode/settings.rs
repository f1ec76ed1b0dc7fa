use super::*;

#[test]
fn defaults_match_documented_values() {
    let s = OutputSettings::default();
    assert_eq!(s.format, "mp4");
    assert_eq!(s.video_codec, "libx264");
    assert_eq!(s.audio_codec, "aac");
    assert_eq!(s.video_bitrate, "5000k");
    assert_eq!(s.audio_bitrate, "192k");
    assert_eq!(s.threads, 4);
    assert_eq!(s.preset, "medium");
    assert!(s.validate().is_ok());
}

#[test]
fn partial_json_keeps_remaining_defaults() {
    let s: OutputSettings = serde_json::from_str(r#"{"preset":"fast","threads":2}"#).unwrap();
    assert_eq!(s.preset, "fast");
    assert_eq!(s.threads, 2);
    assert_eq!(s.video_codec, "libx264");
}

#[test]
fn empty_fields_and_zero_threads_are_rejected() {
    let mut s = OutputSettings {
        video_codec: " ".into(),
        ..OutputSettings::default()
    };
    assert!(s.validate().unwrap_err().to_string().contains("video_codec"));
    s.video_codec = "libx264".into();
    s.threads = 0;
    assert!(s.validate().is_err());
}

#[test]
fn clip_names_follow_format() {
    let s = OutputSettings {
        format: "mkv".into(),
        ..OutputSettings::default()
    };
    assert_eq!(s.clip_file_name(3), "clip_0003.mkv");
}
