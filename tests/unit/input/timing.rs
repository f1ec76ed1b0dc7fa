use std::path::PathBuf;

use super::*;
use crate::input::content::ContentSection;

fn no_probe() -> TimingOptions {
    TimingOptions {
        probe_audio: false,
        ..TimingOptions::default()
    }
}

#[test]
fn speaking_rate_counts_words() {
    let text = "one two three four five six seven eight nine ten";
    assert!((speaking_duration_secs(text, 150) - 4.0).abs() < 1e-9);
    assert_eq!(speaking_duration_secs("", 150), 0.0);
    assert_eq!(speaking_duration_secs("x", 0), 0.0);
}

#[test]
fn estimates_respect_minimum_and_multiplier() {
    let opts = no_probe();
    assert_eq!(estimate_duration("short", &opts), 5.0);

    let long = vec!["word"; 300].join(" ");
    assert!((estimate_duration(&long, &opts) - 120.0).abs() < 1e-9);

    let slow = TimingOptions {
        duration_multiplier: 1.5,
        ..opts
    };
    assert!((estimate_duration("short", &slow) - 7.5).abs() < 1e-9);
}

#[test]
fn reported_durations_are_kept_and_missing_ones_estimated() {
    let content = ContentStructure {
        title: None,
        sections: vec![
            ContentSection::default(),
            ContentSection {
                narration: Some(vec!["w"; 25].join(" ")),
                ..ContentSection::default()
            },
        ],
    };
    let specs = AudioSpecs {
        sections: vec![
            AudioSegmentSpec {
                section_index: 0,
                path: PathBuf::from("missing0.mp3"),
                duration: Some(3.25),
                text: None,
            },
            AudioSegmentSpec {
                section_index: 1,
                path: PathBuf::from("missing1.mp3"),
                duration: None,
                text: None,
            },
        ],
        transitions: vec![],
    };
    let opts = TimingOptions {
        min_section_duration: 1.0,
        ..no_probe()
    };
    let audio = resolve_audio(&specs, &content, &opts).unwrap();
    assert_eq!(audio.sections[0].duration, 3.25);
    assert!((audio.sections[1].duration - 10.0).abs() < 1e-9);
}

#[test]
fn invalid_options_are_rejected() {
    let bad = TimingOptions {
        words_per_minute: 0,
        ..TimingOptions::default()
    };
    assert!(resolve_audio(&AudioSpecs::default(), &ContentStructure::default(), &bad).is_err());
}
