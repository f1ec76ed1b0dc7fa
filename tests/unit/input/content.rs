use super::*;

fn seg(idx: usize, d: f64) -> AudioSegment {
    AudioSegment {
        section_index: idx,
        path: PathBuf::from(format!("a{idx}.mp3")),
        duration: d,
    }
}

#[test]
fn job_document_parses_with_defaults() {
    let job: JobSpec = serde_json::from_value(serde_json::json!({
        "content": {
            "sections": [
                { "title": "Intro", "visual": "slides/1.png" },
                { "key_points": ["a", "b"] }
            ]
        },
        "audio": {
            "sections": [ { "section_index": 0, "path": "audio/0.mp3", "duration": 4.5 } ]
        }
    }))
    .unwrap();
    assert_eq!(job.content.sections.len(), 2);
    assert_eq!(job.audio.sections[0].duration, Some(4.5));
    assert!(job.audio.transitions.is_empty());
    assert_eq!(job.content.sections[1].spoken_text(), "a b");
}

#[test]
fn relative_paths_resolve_against_base() {
    let mut job = JobSpec {
        content: ContentStructure {
            title: None,
            sections: vec![ContentSection {
                visual: Some(PathBuf::from("s.png")),
                ..ContentSection::default()
            }],
        },
        audio: AudioSpecs {
            sections: vec![AudioSegmentSpec {
                section_index: 0,
                path: PathBuf::from("/abs/a.mp3"),
                duration: None,
                text: None,
            }],
            transitions: vec![],
        },
    };
    job.resolve_relative_paths(Path::new("/jobs/deck"));
    assert_eq!(
        job.content.sections[0].visual.as_deref(),
        Some(Path::new("/jobs/deck/s.png"))
    );
    assert_eq!(job.audio.sections[0].path, PathBuf::from("/abs/a.mp3"));
}

#[test]
fn negative_durations_are_rejected() {
    let job = JobSpec {
        content: ContentStructure::default(),
        audio: AudioSpecs {
            sections: vec![AudioSegmentSpec {
                section_index: 0,
                path: PathBuf::from("a.mp3"),
                duration: Some(-1.0),
                text: None,
            }],
            transitions: vec![],
        },
    };
    assert!(matches!(
        job.validate().unwrap_err(),
        SlidecastError::Validation(_)
    ));
}

#[test]
fn lookups_match_by_section_index() {
    let audio = AudioSegments {
        sections: vec![seg(2, 3.0), seg(0, 1.0)],
        transitions: vec![seg(0, 0.5)],
    };
    assert_eq!(audio.section(0).unwrap().duration, 1.0);
    assert_eq!(audio.section(2).unwrap().duration, 3.0);
    assert!(audio.section(1).is_none());
    assert_eq!(audio.transition_from(0).unwrap().duration, 0.5);
    assert!(audio.transition_from(1).is_none());
}

#[test]
fn narration_wins_over_key_points() {
    let s = ContentSection {
        narration: Some("hello there".into()),
        key_points: vec!["ignored".into()],
        ..ContentSection::default()
    };
    assert_eq!(s.spoken_text(), "hello there");
}
