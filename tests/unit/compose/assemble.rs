use super::*;
use crate::{
    input::content::AudioSegment,
    style::preset::{StyleName, TransitionKind},
};

fn fps() -> Fps {
    Fps::integer(30).unwrap()
}

fn frames(dir: &str, n: usize) -> Vec<PathBuf> {
    (0..n)
        .map(|i| PathBuf::from(format!("{dir}/frame_{i:05}.png")))
        .collect()
}

fn section(idx: usize, n: usize) -> SectionAnimation {
    SectionAnimation {
        section_index: idx,
        frame_directory: PathBuf::from(format!("section_{}_frames", idx + 1)),
        frame_paths: frames(&format!("s{idx}"), n),
        duration: n as f64 / 30.0,
        fps: fps(),
        style: StyleName::Standard,
    }
}

fn transition(from: usize, to: usize, n: usize) -> TransitionAnimation {
    TransitionAnimation {
        from_section_index: from,
        to_section_index: to,
        frame_directory: PathBuf::from(format!("transition_{from}_to_{to}_frames")),
        frame_paths: frames(&format!("t{from}"), n),
        duration: 1.0,
        fps: fps(),
        transition: TransitionKind::Fade,
    }
}

fn audio(idx: usize, duration: f64) -> AudioSegment {
    AudioSegment {
        section_index: idx,
        path: PathBuf::from(format!("a{idx}.wav")),
        duration,
    }
}

fn three_section_audio() -> AudioSegments {
    AudioSegments {
        sections: vec![audio(0, 10.0), audio(1, 10.0), audio(2, 10.0)],
        transitions: vec![],
    }
}

#[test]
fn three_sections_interleave_and_total_32_seconds() {
    let sections = vec![section(0, 300), section(1, 300), section(2, 300)];
    let transitions = vec![transition(0, 1, 30), transition(1, 2, 30)];

    let comp = assemble(
        &sections,
        &transitions,
        &three_section_audio(),
        fps(),
        Resolution::default(),
    );

    assert_eq!(comp.segment_count, 3);
    assert_eq!(comp.transition_count, 2);
    assert_eq!(comp.total_frame_count, 960);
    assert!((comp.total_duration - 32.0).abs() < 1e-9);

    let kinds = comp.elements.iter().map(|e| e.kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            ElementKind::Segment { section_index: 0 },
            ElementKind::Transition {
                transition_index: 0,
                from_section_index: 0,
                to_section_index: 1
            },
            ElementKind::Segment { section_index: 1 },
            ElementKind::Transition {
                transition_index: 1,
                from_section_index: 1,
                to_section_index: 2
            },
            ElementKind::Segment { section_index: 2 },
        ]
    );

    let starts = comp.elements.iter().map(|e| e.start_sec).collect::<Vec<_>>();
    assert_eq!(starts, vec![0.0, 10.0, 11.0, 21.0, 22.0]);
    assert!(comp.elements.iter().filter(|e| !e.is_segment()).all(|e| !e.has_audio()));
}

#[test]
fn unordered_inputs_are_sorted_before_interleaving() {
    let sections = vec![section(2, 30), section(0, 30), section(1, 30)];
    let transitions = vec![transition(1, 2, 3), transition(0, 1, 3)];

    let comp = assemble(
        &sections,
        &transitions,
        &three_section_audio(),
        fps(),
        Resolution::default(),
    );

    let order = comp
        .elements
        .iter()
        .map(|e| match e.kind {
            ElementKind::Segment { section_index } => format!("s{section_index}"),
            ElementKind::Transition {
                from_section_index, ..
            } => format!("t{from_section_index}"),
        })
        .collect::<Vec<_>>();
    assert_eq!(order, vec!["s0", "t0", "s1", "t1", "s2"]);
}

#[test]
fn section_without_audio_is_skipped() {
    let sections = vec![section(0, 30), section(1, 30)];
    let audio = AudioSegments {
        sections: vec![audio(1, 1.0)],
        transitions: vec![],
    };

    let comp = assemble(&sections, &[], &audio, fps(), Resolution::default());

    assert_eq!(comp.segment_count, 1);
    assert_eq!(
        comp.elements[0].kind,
        ElementKind::Segment { section_index: 1 }
    );
}

#[test]
fn dropped_section_takes_its_transitions_with_it() {
    let sections = vec![section(0, 30), section(1, 30), section(2, 30)];
    let transitions = vec![transition(0, 1, 30), transition(1, 2, 30)];
    let audio = AudioSegments {
        sections: vec![audio(0, 1.0), audio(2, 1.0)],
        transitions: vec![],
    };

    let comp = assemble(&sections, &transitions, &audio, fps(), Resolution::default());

    let kinds = comp.elements.iter().map(|e| e.kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            ElementKind::Segment { section_index: 0 },
            ElementKind::Segment { section_index: 2 },
        ]
    );
    assert_eq!(comp.segment_count, 2);
    assert_eq!(comp.transition_count, 0);
    assert!((comp.total_duration - 2.0).abs() < 1e-9);
}

#[test]
fn transition_keeps_its_own_duration_when_frames_round() {
    let fps24 = Fps::integer(24).unwrap();
    let mut sections = vec![section(0, 240), section(1, 240)];
    for s in &mut sections {
        s.fps = fps24;
        s.duration = 10.0;
    }
    // 0.7 s at 24 fps rounds to 17 frames, which is only 0.7083 s of pictures.
    let mut t = transition(0, 1, 17);
    t.fps = fps24;
    t.duration = 0.7;
    let audio = AudioSegments {
        sections: vec![audio(0, 10.0), audio(1, 10.0)],
        transitions: vec![],
    };

    let comp = assemble(&sections, &[t], &audio, fps24, Resolution::default());

    assert_eq!(comp.transition_count, 1);
    assert_eq!(comp.elements[1].duration, 0.7);
    assert_eq!(comp.elements[1].frame_count, 17);
    assert!((comp.elements[2].start_sec - 10.7).abs() < 1e-9);
    assert!((comp.total_duration - 20.7).abs() < 1e-9);
}

#[test]
fn duration_never_shrinks_the_visual_track() {
    let sections = vec![section(0, 300), section(1, 300)];
    let transitions = vec![transition(0, 1, 30)];
    let audio = AudioSegments {
        // Audio shorter than the 10 s of frames, and a 2.5 s transition narration.
        sections: vec![audio(0, 8.0), audio(1, 12.0)],
        transitions: vec![audio(0, 2.5)],
    };

    let comp = assemble(&sections, &transitions, &audio, fps(), Resolution::default());

    let durations = comp.elements.iter().map(|e| e.duration).collect::<Vec<_>>();
    assert_eq!(durations, vec![10.0, 2.5, 12.0]);
    assert_eq!(comp.elements[1].audio_path, Some(PathBuf::from("a0.wav")));
    assert_eq!(comp.elements[1].frame_count, 30);
}

#[test]
fn empty_inputs_give_empty_composition() {
    let comp = assemble(&[], &[], &AudioSegments::default(), fps(), Resolution::default());
    assert!(comp.is_empty());
    assert_eq!(comp.total_duration, 0.0);
}

#[test]
fn assemble_set_uses_set_fps_and_resolution() {
    let set = AnimationSet {
        sections: vec![section(0, 30)],
        transitions: vec![],
        style: StyleName::Standard,
        resolution: Resolution::new(64, 36),
        fps: fps(),
    };
    let comp = assemble_set(&set, &three_section_audio());
    assert_eq!(comp.resolution, Resolution::new(64, 36));
    assert_eq!(comp.segment_count, 1);
}

#[test]
fn manifest_is_written_as_json() {
    let tmp = tempfile::tempdir().unwrap();
    let sections = vec![section(0, 30), section(1, 30)];
    let transitions = vec![transition(0, 1, 30)];
    let comp = assemble(
        &sections,
        &transitions,
        &three_section_audio(),
        fps(),
        Resolution::default(),
    );

    let path = tmp.path().join("nested/manifest.json");
    comp.write_manifest(&path).unwrap();

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(v["segment_count"], 2);
    assert_eq!(v["elements"][0]["type"], "segment");
    assert_eq!(v["elements"][1]["type"], "transition");
    assert_eq!(v["elements"][1]["audio_path"], serde_json::Value::Null);
    assert_eq!(v["elements"][2]["start_sec"], 11.0);
}
