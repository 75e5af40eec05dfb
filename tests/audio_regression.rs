use datatone::{
    effects::{EffectKind, SeriesMetrics},
    events::EngineEvent,
    graph::output::OutputSink,
    io::NoteName,
    wavetable::{SampleSeries, WavetableGenerator},
    EngineConfig, Session,
};

fn day(label: &str, phase: f64) -> SampleSeries {
    let values = (0..288)
        .map(|i| 120.0 + 45.0 * (i as f64 / 30.0 + phase).sin() + 15.0 * (i as f64 / 7.0).cos())
        .collect();
    SampleSeries::new(label, values)
}

fn note(name: &str) -> NoteName {
    name.parse().unwrap()
}

/// Collects everything rendered so the test can inspect it afterwards.
#[derive(Default)]
struct Capture(std::sync::Arc<std::sync::Mutex<Vec<f32>>>);

impl OutputSink for Capture {
    fn consume(&mut self, left: &[f32], right: &[f32]) {
        let mut buf = self.0.lock().unwrap();
        for (&l, &r) in left.iter().zip(right) {
            buf.push(l);
            buf.push(r);
        }
    }
}

#[test]
fn renders_silence_with_empty_scene() {
    let mut session = Session::new(EngineConfig::default());
    session.start();
    session.note_on(note("C4"), 1.0);

    let mut left = vec![1.0; 4096];
    let mut right = vec![1.0; 4096];
    session.render_stereo(&mut left, &mut right);
    assert!(left.iter().chain(&right).all(|&s| s == 0.0));
}

#[test]
fn flat_day_gives_silent_timbre() {
    let mut generator = WavetableGenerator::from_config(&EngineConfig::default());
    let timbre = generator
        .generate(&SampleSeries::new("flat", vec![50.0; 288]))
        .unwrap();

    assert!(timbre.wavetable.is_silent());
    assert_eq!(timbre.partials.len(), 32);
    assert_eq!(timbre.partials.as_slice()[0], 0.0);
    assert!(timbre.partials.as_slice().iter().all(|p| p.is_finite()));
}

#[test]
fn full_scene_stays_bounded() {
    let mut session = Session::new(EngineConfig::default());
    for (layer, phase) in [0.0, 1.3, 2.1].into_iter().enumerate() {
        session.set_wavetable(layer, &day("day", phase)).unwrap();
    }
    let metrics = SeriesMetrics::new(0.6, 0.4, 0.5, 0.7, 0.3);
    session.randomize_effects(Some(&metrics), 42);
    session.start();

    let capture = Capture::default();
    let samples = capture.0.clone();
    session.connect_output(Box::new(capture));

    for name in ["C3", "E3", "G3", "B3", "D4"] {
        session.note_on(note(name), 0.9);
    }
    session.render(24_000);
    session.all_notes_off();
    session.render(24_000);

    let samples = samples.lock().unwrap();
    assert_eq!(samples.len(), 2 * 48_000);
    assert!(samples.iter().all(|s| s.is_finite()));
    assert!(samples.iter().any(|s| s.abs() > 1e-3));
    assert!(samples.iter().all(|s| s.abs() < 32.0));
}

#[test]
fn note_off_after_timbre_swap_frees_every_voice() {
    let config = EngineConfig::default().with_voices_per_layer(2);
    let mut session = Session::new(config);
    session.set_wavetable(0, &day("monday", 0.0)).unwrap();
    session.set_wavetable(1, &day("tuesday", 1.0)).unwrap();
    session.start();

    session.note_on(note("A3"), 1.0);
    session.note_on(note("C4"), 1.0);
    session.set_wavetable(0, &day("wednesday", 2.0)).unwrap();
    session.note_off(note("A3"));
    session.note_off(note("C4"));

    for layer in 0..2 {
        assert_eq!(session.synth().layer(layer).unwrap().allocated_count(), 0);
    }

    // Both pools are whole again.
    let mut events = session.subscribe(16);
    session.note_on(note("E4"), 1.0);
    session.note_on(note("G4"), 1.0);
    let started = std::iter::from_fn(|| events.pop().ok())
        .filter(|e| matches!(e, EngineEvent::NoteStarted { voices: 2, .. }))
        .count();
    assert_eq!(started, 2);
}

#[test]
fn reorder_drives_the_live_path() {
    let mut session = Session::new(EngineConfig::default());
    for kind in [EffectKind::Reverb, EffectKind::Distortion, EffectKind::Chorus] {
        session.set_effect_enabled(kind, true);
    }

    let mut order = EffectKind::ALL.to_vec();
    order.reverse();
    session.reorder_effects(&order).unwrap();
    assert_eq!(
        session.chain().active_path(),
        &[EffectKind::Reverb, EffectKind::Chorus, EffectKind::Distortion]
    );

    assert!(session.reorder_effect_ids(&["reverb", "chorus"]).is_err());
    assert_eq!(session.chain().order(), order.as_slice());
}
