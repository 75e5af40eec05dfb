//! Player - builds a session and drives it from the default output device

use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Producer, PushError, RingBuffer};
use tracing::{debug, info, warn};

use datatone::{
    effects::SeriesMetrics,
    io::NoteName,
    synth::SynthMessage,
    wavetable::SampleSeries,
    EngineConfig, Session, LAYER_COUNT, MAX_BLOCK_SIZE,
};

const NOTE_QUEUE: usize = 256;
const STEP: Duration = Duration::from_millis(350);

pub struct Player {
    config: EngineConfig,
    layers: Vec<SampleSeries>,
    randomize: Option<(SeriesMetrics, u64)>,
    notes: Vec<String>,
}

impl Player {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            layers: Vec::new(),
            randomize: None,
            notes: Vec::new(),
        }
    }

    /// Add a series as the next oscillator layer. Extra layers are ignored.
    pub fn layer(mut self, series: SampleSeries) -> Self {
        if self.layers.len() < LAYER_COUNT {
            self.layers.push(series);
        }
        self
    }

    /// Roll the effects rack from `metrics` before playing.
    pub fn randomize(mut self, metrics: SeriesMetrics, seed: u64) -> Self {
        self.randomize = Some((metrics, seed));
        self
    }

    pub fn arpeggio(mut self, notes: &[&str]) -> Self {
        self.notes = notes.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Run the application (takes over, plays audio until killed)
    pub fn run(self) -> EyreResult<()> {
        let notes = self
            .notes
            .iter()
            .map(|n| n.parse::<NoteName>())
            .collect::<Result<Vec<_>, _>>()
            .wrap_err("bad note in arpeggio")?;
        if notes.is_empty() {
            return Err(eyre!("nothing to play"));
        }

        // Set up audio
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        info!(sample_rate, channels, "output device ready");

        let mut session = Session::new(self.config.with_sample_rate(sample_rate));
        for (index, series) in self.layers.iter().enumerate() {
            session
                .set_wavetable(index, series)
                .wrap_err_with(|| format!("layer {index} from {:?}", series.label))?;
        }
        if let Some((metrics, seed)) = self.randomize {
            let outcome = session.randomize_effects(Some(&metrics), seed);
            info!(enabled = ?outcome.enabled, chaos = ?outcome.chaos, "effects rolled");
        }
        session.start();

        let mut events = session.subscribe(NOTE_QUEUE);
        let (mut tx, mut rx) = RingBuffer::<SynthMessage>::new(NOTE_QUEUE);

        let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut right = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                session.process_messages(&mut rx);

                for frame_block in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                    let frames = frame_block.len() / channels;
                    let (l, r) = (&mut left[..frames], &mut right[..frames]);
                    session.render_stereo(l, r);

                    for (i, out) in frame_block.chunks_mut(channels).take(frames).enumerate() {
                        match out {
                            [mono] => *mono = 0.5 * (l[i] + r[i]),
                            [a, b, rest @ ..] => {
                                *a = l[i];
                                *b = r[i];
                                rest.fill(0.0);
                            }
                            [] => {}
                        }
                    }
                }
            },
            |err| warn!(%err, "audio stream error"),
            None,
        )?;

        stream.play()?;
        info!("playing, press Ctrl+C to stop");

        for note in notes.iter().cycle() {
            send(&mut tx, SynthMessage::NoteOn { note: *note, velocity: 0.8 });
            std::thread::sleep(STEP);
            send(&mut tx, SynthMessage::NoteOff { note: *note });

            while let Ok(event) = events.pop() {
                debug!(?event, "engine event");
            }
        }
        Ok(())
    }
}

/// Queue a message for the audio thread without blocking. A full queue drops
/// the message and says so, since a lost note-off leaves a note hanging.
fn send(tx: &mut Producer<SynthMessage>, message: SynthMessage) -> bool {
    match tx.push(message) {
        Ok(()) => true,
        Err(PushError::Full(dropped)) => {
            warn!(?dropped, "note queue full, message dropped");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_reports_full_queue() {
        let (mut tx, mut rx) = RingBuffer::<SynthMessage>::new(1);
        let note: NoteName = "C4".parse().unwrap();

        assert!(send(&mut tx, SynthMessage::NoteOn { note, velocity: 0.8 }));
        assert!(!send(&mut tx, SynthMessage::NoteOff { note }));

        assert_eq!(rx.pop(), Ok(SynthMessage::NoteOn { note, velocity: 0.8 }));
        assert!(send(&mut tx, SynthMessage::NoteOff { note }));
        assert_eq!(rx.pop(), Ok(SynthMessage::NoteOff { note }));
    }
}
