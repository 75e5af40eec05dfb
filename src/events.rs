//! Change notification for observers (UI, loggers, tests).
//!
//! Components queue [`EngineEvent`]s in a local outbox while they work; the
//! [`Session`](crate::Session) moves them onto the [`EventBus`] after every
//! operation. Each subscriber gets its own rtrb ring so a slow reader only
//! ever loses its own events and publishing never blocks.

use rtrb::{Consumer, Producer, RingBuffer};

use crate::{effects::EffectKind, error::ChainError, io::NoteName};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    NoteStarted { note: NoteName, voices: usize },
    NoteStopped { note: NoteName },
    /// A layer's pool was exhausted; the note sounds without it.
    VoiceDropped { note: NoteName, layer: usize },
    TimbreAssigned { layer: usize, label: String },
    TimbreCleared { layer: usize },
    GainChanged { gain: f32 },
    /// The live effect path after a toggle or reorder, in processing order.
    ChainRewired { active: Vec<EffectKind> },
    ParamsChanged { kind: EffectKind },
    OrderRejected { reason: ChainError },
    Randomized {
        enabled: Vec<EffectKind>,
        chaos: Option<f32>,
    },
}

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Producer<EngineEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Events published once its ring is full are
    /// dropped for that observer only.
    pub fn subscribe(&mut self, capacity: usize) -> Consumer<EngineEvent> {
        let (tx, rx) = RingBuffer::new(capacity.max(1));
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn publish(&mut self, event: EngineEvent) {
        self.subscribers.retain(|tx| !tx.is_abandoned());

        if let Some((last, rest)) = self.subscribers.split_last_mut() {
            for tx in rest {
                let _ = tx.push(event.clone());
            }
            let _ = last.push(event);
        }
    }

    pub fn publish_all(&mut self, events: impl IntoIterator<Item = EngineEvent>) {
        for event in events {
            self.publish(event);
        }
    }
}
