//! Simulation events for live status output.
//!
//! Tasks publish events through an [`EventSink`] after releasing the pool
//! lock. The sink never blocks: with no receiver attached events are dropped.

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::Serialize;

use super::resource_pool::{InstanceStatus, ResourceCounts};

/// Something observable happened during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimulationEvent {
    /// An instance found the initial players exhausted and woke the generator.
    GeneratorActivated {
        /// Instance that observed the scarcity.
        instance: usize,
    },
    /// An instance formed a party and started a dungeon.
    DungeonStarted {
        /// Instance index.
        instance: usize,
        /// Dungeon length in simulated seconds.
        duration: u32,
        /// Statuses of all instances when the party was formed.
        statuses: Vec<InstanceStatus>,
    },
    /// An instance finished its dungeon.
    DungeonCompleted {
        /// Instance index.
        instance: usize,
        /// Dungeon length in simulated seconds.
        duration: u32,
        /// Statuses of all instances after completion.
        statuses: Vec<InstanceStatus>,
    },
    /// The generator deposited a batch.
    PlayersAdded {
        /// Players added by this batch.
        batch: ResourceCounts,
    },
    /// The generator's budget ran out and it ended the simulation.
    BonusExpired,
}

/// Non-blocking publisher of [`SimulationEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<Sender<SimulationEvent>>,
}

impl EventSink {
    /// Sink that discards every event.
    #[must_use]
    pub const fn none() -> Self {
        Self { tx: None }
    }

    /// Sink backed by an unbounded channel, with its receiving end.
    #[must_use]
    pub fn channel() -> (Self, Receiver<SimulationEvent>) {
        let (tx, rx) = unbounded();
        (Self { tx: Some(tx) }, rx)
    }

    /// Publish an event. A disconnected receiver is not an error.
    pub fn emit(&self, event: SimulationEvent) {
        if let Some(tx) = &self.tx {
            if tx.send(event).is_err() {
                tracing::debug!("event receiver disconnected; dropping event");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_sink_discards() {
        EventSink::none().emit(SimulationEvent::BonusExpired);
    }

    #[test]
    fn test_channel_delivers_in_order() {
        let (sink, rx) = EventSink::channel();
        sink.emit(SimulationEvent::GeneratorActivated { instance: 0 });
        sink.emit(SimulationEvent::BonusExpired);
        drop(sink);
        let events: Vec<_> = rx.iter().collect();
        assert_eq!(
            events,
            vec![
                SimulationEvent::GeneratorActivated { instance: 0 },
                SimulationEvent::BonusExpired
            ]
        );
    }

    #[test]
    fn test_emit_after_receiver_dropped() {
        let (sink, rx) = EventSink::channel();
        drop(rx);
        sink.emit(SimulationEvent::BonusExpired);
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let json = serde_json::to_string(&SimulationEvent::PlayersAdded {
            batch: ResourceCounts::new(1, 0, 2),
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"event":"players_added","batch":{"tanks":1,"healers":0,"dps":2}}"#
        );
    }
}
