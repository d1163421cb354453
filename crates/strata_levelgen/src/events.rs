//! # Level Event System
//!
//! Fire-and-forget notifications from the generation coordinator to its
//! observers (UI, audio, scoring, telemetry).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐      ┌─────────────┐      ┌──────────────┐
//! │  Generator   │─────>│   Event     │─────>│  Observers   │
//! │ (coordinator)│      │   Channel   │      │ (UI, audio)  │
//! └──────────────┘      └─────────────┘      └──────────────┘
//! ```
//!
//! Emission is decoupled from dispatch: the coordinator pushes into a
//! bounded channel and observers drain it at their own pace. Sending
//! never blocks the generation path.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use strata_core::Vec2;

use crate::chunk::ChunkCoord;

/// Notifications emitted by the generation coordinator.
///
/// These events are the "API" between the generator and its observers.
/// Each observer only processes events relevant to it.
#[derive(Clone, Debug, PartialEq)]
pub enum LevelEvent {
    /// A full level finished generating.
    LevelGenerated {
        /// Level that was generated.
        level_number: u32,
        /// Wall-clock generation time in seconds.
        generation_time_secs: f32,
        /// Number of chunks in the initial window.
        chunk_count: usize,
        /// Effective seed the level was generated from.
        seed: u64,
        /// Difficulty scale the level was generated with.
        difficulty_scale: f32,
    },

    /// A chunk entered the active window.
    ChunkGenerated {
        /// Grid coordinate of the chunk.
        coordinate: ChunkCoord,
        /// World-space origin of the chunk.
        position: Vec2,
        /// Platforms generated in the chunk.
        platform_count: usize,
        /// Hazards generated in the chunk.
        hazard_count: usize,
    },

    /// A chunk crossed the unload boundary and was pooled.
    ChunkDestroyed {
        /// Grid coordinate of the chunk.
        coordinate: ChunkCoord,
        /// World-space origin of the chunk.
        position: Vec2,
        /// Platforms the chunk held when destroyed.
        platform_count: usize,
        /// Hazards the chunk held when destroyed.
        hazard_count: usize,
    },

    /// Streaming progress, emitted once per position update.
    LevelProgress {
        /// Player position the update was driven by.
        player_position: Vec2,
        /// Fraction of the level's extent covered by the watermark, in `[0, 1]`.
        progress: f32,
        /// Chunks currently active.
        active_chunks: usize,
    },
}

/// Event channel between the generator and its observers.
///
/// Pre-allocates a bounded channel to prevent memory growth in the
/// frame loop.
pub struct EventBus {
    /// Sender end - held by the generator.
    sender: Sender<LevelEvent>,
    /// Receiver end - held by observers.
    receiver: Receiver<LevelEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum events in flight before sends are dropped.
    ///   Use 1024 for a typical game loop.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle (clone for multiple consumers).
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a paired sender and receiver.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (EventSender, EventReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

/// Handle for emitting events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<LevelEvent>,
}

impl EventSender {
    /// Emits an event (non-blocking).
    ///
    /// Returns `false` if the channel is full or disconnected; the event
    /// is dropped rather than stalling generation.
    #[inline]
    pub fn send(&self, event: LevelEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for consuming events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<LevelEvent>,
}

impl EventReceiver {
    /// Receives all pending events (non-blocking).
    ///
    /// Returns the events in emission order; empty if none are pending.
    /// Also the way to discard a backlog the observer no longer cares
    /// about.
    #[inline]
    pub fn drain(&self) -> Vec<LevelEvent> {
        let mut events = Vec::with_capacity(64);
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Receives one event (non-blocking).
    #[inline]
    #[must_use]
    pub fn try_recv(&self) -> Option<LevelEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}
