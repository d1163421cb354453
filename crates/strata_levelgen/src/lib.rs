//! # STRATA Level Generation
//!
//! Deterministic procedural level generation with distance-based chunk
//! streaming for side-scrolling platformers.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: same seed + level number = same level, always
//! 2. **Chunked**: content is generated in fixed-width chunks along the
//!    streaming axis
//! 3. **Streamable**: chunks are generated ahead of the player and
//!    recycled behind them
//! 4. **Single-threaded**: everything runs synchronously inside the
//!    host's frame loop
//!
//! ## Core Components
//!
//! - `LevelGenerator`: generation coordinator, chunk lifecycle, pooling
//! - `LevelSettings`: TOML-loadable, validated configuration
//! - `streaming`: pure preload/unload window mathematics
//! - `placement`: seeded platform/hazard/collectible algorithms
//! - `EventBus`: bounded notification channel to observers
//!
//! ## Example
//!
//! ```rust,ignore
//! use strata_levelgen::{EventBus, LevelGenerator, LevelSettings, Vec2};
//!
//! let (sender, receiver) = EventBus::create_pair(1024);
//! let mut generator = LevelGenerator::new(LevelSettings::default(), sender, None)?;
//!
//! generator.generate_level(1)?;
//! generator.update_player_position(Vec2::new(150.0, 0.0));
//!
//! for event in receiver.drain() {
//!     println!("{event:?}");
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod collection;
pub mod error;
pub mod events;
pub mod generator;
pub mod placement;
pub mod seed;
pub mod settings;
pub mod streaming;

pub use chunk::{
    ChunkCoord, CollectibleRecord, HazardKind, HazardRecord, LevelChunk, PlatformKind,
    PlatformRecord,
};
pub use collection::CollectionSink;
pub use error::{LevelGenError, LevelGenResult};
pub use events::{EventBus, EventReceiver, EventSender, LevelEvent};
pub use generator::{GenStats, LevelGenerator};
pub use seed::LevelSeed;
pub use settings::{
    CollectibleSettings, HazardSettings, LevelSettings, PlatformSettings, StreamingSettings,
};
pub use strata_core::Vec2;
