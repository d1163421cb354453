//! # Level Chunk Data Model
//!
//! The level is organized into fixed-width chunks along the streaming
//! axis. A chunk owns the platforms and hazards generated inside its
//! horizontal slice; collectibles are level-wide and never stored here.
//!
//! Chunk identity is the grid coordinate: the coordinator guarantees at
//! most one active chunk per coordinate at any time.

use serde::{Deserialize, Serialize};
use strata_core::pool::Recycle;
use strata_core::Vec2;

/// Chunk coordinate (identifies a chunk in the level grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not world units; the streaming axis).
    pub x: i32,
    /// Y coordinate (in chunks; zero for a single-lane level).
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts a world-space position to the coordinate of the chunk
    /// containing it.
    #[inline]
    #[must_use]
    pub fn from_world_pos(position: Vec2, chunk_size: f32) -> Self {
        Self {
            x: (position.x / chunk_size).floor() as i32,
            y: (position.y / chunk_size).floor() as i32,
        }
    }

    /// Returns the world-space origin (corner) of this chunk.
    #[inline]
    #[must_use]
    pub fn origin(self, chunk_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * chunk_size, self.y as f32 * chunk_size)
    }
}

/// Behavior class of a generated platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Fixed in place.
    #[default]
    Static,
    /// Patrols between endpoints.
    Moving,
    /// Drops after the player stands on it.
    Falling,
}

/// Behavior class of a generated hazard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    /// Stationary damage on contact.
    #[default]
    Spike,
    /// Area damage over time.
    Lava,
    /// Mobile threat.
    Enemy,
}

/// One generated platform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformRecord {
    /// World-space position.
    pub position: Vec2,
    /// Horizontal extent, bounded by the configured min/max widths.
    pub width: f32,
    /// Behavior class.
    pub kind: PlatformKind,
}

/// One generated hazard.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HazardRecord {
    /// World-space position.
    pub position: Vec2,
    /// Behavior class.
    pub kind: HazardKind,
}

/// One collectible item, produced level-wide and handed to the collection
/// collaborator. The generator keeps no long-lived reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectibleRecord {
    /// Level-scoped id, assigned monotonically from zero.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Score awarded on collection.
    pub score: u32,
    /// Whether the item is required for level completion.
    pub required: bool,
    /// World-space position.
    pub position: Vec2,
    /// Display description.
    pub description: String,
}

/// A chunk of generated level content.
///
/// Lifecycle: acquired from the pool when entering the active window,
/// filled once by the coordinator, and recycled back into the pool when
/// it crosses the unload boundary or the level is cleared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelChunk {
    /// Grid coordinate; the chunk's identity.
    pub coord: ChunkCoord,
    /// World-space origin.
    pub position: Vec2,
    /// Platforms generated inside this chunk, in generation order.
    pub platforms: Vec<PlatformRecord>,
    /// Hazards generated inside this chunk, in generation order.
    pub hazards: Vec<HazardRecord>,
}

impl Recycle for LevelChunk {
    fn recycle(&mut self) {
        self.coord = ChunkCoord::default();
        self.position = Vec2::ZERO;
        self.platforms.clear();
        self.hazards.clear();
    }
}
