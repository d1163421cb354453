//! # Generation Settings
//!
//! Externally supplied, immutable-per-generation configuration.
//!
//! Settings are plain data loaded once at startup, typically from a TOML
//! file, and validated before the generator accepts them. Every tunable
//! that was a magic constant in earlier prototypes (the required-item
//! probability, the hazard height cutoff) is a named field here.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LevelGenError, LevelGenResult};

/// Complete configuration for one level-generation service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    /// Level length in segments; the level spans
    /// `level_length * streaming.chunk_size` world units.
    pub level_length: u32,
    /// Multiplier applied to density and score formulas.
    pub difficulty_scale: f32,
    /// Maximum height of generated content, in world units.
    pub max_height: f32,
    /// Chunk streaming window configuration.
    pub streaming: StreamingSettings,
    /// Platform placement configuration.
    pub platforms: PlatformSettings,
    /// Hazard placement configuration.
    pub hazards: HazardSettings,
    /// Collectible placement configuration.
    pub collectibles: CollectibleSettings,
}

/// Chunk streaming window configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingSettings {
    /// Base random seed; zero means every run is randomized.
    pub seed: u64,
    /// Horizontal extent of one chunk, in world units.
    pub chunk_size: f32,
    /// Distance ahead of the player that must be covered by chunks.
    pub preload_distance: f32,
    /// Distance behind the player past which chunks are unloaded.
    pub unload_distance: f32,
    /// Upper bound on chunks generated per position update; zero means
    /// the whole forward gap is filled in one call.
    pub max_chunks_per_tick: u32,
}

/// Platform placement configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    /// Platforms per ten world units, before difficulty scaling.
    pub platform_density: f32,
    /// Narrowest platform that can be generated.
    pub min_platform_width: f32,
    /// Widest platform that can be generated.
    pub max_platform_width: f32,
    /// Probability that a platform moves.
    pub moving_platform_rate: f32,
    /// Probability that a platform falls when stood on.
    pub falling_platform_rate: f32,
}

/// Hazard placement configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardSettings {
    /// Hazards per fifteen world units; zero disables hazards entirely.
    pub hazard_density: f32,
    /// Relative spawn rate of spikes.
    pub spike_rate: f32,
    /// Relative spawn rate of lava.
    pub lava_rate: f32,
    /// Relative spawn rate of enemies.
    pub enemy_rate: f32,
    /// Whether `hazard_density` is multiplied by the difficulty scale.
    pub scale_with_difficulty: bool,
    /// Fraction of `max_height` below which hazards are placed.
    pub max_height_ratio: f32,
}

/// Collectible placement configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectibleSettings {
    /// Collectibles per level segment.
    pub item_density: f32,
    /// Probability that an item's score is multiplied fivefold.
    pub rare_item_rate: f32,
    /// Scales how strongly item scores spread above the base value.
    pub risk_reward_balance: f32,
    /// Probability that an item is required for level completion.
    pub required_item_rate: f32,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            level_length: 20,
            difficulty_scale: 1.0,
            max_height: 20.0,
            streaming: StreamingSettings::default(),
            platforms: PlatformSettings::default(),
            hazards: HazardSettings::default(),
            collectibles: CollectibleSettings::default(),
        }
    }
}

impl Default for StreamingSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            chunk_size: 50.0,
            preload_distance: 100.0,
            unload_distance: 150.0,
            max_chunks_per_tick: 0,
        }
    }
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            platform_density: 1.0,
            min_platform_width: 2.0,
            max_platform_width: 8.0,
            moving_platform_rate: 0.2,
            falling_platform_rate: 0.1,
        }
    }
}

impl Default for HazardSettings {
    fn default() -> Self {
        Self {
            hazard_density: 0.5,
            spike_rate: 0.2,
            lava_rate: 0.1,
            enemy_rate: 0.15,
            scale_with_difficulty: true,
            max_height_ratio: 0.7,
        }
    }
}

impl Default for CollectibleSettings {
    fn default() -> Self {
        Self {
            item_density: 1.0,
            rare_item_rate: 0.1,
            risk_reward_balance: 1.0,
            required_item_rate: 0.1,
        }
    }
}

impl LevelSettings {
    /// Parses settings from a TOML string.
    ///
    /// Missing fields fall back to their defaults, so partial files are
    /// valid. The result is *not* validated; call [`Self::validate`].
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid TOML.
    pub fn from_toml_str(source: &str) -> LevelGenResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> LevelGenResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Returns the level's total horizontal extent in world units.
    #[inline]
    #[must_use]
    pub fn level_extent(&self) -> f32 {
        self.level_length as f32 * self.streaming.chunk_size
    }

    /// Validates every field, failing fast on the first violation.
    ///
    /// # Errors
    ///
    /// Returns [`LevelGenError::InvalidSetting`] naming the offending
    /// field; nothing deeper in the pipeline needs to re-check.
    pub fn validate(&self) -> LevelGenResult<()> {
        if self.level_length == 0 {
            return invalid("level_length", "must be at least 1 segment");
        }
        if !(self.difficulty_scale > 0.0 && self.difficulty_scale <= 5.0) {
            return invalid("difficulty_scale", "must be within (0, 5]");
        }
        if self.max_height <= 1.0 {
            return invalid("max_height", "must exceed 1 world unit");
        }

        let s = &self.streaming;
        if s.chunk_size <= 0.0 {
            return invalid("streaming.chunk_size", "must be positive");
        }
        if s.preload_distance < s.chunk_size {
            return invalid(
                "streaming.preload_distance",
                "must cover at least one chunk",
            );
        }
        if s.unload_distance <= 0.0 {
            return invalid("streaming.unload_distance", "must be positive");
        }

        let p = &self.platforms;
        if p.platform_density < 0.0 {
            return invalid("platforms.platform_density", "must not be negative");
        }
        if p.min_platform_width <= 0.0 {
            return invalid("platforms.min_platform_width", "must be positive");
        }
        if p.max_platform_width < p.min_platform_width {
            return invalid(
                "platforms.max_platform_width",
                "must be at least min_platform_width",
            );
        }
        rate("platforms.moving_platform_rate", p.moving_platform_rate)?;
        rate("platforms.falling_platform_rate", p.falling_platform_rate)?;
        if p.moving_platform_rate + p.falling_platform_rate > 1.0 {
            return invalid(
                "platforms.falling_platform_rate",
                "moving and falling rates must sum to at most 1",
            );
        }

        let h = &self.hazards;
        if h.hazard_density < 0.0 {
            return invalid("hazards.hazard_density", "must not be negative");
        }
        rate("hazards.spike_rate", h.spike_rate)?;
        rate("hazards.lava_rate", h.lava_rate)?;
        rate("hazards.enemy_rate", h.enemy_rate)?;
        if !(h.max_height_ratio > 0.0 && h.max_height_ratio <= 1.0) {
            return invalid("hazards.max_height_ratio", "must be within (0, 1]");
        }

        let c = &self.collectibles;
        if c.item_density < 0.0 {
            return invalid("collectibles.item_density", "must not be negative");
        }
        rate("collectibles.rare_item_rate", c.rare_item_rate)?;
        rate("collectibles.required_item_rate", c.required_item_rate)?;
        if c.risk_reward_balance <= 0.0 {
            return invalid("collectibles.risk_reward_balance", "must be positive");
        }

        Ok(())
    }
}

/// Builds an [`LevelGenError::InvalidSetting`] result.
fn invalid(field: &'static str, reason: &str) -> LevelGenResult<()> {
    Err(LevelGenError::InvalidSetting {
        field,
        reason: reason.to_owned(),
    })
}

/// Checks that a probability field lies within `[0, 1]`.
fn rate(field: &'static str, value: f32) -> LevelGenResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        invalid(field, "must be within [0, 1]")
    }
}
