//! # Procedural Placement
//!
//! Platform, hazard, and collectible placement for one level.
//!
//! All randomness is drawn from the level's seeded stream - never a
//! shared or global generator - so every placement is reproducible per
//! (seed, level number). The draw order inside each function is part of
//! the determinism contract: do not reorder samples.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use strata_core::Vec2;

use crate::chunk::{
    CollectibleRecord, HazardKind, HazardRecord, LevelChunk, PlatformKind, PlatformRecord,
};
use crate::settings::{HazardSettings, LevelSettings, PlatformSettings};

/// Base score of a collectible before any multiplier.
const BASE_ITEM_SCORE: f32 = 100.0;

/// Fills an empty chunk with platforms and hazards.
///
/// The chunk's `coord` and `position` must already be set; hazards are
/// skipped entirely when their density is zero.
pub fn fill_chunk(chunk: &mut LevelChunk, settings: &LevelSettings, rng: &mut ChaCha8Rng) {
    place_platforms(chunk, settings, rng);

    if settings.hazards.hazard_density > 0.0 {
        place_hazards(chunk, settings, rng);
    }
}

/// Generates the chunk's platforms.
fn place_platforms(chunk: &mut LevelChunk, settings: &LevelSettings, rng: &mut ChaCha8Rng) {
    let chunk_size = settings.streaming.chunk_size;
    let density = settings.platforms.platform_density * settings.difficulty_scale;
    let count = (density * (chunk_size / 10.0)).round() as usize;

    chunk.platforms.reserve(count);
    for _ in 0..count {
        let x = rng.gen_range(chunk.position.x..chunk.position.x + chunk_size);
        let y = rng.gen_range(0.0..settings.max_height);
        let width = lerp(
            settings.platforms.min_platform_width,
            settings.platforms.max_platform_width,
            rng.gen::<f32>(),
        );
        let kind = platform_kind(&settings.platforms, rng.gen::<f32>());

        chunk.platforms.push(PlatformRecord {
            position: Vec2::new(x, y),
            width,
            kind,
        });
    }
}

/// Generates the chunk's hazards.
fn place_hazards(chunk: &mut LevelChunk, settings: &LevelSettings, rng: &mut ChaCha8Rng) {
    let chunk_size = settings.streaming.chunk_size;
    let mut density = settings.hazards.hazard_density;
    if settings.hazards.scale_with_difficulty {
        density *= settings.difficulty_scale;
    }
    let count = (density * (chunk_size / 15.0)).round() as usize;
    let height_cap = settings.max_height * settings.hazards.max_height_ratio;

    chunk.hazards.reserve(count);
    for _ in 0..count {
        let x = rng.gen_range(chunk.position.x..chunk.position.x + chunk_size);
        let y = rng.gen_range(0.0..height_cap);
        let kind = hazard_kind(&settings.hazards, rng.gen::<f32>());

        chunk.hazards.push(HazardRecord {
            position: Vec2::new(x, y),
            kind,
        });
    }
}

/// Generates the level-wide collectible set.
///
/// Ids are assigned monotonically from zero and are scoped to this level.
/// The caller hands the records to the collection collaborator; nothing
/// here retains them.
#[must_use]
pub fn place_collectibles(
    level_number: u32,
    settings: &LevelSettings,
    rng: &mut ChaCha8Rng,
) -> Vec<CollectibleRecord> {
    let total =
        (settings.level_length as f32 * settings.collectibles.item_density).round() as usize;
    let level_extent = settings.level_extent();

    let mut items = Vec::with_capacity(total);
    for id in 0..total {
        let risk = 1.0
            + (settings.collectibles.risk_reward_balance - 1.0) * rng.gen::<f32>();
        let mut base = BASE_ITEM_SCORE;
        if rng.gen::<f32>() < settings.collectibles.rare_item_rate {
            base *= 5.0;
        }
        let score = (base * risk * settings.difficulty_scale).round() as u32;
        let required = rng.gen::<f32>() < settings.collectibles.required_item_rate;
        let x = rng.gen_range(0.0..level_extent);
        let y = rng.gen_range(1.0..settings.max_height);

        items.push(CollectibleRecord {
            id: id as u32,
            name: format!("item_{level_number}_{id}"),
            score,
            required,
            position: Vec2::new(x, y),
            description: "Procedurally placed collectible".to_owned(),
        });
    }

    items
}

/// Selects a platform kind from a uniform sample via cumulative
/// thresholds: falling, then moving, then static.
fn platform_kind(platforms: &PlatformSettings, sample: f32) -> PlatformKind {
    if sample < platforms.falling_platform_rate {
        PlatformKind::Falling
    } else if sample < platforms.falling_platform_rate + platforms.moving_platform_rate {
        PlatformKind::Moving
    } else {
        PlatformKind::Static
    }
}

/// Selects a hazard kind by normalizing the configured rates to sum 1 and
/// sampling the cumulative distribution. All-zero rates default to spikes.
fn hazard_kind(hazards: &HazardSettings, sample: f32) -> HazardKind {
    let total = hazards.spike_rate + hazards.lava_rate + hazards.enemy_rate;
    if total == 0.0 {
        return HazardKind::Spike;
    }

    let scaled = sample * total;
    if scaled < hazards.spike_rate {
        HazardKind::Spike
    } else if scaled < hazards.spike_rate + hazards.lava_rate {
        HazardKind::Lava
    } else {
        HazardKind::Enemy
    }
}

/// Linear interpolation between `a` and `b`.
#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
