//! # Streaming Policy
//!
//! Pure window mathematics for distance-based chunk streaming: which grid
//! indices must be generated ahead of the player, and which active chunks
//! have fallen behind the unload boundary.
//!
//! Nothing here touches chunks, pools, or events - the policy is a
//! function of state so the coordinator and the mathematics can be tested
//! independently.

use crate::chunk::ChunkCoord;

/// Number of chunks needed to cover the preload distance from a standing
/// start.
#[inline]
#[must_use]
pub fn initial_window(preload_distance: f32, chunk_size: f32) -> u32 {
    (preload_distance / chunk_size).ceil() as u32
}

/// Ordered grid indices to generate so the watermark reaches
/// `target_preload`.
///
/// The watermark (`generated_distance`) advances in whole chunks, so the
/// first new index is `floor(generated_distance / chunk_size)` and the
/// plan is contiguous from there. Returns an empty plan when the target
/// does not exceed the watermark.
#[must_use]
pub fn forward_plan(generated_distance: f32, target_preload: f32, chunk_size: f32) -> Vec<i32> {
    if target_preload <= generated_distance {
        return Vec::new();
    }

    let needed = ((target_preload - generated_distance) / chunk_size).ceil() as i32;
    let base = (generated_distance / chunk_size).floor() as i32;
    (base..base + needed).collect()
}

/// Active coordinates whose chunk origin lies strictly left of
/// `unload_boundary`, sorted for deterministic notification order.
#[must_use]
pub fn evict_plan(
    origins: impl IntoIterator<Item = (ChunkCoord, f32)>,
    unload_boundary: f32,
) -> Vec<ChunkCoord> {
    let mut victims: Vec<ChunkCoord> = origins
        .into_iter()
        .filter(|&(_, origin_x)| origin_x < unload_boundary)
        .map(|(coord, _)| coord)
        .collect();
    victims.sort_unstable();
    victims
}
