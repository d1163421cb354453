//! # Streaming Walk Integration Test
//!
//! Proves the player can run the whole level forward without ever
//! standing on ungenerated ground, while memory stays bounded by the
//! streaming window and the recycle pool.

use std::collections::HashSet;

use strata_levelgen::{ChunkCoord, EventBus, LevelEvent, LevelGenerator, LevelSettings, Vec2};

fn walk_settings() -> LevelSettings {
    let mut settings = LevelSettings::default();
    settings.streaming.seed = 42;
    settings.level_length = 100;
    settings
}

/// Walk 5,000 units east; the preload window must always be ahead of the
/// player and eviction must keep the active set bounded.
#[test]
fn test_walk_5000_units() {
    let (sender, receiver) = EventBus::create_pair(65_536);
    let mut generator =
        LevelGenerator::new(walk_settings(), sender, None).expect("settings must validate");
    generator.generate_level(1).expect("generation succeeds");

    let preload = generator.settings().streaming.preload_distance;
    let unload = generator.settings().streaming.unload_distance;
    let chunk_size = generator.settings().streaming.chunk_size;

    // unload window + preload window, plus the chunk the player stands in.
    let max_active = ((preload + unload) / chunk_size).ceil() as usize + 1;

    let mut x = 0.0f32;
    while x < 5000.0 {
        x += 2.0;
        generator.update_player_position(Vec2::new(x, 0.0));

        // The watermark always covers the preload distance.
        assert!(
            generator.generated_distance() >= x + preload,
            "watermark fell behind at x={x}"
        );

        // The chunk under the player is always active.
        let standing = ChunkCoord::from_world_pos(Vec2::new(x, 0.0), chunk_size);
        assert!(
            generator.chunk_at(standing).is_some(),
            "no ground under the player at x={x}"
        );

        // Eviction keeps the active set bounded.
        assert!(
            generator.active_chunk_count() <= max_active,
            "active set grew to {} at x={x}",
            generator.active_chunk_count()
        );

        // Nothing behind the unload boundary survives.
        for coord in generator.active_coords() {
            let origin_x = coord.origin(chunk_size).x;
            assert!(origin_x >= x - unload, "stale chunk {coord:?} at x={x}");
        }
    }

    let stats = generator.stats();
    assert!(stats.chunks_generated > 100);
    assert!(stats.chunks_destroyed > 80);
    // Pool never holds more than was ever destroyed.
    assert!(generator.pooled_chunks() as u64 <= stats.chunks_destroyed);

    // Every generated coordinate was unique across the whole walk.
    let mut seen: HashSet<ChunkCoord> = HashSet::new();
    for event in receiver.drain() {
        if let LevelEvent::ChunkGenerated { coordinate, .. } = event {
            assert!(seen.insert(coordinate), "coordinate {coordinate:?} generated twice");
        }
    }
    assert_eq!(seen.len() as u64, stats.chunks_generated);
}

/// A budgeted generator must catch up while the player moves at running
/// speed, without ever generating more than the budget per tick.
#[test]
fn test_budgeted_walk_catches_up() {
    let mut settings = walk_settings();
    settings.streaming.max_chunks_per_tick = 2;

    let (sender, receiver) = EventBus::create_pair(65_536);
    let mut generator =
        LevelGenerator::new(settings, sender, None).expect("settings must validate");
    generator.generate_level(1).expect("generation succeeds");
    receiver.drain();

    let mut x = 0.0f32;
    while x < 1500.0 {
        x += 4.0;
        generator.update_player_position(Vec2::new(x, 0.0));

        let generated_this_tick = receiver
            .drain()
            .iter()
            .filter(|event| matches!(event, LevelEvent::ChunkGenerated { .. }))
            .count();
        assert!(
            generated_this_tick <= 2,
            "budget exceeded: {generated_this_tick} chunks in one tick"
        );
    }

    // At 4 units per tick against a 50-unit chunk, a budget of two chunks
    // per tick more than keeps pace.
    assert!(generator.generated_distance() >= x + generator.settings().streaming.preload_distance);
}
