//! # Generation Coordinator
//!
//! Orchestrates level generation and chunk streaming: derives the level
//! seed, drives the placement algorithms, owns the active-chunk map and
//! the recycle pool, and emits notifications.
//!
//! ## Ownership
//!
//! The coordinator exclusively owns chunks and pool; no other component
//! may mutate them. Everything runs synchronously on the calling thread -
//! the host loop calls [`LevelGenerator::generate_level`] once per level
//! load and [`LevelGenerator::update_player_position`] once per tick.

use std::collections::HashMap;
use std::time::Instant;

use rand_chacha::ChaCha8Rng;
use strata_core::pool::RecyclePool;
use strata_core::Vec2;

use crate::chunk::{ChunkCoord, LevelChunk};
use crate::collection::CollectionSink;
use crate::error::LevelGenResult;
use crate::events::{EventSender, LevelEvent};
use crate::placement;
use crate::seed::LevelSeed;
use crate::settings::LevelSettings;
use crate::streaming;

/// Lifetime counters for one generator instance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GenStats {
    /// Chunks generated since construction (or the last reset).
    pub chunks_generated: u64,
    /// Chunks destroyed since construction (or the last reset).
    pub chunks_destroyed: u64,
    /// Wall-clock duration of the most recent level generation, seconds.
    pub last_generation_secs: f32,
}

/// Procedural level generation and chunk-streaming coordinator.
///
/// Collaborators are injected at construction: the event sender carries
/// fire-and-forget notifications, and the optional [`CollectionSink`]
/// receives each level's collectible set. A missing sink degrades
/// gracefully - collectibles are skipped with a warning while chunk
/// generation proceeds normally.
pub struct LevelGenerator {
    /// Validated, immutable-per-generation configuration.
    settings: LevelSettings,
    /// Notification channel to observers.
    events: EventSender,
    /// Receiver of level-wide collectibles, if attached.
    sink: Option<Box<dyn CollectionSink>>,
    /// Active chunks, keyed by grid coordinate. At most one per key.
    active: HashMap<ChunkCoord, LevelChunk>,
    /// Recycled chunk records awaiting reuse.
    pool: RecyclePool<LevelChunk>,
    /// The current level's random stream; `None` until a level exists.
    rng: Option<ChaCha8Rng>,
    /// Level currently generated (or being generated).
    current_level: u32,
    /// Watermark: rightmost world-space extent covered by generated
    /// chunks. Always a whole-chunk multiple.
    generated_distance: f32,
    /// Mutual-exclusion flag for `generate_level`.
    is_generating: bool,
    /// Whether a level is currently generated.
    is_level_generated: bool,
    /// Lifetime counters.
    stats: GenStats,
}

impl LevelGenerator {
    /// Creates a coordinator from validated settings.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LevelGenError::InvalidSetting`] if the settings
    /// fail validation; an invalid configuration is rejected here, never
    /// deep inside a generation loop.
    pub fn new(
        settings: LevelSettings,
        events: EventSender,
        sink: Option<Box<dyn CollectionSink>>,
    ) -> LevelGenResult<Self> {
        settings.validate()?;

        if sink.is_none() {
            tracing::warn!("no collection sink attached; collectible placement will be skipped");
        }

        Ok(Self {
            settings,
            events,
            sink,
            active: HashMap::new(),
            pool: RecyclePool::new(),
            rng: None,
            current_level: 0,
            generated_distance: 0.0,
            is_generating: false,
            is_level_generated: false,
            stats: GenStats::default(),
        })
    }

    /// Generates a level, replacing any existing one.
    ///
    /// Derives the level seed (base seed zero randomizes, anything else
    /// yields `base + level_number`), clears the previous level, fills the
    /// initial preload window, hands collectibles to the sink, and emits
    /// [`LevelEvent::LevelGenerated`].
    ///
    /// A re-entrant call while a generation is in progress is logged and
    /// ignored - no state changes.
    ///
    /// # Errors
    ///
    /// Any internal failure clears the in-progress flag, leaves the level
    /// cleared, and propagates to the caller.
    pub fn generate_level(&mut self, level_number: u32) -> LevelGenResult<()> {
        if self.is_generating {
            tracing::warn!(
                "level generation already in progress; ignoring request for level {}",
                level_number
            );
            return Ok(());
        }

        self.is_generating = true;
        let result = self.generate_level_inner(level_number);
        self.is_generating = false;

        if let Err(err) = result {
            tracing::error!("failed to generate level {}: {}", level_number, err);
            self.clear_current_level();
            return Err(err);
        }
        Ok(())
    }

    fn generate_level_inner(&mut self, level_number: u32) -> LevelGenResult<()> {
        let seed = LevelSeed::resolve(self.settings.streaming.seed, level_number);
        let started = Instant::now();

        self.current_level = level_number;
        self.clear_current_level();
        self.rng = Some(seed.rng());

        let chunk_size = self.settings.streaming.chunk_size;
        let window = streaming::initial_window(self.settings.streaming.preload_distance, chunk_size);
        for index in 0..window {
            self.generate_chunk(ChunkCoord::new(index as i32, 0));
        }
        self.generated_distance = window as f32 * chunk_size;

        self.hand_off_collectibles(level_number);

        self.stats.last_generation_secs = started.elapsed().as_secs_f32();
        self.is_level_generated = true;

        self.events.send(LevelEvent::LevelGenerated {
            level_number,
            generation_time_secs: self.stats.last_generation_secs,
            chunk_count: self.active.len(),
            seed: seed.value(),
            difficulty_scale: self.settings.difficulty_scale,
        });

        tracing::info!(
            "level {} generated in {:.3}s with {} chunks (seed {})",
            level_number,
            self.stats.last_generation_secs,
            self.active.len(),
            seed.value()
        );
        Ok(())
    }

    /// Destroys (pools) every active chunk and resets the watermark.
    ///
    /// Idempotent: clearing an already-empty level is a no-op.
    pub fn clear_current_level(&mut self) {
        let mut coords: Vec<ChunkCoord> = self.active.keys().copied().collect();
        coords.sort_unstable();
        for coord in coords {
            if let Some(chunk) = self.active.remove(&coord) {
                self.destroy_chunk(chunk);
            }
        }

        self.generated_distance = 0.0;
        self.is_level_generated = false;
    }

    /// Streams chunks around the player's position.
    ///
    /// Forward-fills chunks until the watermark covers
    /// `position.x + preload_distance` (bounded per call by
    /// `max_chunks_per_tick` when non-zero; the remaining deficit drains
    /// on subsequent ticks), evicts chunks behind
    /// `position.x - unload_distance`, then emits exactly one
    /// [`LevelEvent::LevelProgress`].
    pub fn update_player_position(&mut self, position: Vec2) {
        let chunk_size = self.settings.streaming.chunk_size;
        let budget = self.settings.streaming.max_chunks_per_tick;

        let target_preload = position.x + self.settings.streaming.preload_distance;
        if target_preload > self.generated_distance && self.rng.is_some() {
            let plan = streaming::forward_plan(self.generated_distance, target_preload, chunk_size);
            let take = if budget == 0 {
                plan.len()
            } else {
                plan.len().min(budget as usize)
            };

            for &index in plan.iter().take(take) {
                let coord = ChunkCoord::new(index, 0);
                if !self.active.contains_key(&coord) {
                    self.generate_chunk(coord);
                }
                self.generated_distance += chunk_size;
            }
        }

        let unload_boundary = position.x - self.settings.streaming.unload_distance;
        let victims = streaming::evict_plan(
            self.active.iter().map(|(coord, chunk)| (*coord, chunk.position.x)),
            unload_boundary,
        );
        let evicted = victims.len();
        for coord in victims {
            if let Some(chunk) = self.active.remove(&coord) {
                self.destroy_chunk(chunk);
            }
        }
        if evicted > 0 {
            tracing::debug!("unloaded {} chunks behind x={:.1}", evicted, unload_boundary);
        }

        self.events.send(LevelEvent::LevelProgress {
            player_position: position,
            progress: self.progress(),
            active_chunks: self.active.len(),
        });
    }

    /// Clears the level and zeroes counters and level number.
    pub fn reset(&mut self) {
        self.clear_current_level();
        self.current_level = 0;
        self.rng = None;
        self.stats = GenStats::default();
        tracing::info!("generator reset");
    }

    /// Replaces the configuration at runtime.
    ///
    /// The new settings apply from the next generation or streaming call.
    ///
    /// # Errors
    ///
    /// Returns an error and keeps the old settings if validation fails.
    pub fn update_settings(&mut self, settings: LevelSettings) -> LevelGenResult<()> {
        settings.validate()?;
        self.settings = settings;
        tracing::info!("generation settings updated");
        Ok(())
    }

    /// Generates one chunk and inserts it into the active map.
    ///
    /// Callers guarantee `coord` is not already active.
    fn generate_chunk(&mut self, coord: ChunkCoord) {
        let chunk_size = self.settings.streaming.chunk_size;

        let mut chunk = self.pool.acquire();
        chunk.coord = coord;
        chunk.position = coord.origin(chunk_size);

        if let Some(rng) = self.rng.as_mut() {
            placement::fill_chunk(&mut chunk, &self.settings, rng);
        }

        self.events.send(LevelEvent::ChunkGenerated {
            coordinate: coord,
            position: chunk.position,
            platform_count: chunk.platforms.len(),
            hazard_count: chunk.hazards.len(),
        });

        self.active.insert(coord, chunk);
        self.stats.chunks_generated += 1;
    }

    /// Emits the destruction notification and recycles the chunk.
    fn destroy_chunk(&mut self, chunk: LevelChunk) {
        self.events.send(LevelEvent::ChunkDestroyed {
            coordinate: chunk.coord,
            position: chunk.position,
            platform_count: chunk.platforms.len(),
            hazard_count: chunk.hazards.len(),
        });

        self.pool.release(chunk);
        self.stats.chunks_destroyed += 1;
    }

    /// Hands the level-wide collectible set to the sink, or skips with a
    /// warning when no sink is attached.
    fn hand_off_collectibles(&mut self, level_number: u32) {
        let Some(rng) = self.rng.as_mut() else {
            return;
        };

        if let Some(sink) = self.sink.as_mut() {
            let items = placement::place_collectibles(level_number, &self.settings, rng);
            tracing::info!(
                "placed {} collectible items for level {}",
                items.len(),
                level_number
            );
            sink.initialize_level(items);
        } else {
            tracing::warn!(
                "collection sink unavailable; skipping collectible placement for level {}",
                level_number
            );
        }
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    /// The level currently generated (or being generated).
    #[inline]
    #[must_use]
    pub const fn current_level(&self) -> u32 {
        self.current_level
    }

    /// True while a `generate_level` call is in progress.
    #[inline]
    #[must_use]
    pub const fn is_generating(&self) -> bool {
        self.is_generating
    }

    /// True once a level has been generated and not yet cleared.
    #[inline]
    #[must_use]
    pub const fn is_level_generated(&self) -> bool {
        self.is_level_generated
    }

    /// Number of chunks currently active.
    #[inline]
    #[must_use]
    pub fn active_chunk_count(&self) -> usize {
        self.active.len()
    }

    /// The streaming watermark: rightmost extent covered by chunks.
    #[inline]
    #[must_use]
    pub const fn generated_distance(&self) -> f32 {
        self.generated_distance
    }

    /// Fraction of the level's configured extent covered by the
    /// watermark, clamped to `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        (self.generated_distance / self.settings.level_extent()).clamp(0.0, 1.0)
    }

    /// Lifetime counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> GenStats {
        self.stats
    }

    /// The active chunk at `coord`, if any.
    #[must_use]
    pub fn chunk_at(&self, coord: ChunkCoord) -> Option<&LevelChunk> {
        self.active.get(&coord)
    }

    /// Sorted coordinates of all active chunks.
    #[must_use]
    pub fn active_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.active.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    /// Number of chunks currently waiting in the pool.
    #[must_use]
    pub fn pooled_chunks(&self) -> usize {
        self.pool.len()
    }

    /// The active configuration.
    #[must_use]
    pub const fn settings(&self) -> &LevelSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::chunk::CollectibleRecord;
    use crate::events::{EventBus, EventReceiver};

    /// Test sink that records everything it receives.
    #[derive(Default)]
    struct RecordingSink {
        items: Rc<RefCell<Vec<CollectibleRecord>>>,
    }

    impl CollectionSink for RecordingSink {
        fn initialize_level(&mut self, items: Vec<CollectibleRecord>) {
            *self.items.borrow_mut() = items;
        }
    }

    fn streaming_settings(seed: u64, preload: f32, unload: f32) -> LevelSettings {
        let mut settings = LevelSettings::default();
        settings.streaming.seed = seed;
        settings.streaming.chunk_size = 50.0;
        settings.streaming.preload_distance = preload;
        settings.streaming.unload_distance = unload;
        settings
    }

    fn generator(settings: LevelSettings) -> (LevelGenerator, EventReceiver) {
        let (sender, receiver) = EventBus::create_pair(4096);
        let generator =
            LevelGenerator::new(settings, sender, None).expect("settings must validate");
        (generator, receiver)
    }

    fn generator_with_sink(
        settings: LevelSettings,
    ) -> (LevelGenerator, EventReceiver, Rc<RefCell<Vec<CollectibleRecord>>>) {
        let (sender, receiver) = EventBus::create_pair(4096);
        let items = Rc::new(RefCell::new(Vec::new()));
        let sink = RecordingSink {
            items: Rc::clone(&items),
        };
        let generator = LevelGenerator::new(settings, sender, Some(Box::new(sink)))
            .expect("settings must validate");
        (generator, receiver, items)
    }

    #[test]
    fn test_invalid_settings_rejected_at_construction() {
        let mut settings = LevelSettings::default();
        settings.streaming.chunk_size = -1.0;

        let (sender, _receiver) = EventBus::create_pair(16);
        assert!(LevelGenerator::new(settings, sender, None).is_err());
    }

    #[test]
    fn test_initial_window_covers_preload_distance() {
        // chunk_size 50, preload 200: ceil(200/50) = 4 chunks, watermark 200.
        let (mut generator, _receiver) = generator(streaming_settings(42, 200.0, 150.0));

        generator.generate_level(1).expect("generation succeeds");

        assert_eq!(generator.active_chunk_count(), 4);
        assert_eq!(generator.generated_distance(), 200.0);
        assert_eq!(
            generator.active_coords(),
            (0..4).map(|x| ChunkCoord::new(x, 0)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_forward_streaming_extends_watermark() {
        // Player at 150 with preload 200 targets 350: exactly 3 more
        // chunks, watermark 350, 7 active.
        let (mut generator, _receiver) = generator(streaming_settings(42, 200.0, 150.0));
        generator.generate_level(1).expect("generation succeeds");

        generator.update_player_position(Vec2::new(150.0, 0.0));

        assert_eq!(generator.active_chunk_count(), 7);
        assert_eq!(generator.generated_distance(), 350.0);
    }

    #[test]
    fn test_unload_boundary_pools_chunks() {
        let (mut generator, _receiver) = generator(streaming_settings(42, 200.0, 100.0));
        generator.generate_level(1).expect("generation succeeds");

        // Player at 150, boundary at 50: chunk 0 is evicted in the same
        // call that extends the window to 350.
        generator.update_player_position(Vec2::new(150.0, 0.0));
        assert_eq!(generator.generated_distance(), 350.0);
        assert_eq!(generator.active_chunk_count(), 6);
        assert_eq!(generator.pooled_chunks(), 1);

        // Player at 350: forward-fill to 550, then every chunk whose
        // origin is left of 250 is destroyed and pooled.
        generator.update_player_position(Vec2::new(350.0, 0.0));

        assert_eq!(generator.generated_distance(), 550.0);
        for coord in generator.active_coords() {
            assert!(
                generator
                    .chunk_at(coord)
                    .is_some_and(|chunk| chunk.position.x >= 250.0),
                "chunk {coord:?} should have been unloaded"
            );
        }
        assert_eq!(generator.active_chunk_count(), 6);
        // The forward fill reused the one pooled chunk before the four
        // evictions refilled the free list.
        assert_eq!(generator.pooled_chunks(), 4);
        assert_eq!(generator.stats().chunks_destroyed, 5);
    }

    #[test]
    fn test_no_duplicate_coordinates() {
        let (mut generator, _receiver) = generator(streaming_settings(7, 200.0, 150.0));
        generator.generate_level(1).expect("generation succeeds");

        let mut x = 0.0;
        while x < 900.0 {
            generator.update_player_position(Vec2::new(x, 0.0));
            let coords = generator.active_coords();
            let mut deduped = coords.clone();
            deduped.dedup();
            assert_eq!(coords, deduped, "duplicate active coordinate at x={x}");
            x += 30.0;
        }
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (mut generator, _receiver) = generator(streaming_settings(42, 200.0, 150.0));
        generator.generate_level(1).expect("generation succeeds");
        assert_eq!(generator.active_chunk_count(), 4);

        generator.clear_current_level();
        generator.clear_current_level();

        assert_eq!(generator.active_chunk_count(), 0);
        assert_eq!(generator.generated_distance(), 0.0);
        assert!(!generator.is_level_generated());
        assert_eq!(generator.pooled_chunks(), 4);
    }

    #[test]
    fn test_regeneration_reuses_pooled_chunks() {
        let (mut generator, _receiver) = generator(streaming_settings(42, 200.0, 150.0));
        generator.generate_level(1).expect("generation succeeds");
        generator.clear_current_level();
        assert_eq!(generator.pooled_chunks(), 4);

        generator.generate_level(2).expect("generation succeeds");

        // The new window drew from the free list, not fresh allocations,
        // and every reused chunk was refilled from clean state.
        assert_eq!(generator.pooled_chunks(), 0);
        assert_eq!(generator.active_chunk_count(), 4);
        for coord in generator.active_coords() {
            let chunk = generator.chunk_at(coord).expect("chunk is active");
            assert!(!chunk.platforms.is_empty());
        }
    }

    #[test]
    fn test_budgeted_forward_fill_drains_across_ticks() {
        let mut settings = streaming_settings(42, 200.0, 300.0);
        settings.streaming.max_chunks_per_tick = 1;
        let (mut generator, _receiver) = generator(settings);
        generator.generate_level(1).expect("generation succeeds");
        assert_eq!(generator.generated_distance(), 200.0);

        // The 150-unit deficit drains one chunk per tick.
        generator.update_player_position(Vec2::new(150.0, 0.0));
        assert_eq!(generator.generated_distance(), 250.0);
        generator.update_player_position(Vec2::new(150.0, 0.0));
        assert_eq!(generator.generated_distance(), 300.0);
        generator.update_player_position(Vec2::new(150.0, 0.0));
        assert_eq!(generator.generated_distance(), 350.0);
        assert_eq!(generator.active_chunk_count(), 7);

        // Fully caught up: further ticks generate nothing.
        generator.update_player_position(Vec2::new(150.0, 0.0));
        assert_eq!(generator.generated_distance(), 350.0);
    }

    #[test]
    fn test_progress_event_emitted_once_per_update() {
        let (mut generator, receiver) = generator(streaming_settings(42, 200.0, 150.0));
        generator.generate_level(1).expect("generation succeeds");
        receiver.drain();

        generator.update_player_position(Vec2::new(150.0, 0.0));

        let events = receiver.drain();
        let progress: Vec<&LevelEvent> = events
            .iter()
            .filter(|event| matches!(event, LevelEvent::LevelProgress { .. }))
            .collect();
        assert_eq!(progress.len(), 1);
        // Progress is the last notification of the update.
        assert!(matches!(events.last(), Some(LevelEvent::LevelProgress { .. })));
    }

    #[test]
    fn test_level_generated_event_fields() {
        let (mut generator, receiver) = generator(streaming_settings(42, 200.0, 150.0));
        generator.generate_level(1).expect("generation succeeds");

        let events = receiver.drain();
        let generated = events
            .iter()
            .find_map(|event| match event {
                LevelEvent::LevelGenerated {
                    level_number,
                    chunk_count,
                    seed,
                    difficulty_scale,
                    ..
                } => Some((*level_number, *chunk_count, *seed, *difficulty_scale)),
                _ => None,
            })
            .expect("LevelGenerated must be emitted");

        assert_eq!(generated, (1, 4, 43, 1.0));

        let chunk_events = events
            .iter()
            .filter(|event| matches!(event, LevelEvent::ChunkGenerated { .. }))
            .count();
        assert_eq!(chunk_events, 4);
    }

    #[test]
    fn test_collectibles_handed_to_sink() {
        let (mut generator, _receiver, items) =
            generator_with_sink(streaming_settings(42, 200.0, 150.0));
        generator.generate_level(1).expect("generation succeeds");

        // level_length 20 * item_density 1.0 = 20 items.
        assert_eq!(items.borrow().len(), 20);
    }

    #[test]
    fn test_missing_sink_skips_collectibles_but_generates() {
        let (mut generator, _receiver) = generator(streaming_settings(42, 200.0, 150.0));
        generator.generate_level(1).expect("generation succeeds");
        assert_eq!(generator.active_chunk_count(), 4);
    }

    #[test]
    fn test_update_before_generation_is_safe() {
        let (mut generator, receiver) = generator(streaming_settings(42, 200.0, 150.0));

        generator.update_player_position(Vec2::new(500.0, 0.0));

        assert_eq!(generator.active_chunk_count(), 0);
        assert_eq!(generator.generated_distance(), 0.0);
        // The progress notification is still emitted.
        assert_eq!(receiver.drain().len(), 1);
    }

    #[test]
    fn test_reset_zeroes_counters() {
        let (mut generator, _receiver) = generator(streaming_settings(42, 200.0, 150.0));
        generator.generate_level(1).expect("generation succeeds");
        generator.update_player_position(Vec2::new(150.0, 0.0));
        assert!(generator.stats().chunks_generated > 0);

        generator.reset();

        assert_eq!(generator.stats(), GenStats::default());
        assert_eq!(generator.current_level(), 0);
        assert_eq!(generator.active_chunk_count(), 0);
        assert!(!generator.is_level_generated());
    }

    #[test]
    fn test_update_settings_validates() {
        let (mut generator, _receiver) = generator(streaming_settings(42, 200.0, 150.0));

        let mut bad = LevelSettings::default();
        bad.streaming.chunk_size = 0.0;
        assert!(generator.update_settings(bad).is_err());
        // Old settings survive a rejected update.
        assert_eq!(generator.settings().streaming.chunk_size, 50.0);
    }
}
