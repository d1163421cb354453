//! # Level Walkthrough
//!
//! Headless host simulation: generates a level, runs a simulated player
//! across it tick by tick, and reports what the streaming engine and the
//! observers saw.
//!
//! Usage: `walkthrough [settings.toml] [level_number]`

use std::cell::RefCell;
use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;

use strata_levelgen::{
    CollectibleRecord, CollectionSink, EventBus, LevelEvent, LevelGenerator, LevelSettings, Vec2,
};

/// Units the simulated player advances per tick.
const PLAYER_SPEED: f32 = 3.0;

/// Totals reported by the collection stand-in.
#[derive(Default)]
struct ScoreTotals {
    items: usize,
    required: usize,
    score: u64,
}

/// Collection system stand-in: tallies what the generator hands over.
#[derive(Default, Clone)]
struct ScoreBoard {
    totals: Rc<RefCell<ScoreTotals>>,
}

impl CollectionSink for ScoreBoard {
    fn initialize_level(&mut self, items: Vec<CollectibleRecord>) {
        let mut totals = self.totals.borrow_mut();
        totals.items = items.len();
        totals.required = items.iter().filter(|item| item.required).count();
        totals.score = items.iter().map(|item| u64::from(item.score)).sum();
    }
}

/// Event tallies accumulated over the walk.
#[derive(Default)]
struct EventTally {
    levels_generated: usize,
    chunks_generated: usize,
    chunks_destroyed: usize,
    progress_updates: usize,
    final_progress: f32,
}

impl EventTally {
    fn record(&mut self, event: &LevelEvent) {
        match event {
            LevelEvent::LevelGenerated { .. } => self.levels_generated += 1,
            LevelEvent::ChunkGenerated { .. } => self.chunks_generated += 1,
            LevelEvent::ChunkDestroyed { .. } => self.chunks_destroyed += 1,
            LevelEvent::LevelProgress { progress, .. } => {
                self.progress_updates += 1;
                self.final_progress = *progress;
            }
        }
    }
}

fn load_settings(path: Option<&str>) -> Result<LevelSettings, String> {
    match path {
        Some(path) => LevelSettings::load(Path::new(path))
            .map_err(|err| format!("cannot load `{path}`: {err}")),
        None => Ok(LevelSettings::default()),
    }
}

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let settings_path = args.next();
    let level_number: u32 = match args.next().as_deref().map(str::parse).transpose() {
        Ok(level) => level.unwrap_or(1),
        Err(_) => {
            eprintln!("error: level number must be a non-negative integer");
            return ExitCode::FAILURE;
        }
    };

    let settings = match load_settings(settings_path.as_deref()) {
        Ok(settings) => settings,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::FAILURE;
        }
    };

    let (sender, receiver) = EventBus::create_pair(65_536);
    let scoreboard = ScoreBoard::default();
    let totals = Rc::clone(&scoreboard.totals);
    let mut generator = match LevelGenerator::new(settings, sender, Some(Box::new(scoreboard))) {
        Ok(generator) => generator,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = generator.generate_level(level_number) {
        eprintln!("error: failed to generate level {level_number}: {err}");
        return ExitCode::FAILURE;
    }

    let level_extent = generator.settings().level_extent();
    let mut tally = EventTally::default();
    for event in receiver.drain() {
        tally.record(&event);
    }

    // Frame loop: one position update per tick until the player has
    // crossed the level.
    let mut ticks = 0u32;
    let mut x = 0.0f32;
    while x < level_extent {
        x += PLAYER_SPEED;
        generator.update_player_position(Vec2::new(x, 0.0));
        for event in receiver.drain() {
            tally.record(&event);
        }
        ticks += 1;
    }

    let stats = generator.stats();
    let totals = totals.borrow();
    println!("=== STRATA Walkthrough ===");
    println!("Level:              {level_number}");
    println!("Level extent:       {level_extent:.0} units");
    println!("Ticks simulated:    {ticks}");
    println!("Generation time:    {:.3}s", stats.last_generation_secs);
    println!("Chunks generated:   {}", stats.chunks_generated);
    println!("Chunks destroyed:   {}", stats.chunks_destroyed);
    println!("Chunks active:      {}", generator.active_chunk_count());
    println!("Chunks pooled:      {}", generator.pooled_chunks());
    println!("Progress:           {:.1}%", f64::from(tally.final_progress) * 100.0);
    println!("--- events observed ---");
    println!("LevelGenerated:     {}", tally.levels_generated);
    println!("ChunkGenerated:     {}", tally.chunks_generated);
    println!("ChunkDestroyed:     {}", tally.chunks_destroyed);
    println!("LevelProgress:      {}", tally.progress_updates);
    println!("--- collection sink ---");
    println!("Collectibles:       {}", totals.items);
    println!("Required items:     {}", totals.required);
    println!("Total score:        {}", totals.score);

    ExitCode::SUCCESS
}
