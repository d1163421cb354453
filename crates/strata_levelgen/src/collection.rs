//! # Collection Collaborator Interface
//!
//! The generator produces the level's collectible set exactly once and
//! hands it off; tracking collection state, scores, and completion is the
//! sink's concern. The sink is injected at construction - there is no
//! global registry to look it up in.

use crate::chunk::CollectibleRecord;

/// Receiver of the level-wide collectible set.
///
/// Implemented by the host's collection/scoring system. Called once per
/// generated level, after the initial chunk window exists.
pub trait CollectionSink {
    /// Replaces the sink's item set with the new level's collectibles.
    fn initialize_level(&mut self, items: Vec<CollectibleRecord>);
}
