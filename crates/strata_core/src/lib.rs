//! # STRATA Core
//!
//! Engine-agnostic foundations shared by the STRATA crates.
//!
//! ## Design Principles
//!
//! 1. **No upward dependencies**: this crate knows nothing about levels,
//!    chunks, or streaming
//! 2. **Reuse over reallocation**: churned records go through [`RecyclePool`]
//! 3. **Plain data**: math types are simple `Copy` structs

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod math;
pub mod pool;

pub use math::Vec2;
pub use pool::{Recycle, RecyclePool};
