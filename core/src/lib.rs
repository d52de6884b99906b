//! randbeans-core: composable randomizers over one reproducible source.
//!
//! Build a SharedSource once per run, hand it to every randomizer,
//! and the whole run replays from its seed.

pub mod config;
pub mod error;
pub mod optional;
pub mod plan;
pub mod randomizer;
pub mod range;
pub mod rng;
pub mod uuid_randomizer;

pub use error::{RandomizerError, RandomizerResult};
pub use optional::{InclusionRule, OptionalRandomizer};
pub use randomizer::{ConstantRandomizer, Randomizer};
pub use range::{RangeRandomizer, RangeValue};
pub use rng::{RandomSource, SharedSource, SourceBank};
pub use uuid_randomizer::UuidRandomizer;
