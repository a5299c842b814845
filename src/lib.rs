//! Nemeion offspring generation library
//!
//! Breeds litters from two parents, or synthesizes them at random, by
//! rolling inheritance chances over a genetic table and applying addon
//! modifiers across the litter.

pub mod addons;
pub mod closed_set;
pub mod creature;
pub mod error;
pub mod generator;
pub mod genetics;
pub mod litter;
pub mod roll;

pub use addons::{AddonCatalog, Effect, Modifiers};
pub use closed_set::ClosedSet;
pub use creature::{Creature, CreatureInit, Gender};
pub use error::{BreedError, Result};
pub use generator::{BreedingGround, Generator, GeneratorMode, Offspring, OffspringGenerator, RandomGenerator};
pub use genetics::GeneticTable;
pub use litter::LitterOrchestrator;
pub use roll::{RandomSource, RngDice, ScriptedDice};
