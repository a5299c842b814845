//! Addon catalog: declarative modifiers that bias, override or force
//! outcomes across a litter.

pub mod catalog;
pub mod modifiers;

pub use catalog::{AddonCatalog, AddonDef, AttributeKind, Effect, RollKind};
pub use modifiers::{ActiveEffect, Modifiers};
