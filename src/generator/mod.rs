//! Offspring generation strategies.
//!
//! Both strategies implement [`OffspringGenerator`], which fixes the order
//! in which attributes are rolled and assembles the resulting creature.
//! [`Generator`] selects a strategy from a [`GeneratorMode`].

pub mod breeding;
pub mod random;
pub mod rules;

use std::collections::BTreeSet;

pub use breeding::BreedingGround;
pub use random::RandomGenerator;

use crate::addons::Modifiers;
use crate::creature::{Creature, CreatureInit, Gender};
use crate::error::Result;
use crate::genetics::GeneticTable;
use crate::roll::RandomSource;

/// One generated creature and the single-use effect slots it used up.
#[derive(Clone, Debug, PartialEq)]
pub struct Offspring {
    pub creature: Creature,
    pub consumed: BTreeSet<usize>,
}

/// The synthesis protocol shared by every strategy.
pub trait OffspringGenerator {
    fn genetics(&self) -> &GeneticTable;

    fn generate_gender(&self, mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<Gender> {
        if let Some(gender) = mods.forced_gender() {
            return Ok(gender);
        }
        let chance = self.genetics().female_base_chance()?;
        Ok(if dice.should_do_action(chance) { Gender::Female } else { Gender::Male })
    }

    fn generate_fur(&self, mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<String>;
    fn generate_coat(&self, mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<String>;
    fn generate_build(&self, mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<String>;
    fn generate_traits(&self, mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<Vec<String>>;
    fn generate_markings(&self, mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<Vec<String>>;
    fn generate_mutations(&self, mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<Vec<String>>;

    fn generate_titan_traits(&self, _mods: &Modifiers, _dice: &mut dyn RandomSource) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// Roll every attribute in order and build one creature.
    ///
    /// A litter-wide build skips the build roll entirely. A pending build
    /// transform replaces the build and is reported as consumed.
    fn make_offspring(&self, mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<Offspring> {
        let gender = self.generate_gender(mods, dice)?;
        let fur = self.generate_fur(mods, dice)?;
        let coat = self.generate_coat(mods, dice)?;

        let mut consumed = BTreeSet::new();
        let mut build = match mods.litter_build() {
            Some(build) => build.to_string(),
            None => self.generate_build(mods, dice)?,
        };
        if let Some((slot, transformed)) = mods.transform_build() {
            log::debug!("Build {} transformed into {}", build, transformed);
            build = transformed.to_string();
            consumed.insert(slot);
        }

        let init = CreatureInit {
            gender: Some(gender),
            fur: Some(fur),
            coat: Some(coat),
            build: Some(build),
            traits: Some(self.generate_traits(mods, dice)?),
            markings: Some(self.generate_markings(mods, dice)?),
            mutations: Some(self.generate_mutations(mods, dice)?),
            titan_traits: Some(self.generate_titan_traits(mods, dice)?),
            ..CreatureInit::default()
        };

        Ok(Offspring { creature: Creature::new(self.genetics(), init), consumed })
    }
}

/// How offspring are produced.
#[derive(Clone, Debug, PartialEq)]
pub enum GeneratorMode {
    /// No parents; everything comes from the weighted tables.
    Random,
    /// Inherit from two parents.
    Breeding { father: Creature, mother: Creature },
}

/// A strategy chosen from a [`GeneratorMode`].
pub enum Generator<'g> {
    Random(RandomGenerator<'g>),
    Breeding(BreedingGround<'g>),
}

impl<'g> Generator<'g> {
    /// Fails if breeding parents are invalid.
    pub fn new(genetics: &'g GeneticTable, mode: GeneratorMode) -> Result<Self> {
        Ok(match mode {
            GeneratorMode::Random => Generator::Random(RandomGenerator::new(genetics)),
            GeneratorMode::Breeding { father, mother } => {
                Generator::Breeding(BreedingGround::new(genetics, father, mother)?)
            }
        })
    }

    pub fn make_offspring(&self, mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<Offspring> {
        match self {
            Generator::Random(generator) => generator.make_offspring(mods, dice),
            Generator::Breeding(generator) => generator.make_offspring(mods, dice),
        }
    }

    pub fn genetics(&self) -> &GeneticTable {
        match self {
            Generator::Random(generator) => generator.genetics(),
            Generator::Breeding(generator) => generator.genetics(),
        }
    }

    /// `(father, mother)` in breeding mode.
    pub fn parents(&self) -> Option<(&Creature, &Creature)> {
        match self {
            Generator::Random(_) => None,
            Generator::Breeding(ground) => Some((ground.father(), ground.mother())),
        }
    }
}
