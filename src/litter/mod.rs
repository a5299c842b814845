//! Litter orchestration: size roll, per-offspring generation and
//! litter-wide post-processing.

pub mod health;
pub mod post;
pub mod size;

use std::collections::BTreeSet;

use crate::addons::Modifiers;
use crate::creature::Creature;
use crate::error::Result;
use crate::generator::{Generator, GeneratorMode, RandomGenerator};
use crate::genetics::GeneticTable;
use crate::roll::RandomSource;

pub use health::{health_for_roll, roll_health};
pub use post::post_process;
pub use size::{base_litter_size, roll_litter_size};

/// Produces whole litters from one generator.
pub struct LitterOrchestrator<'g> {
    generator: Generator<'g>,
}

impl<'g> LitterOrchestrator<'g> {
    pub fn new(genetics: &'g GeneticTable, mode: GeneratorMode) -> Result<Self> {
        Ok(Self { generator: Generator::new(genetics, mode)? })
    }

    pub fn with_generator(generator: Generator<'g>) -> Self {
        Self { generator }
    }

    pub fn random(genetics: &'g GeneticTable) -> Self {
        Self { generator: Generator::Random(RandomGenerator::new(genetics)) }
    }

    /// Fails fast on invalid parents.
    pub fn breeding(genetics: &'g GeneticTable, father: Creature, mother: Creature) -> Result<Self> {
        Self::new(genetics, GeneratorMode::Breeding { father, mother })
    }

    pub fn generator(&self) -> &Generator<'g> {
        &self.generator
    }

    /// Generate a litter with the given addons, in selection order.
    pub fn make_litter<S: AsRef<str>>(&self, addons: &[S], dice: &mut dyn RandomSource) -> Result<Vec<Creature>> {
        let mods = Modifiers::resolve(&self.generator.genetics().add_ons, addons);
        self.make_litter_with(&mods, dice)
    }

    pub fn make_litter_with(&self, mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<Vec<Creature>> {
        let genetics = self.generator.genetics();
        let size = roll_litter_size(&genetics.litters.weights, mods, dice);
        log::debug!("Rolling a litter of {}", size);

        let mut consumed = BTreeSet::new();
        let mut litter = Vec::with_capacity(size);
        for _ in 0..size {
            let view = mods.without(&consumed);
            let offspring = self.generator.make_offspring(&view, dice)?;
            consumed.extend(offspring.consumed);
            litter.push(offspring.creature);
        }

        let parent_builds = self.generator.parents().map(|(father, mother)| (father.build(), mother.build()));
        post_process(&mut litter, genetics, mods, parent_builds, dice);

        log::info!("Generated a litter of {}", litter.len());
        Ok(litter)
    }
}
