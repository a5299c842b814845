//! Litter-wide adjustments applied after every offspring is generated.

use std::collections::BTreeSet;

use crate::addons::{AttributeKind, Modifiers};
use crate::creature::Creature;
use crate::generator::rules::unique;
use crate::genetics::GeneticTable;
use crate::roll::{random_sample, RandomSource};

use super::health::roll_health;

/// Run every litter-wide step in order.
///
/// `parent_builds` is `(father, mother)` in breeding mode.
pub fn post_process(
    litter: &mut [Creature],
    genetics: &GeneticTable,
    mods: &Modifiers,
    parent_builds: Option<(&str, &str)>,
    dice: &mut dyn RandomSource,
) {
    if litter.is_empty() {
        return;
    }
    let guaranteed = guarantee_builds(litter, mods);
    if mods.wants_build_diversity() {
        match parent_builds {
            Some(builds) => diversify_builds(litter, genetics, builds, &guaranteed, dice),
            None => log::warn!("Build diversity needs two parents; skipping"),
        }
    }
    force_attributes(litter, genetics, mods, dice);
    if mods.has_mutation_floor() {
        apply_mutation_floor(litter, genetics, dice);
    }
    if let Some(chance) = mods.mutation_chance() {
        roll_extra_mutations(litter, genetics, chance, dice);
    }
    if mods.has_inbreeding() {
        for creature in litter.iter_mut() {
            creature.set_health(Some(roll_health(dice)));
        }
    }
    limit_titan_traits(litter, genetics, dice);
}

/// Force guaranteed builds onto the first offspring not already claimed.
/// Returns the claimed positions.
pub fn guarantee_builds(litter: &mut [Creature], mods: &Modifiers) -> BTreeSet<usize> {
    let mut guaranteed = BTreeSet::new();
    for (build, count) in mods.guaranteed_builds() {
        let targets: Vec<usize> = (0..litter.len()).filter(|i| !guaranteed.contains(i)).take(count).collect();
        for index in targets {
            litter[index].set_build(build);
            guaranteed.insert(index);
        }
    }
    guaranteed
}

/// Give one unguaranteed offspring a build outside the parents' unless
/// someone already has one.
pub fn diversify_builds(
    litter: &mut [Creature],
    genetics: &GeneticTable,
    (father, mother): (&str, &str),
    guaranteed: &BTreeSet<usize>,
    dice: &mut dyn RandomSource,
) {
    if litter.iter().any(|c| c.build() != father && c.build() != mother) {
        return;
    }
    let candidates: Vec<usize> = (0..litter.len()).filter(|i| !guaranteed.contains(i)).collect();
    let Some(&index) = random_sample(dice, &candidates) else {
        log::warn!("Every offspring has a guaranteed build; skipping build diversity");
        return;
    };
    match genetics.build_options().random_value(dice, &[father, mother]) {
        Some(build) => {
            log::debug!("Offspring {} diversified to {}", index, build);
            litter[index].set_build(build);
        }
        None => log::warn!("No build outside {} and {}", father, mother),
    }
}

fn carries(creature: &Creature, attribute: AttributeKind, value: &str) -> bool {
    let has = |items: &[String]| items.iter().any(|i| i == value);
    match attribute {
        AttributeKind::Coat => creature.coat() == value,
        AttributeKind::Trait => has(creature.traits()),
        AttributeKind::Marking => has(creature.markings()),
        AttributeKind::Mutation => has(creature.mutations()),
    }
}

/// Offspring a forced attribute may land on. Mutations prefer offspring
/// below the cap.
fn force_targets(litter: &[Creature], attribute: AttributeKind) -> Vec<usize> {
    let with_room: Vec<usize> = (0..litter.len()).filter(|&i| litter[i].has_mutation_capacity()).collect();
    match attribute {
        AttributeKind::Mutation if !with_room.is_empty() => with_room,
        _ => (0..litter.len()).collect(),
    }
}

/// Hand each forced attribute to one random offspring if nobody has it.
///
/// A forced marking evicts the rest of its exclusive group.
pub fn force_attributes(
    litter: &mut [Creature],
    genetics: &GeneticTable,
    mods: &Modifiers,
    dice: &mut dyn RandomSource,
) {
    if litter.is_empty() {
        return;
    }
    for (attribute, value) in mods.forced_attributes() {
        if litter.iter().any(|c| carries(c, attribute, value)) {
            continue;
        }
        let targets = force_targets(litter, attribute);
        let Some(&index) = random_sample(dice, &targets) else {
            continue;
        };
        let creature = &mut litter[index];
        match attribute {
            AttributeKind::Coat => creature.set_coat(value),
            AttributeKind::Trait => creature.add_trait(genetics, value),
            AttributeKind::Marking => creature.force_marking(genetics, value),
            AttributeKind::Mutation => {
                creature.add_mutation(genetics, value);
            }
        }
        log::debug!("Forced {:?} {} onto offspring {}", attribute, value, index);
    }
}

/// Give the first offspring with room one mutation if the litter has none.
pub fn apply_mutation_floor(litter: &mut [Creature], genetics: &GeneticTable, dice: &mut dyn RandomSource) {
    if litter.iter().any(Creature::has_mutations) {
        return;
    }
    let catalog = genetics.mutation_options().all_values();
    let Some(mutation) = random_sample(dice, &catalog) else {
        return;
    };
    if let Some(creature) = litter.iter_mut().find(|c| c.has_mutation_capacity()) {
        creature.add_mutation(genetics, *mutation);
    }
}

/// One roll per offspring for an extra mutation it does not carry yet.
pub fn roll_extra_mutations(
    litter: &mut [Creature],
    genetics: &GeneticTable,
    chance: f64,
    dice: &mut dyn RandomSource,
) {
    for creature in litter.iter_mut() {
        if !dice.should_do_action(chance) {
            continue;
        }
        let owned: Vec<&str> = creature.mutations().iter().map(String::as_str).collect();
        let picked = genetics.mutation_options().random_value(dice, &owned).map(str::to_string);
        if let Some(mutation) = picked {
            creature.add_mutation(genetics, mutation);
        }
    }
}

/// Only one offspring in a litter keeps a titan trait, and only one.
pub fn limit_titan_traits(litter: &mut [Creature], genetics: &GeneticTable, dice: &mut dyn RandomSource) {
    let rolled = unique(litter.iter().flat_map(|c| c.titan_traits().iter().cloned()));
    let Some(chosen) = random_sample(dice, &rolled).cloned() else {
        return;
    };
    let holders: Vec<usize> = (0..litter.len())
        .filter(|&i| litter[i].titan_traits().contains(&chosen))
        .collect();
    let holder = random_sample(dice, &holders).copied().unwrap_or(0);

    for creature in litter.iter_mut() {
        creature.clear_titan_traits();
    }
    log::debug!("Offspring {} keeps titan trait {}", holder, chosen);
    litter[holder].add_titan_trait(genetics, chosen);
}
