//! Shared rolling rules: aspect inheritance, exclusive-group filtering,
//! capping and threshold tables.

use std::collections::BTreeMap;

use crate::addons::{Modifiers, RollKind};
use crate::error::Result;
use crate::genetics::{AspectTable, GeneticTable};
use crate::roll::{random_sample, random_subset, RandomSource};

/// Drop repeated entries, keeping first occurrences in order.
pub fn unique(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Father's entries first, then the mother's new ones.
pub fn unique_union(father: &[String], mother: &[String]) -> Vec<String> {
    unique(father.iter().chain(mother.iter()).cloned())
}

/// Roll every aspect either parent carries, independently.
///
/// Aspects held by both parents roll at their tier's double rate, the rest
/// at the single rate. Boosts for `roll` are folded in and the result is
/// clamped to 1.0.
pub fn inherit_aspects(
    father: &[String],
    mother: &[String],
    table: &AspectTable,
    category: &'static str,
    roll: RollKind,
    mods: &Modifiers,
    dice: &mut dyn RandomSource,
) -> Result<Vec<String>> {
    let mut inherited = Vec::new();
    for id in unique_union(father, mother) {
        let in_both = father.contains(&id) && mother.contains(&id);
        let base = table.inherit_chance(category, &id, in_both)?;
        let quality = table.quality_of(category, &id)?;
        let chance = mods.boosted_for_quality(roll, Some(quality), base);
        if dice.should_do_action(chance) {
            log::trace!("Inherited {} {} at {:.3}", category, id, chance);
            inherited.push(id);
        }
    }
    Ok(unique(inherited))
}

/// Keep one uniformly chosen member of every exclusive group that has
/// more than one member present.
pub fn filter_exclusive(
    items: Vec<String>,
    groups: &BTreeMap<String, Vec<String>>,
    dice: &mut dyn RandomSource,
) -> Vec<String> {
    let mut items = items;
    for (group, members) in groups {
        let present: Vec<String> = items.iter().filter(|i| members.contains(i)).cloned().collect();
        if present.len() < 2 {
            continue;
        }
        if let Some(keep) = random_sample(dice, &present).cloned() {
            log::trace!("Exclusive group {} keeps {}", group, keep);
            items.retain(|i| *i == keep || !members.contains(i));
        }
    }
    items
}

/// Uniform random subset of `cap` items when over the cap.
pub fn cap_random(items: Vec<String>, cap: usize, dice: &mut dyn RandomSource) -> Vec<String> {
    if items.len() <= cap {
        return items;
    }
    random_subset(dice, &items, cap)
}

/// First entry whose cumulative threshold is at least `draw`, scanning in
/// ascending threshold order.
pub fn weighted_threshold(thresholds: &BTreeMap<String, f64>, draw: f64) -> Option<&str> {
    let mut sorted: Vec<(&String, f64)> = thresholds.iter().map(|(k, v)| (k, *v)).collect();
    sorted.sort_by(|a, b| a.1.total_cmp(&b.1));
    sorted
        .into_iter()
        .find(|(_, threshold)| *threshold >= draw)
        .map(|(key, _)| key.as_str())
}

/// Rare-fur roll: a uniform rare option on success, else the default fur.
pub fn roll_random_fur(genetics: &GeneticTable, mods: &Modifiers, dice: &mut dyn RandomSource) -> String {
    let chance = mods.boosted(RollKind::RareFur, genetics.furs.rare_chance);
    if dice.should_do_action(chance) {
        if let Some(fur) = random_sample(dice, &genetics.furs.rare_options) {
            return fur.clone();
        }
    }
    genetics.furs.default.clone()
}
