//! Litter size rolls.

use crate::addons::Modifiers;
use crate::roll::RandomSource;

/// Size bucket for `draw` against ascending cumulative weights.
///
/// Bucket `i` (after sorting) is a litter of `i + 1`. A draw beyond every
/// weight falls into the largest bucket.
pub fn base_litter_size(weights: &[f64], draw: f64) -> usize {
    let mut sorted: Vec<(usize, f64)> = weights.iter().copied().enumerate().collect();
    sorted.sort_by(|a, b| a.1.total_cmp(&b.1));
    sorted
        .iter()
        .find(|(_, weight)| draw <= *weight)
        .map_or(weights.len(), |(index, _)| index + 1)
}

/// Base roll, then the minimum, fixed and chance-gated adjustments in that order.
pub fn roll_litter_size(weights: &[f64], mods: &Modifiers, dice: &mut dyn RandomSource) -> usize {
    let draw = dice.random_chance();
    let mut size = base_litter_size(weights, draw);
    log::trace!("Litter draw {:.3} gives {}", draw, size);

    if let Some(minimum) = mods.litter_minimum() {
        size = size.max(minimum);
    }
    size += mods.litter_delta();

    for (chance, min, max) in mods.litter_chances() {
        if dice.should_do_action(chance) {
            let spread = max.saturating_sub(min) as u32;
            let extra = min + dice.random_int(spread) as usize;
            log::debug!("Litter bonus of {}", extra);
            size += extra;
        }
    }
    size
}
