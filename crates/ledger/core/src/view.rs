//! Sheet view preparation.
//!
//! Turns ledgers and tracks into the rows and pips a sheet template displays.
//! Only structure is produced here; markup belongs to the host.

use core::cmp::Ordering;

use crate::counter::CounterBounds;
use crate::ledger::{SceneCue, UsageLedger};

/// One usage checkbox on a limited-use item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UsagePip {
    /// The use has been granted.
    pub enabled: bool,
    /// The use has been spent.
    pub checked: bool,
}

/// One pip per unit of capacity, in order.
pub fn usage_pips(ledger: &UsageLedger) -> Vec<UsagePip> {
    (1..=ledger.max_usage())
        .map(|index| UsagePip {
            enabled: index <= ledger.available_usage(),
            checked: index <= ledger.used(),
        })
        .collect()
}

/// Display order for scene cues: cues with granted uses first, then by name.
pub fn scene_cue_order(a: &SceneCue, b: &SceneCue) -> Ordering {
    let has_uses = |cue: &SceneCue| cue.ledger().available_usage() > 0;
    has_uses(b)
        .cmp(&has_uses(a))
        .then_with(|| compare_names(&a.name, &b.name))
}

/// Sorts cues in [`scene_cue_order`].
pub fn sort_scene_cues(cues: &mut [SceneCue]) {
    cues.sort_by(scene_cue_order);
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Number of pips on the standard social standing track.
pub const STANDING_PIPS: usize = 21;

/// Social standing pips for positions `-10..=10`, left to right.
///
/// The centre pip always shows `0`. Positions between the centre and the
/// current value show their distance from the centre; the rest are blank.
pub fn standing_pips(value: i32) -> [Option<u8>; STANDING_PIPS] {
    let min = CounterBounds::SOCIAL_STANDING.min;
    core::array::from_fn(|index| standing_pip(min + index as i32, value))
}

/// [`standing_pips`] over a configured standing range.
pub fn standing_pips_within(value: i32, bounds: CounterBounds) -> Vec<Option<u8>> {
    (bounds.min..=bounds.max)
        .map(|position| standing_pip(position, value))
        .collect()
}

fn standing_pip(position: i32, value: i32) -> Option<u8> {
    let lit = position == 0
        || (position < 0 && value < 0 && position >= value)
        || (position > 0 && value > 0 && position <= value);
    lit.then(|| position.unsigned_abs().min(u8::MAX as u32) as u8)
}

/// Renown pips for `1..=15`, filled up to the current renown.
pub fn renown_pips(renown: i32) -> Vec<Option<u8>> {
    renown_pips_within(renown, CounterBounds::RENOWN)
}

/// Renown pips for `1..=bounds.max`, filled up to the current renown.
pub fn renown_pips_within(renown: i32, bounds: CounterBounds) -> Vec<Option<u8>> {
    (1..=bounds.max)
        .map(|index| (renown >= index).then(|| index.min(u8::MAX as i32) as u8))
        .collect()
}
