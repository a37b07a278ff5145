//! Value objects - Immutable objects defined by their attributes

mod ability;
mod advantage;
mod dice;
mod roll;

pub use ability::{ability_modifier, proficiency_bonus, Abilities, AbilityKey};
pub use advantage::{
    resolve_with_mode, AdvantageContext, AdvantageMode, AdvantageOutcome, Candidate, RollMode,
};
pub use dice::{
    DiceGroup, DiceRequest, DiceSpec, MAX_DICE_COUNT, MAX_DICE_SIDES, PERCENTILE_ONES_SIDES,
    PERCENTILE_TENS_SIDES,
};
pub use roll::{evaluate, GroupRoll, RawRollSet, RollResult};
