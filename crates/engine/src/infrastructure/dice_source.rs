//! Roll source implementations.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use grimoire_domain::value_objects::{PERCENTILE_ONES_SIDES, PERCENTILE_TENS_SIDES};
use grimoire_domain::{DiceRequest, RawRollSet};

use crate::infrastructure::ports::{RollSourceError, RollSourcePort};

/// System random - rolls with a PRNG, optionally seeded for reproducible
/// sessions.
///
/// Percentile requests are rolled the way a physical set is: a tens die
/// (00-90) and a ones die (0-9) per pair. Everything else, a typed `2d100`
/// included, gets faces in `1..=sides`.
pub struct RandomRollSource {
    rng: Mutex<StdRng>,
}

impl RandomRollSource {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomRollSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RollSourcePort for RandomRollSource {
    fn roll(&self, request: &DiceRequest) -> Result<RawRollSet, RollSourceError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| RollSourceError::unavailable("random source lock poisoned"))?;
        let mut raw = RawRollSet::new();

        if request.is_percentile() {
            for _ in 0..request.percentile_pairs {
                raw.push(PERCENTILE_TENS_SIDES, rng.gen_range(0..=9u32) * 10);
                raw.push(PERCENTILE_ONES_SIDES, rng.gen_range(0..=9u32));
            }
        } else {
            for group in request.dice.groups.iter().filter(|g| g.sides > 0) {
                for _ in 0..group.count {
                    raw.push(group.sides, rng.gen_range(1..=group.sides));
                }
            }
        }

        tracing::debug!(request = %request, "Rolled dice");
        Ok(raw)
    }
}

/// Replays pre-recorded faces in order.
///
/// Each request consumes as many faces per die size as it asks for; a
/// percentile request with no d10 group also consumes one d10 per pair.
pub struct ScriptedRollSource {
    faces: Mutex<BTreeMap<u32, VecDeque<u32>>>,
}

impl ScriptedRollSource {
    pub fn new() -> Self {
        Self {
            faces: Mutex::new(BTreeMap::new()),
        }
    }

    /// Builder-style: queue faces for a die size.
    pub fn with_faces(self, sides: u32, values: impl IntoIterator<Item = u32>) -> Self {
        if let Ok(mut faces) = self.faces.lock() {
            faces.entry(sides).or_default().extend(values);
        }
        self
    }

    /// Faces still queued for a die size.
    pub fn remaining(&self, sides: u32) -> usize {
        self.faces
            .lock()
            .map(|faces| faces.get(&sides).map_or(0, VecDeque::len))
            .unwrap_or(0)
    }
}

impl Default for ScriptedRollSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RollSourcePort for ScriptedRollSource {
    fn roll(&self, request: &DiceRequest) -> Result<RawRollSet, RollSourceError> {
        let mut faces = self
            .faces
            .lock()
            .map_err(|_| RollSourceError::unavailable("scripted source lock poisoned"))?;

        let dice = &request.dice;
        let mut wanted: BTreeMap<u32, usize> = dice
            .groups
            .iter()
            .map(|g| g.sides)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|sides| (sides, dice.count_for_sides(sides) as usize))
            .collect();
        if request.is_percentile() {
            wanted
                .entry(PERCENTILE_ONES_SIDES)
                .or_insert(request.percentile_pairs as usize);
        }

        // Check everything first so a failed roll consumes nothing
        for (&sides, &count) in &wanted {
            let available = faces.get(&sides).map_or(0, VecDeque::len);
            if available < count {
                return Err(RollSourceError::Exhausted {
                    sides,
                    wanted: count,
                    available,
                });
            }
        }

        let mut raw = RawRollSet::new();
        for (sides, count) in wanted {
            if let Some(queue) = faces.get_mut(&sides) {
                raw = raw.with_faces(sides, queue.drain(..count));
            }
        }
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grimoire_domain::DiceSpec;
    use proptest::prelude::*;

    fn spec(notation: &str) -> DiceSpec {
        DiceSpec::parse(notation).unwrap()
    }

    fn request(notation: &str) -> DiceRequest {
        DiceRequest::single(&spec(notation))
    }

    #[test]
    fn random_faces_stay_in_range() {
        let source = RandomRollSource::seeded(7);
        let raw = source.roll(&request("4d6+1d20+2d8")).unwrap();

        assert_eq!(raw.len_for(6), 4);
        assert_eq!(raw.len_for(20), 1);
        assert_eq!(raw.len_for(8), 2);
        assert!(raw.faces(6).iter().all(|v| (1..=6).contains(v)));
        assert!(raw.faces(20).iter().all(|v| (1..=20).contains(v)));
        assert!(raw.faces(8).iter().all(|v| (1..=8).contains(v)));
    }

    #[test]
    fn same_seed_same_faces() {
        let a = RandomRollSource::seeded(42).roll(&request("10d20")).unwrap();
        let b = RandomRollSource::seeded(42).roll(&request("10d20")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn percentile_rolls_tens_and_ones() {
        let source = RandomRollSource::seeded(3);
        for _ in 0..50 {
            let raw = source.roll(&DiceRequest::doubled(&spec("1d100"))).unwrap();
            assert_eq!(raw.len_for(100), 2);
            assert_eq!(raw.len_for(10), 2);
            assert!(raw.faces(100).iter().all(|v| v % 10 == 0 && *v <= 90));
            assert!(raw.faces(10).iter().all(|v| *v <= 9));
        }
    }

    #[test]
    fn typed_d100s_roll_plain_faces() {
        let source = RandomRollSource::seeded(3);
        let mut saw_non_tens = false;
        for _ in 0..50 {
            let raw = source.roll(&request("2d100")).unwrap();
            assert_eq!(raw.len_for(100), 2);
            assert_eq!(raw.len_for(10), 0);
            assert!(raw.faces(100).iter().all(|v| (1..=100).contains(v)));
            saw_non_tens |= raw.faces(100).iter().any(|v| v % 10 != 0);
        }
        assert!(saw_non_tens);
    }

    #[test]
    fn mixed_request_rolls_plain_d100() {
        let raw = RandomRollSource::seeded(9).roll(&request("1d100+1d6")).unwrap();
        assert_eq!(raw.len_for(10), 0);
        assert!(raw.faces(100).iter().all(|v| (1..=100).contains(v)));
    }

    #[test]
    fn scripted_replays_in_order() {
        let source = ScriptedRollSource::new()
            .with_faces(20, [3, 17, 11])
            .with_faces(6, [2, 5]);

        let raw = source.roll(&request("2d20+1d6")).unwrap();
        assert_eq!(raw.faces(20), &[3, 17]);
        assert_eq!(raw.faces(6), &[2]);
        assert_eq!(source.remaining(20), 1);
        assert_eq!(source.remaining(6), 1);
    }

    #[test]
    fn scripted_percentile_takes_ones_die() {
        let source = ScriptedRollSource::new()
            .with_faces(100, [0])
            .with_faces(10, [0]);
        let raw = source.roll(&request("1d100")).unwrap();
        assert_eq!(raw.faces(100), &[0]);
        assert_eq!(raw.faces(10), &[0]);
    }

    #[test]
    fn exhausted_script_consumes_nothing() {
        let source = ScriptedRollSource::new()
            .with_faces(20, [4])
            .with_faces(4, [1, 2]);

        let err = source.roll(&request("1d4+2d20")).unwrap_err();
        assert!(matches!(
            err,
            RollSourceError::Exhausted {
                sides: 20,
                wanted: 2,
                available: 1
            }
        ));
        assert_eq!(source.remaining(20), 1);
        assert_eq!(source.remaining(4), 2);
    }

    proptest! {
        #[test]
        fn random_rolls_match_any_request(
            seed in any::<u64>(),
            count in 1u32..=12,
            sides in prop::sample::select(vec![4u32, 6, 8, 12, 20]),
        ) {
            let request = request(&format!("{}d{}", count, sides));
            let raw = RandomRollSource::seeded(seed).roll(&request).unwrap();

            prop_assert!(raw.matches_request(&request.dice));
            prop_assert!(raw.faces(sides).iter().all(|v| (1..=sides).contains(v)));
        }
    }
}
