//! Roll evaluation over externally supplied face values.
//!
//! The domain never generates randomness: a roll source returns one face
//! value per physical die, grouped by die size in roll order, and the
//! evaluator turns those faces into totals and readable breakdowns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::dice::{DiceGroup, DiceSpec, PERCENTILE_ONES_SIDES, PERCENTILE_TENS_SIDES};

/// Raw face values keyed by die size, each list in roll order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRollSet {
    faces: BTreeMap<u32, Vec<u32>>,
}

impl RawRollSet {
    /// Create an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one face value for a die size.
    pub fn push(&mut self, sides: u32, value: u32) {
        self.faces.entry(sides).or_default().push(value);
    }

    /// Builder-style: append several face values for a die size.
    pub fn with_faces(mut self, sides: u32, values: impl IntoIterator<Item = u32>) -> Self {
        self.faces.entry(sides).or_default().extend(values);
        self
    }

    /// Face values rolled for a die size, in roll order.
    pub fn faces(&self, sides: u32) -> &[u32] {
        self.faces.get(&sides).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of faces rolled for a die size.
    pub fn len_for(&self, sides: u32) -> usize {
        self.faces(sides).len()
    }

    /// Die sizes present, ascending.
    pub fn sides(&self) -> impl Iterator<Item = u32> + '_ {
        self.faces.keys().copied()
    }

    /// True when no faces were supplied at all.
    pub fn is_empty(&self) -> bool {
        self.faces.values().all(Vec::is_empty)
    }

    /// Whether the face counts per die size match what `spec` asks for.
    pub fn matches_request(&self, spec: &DiceSpec) -> bool {
        spec.groups
            .iter()
            .all(|g| self.len_for(g.sides) == spec.count_for_sides(g.sides) as usize)
    }

    pub(crate) fn cursor(&self) -> FaceCursor<'_> {
        FaceCursor {
            raw: self,
            offsets: BTreeMap::new(),
        }
    }
}

/// Hands out consecutive face values per die size so that several groups
/// sharing a die size ("1d6+2d6") each get their own slice.
pub(crate) struct FaceCursor<'a> {
    raw: &'a RawRollSet,
    offsets: BTreeMap<u32, usize>,
}

impl<'a> FaceCursor<'a> {
    /// Take up to `n` unread faces for a die size. Returns fewer when the
    /// source supplied fewer.
    pub(crate) fn take(&mut self, sides: u32, n: usize) -> &'a [u32] {
        let raw: &'a RawRollSet = self.raw;
        let all = raw.faces(sides);
        let offset = self.offsets.entry(sides).or_insert(0);
        let start = (*offset).min(all.len());
        let end = start.saturating_add(n).min(all.len());
        *offset = end;
        &all[start..end]
    }
}

/// The faces rolled for one dice group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRoll {
    pub group: DiceGroup,
    pub values: Vec<u32>,
}

/// Result of evaluating a dice spec against face values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollResult {
    /// Final total including the flat modifier
    pub total: i32,
    /// Faces per dice group, in spec order
    pub groups: Vec<GroupRoll>,
    /// Breakdown such as "[3,5] + [2] + 3"
    pub detail: String,
    /// Breakdown prefixed with the roll label, e.g. "Fireball: [3,5,1]"
    pub summary: String,
    /// Whether the d100 + d10 percentile composition was applied
    pub percentile: bool,
}

/// Evaluate a dice spec against the faces a roll source returned.
///
/// Percentile rolls (a single d100 tens die plus a single d10 ones die) are
/// composed as tens + ones with a total of 0 read as 100. Everything else
/// sums each group's faces and adds the flat modifier. A group with no
/// faces is left out of the breakdown; the other groups and the modifier
/// still count.
pub fn evaluate(spec: &DiceSpec, raw: &RawRollSet, label: &str) -> RollResult {
    if let Some(pair) = percentile_pairs(spec, raw, 1).and_then(|pairs| pairs.first().copied()) {
        let base = pair.base();
        let detail = format!("{}{}", pair.detail(), modifier_suffix(spec.modifier));
        return RollResult {
            total: (base as i32).saturating_add(spec.modifier),
            groups: vec![
                GroupRoll {
                    group: DiceGroup {
                        count: 1,
                        sides: PERCENTILE_TENS_SIDES,
                    },
                    values: vec![pair.tens],
                },
                GroupRoll {
                    group: DiceGroup {
                        count: 1,
                        sides: PERCENTILE_ONES_SIDES,
                    },
                    values: vec![pair.ones],
                },
            ],
            summary: labelled(label, &detail),
            detail,
            percentile: true,
        };
    }

    let mut cursor = raw.cursor();
    let groups: Vec<GroupRoll> = spec
        .groups
        .iter()
        .map(|group| GroupRoll {
            group: *group,
            values: cursor.take(group.sides, group.count as usize).to_vec(),
        })
        .collect();

    let dice_total = groups
        .iter()
        .fold(0i32, |acc, g| acc.saturating_add(sum_faces(&g.values)));
    let total = dice_total.saturating_add(spec.modifier);

    let breakdown: Vec<&[u32]> = groups.iter().map(|g| g.values.as_slice()).collect();
    let detail = format_breakdown(&breakdown, spec.modifier);

    RollResult {
        total,
        groups,
        summary: labelled(label, &detail),
        detail,
        percentile: false,
    }
}

/// One tens/ones pair of percentile dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PercentilePair {
    pub(crate) tens: u32,
    pub(crate) ones: u32,
}

impl PercentilePair {
    /// tens + ones, where "00" + "0" reads as 100.
    pub(crate) fn base(&self) -> u32 {
        match self.tens.saturating_add(self.ones) {
            0 => 100,
            sum => sum,
        }
    }

    pub(crate) fn detail(&self) -> String {
        format!("d100 ({} + {}) = {}", self.tens, self.ones, self.base())
    }
}

/// Pair up percentile dice when the roll has the percentile shape.
///
/// The spec must ask for nothing but one d100 (optionally with one d10),
/// and the source must have supplied exactly `per_side` d100 faces and
/// `per_side` d10 faces. Pairs are matched by position.
pub(crate) fn percentile_pairs(
    spec: &DiceSpec,
    raw: &RawRollSet,
    per_side: usize,
) -> Option<Vec<PercentilePair>> {
    let shape_ok = spec.is_percentile();

    let tens = raw.faces(PERCENTILE_TENS_SIDES);
    let ones = raw.faces(PERCENTILE_ONES_SIDES);
    if !shape_ok || tens.len() != per_side || ones.len() != per_side {
        return None;
    }

    Some(
        tens.iter()
            .zip(ones)
            .map(|(&tens, &ones)| PercentilePair { tens, ones })
            .collect(),
    )
}

pub(crate) fn sum_faces(values: &[u32]) -> i32 {
    values.iter().fold(0i32, |acc, &v| {
        acc.saturating_add(i32::try_from(v).unwrap_or(i32::MAX))
    })
}

/// "[3,5] + [2] + 3" - empty groups are skipped.
pub(crate) fn format_breakdown(groups: &[&[u32]], modifier: i32) -> String {
    let parts: Vec<String> = groups
        .iter()
        .filter(|values| !values.is_empty())
        .map(|values| {
            let joined = values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",");
            format!("[{}]", joined)
        })
        .collect();

    if parts.is_empty() {
        return modifier.to_string();
    }
    format!("{}{}", parts.join(" + "), modifier_suffix(modifier))
}

pub(crate) fn modifier_suffix(modifier: i32) -> String {
    match modifier {
        0 => String::new(),
        m if m > 0 => format!(" + {}", m),
        m => format!(" - {}", m.unsigned_abs()),
    }
}

pub(crate) fn labelled(label: &str, detail: &str) -> String {
    if label.is_empty() {
        detail.to_string()
    } else {
        format!("{}: {}", label, detail)
    }
}
