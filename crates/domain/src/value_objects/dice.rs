//! Dice notation parsing
//!
//! Supports expressions like "2d6+3", "d20", "2d6+1d4+3", "1d100+1d10".
//! Die sizes are not checked against the standard set, so homebrew dice
//! (d7, d13) parse like any other, up to [`MAX_DICE_SIDES`].

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

// `{count}d{sides}` with the count optional
static DICE_GROUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d*)d(\d+)").expect("valid regex"));

// Signed integer terms left over once dice groups are removed
static MODIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([+-])\s*(\d+)").expect("valid regex"));

/// Most dice one group may hold.
pub const MAX_DICE_COUNT: u32 = 100;
/// Largest die accepted.
pub const MAX_DICE_SIDES: u32 = 1000;

/// Die size of the percentile "tens" die (faces 00, 10, ... 90).
pub const PERCENTILE_TENS_SIDES: u32 = 100;
/// Die size of the percentile "ones" die (faces 0-9).
pub const PERCENTILE_ONES_SIDES: u32 = 10;

/// One `NdM` term of a dice expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceGroup {
    /// Number of dice (N in NdM), 1 to [`MAX_DICE_COUNT`] when parsed
    pub count: u32,
    /// Faces per die (M in NdM), 1 to [`MAX_DICE_SIDES`] when parsed
    pub sides: u32,
}

impl DiceGroup {
    /// Create a dice group. Returns `None` for a zero count or zero sides,
    /// and for groups over [`MAX_DICE_COUNT`] dice or [`MAX_DICE_SIDES`] sides.
    pub fn new(count: u32, sides: u32) -> Option<Self> {
        if count == 0 || sides == 0 {
            return None;
        }
        if count > MAX_DICE_COUNT || sides > MAX_DICE_SIDES {
            tracing::debug!(count, sides, "Dice group over the size limit");
            return None;
        }
        Some(Self { count, sides })
    }

    /// The same group with twice as many dice (for advantage requests).
    pub fn doubled(&self) -> Self {
        Self {
            count: self.count.saturating_mul(2),
            sides: self.sides,
        }
    }
}

impl fmt::Display for DiceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// A parsed dice expression: ordered dice groups plus a flat modifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceSpec {
    /// Dice groups in order of appearance
    pub groups: Vec<DiceGroup>,
    /// Sum of all `+N` / `-N` terms not consumed by dice groups
    pub modifier: i32,
}

impl DiceSpec {
    /// Create a dice spec from pre-built groups.
    pub fn new(groups: Vec<DiceGroup>, modifier: i32) -> Self {
        Self { groups, modifier }
    }

    /// Parse a dice notation string.
    ///
    /// Every `{count}d{sides}` substring becomes a group (count defaults to
    /// 1). After the groups are removed, every signed integer term left in the
    /// string is summed into the modifier; unsigned numbers and malformed
    /// terms contribute nothing. Groups with a zero count or zero sides are
    /// dropped.
    ///
    /// Returns `None` when no dice group is found, or when any group is over
    /// [`MAX_DICE_COUNT`] dice or [`MAX_DICE_SIDES`] sides: the input is not a
    /// usable dice expression and the caller decides what to do with it.
    pub fn parse(notation: &str) -> Option<Self> {
        let mut groups = Vec::new();
        for caps in DICE_GROUP_RE.captures_iter(notation) {
            // Numbers too long for u64 count as oversized
            let count: u64 = match caps.get(1).map(|m| m.as_str()) {
                None | Some("") => 1,
                Some(raw) => raw.parse().unwrap_or(u64::MAX),
            };
            let sides: u64 = caps
                .get(2)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(u64::MAX);

            if count == 0 || sides == 0 {
                continue;
            }
            let group = u32::try_from(count)
                .ok()
                .zip(u32::try_from(sides).ok())
                .and_then(|(count, sides)| DiceGroup::new(count, sides))?;
            groups.push(group);
        }

        if groups.is_empty() {
            return None;
        }

        // Replace with a space so digits either side of a removed group never merge
        let remainder = DICE_GROUP_RE.replace_all(notation, " ");
        let modifier = MODIFIER_RE
            .captures_iter(&remainder)
            .filter_map(|caps| {
                let value: i32 = caps.get(2)?.as_str().parse().ok()?;
                match caps.get(1)?.as_str() {
                    "-" => Some(-value),
                    _ => Some(value),
                }
            })
            .fold(0i32, |acc, term| acc.saturating_add(term));

        Some(Self { groups, modifier })
    }

    /// The same expression with every group's count doubled.
    ///
    /// One batch of faces for the doubled spec yields both advantage
    /// candidates.
    pub fn doubled(&self) -> Self {
        Self {
            groups: self.groups.iter().map(DiceGroup::doubled).collect(),
            modifier: self.modifier,
        }
    }

    /// The same expression with an extra flat bonus folded into the modifier.
    pub fn with_bonus(&self, bonus: i32) -> Self {
        Self {
            groups: self.groups.clone(),
            modifier: self.modifier.saturating_add(bonus),
        }
    }

    /// Total number of dice across all groups.
    pub fn dice_count(&self) -> u32 {
        self.groups
            .iter()
            .fold(0u32, |acc, g| acc.saturating_add(g.count))
    }

    /// Total number of dice with the given number of sides.
    pub fn count_for_sides(&self, sides: u32) -> u32 {
        self.groups
            .iter()
            .filter(|g| g.sides == sides)
            .fold(0u32, |acc, g| acc.saturating_add(g.count))
    }

    /// Whether this is a percentile roll: one d100, optionally with one d10,
    /// and no other dice.
    pub fn is_percentile(&self) -> bool {
        let only_percentile_dice = self
            .groups
            .iter()
            .all(|g| g.sides == PERCENTILE_TENS_SIDES || g.sides == PERCENTILE_ONES_SIDES);
        only_percentile_dice
            && self.count_for_sides(PERCENTILE_TENS_SIDES) == 1
            && self.count_for_sides(PERCENTILE_ONES_SIDES) <= 1
    }

    /// Get the minimum possible total
    pub fn min_total(&self) -> i64 {
        self.dice_count() as i64 + self.modifier as i64
    }

    /// Get the maximum possible total
    pub fn max_total(&self) -> i64 {
        let dice_max: i64 = self
            .groups
            .iter()
            .map(|g| g.count as i64 * g.sides as i64)
            .sum();
        dice_max + self.modifier as i64
    }

    /// Canonical notation (e.g., "2d6+1d4+3"), as sent to a roll source.
    pub fn notation(&self) -> String {
        let mut out = self
            .groups
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join("+");

        if self.modifier > 0 {
            if !out.is_empty() {
                out.push('+');
            }
            out.push_str(&self.modifier.to_string());
        } else if self.modifier < 0 || out.is_empty() {
            out.push_str(&self.modifier.to_string());
        }
        out
    }
}

impl fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation())
    }
}

/// The faces to ask a roll source for.
///
/// When `percentile_pairs` is non-zero the d100 dice are percentile tens
/// dice: the source rolls that many tens (00-90) and ones (0-9) pairs
/// instead of plain `1..=100` faces. Only a percentile roll sets it; a
/// typed `2d100` is two ordinary hundred-sided dice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRequest {
    pub dice: DiceSpec,
    #[serde(default)]
    pub percentile_pairs: u32,
}

impl DiceRequest {
    /// Faces for one roll of `spec`.
    pub fn single(spec: &DiceSpec) -> Self {
        Self {
            dice: spec.clone(),
            percentile_pairs: u32::from(spec.is_percentile()),
        }
    }

    /// Faces for both candidates of an advantage roll of `spec`.
    pub fn doubled(spec: &DiceSpec) -> Self {
        Self {
            dice: spec.doubled(),
            percentile_pairs: if spec.is_percentile() { 2 } else { 0 },
        }
    }

    pub fn is_percentile(&self) -> bool {
        self.percentile_pairs > 0
    }

    pub fn notation(&self) -> String {
        self.dice.notation()
    }
}

impl fmt::Display for DiceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation())
    }
}
