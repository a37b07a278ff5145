//! Advantage and disadvantage resolution.
//!
//! An advantage roll requests every dice group twice over in a single batch
//! (`1d20` becomes `2d20`), splits the faces into two candidate pools, and
//! keeps the higher (advantage) or lower (disadvantage) total.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::dice::{DiceRequest, DiceSpec};
use super::roll::{
    format_breakdown, labelled, modifier_suffix, percentile_pairs, sum_faces, RawRollSet,
};

/// Which of the two candidate totals to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdvantageMode {
    Advantage,
    Disadvantage,
}

impl AdvantageMode {
    /// Short tag used in roll labels.
    pub fn tag(&self) -> &'static str {
        match self {
            AdvantageMode::Advantage => "adv",
            AdvantageMode::Disadvantage => "dis",
        }
    }

    /// Pick between two candidate totals. Ties go to candidate A.
    pub fn pick(&self, a: i32, b: i32) -> Candidate {
        let keep_a = match self {
            AdvantageMode::Advantage => a >= b,
            AdvantageMode::Disadvantage => a <= b,
        };
        if keep_a {
            Candidate::A
        } else {
            Candidate::B
        }
    }
}

impl fmt::Display for AdvantageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// How a roll request should be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RollMode {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl RollMode {
    /// The advantage mode, if this is not a normal roll.
    pub fn advantage_mode(&self) -> Option<AdvantageMode> {
        match self {
            RollMode::Normal => None,
            RollMode::Advantage => Some(AdvantageMode::Advantage),
            RollMode::Disadvantage => Some(AdvantageMode::Disadvantage),
        }
    }
}

/// One of the two candidate pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Candidate {
    A,
    B,
}

/// A pending advantage/disadvantage roll.
///
/// Created when the roll is requested; [`AdvantageContext::request`]
/// gives the doubled dice to ask the roll source for, and
/// [`AdvantageContext::resolve`] consumes the context once the faces arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvantageContext {
    mode: AdvantageMode,
    flat_bonus: i32,
    dice_spec: DiceSpec,
    label: String,
}

impl AdvantageContext {
    pub fn new(
        dice_spec: DiceSpec,
        flat_bonus: i32,
        mode: AdvantageMode,
        label: impl Into<String>,
    ) -> Self {
        Self {
            mode,
            flat_bonus,
            dice_spec,
            label: label.into(),
        }
    }

    pub fn mode(&self) -> AdvantageMode {
        self.mode
    }

    pub fn dice_spec(&self) -> &DiceSpec {
        &self.dice_spec
    }

    /// The dice to request from the roll source: every group doubled.
    pub fn request(&self) -> DiceRequest {
        DiceRequest::doubled(&self.dice_spec)
    }

    /// Resolve against the faces rolled for [`Self::request`].
    pub fn resolve(self, raw: &RawRollSet) -> AdvantageOutcome {
        resolve_with_mode(&self.dice_spec, self.flat_bonus, self.mode, &self.label, raw)
    }
}

/// Result of an advantage/disadvantage roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvantageOutcome {
    pub mode: AdvantageMode,
    /// The kept total
    pub winning_total: i32,
    pub winner: Candidate,
    pub total_a: i32,
    pub total_b: i32,
    /// Breakdown of candidate A
    pub detail_a: String,
    /// Breakdown of candidate B
    pub detail_b: String,
    /// "{label}: {detail_a} vs {detail_b} => {winner} (adv|dis)"
    pub final_label: String,
}

/// Resolve an advantage/disadvantage roll.
///
/// `spec` is the roll as the player wrote it (not doubled); `raw` holds the
/// faces for the doubled request. `bonus` is added to both candidates on
/// top of the spec's own modifier.
///
/// Percentile rolls pair the two d100 faces with the two d10 faces by
/// position. Other rolls split each group's faces: the first `count` go to
/// candidate A and the next `count` to candidate B. When the source
/// supplied fewer faces than requested, whatever arrived is halved (A gets
/// the larger half), and a single face is shared by both candidates.
pub fn resolve_with_mode(
    spec: &DiceSpec,
    bonus: i32,
    mode: AdvantageMode,
    label: &str,
    raw: &RawRollSet,
) -> AdvantageOutcome {
    let flat = spec.modifier.saturating_add(bonus);

    let (total_a, total_b, detail_a, detail_b) = match percentile_pairs(spec, raw, 2) {
        Some(pairs) if pairs.len() == 2 => {
            let (a, b) = (pairs[0], pairs[1]);
            (
                (a.base() as i32).saturating_add(flat),
                (b.base() as i32).saturating_add(flat),
                format!("{}{}", a.detail(), modifier_suffix(flat)),
                format!("{}{}", b.detail(), modifier_suffix(flat)),
            )
        }
        _ => split_candidates(spec, flat, raw),
    };

    let winner = mode.pick(total_a, total_b);
    let winning_total = match winner {
        Candidate::A => total_a,
        Candidate::B => total_b,
    };
    let final_label = labelled(
        label,
        &format!(
            "{} vs {} => {} ({})",
            detail_a,
            detail_b,
            winning_total,
            mode.tag()
        ),
    );

    AdvantageOutcome {
        mode,
        winning_total,
        winner,
        total_a,
        total_b,
        detail_a,
        detail_b,
        final_label,
    }
}

fn split_candidates(spec: &DiceSpec, flat: i32, raw: &RawRollSet) -> (i32, i32, String, String) {
    let mut cursor = raw.cursor();
    let mut pool_a: Vec<&[u32]> = Vec::with_capacity(spec.groups.len());
    let mut pool_b: Vec<&[u32]> = Vec::with_capacity(spec.groups.len());

    for group in &spec.groups {
        let count = group.count as usize;
        let faces = cursor.take(group.sides, count.saturating_mul(2));

        let (a, b) = if faces.len() >= count.saturating_mul(2) {
            faces.split_at(count)
        } else if faces.len() > 1 {
            tracing::debug!(
                sides = group.sides,
                expected = count * 2,
                received = faces.len(),
                "Short face batch for advantage roll, splitting what arrived"
            );
            faces.split_at(faces.len().div_ceil(2))
        } else {
            (faces, faces)
        };
        pool_a.push(a);
        pool_b.push(b);
    }

    let total = |pool: &[&[u32]]| {
        pool.iter()
            .fold(0i32, |acc, faces| acc.saturating_add(sum_faces(faces)))
            .saturating_add(flat)
    };

    (
        total(&pool_a[..]),
        total(&pool_b[..]),
        format_breakdown(&pool_a, flat),
        format_breakdown(&pool_b, flat),
    )
}
