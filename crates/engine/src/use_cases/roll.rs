//! Dice roll use case.
//!
//! Handles a player-initiated roll from notation to result:
//! - Parsing the notation
//! - Requesting faces from the roll source (doubled for advantage)
//! - Evaluating the faces or resolving advantage/disadvantage

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use grimoire_domain::value_objects::evaluate;
use grimoire_domain::{
    AdvantageContext, AdvantageOutcome, DiceRequest, DiceSpec, RollMode, RollResult,
};

use crate::infrastructure::ports::{RollSourceError, RollSourcePort};

/// Errors that can occur while rolling.
#[derive(Debug, thiserror::Error)]
pub enum RollError {
    #[error("Not a dice expression: {0:?}")]
    NotDiceNotation(String),
    #[error("Roll source error: {0}")]
    Source(#[from] RollSourceError),
}

/// A roll as requested by the player.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRequest {
    pub notation: String,
    #[serde(default)]
    pub mode: RollMode,
    /// Ability, weapon or feat bonus added on top of the notation's modifier
    #[serde(default)]
    pub bonus: i32,
    #[serde(default)]
    pub label: String,
}

impl RollRequest {
    pub fn new(notation: impl Into<String>) -> Self {
        Self {
            notation: notation.into(),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: RollMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_bonus(mut self, bonus: i32) -> Self {
        self.bonus = bonus;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Result of a roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RollOutcome {
    /// A normal roll
    Single { result: RollResult },
    /// An advantage/disadvantage roll
    Contest { outcome: AdvantageOutcome },
    /// A bare number, no dice involved
    Flat { total: i32, summary: String },
}

impl RollOutcome {
    pub fn total(&self) -> i32 {
        match self {
            RollOutcome::Single { result } => result.total,
            RollOutcome::Contest { outcome } => outcome.winning_total,
            RollOutcome::Flat { total, .. } => *total,
        }
    }

    /// The line to show the player.
    pub fn summary(&self) -> &str {
        match self {
            RollOutcome::Single { result } => &result.summary,
            RollOutcome::Contest { outcome } => &outcome.final_label,
            RollOutcome::Flat { summary, .. } => summary,
        }
    }
}

/// Use case for rolling dice.
pub struct RollDice {
    source: Arc<dyn RollSourcePort>,
}

impl RollDice {
    pub fn new(source: Arc<dyn RollSourcePort>) -> Self {
        Self { source }
    }

    /// Roll a request.
    ///
    /// # Returns
    /// - `Single` for a normal dice roll
    /// - `Contest` for advantage/disadvantage (both candidates kept)
    /// - `Flat` when the notation is just a signed integer
    pub fn execute(&self, request: &RollRequest) -> Result<RollOutcome, RollError> {
        let notation = request.notation.trim();
        let Some(spec) = DiceSpec::parse(notation) else {
            return flat_roll(notation, request.bonus, &request.label);
        };

        match request.mode.advantage_mode() {
            None => {
                let spec = spec.with_bonus(request.bonus);
                let dice_request = DiceRequest::single(&spec);
                let raw = self.source.roll(&dice_request)?;
                if !raw.matches_request(&spec) {
                    tracing::warn!(
                        request = %dice_request,
                        "Roll source returned unexpected face counts"
                    );
                }

                let result = evaluate(&spec, &raw, &request.label);
                tracing::info!(total = result.total, summary = %result.summary, "Dice rolled");
                Ok(RollOutcome::Single { result })
            }
            Some(mode) => {
                let context = AdvantageContext::new(spec, request.bonus, mode, request.label.clone());
                let dice_request = context.request();
                let raw = self.source.roll(&dice_request)?;
                if !raw.matches_request(&dice_request.dice) {
                    tracing::warn!(
                        request = %dice_request,
                        "Roll source returned unexpected face counts, splitting what arrived"
                    );
                }

                let outcome = context.resolve(&raw);
                tracing::info!(
                    total = outcome.winning_total,
                    summary = %outcome.final_label,
                    "Dice rolled with {}",
                    outcome.mode
                );
                Ok(RollOutcome::Contest { outcome })
            }
        }
    }
}

fn flat_roll(notation: &str, bonus: i32, label: &str) -> Result<RollOutcome, RollError> {
    let value: i32 = notation
        .parse()
        .map_err(|_| RollError::NotDiceNotation(notation.to_string()))?;
    let total = value.saturating_add(bonus);
    let summary = if label.is_empty() {
        total.to_string()
    } else {
        format!("{}: {}", label, total)
    };
    Ok(RollOutcome::Flat { total, summary })
}
