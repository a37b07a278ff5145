//! Spell slot state: current/max per slot level 1-9.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Highest spell slot level.
pub const MAX_SLOT_LEVEL: u8 = 9;

const SLOT_LEVEL_COUNT: usize = MAX_SLOT_LEVEL as usize;

/// A spell slot level in 1..=9. Cantrips never consume slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SpellSlotLevel(u8);

impl SpellSlotLevel {
    pub fn new(level: u8) -> Result<Self, DomainError> {
        if (1..=MAX_SLOT_LEVEL).contains(&level) {
            Ok(Self(level))
        } else {
            Err(DomainError::validation(format!(
                "Spell slot level must be between 1 and {}, got {}",
                MAX_SLOT_LEVEL, level
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Every slot level, lowest first.
    pub fn all() -> impl Iterator<Item = SpellSlotLevel> {
        (1..=MAX_SLOT_LEVEL).map(SpellSlotLevel)
    }

    fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for SpellSlotLevel {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SpellSlotLevel> for u8 {
    fn from(level: SpellSlotLevel) -> Self {
        level.0
    }
}

impl fmt::Display for SpellSlotLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Slots available at one level. `current` never exceeds `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "SlotEntryRecord")]
pub struct SpellSlotEntry {
    /// Currently available slots
    current: u8,
    /// Maximum slots
    max: u8,
}

#[derive(Deserialize)]
struct SlotEntryRecord {
    current: u8,
    max: u8,
}

impl TryFrom<SlotEntryRecord> for SpellSlotEntry {
    type Error = DomainError;

    fn try_from(record: SlotEntryRecord) -> Result<Self, Self::Error> {
        if record.current > record.max {
            return Err(DomainError::validation(format!(
                "Spell slot current ({}) exceeds max ({})",
                record.current, record.max
            )));
        }
        Ok(Self {
            current: record.current,
            max: record.max,
        })
    }
}

impl SpellSlotEntry {
    /// Create an entry, clamping `current` down to `max`.
    pub fn new(current: u8, max: u8) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    /// A fully rested entry.
    pub fn full(max: u8) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    /// Check if any slots are available.
    pub fn has_slots(&self) -> bool {
        self.current > 0
    }

    pub fn is_full(&self) -> bool {
        self.current == self.max
    }

    /// Use one slot. Returns false when none were left.
    pub fn spend(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Regain one slot. Returns false when already full.
    pub fn restore(&mut self) -> bool {
        if self.current >= self.max {
            return false;
        }
        self.current += 1;
        true
    }

    /// Restore all slots.
    pub fn restore_all(&mut self) {
        self.current = self.max;
    }

    pub fn set_current(&mut self, value: u8) {
        self.current = value.min(self.max);
    }

    /// Change the maximum, pulling `current` down if it no longer fits.
    pub fn set_max(&mut self, value: u8) {
        self.max = value;
        self.current = self.current.min(value);
    }
}

/// Which half of a slot entry an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotField {
    Current,
    Max,
}

impl FromStr for SlotField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "current" => Ok(Self::Current),
            "max" => Ok(Self::Max),
            _ => Err(DomainError::parse(format!("Unknown slot field: {}", s))),
        }
    }
}

/// Result of comparing slot maxima against the class defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDirtiness {
    pub is_dirty: bool,
    /// One "Level {n}: {current} slots (default: {default})" line per mismatch
    pub changes: Vec<String>,
}

impl SlotDirtiness {
    pub fn clean() -> Self {
        Self::default()
    }
}

/// Partial mapping from slot level to entry.
///
/// Serialises as a map keyed by level (`{"1": {"current": 4, "max": 4}}`);
/// levels outside 1-9 and entries with `current > max` are rejected on the
/// way in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<u8, SpellSlotEntry>",
    into = "BTreeMap<u8, SpellSlotEntry>"
)]
pub struct SpellSlots {
    levels: [Option<SpellSlotEntry>; SLOT_LEVEL_COUNT],
}

impl SpellSlots {
    /// No slots at any level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully rested slots from a row of maxima; zero columns stay absent.
    pub fn from_maxima(maxima: &[u8; SLOT_LEVEL_COUNT]) -> Self {
        let mut levels = [None; SLOT_LEVEL_COUNT];
        for (slot, &max) in levels.iter_mut().zip(maxima) {
            if max > 0 {
                *slot = Some(SpellSlotEntry::full(max));
            }
        }
        Self { levels }
    }

    pub fn get(&self, level: SpellSlotLevel) -> Option<SpellSlotEntry> {
        self.levels[level.index()]
    }

    pub fn set(&mut self, level: SpellSlotLevel, entry: SpellSlotEntry) {
        self.levels[level.index()] = Some(entry);
    }

    pub fn remove(&mut self, level: SpellSlotLevel) -> Option<SpellSlotEntry> {
        self.levels[level.index()].take()
    }

    /// Present levels in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (SpellSlotLevel, SpellSlotEntry)> + '_ {
        SpellSlotLevel::all().filter_map(move |level| self.get(level).map(|entry| (level, entry)))
    }

    pub fn len(&self) -> usize {
        self.levels.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(Option::is_none)
    }

    /// Max at a level, absent levels counting as zero.
    pub fn max_at(&self, level: SpellSlotLevel) -> u8 {
        self.get(level).map_or(0, |entry| entry.max())
    }

    /// Stored entries layered over `defaults`, level by level.
    pub fn merged_over(&self, defaults: &SpellSlots) -> SpellSlots {
        let mut merged = defaults.clone();
        for (slot, stored) in merged.levels.iter_mut().zip(&self.levels) {
            if stored.is_some() {
                *slot = *stored;
            }
        }
        merged
    }

    /// Set one field of a level's entry. Values clamp to 0..=255; an absent
    /// level starts from an empty entry.
    pub fn update_slot(&mut self, level: SpellSlotLevel, field: SlotField, value: i32) {
        let clamped = clamp_slot_value(value);
        if i32::from(clamped) != value {
            tracing::debug!(level = %level, value, clamped, "Clamped spell slot value");
        }

        let entry = self.levels[level.index()].get_or_insert_with(SpellSlotEntry::default);
        match field {
            SlotField::Current => entry.set_current(clamped),
            SlotField::Max => entry.set_max(clamped),
        }
    }

    /// Spend one slot at a level. No-op when empty or absent.
    pub fn spend(&mut self, level: SpellSlotLevel) -> bool {
        self.levels[level.index()]
            .as_mut()
            .is_some_and(SpellSlotEntry::spend)
    }

    /// Regain one slot at a level. No-op when full or absent.
    pub fn restore(&mut self, level: SpellSlotLevel) -> bool {
        self.levels[level.index()]
            .as_mut()
            .is_some_and(SpellSlotEntry::restore)
    }

    /// Refill every present level.
    pub fn long_rest(&mut self) {
        for entry in self.levels.iter_mut().flatten() {
            entry.restore_all();
        }
    }

    /// Take these (new) maxima but keep what was already spent: each level
    /// gets `min(previous current, new max)`; levels new to `previous` start
    /// full.
    pub fn carry_over_spent(&self, previous: &SpellSlots) -> SpellSlots {
        let mut next = self.clone();
        for (slot, old) in next.levels.iter_mut().zip(&previous.levels) {
            if let (Some(entry), Some(old)) = (slot.as_mut(), old) {
                entry.set_current(old.current());
            }
        }
        next
    }

    /// Compare maxima per level against `defaults`.
    pub fn dirtiness(&self, defaults: &SpellSlots) -> SlotDirtiness {
        let changes: Vec<String> = SpellSlotLevel::all()
            .filter_map(|level| {
                let current = self.max_at(level);
                let default = defaults.max_at(level);
                (current != default).then(|| {
                    format!(
                        "Level {}: {} slots (default: {})",
                        level, current, default
                    )
                })
            })
            .collect();

        SlotDirtiness {
            is_dirty: !changes.is_empty(),
            changes,
        }
    }
}

fn clamp_slot_value(value: i32) -> u8 {
    u8::try_from(value.max(0)).unwrap_or(u8::MAX)
}

impl TryFrom<BTreeMap<u8, SpellSlotEntry>> for SpellSlots {
    type Error = DomainError;

    fn try_from(map: BTreeMap<u8, SpellSlotEntry>) -> Result<Self, Self::Error> {
        let mut slots = SpellSlots::new();
        for (level, entry) in map {
            slots.set(SpellSlotLevel::new(level)?, entry);
        }
        Ok(slots)
    }
}

impl From<SpellSlots> for BTreeMap<u8, SpellSlotEntry> {
    fn from(slots: SpellSlots) -> Self {
        slots
            .iter()
            .map(|(level, entry)| (level.value(), entry))
            .collect()
    }
}
