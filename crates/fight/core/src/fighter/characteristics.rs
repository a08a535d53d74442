//! Characteristics and their buff-driven computation.
//!
//! Final characteristics are never updated incrementally. They are recomputed
//! from the base values and the modifiers of the active buffs by
//! [`compute`], then memoized on the fighter until the buff list changes.
//!
//! The modifier stack applies in a fixed order:
//! Flat (summed) → Percent (summed, then multiplied).

use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

/// A named numeric combat attribute.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumCount, EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Characteristic {
    ActionPoints,
    MovementPoints,
    Vitality,
    Wisdom,
    Strength,
    Intelligence,
    Luck,
    Agility,
    Initiative,
    Range,
    DamagePercent,
    FixedDamage,
    HealBonus,
    SummonLimit,
    ResistanceNeutral,
    ResistanceEarth,
    ResistanceFire,
    ResistanceWater,
    ResistanceAir,
    PercentResistanceNeutral,
    PercentResistanceEarth,
    PercentResistanceFire,
    PercentResistanceWater,
    PercentResistanceAir,
}

impl Characteristic {
    const fn index(self) -> usize {
        self as usize
    }
}

/// A value contributed by an active buff to one characteristic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Modifier {
    /// Additive, applied first.
    Flat(i32),
    /// Percentage of (base + flat), summed with other percents.
    Percent(i32),
}

/// Characteristic values keyed by [`Characteristic`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Characteristics {
    values: [i32; Characteristic::COUNT],
}

impl Characteristics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set one characteristic.
    #[must_use]
    pub fn with(mut self, characteristic: Characteristic, value: i32) -> Self {
        self.set(characteristic, value);
        self
    }

    pub fn get(&self, characteristic: Characteristic) -> i32 {
        self.values[characteristic.index()]
    }

    pub fn set(&mut self, characteristic: Characteristic, value: i32) {
        self.values[characteristic.index()] = value;
    }

    pub fn add(&mut self, characteristic: Characteristic, delta: i32) {
        let slot = &mut self.values[characteristic.index()];
        *slot = slot.saturating_add(delta);
    }

    /// Non-zero entries, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Characteristic, i32)> + '_ {
        Characteristic::iter()
            .map(|characteristic| (characteristic, self.get(characteristic)))
            .filter(|(_, value)| *value != 0)
    }
}

/// Accumulates modifiers targeting a single characteristic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct ModifierStack {
    flat: i32,
    percent: i32,
}

impl ModifierStack {
    fn add(&mut self, modifier: Modifier) {
        match modifier {
            Modifier::Flat(value) => self.flat = self.flat.saturating_add(value),
            Modifier::Percent(value) => self.percent = self.percent.saturating_add(value),
        }
    }

    fn apply(&self, base: i32) -> i32 {
        let flat = i64::from(base) + i64::from(self.flat);
        let scaled = flat * (100 + i64::from(self.percent)) / 100;
        scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

/// Pure computation of final characteristics from base values and modifiers.
pub fn compute(
    base: &Characteristics,
    modifiers: impl IntoIterator<Item = (Characteristic, Modifier)>,
) -> Characteristics {
    let mut stacks = [ModifierStack::default(); Characteristic::COUNT];
    for (characteristic, modifier) in modifiers {
        stacks[characteristic.index()].add(modifier);
    }

    let mut result = Characteristics::new();
    for characteristic in Characteristic::iter() {
        let stack = &stacks[characteristic.index()];
        result.set(characteristic, stack.apply(base.get(characteristic)));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_without_modifiers_is_identity() {
        let base = Characteristics::new()
            .with(Characteristic::Strength, 40)
            .with(Characteristic::ActionPoints, 6);
        assert_eq!(compute(&base, []), base);
    }

    #[test]
    fn flat_then_percent() {
        let base = Characteristics::new().with(Characteristic::Strength, 40);
        let modifiers = [
            (Characteristic::Strength, Modifier::Flat(10)),
            (Characteristic::Strength, Modifier::Percent(20)),
            (Characteristic::Strength, Modifier::Percent(-10)),
            (Characteristic::Luck, Modifier::Flat(-5)),
        ];
        let computed = compute(&base, modifiers);
        assert_eq!(computed.get(Characteristic::Strength), 55);
        assert_eq!(computed.get(Characteristic::Luck), -5);
    }

    #[test]
    fn iter_skips_zero_values() {
        let values = Characteristics::new()
            .with(Characteristic::Agility, 3)
            .with(Characteristic::Range, 0);
        let entries: Vec<_> = values.iter().collect();
        assert_eq!(entries, vec![(Characteristic::Agility, 3)]);
    }
}
