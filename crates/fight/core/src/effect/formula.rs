//! Numeric formulas shared by effect handlers and the AI simulation.

use crate::config::FightConfig;
use crate::effect::Element;
use crate::fighter::{Characteristic, Characteristics};

/// Applies the caster boost to a rolled damage value.
///
/// `value * (100 + element stat + damage percent) / 100 + fixed damage`, never negative.
pub fn boosted_damage(value: i32, caster: &Characteristics, element: Element) -> i32 {
    let percent = 100
        + caster.get(element.boost_characteristic())
        + caster.get(Characteristic::DamagePercent);
    let boosted = i64::from(value) * i64::from(percent.max(0)) / 100
        + i64::from(caster.get(Characteristic::FixedDamage));
    boosted.clamp(0, i64::from(i32::MAX)) as i32
}

/// Applies the target resistances: flat first, then percent, floored.
///
/// `max(0, value - flat) * (100 - percent) / 100`. Percent resistance is
/// capped at [`FightConfig::MAX_PERCENT_RESISTANCE`]; a negative percent amplifies.
pub fn resisted_damage(value: i32, target: &Characteristics, element: Element) -> i32 {
    let flat = target.get(element.resistance());
    let percent = target
        .get(element.percent_resistance())
        .min(FightConfig::MAX_PERCENT_RESISTANCE);
    let after_flat = i64::from(value.saturating_sub(flat).max(0));
    let resisted = after_flat * i64::from(100 - percent) / 100;
    resisted.clamp(0, i64::from(i32::MAX)) as i32
}

/// Applies the caster boost to a rolled heal value.
pub fn boosted_heal(value: i32, caster: &Characteristics) -> i32 {
    let percent = (100 + caster.get(Characteristic::Intelligence)).max(0);
    let boosted = i64::from(value) * i64::from(percent) / 100
        + i64::from(caster.get(Characteristic::HealBonus));
    boosted.clamp(0, i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resistance_is_flat_then_percent_floored() {
        let target = Characteristics::new()
            .with(Characteristic::ResistanceFire, 5)
            .with(Characteristic::PercentResistanceFire, 10);
        assert_eq!(resisted_damage(20, &target, Element::Fire), 13);
        assert_eq!(resisted_damage(20, &target, Element::Water), 20);
    }

    #[test]
    fn resistance_never_goes_negative() {
        let target = Characteristics::new().with(Characteristic::ResistanceAir, 50);
        assert_eq!(resisted_damage(20, &target, Element::Air), 0);

        let immune = Characteristics::new().with(Characteristic::PercentResistanceAir, 150);
        assert_eq!(resisted_damage(20, &immune, Element::Air), 0);
    }

    #[test]
    fn negative_percent_resistance_amplifies() {
        let target = Characteristics::new().with(Characteristic::PercentResistanceEarth, -50);
        assert_eq!(resisted_damage(20, &target, Element::Earth), 30);
    }

    #[test]
    fn boost_uses_element_characteristic() {
        let caster = Characteristics::new()
            .with(Characteristic::Strength, 50)
            .with(Characteristic::Intelligence, 100)
            .with(Characteristic::FixedDamage, 2);
        assert_eq!(boosted_damage(10, &caster, Element::Earth), 17);
        assert_eq!(boosted_damage(10, &caster, Element::Neutral), 17);
        assert_eq!(boosted_damage(10, &caster, Element::Fire), 22);
        assert_eq!(boosted_damage(10, &caster, Element::Air), 12);
    }

    #[test]
    fn heal_boost_uses_intelligence() {
        let caster = Characteristics::new()
            .with(Characteristic::Intelligence, 50)
            .with(Characteristic::HealBonus, 3);
        assert_eq!(boosted_heal(10, &caster), 18);
    }
}
