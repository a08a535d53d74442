//! Buffs reacting to direct damage taken by their owner.

use crate::battle::{Battle, Damage};
use crate::buff::Buff;
use crate::effect::handler::{EffectHandler, EffectScope};
use crate::effect::{EffectError, SpellEffect};

/// Armor: flat reduction of each direct damage.
pub struct ReduceDamageHandler;

impl EffectHandler for ReduceDamageHandler {
    fn name(&self) -> &'static str {
        "ReduceDamageHandler"
    }

    fn buff(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        scope.buff_targets(effect)
    }

    fn on_direct_damage(&self, _battle: &mut Battle, buff: &Buff, damage: &mut Damage) {
        let reduced = buff.value.clamp(0, damage.value);
        damage.value -= reduced;
        damage.reduced += reduced;
    }
}

/// Sends part of the direct damage back to its source.
pub struct ReflectDamageHandler;

impl EffectHandler for ReflectDamageHandler {
    fn name(&self) -> &'static str {
        "ReflectDamageHandler"
    }

    fn buff(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        scope.buff_targets(effect)
    }

    fn on_direct_damage(&self, _battle: &mut Battle, buff: &Buff, damage: &mut Damage) {
        damage.reflect += buff.value.max(0);
    }
}

/// The buff caster takes the damage aimed at the owner, swapping places with it.
pub struct SacrificeHandler;

impl EffectHandler for SacrificeHandler {
    fn name(&self) -> &'static str {
        "SacrificeHandler"
    }

    fn buff(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        scope.buff_targets(effect)
    }

    fn on_direct_damage(&self, battle: &mut Battle, buff: &Buff, damage: &mut Damage) {
        if damage.redirect.is_some() || buff.caster == damage.source || buff.caster == buff.owner {
            return;
        }
        if battle
            .fighter(buff.caster)
            .is_some_and(|protector| !protector.is_dead())
        {
            damage.redirect = Some(buff.caster);
        }
    }
}
