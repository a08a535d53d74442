use crate::battle::Battle;
use crate::buff::Buff;
use crate::effect::formula::boosted_damage;
use crate::effect::handler::{EffectHandler, EffectScope, TurnStart};
use crate::effect::{EffectError, SpellEffect};

/// Direct elemental damage. As a buff, the damage hits the owner at each of
/// its turn starts (poison).
pub struct DamageHandler;

impl DamageHandler {
    /// Rolled value, boosted by the caster when the effect allows it.
    fn compute(scope: &EffectScope<'_>, effect: &SpellEffect) -> Result<i32, EffectError> {
        let value = scope.roll(effect)?;
        if !effect.boostable {
            return Ok(value);
        }
        let caster = scope
            .battle
            .fighter(scope.caster)
            .ok_or(EffectError::FighterNotFound(scope.caster))?;
        Ok(boosted_damage(value, caster.characteristics(), effect.kind.element()))
    }
}

impl EffectHandler for DamageHandler {
    fn name(&self) -> &'static str {
        "DamageHandler"
    }

    fn handle(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        let element = effect.kind.element();
        for target in scope.targets.clone() {
            let value = Self::compute(scope, effect)?;
            scope
                .battle
                .apply_direct_damage(scope.caster, target, element, value);
        }
        Ok(())
    }

    fn buff(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        scope.buff_targets(effect)
    }

    fn on_start_turn(&self, battle: &mut Battle, buff: &Buff) -> TurnStart {
        let element = buff.effect.kind.element();
        let value = match battle.fighter(buff.caster) {
            Some(caster) if buff.effect.boostable => {
                boosted_damage(buff.value, caster.characteristics(), element)
            }
            _ => buff.value,
        };
        battle.apply_indirect_damage(buff.caster, buff.owner, element, value);
        TurnStart::Continue
    }
}

/// Direct damage; the caster heals half of the life actually removed.
pub struct StealLifeHandler;

impl EffectHandler for StealLifeHandler {
    fn name(&self) -> &'static str {
        "StealLifeHandler"
    }

    fn handle(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        let element = effect.kind.element();
        for target in scope.targets.clone() {
            let value = DamageHandler::compute(scope, effect)?;
            let dealt = scope
                .battle
                .apply_direct_damage(scope.caster, target, element, value);
            if dealt / 2 > 0 {
                scope.battle.heal(scope.caster, scope.caster, dealt / 2);
            }
        }
        Ok(())
    }
}

/// Damage computed from the life the caster has lost. Never boosted.
pub struct PercentLifeLostDamageHandler;

impl EffectHandler for PercentLifeLostDamageHandler {
    fn name(&self) -> &'static str {
        "PercentLifeLostDamageHandler"
    }

    fn handle(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        let element = effect.kind.element();
        for target in scope.targets.clone() {
            let lost = scope
                .battle
                .fighter(scope.caster)
                .ok_or(EffectError::FighterNotFound(scope.caster))?
                .life()
                .lost();
            let percent = scope.roll(effect)?;
            let value = lost * percent / 100;
            scope
                .battle
                .apply_direct_damage(scope.caster, target, element, value);
        }
        Ok(())
    }
}
