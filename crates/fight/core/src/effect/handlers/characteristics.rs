//! Characteristic buffs and point theft.
//!
//! Characteristic modifiers are derived from the buff list, so terminating a
//! buff reverts them on its own. The handlers only deal with the side
//! effects that live outside the characteristics: max life for vitality and
//! the turn points of a fighter currently playing.

use crate::battle::Battle;
use crate::buff::Buff;
use crate::effect::handler::{EffectHandler, EffectScope};
use crate::effect::{EffectError, EffectKind, EffectPhase, SpellEffect};
use crate::fighter::{Characteristic, FighterId};

/// Side effects of a characteristic change of `delta` on `owner`.
fn apply_side_effects(battle: &mut Battle, owner: FighterId, characteristic: Characteristic, delta: i32) {
    match characteristic {
        Characteristic::Vitality => {
            battle.alter_max_life(owner, delta);
        }
        Characteristic::ActionPoints => {
            battle.alter_turn_points(owner, delta, 0);
        }
        Characteristic::MovementPoints => {
            battle.alter_turn_points(owner, 0, delta);
        }
        _ => {}
    }
}

/// Immediate point change on playing targets. Only action and movement
/// points support an immediate application.
fn alter_points(
    scope: &mut EffectScope<'_>,
    effect: &SpellEffect,
    characteristic: Characteristic,
    sign: i32,
    handler: &'static str,
) -> Result<(), EffectError> {
    if !matches!(
        characteristic,
        Characteristic::ActionPoints | Characteristic::MovementPoints
    ) {
        return Err(EffectError::unsupported(handler, EffectPhase::Handle));
    }
    for target in scope.targets.clone() {
        let value = scope.roll(effect)?;
        apply_side_effects(scope.battle, target, characteristic, sign * value);
    }
    Ok(())
}

pub struct AddCharacteristicHandler;

impl EffectHandler for AddCharacteristicHandler {
    fn name(&self) -> &'static str {
        "AddCharacteristicHandler"
    }

    fn handle(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        match effect.kind {
            EffectKind::AddCharacteristic(characteristic) => {
                alter_points(scope, effect, characteristic, 1, self.name())
            }
            _ => Err(EffectError::unsupported(self.name(), EffectPhase::Handle)),
        }
    }

    fn buff(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        scope.buff_targets(effect)
    }

    fn on_buff_started(&self, battle: &mut Battle, buff: &Buff) {
        if let EffectKind::AddCharacteristic(characteristic) = buff.effect.kind {
            apply_side_effects(battle, buff.owner, characteristic, buff.value);
        }
    }

    fn on_buff_terminated(&self, battle: &mut Battle, buff: &Buff) {
        if let EffectKind::AddCharacteristic(Characteristic::Vitality) = buff.effect.kind {
            battle.alter_max_life(buff.owner, -buff.value);
        }
    }
}

pub struct RemoveCharacteristicHandler;

impl EffectHandler for RemoveCharacteristicHandler {
    fn name(&self) -> &'static str {
        "RemoveCharacteristicHandler"
    }

    fn handle(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        match effect.kind {
            EffectKind::RemoveCharacteristic(characteristic) => {
                alter_points(scope, effect, characteristic, -1, self.name())
            }
            _ => Err(EffectError::unsupported(self.name(), EffectPhase::Handle)),
        }
    }

    fn buff(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        scope.buff_targets(effect)
    }

    fn on_buff_started(&self, battle: &mut Battle, buff: &Buff) {
        if let EffectKind::RemoveCharacteristic(characteristic) = buff.effect.kind {
            apply_side_effects(battle, buff.owner, characteristic, -buff.value);
        }
    }

    fn on_buff_terminated(&self, battle: &mut Battle, buff: &Buff) {
        if let EffectKind::RemoveCharacteristic(Characteristic::Vitality) = buff.effect.kind {
            battle.alter_max_life(buff.owner, buff.value);
        }
    }
}

/// Percent bonus on a characteristic. Buff only.
pub struct PercentCharacteristicHandler;

impl EffectHandler for PercentCharacteristicHandler {
    fn name(&self) -> &'static str {
        "PercentCharacteristicHandler"
    }

    fn buff(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        scope.buff_targets(effect)
    }
}

/// Steals action or movement points: the targets lose them and the caster
/// gains the total.
pub struct StealPointsHandler;

impl StealPointsHandler {
    fn characteristic(kind: EffectKind) -> Characteristic {
        match kind {
            EffectKind::StealMovementPoints => Characteristic::MovementPoints,
            _ => Characteristic::ActionPoints,
        }
    }
}

impl EffectHandler for StealPointsHandler {
    fn name(&self) -> &'static str {
        "StealPointsHandler"
    }

    fn handle(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        let characteristic = Self::characteristic(effect.kind);
        let value = scope.roll(effect)?;
        let caster = scope.caster;
        let mut stolen = 0;
        for target in scope.targets.clone() {
            if target == caster {
                continue;
            }
            let (ap, mp) = match characteristic {
                Characteristic::MovementPoints => scope.battle.alter_turn_points(target, 0, -value),
                _ => scope.battle.alter_turn_points(target, -value, 0),
            };
            stolen -= ap + mp;
        }
        if stolen > 0 {
            apply_side_effects(scope.battle, caster, characteristic, stolen);
        }
        Ok(())
    }

    fn buff(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        let characteristic = Self::characteristic(effect.kind);
        let value = scope.roll(effect)?;
        let caster = scope.caster;

        let removal = SpellEffect {
            kind: EffectKind::RemoveCharacteristic(characteristic),
            ..effect.clone()
        };
        let mut stolen = 0;
        for target in scope.targets.clone() {
            if target == caster {
                continue;
            }
            scope.add_buff(&removal, value, target);
            stolen += value;
        }

        if stolen > 0 {
            let gain = SpellEffect {
                kind: EffectKind::AddCharacteristic(characteristic),
                ..effect.clone()
            };
            scope.add_buff(&gain, stolen, caster);
        }
        Ok(())
    }
}
