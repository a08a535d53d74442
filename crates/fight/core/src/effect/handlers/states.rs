use crate::battle::Battle;
use crate::buff::Buff;
use crate::effect::handler::{EffectHandler, EffectScope};
use crate::effect::{EffectError, SpellEffect};
use crate::fighter::StateExpiry;

/// Adds the state held in `special`. Permanent without duration, bound to
/// the buff otherwise.
pub struct AddStateHandler;

impl EffectHandler for AddStateHandler {
    fn name(&self) -> &'static str {
        "AddStateHandler"
    }

    fn handle(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        let state = effect.state();
        for target in scope.targets.clone() {
            scope.battle.add_state(target, state, StateExpiry::Never);
        }
        Ok(())
    }

    fn buff(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        scope.buff_targets(effect)
    }

    fn on_buff_started(&self, battle: &mut Battle, buff: &Buff) {
        battle.add_state(buff.owner, buff.effect.state(), StateExpiry::WithBuff(buff.id));
    }

    fn on_buff_terminated(&self, battle: &mut Battle, buff: &Buff) {
        battle.remove_state_for_buff(buff.owner, buff.effect.state(), buff.id);
    }
}

pub struct RemoveStateHandler;

impl EffectHandler for RemoveStateHandler {
    fn name(&self) -> &'static str {
        "RemoveStateHandler"
    }

    fn handle(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        let state = effect.state();
        for target in scope.targets.clone() {
            scope.battle.remove_state(target, state);
        }
        Ok(())
    }
}

/// Hides the owner for the buff duration.
pub struct InvisibilityHandler;

impl EffectHandler for InvisibilityHandler {
    fn name(&self) -> &'static str {
        "InvisibilityHandler"
    }

    fn buff(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        scope.buff_targets(effect)
    }

    fn on_buff_started(&self, battle: &mut Battle, buff: &Buff) {
        battle.set_hidden(buff.owner, true);
    }

    fn on_buff_terminated(&self, battle: &mut Battle, buff: &Buff) {
        battle.set_hidden(buff.owner, false);
    }
}

/// Makes hidden fighters in the area visible again.
pub struct RevealHandler;

impl EffectHandler for RevealHandler {
    fn name(&self) -> &'static str {
        "RevealHandler"
    }

    fn handle(&self, scope: &mut EffectScope<'_>, _effect: &SpellEffect) -> Result<(), EffectError> {
        for target in scope.targets.clone() {
            scope.battle.set_hidden(target, false);
        }
        Ok(())
    }
}
