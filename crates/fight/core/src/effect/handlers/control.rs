use crate::battle::Battle;
use crate::buff::Buff;
use crate::effect::handler::{EffectHandler, EffectScope, TurnStart};
use crate::effect::{EffectError, SpellEffect};

/// The owner loses its next turns while the buff lasts.
pub struct SkipNextTurnHandler;

impl EffectHandler for SkipNextTurnHandler {
    fn name(&self) -> &'static str {
        "SkipNextTurnHandler"
    }

    fn buff(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        scope.buff_targets(effect)
    }

    fn on_start_turn(&self, _battle: &mut Battle, _buff: &Buff) -> TurnStart {
        TurnStart::SkipTurn
    }
}

/// Terminates every buff of the targets.
pub struct DispelHandler;

impl EffectHandler for DispelHandler {
    fn name(&self) -> &'static str {
        "DispelHandler"
    }

    fn handle(&self, scope: &mut EffectScope<'_>, _effect: &SpellEffect) -> Result<(), EffectError> {
        for target in scope.targets.clone() {
            scope.battle.dispel_buffs(target);
        }
        Ok(())
    }
}
