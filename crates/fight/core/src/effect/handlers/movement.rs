use crate::effect::handler::{EffectHandler, EffectScope};
use crate::effect::{EffectError, SpellEffect};

/// Moves the caster to the target cell when it is free.
pub struct TeleportHandler;

impl EffectHandler for TeleportHandler {
    fn name(&self) -> &'static str {
        "TeleportHandler"
    }

    fn handle(&self, scope: &mut EffectScope<'_>, _effect: &SpellEffect) -> Result<(), EffectError> {
        if scope.battle.is_free(scope.target_cell) {
            scope.battle.teleport(scope.caster, scope.target_cell);
        }
        Ok(())
    }
}

/// Swaps the caster with the fighter standing on the target cell.
pub struct SwitchPositionHandler;

impl EffectHandler for SwitchPositionHandler {
    fn name(&self) -> &'static str {
        "SwitchPositionHandler"
    }

    fn handle(&self, scope: &mut EffectScope<'_>, _effect: &SpellEffect) -> Result<(), EffectError> {
        if let Some(other) = scope.battle.fighter_at(scope.target_cell)
            && other != scope.caster
        {
            scope.battle.switch_positions(scope.caster, other);
        }
        Ok(())
    }
}

/// Pushes each target away from the caster, one cell at a time, stopping at
/// the first blocked cell.
pub struct PushBackHandler;

impl EffectHandler for PushBackHandler {
    fn name(&self) -> &'static str {
        "PushBackHandler"
    }

    fn handle(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        let origin = scope
            .battle
            .fighter(scope.caster)
            .ok_or(EffectError::FighterNotFound(scope.caster))?
            .cell();
        for target in scope.targets.clone() {
            if target == scope.caster {
                continue;
            }
            let distance = scope.roll(effect)?;
            let Some(start) = scope.battle.fighter(target).map(|fighter| fighter.cell()) else {
                continue;
            };
            let direction = scope.battle.grid().direction(origin, start);
            let mut destination = start;
            for _ in 0..distance.max(0) {
                match scope.battle.grid().step(destination, direction) {
                    Some(next) if scope.battle.is_free(next) => destination = next,
                    _ => break,
                }
            }
            if destination != start {
                scope.battle.slide(target, destination);
            }
        }
        Ok(())
    }
}
