use tracing::debug;

use crate::config::FightConfig;
use crate::effect::handler::{EffectHandler, EffectScope};
use crate::effect::{EffectError, SpellEffect};
use crate::env::MonsterId;
use crate::fighter::{Characteristic, FighterSpec};

/// Invokes the monster held in `special` on the target cell.
///
/// The invocation joins the caster team and plays right after it. Nothing
/// happens when the cell is taken or the caster already controls as many
/// invocations as its summon limit allows.
pub struct SummonHandler;

impl EffectHandler for SummonHandler {
    fn name(&self) -> &'static str {
        "SummonHandler"
    }

    fn handle(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        let caster = scope
            .battle
            .fighter(scope.caster)
            .ok_or(EffectError::FighterNotFound(scope.caster))?;
        let limit = caster.characteristics().get(Characteristic::SummonLimit)
            + FightConfig::BASE_SUMMON_LIMIT;
        let active = scope.battle.invocations_of(scope.caster).len() as i32;

        if active >= limit || !scope.battle.is_free(scope.target_cell) {
            debug!(
                target: "fight::effects",
                caster = %scope.caster,
                active,
                limit,
                cell = %scope.target_cell,
                "summon skipped"
            );
            return Ok(());
        }

        let monster = MonsterId(u32::try_from(effect.special).unwrap_or_default());
        let grade = u8::try_from(effect.min.max(1)).unwrap_or(1);
        let template = scope.env.monster(monster, grade)?;
        let spec = FighterSpec::invocation(scope.caster, monster, template);
        scope.battle.invoke(scope.caster, spec, scope.target_cell);
        Ok(())
    }
}
