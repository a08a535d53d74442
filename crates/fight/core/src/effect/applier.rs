//! Applies the effect list of a cast, effect by effect.

use tracing::warn;

use crate::battle::Battle;
use crate::effect::handler::{EffectScope, handler_for};
use crate::effect::targets::resolve_targets;
use crate::effect::{EffectError, EffectKind, SpellEffect};
use crate::env::{FightEnv, SpellId};
use crate::fighter::FighterId;
use crate::grid::CellId;

/// Resolves and applies every effect in order.
///
/// Effects with a duration go through the handler `buff` phase, the others
/// through `handle`. An effect whose handler does not support the phase is
/// skipped with a warning; any other error aborts the remaining effects.
/// Nothing more is applied once the caster is dead.
pub fn apply_effects(
    battle: &mut Battle,
    env: &FightEnv<'_>,
    caster: FighterId,
    spell: Option<SpellId>,
    effects: &[SpellEffect],
    target_cell: CellId,
) -> Result<(), EffectError> {
    for effect in effects {
        if battle.fighter(caster).is_none_or(|fighter| fighter.is_dead()) {
            break;
        }

        let targets = resolve_targets(battle, caster, effect, target_cell);
        if targets.is_empty() && needs_target(effect) {
            continue;
        }

        let handler = handler_for(effect.kind);
        let mut scope = EffectScope {
            battle: &mut *battle,
            env,
            caster,
            spell,
            target_cell,
            targets,
        };
        let outcome = if effect.is_buff() {
            handler.buff(&mut scope, effect)
        } else {
            handler.handle(&mut scope, effect)
        };

        match outcome {
            Ok(()) => {}
            Err(error @ EffectError::UnsupportedOperation { .. }) => {
                warn!(
                    target: "fight::effects",
                    caster = %caster,
                    kind = %effect.kind,
                    %error,
                    "effect skipped"
                );
            }
            Err(error) => return Err(error),
        }
    }
    Ok(())
}

/// Effects acting on the target cell itself run even when it is empty.
fn needs_target(effect: &SpellEffect) -> bool {
    !matches!(effect.kind, EffectKind::Teleport | EffectKind::Summon)
}
