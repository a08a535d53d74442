use tracing::debug;

use super::{ActionResult, Applied, spend};
use crate::battle::Battle;
use crate::config::FightConfig;
use crate::effect::apply_effects;
use crate::env::{FightEnv, SpellLevel, SpellRef};
use crate::events::FightEvent;
use crate::fight::{FightError, ValidationError};
use crate::fighter::{Characteristic, FighterId};
use crate::grid::{CellId, GridOracle};

/// Cast of a known spell on a target cell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastAction {
    pub caster: FighterId,
    pub spell: SpellRef,
    pub target: CellId,
}

impl CastAction {
    pub fn new(caster: FighterId, spell: SpellRef, target: CellId) -> Self {
        Self {
            caster,
            spell,
            target,
        }
    }

    pub(super) fn validate(&self, battle: &Battle, env: &FightEnv<'_>) -> Result<(), FightError> {
        let caster = battle
            .fighter(self.caster)
            .ok_or(FightError::FighterNotFound(self.caster))?;
        if !caster.knows(self.spell) {
            return Err(ValidationError::SpellNotKnown(self.spell).into());
        }
        let level = env.spell(self.spell.spell, self.spell.level)?;

        let available = caster
            .turn_points()
            .map_or(0, |points| points.action_points());
        if available < level.action_point_cost {
            return Err(ValidationError::NotEnoughActionPoints {
                required: level.action_point_cost,
                available,
            }
            .into());
        }

        let grid = battle.grid();
        if !grid.contains(self.target) {
            return Err(ValidationError::InvalidCell(self.target).into());
        }

        let mut max = level.max_range;
        if level.modifiable_range {
            let bonus = caster.characteristics().get(Characteristic::Range);
            max = max.saturating_add_signed(bonus);
        }
        let max = max.max(level.min_range);
        let distance = grid.distance(caster.cell(), self.target);
        if distance < level.min_range || distance > max {
            return Err(ValidationError::OutOfRange {
                distance,
                min: level.min_range,
                max,
            }
            .into());
        }

        if level.line_of_sight && !battle.has_line_of_sight(caster.cell(), self.target) {
            return Err(ValidationError::NoLineOfSight(self.target).into());
        }
        if level.free_cell && !battle.is_free(self.target) {
            return Err(ValidationError::CellNotFree(self.target).into());
        }

        let states = caster.states();
        if let Some(missing) = level.required_states.iter().find(|state| !states.has(**state)) {
            return Err(ValidationError::RequiredState(*missing).into());
        }
        if let Some(forbidden) = level.forbidden_states.iter().find(|state| states.has(**state)) {
            return Err(ValidationError::ForbiddenState(*forbidden).into());
        }
        Ok(())
    }

    /// Rolls critical failure first, then critical hit.
    pub(super) fn start(
        &self,
        env: &FightEnv<'_>,
        config: &FightConfig,
    ) -> Result<ActionResult, FightError> {
        let level = env.spell(self.spell.spell, self.spell.level)?;
        let rng = env.rng()?;

        if rng.percentage_chance(level.critical_failure_chance) {
            return Ok(ActionResult::CastFailed {
                caster: self.caster,
                level: level.clone(),
            });
        }
        let critical =
            !level.critical_effects.is_empty() && rng.percentage_chance(level.critical_hit_chance);

        Ok(ActionResult::Cast {
            caster: self.caster,
            level: level.clone(),
            target: self.target,
            critical,
            duration: config.cast_duration(),
        })
    }
}

pub(super) fn apply_cast(
    battle: &mut Battle,
    env: &FightEnv<'_>,
    caster: FighterId,
    level: &SpellLevel,
    target: CellId,
    critical: bool,
) -> Result<Applied, FightError> {
    spend(battle, caster, level.action_point_cost, 0)?;

    let origin = battle
        .fighter(caster)
        .ok_or(FightError::FighterNotFound(caster))?
        .cell();
    let orientation = battle.grid().direction(origin, target);
    if let Some(fighter) = battle.fighter_mut(caster) {
        fighter.set_orientation(orientation);
    }

    if critical {
        battle.emit(FightEvent::CriticalHit {
            fighter: caster,
            spell: level.reference(),
        });
    }
    debug!(
        target: "fight::effects",
        %caster,
        spell = %level.spell,
        level = level.level,
        cell = %target,
        critical,
        "applying cast"
    );
    apply_effects(
        battle,
        env,
        caster,
        Some(level.spell),
        level.effects_for(critical),
        target,
    )?;
    Ok(Applied::default())
}
