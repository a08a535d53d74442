use super::{ActionResult, spend};
use crate::battle::Battle;
use crate::config::FightConfig;
use crate::fight::{FightError, ValidationError};
use crate::fighter::FighterId;
use crate::grid::{CellId, GridOracle};

/// Walk along a path of adjacent cells, one movement point per cell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveAction {
    pub fighter: FighterId,
    /// Cells to walk through, excluding the starting cell.
    pub path: Vec<CellId>,
}

impl MoveAction {
    pub fn new(fighter: FighterId, path: Vec<CellId>) -> Self {
        Self { fighter, path }
    }

    pub(super) fn validate(&self, battle: &Battle) -> Result<(), FightError> {
        let fighter = battle
            .fighter(self.fighter)
            .ok_or(FightError::FighterNotFound(self.fighter))?;
        if self.path.is_empty() {
            return Err(ValidationError::InvalidPath.into());
        }

        let required = self.path.len() as i32;
        let available = fighter
            .turn_points()
            .map_or(0, |points| points.movement_points());
        if available < required {
            return Err(ValidationError::NotEnoughMovementPoints {
                required,
                available,
            }
            .into());
        }

        let grid = battle.grid();
        let mut previous = fighter.cell();
        for cell in &self.path {
            if !grid.contains(*cell) {
                return Err(ValidationError::InvalidCell(*cell).into());
            }
            if grid.distance(previous, *cell) != 1 {
                return Err(ValidationError::InvalidPath.into());
            }
            if !battle.is_free(*cell) {
                return Err(ValidationError::CellNotFree(*cell).into());
            }
            previous = *cell;
        }
        Ok(())
    }

    pub(super) fn start(&self, config: &FightConfig) -> ActionResult {
        ActionResult::Move {
            fighter: self.fighter,
            path: self.path.clone(),
            duration: config.move_duration(self.path.len()),
        }
    }
}

pub(super) fn apply_move(
    battle: &mut Battle,
    fighter: FighterId,
    path: &[CellId],
) -> Result<(), FightError> {
    spend(battle, fighter, 0, path.len() as i32)?;
    battle.move_fighter(fighter, path);
    Ok(())
}
