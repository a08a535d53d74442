use super::Battle;
use crate::events::FightEvent;
use crate::fighter::{FighterId, FighterSpec};
use crate::grid::CellId;

impl Battle {
    /// Walks `fighter` along `path`, ending on its last cell and facing the
    /// direction of the last step.
    pub fn move_fighter(&mut self, fighter: FighterId, path: &[CellId]) {
        let Some(&destination) = path.last() else {
            return;
        };
        let Some(origin) = self.fighter(fighter).map(|entry| entry.cell()) else {
            return;
        };
        let previous = path.iter().rev().nth(1).copied().unwrap_or(origin);
        let orientation = self.grid().direction(previous, destination);
        if let Some(entry) = self.fighter_mut(fighter) {
            entry.set_cell(destination);
            entry.set_orientation(orientation);
        }
        self.emit(FightEvent::FighterMoved {
            fighter,
            path: path.to_vec(),
        });
    }

    pub fn teleport(&mut self, fighter: FighterId, cell: CellId) {
        if let Some(entry) = self.fighter_mut(fighter) {
            entry.set_cell(cell);
            self.emit(FightEvent::FighterTeleported { fighter, cell });
        }
    }

    /// Forced move (push back).
    pub fn slide(&mut self, fighter: FighterId, cell: CellId) {
        if let Some(entry) = self.fighter_mut(fighter) {
            entry.set_cell(cell);
            self.emit(FightEvent::FighterSlid { fighter, cell });
        }
    }

    pub fn switch_positions(&mut self, first: FighterId, second: FighterId) {
        let (Some(a), Some(b)) = (
            self.fighter(first).map(|entry| entry.cell()),
            self.fighter(second).map(|entry| entry.cell()),
        ) else {
            return;
        };
        if let Some(entry) = self.fighter_mut(first) {
            entry.set_cell(b);
        }
        if let Some(entry) = self.fighter_mut(second) {
            entry.set_cell(a);
        }
        self.emit(FightEvent::PositionsSwitched { first, second });
    }

    /// Adds an invocation to the invoker team on `cell`.
    ///
    /// The new fighter is queued in [`Battle::take_joined`] so the turn order
    /// can insert it right after its invoker.
    pub fn invoke(
        &mut self,
        invoker: FighterId,
        spec: FighterSpec,
        cell: CellId,
    ) -> Option<FighterId> {
        let team = self.fighter(invoker)?.team();
        let fighter = self.insert_fighter(team, cell, spec)?;
        self.joined.push((invoker, fighter));
        self.emit(FightEvent::FighterInvoked {
            invoker,
            fighter,
            cell,
        });
        Some(fighter)
    }
}

#[cfg(test)]
mod tests {
    use crate::battle::tests::duel;
    use crate::grid::{CellId, Direction};

    #[test]
    fn move_sets_cell_and_orientation() {
        let (mut battle, first, _) = duel();
        battle.move_fighter(first, &[CellId(10), CellId(20)]);
        let fighter = battle.fighter(first).unwrap();
        assert_eq!(fighter.cell(), CellId(20));
        assert_eq!(fighter.orientation(), Direction::South);
    }

    #[test]
    fn switch_swaps_cells() {
        let (mut battle, first, second) = duel();
        battle.switch_positions(first, second);
        assert_eq!(battle.fighter(first).unwrap().cell(), CellId(5));
        assert_eq!(battle.fighter(second).unwrap().cell(), CellId(0));
    }
}
