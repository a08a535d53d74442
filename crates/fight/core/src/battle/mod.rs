//! Battle: the mutable combat board of one fight.
//!
//! The battle owns the grid, the teams and every fighter, and buffers the
//! events produced by mutations. Effect handlers and actions mutate fighters
//! only through the battle so that each change emits its event and death is
//! checked in one place.
//!
//! The methods are split by concern:
//! - `life`: life changes and death handling
//! - `damage`: direct and indirect damage, heal
//! - `buffs`: buff registration, turn tick and dispel
//! - `status`: states, visibility and turn points
//! - `movement`: walks, teleports, slides and invocations
mod buffs;
mod damage;
mod life;
mod movement;
mod status;

use std::collections::BTreeMap;

pub use damage::Damage;

use crate::buff::BuffId;
use crate::events::FightEvent;
use crate::fighter::{Fighter, FighterId, FighterSpec, TeamId};
use crate::grid::{Battlefield, CellId, GridOracle};

/// Fighters sharing a win/lose outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Team {
    pub id: TeamId,
    /// Starting cells offered during placement.
    pub places: Vec<CellId>,
    /// Members in join order.
    pub members: Vec<FighterId>,
}

#[derive(Clone, Debug)]
pub struct Battle {
    grid: Battlefield,
    teams: Vec<Team>,
    fighters: BTreeMap<FighterId, Fighter>,
    next_fighter: u32,
    next_buff: u64,
    events: Vec<FightEvent>,
    /// Invocations created since the last call to [`Battle::take_joined`],
    /// paired with their invoker.
    joined: Vec<(FighterId, FighterId)>,
}

impl Battle {
    pub fn new(grid: Battlefield) -> Self {
        Self {
            grid,
            teams: Vec::new(),
            fighters: BTreeMap::new(),
            next_fighter: 1,
            next_buff: 1,
            events: Vec::new(),
            joined: Vec::new(),
        }
    }

    pub fn grid(&self) -> &Battlefield {
        &self.grid
    }

    // ===== teams =====

    /// Registers a new team, or `None` once every [`TeamId`] is taken.
    pub fn add_team(&mut self, places: Vec<CellId>) -> Option<TeamId> {
        let id = TeamId(u8::try_from(self.teams.len()).ok()?);
        self.teams.push(Team {
            id,
            places,
            members: Vec::new(),
        });
        Some(id)
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|team| team.id == id)
    }

    /// A team is alive while one of its regular members is alive and present.
    /// Invocations do not count.
    pub fn team_alive(&self, id: TeamId) -> bool {
        self.team(id).is_some_and(|team| {
            team.members.iter().any(|member| {
                self.fighter(*member).is_some_and(|fighter| {
                    !fighter.kind().is_invocation() && !fighter.is_dead() && !fighter.has_fled()
                })
            })
        })
    }

    pub fn living_teams(&self) -> Vec<TeamId> {
        self.teams
            .iter()
            .map(|team| team.id)
            .filter(|id| self.team_alive(*id))
            .collect()
    }

    pub fn are_allies(&self, first: FighterId, second: FighterId) -> bool {
        match (self.fighter(first), self.fighter(second)) {
            (Some(a), Some(b)) => a.team() == b.team(),
            _ => false,
        }
    }

    // ===== fighters =====

    pub fn fighters(&self) -> impl Iterator<Item = &Fighter> {
        self.fighters.values()
    }

    pub fn fighter(&self, id: FighterId) -> Option<&Fighter> {
        self.fighters.get(&id)
    }

    pub fn fighter_mut(&mut self, id: FighterId) -> Option<&mut Fighter> {
        self.fighters.get_mut(&id)
    }

    /// Living fighter standing on `cell`.
    pub fn fighter_at(&self, cell: CellId) -> Option<FighterId> {
        self.fighters
            .values()
            .find(|fighter| fighter.cell() == cell && !fighter.is_dead() && !fighter.has_fled())
            .map(Fighter::id)
    }

    /// Walkable cell without a living fighter.
    pub fn is_free(&self, cell: CellId) -> bool {
        self.grid.is_walkable(cell) && self.fighter_at(cell).is_none()
    }

    /// Grid line of sight, also blocked by fighters standing in between.
    pub fn has_line_of_sight(&self, from: CellId, to: CellId) -> bool {
        self.grid.line_of_sight(from, to)
            && self
                .grid
                .cells_between(from, to)
                .into_iter()
                .all(|cell| self.fighter_at(cell).is_none())
    }

    /// Living invocations controlled by `invoker`.
    pub fn invocations_of(&self, invoker: FighterId) -> Vec<FighterId> {
        self.fighters
            .values()
            .filter(|fighter| fighter.kind().invoker() == Some(invoker) && !fighter.is_dead())
            .map(Fighter::id)
            .collect()
    }

    /// Adds a fighter to `team` on `cell`. Returns `None` for an unknown team.
    pub fn insert_fighter(
        &mut self,
        team: TeamId,
        cell: CellId,
        spec: FighterSpec,
    ) -> Option<FighterId> {
        let id = FighterId(self.next_fighter);
        let entry = self.teams.iter_mut().find(|entry| entry.id == team)?;
        entry.members.push(id);
        self.next_fighter += 1;
        self.fighters.insert(id, Fighter::new(id, team, cell, spec));
        self.emit(FightEvent::FighterJoined {
            fighter: id,
            team,
            cell,
        });
        Some(id)
    }

    /// Removes a fighter from the battle and its team.
    pub fn remove_fighter(&mut self, id: FighterId) -> Option<Fighter> {
        let fighter = self.fighters.remove(&id)?;
        for team in &mut self.teams {
            team.members.retain(|member| *member != id);
        }
        self.emit(FightEvent::FighterLeft { fighter: id });
        Some(fighter)
    }

    // ===== bookkeeping =====

    pub fn emit(&mut self, event: FightEvent) {
        self.events.push(event);
    }

    /// Buffered events, in emission order.
    pub fn events(&self) -> &[FightEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<FightEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn next_buff_id(&mut self) -> BuffId {
        let id = BuffId(self.next_buff);
        self.next_buff += 1;
        id
    }

    /// Invocations created since the last call, with their invoker.
    pub fn take_joined(&mut self) -> Vec<(FighterId, FighterId)> {
        std::mem::take(&mut self.joined)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::fighter::{AccountId, Characteristic};

    /// Two teams on a 10x10 open grid: fighter 1 in team 0 on cell 0, fighter 2
    /// in team 1 on cell 5.
    pub(crate) fn duel() -> (Battle, FighterId, FighterId) {
        let mut battle = Battle::new(Battlefield::open(10, 10));
        let red = battle.add_team(vec![CellId(0)]).unwrap();
        let blue = battle.add_team(vec![CellId(5)]).unwrap();
        let spec = |name: &str| {
            FighterSpec::player(AccountId(1), name, 100)
                .with_characteristic(Characteristic::ActionPoints, 6)
                .with_characteristic(Characteristic::MovementPoints, 3)
        };
        let first = battle.insert_fighter(red, CellId(0), spec("red")).unwrap();
        let second = battle.insert_fighter(blue, CellId(5), spec("blue")).unwrap();
        battle.drain_events();
        (battle, first, second)
    }

    #[test]
    fn fighter_at_ignores_the_dead() {
        let (mut battle, first, second) = duel();
        assert_eq!(battle.fighter_at(CellId(5)), Some(second));
        battle.kill(first, second);
        assert_eq!(battle.fighter_at(CellId(5)), None);
        assert!(battle.is_free(CellId(5)));
    }

    #[test]
    fn team_ids_run_out_past_the_last_u8() {
        let mut battle = Battle::new(Battlefield::open(2, 2));
        for expected in 0..=u8::MAX {
            assert_eq!(battle.add_team(Vec::new()), Some(TeamId(expected)));
        }
        assert_eq!(battle.add_team(Vec::new()), None);
        assert_eq!(battle.teams().len(), 256);
    }

    #[test]
    fn fighters_block_line_of_sight() {
        let (battle, _, _) = duel();
        assert!(!battle.has_line_of_sight(CellId(0), CellId(9)));
        assert!(battle.has_line_of_sight(CellId(0), CellId(4)));
    }

    #[test]
    fn team_elimination_ignores_invocations() {
        let (mut battle, first, second) = duel();
        let blue = battle.fighter(second).unwrap().team();
        let grade = crate::env::MonsterGrade {
            grade: 1,
            life: 10,
            initiative: 0,
            action_points: 3,
            movement_points: 2,
            characteristics: Vec::new(),
            spells: Vec::new(),
        };
        let spec = FighterSpec::invocation(second, crate::env::MonsterId(1), &grade);
        let invocation = battle.invoke(second, spec, CellId(6)).unwrap();
        assert_eq!(battle.take_joined(), vec![(second, invocation)]);

        battle.kill(first, second);
        assert!(!battle.team_alive(blue));
        assert!(battle.fighter(invocation).unwrap().is_dead());
        assert_eq!(battle.living_teams().len(), 1);
    }
}
