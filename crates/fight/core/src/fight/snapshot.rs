//! Read-only views of a fight, for clients and tests.

use super::{Fight, FightId, FightState, FightType, TurnId};
use crate::fighter::{Fighter, FighterId, Life, StateId, TeamId};
use crate::grid::CellId;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FighterSnapshot {
    pub id: FighterId,
    pub team: TeamId,
    pub cell: CellId,
    pub life: Life,
    pub action_points: Option<i32>,
    pub movement_points: Option<i32>,
    pub buffs: usize,
    pub states: Vec<StateId>,
    pub hidden: bool,
    pub fled: bool,
    pub ai_controlled: bool,
}

impl From<&Fighter> for FighterSnapshot {
    fn from(fighter: &Fighter) -> Self {
        Self {
            id: fighter.id(),
            team: fighter.team(),
            cell: fighter.cell(),
            life: *fighter.life(),
            action_points: fighter.turn_points().map(|points| points.action_points()),
            movement_points: fighter.turn_points().map(|points| points.movement_points()),
            buffs: fighter.buffs().len(),
            states: fighter.states().iter().map(|(state, _)| state).collect(),
            hidden: fighter.is_hidden(),
            fled: fighter.has_fled(),
            ai_controlled: fighter.kind().is_ai_controlled(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FightSnapshot {
    pub id: FightId,
    pub kind: FightType,
    pub state: FightState,
    pub turn: Option<(TurnId, FighterId)>,
    pub busy: bool,
    pub fighters: Vec<FighterSnapshot>,
}

impl Fight {
    pub fn snapshot(&self) -> FightSnapshot {
        FightSnapshot {
            id: self.id,
            kind: self.kind,
            state: self.state,
            turn: self
                .current
                .as_ref()
                .map(|turn| (turn.id(), turn.fighter())),
            busy: self.current.as_ref().is_some_and(|turn| turn.is_busy()),
            fighters: self.battle.fighters().map(FighterSnapshot::from).collect(),
        }
    }
}
