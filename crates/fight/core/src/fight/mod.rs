//! Fight state machine.
//!
//! A [`Fight`] goes through `Initializing → Placement → Active → Ending →
//! Terminated`, with `Cancelled` reachable from every non-terminal state.
//! - `Initializing`: teams and fighters are registered
//! - `Placement`: fighters pick a starting cell and declare themselves ready
//! - `Active`: the turn scheduler runs (see `scheduler`)
//! - `Ending`: results are computed and the end is announced
//!
//! Every mutation is synchronous; the runtime serializes calls, one fight per
//! worker, and drives the timers.
pub mod action;
mod error;
mod results;
mod scheduler;
mod snapshot;
mod turn;

use core::fmt;

use strum::Display;
use tracing::{debug, info};

pub use action::{Action, ActionId, ActionResult, Applied, CastAction, MoveAction};
pub use error::{FightError, ValidationError};
pub use results::{FightResults, FighterResult, NoReward, Outcome, Reward, RewardCalculator};
pub use scheduler::ActionOutcome;
pub use snapshot::{FightSnapshot, FighterSnapshot};
pub use turn::{
    AlternateTeamFighterOrder, FightTurn, FighterOrder, TerminationListener, TurnId, TurnList,
};

use crate::battle::Battle;
use crate::config::FightConfig;
use crate::env::FightEnv;
use crate::events::FightEvent;
use crate::fighter::{Characteristic, FighterId, FighterSpec, TeamId};
use crate::grid::{Battlefield, CellId};

/// Identifier of a fight, assigned by its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FightId(pub u64);

impl fmt::Display for FightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fight:{}", self.0)
    }
}

/// Kind of fight. Only PvM fights bound the placement phase with a timeout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FightType {
    #[default]
    Challenge,
    PvM,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FightState {
    Initializing,
    Placement,
    Active,
    Ending,
    Terminated,
    Cancelled,
}

impl FightState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated | Self::Cancelled)
    }
}

pub struct Fight {
    id: FightId,
    kind: FightType,
    state: FightState,
    config: FightConfig,
    battle: Battle,
    order: Box<dyn FighterOrder>,
    turns: TurnList,
    current: Option<FightTurn>,
    next_turn: u64,
    next_action: u64,
    rewards: Box<dyn RewardCalculator>,
    results: Option<FightResults>,
}

impl Fight {
    pub fn new(id: FightId, kind: FightType, config: FightConfig, grid: Battlefield) -> Self {
        Self {
            id,
            kind,
            state: FightState::Initializing,
            config,
            battle: Battle::new(grid),
            order: Box::new(AlternateTeamFighterOrder),
            turns: TurnList::default(),
            current: None,
            next_turn: 1,
            next_action: 1,
            rewards: Box::new(NoReward),
            results: None,
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: Box<dyn FighterOrder>) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn with_rewards(mut self, rewards: Box<dyn RewardCalculator>) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn id(&self) -> FightId {
        self.id
    }

    pub fn kind(&self) -> FightType {
        self.kind
    }

    pub fn state(&self) -> FightState {
        self.state
    }

    pub fn config(&self) -> &FightConfig {
        &self.config
    }

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    pub fn turns(&self) -> &TurnList {
        &self.turns
    }

    pub fn results(&self) -> Option<&FightResults> {
        self.results.as_ref()
    }

    /// Events emitted since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<FightEvent> {
        self.battle.drain_events()
    }

    fn ensure_state(&self, expected: FightState, operation: &'static str) -> Result<(), FightError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(FightError::illegal_state(self.state, operation))
        }
    }

    // ===== setup =====

    pub fn add_team(&mut self, places: Vec<CellId>) -> Result<TeamId, FightError> {
        self.ensure_state(FightState::Initializing, "add_team")?;
        Ok(self
            .battle
            .add_team(places)
            .ok_or(ValidationError::TooManyTeams)?)
    }

    /// Adds a fighter on the first free starting cell of its team.
    ///
    /// Action and movement points left at zero by the template fall back to
    /// the configured defaults.
    pub fn add_fighter(&mut self, team: TeamId, mut spec: FighterSpec) -> Result<FighterId, FightError> {
        if !matches!(self.state, FightState::Initializing | FightState::Placement) {
            return Err(FightError::illegal_state(self.state, "add_fighter"));
        }
        let entry = self
            .battle
            .team(team)
            .ok_or(ValidationError::UnknownTeam(team))?;
        if entry.members.len() >= self.config.max_fighters_per_team {
            return Err(ValidationError::TeamFull(team).into());
        }
        let cell = entry
            .places
            .iter()
            .copied()
            .find(|cell| self.battle.is_free(*cell))
            .ok_or(ValidationError::NoFreePlace(team))?;

        for (characteristic, default) in [
            (Characteristic::ActionPoints, self.config.default_action_points),
            (Characteristic::MovementPoints, self.config.default_movement_points),
        ] {
            if spec.characteristics.get(characteristic) == 0 {
                spec.characteristics.set(characteristic, default);
            }
        }

        let fighter = self
            .battle
            .insert_fighter(team, cell, spec)
            .ok_or(ValidationError::UnknownTeam(team))?;
        debug!(target: "fight::turn", fight = %self.id, %fighter, %team, %cell, "fighter added");
        Ok(fighter)
    }

    pub fn start_placement(&mut self) -> Result<(), FightError> {
        self.ensure_state(FightState::Initializing, "start_placement")?;
        if self.populated_teams() < 2 {
            return Err(ValidationError::NotEnoughTeams.into());
        }
        self.state = FightState::Placement;
        let timeout_ms = match self.kind {
            FightType::PvM => Some(self.config.placement_duration_ms),
            FightType::Challenge => None,
        };
        self.battle.emit(FightEvent::PlacementStarted { timeout_ms });
        Ok(())
    }

    pub fn change_place(&mut self, fighter: FighterId, cell: CellId) -> Result<(), FightError> {
        self.ensure_state(FightState::Placement, "change_place")?;
        let entry = self
            .battle
            .fighter(fighter)
            .ok_or(FightError::FighterNotFound(fighter))?;
        if entry.is_ready() {
            return Err(ValidationError::AlreadyReady(fighter).into());
        }
        let allowed = self
            .battle
            .team(entry.team())
            .is_some_and(|team| team.places.contains(&cell));
        if !allowed {
            return Err(ValidationError::InvalidPlace(cell).into());
        }
        if !self.battle.is_free(cell) {
            return Err(ValidationError::CellNotFree(cell).into());
        }

        if let Some(entry) = self.battle.fighter_mut(fighter) {
            entry.set_cell(cell);
        }
        self.battle.emit(FightEvent::FighterPlaced { fighter, cell });
        Ok(())
    }

    /// Returns true once every fighter is ready.
    pub fn set_ready(&mut self, fighter: FighterId, ready: bool) -> Result<bool, FightError> {
        self.ensure_state(FightState::Placement, "set_ready")?;
        let entry = self
            .battle
            .fighter_mut(fighter)
            .ok_or(FightError::FighterNotFound(fighter))?;
        entry.set_ready(ready);
        self.battle.emit(FightEvent::FighterReady { fighter, ready });
        Ok(self.all_ready())
    }

    pub fn all_ready(&self) -> bool {
        self.battle.fighters().all(|fighter| fighter.is_ready())
    }

    /// Leaves placement and starts the first turn.
    ///
    /// Without `force`, every fighter must be ready. The placement timeout
    /// forces the start.
    pub fn start_fight(&mut self, force: bool) -> Result<(), FightError> {
        self.ensure_state(FightState::Placement, "start_fight")?;
        if !force && !self.all_ready() {
            return Err(ValidationError::NotAllReady.into());
        }
        if self.populated_teams() < 2 {
            return Err(ValidationError::NotEnoughTeams.into());
        }

        let order = self.order.compute(&self.battle);
        info!(target: "fight::turn", fight = %self.id, fighters = order.len(), "fight started");
        self.turns = TurnList::new(order.clone());
        self.state = FightState::Active;
        self.battle.emit(FightEvent::FightStarted { order });
        self.start_next_turn();
        Ok(())
    }

    // ===== leaving and cancellation =====

    /// Removes a fighter before the fight starts, or flags it fled and kills
    /// it once active.
    pub fn leave(&mut self, env: &FightEnv<'_>, fighter: FighterId) -> Result<(), FightError> {
        match self.state {
            FightState::Initializing | FightState::Placement => {
                self.battle
                    .remove_fighter(fighter)
                    .ok_or(FightError::FighterNotFound(fighter))?;
                if self.state == FightState::Placement && self.populated_teams() < 2 {
                    self.cancel();
                }
                Ok(())
            }
            FightState::Active => {
                let entry = self
                    .battle
                    .fighter_mut(fighter)
                    .ok_or(FightError::FighterNotFound(fighter))?;
                if entry.has_fled() {
                    return Ok(());
                }
                entry.set_fled();
                self.battle.kill(fighter, fighter);
                info!(target: "fight::turn", fight = %self.id, %fighter, "fighter fled");

                match self.current.as_ref().map(|turn| (turn.id(), turn.fighter())) {
                    Some((turn, playing)) if playing == fighter => {
                        self.end_turn(env, turn)?;
                    }
                    _ => {
                        self.check_victory();
                    }
                }
                Ok(())
            }
            state => Err(FightError::illegal_state(state, "leave")),
        }
    }

    /// Cancels the fight without computing results.
    ///
    /// Returns false if the fight was already over. The pending action, if
    /// any, is dropped and its listeners fire.
    pub fn cancel(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.drop_current_turn();
        self.state = FightState::Cancelled;
        self.battle.emit(FightEvent::FightCancelled);
        info!(target: "fight::turn", fight = %self.id, "fight cancelled");
        true
    }

    fn populated_teams(&self) -> usize {
        self.battle
            .teams()
            .iter()
            .filter(|team| !team.members.is_empty())
            .count()
    }
}

impl fmt::Debug for Fight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fight")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("turn", &self.current)
            .finish_non_exhaustive()
    }
}
