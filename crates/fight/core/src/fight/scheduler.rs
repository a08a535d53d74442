//! Turn and action scheduling of an active fight.
//!
//! At most one turn is active and at most one action is pending in it. The
//! display duration of a started action is not awaited here: the caller
//! receives [`ActionOutcome::Pending`] and must call
//! [`Fight::terminate_action`] once the delay has elapsed. Turn timeouts
//! work the same way through [`Fight::end_turn`], keyed by [`TurnId`] so a
//! late timer is a no-op.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::turn::PendingAction;
use super::{
    Action, ActionId, Applied, Fight, FightError, FightResults, FightState, FightTurn, TurnId,
};
use crate::effect::TurnStart;
use crate::env::FightEnv;
use crate::events::FightEvent;
use crate::fighter::{FighterId, TeamId};

/// What [`Fight::perform`] did with an accepted action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The result waits for `duration` before [`Fight::terminate_action`].
    Pending { id: ActionId, duration: Duration },
    /// The result was applied right away (failure or no display duration).
    Applied { id: ActionId, success: bool },
    /// The turn was passed.
    TurnPassed,
}

impl Fight {
    pub fn current_turn(&self) -> Option<&FightTurn> {
        self.current.as_ref()
    }

    /// The pending action of the current turn with its display duration.
    pub fn pending_action(&self) -> Option<(ActionId, Duration)> {
        let pending = self.current.as_ref()?.pending.as_ref()?;
        Some((pending.id, pending.duration))
    }

    /// Validates and starts `action` for the fighter whose turn it is.
    ///
    /// A busy turn rejects the action before validation, without side
    /// effects. A failed result is applied immediately; a successful one is
    /// kept pending until [`Fight::terminate_action`], unless it has no
    /// display duration.
    pub fn perform(
        &mut self,
        env: &FightEnv<'_>,
        action: Action,
    ) -> Result<ActionOutcome, FightError> {
        self.ensure_state(FightState::Active, "perform")?;
        let turn = self
            .current
            .as_ref()
            .ok_or(FightError::Inconsistent("active fight without a turn"))?;
        let turn_id = turn.id();
        if turn.fighter() != action.fighter() {
            return Err(FightError::NotYourTurn {
                fighter: action.fighter(),
            });
        }
        if turn.is_busy() {
            return Err(FightError::ActionInProgress { turn: turn_id });
        }

        if let Action::PassTurn { .. } = action {
            self.end_turn(env, turn_id)?;
            return Ok(ActionOutcome::TurnPassed);
        }

        action.validate(&self.battle, env)?;
        let result = action.start(env, &self.config)?;
        let id = self.next_action_id();
        let duration = result.duration();
        self.battle.emit(FightEvent::ActionStarted {
            turn: turn_id,
            id,
            action: action.clone(),
            success: result.is_success(),
            critical: result.is_critical(),
            duration_ms: duration.as_millis() as u64,
        });

        if !result.is_success() {
            debug!(target: "fight::turn", fight = %self.id, %id, "action failed");
            let applied = result.apply(&mut self.battle, env)?;
            self.after_action(applied);
            return Ok(ActionOutcome::Applied { id, success: false });
        }

        if let Some(turn) = self.current.as_mut() {
            turn.pending = Some(PendingAction {
                id,
                action,
                result,
                duration,
            });
        }
        if duration.is_zero() {
            self.terminate_action(env)?;
            return Ok(ActionOutcome::Applied { id, success: true });
        }
        Ok(ActionOutcome::Pending { id, duration })
    }

    /// Applies the pending result, if any. Returns whether one was applied.
    ///
    /// Idempotent: without a pending action, or once the fight is no longer
    /// active, nothing happens. Termination listeners fire even when the
    /// application fails; the error is then returned and the fight must be
    /// considered corrupted.
    pub fn terminate_action(&mut self, env: &FightEnv<'_>) -> Result<bool, FightError> {
        let active = self.state == FightState::Active;
        let Some(turn) = self.current.as_mut() else {
            return Ok(false);
        };
        let Some(pending) = turn.pending.take() else {
            return Ok(false);
        };
        let turn_id = turn.id();
        if !active {
            turn.fire_listeners();
            return Ok(false);
        }

        let applied = pending.result.apply(&mut self.battle, env);
        self.battle.emit(FightEvent::ActionTerminated {
            turn: turn_id,
            id: pending.id,
            fighter: pending.action.fighter(),
        });
        if let Some(turn) = self.current.as_mut() {
            turn.fire_listeners();
        }

        match applied {
            Ok(applied) => {
                self.after_action(applied);
                Ok(true)
            }
            Err(error) => {
                warn!(target: "fight::turn", fight = %self.id, id = %pending.id, %error, "action application failed");
                Err(error)
            }
        }
    }

    /// Registers a listener fired once the pending action is terminated, or
    /// right away when nothing is pending.
    pub fn on_action_terminated(&mut self, listener: Box<dyn FnOnce() + Send>) {
        match self.current.as_mut() {
            Some(turn) if turn.is_busy() => turn.listeners.push(listener),
            _ => listener(),
        }
    }

    /// Ends turn `turn` if it is still the current one.
    ///
    /// The pending action is terminated first. Returns false for a stale
    /// turn or an inactive fight, so timeout and explicit pass can race.
    pub fn end_turn(&mut self, env: &FightEnv<'_>, turn: TurnId) -> Result<bool, FightError> {
        if !self.is_current_turn(turn) {
            return Ok(false);
        }
        self.terminate_action(env)?;
        if self.is_current_turn(turn) {
            self.finish_turn();
        }
        Ok(true)
    }

    /// Passes the turn of `fighter`.
    pub fn pass_turn(&mut self, env: &FightEnv<'_>, fighter: FighterId) -> Result<(), FightError> {
        self.perform(env, Action::PassTurn { fighter }).map(|_| ())
    }

    fn is_current_turn(&self, turn: TurnId) -> bool {
        self.state == FightState::Active
            && self.current.as_ref().map(FightTurn::id) == Some(turn)
    }

    fn next_action_id(&mut self) -> ActionId {
        let id = ActionId(self.next_action);
        self.next_action += 1;
        id
    }

    fn after_action(&mut self, applied: Applied) {
        for (invoker, invocation) in self.battle.take_joined() {
            self.turns.insert_after(invoker, invocation);
        }
        if self.check_victory() {
            return;
        }
        let playing_gone = self.current.as_ref().is_none_or(|turn| {
            self.battle
                .fighter(turn.fighter())
                .is_none_or(|fighter| fighter.is_dead() || fighter.has_fled())
        });
        if applied.end_turn || playing_gone {
            self.finish_turn();
        }
    }

    /// Closes the current turn and starts the next one.
    fn finish_turn(&mut self) {
        let Some(mut turn) = self.current.take() else {
            return;
        };
        turn.fire_listeners();
        if let Some(fighter) = self.battle.fighter_mut(turn.fighter()) {
            fighter.end_turn();
        }
        self.battle.emit(FightEvent::TurnEnded {
            turn: turn.id(),
            fighter: turn.fighter(),
        });
        debug!(target: "fight::turn", fight = %self.id, turn = %turn.id(), fighter = %turn.fighter(), "turn ended");

        if self.check_victory() {
            return;
        }
        self.start_next_turn();
    }

    /// Starts the turn of the next living fighter.
    ///
    /// The turn-started event precedes the buff tick. A fighter killed by its
    /// buffs, or asked to skip, ends its turn right away.
    pub(super) fn start_next_turn(&mut self) {
        loop {
            let battle = &self.battle;
            let playable = |id: &FighterId| {
                battle
                    .fighter(*id)
                    .is_some_and(|fighter| !fighter.is_dead() && !fighter.has_fled())
            };
            if !self.turns.fighters().iter().any(playable) {
                self.finish(None);
                return;
            }
            let Some(fighter) = self.turns.advance() else {
                return;
            };
            if !playable(&fighter) {
                continue;
            }

            let id = TurnId(self.next_turn);
            self.next_turn += 1;
            if let Some(entry) = self.battle.fighter_mut(fighter) {
                entry.begin_turn();
            }
            self.current = Some(FightTurn::new(id, fighter));
            self.battle.emit(FightEvent::TurnStarted {
                turn: id,
                fighter,
                duration_ms: self.config.turn_duration_ms,
            });

            let outcome = self.battle.tick_buffs(fighter);
            if self.check_victory() {
                return;
            }
            let dead = self
                .battle
                .fighter(fighter)
                .is_none_or(|entry| entry.is_dead());
            if !dead && outcome == TurnStart::Continue {
                debug!(target: "fight::turn", fight = %self.id, turn = %id, %fighter, "turn started");
                return;
            }

            if !dead {
                self.battle.emit(FightEvent::TurnSkipped { turn: id, fighter });
            }
            self.current = None;
            if let Some(entry) = self.battle.fighter_mut(fighter) {
                entry.end_turn();
            }
            self.battle.emit(FightEvent::TurnEnded { turn: id, fighter });
        }
    }

    /// Ends the fight when at most one team is still standing. Returns true
    /// when the fight is over, whether it just ended or was already inactive.
    pub(super) fn check_victory(&mut self) -> bool {
        if self.state != FightState::Active {
            return true;
        }
        let living = self.battle.living_teams();
        if living.len() > 1 {
            return false;
        }
        self.finish(living.first().copied());
        true
    }

    fn finish(&mut self, winner: Option<TeamId>) {
        self.state = FightState::Ending;
        self.drop_current_turn();

        let results = FightResults::compute(&self.battle, winner, self.rewards.as_ref());
        info!(
            target: "fight::turn",
            fight = %self.id,
            winner = ?winner,
            "fight ended"
        );
        self.battle.emit(FightEvent::FightEnded {
            winner,
            results: results.clone(),
        });
        self.results = Some(results);
        self.state = FightState::Terminated;
    }

    /// Forgets the current turn and its pending action without applying it.
    pub(super) fn drop_current_turn(&mut self) {
        if let Some(mut turn) = self.current.take() {
            turn.pending = None;
            turn.fire_listeners();
            if let Some(fighter) = self.battle.fighter_mut(turn.fighter()) {
                fighter.end_turn();
            }
        }
    }
}
