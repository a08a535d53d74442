use super::Battle;
use crate::buff::BuffId;
use crate::events::FightEvent;
use crate::fighter::{FighterId, StateExpiry, StateId};

impl Battle {
    pub fn add_state(&mut self, fighter: FighterId, state: StateId, expiry: StateExpiry) {
        let Some(entry) = self.fighter_mut(fighter) else {
            return;
        };
        if entry.states_mut().add(state, expiry) {
            self.emit(FightEvent::StateAdded { fighter, state });
        }
    }

    pub fn remove_state(&mut self, fighter: FighterId, state: StateId) {
        let Some(entry) = self.fighter_mut(fighter) else {
            return;
        };
        if entry.states_mut().remove(state) {
            self.emit(FightEvent::StateRemoved { fighter, state });
        }
    }

    /// Removes `state` only while it is still bound to `buff`.
    pub fn remove_state_for_buff(&mut self, fighter: FighterId, state: StateId, buff: BuffId) {
        let Some(entry) = self.fighter_mut(fighter) else {
            return;
        };
        if entry.states_mut().remove_for_buff(state, buff) {
            self.emit(FightEvent::StateRemoved { fighter, state });
        }
    }

    pub fn set_hidden(&mut self, fighter: FighterId, hidden: bool) {
        let Some(entry) = self.fighter_mut(fighter) else {
            return;
        };
        if entry.is_hidden() != hidden {
            entry.set_hidden(hidden);
            self.emit(FightEvent::VisibilityChanged { fighter, hidden });
        }
    }

    /// Changes the turn points of a fighter currently playing.
    ///
    /// Returns the applied `(action, movement)` deltas; `(0, 0)` when the
    /// fighter is not playing.
    pub fn alter_turn_points(
        &mut self,
        fighter: FighterId,
        action_points: i32,
        movement_points: i32,
    ) -> (i32, i32) {
        let Some(points) = self
            .fighter_mut(fighter)
            .and_then(|entry| entry.turn_points_mut())
        else {
            return (0, 0);
        };
        let applied = (
            points.alter_action_points(action_points),
            points.alter_movement_points(movement_points),
        );
        if applied != (0, 0) {
            self.emit(FightEvent::PointsAltered {
                fighter,
                action_points: applied.0,
                movement_points: applied.1,
            });
        }
        applied
    }

    /// Consumes turn points for an action. Fails without change if the
    /// fighter is not playing or lacks points.
    pub fn use_turn_points(
        &mut self,
        fighter: FighterId,
        action_points: i32,
        movement_points: i32,
    ) -> bool {
        let Some(points) = self
            .fighter_mut(fighter)
            .and_then(|entry| entry.turn_points_mut())
        else {
            return false;
        };
        if points.action_points() < action_points || points.movement_points() < movement_points {
            return false;
        }
        points.use_action_points(action_points);
        points.use_movement_points(movement_points);
        self.emit(FightEvent::PointsUsed {
            fighter,
            action_points,
            movement_points,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::battle::tests::duel;
    use crate::events::FightEvent;

    #[test]
    fn turn_points_only_change_while_playing() {
        let (mut battle, first, _) = duel();
        assert_eq!(battle.alter_turn_points(first, -2, 0), (0, 0));

        battle.fighter_mut(first).unwrap().begin_turn();
        assert_eq!(battle.alter_turn_points(first, -8, 1), (-6, 1));
        assert!(!battle.use_turn_points(first, 1, 0));
        assert!(battle.use_turn_points(first, 0, 4));
        assert_eq!(
            battle.drain_events().last(),
            Some(&FightEvent::PointsUsed {
                fighter: first,
                action_points: 0,
                movement_points: 4
            })
        );
    }
}
