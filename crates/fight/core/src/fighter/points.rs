/// Action and movement points left in the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnPoints {
    action_points: i32,
    movement_points: i32,
}

impl TurnPoints {
    pub fn new(action_points: i32, movement_points: i32) -> Self {
        Self {
            action_points: action_points.max(0),
            movement_points: movement_points.max(0),
        }
    }

    pub fn action_points(&self) -> i32 {
        self.action_points
    }

    pub fn movement_points(&self) -> i32 {
        self.movement_points
    }

    /// Spends action points. Returns false without change if not enough remain.
    pub fn use_action_points(&mut self, amount: i32) -> bool {
        if amount > self.action_points {
            return false;
        }
        self.action_points -= amount.max(0);
        true
    }

    /// Spends movement points. Returns false without change if not enough remain.
    pub fn use_movement_points(&mut self, amount: i32) -> bool {
        if amount > self.movement_points {
            return false;
        }
        self.movement_points -= amount.max(0);
        true
    }

    /// Returns the applied change; points never go below zero.
    pub fn alter_action_points(&mut self, delta: i32) -> i32 {
        let previous = self.action_points;
        self.action_points = previous.saturating_add(delta).max(0);
        self.action_points - previous
    }

    /// Returns the applied change; points never go below zero.
    pub fn alter_movement_points(&mut self, delta: i32) -> i32 {
        let previous = self.movement_points;
        self.movement_points = previous.saturating_add(delta).max(0);
        self.movement_points - previous
    }
}
