use std::time::Duration;

/// Fight configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FightConfig {
    /// Action points granted when a fighter template does not define any.
    pub default_action_points: i32,
    /// Movement points granted when a fighter template does not define any.
    pub default_movement_points: i32,
    /// Hard time budget of one turn, in milliseconds.
    pub turn_duration_ms: u64,
    /// Placement phase budget, in milliseconds. Only PvM fights use it.
    pub placement_duration_ms: u64,
    /// Animation delay of a spell cast before its result is applied.
    pub cast_duration_ms: u64,
    /// Animation delay per cell walked by a move action.
    pub move_step_duration_ms: u64,
    /// Maximum number of fighters one team accepts during setup.
    pub max_fighters_per_team: usize,
}

impl FightConfig {
    // ===== compile-time constants =====
    /// Maximum number of actions the AI performs in a single turn.
    pub const MAX_AI_ACTIONS_PER_TURN: usize = 16;
    /// Maximum percent resistance a fighter can reach.
    pub const MAX_PERCENT_RESISTANCE: i32 = 100;
    /// Invocations a fighter may control when no characteristic raises it.
    pub const BASE_SUMMON_LIMIT: i32 = 1;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ACTION_POINTS: i32 = 6;
    pub const DEFAULT_MOVEMENT_POINTS: i32 = 3;
    pub const DEFAULT_TURN_DURATION_MS: u64 = 30_000;
    pub const DEFAULT_PLACEMENT_DURATION_MS: u64 = 45_000;
    pub const DEFAULT_CAST_DURATION_MS: u64 = 500;
    pub const DEFAULT_MOVE_STEP_DURATION_MS: u64 = 300;
    pub const DEFAULT_MAX_FIGHTERS_PER_TEAM: usize = 8;

    pub fn new() -> Self {
        Self {
            default_action_points: Self::DEFAULT_ACTION_POINTS,
            default_movement_points: Self::DEFAULT_MOVEMENT_POINTS,
            turn_duration_ms: Self::DEFAULT_TURN_DURATION_MS,
            placement_duration_ms: Self::DEFAULT_PLACEMENT_DURATION_MS,
            cast_duration_ms: Self::DEFAULT_CAST_DURATION_MS,
            move_step_duration_ms: Self::DEFAULT_MOVE_STEP_DURATION_MS,
            max_fighters_per_team: Self::DEFAULT_MAX_FIGHTERS_PER_TEAM,
        }
    }

    /// Configuration without animation delays: every action resolves immediately.
    pub fn instant() -> Self {
        Self {
            cast_duration_ms: 0,
            move_step_duration_ms: 0,
            ..Self::new()
        }
    }

    pub fn turn_duration(&self) -> Duration {
        Duration::from_millis(self.turn_duration_ms)
    }

    pub fn placement_duration(&self) -> Duration {
        Duration::from_millis(self.placement_duration_ms)
    }

    pub fn cast_duration(&self) -> Duration {
        Duration::from_millis(self.cast_duration_ms)
    }

    /// Display duration of a walk over `steps` cells.
    pub fn move_duration(&self, steps: usize) -> Duration {
        Duration::from_millis(self.move_step_duration_ms.saturating_mul(steps as u64))
    }
}

impl Default for FightConfig {
    fn default() -> Self {
        Self::new()
    }
}
