//! Notifications emitted by a fight.
//!
//! Events are buffered by the battle in emission order and drained by the
//! owner of the fight (the runtime worker publishes them on its bus). They
//! are grouped in three families:
//! - lifecycle: setup, placement, start, end and turn boundaries
//! - action: start and termination of the pending action
//! - mutation: every change made to a fighter
use crate::buff::BuffId;
use crate::effect::EffectKind;
use crate::env::SpellRef;
use crate::fight::{Action, ActionId, FightResults, TurnId};
use crate::fighter::{FighterId, StateId, TeamId};
use crate::grid::CellId;

/// Event family, used by subscribers to filter the stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventFamily {
    Lifecycle,
    Turn,
    Action,
    Mutation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FightEvent {
    // ===== lifecycle =====
    FighterJoined {
        fighter: FighterId,
        team: TeamId,
        cell: CellId,
    },
    FighterLeft {
        fighter: FighterId,
    },
    PlacementStarted {
        timeout_ms: Option<u64>,
    },
    FighterPlaced {
        fighter: FighterId,
        cell: CellId,
    },
    FighterReady {
        fighter: FighterId,
        ready: bool,
    },
    FightStarted {
        order: Vec<FighterId>,
    },
    FightEnded {
        winner: Option<TeamId>,
        results: FightResults,
    },
    FightCancelled,

    // ===== turn =====
    TurnStarted {
        turn: TurnId,
        fighter: FighterId,
        duration_ms: u64,
    },
    TurnSkipped {
        turn: TurnId,
        fighter: FighterId,
    },
    TurnEnded {
        turn: TurnId,
        fighter: FighterId,
    },

    // ===== action =====
    ActionStarted {
        turn: TurnId,
        id: ActionId,
        action: Action,
        success: bool,
        critical: bool,
        duration_ms: u64,
    },
    ActionTerminated {
        turn: TurnId,
        id: ActionId,
        fighter: FighterId,
    },

    // ===== mutation =====
    LifeAltered {
        source: FighterId,
        target: FighterId,
        delta: i32,
    },
    MaxLifeAltered {
        fighter: FighterId,
        delta: i32,
    },
    PointsUsed {
        fighter: FighterId,
        action_points: i32,
        movement_points: i32,
    },
    PointsAltered {
        fighter: FighterId,
        action_points: i32,
        movement_points: i32,
    },
    BuffApplied {
        buff: BuffId,
        owner: FighterId,
        caster: FighterId,
        kind: EffectKind,
        value: i32,
        duration: u16,
    },
    BuffRemoved {
        buff: BuffId,
        owner: FighterId,
    },
    BuffsDispelled {
        fighter: FighterId,
    },
    StateAdded {
        fighter: FighterId,
        state: StateId,
    },
    StateRemoved {
        fighter: FighterId,
        state: StateId,
    },
    VisibilityChanged {
        fighter: FighterId,
        hidden: bool,
    },
    DamageReduced {
        fighter: FighterId,
        amount: i32,
    },
    DamageReflected {
        fighter: FighterId,
        target: FighterId,
        amount: i32,
    },
    CriticalHit {
        fighter: FighterId,
        spell: SpellRef,
    },
    FighterDied {
        killer: FighterId,
        victim: FighterId,
    },
    FighterMoved {
        fighter: FighterId,
        path: Vec<CellId>,
    },
    FighterTeleported {
        fighter: FighterId,
        cell: CellId,
    },
    FighterSlid {
        fighter: FighterId,
        cell: CellId,
    },
    PositionsSwitched {
        first: FighterId,
        second: FighterId,
    },
    FighterInvoked {
        invoker: FighterId,
        fighter: FighterId,
        cell: CellId,
    },
}

impl FightEvent {
    pub fn family(&self) -> EventFamily {
        match self {
            Self::FighterJoined { .. }
            | Self::FighterLeft { .. }
            | Self::PlacementStarted { .. }
            | Self::FighterPlaced { .. }
            | Self::FighterReady { .. }
            | Self::FightStarted { .. }
            | Self::FightEnded { .. }
            | Self::FightCancelled => EventFamily::Lifecycle,
            Self::TurnStarted { .. } | Self::TurnSkipped { .. } | Self::TurnEnded { .. } => {
                EventFamily::Turn
            }
            Self::ActionStarted { .. } | Self::ActionTerminated { .. } => EventFamily::Action,
            _ => EventFamily::Mutation,
        }
    }

    /// True for the events closing a fight.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::FightEnded { .. } | Self::FightCancelled)
    }
}
