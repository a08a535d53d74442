//! Deterministic combat rules of the tactical fight engine.
//!
//! `fight-core` is synchronous and free of I/O. It defines the battlefield,
//! the fighters, the effect pipeline, the buffs and the fight state machine
//! with its turn scheduler. Real time (action delays, turn timeouts) is
//! driven from outside through explicit calls, see [`fight::Fight`].
//!
//! Static content (spells, monsters) and randomness are injected through the
//! oracles of [`env::Env`].
pub mod battle;
pub mod buff;
pub mod config;
pub mod effect;
pub mod env;
pub mod error;
pub mod events;
pub mod fight;
pub mod fighter;
pub mod grid;
pub mod simulation;

pub use battle::{Battle, Damage, Team};
pub use buff::{Buff, BuffId, BuffList};
pub use config::FightConfig;
pub use effect::{
    EffectError, EffectHandler, EffectKind, EffectPhase, Element, SpellEffect, TargetFilter,
    TurnStart, apply_effects,
};
pub use env::{
    CharacteristicValue, Env, FightEnv, MonsterGrade, MonsterId, MonsterOracle, MonsterTemplate,
    OracleError, PcgRng, RngOracle, Spell, SpellId, SpellLevel, SpellOracle, SpellRef,
};
pub use error::{CombatError, ErrorSeverity};
pub use events::{EventFamily, FightEvent};
pub use fight::{
    Action, ActionId, ActionOutcome, ActionResult, AlternateTeamFighterOrder, CastAction, Fight,
    FightError, FightId, FightResults, FightSnapshot, FightState, FightTurn, FightType,
    FighterOrder, FighterResult, FighterSnapshot, MoveAction, NoReward, Outcome, Reward,
    RewardCalculator, TurnId, ValidationError,
};
pub use fighter::{
    AccountId, Characteristic, Characteristics, Fighter, FighterId, FighterKind, FighterSpec,
    Life, Modifier, StateExpiry, StateId, TeamId, TurnPoints,
};
pub use grid::{Area, AreaShape, Battlefield, CellFlags, CellId, Direction, GridOracle};
pub use simulation::{CastSimulation, ExpectedRng, simulate_cast};
