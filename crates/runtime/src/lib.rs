//! Runtime orchestration for tactical fights.
//!
//! Each fight is owned by one worker task that serializes every command,
//! arms the real-time timers (action display delay, turn timeout, placement
//! timeout) and plays AI-controlled fighters. Consumers create fights through
//! [`FightService`] and talk to them through cloneable [`FightHandle`]s.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the fight registry and its configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`oracle`] adapts loaded content to the core oracles
//! - `workers` keeps the per-fight tasks internal to the crate
pub mod api;
pub mod events;
pub mod oracle;
pub mod runtime;

mod workers;

pub use api::{FightHandle, Result, RuntimeError};
pub use events::{Event, EventBus, Topic};
pub use oracle::ContentOracles;
pub use runtime::{FightService, FightSetup, RuntimeConfig, TeamSetup};
