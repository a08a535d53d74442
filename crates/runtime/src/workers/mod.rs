//! Internal worker implementations backing the runtime.
//!
//! One [`FightWorker`] task per fight. Workers are spawned by the service and
//! never exposed directly; clients go through `FightHandle`.

mod fight;

pub(crate) use fight::{Command, FightWorker};
