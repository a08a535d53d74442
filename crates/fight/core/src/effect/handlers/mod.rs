//! One handler per effect kind.
mod characteristics;
mod control;
mod damage;
mod heal;
mod movement;
mod protection;
mod states;
mod summon;

pub use characteristics::{
    AddCharacteristicHandler, PercentCharacteristicHandler, RemoveCharacteristicHandler,
    StealPointsHandler,
};
pub use control::{DispelHandler, SkipNextTurnHandler};
pub use damage::{DamageHandler, PercentLifeLostDamageHandler, StealLifeHandler};
pub use heal::HealHandler;
pub use movement::{PushBackHandler, SwitchPositionHandler, TeleportHandler};
pub use protection::{ReduceDamageHandler, ReflectDamageHandler, SacrificeHandler};
pub use states::{AddStateHandler, InvisibilityHandler, RemoveStateHandler, RevealHandler};
pub use summon::SummonHandler;
