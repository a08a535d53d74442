//! Effect simulation pipeline.
//!
//! A cast resolves its effect list one effect at a time:
//! - [`targets`]: the effect area is oriented and clipped, then filtered by team
//!   relation and visibility
//! - [`handler`]: the handler bound to the effect kind applies it, either
//!   immediately or as a buff on each target
//! - [`formula`]: boost and resistance arithmetic shared by damage and heal
//!
//! The AI reuses the same pipeline on a cloned battle, see
//! [`crate::simulation`].
mod applier;
mod definition;
mod error;
pub mod formula;
pub mod handler;
mod handlers;
pub mod targets;

pub use applier::apply_effects;
pub use definition::{EffectKind, Element, SpellEffect, TargetFilter};
pub use error::{EffectError, EffectPhase};
pub use handler::{EffectHandler, EffectScope, TurnStart, handler_for};
pub use targets::resolve_targets;
