//! Data-driven fight content.
//!
//! This crate turns static data files into the oracles consumed by
//! `fight-core`:
//! - spell definitions (RON) into a [`SpellBook`]
//! - monster templates (RON) into a [`MonsterCatalog`]
//! - fight tuning (TOML) into a `FightConfig`
//!
//! Content is validated when loaded, including references between spells and
//! monsters, and never changes afterwards.

pub mod catalog;
pub mod error;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{MonsterCatalog, SpellBook, validate_references};
pub use error::ContentError;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, Content, ContentFactory, MonsterLoader, SpellLoader};
