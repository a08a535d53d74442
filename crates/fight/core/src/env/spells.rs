//! Static spell definitions.

use core::fmt;

use crate::effect::SpellEffect;
use crate::fighter::StateId;

/// Identifier of a spell template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellId(pub u32);

impl fmt::Display for SpellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spell:{}", self.0)
    }
}

/// A spell known by a fighter, at a given level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellRef {
    pub spell: SpellId,
    pub level: u8,
}

impl SpellRef {
    pub const fn new(spell: SpellId, level: u8) -> Self {
        Self { spell, level }
    }
}

/// One level of a spell: cast constraints and the effects it applies.
///
/// Immutable once loaded. Casts keep their own copy so a pending result
/// never borrows from the oracle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellLevel {
    pub spell: SpellId,
    pub level: u8,
    pub action_point_cost: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_range: u32,
    pub max_range: u32,
    /// The range characteristic of the caster extends `max_range`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiable_range: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub line_of_sight: bool,
    /// The target cell must be walkable and unoccupied.
    #[cfg_attr(feature = "serde", serde(default))]
    pub free_cell: bool,
    /// Percent chance to use `critical_effects` instead of `effects`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub critical_hit_chance: i32,
    /// Percent chance for the cast to fail; only the AP cost is paid.
    #[cfg_attr(feature = "serde", serde(default))]
    pub critical_failure_chance: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ends_turn_on_failure: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub required_states: Vec<StateId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub forbidden_states: Vec<StateId>,
    pub effects: Vec<SpellEffect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub critical_effects: Vec<SpellEffect>,
}

impl SpellLevel {
    pub fn reference(&self) -> SpellRef {
        SpellRef::new(self.spell, self.level)
    }

    /// Effects applied by a cast, falling back to the normal list when the
    /// level defines no critical variant.
    pub fn effects_for(&self, critical: bool) -> &[SpellEffect] {
        if critical && !self.critical_effects.is_empty() {
            &self.critical_effects
        } else {
            &self.effects
        }
    }
}

/// A spell template with all its levels.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spell {
    pub id: SpellId,
    pub name: String,
    pub levels: Vec<SpellLevel>,
}

impl Spell {
    pub fn level(&self, level: u8) -> Option<&SpellLevel> {
        self.levels.iter().find(|candidate| candidate.level == level)
    }
}

/// Read-only access to spell definitions.
pub trait SpellOracle: Send + Sync {
    /// Definition of `spell` at `level`, if loaded.
    fn spell(&self, spell: SpellId, level: u8) -> Option<&SpellLevel>;
}
