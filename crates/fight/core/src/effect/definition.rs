//! Immutable effect templates.

use strum::Display;

use crate::fighter::{Characteristic, StateId};
use crate::grid::Area;

/// Damage element. Each element is boosted by one characteristic and resisted
/// by a dedicated flat and percent resistance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    #[default]
    Neutral,
    Earth,
    Fire,
    Water,
    Air,
}

impl Element {
    pub const fn boost_characteristic(self) -> Characteristic {
        match self {
            Self::Neutral | Self::Earth => Characteristic::Strength,
            Self::Fire => Characteristic::Intelligence,
            Self::Water => Characteristic::Luck,
            Self::Air => Characteristic::Agility,
        }
    }

    pub const fn resistance(self) -> Characteristic {
        match self {
            Self::Neutral => Characteristic::ResistanceNeutral,
            Self::Earth => Characteristic::ResistanceEarth,
            Self::Fire => Characteristic::ResistanceFire,
            Self::Water => Characteristic::ResistanceWater,
            Self::Air => Characteristic::ResistanceAir,
        }
    }

    pub const fn percent_resistance(self) -> Characteristic {
        match self {
            Self::Neutral => Characteristic::PercentResistanceNeutral,
            Self::Earth => Characteristic::PercentResistanceEarth,
            Self::Fire => Characteristic::PercentResistanceFire,
            Self::Water => Characteristic::PercentResistanceWater,
            Self::Air => Characteristic::PercentResistanceAir,
        }
    }
}

/// Which fighters inside the area an effect applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetFilter {
    /// Every fighter in the area.
    #[default]
    All,
    /// Fighters of the caster team, caster included.
    Allies,
    /// Fighters of any other team.
    Enemies,
    /// The caster, only if it stands in the area.
    SelfOnly,
    /// The caster, wherever the area is.
    CasterOnly,
}

/// Closed set of effect kinds. Each kind maps to exactly one handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// Direct damage; as a buff, damage on each owner turn start.
    Damage(Element),
    /// Direct damage, half of it healed back to the caster.
    StealLife(Element),
    /// Damage equal to a percentage of the life the caster has lost.
    PercentLifeLostDamage(Element),
    /// Heal; as a buff, heal on each owner turn start.
    Heal,
    AddCharacteristic(Characteristic),
    RemoveCharacteristic(Characteristic),
    AddPercentCharacteristic(Characteristic),
    StealActionPoints,
    StealMovementPoints,
    /// `special` holds the state id.
    AddState,
    /// `special` holds the state id.
    RemoveState,
    Invisibility,
    Reveal,
    Teleport,
    SwitchPosition,
    /// Pushes targets away from the caster by the rolled number of cells.
    PushBack,
    SkipNextTurn,
    ReflectDamage,
    /// Armor: flat reduction of direct damage.
    ReduceDamage,
    /// Damage taken by the owner is redirected to the buff caster.
    Sacrifice,
    Dispel,
    /// `special` holds the monster id, `min` the grade.
    Summon,
}

impl EffectKind {
    /// Element of damage-kind effects; neutral for everything else.
    pub const fn element(&self) -> Element {
        match self {
            Self::Damage(element)
            | Self::StealLife(element)
            | Self::PercentLifeLostDamage(element) => *element,
            _ => Element::Neutral,
        }
    }

    /// Effects that can see hidden fighters.
    pub const fn reveals(&self) -> bool {
        matches!(self, Self::Reveal)
    }
}

/// Immutable effect template attached to a spell level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellEffect {
    pub kind: EffectKind,
    pub min: i32,
    /// Upper bound of the roll; `0` (or anything at or below `min`) means fixed `min`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub area: Area,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: TargetFilter,
    /// Number of owner turns the buff lasts; `0` applies the effect immediately.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: u16,
    /// Whether caster characteristics boost the rolled value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub boostable: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub special: i32,
}

impl SpellEffect {
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            min: 0,
            max: 0,
            area: Area::CELL,
            target: TargetFilter::All,
            duration: 0,
            boostable: false,
            special: 0,
        }
    }

    #[must_use]
    pub fn with_value(mut self, min: i32, max: i32) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    #[must_use]
    pub fn with_area(mut self, area: Area) -> Self {
        self.area = area;
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: TargetFilter) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: u16) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn boostable(mut self) -> Self {
        self.boostable = true;
        self
    }

    #[must_use]
    pub fn with_special(mut self, special: i32) -> Self {
        self.special = special;
        self
    }

    /// Buff effects register on the target instead of resolving immediately.
    pub fn is_buff(&self) -> bool {
        self.duration > 0
    }

    /// True when the roll is fixed to `min`.
    pub fn is_fixed(&self) -> bool {
        self.max <= self.min
    }

    /// Arithmetic mean of the roll bounds.
    pub fn mean(&self) -> i32 {
        if self.is_fixed() {
            self.min
        } else {
            (self.min + self.max) / 2
        }
    }

    /// `special` read as a state id.
    pub fn state(&self) -> StateId {
        StateId(u16::try_from(self.special).unwrap_or_default())
    }
}
