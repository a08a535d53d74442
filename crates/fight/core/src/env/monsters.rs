//! Static monster templates.

use core::fmt;

use crate::env::SpellRef;
use crate::fighter::Characteristic;

/// Identifier of a monster template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterId(pub u32);

impl fmt::Display for MonsterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "monster:{}", self.0)
    }
}

/// Base value of one characteristic in a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacteristicValue {
    pub characteristic: Characteristic,
    pub value: i32,
}

/// Combat statistics of one grade of a monster.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterGrade {
    pub grade: u8,
    pub life: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub initiative: i32,
    pub action_points: i32,
    pub movement_points: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub characteristics: Vec<CharacteristicValue>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spells: Vec<SpellRef>,
}

/// A monster template with its grades.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterTemplate {
    pub id: MonsterId,
    pub name: String,
    pub grades: Vec<MonsterGrade>,
}

impl MonsterTemplate {
    pub fn grade(&self, grade: u8) -> Option<&MonsterGrade> {
        self.grades.iter().find(|candidate| candidate.grade == grade)
    }
}

/// Read-only access to monster templates.
pub trait MonsterOracle: Send + Sync {
    fn monster(&self, monster: MonsterId, grade: u8) -> Option<&MonsterGrade>;
}
