//! Buffs: timed effect instances attached to a fighter.
//!
//! The [`BuffList`] only stores buffs in application order. Hooks (start,
//! turn start, terminate, direct damage) are run by the battle through the
//! effect handler of each buff, see [`crate::battle::Battle::add_buff`] and
//! [`crate::battle::Battle::tick_buffs`].

use core::fmt;

use crate::effect::{EffectKind, SpellEffect};
use crate::env::SpellId;
use crate::fighter::{Characteristic, FighterId, Modifier};

/// Identifier of a buff, unique inside one fight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffId(pub u64);

impl fmt::Display for BuffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buff:{}", self.0)
    }
}

/// A registered, timed instance of an effect.
///
/// The caster is a weak reference: it may die or leave the fight without
/// invalidating the buff.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buff {
    pub id: BuffId,
    pub effect: SpellEffect,
    /// Value rolled once when the buff was created.
    pub value: i32,
    pub spell: Option<SpellId>,
    pub caster: FighterId,
    pub owner: FighterId,
    pub remaining_turns: u16,
}

impl Buff {
    pub fn new(
        id: BuffId,
        effect: SpellEffect,
        value: i32,
        spell: Option<SpellId>,
        caster: FighterId,
        owner: FighterId,
    ) -> Self {
        let remaining_turns = effect.duration;
        Self {
            id,
            effect,
            value,
            spell,
            caster,
            owner,
            remaining_turns,
        }
    }

    /// Characteristic modifier contributed while this buff is active.
    pub fn characteristic_modifier(&self) -> Option<(Characteristic, Modifier)> {
        match self.effect.kind {
            EffectKind::AddCharacteristic(characteristic) => {
                Some((characteristic, Modifier::Flat(self.value)))
            }
            EffectKind::RemoveCharacteristic(characteristic) => {
                Some((characteristic, Modifier::Flat(-self.value)))
            }
            EffectKind::AddPercentCharacteristic(characteristic) => {
                Some((characteristic, Modifier::Percent(self.value)))
            }
            _ => None,
        }
    }

    /// Decrements the remaining turns. Returns true once the buff has expired.
    pub fn decrement(&mut self) -> bool {
        self.remaining_turns = self.remaining_turns.saturating_sub(1);
        self.remaining_turns == 0
    }
}

/// Ordered collection of buffs; insertion order is application order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuffList {
    buffs: Vec<Buff>,
}

impl BuffList {
    pub fn push(&mut self, buff: Buff) {
        self.buffs.push(buff);
    }

    pub fn remove(&mut self, id: BuffId) -> Option<Buff> {
        let index = self.buffs.iter().position(|buff| buff.id == id)?;
        Some(self.buffs.remove(index))
    }

    pub fn get(&self, id: BuffId) -> Option<&Buff> {
        self.buffs.iter().find(|buff| buff.id == id)
    }

    pub fn get_mut(&mut self, id: BuffId) -> Option<&mut Buff> {
        self.buffs.iter_mut().find(|buff| buff.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Buff> {
        self.buffs.iter()
    }

    /// Snapshot of the ids, for iterating while hooks mutate the list.
    pub fn ids(&self) -> Vec<BuffId> {
        self.buffs.iter().map(|buff| buff.id).collect()
    }

    pub fn len(&self) -> usize {
        self.buffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }

    /// Removes every buff, returning them in application order.
    pub fn take_all(&mut self) -> Vec<Buff> {
        core::mem::take(&mut self.buffs)
    }

    pub fn modifiers(&self) -> impl Iterator<Item = (Characteristic, Modifier)> + '_ {
        self.buffs.iter().filter_map(Buff::characteristic_modifier)
    }
}
