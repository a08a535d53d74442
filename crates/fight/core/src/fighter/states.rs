use core::fmt;
use std::collections::BTreeMap;

use crate::buff::BuffId;

/// Identifier of a combat state (e.g. rooted, drunk, gravity).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateId(pub u16);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state:{}", self.0)
    }
}

/// How long an active state lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateExpiry {
    /// Until explicitly removed or the fight ends.
    Never,
    /// Until the given buff terminates.
    WithBuff(BuffId),
}

/// Set of active states on a fighter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FighterStates {
    active: BTreeMap<StateId, StateExpiry>,
}

impl FighterStates {
    pub fn has(&self, state: StateId) -> bool {
        self.active.contains_key(&state)
    }

    /// Returns true if the state was not active before.
    pub fn add(&mut self, state: StateId, expiry: StateExpiry) -> bool {
        self.active.insert(state, expiry).is_none()
    }

    pub fn remove(&mut self, state: StateId) -> bool {
        self.active.remove(&state).is_some()
    }

    /// Removes `state` only if it is still bound to `buff`.
    pub fn remove_for_buff(&mut self, state: StateId, buff: BuffId) -> bool {
        if self.active.get(&state) == Some(&StateExpiry::WithBuff(buff)) {
            self.active.remove(&state);
            return true;
        }
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, StateExpiry)> + '_ {
        self.active.iter().map(|(state, expiry)| (*state, *expiry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buff_bound_state_is_only_removed_by_its_buff() {
        let mut states = FighterStates::default();
        assert!(states.add(StateId(3), StateExpiry::WithBuff(BuffId(1))));
        assert!(!states.remove_for_buff(StateId(3), BuffId(2)));
        assert!(states.has(StateId(3)));
        assert!(states.remove_for_buff(StateId(3), BuffId(1)));
        assert!(!states.has(StateId(3)));
    }
}
