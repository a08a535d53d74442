use super::Battle;
use crate::buff::{Buff, BuffId};
use crate::effect::{TurnStart, handler_for};
use crate::events::FightEvent;
use crate::fighter::FighterId;

impl Battle {
    /// Registers `buff` on its owner and runs the start hook.
    ///
    /// Buffs are not added on dead or missing owners.
    pub fn add_buff(&mut self, buff: Buff) {
        let Some(owner) = self.fighter_mut(buff.owner) else {
            return;
        };
        if owner.is_dead() {
            return;
        }
        owner.buffs_mut().push(buff.clone());
        self.emit(FightEvent::BuffApplied {
            buff: buff.id,
            owner: buff.owner,
            caster: buff.caster,
            kind: buff.effect.kind,
            value: buff.value,
            duration: buff.remaining_turns,
        });
        handler_for(buff.effect.kind).on_buff_started(self, &buff);
    }

    /// Turn start of `owner`: runs each buff hook, then decrements it and
    /// terminates it once expired.
    ///
    /// Buffs are visited in application order over a snapshot of the ids, so
    /// buffs added by a hook wait for the next turn. Returns
    /// [`TurnStart::SkipTurn`] if any hook asked to skip.
    pub fn tick_buffs(&mut self, owner: FighterId) -> TurnStart {
        let mut outcome = TurnStart::Continue;
        let Some(ids) = self.fighter(owner).map(|fighter| fighter.buffs().ids()) else {
            return outcome;
        };

        for id in ids {
            let Some(buff) = self.buff(owner, id) else {
                continue;
            };
            if handler_for(buff.effect.kind).on_start_turn(self, &buff) == TurnStart::SkipTurn {
                outcome = TurnStart::SkipTurn;
            }

            let expired = match self
                .fighter_mut(owner)
                .and_then(|fighter| fighter.buffs_mut().get_mut(id))
            {
                Some(buff) => buff.decrement(),
                None => continue,
            };
            if expired {
                self.terminate_buff(owner, id);
            }
            if self.fighter(owner).is_none_or(|fighter| fighter.is_dead()) {
                break;
            }
        }
        outcome
    }

    /// Removes every buff of `fighter` and terminates them in application order.
    pub fn dispel_buffs(&mut self, fighter: FighterId) {
        if self.fighter(fighter).is_none() {
            return;
        }
        self.emit(FightEvent::BuffsDispelled { fighter });
        self.clear_buffs(fighter);
    }

    pub(crate) fn clear_buffs(&mut self, fighter: FighterId) {
        let Some(entry) = self.fighter_mut(fighter) else {
            return;
        };
        let buffs = entry.buffs_mut().take_all();
        for buff in buffs {
            self.emit(FightEvent::BuffRemoved {
                buff: buff.id,
                owner: fighter,
            });
            handler_for(buff.effect.kind).on_buff_terminated(self, &buff);
        }
    }

    fn buff(&self, owner: FighterId, id: BuffId) -> Option<Buff> {
        self.fighter(owner)?.buffs().get(id).cloned()
    }

    fn terminate_buff(&mut self, owner: FighterId, id: BuffId) {
        let Some(buff) = self
            .fighter_mut(owner)
            .and_then(|fighter| fighter.buffs_mut().remove(id))
        else {
            return;
        };
        self.emit(FightEvent::BuffRemoved { buff: id, owner });
        handler_for(buff.effect.kind).on_buff_terminated(self, &buff);
    }
}
