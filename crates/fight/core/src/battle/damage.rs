use super::Battle;
use crate::buff::Buff;
use crate::effect::formula::resisted_damage;
use crate::effect::{Element, handler_for};
use crate::events::FightEvent;
use crate::fighter::FighterId;

/// Direct damage being applied, exposed to the buff hooks of the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Damage {
    pub source: FighterId,
    pub target: FighterId,
    pub element: Element,
    /// Damage left after resistances and reductions.
    pub value: i32,
    /// Total removed by armor buffs.
    pub reduced: i32,
    /// Total reflect value of the target buffs.
    pub reflect: i32,
    /// Fighter taking the damage in place of the target.
    pub redirect: Option<FighterId>,
}

impl Damage {
    pub fn new(source: FighterId, target: FighterId, element: Element, value: i32) -> Self {
        Self {
            source,
            target,
            element,
            value,
            reduced: 0,
            reflect: 0,
            redirect: None,
        }
    }
}

impl Battle {
    /// Applies direct damage from a cast and returns the life removed from `target`.
    ///
    /// Order: target resistances, target buff hooks (armor, reflect,
    /// sacrifice), then the life change. A sacrifice moves the protector in
    /// place of the target and the damage is resolved once more against the
    /// protector, without further redirection. Reflected damage hits the
    /// source as plain life loss and is never reflected back.
    pub fn apply_direct_damage(
        &mut self,
        source: FighterId,
        target: FighterId,
        element: Element,
        value: i32,
    ) -> i32 {
        self.direct_damage(source, target, element, value, true)
    }

    fn direct_damage(
        &mut self,
        source: FighterId,
        target: FighterId,
        element: Element,
        value: i32,
        allow_redirect: bool,
    ) -> i32 {
        let Some(fighter) = self.fighter(target) else {
            return 0;
        };
        if fighter.is_dead() {
            return 0;
        }
        let resisted = resisted_damage(value, fighter.characteristics(), element);
        let buffs: Vec<Buff> = fighter.buffs().iter().cloned().collect();

        let mut damage = Damage::new(source, target, element, resisted);
        for buff in &buffs {
            handler_for(buff.effect.kind).on_direct_damage(self, buff, &mut damage);
        }

        if allow_redirect && let Some(protector) = damage.redirect {
            self.switch_positions(target, protector);
            return self.direct_damage(source, protector, element, value, false);
        }

        if damage.reduced > 0 {
            self.emit(FightEvent::DamageReduced {
                fighter: target,
                amount: damage.reduced,
            });
        }

        let reflected = if damage.reflect > 0 && source != target {
            damage.reflect.min(damage.value / 2)
        } else {
            0
        };

        let dealt = -self.alter_life(source, target, -(damage.value - reflected));
        if reflected > 0 {
            self.emit(FightEvent::DamageReflected {
                fighter: target,
                target: source,
                amount: reflected,
            });
            self.alter_life(target, source, -reflected);
        }
        dealt
    }

    /// Damage from a buff tick: resistances apply, damage hooks do not.
    pub fn apply_indirect_damage(
        &mut self,
        source: FighterId,
        target: FighterId,
        element: Element,
        value: i32,
    ) -> i32 {
        let Some(fighter) = self.fighter(target) else {
            return 0;
        };
        let resisted = resisted_damage(value, fighter.characteristics(), element);
        -self.alter_life(source, target, -resisted)
    }

    /// Heals `target` and returns the life restored.
    pub fn heal(&mut self, source: FighterId, target: FighterId, value: i32) -> i32 {
        if value <= 0 {
            return 0;
        }
        self.alter_life(source, target, value)
    }
}
