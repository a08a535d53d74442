use tracing::debug;

use super::Battle;
use crate::events::FightEvent;
use crate::fighter::FighterId;

impl Battle {
    /// Changes the life of `target` and returns the change actually applied.
    ///
    /// Emits one `LifeAltered` event when the life changed, then handles the
    /// death of the target if it reached zero.
    pub fn alter_life(&mut self, source: FighterId, target: FighterId, delta: i32) -> i32 {
        let Some(fighter) = self.fighter_mut(target) else {
            return 0;
        };
        let applied = fighter.life_mut().alter(delta);
        let died = fighter.is_dead();
        if applied != 0 {
            self.emit(FightEvent::LifeAltered {
                source,
                target,
                delta: applied,
            });
        }
        if applied != 0 && died {
            self.on_death(source, target);
        }
        applied
    }

    /// Raises or lowers the max life of `fighter`; a fighter brought to zero dies.
    pub fn alter_max_life(&mut self, fighter: FighterId, delta: i32) -> i32 {
        let Some(entry) = self.fighter_mut(fighter) else {
            return 0;
        };
        let was_dead = entry.is_dead();
        let applied = entry.life_mut().alter_max(delta);
        let died = !was_dead && entry.is_dead();
        if applied != 0 {
            self.emit(FightEvent::MaxLifeAltered {
                fighter,
                delta: applied,
            });
        }
        if died {
            self.on_death(fighter, fighter);
        }
        applied
    }

    /// Kills `victim` outright.
    pub fn kill(&mut self, killer: FighterId, victim: FighterId) {
        let Some(current) = self.fighter(victim).map(|fighter| fighter.life().current()) else {
            return;
        };
        if current > 0 {
            self.alter_life(killer, victim, -current);
        }
    }

    /// Death handling: the victim loses its buffs, then its invocations die.
    fn on_death(&mut self, killer: FighterId, victim: FighterId) {
        debug!(target: "fight::effects", %killer, %victim, "fighter died");
        self.emit(FightEvent::FighterDied { killer, victim });
        self.clear_buffs(victim);
        for invocation in self.invocations_of(victim) {
            self.kill(victim, invocation);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::battle::tests::duel;
    use crate::events::FightEvent;

    #[test]
    fn life_events_report_applied_delta() {
        let (mut battle, first, second) = duel();
        assert_eq!(battle.alter_life(first, second, -150), -100);
        let events = battle.drain_events();
        assert_eq!(
            events,
            vec![
                FightEvent::LifeAltered {
                    source: first,
                    target: second,
                    delta: -100
                },
                FightEvent::FighterDied {
                    killer: first,
                    victim: second
                },
            ]
        );

        assert_eq!(battle.alter_life(first, second, 50), 0);
        assert!(battle.drain_events().is_empty());
    }

    #[test]
    fn lowering_max_life_can_kill() {
        let (mut battle, _, second) = duel();
        battle.alter_life(second, second, -95);
        battle.alter_max_life(second, -100);
        let fighter = battle.fighter(second).unwrap();
        assert!(fighter.is_dead());
        assert_eq!(fighter.life().max(), 0);
    }
}
