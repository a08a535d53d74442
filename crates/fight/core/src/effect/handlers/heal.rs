use crate::battle::Battle;
use crate::buff::Buff;
use crate::effect::formula::boosted_heal;
use crate::effect::handler::{EffectHandler, EffectScope, TurnStart};
use crate::effect::{EffectError, SpellEffect};

/// Heal boosted by the caster intelligence. As a buff, heals the owner at
/// each of its turn starts.
pub struct HealHandler;

impl EffectHandler for HealHandler {
    fn name(&self) -> &'static str {
        "HealHandler"
    }

    fn handle(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        for target in scope.targets.clone() {
            let mut value = scope.roll(effect)?;
            if effect.boostable
                && let Some(caster) = scope.battle.fighter(scope.caster)
            {
                value = boosted_heal(value, caster.characteristics());
            }
            scope.battle.heal(scope.caster, target, value);
        }
        Ok(())
    }

    fn buff(&self, scope: &mut EffectScope<'_>, effect: &SpellEffect) -> Result<(), EffectError> {
        scope.buff_targets(effect)
    }

    fn on_start_turn(&self, battle: &mut Battle, buff: &Buff) -> TurnStart {
        battle.heal(buff.caster, buff.owner, buff.value);
        TurnStart::Continue
    }
}

#[cfg(test)]
mod tests {
    use crate::battle::tests::duel;
    use crate::buff::Buff;
    use crate::effect::applier::tests::cast;
    use crate::effect::{EffectKind, SpellEffect};
    use crate::fighter::Characteristic;
    use crate::grid::CellId;

    #[test]
    fn boosted_heal_uses_the_caster_intelligence() {
        let (mut battle, first, second) = duel();
        battle.alter_life(first, second, -50);
        let id = battle.next_buff_id();
        let intelligence = SpellEffect::new(EffectKind::AddCharacteristic(Characteristic::Intelligence))
            .with_value(50, 0)
            .with_duration(5);
        battle.add_buff(Buff::new(id, intelligence, 50, None, first, first));

        let heal = SpellEffect::new(EffectKind::Heal).with_value(10, 0);
        cast(&mut battle, first, &[heal.clone()], CellId(5)).unwrap();
        assert_eq!(battle.fighter(second).unwrap().life().current(), 60);

        cast(&mut battle, first, &[heal.boostable()], CellId(5)).unwrap();
        assert_eq!(battle.fighter(second).unwrap().life().current(), 75);
    }

    #[test]
    fn heal_never_exceeds_max_life() {
        let (mut battle, first, second) = duel();
        battle.alter_life(first, second, -5);
        let heal = SpellEffect::new(EffectKind::Heal).with_value(30, 0);
        cast(&mut battle, first, &[heal], CellId(5)).unwrap();
        assert_eq!(battle.fighter(second).unwrap().life().current(), 100);
    }

    #[test]
    fn heal_over_time_ticks_until_the_buff_expires() {
        let (mut battle, first, second) = duel();
        battle.alter_life(first, second, -50);
        let heal = SpellEffect::new(EffectKind::Heal)
            .with_value(5, 0)
            .with_duration(2);
        cast(&mut battle, first, &[heal], CellId(5)).unwrap();
        assert_eq!(battle.fighter(second).unwrap().life().current(), 50);

        battle.tick_buffs(second);
        assert_eq!(battle.fighter(second).unwrap().life().current(), 55);
        battle.tick_buffs(second);
        battle.tick_buffs(second);
        assert_eq!(battle.fighter(second).unwrap().life().current(), 60);
    }
}
