//! Effect handler capability and dispatch.
//!
//! Every [`EffectKind`] maps to exactly one handler through [`handler_for`].
//! Handlers implement the two-phase contract:
//! - `handle`: immediate application of an effect without duration
//! - `buff`: registration of a reversible buff on each target
//!
//! and the buff hooks the battle calls while the buff is active. A handler
//! that does not support a phase keeps the default implementation, which
//! fails with [`EffectError::UnsupportedOperation`].

use crate::battle::{Battle, Damage};
use crate::buff::{Buff, BuffId};
use crate::effect::handlers::{
    AddCharacteristicHandler, AddStateHandler, DamageHandler, DispelHandler, HealHandler,
    InvisibilityHandler, PercentCharacteristicHandler, PercentLifeLostDamageHandler,
    PushBackHandler, ReduceDamageHandler, ReflectDamageHandler, RemoveCharacteristicHandler,
    RemoveStateHandler, RevealHandler, SacrificeHandler, SkipNextTurnHandler,
    StealLifeHandler, StealPointsHandler, SummonHandler, SwitchPositionHandler, TeleportHandler,
};
use crate::effect::{EffectError, EffectKind, EffectPhase, SpellEffect};
use crate::env::{FightEnv, SpellId};
use crate::fighter::FighterId;
use crate::grid::CellId;

/// Outcome of a buff turn-start hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TurnStart {
    #[default]
    Continue,
    /// The owner loses the turn that is starting.
    SkipTurn,
}

/// Everything a handler needs to resolve one effect of one cast.
pub struct EffectScope<'a> {
    pub battle: &'a mut Battle,
    pub env: &'a FightEnv<'a>,
    pub caster: FighterId,
    pub spell: Option<SpellId>,
    pub target_cell: CellId,
    /// Fighters selected by the area and the target filter.
    pub targets: Vec<FighterId>,
}

impl EffectScope<'_> {
    /// Rolls the effect value in `[min, max]`, or `min` when fixed.
    pub fn roll(&self, effect: &SpellEffect) -> Result<i32, EffectError> {
        if effect.is_fixed() {
            return Ok(effect.min);
        }
        Ok(self.env.rng()?.int_in_range(effect.min, effect.max))
    }

    /// Registers a buff built from `effect` on `owner` and runs its start hook.
    pub fn add_buff(&mut self, effect: &SpellEffect, value: i32, owner: FighterId) -> BuffId {
        let id = self.battle.next_buff_id();
        let buff = Buff::new(id, effect.clone(), value, self.spell, self.caster, owner);
        self.battle.add_buff(buff);
        id
    }

    /// Rolls once and registers the same buff on every target.
    pub fn buff_targets(&mut self, effect: &SpellEffect) -> Result<(), EffectError> {
        let value = self.roll(effect)?;
        for target in self.targets.clone() {
            self.add_buff(effect, value, target);
        }
        Ok(())
    }
}

/// Capability implemented by every effect handler.
pub trait EffectHandler: Sync {
    fn name(&self) -> &'static str;

    /// Applies the effect immediately on the scope targets.
    fn handle(&self, _scope: &mut EffectScope<'_>, _effect: &SpellEffect) -> Result<(), EffectError> {
        Err(EffectError::unsupported(self.name(), EffectPhase::Handle))
    }

    /// Registers the effect as buffs on the scope targets.
    fn buff(&self, _scope: &mut EffectScope<'_>, _effect: &SpellEffect) -> Result<(), EffectError> {
        Err(EffectError::unsupported(self.name(), EffectPhase::Buff))
    }

    fn on_buff_started(&self, _battle: &mut Battle, _buff: &Buff) {}

    /// Called at each owner turn start, before the remaining turns decrement.
    fn on_start_turn(&self, _battle: &mut Battle, _buff: &Buff) -> TurnStart {
        TurnStart::Continue
    }

    fn on_buff_terminated(&self, _battle: &mut Battle, _buff: &Buff) {}

    /// Called when the owner is about to take direct damage.
    fn on_direct_damage(&self, _battle: &mut Battle, _buff: &Buff, _damage: &mut Damage) {}
}

/// Handler bound to an effect kind.
pub fn handler_for(kind: EffectKind) -> &'static dyn EffectHandler {
    match kind {
        EffectKind::Damage(_) => &DamageHandler,
        EffectKind::StealLife(_) => &StealLifeHandler,
        EffectKind::PercentLifeLostDamage(_) => &PercentLifeLostDamageHandler,
        EffectKind::Heal => &HealHandler,
        EffectKind::AddCharacteristic(_) => &AddCharacteristicHandler,
        EffectKind::RemoveCharacteristic(_) => &RemoveCharacteristicHandler,
        EffectKind::AddPercentCharacteristic(_) => &PercentCharacteristicHandler,
        EffectKind::StealActionPoints | EffectKind::StealMovementPoints => &StealPointsHandler,
        EffectKind::AddState => &AddStateHandler,
        EffectKind::RemoveState => &RemoveStateHandler,
        EffectKind::Invisibility => &InvisibilityHandler,
        EffectKind::Reveal => &RevealHandler,
        EffectKind::Teleport => &TeleportHandler,
        EffectKind::SwitchPosition => &SwitchPositionHandler,
        EffectKind::PushBack => &PushBackHandler,
        EffectKind::SkipNextTurn => &SkipNextTurnHandler,
        EffectKind::ReflectDamage => &ReflectDamageHandler,
        EffectKind::ReduceDamage => &ReduceDamageHandler,
        EffectKind::Sacrifice => &SacrificeHandler,
        EffectKind::Dispel => &DispelHandler,
        EffectKind::Summon => &SummonHandler,
    }
}
