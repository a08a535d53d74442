//! Dry-run evaluation of casts for the AI.
//!
//! A simulation applies the effects of a spell level on a clone of the
//! battle, with an RNG that always rolls the mean and never succeeds a
//! chance test, then scores the events the clone emitted. The real battle
//! is never touched.
pub mod ai;

use crate::battle::Battle;
use crate::effect::{EffectError, EffectKind, apply_effects};
use crate::env::{Env, FightEnv, RngOracle, SpellLevel};
use crate::events::FightEvent;
use crate::fighter::FighterId;
use crate::grid::CellId;

/// Deterministic RNG used by simulations: mean rolls, failed chance tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpectedRng;

impl RngOracle for ExpectedRng {
    fn int_in_range(&self, min: i32, max: i32) -> i32 {
        if max <= min { min } else { (min + max) / 2 }
    }

    fn percentage_chance(&self, _percent: i32) -> bool {
        false
    }
}

/// Expected effect of one cast, seen from the caster side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CastSimulation {
    /// Life removed from enemies.
    pub enemy_damage: i32,
    /// Life removed from the caster and its allies.
    pub ally_damage: i32,
    pub ally_heal: i32,
    pub enemy_heal: i32,
    /// Value times duration of buffs helping the caster side.
    pub ally_boost: i32,
    /// Value times duration of buffs hindering enemies.
    pub enemy_debuff: i32,
    /// Buffs helping enemies or hindering allies.
    pub misplaced_buffs: i32,
    pub enemy_kills: u32,
    pub ally_kills: u32,
    pub invocations: u32,
}

impl CastSimulation {
    const KILL_WEIGHT: i32 = 200;
    const INVOCATION_WEIGHT: i32 = 50;

    /// Signed score; positive casts help the caster side.
    pub fn score(&self) -> i32 {
        self.enemy_damage + self.ally_heal + self.ally_boost + self.enemy_debuff
            + Self::KILL_WEIGHT * self.enemy_kills as i32
            + Self::INVOCATION_WEIGHT * self.invocations as i32
            - 2 * self.ally_damage
            - self.enemy_heal
            - self.misplaced_buffs
            - 2 * Self::KILL_WEIGHT * self.ally_kills as i32
    }

    fn record(&mut self, battle: &Battle, caster: FighterId, event: &FightEvent) {
        let ally = |fighter: FighterId| fighter == caster || battle.are_allies(caster, fighter);
        match event {
            FightEvent::LifeAltered { target, delta, .. } => match (ally(*target), *delta < 0) {
                (true, true) => self.ally_damage -= delta,
                (true, false) => self.ally_heal += delta,
                (false, true) => self.enemy_damage -= delta,
                (false, false) => self.enemy_heal += delta,
            },
            FightEvent::BuffApplied {
                owner,
                kind,
                value,
                duration,
                ..
            } => {
                let weight = value.abs().max(1) * i32::from(*duration);
                match (buff_is_positive(*kind), ally(*owner)) {
                    (Some(true), true) => self.ally_boost += weight,
                    (Some(false), false) => self.enemy_debuff += weight,
                    (Some(_), _) => self.misplaced_buffs += weight,
                    (None, _) => {}
                }
            }
            FightEvent::FighterDied { victim, .. } => {
                if ally(*victim) {
                    self.ally_kills += 1;
                } else {
                    self.enemy_kills += 1;
                }
            }
            FightEvent::FighterInvoked { .. } => self.invocations += 1,
            _ => {}
        }
    }
}

/// Whether a buff helps (`Some(true)`) or hinders (`Some(false)`) its owner.
/// Damage and heal over time are scored through the life they change.
fn buff_is_positive(kind: EffectKind) -> Option<bool> {
    match kind {
        EffectKind::AddCharacteristic(_)
        | EffectKind::AddPercentCharacteristic(_)
        | EffectKind::ReflectDamage
        | EffectKind::ReduceDamage
        | EffectKind::Invisibility => Some(true),
        EffectKind::RemoveCharacteristic(_)
        | EffectKind::StealActionPoints
        | EffectKind::StealMovementPoints
        | EffectKind::SkipNextTurn => Some(false),
        _ => None,
    }
}

/// Simulates `level` cast by `caster` on `target` and scores it.
pub fn simulate_cast(
    battle: &Battle,
    env: &FightEnv<'_>,
    caster: FighterId,
    level: &SpellLevel,
    target: CellId,
) -> Result<CastSimulation, EffectError> {
    let mut sandbox = battle.clone();
    sandbox.drain_events();

    let rng: &dyn RngOracle = &ExpectedRng;
    let sim_env: FightEnv<'_> = Env::new(env.spells().ok(), env.monsters().ok(), Some(rng));
    apply_effects(
        &mut sandbox,
        &sim_env,
        caster,
        Some(level.spell),
        &level.effects,
        target,
    )?;

    let mut simulation = CastSimulation::default();
    for event in sandbox.drain_events() {
        simulation.record(&sandbox, caster, &event);
    }
    Ok(simulation)
}
