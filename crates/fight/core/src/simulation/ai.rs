//! Decision making of AI-controlled fighters.
//!
//! One decision per call, so the scheduler can run each action through the
//! same pipeline as a player:
//! 1. the best cast with a positive simulation score
//! 2. otherwise a step toward the nearest visible enemy
//! 3. otherwise nothing, and the caller passes the turn

use tracing::trace;

use super::simulate_cast;
use crate::battle::Battle;
use crate::env::FightEnv;
use crate::fight::{Action, CastAction, MoveAction};
use crate::fighter::{Fighter, FighterId};
use crate::grid::{CellId, GridOracle};

/// Next action of `fighter`, or `None` when it should pass.
pub fn decide(battle: &Battle, env: &FightEnv<'_>, fighter: FighterId) -> Option<Action> {
    let me = battle.fighter(fighter)?;
    if me.is_dead() || !me.is_playing() {
        return None;
    }
    best_cast(battle, env, me)
        .map(Action::Cast)
        .or_else(|| approach(battle, me).map(Action::Move))
}

fn best_cast(battle: &Battle, env: &FightEnv<'_>, me: &Fighter) -> Option<CastAction> {
    let mut best: Option<(i32, CastAction)> = None;
    for spell in me.spells() {
        let Ok(level) = env.spell(spell.spell, spell.level) else {
            continue;
        };
        if level.action_point_cost <= 0 {
            continue;
        }
        for cell in battle.grid().cells() {
            let cast = CastAction::new(me.id(), *spell, cell);
            if Action::Cast(cast.clone()).validate(battle, env).is_err() {
                continue;
            }
            let Ok(simulation) = simulate_cast(battle, env, me.id(), level, cell) else {
                continue;
            };
            let score = simulation.score();
            if score > 0 && best.as_ref().is_none_or(|(current, _)| score > *current) {
                best = Some((score, cast));
            }
        }
    }
    if let Some((score, cast)) = &best {
        trace!(target: "fight::ai", fighter = %me.id(), spell = %cast.spell.spell, cell = %cast.target, score, "cast selected");
    }
    best.map(|(_, cast)| cast)
}

/// Greedy walk toward the nearest visible enemy, stopping next to it.
fn approach(battle: &Battle, me: &Fighter) -> Option<MoveAction> {
    let movement_points = me.turn_points()?.movement_points();
    if movement_points <= 0 {
        return None;
    }
    let grid = battle.grid();
    let enemy = battle
        .fighters()
        .filter(|other| other.team() != me.team())
        .filter(|other| !other.is_dead() && !other.has_fled() && !other.is_hidden())
        .min_by_key(|other| (grid.distance(me.cell(), other.cell()), other.id()))?
        .cell();

    let mut path: Vec<CellId> = Vec::new();
    let mut position = me.cell();
    for _ in 0..movement_points {
        let distance = grid.distance(position, enemy);
        if distance <= 1 {
            break;
        }
        let next = grid
            .neighbors(position)
            .filter(|cell| battle.is_free(*cell) && !path.contains(cell))
            .filter(|cell| grid.distance(*cell, enemy) < distance)
            .min_by_key(|cell| (grid.distance(*cell, enemy), *cell));
        match next {
            Some(cell) => {
                path.push(cell);
                position = cell;
            }
            None => break,
        }
    }

    (!path.is_empty()).then(|| MoveAction::new(me.id(), path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{EffectKind, Element, SpellEffect, TargetFilter};
    use crate::env::{Env, PcgRng, RngOracle, SpellId, SpellLevel, SpellOracle, SpellRef};
    use crate::fighter::{AccountId, Characteristic, FighterSpec};
    use crate::grid::Battlefield;

    struct OneSpell(SpellLevel);

    impl SpellOracle for OneSpell {
        fn spell(&self, spell: SpellId, level: u8) -> Option<&SpellLevel> {
            (self.0.spell == spell && self.0.level == level).then_some(&self.0)
        }
    }

    fn strike(max_range: u32) -> SpellLevel {
        SpellLevel {
            spell: SpellId(7),
            level: 1,
            action_point_cost: 3,
            min_range: 1,
            max_range,
            modifiable_range: false,
            line_of_sight: true,
            free_cell: false,
            critical_hit_chance: 0,
            critical_failure_chance: 0,
            ends_turn_on_failure: false,
            required_states: Vec::new(),
            forbidden_states: Vec::new(),
            effects: vec![
                SpellEffect::new(EffectKind::Damage(Element::Earth))
                    .with_value(10, 12)
                    .with_target(TargetFilter::Enemies),
            ],
            critical_effects: Vec::new(),
        }
    }

    fn prepare(max_range: u32) -> (Battle, FighterId, OneSpell) {
        let mut battle = Battle::new(Battlefield::open(10, 10));
        let red = battle.add_team(Vec::new()).unwrap();
        let blue = battle.add_team(Vec::new()).unwrap();
        let spec = |name: &str| {
            FighterSpec::player(AccountId(1), name, 100)
                .with_characteristic(Characteristic::ActionPoints, 6)
                .with_characteristic(Characteristic::MovementPoints, 3)
        };
        let me = battle
            .insert_fighter(red, CellId(0), spec("red").with_spell(SpellRef::new(SpellId(7), 1)))
            .unwrap();
        battle.insert_fighter(blue, CellId(5), spec("blue")).unwrap();
        battle.fighter_mut(me).unwrap().begin_turn();
        (battle, me, OneSpell(strike(max_range)))
    }

    #[test]
    fn casts_on_the_enemy_in_range() {
        let (battle, first, spells) = prepare(6);
        let rng = PcgRng::new(1);
        let env: FightEnv<'_> = Env::new(
            Some(&spells as &dyn SpellOracle),
            None,
            Some(&rng as &dyn RngOracle),
        );
        let action = decide(&battle, &env, first);
        assert_eq!(
            action,
            Some(Action::Cast(CastAction::new(
                first,
                SpellRef::new(SpellId(7), 1),
                CellId(5)
            )))
        );
    }

    #[test]
    fn walks_toward_the_enemy_when_out_of_range() {
        let (battle, first, spells) = prepare(1);
        let rng = PcgRng::new(1);
        let env: FightEnv<'_> = Env::new(
            Some(&spells as &dyn SpellOracle),
            None,
            Some(&rng as &dyn RngOracle),
        );
        let action = decide(&battle, &env, first);
        assert_eq!(
            action,
            Some(Action::Move(MoveAction::new(
                first,
                vec![CellId(1), CellId(2), CellId(3)]
            )))
        );
    }
}
