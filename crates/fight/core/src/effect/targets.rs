//! Area and target filter resolution.

use crate::battle::Battle;
use crate::effect::{SpellEffect, TargetFilter};
use crate::fighter::FighterId;
use crate::grid::{CellId, GridOracle};

/// Living fighters affected by `effect` when `caster` targets `target_cell`.
///
/// The area is oriented from the caster cell toward the target cell and
/// clipped to the battlefield. Hidden fighters are skipped unless the effect
/// reveals. The result follows area cell order, without duplicates.
pub fn resolve_targets(
    battle: &Battle,
    caster: FighterId,
    effect: &SpellEffect,
    target_cell: CellId,
) -> Vec<FighterId> {
    let Some(caster_fighter) = battle.fighter(caster) else {
        return Vec::new();
    };
    if effect.target == TargetFilter::CasterOnly {
        return vec![caster];
    }

    let grid = battle.grid();
    let direction = grid.direction(caster_fighter.cell(), target_cell);
    let caster_team = caster_fighter.team();

    let mut targets = Vec::new();
    for cell in grid.cells_in_area(target_cell, effect.area, direction) {
        let Some(id) = battle.fighter_at(cell) else {
            continue;
        };
        let Some(fighter) = battle.fighter(id) else {
            continue;
        };
        if fighter.is_hidden() && !effect.kind.reveals() && id != caster {
            continue;
        }
        let selected = match effect.target {
            TargetFilter::All => true,
            TargetFilter::Allies => fighter.team() == caster_team,
            TargetFilter::Enemies => fighter.team() != caster_team,
            TargetFilter::SelfOnly | TargetFilter::CasterOnly => id == caster,
        };
        if selected && !targets.contains(&id) {
            targets.push(id);
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::duel;
    use crate::effect::{EffectKind, Element};
    use crate::grid::Area;

    fn damage() -> SpellEffect {
        SpellEffect::new(EffectKind::Damage(Element::Neutral)).with_value(10, 0)
    }

    #[test]
    fn hidden_fighters_are_skipped_unless_revealing() {
        let (mut battle, first, second) = duel();
        battle.set_hidden(second, true);

        assert!(resolve_targets(&battle, first, &damage(), CellId(5)).is_empty());
        let reveal = SpellEffect::new(EffectKind::Reveal);
        assert_eq!(resolve_targets(&battle, first, &reveal, CellId(5)), vec![second]);
    }

    #[test]
    fn hidden_caster_still_targets_itself() {
        let (mut battle, first, _) = duel();
        battle.set_hidden(first, true);
        assert_eq!(resolve_targets(&battle, first, &damage(), CellId(0)), vec![first]);
    }

    #[test]
    fn filters_select_by_team() {
        let (battle, first, second) = duel();
        let wide = damage().with_area(Area::circle(5));

        let all = resolve_targets(&battle, first, &wide, CellId(5));
        assert_eq!(all.len(), 2);
        assert!(all.contains(&first) && all.contains(&second));

        let enemies = wide.clone().with_target(TargetFilter::Enemies);
        assert_eq!(resolve_targets(&battle, first, &enemies, CellId(5)), vec![second]);
        let allies = wide.clone().with_target(TargetFilter::Allies);
        assert_eq!(resolve_targets(&battle, first, &allies, CellId(5)), vec![first]);
        let own = wide.with_target(TargetFilter::SelfOnly);
        assert_eq!(resolve_targets(&battle, second, &own, CellId(5)), vec![second]);
    }

    #[test]
    fn caster_only_ignores_the_area() {
        let (battle, first, _) = duel();
        let effect = damage().with_target(TargetFilter::CasterOnly);
        assert_eq!(resolve_targets(&battle, first, &effect, CellId(55)), vec![first]);
    }

    #[test]
    fn dead_fighters_are_not_targets() {
        let (mut battle, first, second) = duel();
        battle.kill(first, second);
        assert!(resolve_targets(&battle, first, &damage(), CellId(5)).is_empty());
    }
}
