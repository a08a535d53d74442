//! In-memory oracles built from validated definitions.

use std::collections::HashMap;

use fight_core::{
    EffectKind, MonsterGrade, MonsterId, MonsterOracle, MonsterTemplate, Spell, SpellId,
    SpellLevel, SpellOracle, SpellRef,
};

use crate::error::ContentError;

/// Spell definitions indexed by id.
#[derive(Clone, Debug, Default)]
pub struct SpellBook {
    spells: HashMap<SpellId, Spell>,
}

impl SpellBook {
    /// Validates every level of every spell and indexes them.
    pub fn from_spells(spells: Vec<Spell>) -> Result<Self, ContentError> {
        let mut book = Self::default();
        for spell in spells {
            book.insert(spell)?;
        }
        Ok(book)
    }

    /// Adds a spell. Levels must be unique inside the spell, and a spell id
    /// already present has its levels merged.
    pub fn insert(&mut self, spell: Spell) -> Result<(), ContentError> {
        if spell.levels.is_empty() {
            return Err(ContentError::NoSpellLevel(spell.id));
        }
        for level in &spell.levels {
            validate_level(level)?;
        }

        let entry = self.spells.entry(spell.id).or_insert_with(|| Spell {
            id: spell.id,
            name: spell.name.clone(),
            levels: Vec::new(),
        });
        for level in spell.levels {
            if entry.level(level.level).is_some() {
                return Err(ContentError::DuplicateSpellLevel {
                    spell: level.spell,
                    level: level.level,
                });
            }
            entry.levels.push(level);
        }
        Ok(())
    }

    pub fn get(&self, id: SpellId) -> Option<&Spell> {
        self.spells.get(&id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Spell> {
        self.spells.values().find(|spell| spell.name == name)
    }

    pub fn contains(&self, spell: SpellRef) -> bool {
        self.spell(spell.spell, spell.level).is_some()
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spell> {
        self.spells.values()
    }
}

impl SpellOracle for SpellBook {
    fn spell(&self, spell: SpellId, level: u8) -> Option<&SpellLevel> {
        self.spells.get(&spell)?.level(level)
    }
}

fn validate_level(level: &SpellLevel) -> Result<(), ContentError> {
    let (spell, number) = (level.spell, level.level);
    if level.min_range > level.max_range {
        return Err(ContentError::InvalidRange {
            spell,
            level: number,
            min: level.min_range,
            max: level.max_range,
        });
    }
    if level.action_point_cost < 0 {
        return Err(ContentError::NegativeCost {
            spell,
            level: number,
            cost: level.action_point_cost,
        });
    }
    for chance in [level.critical_hit_chance, level.critical_failure_chance] {
        if !(0..=100).contains(&chance) {
            return Err(ContentError::InvalidChance {
                spell,
                level: number,
                chance,
            });
        }
    }
    Ok(())
}

/// Monster templates indexed by id.
#[derive(Clone, Debug, Default)]
pub struct MonsterCatalog {
    monsters: HashMap<MonsterId, MonsterTemplate>,
}

impl MonsterCatalog {
    pub fn from_templates(templates: Vec<MonsterTemplate>) -> Result<Self, ContentError> {
        let mut catalog = Self::default();
        for template in templates {
            catalog.insert(template)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, template: MonsterTemplate) -> Result<(), ContentError> {
        let mut seen = Vec::with_capacity(template.grades.len());
        for grade in &template.grades {
            if seen.contains(&grade.grade) {
                return Err(ContentError::DuplicateMonsterGrade {
                    monster: template.id,
                    grade: grade.grade,
                });
            }
            if grade.life <= 0 {
                return Err(ContentError::InvalidLife {
                    monster: template.id,
                    grade: grade.grade,
                    life: grade.life,
                });
            }
            seen.push(grade.grade);
        }
        self.monsters.insert(template.id, template);
        Ok(())
    }

    pub fn get(&self, id: MonsterId) -> Option<&MonsterTemplate> {
        self.monsters.get(&id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&MonsterTemplate> {
        self.monsters.values().find(|monster| monster.name == name)
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonsterTemplate> {
        self.monsters.values()
    }
}

impl MonsterOracle for MonsterCatalog {
    fn monster(&self, monster: MonsterId, grade: u8) -> Option<&MonsterGrade> {
        self.monsters.get(&monster)?.grade(grade)
    }
}

/// Checks the references between spells and monsters: summoned monsters must
/// exist, and monsters may only know loaded spells.
pub fn validate_references(
    spells: &SpellBook,
    monsters: &MonsterCatalog,
) -> Result<(), ContentError> {
    for spell in spells.iter() {
        let effects = spell
            .levels
            .iter()
            .flat_map(|level| level.effects.iter().chain(&level.critical_effects));
        for effect in effects.filter(|effect| effect.kind == EffectKind::Summon) {
            let monster = MonsterId(u32::try_from(effect.special).unwrap_or_default());
            let grade = u8::try_from(effect.min.max(1)).unwrap_or(1);
            if monsters.monster(monster, grade).is_none() {
                return Err(ContentError::UnknownSummon {
                    spell: spell.id,
                    monster,
                    grade,
                });
            }
        }
    }

    for template in monsters.iter() {
        for grade in &template.grades {
            if let Some(unknown) = grade.spells.iter().find(|spell| !spells.contains(**spell)) {
                return Err(ContentError::UnknownMonsterSpell {
                    monster: template.id,
                    grade: grade.grade,
                    spell: unknown.spell,
                    level: unknown.level,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fight_core::SpellEffect;

    fn level(spell: u32, level: u8, effects: Vec<SpellEffect>) -> SpellLevel {
        SpellLevel {
            spell: SpellId(spell),
            level,
            action_point_cost: 3,
            min_range: 1,
            max_range: 4,
            modifiable_range: false,
            line_of_sight: true,
            free_cell: false,
            critical_hit_chance: 5,
            critical_failure_chance: 0,
            ends_turn_on_failure: false,
            required_states: Vec::new(),
            forbidden_states: Vec::new(),
            effects,
            critical_effects: Vec::new(),
        }
    }

    fn spell(id: u32, levels: Vec<SpellLevel>) -> Spell {
        Spell {
            id: SpellId(id),
            name: format!("spell {id}"),
            levels,
        }
    }

    fn monster(id: u32, spells: Vec<SpellRef>) -> MonsterTemplate {
        MonsterTemplate {
            id: MonsterId(id),
            name: "gobball".into(),
            grades: vec![MonsterGrade {
                grade: 1,
                life: 40,
                initiative: 10,
                action_points: 5,
                movement_points: 3,
                characteristics: Vec::new(),
                spells,
            }],
        }
    }

    #[test]
    fn spell_book_answers_by_level() {
        let book = SpellBook::from_spells(vec![spell(1, vec![level(1, 1, vec![]), level(1, 2, vec![])])])
            .unwrap();
        assert!(book.spell(SpellId(1), 2).is_some());
        assert!(book.spell(SpellId(1), 3).is_none());
        assert!(book.find_by_name("spell 1").is_some());
    }

    #[test]
    fn duplicate_levels_are_rejected() {
        let result = SpellBook::from_spells(vec![
            spell(1, vec![level(1, 1, vec![])]),
            spell(1, vec![level(1, 1, vec![])]),
        ]);
        assert!(matches!(result, Err(ContentError::DuplicateSpellLevel { .. })));
    }

    #[test]
    fn inconsistent_levels_are_rejected() {
        let mut empty_range = level(2, 1, vec![]);
        empty_range.min_range = 5;
        assert!(matches!(
            SpellBook::from_spells(vec![spell(2, vec![empty_range])]),
            Err(ContentError::InvalidRange { min: 5, max: 4, .. })
        ));

        let mut chance = level(3, 1, vec![]);
        chance.critical_failure_chance = 120;
        assert!(matches!(
            SpellBook::from_spells(vec![spell(3, vec![chance])]),
            Err(ContentError::InvalidChance { chance: 120, .. })
        ));
        assert!(matches!(
            SpellBook::from_spells(vec![spell(4, vec![])]),
            Err(ContentError::NoSpellLevel(SpellId(4)))
        ));
    }

    #[test]
    fn references_are_checked_both_ways() {
        let summon = SpellEffect::new(EffectKind::Summon)
            .with_value(1, 0)
            .with_special(31);
        let spells = SpellBook::from_spells(vec![spell(1, vec![level(1, 1, vec![summon])])]).unwrap();

        let empty = MonsterCatalog::default();
        assert!(matches!(
            validate_references(&spells, &empty),
            Err(ContentError::UnknownSummon { monster: MonsterId(31), grade: 1, .. })
        ));

        let unknown_spell = MonsterCatalog::from_templates(vec![monster(
            31,
            vec![SpellRef::new(SpellId(9), 1)],
        )])
        .unwrap();
        assert!(matches!(
            validate_references(&spells, &unknown_spell),
            Err(ContentError::UnknownMonsterSpell { .. })
        ));

        let valid =
            MonsterCatalog::from_templates(vec![monster(31, vec![SpellRef::new(SpellId(1), 1)])])
                .unwrap();
        assert!(validate_references(&spells, &valid).is_ok());
    }
}
