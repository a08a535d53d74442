//! Shared fixtures: scripted randomness, in-memory content and a ready-made duel.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use fight_core::{
    AccountId, Action, Area, CastAction, Characteristic, EffectKind, Element, Fight, FightConfig, FightEnv, FightId,
    FightType, FighterId, FighterSpec, MonsterGrade, MonsterId, MonsterOracle, RngOracle,
    SpellEffect, SpellId, SpellLevel, SpellOracle, SpellRef, TargetFilter, Battlefield, CellId,
    TeamId,
};

/// RNG returning scripted values; `min` and failed chances once the script is empty.
#[derive(Default)]
pub struct ScriptedRng {
    rolls: Mutex<VecDeque<i32>>,
    chances: Mutex<VecDeque<bool>>,
}

impl ScriptedRng {
    pub fn with_rolls(rolls: impl IntoIterator<Item = i32>) -> Self {
        Self {
            rolls: Mutex::new(rolls.into_iter().collect()),
            chances: Mutex::default(),
        }
    }

    pub fn push_chance(&self, success: bool) {
        self.chances.lock().unwrap().push_back(success);
    }
}

impl RngOracle for ScriptedRng {
    fn int_in_range(&self, min: i32, max: i32) -> i32 {
        let scripted = self.rolls.lock().unwrap().pop_front();
        scripted.map_or(min, |value| value.clamp(min, max.max(min)))
    }

    fn percentage_chance(&self, percent: i32) -> bool {
        if percent <= 0 {
            return false;
        }
        if percent >= 100 {
            return true;
        }
        self.chances.lock().unwrap().pop_front().unwrap_or(false)
    }
}

#[derive(Default)]
pub struct Spells(HashMap<(SpellId, u8), SpellLevel>);

impl Spells {
    pub fn insert(&mut self, level: SpellLevel) {
        self.0.insert((level.spell, level.level), level);
    }
}

impl SpellOracle for Spells {
    fn spell(&self, spell: SpellId, level: u8) -> Option<&SpellLevel> {
        self.0.get(&(spell, level))
    }
}

#[derive(Default)]
pub struct Monsters(HashMap<(MonsterId, u8), MonsterGrade>);

impl MonsterOracle for Monsters {
    fn monster(&self, monster: MonsterId, grade: u8) -> Option<&MonsterGrade> {
        self.0.get(&(monster, grade))
    }
}

pub const STRIKE: SpellRef = SpellRef::new(SpellId(1), 1);
pub const RAGE: SpellRef = SpellRef::new(SpellId(2), 1);
pub const QUAKE: SpellRef = SpellRef::new(SpellId(3), 1);
pub const MIRROR: SpellRef = SpellRef::new(SpellId(4), 1);
pub const CLUMSY: SpellRef = SpellRef::new(SpellId(5), 1);
pub const SUMMON: SpellRef = SpellRef::new(SpellId(6), 1);
pub const SMASH: SpellRef = SpellRef::new(SpellId(7), 1);
pub const STUN: SpellRef = SpellRef::new(SpellId(8), 1);

pub const GOBBALL: MonsterId = MonsterId(31);

pub fn level(spell: SpellRef, cost: i32, max_range: u32, effects: Vec<SpellEffect>) -> SpellLevel {
    SpellLevel {
        spell: spell.spell,
        level: spell.level,
        action_point_cost: cost,
        min_range: 0,
        max_range,
        modifiable_range: false,
        line_of_sight: false,
        free_cell: false,
        critical_hit_chance: 0,
        critical_failure_chance: 0,
        ends_turn_on_failure: false,
        required_states: Vec::new(),
        forbidden_states: Vec::new(),
        effects,
        critical_effects: Vec::new(),
    }
}

pub fn spells() -> Spells {
    let mut spells = Spells::default();
    spells.insert(level(
        STRIKE,
        3,
        8,
        vec![SpellEffect::new(EffectKind::Damage(Element::Neutral)).with_value(5, 0)],
    ));
    spells.insert(level(
        RAGE,
        2,
        8,
        vec![
            SpellEffect::new(EffectKind::AddCharacteristic(Characteristic::Strength))
                .with_value(30, 0)
                .with_duration(5),
        ],
    ));
    spells.insert(level(
        QUAKE,
        2,
        10,
        vec![
            SpellEffect::new(EffectKind::Damage(Element::Earth))
                .with_value(10, 0)
                .with_area(Area::circle(2)),
        ],
    ));
    spells.insert(level(
        MIRROR,
        1,
        8,
        vec![
            SpellEffect::new(EffectKind::ReflectDamage)
                .with_value(4, 0)
                .with_duration(3),
        ],
    ));
    let mut clumsy = level(
        CLUMSY,
        4,
        8,
        vec![SpellEffect::new(EffectKind::Damage(Element::Fire)).with_value(50, 0)],
    );
    clumsy.critical_failure_chance = 100;
    clumsy.ends_turn_on_failure = true;
    spells.insert(clumsy);
    let mut summon = level(
        SUMMON,
        2,
        3,
        vec![
            SpellEffect::new(EffectKind::Summon)
                .with_value(1, 0)
                .with_special(GOBBALL.0 as i32),
        ],
    );
    summon.free_cell = true;
    spells.insert(summon);
    spells.insert(level(
        SMASH,
        3,
        8,
        vec![SpellEffect::new(EffectKind::Damage(Element::Neutral)).with_value(20, 0)],
    ));
    spells.insert(level(
        STUN,
        2,
        8,
        vec![
            SpellEffect::new(EffectKind::SkipNextTurn)
                .with_target(TargetFilter::Enemies)
                .with_duration(1),
        ],
    ));
    spells
}

pub fn monsters() -> Monsters {
    let mut monsters = Monsters::default();
    monsters.0.insert(
        (GOBBALL, 1),
        MonsterGrade {
            grade: 1,
            life: 30,
            initiative: 5,
            action_points: 4,
            movement_points: 2,
            characteristics: Vec::new(),
            spells: Vec::new(),
        },
    );
    monsters
}

/// Oracles shared by a test; borrowed by [`World::env`].
pub struct World {
    pub spells: Spells,
    pub monsters: Monsters,
    pub rng: ScriptedRng,
}

impl World {
    pub fn new() -> Self {
        Self {
            spells: spells(),
            monsters: monsters(),
            rng: ScriptedRng::default(),
        }
    }

    pub fn env(&self) -> FightEnv<'_> {
        FightEnv::with_all(&self.spells, &self.monsters, &self.rng)
    }
}

pub fn player(name: &str, initiative: i32) -> FighterSpec {
    let mut spec = FighterSpec::player(AccountId(1), name, 100)
        .with_characteristic(Characteristic::ActionPoints, 6)
        .with_characteristic(Characteristic::MovementPoints, 3)
        .with_characteristic(Characteristic::Initiative, initiative);
    for spell in [STRIKE, RAGE, QUAKE, MIRROR, CLUMSY, SUMMON, SMASH, STUN] {
        spec = spec.with_spell(spell);
    }
    spec
}

/// A duel in placement on a 10x10 grid: red plays first from cell 0, blue
/// waits on cell 5.
pub struct Duel {
    pub fight: Fight,
    pub red_team: TeamId,
    pub blue_team: TeamId,
    pub red: FighterId,
    pub blue: FighterId,
}

pub fn duel(config: FightConfig) -> Duel {
    duel_with(config, player("red", 100), player("blue", 10))
}

pub fn duel_with(config: FightConfig, red: FighterSpec, blue: FighterSpec) -> Duel {
    let mut fight = Fight::new(FightId(1), FightType::Challenge, config, Battlefield::open(10, 10));
    let red_team = fight.add_team(vec![CellId(0), CellId(1)]).unwrap();
    let blue_team = fight.add_team(vec![CellId(5), CellId(15)]).unwrap();
    let red = fight.add_fighter(red_team, red).unwrap();
    let blue = fight.add_fighter(blue_team, blue).unwrap();
    fight.start_placement().unwrap();
    Duel {
        fight,
        red_team,
        blue_team,
        red,
        blue,
    }
}

/// Same duel, already active, with red playing and the event buffer drained.
pub fn active_duel(config: FightConfig) -> Duel {
    let mut duel = duel(config);
    duel.fight.start_fight(true).unwrap();
    duel.fight.drain_events();
    duel
}

pub fn cast(caster: FighterId, spell: SpellRef, target: CellId) -> Action {
    Action::Cast(CastAction::new(caster, spell, target))
}

pub fn life(fight: &Fight, fighter: FighterId) -> i32 {
    fight.battle().fighter(fighter).unwrap().life().current()
}
