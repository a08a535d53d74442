//! Shared fixtures: in-memory content and fight setups.
#![allow(dead_code)]

use std::sync::Arc;

use fight_content::{MonsterCatalog, SpellBook};
use fight_core::{
    AccountId, Battlefield, CellId, Characteristic, EffectKind, Element, FightConfig, FightType,
    FighterId, FighterSpec, MonsterGrade, MonsterId, MonsterTemplate, PcgRng, Spell,
    SpellEffect, SpellId, SpellLevel, SpellRef, TeamId,
};
use fight_runtime::{
    ContentOracles, FightHandle, FightService, FightSetup, RuntimeConfig, TeamSetup,
};

pub const STRIKE: SpellRef = SpellRef::new(SpellId(1), 1);
pub const DUMMY: MonsterId = MonsterId(1);

fn strike() -> Spell {
    Spell {
        id: STRIKE.spell,
        name: "Strike".into(),
        levels: vec![SpellLevel {
            spell: STRIKE.spell,
            level: STRIKE.level,
            action_point_cost: 3,
            min_range: 0,
            max_range: 8,
            modifiable_range: false,
            line_of_sight: false,
            free_cell: false,
            critical_hit_chance: 0,
            critical_failure_chance: 0,
            ends_turn_on_failure: false,
            required_states: Vec::new(),
            forbidden_states: Vec::new(),
            effects: vec![SpellEffect::new(EffectKind::Damage(Element::Neutral)).with_value(5, 0)],
            critical_effects: Vec::new(),
        }],
    }
}

pub fn dummy_grade() -> MonsterGrade {
    MonsterGrade {
        grade: 1,
        life: 20,
        initiative: 10,
        action_points: 6,
        movement_points: 3,
        characteristics: Vec::new(),
        spells: vec![STRIKE],
    }
}

pub fn oracles() -> ContentOracles {
    let spells = SpellBook::from_spells(vec![strike()]).unwrap();
    let monsters = MonsterCatalog::from_templates(vec![MonsterTemplate {
        id: DUMMY,
        name: "Dummy".into(),
        grades: vec![dummy_grade()],
    }])
    .unwrap();
    ContentOracles::new(spells, monsters, Arc::new(PcgRng::new(7)))
}

pub fn service(fight: FightConfig) -> FightService {
    let config = RuntimeConfig {
        fight,
        ..RuntimeConfig::default()
    };
    FightService::new(config, oracles())
}

pub fn player(name: &str, initiative: i32) -> FighterSpec {
    FighterSpec::player(AccountId(1), name, 100)
        .with_characteristic(Characteristic::ActionPoints, 6)
        .with_characteristic(Characteristic::MovementPoints, 3)
        .with_characteristic(Characteristic::Initiative, initiative)
        .with_spell(STRIKE)
}

pub fn monster() -> FighterSpec {
    FighterSpec::monster(DUMMY, &dummy_grade())
}

pub fn setup(kind: FightType, red: FighterSpec, blue: FighterSpec) -> FightSetup {
    FightSetup {
        kind,
        grid: Battlefield::open(10, 10),
        teams: vec![
            TeamSetup {
                places: vec![CellId(0), CellId(1)],
                fighters: vec![red],
            },
            TeamSetup {
                places: vec![CellId(5), CellId(15)],
                fighters: vec![blue],
            },
        ],
    }
}

/// Fighters are numbered in join order: red is #1, blue is #2.
pub const RED: FighterId = FighterId(1);
pub const BLUE: FighterId = FighterId(2);
pub const BLUE_TEAM: TeamId = TeamId(1);

/// A started player duel; red has the higher initiative and plays first.
pub async fn started_duel(service: &FightService) -> FightHandle {
    let handle = service
        .create_fight(setup(FightType::Challenge, player("red", 100), player("blue", 10)))
        .await
        .unwrap();
    assert!(!handle.set_ready(RED, true).await.unwrap());
    assert!(handle.set_ready(BLUE, true).await.unwrap());
    handle
}

pub async fn life(handle: &FightHandle, fighter: FighterId) -> i32 {
    let snapshot = handle.snapshot().await.unwrap();
    snapshot
        .fighters
        .iter()
        .find(|entry| entry.id == fighter)
        .map(|entry| entry.life.current())
        .unwrap()
}

pub async fn blue_cell(handle: &FightHandle) -> CellId {
    let snapshot = handle.snapshot().await.unwrap();
    snapshot
        .fighters
        .iter()
        .find(|entry| entry.id == BLUE)
        .map(|entry| entry.cell)
        .unwrap()
}
